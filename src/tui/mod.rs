//! Terminal user interface
//!
//! Interactive task-manager dashboard built on ratatui. Owns terminal
//! setup/teardown and the tick-based event loop; all view state lives in
//! [`App`] and rendering in the `ui` module.

use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton,
        MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::debug;
use ratatui::{backend::CrosstermBackend, prelude::Backend, Terminal};
use std::io;
use std::time::Instant;

mod app;
mod ui;

pub use app::{App, Tab};

use crate::config::Config;
use crate::error::Result;

/// Run the dashboard until the user quits.
pub fn run(config: Config) -> Result<()> {
    // Build the app (including the initial process scan) before touching
    // the terminal, so a failure here leaves the shell untouched.
    let mut app = App::new(config)?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal before reporting any error
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res
}

/// Main application loop with tick-based timing.
///
/// The base tick drives rendering; metric sampling gates itself on wall
/// clock inside `App::on_tick`, so rendering faster never over-samples.
fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    let tick_duration = app.config.tick_interval();
    // Process list refresh cadence, in ticks (5 s at the 100 ms default).
    const PROCESS_TICKS: u64 = 50;

    let mut tick_count: u64 = 0;
    let mut last_tick = Instant::now();

    loop {
        let timeout = tick_duration.saturating_sub(last_tick.elapsed());

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    match key.code {
                        KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                        KeyCode::Char('1') => app.set_tab(Tab::Processes),
                        KeyCode::Char('2') => app.set_tab(Tab::Performance),
                        KeyCode::Char('3') => app.set_tab(Tab::AppHistory),
                        KeyCode::Char('4') => app.set_tab(Tab::Startup),
                        KeyCode::Left => app.previous_tab(),
                        KeyCode::Right => app.next_tab(),
                        KeyCode::Up => app.scroll_line_up(),
                        KeyCode::Down => app.scroll_line_down(),
                        KeyCode::PageUp => app.scroll_page_up(),
                        KeyCode::PageDown => app.scroll_page_down(),
                        KeyCode::Home => app.scroll_to_top(),
                        KeyCode::End => app.scroll_to_bottom(),
                        KeyCode::Char('r') | KeyCode::F(5) => app.refresh_processes(),
                        KeyCode::Delete | KeyCode::Char('x') => {
                            if app.tab == Tab::Processes {
                                app.end_selected_task();
                            }
                        }
                        KeyCode::Char('e') | KeyCode::Char('d') => {
                            if app.tab == Tab::Startup {
                                app.toggle_selected_startup();
                            }
                        }
                        _ => {}
                    }
                }
                Event::Mouse(mouse) => {
                    let size = terminal.size()?;
                    app.sync_layout(size.width, size.height);
                    if let Some(input) = pointer_input(&mouse) {
                        app.pointer(input, size.width, size.height);
                    }
                }
                _ => {}
            }
        }

        if last_tick.elapsed() >= tick_duration {
            tick_count = tick_count.wrapping_add(1);
            last_tick = Instant::now();

            app.on_tick(last_tick);

            if tick_count % PROCESS_TICKS == 0 && app.tab == Tab::Processes {
                if let Err(e) = app.processes.refresh() {
                    debug!("periodic process refresh failed: {}", e);
                }
            }

            let size = terminal.size()?;
            app.sync_layout(size.width, size.height);
            terminal.draw(|f| ui::draw(f, app))?;
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

/// Translate a crossterm mouse event into one frame of pointer state.
fn pointer_input(mouse: &MouseEvent) -> Option<crate::viewport::PointerInput> {
    use crate::viewport::PointerInput;
    let (x, y) = (mouse.column as f32, mouse.row as f32);
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => Some(PointerInput::press(x, y)),
        MouseEventKind::Up(MouseButton::Left) => Some(PointerInput::release(x, y)),
        MouseEventKind::Drag(MouseButton::Left) => Some(PointerInput::move_to(x, y)),
        MouseEventKind::ScrollUp => Some(PointerInput::wheel(x, y, 1.0)),
        MouseEventKind::ScrollDown => Some(PointerInput::wheel(x, y, -1.0)),
        _ => None,
    }
}
