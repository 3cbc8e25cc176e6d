//! Application state management

use std::time::{Duration, Instant};

use log::warn;

use crate::app_history::AppHistoryList;
use crate::config::Config;
use crate::demo::DemoSampler;
use crate::error::Result;
use crate::perf::PerfMetrics;
use crate::process_list::ProcessTable;
use crate::startup::StartupList;
use crate::viewport::{PointerInput, Rect, ScrollViewport};

/// How long a status message stays in the footer.
const STATUS_TIMEOUT: Duration = Duration::from_secs(2);

/// Rows scrolled per PageUp/PageDown, in row units.
const PAGE_ROWS: f32 = 10.0;

/// Row height of the process list, cells.
pub const PROCESS_ROW_HEIGHT: f32 = 1.0;
/// Row height of the startup list (name + publisher), cells.
pub const STARTUP_ROW_HEIGHT: f32 = 2.0;
/// Row height of the app-history list (header line + sparkline), cells.
pub const HISTORY_ROW_HEIGHT: f32 = 3.0;

/// The four dashboard tabs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tab {
    Processes,
    Performance,
    AppHistory,
    Startup,
}

impl Tab {
    pub const ALL: [Tab; 4] = [
        Tab::Processes,
        Tab::Performance,
        Tab::AppHistory,
        Tab::Startup,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Processes => "Processes",
            Tab::Performance => "Performance",
            Tab::AppHistory => "App History",
            Tab::Startup => "Startup",
        }
    }

    pub fn index(self) -> usize {
        Tab::ALL.iter().position(|&t| t == self).unwrap_or(0)
    }
}

/// Cell geometry of one scrollable view for the current frame size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewLayout {
    /// The list body (excludes tab bar, column header, footer, scrollbar).
    pub list: Rect,
    /// Scrollbar track: the rightmost column beside the list.
    pub track: Rect,
    /// Logical row height in cells.
    pub row_height: f32,
}

/// Height of the tab bar at the top of the frame, cells.
pub const TAB_BAR_HEIGHT: u16 = 3;
/// Height of the footer, cells.
pub const FOOTER_HEIGHT: u16 = 3;
/// Column header line above each list.
pub const LIST_HEADER_HEIGHT: u16 = 1;

/// Compute the list geometry for `tab`, or `None` when the tab has no
/// scrollable list or the terminal is too small.
pub fn view_layout(frame_width: u16, frame_height: u16, tab: Tab) -> Option<ViewLayout> {
    let row_height = match tab {
        Tab::Processes => PROCESS_ROW_HEIGHT,
        Tab::AppHistory => HISTORY_ROW_HEIGHT,
        Tab::Startup => STARTUP_ROW_HEIGHT,
        Tab::Performance => return None,
    };
    let reserved = TAB_BAR_HEIGHT + FOOTER_HEIGHT + LIST_HEADER_HEIGHT;
    if frame_height <= reserved || frame_width < 3 {
        return None;
    }
    let top = (TAB_BAR_HEIGHT + LIST_HEADER_HEIGHT) as f32;
    let height = (frame_height - reserved) as f32;
    Some(ViewLayout {
        list: Rect::new(0.0, top, (frame_width - 1) as f32, height),
        track: Rect::new((frame_width - 1) as f32, top, 1.0, height),
        row_height,
    })
}

/// Map a click in the tab bar to a tab.
///
/// Titles are rendered starting at column 1, separated by " | " (three
/// cells); this mirrors the span layout in `ui::draw_tab_bar`.
pub fn tab_at_column(column: u16) -> Option<Tab> {
    let mut x = 1u16;
    for tab in Tab::ALL {
        let width = tab.title().len() as u16;
        if column >= x && column < x + width {
            return Some(tab);
        }
        x += width + 3;
    }
    None
}

/// Application state
pub struct App {
    /// Currently selected tab
    pub tab: Tab,
    /// System performance metrics and histories
    pub perf: PerfMetrics,
    /// Demo metric source
    sampler: DemoSampler,
    /// Process table (Processes tab)
    pub processes: ProcessTable,
    /// Startup applications (Startup tab)
    pub startup: StartupList,
    /// Per-app usage histories (App History tab)
    pub app_history: AppHistoryList,
    /// Scroll state, one viewport per scrollable view
    pub process_viewport: ScrollViewport,
    pub startup_viewport: ScrollViewport,
    pub history_viewport: ScrollViewport,
    /// Status message shown in the footer (cleared after timeout)
    status_message: Option<(String, Instant)>,
    /// Set when the user asks to quit
    pub should_quit: bool,
    /// Application configuration
    pub config: Config,
}

impl App {
    /// Create the application state and run the initial process scan.
    pub fn new(config: Config) -> Result<Self> {
        let now = Instant::now();
        let perf = PerfMetrics::new(
            config.demo.memory_total_mb,
            config.demo.disk_total_mb,
            config.perf_interval(),
        )?;
        let app_history = AppHistoryList::load_demo(now, config.app_history_interval())?;

        let mut app = Self {
            tab: Tab::Processes,
            perf,
            sampler: DemoSampler::new(config.demo.memory_total_mb),
            processes: ProcessTable::new(),
            startup: StartupList::load_demo(),
            app_history,
            process_viewport: ScrollViewport::with_metrics(1.0, PROCESS_ROW_HEIGHT),
            startup_viewport: ScrollViewport::with_metrics(1.0, STARTUP_ROW_HEIGHT),
            history_viewport: ScrollViewport::with_metrics(1.0, HISTORY_ROW_HEIGHT),
            status_message: None,
            should_quit: false,
            config,
        };
        if let Err(e) = app.processes.refresh() {
            warn!("initial process scan failed: {}", e);
            app.set_status(format!("Process scan failed: {}", e));
        }
        Ok(app)
    }

    /// One loop tick: gated metric updates and status expiry.
    pub fn on_tick(&mut self, now: Instant) {
        let process_count = self.processes.len();
        self.perf.update(now, &mut self.sampler, process_count);
        self.app_history.tick(now);

        if let Some((_, since)) = self.status_message {
            if now.saturating_duration_since(since) >= STATUS_TIMEOUT {
                self.status_message = None;
            }
        }
    }

    /// Recompute every viewport's geometry for the current frame size.
    ///
    /// Called once per frame before drawing and before routing pointer
    /// input, so both see the same geometry.
    pub fn sync_layout(&mut self, frame_width: u16, frame_height: u16) {
        for tab in [Tab::Processes, Tab::AppHistory, Tab::Startup] {
            let Some(layout) = view_layout(frame_width, frame_height, tab) else {
                continue;
            };
            let rows = match tab {
                Tab::Processes => self.processes.len(),
                Tab::AppHistory => self.app_history.len(),
                Tab::Startup => self.startup.len(),
                Tab::Performance => 0,
            };
            let content = rows as f32 * layout.row_height;
            let viewport = self.viewport_mut(tab);
            viewport.set_layout(layout.track, content, layout.list.height);
        }
    }

    fn viewport_mut(&mut self, tab: Tab) -> &mut ScrollViewport {
        match tab {
            Tab::Processes | Tab::Performance => &mut self.process_viewport,
            Tab::AppHistory => &mut self.history_viewport,
            Tab::Startup => &mut self.startup_viewport,
        }
    }

    /// Viewport of the active tab, if it has one.
    pub fn active_viewport(&mut self) -> Option<&mut ScrollViewport> {
        match self.tab {
            Tab::Performance => None,
            tab => Some(self.viewport_mut(tab)),
        }
    }

    fn active_row_height(&self) -> f32 {
        match self.tab {
            Tab::Processes => PROCESS_ROW_HEIGHT,
            Tab::AppHistory => HISTORY_ROW_HEIGHT,
            Tab::Startup => STARTUP_ROW_HEIGHT,
            Tab::Performance => 1.0,
        }
    }

    /// Switch tabs, dropping any selection (matching the reference UI).
    pub fn set_tab(&mut self, tab: Tab) {
        if self.tab != tab {
            self.tab = tab;
            self.processes.clear_selection();
            self.startup.clear_selection();
        }
    }

    pub fn next_tab(&mut self) {
        let next = (self.tab.index() + 1) % Tab::ALL.len();
        self.set_tab(Tab::ALL[next]);
    }

    pub fn previous_tab(&mut self) {
        let prev = (self.tab.index() + Tab::ALL.len() - 1) % Tab::ALL.len();
        self.set_tab(Tab::ALL[prev]);
    }

    pub fn scroll_line_up(&mut self) {
        let step = self.active_row_height();
        if let Some(vp) = self.active_viewport() {
            vp.scroll_by(-step);
        }
    }

    pub fn scroll_line_down(&mut self) {
        let step = self.active_row_height();
        if let Some(vp) = self.active_viewport() {
            vp.scroll_by(step);
        }
    }

    pub fn scroll_page_up(&mut self) {
        let step = self.active_row_height() * PAGE_ROWS;
        if let Some(vp) = self.active_viewport() {
            vp.scroll_by(-step);
        }
    }

    pub fn scroll_page_down(&mut self) {
        let step = self.active_row_height() * PAGE_ROWS;
        if let Some(vp) = self.active_viewport() {
            vp.scroll_by(step);
        }
    }

    pub fn scroll_to_top(&mut self) {
        if let Some(vp) = self.active_viewport() {
            vp.scroll_to(0.0);
        }
    }

    pub fn scroll_to_bottom(&mut self) {
        if let Some(vp) = self.active_viewport() {
            let end = vp.max_scroll();
            vp.scroll_to(end);
        }
    }

    /// Route one frame of pointer state to the active view.
    ///
    /// Presses in the tab bar switch tabs; presses in the list body map
    /// to row selection; everything else goes to the scrollbar state
    /// machine.
    pub fn pointer(&mut self, input: PointerInput, frame_width: u16, frame_height: u16) {
        if input.pressed && (input.position.y as u16) < TAB_BAR_HEIGHT {
            if let Some(tab) = tab_at_column(input.position.x as u16) {
                self.set_tab(tab);
            }
            return;
        }

        let Some(layout) = view_layout(frame_width, frame_height, self.tab) else {
            return;
        };
        let tab = self.tab;
        let row_count = match tab {
            Tab::Processes => self.processes.len(),
            Tab::Startup => self.startup.len(),
            _ => 0,
        };
        let viewport = self.viewport_mut(tab);
        viewport.handle_pointer(&input, layout.list);

        let clicked = if input.pressed
            && layout.list.contains(input.position)
            && !viewport.is_dragging()
        {
            viewport.clicked_row(input.position.y, layout.list.y, layout.row_height, row_count)
        } else {
            None
        };
        if let Some(index) = clicked {
            let result = match tab {
                Tab::Processes => self.processes.select(index),
                Tab::Startup => self.startup.select(index),
                _ => Ok(()),
            };
            if let Err(e) = result {
                warn!("row selection failed: {}", e);
            }
        }
    }

    /// Re-enumerate processes, reporting the outcome in the footer.
    pub fn refresh_processes(&mut self) {
        match self.processes.refresh() {
            Ok(count) => {
                let stamp = chrono::Local::now().format("%H:%M:%S");
                self.set_status(format!("Refreshed {} processes at {}", count, stamp));
            }
            Err(e) => self.set_status(format!("Refresh failed: {}", e)),
        }
    }

    /// Terminate the selected process and refresh the list.
    pub fn end_selected_task(&mut self) {
        let Some(entry) = self.processes.selected_entry() else {
            self.set_status("No process selected".to_string());
            return;
        };
        let (pid, name) = (entry.pid, entry.name.clone());
        match self.processes.kill(pid) {
            Ok(()) => {
                self.set_status(format!("Terminated {} ({})", name, pid));
                if let Err(e) = self.processes.refresh() {
                    warn!("refresh after terminate failed: {}", e);
                }
            }
            Err(e) => self.set_status(format!("{}", e)),
        }
    }

    /// Toggle the selected startup app's enabled flag.
    pub fn toggle_selected_startup(&mut self) {
        let Some(index) = self.startup.selected() else {
            self.set_status("No startup app selected".to_string());
            return;
        };
        let message = match self.startup.toggle(index) {
            Ok(app) => {
                let verb = if app.enabled { "enabled" } else { "disabled" };
                format!("{} {}", app.name, verb)
            }
            Err(e) => format!("{}", e),
        };
        self.set_status(message);
    }

    pub fn set_status(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    pub fn status(&self) -> Option<&str> {
        self.status_message.as_ref().map(|(m, _)| m.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;
    use std::time::Duration;

    fn test_app() -> App {
        // Avoid the real process scan in unit tests: build the pieces by
        // hand with a deterministic table.
        let config = Config::default();
        let now = Instant::now();
        let mut app = App {
            tab: Tab::Processes,
            perf: PerfMetrics::new(16384, 512_000, config.perf_interval()).unwrap(),
            sampler: DemoSampler::with_seed(16384, 9),
            processes: ProcessTable::with_seed(9),
            startup: StartupList::load_demo(),
            app_history: AppHistoryList::load_demo_seeded(
                now,
                config.app_history_interval(),
                SmallRng::seed_from_u64(9),
            )
            .unwrap(),
            process_viewport: ScrollViewport::with_metrics(1.0, PROCESS_ROW_HEIGHT),
            startup_viewport: ScrollViewport::with_metrics(1.0, STARTUP_ROW_HEIGHT),
            history_viewport: ScrollViewport::with_metrics(1.0, HISTORY_ROW_HEIGHT),
            status_message: None,
            should_quit: false,
            config,
        };
        let listing: String = (1..=50).map(|i| format!("{} proc{}\n", i, i)).collect();
        app.processes.rebuild(&listing);
        app
    }

    #[test]
    fn test_tab_cycle() {
        let mut app = test_app();
        app.next_tab();
        assert_eq!(app.tab, Tab::Performance);
        app.previous_tab();
        assert_eq!(app.tab, Tab::Processes);
        app.previous_tab();
        assert_eq!(app.tab, Tab::Startup);
    }

    #[test]
    fn test_tab_switch_clears_selection() {
        let mut app = test_app();
        app.processes.select(3).unwrap();
        app.set_tab(Tab::Startup);
        assert_eq!(app.processes.selected(), None);
    }

    #[test]
    fn test_tab_at_column_layout() {
        // " Processes | Performance | App History | Startup"
        assert_eq!(tab_at_column(1), Some(Tab::Processes));
        assert_eq!(tab_at_column(9), Some(Tab::Processes));
        assert_eq!(tab_at_column(10), None); // separator
        assert_eq!(tab_at_column(13), Some(Tab::Performance));
        assert_eq!(tab_at_column(27), Some(Tab::AppHistory));
        assert_eq!(tab_at_column(41), Some(Tab::Startup));
        assert_eq!(tab_at_column(200), None);
    }

    #[test]
    fn test_view_layout_geometry() {
        let layout = view_layout(120, 40, Tab::Processes).unwrap();
        assert_eq!(layout.list.y, 4.0);
        assert_eq!(layout.list.height, 33.0);
        assert_eq!(layout.list.width, 119.0);
        assert_eq!(layout.track.x, 119.0);
        assert_eq!(layout.track.width, 1.0);
        assert_eq!(layout.row_height, PROCESS_ROW_HEIGHT);
        assert!(view_layout(120, 40, Tab::Performance).is_none());
        assert!(view_layout(120, 6, Tab::Processes).is_none());
    }

    #[test]
    fn test_sync_layout_activates_process_viewport() {
        let mut app = test_app();
        app.sync_layout(120, 40);
        // 50 rows of height 1 against a 33-cell window.
        assert_eq!(app.process_viewport.max_scroll(), 17.0);
        assert!(!app.process_viewport.is_inert());
        // 8 startup rows of height 2 fit in 33 cells.
        assert!(app.startup_viewport.is_inert());
    }

    #[test]
    fn test_scroll_keys_clamp() {
        let mut app = test_app();
        app.sync_layout(120, 40);
        app.scroll_line_up();
        assert_eq!(app.process_viewport.scroll_offset(), 0.0);
        app.scroll_page_down();
        assert_eq!(app.process_viewport.scroll_offset(), 10.0);
        app.scroll_to_bottom();
        assert_eq!(app.process_viewport.scroll_offset(), 17.0);
        app.scroll_line_down();
        assert_eq!(app.process_viewport.scroll_offset(), 17.0);
        app.scroll_to_top();
        assert_eq!(app.process_viewport.scroll_offset(), 0.0);
    }

    #[test]
    fn test_click_selects_process_row() {
        let mut app = test_app();
        app.sync_layout(120, 40);
        // Row 4 of the list starts at y = 4.0; click row index 2.
        app.pointer(PointerInput::press(10.0, 6.0), 120, 40);
        assert_eq!(app.processes.selected(), Some(2));
    }

    #[test]
    fn test_click_on_tab_bar_switches_tab() {
        let mut app = test_app();
        app.sync_layout(120, 40);
        app.pointer(PointerInput::press(13.0, 1.0), 120, 40);
        assert_eq!(app.tab, Tab::Performance);
    }

    #[test]
    fn test_wheel_scrolls_process_list() {
        let mut app = test_app();
        app.sync_layout(120, 40);
        app.pointer(PointerInput::wheel(10.0, 10.0, -3.0), 120, 40);
        assert_eq!(app.process_viewport.scroll_offset(), 3.0);
    }

    #[test]
    fn test_status_expires_after_timeout() {
        let mut app = test_app();
        app.set_status("hello".to_string());
        assert_eq!(app.status(), Some("hello"));
        app.on_tick(Instant::now() + Duration::from_secs(3));
        assert_eq!(app.status(), None);
    }

    #[test]
    fn test_toggle_without_selection_reports_status() {
        let mut app = test_app();
        app.set_tab(Tab::Startup);
        app.toggle_selected_startup();
        assert_eq!(app.status(), Some("No startup app selected"));
        app.startup.select(0).unwrap();
        app.toggle_selected_startup();
        assert_eq!(app.status(), Some("Microsoft OneDrive disabled"));
    }
}
