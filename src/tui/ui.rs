//! UI rendering functions
//!
//! Task-manager style tabbed layout:
//! - Tab bar: four views (Processes, Performance, App History, Startup)
//! - Content: virtualized lists with a scrollbar column, or gauge/sparkline
//!   charts on the Performance tab
//! - Footer: per-tab help and transient status messages
//!
//! Color thresholds:
//! - OK (Green): 0-50%
//! - CAREFUL (Cyan): 50-70%
//! - WARNING (Yellow): 70-90%
//! - CRITICAL (Red): 90-100%

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Sparkline},
    Frame,
};

use super::app::{view_layout, App, Tab, FOOTER_HEIGHT, TAB_BAR_HEIGHT};
use crate::history::RingHistory;
use crate::viewport::{self, ScrollViewport};

/// Threshold colors
mod palette {
    use ratatui::style::Color;

    /// OK status - safe level (0-50%)
    pub const OK: Color = Color::Green;
    /// CAREFUL status - watch level (50-70%)
    pub const CAREFUL: Color = Color::Cyan;
    /// WARNING status - attention needed (70-90%)
    pub const WARNING: Color = Color::Yellow;
    /// CRITICAL status - urgent (90-100%)
    pub const CRITICAL: Color = Color::Red;
    /// Title/header color
    pub const TITLE: Color = Color::Cyan;
    /// Separator/inactive color
    pub const INACTIVE: Color = Color::DarkGray;
    /// Selected row background
    pub const SELECTED_BG: Color = Color::Rgb(69, 71, 90);
    /// Scrollbar thumb
    pub const THUMB: Color = Color::Gray;
}

/// Get color based on percentage threshold
fn threshold_color(percent: f32) -> Color {
    match percent {
        p if p >= 90.0 => palette::CRITICAL,
        p if p >= 70.0 => palette::WARNING,
        p if p >= 50.0 => palette::CAREFUL,
        _ => palette::OK,
    }
}

/// Safely clamp a percentage value to 0-100 range for gauge widgets
fn safe_percent(value: f32) -> u16 {
    if value.is_nan() || value.is_infinite() || value < 0.0 {
        0
    } else if value > 100.0 {
        100
    } else {
        value as u16
    }
}

/// Format a megabyte figure with auto unit
fn format_mb(mb: u64) -> String {
    if mb >= 1024 {
        format!("{:.1} GB", mb as f64 / 1024.0)
    } else {
        format!("{} MB", mb)
    }
}

/// Format a kilobyte figure with auto unit
fn format_kb(kb: u64) -> String {
    if kb >= 1024 * 1024 {
        format!("{:.1} GB", kb as f64 / (1024.0 * 1024.0))
    } else if kb >= 1024 {
        format!("{:.1} MB", kb as f64 / 1024.0)
    } else {
        format!("{} KB", kb)
    }
}

fn format_uptime(uptime: std::time::Duration) -> String {
    let secs = uptime.as_secs();
    format!("{}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}

/// Render a history ring as a one-line block-character chart.
fn mini_chart(history: &RingHistory<f32>, max: f32, width: usize) -> String {
    let samples: Vec<f32> = history.iter_chronological().collect();
    let start = samples.len().saturating_sub(width);
    samples[start..]
        .iter()
        .map(|&v| {
            let level = if max > 0.0 { v / max * 8.0 } else { 0.0 };
            match level as u32 {
                0 => '▁',
                1 => '▂',
                2 => '▃',
                3 => '▄',
                4 => '▅',
                5 => '▆',
                6 => '▇',
                _ => '█',
            }
        })
        .collect()
}

fn to_rect(r: viewport::Rect) -> Rect {
    Rect::new(r.x as u16, r.y as u16, r.width as u16, r.height as u16)
}

/// Main drawing function
pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(TAB_BAR_HEIGHT),
            Constraint::Min(0),
            Constraint::Length(FOOTER_HEIGHT),
        ])
        .split(f.area());

    draw_tab_bar(f, app, chunks[0]);

    match app.tab {
        Tab::Processes => draw_processes_tab(f, app),
        Tab::Performance => draw_performance_tab(f, app, chunks[1]),
        Tab::AppHistory => draw_app_history_tab(f, app),
        Tab::Startup => draw_startup_tab(f, app),
    }

    draw_footer(f, app, chunks[2]);
}

/// Draw the tab bar with a quick-look summary in the title.
///
/// Titles are rendered by hand (rather than with the `Tabs` widget) so the
/// mouse hit test in `app::tab_at_column` can mirror the exact span layout:
/// first title at column 1, " | " between titles.
fn draw_tab_bar(f: &mut Frame, app: &App, area: Rect) {
    let title_text = format!(
        "Task Monitor │ CPU:{:.0}% MEM:{:.0}% │ {} processes",
        app.perf.cpu_percent,
        app.perf.memory_percent(),
        app.perf.process_count,
    );

    let mut spans: Vec<Span> = Vec::new();
    for (i, tab) in Tab::ALL.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", Style::default().fg(palette::INACTIVE)));
        }
        let style = if *tab == app.tab {
            Style::default()
                .fg(palette::TITLE)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED)
        } else {
            Style::default().fg(palette::INACTIVE)
        };
        spans.push(Span::styled(tab.title(), style));
    }

    let tabs = Paragraph::new(Line::from(spans)).block(
        Block::default().borders(Borders::ALL).title(Span::styled(
            title_text,
            Style::default()
                .fg(palette::TITLE)
                .add_modifier(Modifier::BOLD),
        )),
    );
    f.render_widget(tabs, area);
}

/// Draw the scrollbar column for one viewport.
fn draw_scrollbar(f: &mut Frame, viewport: &ScrollViewport, track: viewport::Rect) {
    let area = to_rect(track);
    if area.height == 0 {
        return;
    }
    let thumb = viewport.thumb_rect();
    let lines: Vec<Line> = (0..area.height)
        .map(|row| {
            let y = track.y + row as f32;
            let in_thumb = thumb
                .map(|t| y >= t.y - 0.5 && y < t.y + t.height - 0.5)
                .unwrap_or(false);
            if in_thumb {
                Line::from(Span::styled("█", Style::default().fg(palette::THUMB)))
            } else {
                Line::from(Span::styled("│", Style::default().fg(palette::INACTIVE)))
            }
        })
        .collect();
    f.render_widget(Paragraph::new(lines), area);
}

/// Render a window of pre-built text lines into a list body.
///
/// `lines` covers the visible rows only; the caller skips rows above the
/// scroll offset when building it.
fn draw_list_lines(f: &mut Frame, lines: Vec<Line>, list: viewport::Rect) {
    let area = to_rect(list);
    f.render_widget(Paragraph::new(lines), area);
}

/// Processes tab: virtualized PID/name/CPU/memory table.
fn draw_processes_tab(f: &mut Frame, app: &App) {
    let size = f.area();
    let Some(layout) = view_layout(size.width, size.height, Tab::Processes) else {
        return;
    };

    let header = Line::from(Span::styled(
        format!("{:>7}  {:<32}  {:>6}  {:>10}", "PID", "Name", "CPU%", "Memory"),
        Style::default()
            .fg(palette::TITLE)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
    ));
    f.render_widget(
        Paragraph::new(header),
        Rect::new(0, TAB_BAR_HEIGHT, size.width.saturating_sub(1), 1),
    );

    let window = app.process_viewport.row_window(layout.row_height);
    let visible = layout.list.height as usize;
    let lines: Vec<Line> = app
        .processes
        .entries()
        .iter()
        .skip(window.first_index)
        .take(window.max_visible.min(visible))
        .map(|entry| {
            let text = format!(
                "{:>7}  {:<32}  {:>5.1}%  {:>10}",
                entry.pid,
                truncate(&entry.name, 32),
                entry.cpu_percent,
                format_kb(entry.memory_kb),
            );
            let style = if entry.selected {
                Style::default()
                    .bg(palette::SELECTED_BG)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(threshold_color(entry.cpu_percent))
            };
            Line::from(Span::styled(text, style))
        })
        .collect();

    draw_list_lines(f, lines, layout.list);
    draw_scrollbar(f, &app.process_viewport, layout.track);
}

/// Performance tab: four gauges, a counters line and history sparklines.
fn draw_performance_tab(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // CPU
            Constraint::Length(3), // Memory
            Constraint::Length(3), // Disk
            Constraint::Length(3), // GPU
            Constraint::Length(1), // Counters
            Constraint::Min(4),    // Sparklines
        ])
        .split(area);

    draw_gauge(
        f,
        chunks[0],
        "CPU",
        format!("CPU {:.0}%", app.perf.cpu_percent),
        app.perf.cpu_percent,
    );
    draw_gauge(
        f,
        chunks[1],
        "Memory",
        format!(
            "MEM {:.0}% │ {}/{} │ {} available",
            app.perf.memory_percent(),
            format_mb(app.perf.memory_used_mb),
            format_mb(app.perf.memory_total_mb),
            format_mb(app.perf.memory_available_mb),
        ),
        app.perf.memory_percent(),
    );
    draw_gauge(
        f,
        chunks[2],
        "Disk",
        format!(
            "DISK {:.0}% │ {}/{}",
            app.perf.disk_percent(),
            format_mb(app.perf.disk_used_mb),
            format_mb(app.perf.disk_total_mb),
        ),
        app.perf.disk_percent(),
    );
    draw_gauge(
        f,
        chunks[3],
        "GPU",
        format!("GPU {:.0}%", app.perf.gpu_percent),
        app.perf.gpu_percent,
    );

    let counters = Paragraph::new(format!(
        "Processes: {} │ Threads: {} │ Up: {}",
        app.perf.process_count,
        app.perf.thread_count,
        format_uptime(app.perf.uptime),
    ))
    .style(Style::default().fg(Color::White))
    .alignment(Alignment::Center);
    f.render_widget(counters, chunks[4]);

    let spark_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[5]);

    let cpu_data: Vec<u64> = app
        .perf
        .cpu_history
        .iter_chronological()
        .map(|v| v as u64)
        .collect();
    let cpu_spark = Sparkline::default()
        .block(Block::default().borders(Borders::ALL).title("CPU History"))
        .data(&cpu_data)
        .max(100)
        .style(Style::default().fg(threshold_color(app.perf.cpu_percent)));
    f.render_widget(cpu_spark, spark_chunks[0]);

    let mem_data: Vec<u64> = app.perf.memory_history.iter_chronological().collect();
    let mem_spark = Sparkline::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Memory History"),
        )
        .data(&mem_data)
        .max(app.perf.memory_total_mb.max(1))
        .style(Style::default().fg(threshold_color(app.perf.memory_percent())));
    f.render_widget(mem_spark, spark_chunks[1]);
}

fn draw_gauge(f: &mut Frame, area: Rect, title: &str, label: String, percent: f32) {
    let gauge = Gauge::default()
        .block(
            Block::default().borders(Borders::ALL).title(Span::styled(
                title.to_string(),
                Style::default()
                    .fg(palette::TITLE)
                    .add_modifier(Modifier::BOLD),
            )),
        )
        .gauge_style(
            Style::default()
                .fg(threshold_color(percent))
                .add_modifier(Modifier::BOLD),
        )
        .percent(safe_percent(percent))
        .label(label);
    f.render_widget(gauge, area);
}

/// App History tab: three lines per app, the third a block-char CPU chart.
fn draw_app_history_tab(f: &mut Frame, app: &App) {
    let size = f.area();
    let Some(layout) = view_layout(size.width, size.height, Tab::AppHistory) else {
        return;
    };

    let header = Line::from(Span::styled(
        format!(
            "{:<20}  {:>9}  {:>10}  {:>10}",
            "Application", "CPU time", "Memory", "Network"
        ),
        Style::default()
            .fg(palette::TITLE)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
    ));
    f.render_widget(
        Paragraph::new(header),
        Rect::new(0, TAB_BAR_HEIGHT, size.width.saturating_sub(1), 1),
    );

    // Rows are 3 cells tall; build the full window as flat lines and skip
    // the part of the first row clipped above the viewport.
    let window = app.history_viewport.row_window(layout.row_height);
    let chart_width = (layout.list.width as usize).saturating_sub(2).min(60);
    let mut lines: Vec<Line> = Vec::new();
    for entry in app
        .app_history
        .entries()
        .iter()
        .skip(window.first_index)
        .take(window.max_visible)
    {
        let cpu_color = threshold_color(entry.cpu_time);
        lines.push(Line::from(vec![
            Span::styled(
                format!("{:<20}", truncate(entry.name, 20)),
                Style::default()
                    .fg(palette::TITLE)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  {:>7.1}%", entry.cpu_time),
                Style::default().fg(cpu_color),
            ),
            Span::raw(format!(
                "  {:>10}  {:>10}",
                format_kb(entry.memory_kb),
                format_kb(entry.network_kb),
            )),
        ]));
        let max = entry.cpu_history.max_value(1.0);
        lines.push(Line::from(Span::styled(
            mini_chart(&entry.cpu_history, max, chart_width),
            Style::default().fg(cpu_color),
        )));
        lines.push(Line::from(""));
    }
    let skip = window.offset_within_row as usize;
    let lines: Vec<Line> = lines
        .into_iter()
        .skip(skip)
        .take(layout.list.height as usize)
        .collect();

    draw_list_lines(f, lines, layout.list);
    draw_scrollbar(f, &app.history_viewport, layout.track);
}

/// Startup tab: two lines per app (name/impact, publisher/status).
fn draw_startup_tab(f: &mut Frame, app: &App) {
    let size = f.area();
    let Some(layout) = view_layout(size.width, size.height, Tab::Startup) else {
        return;
    };

    let header = Line::from(Span::styled(
        format!("{:<28}  {:<26}  {:>8}  {:>10}", "Name", "Publisher", "Status", "Impact"),
        Style::default()
            .fg(palette::TITLE)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
    ));
    f.render_widget(
        Paragraph::new(header),
        Rect::new(0, TAB_BAR_HEIGHT, size.width.saturating_sub(1), 1),
    );

    let window = app.startup_viewport.row_window(layout.row_height);
    let selected = app.startup.selected();
    let mut lines: Vec<Line> = Vec::new();
    for (index, entry) in app
        .startup
        .apps()
        .iter()
        .enumerate()
        .skip(window.first_index)
        .take(window.max_visible)
    {
        let is_selected = selected == Some(index);
        let name_style = if is_selected {
            Style::default()
                .bg(palette::SELECTED_BG)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        };
        let status_color = if entry.enabled {
            palette::OK
        } else {
            palette::INACTIVE
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{:<28}", truncate(entry.name, 28)), name_style),
            Span::raw(format!("  {:<26}", truncate(entry.publisher, 26))),
            Span::styled(format!("  {:>8}", entry.status()), Style::default().fg(status_color)),
            Span::raw(format!("  {:>8.1} s", entry.impact_seconds)),
        ]));
        lines.push(Line::from(Span::styled(
            "",
            Style::default().fg(palette::INACTIVE),
        )));
    }
    let skip = window.offset_within_row as usize;
    let lines: Vec<Line> = lines
        .into_iter()
        .skip(skip)
        .take(layout.list.height as usize)
        .collect();

    draw_list_lines(f, lines, layout.list);
    draw_scrollbar(f, &app.startup_viewport, layout.track);
}

/// Draw the footer: transient status if present, otherwise per-tab help.
fn draw_footer(f: &mut Frame, app: &App, area: Rect) {
    let (text, style) = match app.status() {
        Some(message) => (
            message.to_string(),
            Style::default()
                .fg(palette::WARNING)
                .add_modifier(Modifier::BOLD),
        ),
        None => {
            let help = match app.tab {
                Tab::Processes => "1-4/←→ tabs │ ↑↓ scroll │ click select │ r refresh │ Del end task │ q quit",
                Tab::Performance => "1-4/←→ tabs │ q quit",
                Tab::AppHistory => "1-4/←→ tabs │ ↑↓ scroll │ q quit",
                Tab::Startup => "1-4/←→ tabs │ ↑↓ scroll │ click select │ e/d toggle │ q quit",
            };
            (help.to_string(), Style::default().fg(palette::INACTIVE))
        }
    };

    let footer = Paragraph::new(text)
        .style(style)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(footer, area);
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        s.chars().take(max.saturating_sub(1)).collect::<String>() + "…"
    }
}
