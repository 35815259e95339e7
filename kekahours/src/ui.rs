//! UI rendering for the TUI.

use kekahours_core::card;
use kekahours_core::format::format_relative_time;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Gauge, Paragraph},
    Frame,
};

use crate::app::{App, ViewMode};

// ========== Dashboard Colors ==========

/// Border color for the summary card
const BORDER_CARD: Color = Color::Rgb(0, 150, 150);
/// Label color for metric rows
const LABEL_COLOR: Color = Color::Rgb(100, 180, 180);
/// Gauge fill while under the full day target
const GAUGE_ACTIVE: Color = Color::Rgb(220, 180, 0);
/// Gauge fill once the full day target is reached
const GAUGE_DONE: Color = Color::Rgb(80, 160, 80);
/// Gauge background track
const GAUGE_TRACK: Color = Color::Rgb(40, 40, 40);

/// Render the application UI.
pub fn render(frame: &mut Frame, app: &App) {
    match app.view_mode {
        ViewMode::Dashboard => render_dashboard_view(frame, app),
        ViewMode::Snapshot => render_snapshot_view(frame, app),
    }
}

/// Render the dashboard view (live summary card).
fn render_dashboard_view(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Layout: tab header, summary card, footer
    let chunks = Layout::vertical([
        Constraint::Length(2), // Tab header
        Constraint::Min(3),    // Summary card
        Constraint::Length(1), // Footer
    ])
    .split(area);

    render_tab_header(frame, ActiveTab::Dashboard, chunks[0]);
    if app.minimized {
        render_minimized_bar(frame, app, chunks[1]);
    } else {
        render_summary_card(frame, app, chunks[1]);
    }
    render_dashboard_footer(frame, app, chunks[2]);
}

/// Render the snapshot view (what the store last persisted).
fn render_snapshot_view(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Layout: tab header, stored snapshot, footer
    let chunks = Layout::vertical([
        Constraint::Length(2), // Tab header
        Constraint::Min(3),    // Stored snapshot
        Constraint::Length(1), // Footer
    ])
    .split(area);

    render_tab_header(frame, ActiveTab::Snapshot, chunks[0]);
    render_snapshot_body(frame, app, chunks[1]);
    render_snapshot_footer(frame, chunks[2]);
}

/// Which tab is currently active.
#[derive(Debug, Clone, Copy, PartialEq)]
enum ActiveTab {
    Dashboard,
    Snapshot,
}

/// Render the tab bar header with Dashboard and Snapshot tabs.
fn render_tab_header(frame: &mut Frame, active: ActiveTab, area: Rect) {
    // Layout: app name on left, tabs in center/right
    let chunks = Layout::horizontal([
        Constraint::Length(12), // App name
        Constraint::Min(1),     // Tabs
    ])
    .split(area);

    // App name
    let app_name = Paragraph::new(" kekahours").style(Style::default().fg(Color::Cyan).bold());
    frame.render_widget(app_name, chunks[0]);

    // Tab styling
    let active_style = Style::default()
        .fg(Color::Cyan)
        .bold()
        .add_modifier(Modifier::UNDERLINED);
    let inactive_style = Style::default().fg(Color::DarkGray);

    let dashboard_style = if active == ActiveTab::Dashboard {
        active_style
    } else {
        inactive_style
    };
    let snapshot_style = if active == ActiveTab::Snapshot {
        active_style
    } else {
        inactive_style
    };

    let tabs = Line::from(vec![
        Span::styled(" Dashboard ", dashboard_style),
        Span::styled("  ", Style::default()),
        Span::styled(" Snapshot ", snapshot_style),
    ]);

    let tabs_para = Paragraph::new(tabs).block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(tabs_para, chunks[1]);
}

/// Render the full summary card: metrics, progress gauge, target rows.
fn render_summary_card(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER_CARD))
        .title(" Keka Hours ")
        .title_style(Style::default().fg(Color::Cyan).bold());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let summary = match &app.summary {
        Some(s) => s,
        None => {
            let placeholder = Paragraph::new(" Waiting for the first refresh...")
                .style(Style::default().fg(Color::DarkGray));
            frame.render_widget(placeholder, inner);
            return;
        }
    };

    // Metric rows, with the degraded message on top when present
    let mut metric_lines: Vec<Line> = Vec::new();
    if let Some(message) = summary.status_message() {
        metric_lines.push(Line::from(Span::styled(
            format!(" {}", message),
            Style::default().fg(Color::Red).bold(),
        )));
        metric_lines.push(Line::raw(""));
    }
    metric_lines.push(metric_line("Hours Completed", &summary.effective.to_string()));
    metric_lines.push(metric_line("Gross Hours", &summary.gross.to_string()));
    metric_lines.push(metric_line("Break Time", &summary.break_time.to_string()));

    // Layout inside the card: metrics, gauge, spacer, targets
    let chunks = Layout::vertical([
        Constraint::Length(metric_lines.len() as u16),
        Constraint::Length(1), // Progress gauge
        Constraint::Length(1), // Spacer
        Constraint::Min(3),    // Target rows
    ])
    .split(inner);

    frame.render_widget(Paragraph::new(metric_lines), chunks[0]);
    render_progress_gauge(frame, summary.progress_percent(), chunks[1]);

    let mut target_lines: Vec<Line> = Vec::new();
    for row in card::target_rows(summary) {
        // The tooltip carries the full story ("Reached at ...",
        // "Estimated ..."); fall back to the short text without one.
        let display = row.tooltip.unwrap_or(row.text);
        let style = if row.reached {
            Style::default().fg(Color::Green).bold()
        } else {
            Style::default().fg(Color::White)
        };
        target_lines.push(Line::from(vec![
            Span::styled(format!(" {}  ", row.label), Style::default().fg(LABEL_COLOR)),
            Span::styled(display, style),
        ]));
    }
    frame.render_widget(Paragraph::new(target_lines), chunks[3]);
}

/// Render the collapsed dashboard: a title bar with just the headline number.
fn render_minimized_bar(frame: &mut Frame, app: &App, area: Rect) {
    let bar_area = Rect {
        height: area.height.min(3),
        ..area
    };

    let headline = match &app.summary {
        Some(summary) => format!("Hours Completed: {}", summary.effective),
        None => "Waiting for data".to_string(),
    };

    let bar = Paragraph::new(Line::from(vec![
        Span::styled(headline, Style::default().fg(Color::White).bold()),
        Span::raw("   "),
        Span::styled("m", Style::default().fg(Color::Yellow)),
        Span::raw(" expand"),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(BORDER_CARD))
            .title(" Keka Hours "),
    );
    frame.render_widget(bar, bar_area);
}

/// Build a "Label: value" line for the metrics section.
fn metric_line(label: &str, value: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!(" {}: ", label), Style::default().fg(LABEL_COLOR)),
        Span::styled(value.to_string(), Style::default().fg(Color::White).bold()),
    ])
}

/// Render the progress gauge toward a full working day.
fn render_progress_gauge(frame: &mut Frame, percent: u16, area: Rect) {
    let gauge_color = if percent >= 100 { GAUGE_DONE } else { GAUGE_ACTIVE };

    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(gauge_color).bg(GAUGE_TRACK))
        .ratio(f64::from(percent) / 100.0)
        .label(Span::styled(
            format!("{}% of 8h", percent),
            Style::default().fg(Color::White).bold(),
        ));

    let gauge_area = Rect {
        x: area.x + 1,
        width: area.width.saturating_sub(2),
        ..area
    };
    frame.render_widget(gauge, gauge_area);
}

/// Render the stored snapshot, preferring structure over rendered text.
fn render_snapshot_body(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER_CARD))
        .title(" Stored Snapshot ")
        .title_style(Style::default().fg(Color::Cyan).bold());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    // Fallback chain: structured summary, then card text, then digest
    let (body, updated_at) = if let Some((summary, updated_at)) = &app.snapshot.summary {
        (card::render_card(summary), Some(*updated_at))
    } else if let Some((text, updated_at)) = &app.snapshot.card {
        (text.clone(), Some(*updated_at))
    } else if let Some((text, updated_at)) = &app.snapshot.digest {
        (text.clone(), Some(*updated_at))
    } else {
        let placeholder =
            Paragraph::new(" No data available. Please open the Keka Attendance page.")
                .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(placeholder, inner);
        return;
    };

    let mut lines: Vec<Line> = Vec::new();
    if let Some(updated_at) = updated_at {
        lines.push(Line::from(Span::styled(
            format!(" as of {}", format_relative_time(updated_at)),
            Style::default().fg(Color::DarkGray),
        )));
        lines.push(Line::raw(""));
    }
    for line in body.lines() {
        lines.push(Line::raw(format!(" {}", line)));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Render the footer for the dashboard view.
fn render_dashboard_footer(frame: &mut Frame, app: &App, area: Rect) {
    let mut footer_spans = vec![
        Span::styled(" Tab", Style::default().fg(Color::Yellow)),
        Span::raw(" snapshot  "),
        Span::styled("r", Style::default().fg(Color::Yellow)),
        Span::raw(" refresh  "),
        Span::styled("m", Style::default().fg(Color::Yellow)),
        Span::raw(if app.minimized {
            " expand  "
        } else {
            " minimize  "
        }),
        Span::styled("q", Style::default().fg(Color::Yellow)),
        Span::raw(" quit  "),
        Span::raw("│ "),
        Span::styled(
            match app.refreshed_at {
                Some(ts) => format!("updated {}", format_relative_time(ts)),
                None => "no data yet".to_string(),
            },
            Style::default().fg(Color::DarkGray),
        ),
    ];

    // Show a sync indicator while a refresh is in flight
    if app.refreshing {
        footer_spans.push(Span::raw(" │ "));
        footer_spans.push(Span::styled(
            "● SYNC",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ));
    }

    // Unfocused terminals pause the refresh schedule
    if !app.focused {
        footer_spans.push(Span::raw(" │ "));
        footer_spans.push(Span::styled(
            "paused",
            Style::default().fg(Color::DarkGray),
        ));
    }

    let footer = Line::from(footer_spans);
    frame.render_widget(Paragraph::new(footer), area);
}

/// Render the footer for the snapshot view.
fn render_snapshot_footer(frame: &mut Frame, area: Rect) {
    let footer = Line::from(vec![
        Span::styled(" Esc", Style::default().fg(Color::Yellow)),
        Span::raw(" back  "),
        Span::styled("r", Style::default().fg(Color::Yellow)),
        Span::raw(" reload  "),
        Span::styled("q", Style::default().fg(Color::Yellow)),
        Span::raw(" quit  "),
        Span::raw("│ "),
        Span::styled("stored data", Style::default().fg(Color::DarkGray)),
    ]);

    frame.render_widget(Paragraph::new(footer), area);
}
