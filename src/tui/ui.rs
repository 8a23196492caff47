//! UI layout and rendering logic for the TUI.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use super::app::App;
use crate::output::{resolve_view, ViewState};

const SPINNER_FRAMES: &[&str] = &["|", "/", "-", "\\"];

/// Everything above the status bar; the handler mirrors this geometry
/// when mapping mouse positions onto the pane divider.
pub fn content_area(area: Rect) -> Rect {
    Rect {
        height: area.height.saturating_sub(1),
        ..area
    }
}

/// Render the main UI
pub fn render_ui(frame: &mut Frame, app: &App) {
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // Panes
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    let (editor_area, divider_area, output_area) = app.split.split(main_layout[0]);

    render_editor(frame, app, editor_area);
    render_divider(frame, app, divider_area);
    render_output(frame, app, output_area);
    render_status_bar(frame, app, main_layout[1]);

    if app.show_help {
        render_help_overlay(frame);
    }
}

/// Render the code editor pane
fn render_editor(frame: &mut Frame, app: &App, area: Rect) {
    let title = format!("Editor - {} ({})", app.language.label(), app.kind.label());

    let inner_height = area.height.saturating_sub(2) as usize;
    // Keep the cursor row inside the visible window
    let scroll_y = app.cursor_row.saturating_sub(inner_height.saturating_sub(1));

    let text: Vec<Line> = app
        .lines
        .iter()
        .map(|l| Line::from(l.as_str()))
        .collect();

    let editor = Paragraph::new(Text::from(text))
        .block(Block::default().borders(Borders::ALL).title(title))
        .scroll((scroll_y as u16, 0));

    frame.render_widget(editor, area);

    // Place the terminal cursor at the editing position
    let line = &app.lines[app.cursor_row];
    let prefix: String = line.chars().take(app.cursor_col).collect();
    let cursor_x = area.x + 1 + prefix.width() as u16;
    let cursor_y = area.y + 1 + (app.cursor_row - scroll_y) as u16;
    if cursor_x < area.right().saturating_sub(1) && cursor_y < area.bottom().saturating_sub(1) {
        frame.set_cursor_position((cursor_x, cursor_y));
    }
}

/// Render the draggable divider column
fn render_divider(frame: &mut Frame, app: &App, area: Rect) {
    let style = if app.split.is_dragging() {
        Style::default().fg(Color::Blue)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let bar: Vec<Line> = (0..area.height).map(|_| Line::from("│")).collect();
    frame.render_widget(Paragraph::new(Text::from(bar)).style(style), area);
}

/// Render the output pane in one of its four states
fn render_output(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Visualization Output");

    let view = resolve_view(app.orchestrator.in_flight(), app.orchestrator.outcome(), &app.asset);

    let paragraph = match view {
        ViewState::Loading => {
            let frame_idx = (app.tick / 4) as usize % SPINNER_FRAMES.len();
            Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(
                    format!("{} Generating visualization...", SPINNER_FRAMES[frame_idx]),
                    Style::default().fg(Color::Blue),
                )),
            ])
        }
        ViewState::Error { message } => Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "Generation failed",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                message.to_string(),
                Style::default().fg(Color::Red),
            )),
        ]),
        ViewState::Empty => Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "Your visualization will appear here",
                Style::default().fg(Color::Gray),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Generate a visualization with the editor on the left",
                Style::default().fg(Color::DarkGray),
            )),
        ]),
        ViewState::Image {
            reference,
            logs,
            metadata,
            loaded,
            bytes,
            asset_error,
        } => {
            if let Some(asset_error) = asset_error {
                Paragraph::new(vec![
                    Line::from(reference.to_string()),
                    Line::from(""),
                    Line::from(Span::styled(
                        format!("Could not fetch the image: {}", asset_error),
                        Style::default().fg(Color::Yellow),
                    )),
                ])
            } else if !loaded {
                // Skeleton placeholder until the asset fetch completes
                Paragraph::new(vec![
                    Line::from(""),
                    Line::from(Span::styled(
                        "Loading visualization...",
                        Style::default().fg(Color::DarkGray),
                    )),
                ])
            } else {
                let mut lines = vec![
                    Line::from(Span::styled(
                        "Image ready",
                        Style::default()
                            .fg(Color::Green)
                            .add_modifier(Modifier::BOLD),
                    )),
                    Line::from(""),
                    Line::from(reference.to_string()),
                ];
                if let Some(bytes) = bytes {
                    lines.push(Line::from(format!("{} bytes", bytes)));
                }
                append_metadata(&mut lines, metadata);
                append_logs(&mut lines, logs);
                Paragraph::new(lines)
            }
        }
        ViewState::Interactive {
            reference,
            logs,
            metadata,
        } => {
            let mut lines = vec![
                Line::from(Span::styled(
                    "Interactive document",
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                Line::from(reference.to_string()),
                Line::from(""),
                Line::from(Span::styled(
                    "Open the URL in a browser to interact with it",
                    Style::default().fg(Color::DarkGray),
                )),
            ];
            append_metadata(&mut lines, metadata);
            append_logs(&mut lines, logs);
            Paragraph::new(lines)
        }
    };

    frame.render_widget(paragraph.block(block).wrap(Wrap { trim: true }), area);
}

fn append_metadata(lines: &mut Vec<Line>, metadata: Option<&serde_json::Value>) {
    if let Some(metadata) = metadata {
        lines.push(Line::from(Span::styled(
            format!("metadata: {}", metadata),
            Style::default().fg(Color::DarkGray),
        )));
    }
}

fn append_logs(lines: &mut Vec<Line>, logs: Option<&str>) {
    if let Some(logs) = logs {
        if !logs.trim().is_empty() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "Logs:",
                Style::default().add_modifier(Modifier::BOLD),
            )));
            for log_line in logs.lines() {
                lines.push(Line::from(log_line.to_string()));
            }
        }
    }
}

/// Render the status bar
fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let status_paragraph = Paragraph::new(app.status_message.clone())
        .style(Style::default().bg(Color::DarkGray).fg(Color::White));

    frame.render_widget(status_paragraph, area);
}

/// Render help overlay
fn render_help_overlay(frame: &mut Frame) {
    let popup_area = centered_rect(70, 60, frame.area());
    frame.render_widget(Clear, popup_area);

    let help_lines = vec![
        Line::from("Script Visualizer Help"),
        Line::from(""),
        Line::from("Editing:"),
        Line::from("  Arrows      - Move cursor"),
        Line::from("  Home/End    - Start/end of line"),
        Line::from("  Tab         - Insert four spaces"),
        Line::from(""),
        Line::from("Actions:"),
        Line::from("  Ctrl+G      - Generate visualization"),
        Line::from("  F2          - Switch language (Python/R)"),
        Line::from("  F3          - Switch type (static/interactive)"),
        Line::from("  F1          - Toggle this help"),
        Line::from("  Ctrl+C      - Quit"),
        Line::from(""),
        Line::from("Panes:"),
        Line::from("  Drag the divider with the mouse to resize"),
    ];

    let help_paragraph = Paragraph::new(Text::from(help_lines))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Help")
                .title_style(
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                ),
        )
        .wrap(Wrap { trim: true });

    frame.render_widget(help_paragraph, popup_area);
}

/// Helper function to create a centered rectangle
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
