//! Layout components (form area, status bar)

use crate::app::App;
use crate::state::{FieldName, Phase};
use ratatui::{
    layout::{Constraint, Direction, Flex, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Widest the form is drawn
const FORM_MAX_WIDTH: u16 = 64;

/// Create the main layout: a centered form column above a status bar
pub fn create_layout(area: Rect) -> Rect {
    // Reserve bottom line for status bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    let [column] = Layout::horizontal([Constraint::Max(FORM_MAX_WIDTH)])
        .flex(Flex::Center)
        .areas(chunks[0]);
    column
}

/// Draw the status bar
pub fn draw_status_bar(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let status_area = Rect {
        x: 0,
        y: area.height.saturating_sub(1),
        width: area.width,
        height: 1,
    };

    let phase = app.form.phase();
    let (marker, color) = match phase {
        Phase::Idle => (" ● ", Color::Green),
        Phase::Submitting => (" ◌ ", Color::Yellow),
        Phase::Submitted => (" ✔ ", Color::Cyan),
    };

    let spans = vec![
        Span::styled(marker, Style::default().fg(color)),
        Span::styled(
            get_hints(app.active_field_name()),
            Style::default().fg(Color::Gray),
        ),
    ];

    let status = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status, status_area);

    // Render quit hint on the right
    let quit_hint = "Esc:quit ";
    let quit_area = Rect {
        x: area.width.saturating_sub(quit_hint.len() as u16),
        y: area.height.saturating_sub(1),
        width: quit_hint.len() as u16,
        height: 1,
    };
    let quit_widget =
        Paragraph::new(quit_hint).style(Style::default().bg(Color::DarkGray).fg(Color::Gray));
    frame.render_widget(quit_widget, quit_area);
}

fn get_hints(active: Option<FieldName>) -> &'static str {
    match active {
        Some(FieldName::Course) => "←/→:choose course  Tab:next  Enter:register",
        Some(_) => "type to edit  Tab:next  Shift+Tab:prev  Enter:register",
        None => "Enter:register  Tab:next",
    }
}
