//! Toast notification overlay

use crate::backend::Notification;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

const TOAST_WIDTH: u16 = 44;
const TOAST_HEIGHT: u16 = 5;

/// Render a notification in the top-right corner
pub fn render_toast(frame: &mut Frame, notification: &Notification) {
    let area = frame.area();
    let width = TOAST_WIDTH.min(area.width);
    let toast_area = Rect {
        x: area.x + area.width.saturating_sub(width + 1),
        y: area.y + 1,
        width,
        height: TOAST_HEIGHT.min(area.height),
    };

    // Clear the area behind the toast
    frame.render_widget(Clear, toast_area);

    let content = vec![
        Line::from(Span::styled(
            notification.title.as_str(),
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(notification.description.as_str()),
    ];

    let toast = Paragraph::new(content)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Green))
                .style(Style::default().bg(Color::Black)),
        )
        .style(Style::default().bg(Color::Black));

    frame.render_widget(toast, toast_area);
}
