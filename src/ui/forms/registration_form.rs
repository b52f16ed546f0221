//! Student registration form rendering

use super::field_renderer::{draw_field, FieldView, FIELD_HEIGHT};
use crate::app::App;
use crate::state::{FieldName, Phase};
use crate::ui::components::{render_button, render_error_banner, BUTTON_HEIGHT};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders},
    Frame,
};

const BANNER_HEIGHT: u16 = 3;

/// Draw the registration form
pub fn draw_registration(frame: &mut Frame, area: Rect, app: &App) {
    let state = app.form.state();

    let block = Block::default()
        .title(" Student Registration ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let banner_height = if state.submission_error.is_some() {
        BANNER_HEIGHT
    } else {
        0
    };

    let mut constraints: Vec<Constraint> = FieldName::ALL
        .iter()
        .map(|_| Constraint::Length(FIELD_HEIGHT))
        .collect();
    constraints.push(Constraint::Length(banner_height));
    constraints.push(Constraint::Length(BUTTON_HEIGHT));
    constraints.push(Constraint::Min(0));

    let chunks = Layout::vertical(constraints).margin(1).split(inner);

    for (index, field) in FieldName::ALL.iter().enumerate() {
        let value = app.display_value(*field);
        draw_field(
            frame,
            chunks[index],
            FieldView {
                label: field.label(),
                value: &value,
                placeholder: placeholder(*field),
                error: state.error_for(*field),
                is_active: app.active_field == index,
            },
        );
    }

    let banner_index = FieldName::ALL.len();
    if let Some(message) = &state.submission_error {
        render_error_banner(frame, chunks[banner_index], message);
    }

    render_button(
        frame,
        chunks[banner_index + 1],
        state.phase.button_label(),
        app.is_button_active(),
        state.phase == Phase::Idle,
    );
}

fn placeholder(field: FieldName) -> &'static str {
    match field {
        FieldName::Name => "Jane Doe",
        FieldName::Email => "jane@example.com",
        FieldName::Age => "16-99",
        FieldName::Course => "← select a course →",
    }
}
