use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style, Stylize},
    text::Line,
    widgets::{Block, BorderType, Paragraph, Widget},
};

use crate::app::{App, LoginField};
use crate::ui::components::UiComponent;
use crate::ui::{centered_rect, style};

pub fn render_login(app: &App, area: Rect, buf: &mut Buffer) {
    let card = centered_rect(50, 60, area);

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),  // Title
            Constraint::Length(3),  // Name
            Constraint::Length(3),  // Email
            Constraint::Min(0),
            Constraint::Length(4),  // Help
        ])
        .split(card);

    Paragraph::new(vec![
        Line::from("CampusJugaad").bold().fg(style::ACCENT),
        Line::from("Post errands, earn bounties, level up").fg(Color::Gray),
    ])
    .alignment(Alignment::Center)
    .block(Block::bordered().border_type(BorderType::Rounded))
    .render(layout[0], buf);

    let fields = [
        (LoginField::Name, "Name", app.login.name.as_str(), layout[1]),
        (LoginField::Email, "College email (optional)", app.login.email.as_str(), layout[2]),
    ];

    for (field, label, value, rect) in fields {
        let focused = app.login.field == field;
        let cursor = if focused { "_" } else { "" };
        Paragraph::new(format!("{}{}", value, cursor))
            .style(style::dim_unless_focused(focused, Style::default().fg(Color::White)))
            .block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .border_style(if focused {
                        Style::default().fg(Color::Yellow)
                    } else {
                        Style::default().fg(Color::DarkGray)
                    })
                    .title(format!(" {} ", label)),
            )
            .render(rect, buf);
    }

    UiComponent::help("Enter: log in (leave both empty for guest) • Tab: switch field • Esc: quit")
        .render(layout[4], buf);
}
