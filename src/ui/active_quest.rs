use chrono::Utc;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, BorderType, Paragraph, Widget},
};

use crate::modules::marketplace::Marketplace;
use crate::modules::session::Countdown;

/// Pinned bar for the held quest. There is no close control; it goes away on verification.
pub fn render_active_quest(marketplace: &Marketplace, area: Rect, buf: &mut Buffer) {
    let Some(quest) = marketplace.session().active_quest() else {
        return;
    };

    let (timer, timer_color) = match marketplace.countdown(Utc::now()) {
        Some(Countdown::Expired) | None => ("EXPIRED".to_string(), Color::Red),
        Some(remaining) => (remaining.to_string(), Color::Yellow),
    };

    let lines = vec![
        Line::from(vec![
            Span::styled(quest.title.clone(), Style::default().fg(Color::White).bold()),
            Span::styled(format!("  ₹{}", quest.reward), Style::default().fg(Color::Green).bold()),
            Span::styled(
                format!("  @ {}", quest.location.as_deref().unwrap_or("Campus")),
                Style::default().fg(Color::Gray),
            ),
        ]),
        Line::from(vec![
            Span::styled("Time left ", Style::default().fg(Color::Gray)),
            Span::styled(timer, Style::default().fg(timer_color).bold()),
            Span::styled("   v: enter OTP • c: chat with Task Master", Style::default().fg(Color::DarkGray)),
        ]),
    ];

    Paragraph::new(lines)
        .block(
            Block::bordered()
                .border_type(BorderType::Thick)
                .border_style(Style::default().fg(Color::Magenta))
                .title(" Active Quest "),
        )
        .render(area, buf);
}
