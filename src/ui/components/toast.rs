use ratatui::{
    layout::Alignment,
    prelude::{Color, Modifier, Style},
    widgets::{Block, BorderType, Paragraph},
};

use super::UiComponent;

impl UiComponent {
    pub fn toast(message: &str, color: Color) -> Paragraph<'_> {
        Paragraph::new(message)
            .block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(color))
            )
            .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center)
    }
}
