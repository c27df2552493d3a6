use ratatui::{
    layout::Alignment,
    prelude::{Color, Style},
    widgets::{Block, BorderType, Paragraph, Wrap},
};

use super::UiComponent;

impl UiComponent {
    pub fn help(text: &str) -> Paragraph<'_> {
        Paragraph::new(text)
            .block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(Color::DarkGray))
                    .title(" Keys ")
            )
            .style(Style::default().fg(Color::Yellow))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
    }
}
