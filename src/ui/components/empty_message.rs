use ratatui::{
    layout::Alignment,
    prelude::{Color, Stylize, Style},
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
};

use super::UiComponent;

impl UiComponent {
    pub fn empty_message<'a>(text: &'a str, title: Option<&'a str>) -> Paragraph<'a> {
        let mut block = Block::default()
            .padding(Padding::symmetric(1, 1));

        if let Some(title) = title {
            block = block
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(title);
        }

        Paragraph::new(text)
            .block(block)
            .style(Style::default().fg(Color::Gray).italic())
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
    }
}
