use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, BorderType, Paragraph, Widget, Wrap},
};

use crate::modules::chat::{ChatSession, Sender};

pub fn render_chat(chat: &ChatSession, input: &str, area: Rect, buf: &mut Buffer) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),     // History
            Constraint::Length(3),  // Input
        ])
        .split(area);

    let mut lines = Vec::new();
    for msg in chat.messages() {
        let (prefix, style) = match msg.sender {
            Sender::User => ("You: ", Style::default().fg(Color::Cyan)),
            Sender::Taskmaster => ("Task Master: ", Style::default().fg(Color::Green)),
        };
        lines.push(Line::from(vec![
            Span::styled(prefix, style.add_modifier(Modifier::BOLD)),
            Span::styled(msg.text.clone(), Style::default().fg(Color::White)),
        ]));
        lines.push(Line::from(""));
    }
    if chat.awaiting_reply {
        lines.push(Line::from("Task Master is typing...").fg(Color::DarkGray).italic());
    }

    // Keep the newest messages in view
    let inner_height = layout[0].height.saturating_sub(2);
    let scroll = (lines.len() as u16).saturating_sub(inner_height);

    let mode = if chat.offline { " offline " } else { " online " };
    Paragraph::new(Text::from(lines))
        .block(
            Block::bordered()
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(Color::Green))
                .title(format!(" Task Master • {} ", chat.context.title))
                .title_bottom(mode),
        )
        .wrap(Wrap { trim: true })
        .scroll((scroll, 0))
        .render(layout[0], buf);

    Paragraph::new(format!("> {}_", input))
        .block(Block::bordered().border_type(BorderType::Rounded).title(" Message "))
        .fg(Color::Yellow)
        .render(layout[1], buf);
}
