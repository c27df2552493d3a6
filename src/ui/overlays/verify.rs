use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style, Stylize},
    text::Line,
    widgets::{Block, BorderType, Paragraph, Widget},
};

use crate::modules::marketplace::Marketplace;

pub fn render_verify(marketplace: &Marketplace, code: &str, area: Rect, buf: &mut Buffer) {
    let block = Block::bordered()
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" Verify Completion ");
    let inner = block.inner(area);
    block.render(area, buf);

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Length(3), Constraint::Min(0)])
        .split(inner);

    let title = marketplace
        .session()
        .active_quest()
        .map(|q| q.title.as_str())
        .unwrap_or("No active quest");
    Paragraph::new(vec![
        Line::from(title).bold(),
        Line::from("Ask the Task Master for the OTP once the job is done.").fg(Color::Gray),
    ])
    .alignment(Alignment::Center)
    .render(layout[0], buf);

    let slots = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(5),
            Constraint::Length(5),
            Constraint::Length(5),
            Constraint::Length(5),
            Constraint::Min(0),
        ])
        .split(layout[1]);

    let digits: Vec<char> = code.chars().collect();
    for (i, rect) in slots[1..5].iter().enumerate() {
        let (text, color) = match digits.get(i) {
            Some(d) => (d.to_string(), Color::White),
            None if i == digits.len() => ("_".to_string(), Color::Yellow),
            None => (" ".to_string(), Color::DarkGray),
        };
        Paragraph::new(text)
            .alignment(Alignment::Center)
            .style(Style::default().fg(color).bold())
            .block(Block::bordered().border_style(Style::default().fg(color)))
            .render(*rect, buf);
    }
}
