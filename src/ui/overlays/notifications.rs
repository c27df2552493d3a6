use chrono::Utc;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, BorderType, List, ListItem, Widget},
};

use crate::modules::marketplace::Marketplace;
use crate::modules::notification::relative_age;
use crate::ui::components::UiComponent;
use crate::ui::style;

pub fn render_notifications(marketplace: &Marketplace, area: Rect, buf: &mut Buffer) {
    let log = marketplace.notifications();
    if log.is_empty() {
        UiComponent::empty_message("You're all caught up.", Some(" Notifications ")).render(area, buf);
        return;
    }

    let now = Utc::now();
    let items: Vec<ListItem> = log
        .entries()
        .iter()
        .map(|n| {
            let color = style::notification_color(n.kind);
            ListItem::new(vec![
                Line::from(vec![
                    Span::styled(if n.read { "  " } else { "● " }, Style::default().fg(color)),
                    Span::styled(n.title.clone(), Style::default().fg(color).bold()),
                    Span::styled(format!("  {}", relative_age(n.time, now)), Style::default().fg(Color::DarkGray)),
                ]),
                Line::from(format!("  {}", n.message)),
            ])
        })
        .collect();

    List::new(items)
        .block(
            Block::bordered()
                .border_type(BorderType::Rounded)
                .title(format!(" Notifications ({} unread) ", log.unread_count()))
                .title_bottom(" x: clear all "),
        )
        .render(area, buf);
}
