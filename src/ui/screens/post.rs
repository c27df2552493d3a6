use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, BorderType, List, ListItem, Paragraph, Widget},
};

use crate::app::{App, PostField};
use crate::modules::marketplace::Marketplace;
use crate::modules::quest::QuestStatus;
use crate::ui::components::UiComponent;
use crate::ui::style;

pub fn render_post(app: &App, marketplace: &Marketplace, area: Rect, buf: &mut Buffer) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    render_form(app, marketplace, columns[0], buf);
    render_posted(marketplace, columns[1], buf);
}

fn render_form(app: &App, marketplace: &Marketplace, area: Rect, buf: &mut Buffer) {
    let title = if app.post.editing { " New Quest (editing) " } else { " New Quest (e to edit) " };
    let block = Block::bordered()
        .border_type(BorderType::Rounded)
        .title(title)
        .title_bottom(format!(" Wallet ₹{} ", marketplace.wallet().balance()));
    let inner = block.inner(area);
    block.render(area, buf);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(PostField::all().map(|_| Constraint::Length(3)))
        .split(inner);

    for (field, rect) in PostField::all().into_iter().zip(rows.iter()) {
        let focused = app.post.editing && app.post.field == field;
        let error = app.post.errors.get(field.error_key());

        let border = match (focused, error) {
            (_, Some(_)) => Style::default().fg(Color::Red),
            (true, None) => Style::default().fg(Color::Yellow),
            (false, None) => Style::default().fg(Color::DarkGray),
        };

        let value = if field == PostField::Urgency {
            let urgency = app.post.form.urgency;
            Line::from(vec![
                Span::raw("◀ "),
                Span::styled(urgency.as_str(), Style::default().fg(style::urgency_color(urgency)).bold()),
                Span::raw(" ▶"),
            ])
        } else {
            let cursor = if focused { "_" } else { "" };
            Line::from(format!("{}{}", app.post.value(field), cursor))
        };

        let mut block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border)
            .title(format!(" {} ", field.label()));
        if let Some(message) = error {
            block = block.title_bottom(Line::from(format!(" {} ", message)).fg(Color::Red));
        }

        Paragraph::new(value)
            .style(style::dim_unless_focused(focused || !app.post.editing, Style::default()))
            .block(block)
            .render(*rect, buf);
    }
}

fn render_posted(marketplace: &Marketplace, area: Rect, buf: &mut Buffer) {
    let posted = marketplace.list_posted();
    if posted.is_empty() {
        UiComponent::empty_message("You haven't posted any quests yet.", Some(" Your Quests "))
            .render(area, buf);
        return;
    }

    let items: Vec<ListItem> = posted
        .iter()
        .map(|quest| {
            let (status, color) = match quest.status {
                QuestStatus::Open if quest.has_code() => ("IN PROGRESS", Color::Yellow),
                QuestStatus::Open => ("OPEN", Color::Cyan),
                QuestStatus::Completed => ("DONE", Color::Green),
            };
            ListItem::new(vec![
                Line::from(vec![
                    Span::styled(format!("{:<12}", status), Style::default().fg(color).bold()),
                    Span::styled(quest.title.clone(), Style::default().fg(Color::White)),
                ]),
                Line::from(format!("            ₹{} • due {}", quest.reward, quest.deadline)).fg(Color::Gray),
            ])
        })
        .collect();

    List::new(items)
        .block(
            Block::bordered()
                .border_type(BorderType::Rounded)
                .title(format!(" Your Quests ({}) ", posted.len())),
        )
        .render(area, buf);
}
