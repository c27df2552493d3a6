use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, BorderType, List, ListItem, ListState, Paragraph, StatefulWidget, Widget, Wrap},
};

use crate::app::{clamp_selection, App};
use crate::modules::marketplace::Marketplace;
use crate::modules::quest::Quest;
use crate::ui::components::UiComponent;
use crate::ui::style;

pub fn render_find(app: &App, marketplace: &Marketplace, area: Rect, buf: &mut Buffer) {
    let open = marketplace.list_open();
    if open.is_empty() {
        UiComponent::empty_message(
            "No open quests right now. Post one and let someone else do the running!",
            Some(" Open Quests "),
        )
        .render(area, buf);
        return;
    }

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    let selected = clamp_selection(app.find_selected, open.len());
    let items: Vec<ListItem> = open
        .iter()
        .map(|quest| {
            let mine = quest.is_posted_by(&marketplace.user().username);
            let active = marketplace.session().holds(&quest.id);
            let tag = match (active, mine) {
                (true, _) => " [ACTIVE]",
                (false, true) => " [YOURS]",
                _ => "",
            };
            ListItem::new(Line::from(vec![
                Span::styled("● ", Style::default().fg(style::urgency_color(quest.urgency))),
                Span::raw(quest.title.clone()),
                Span::styled(format!("  ₹{}", quest.reward), Style::default().fg(Color::Green)),
                Span::styled(tag, Style::default().fg(Color::Yellow)),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::bordered()
                .border_type(BorderType::Rounded)
                .title(format!(" Open Quests ({}) ", open.len()))
                .title_bottom(format!(" ₹{} up for grabs ", marketplace.dashboard_stats().open_bounty)),
        )
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("▶ ");

    let mut state = ListState::default().with_selected(Some(selected));
    StatefulWidget::render(list, columns[0], buf, &mut state);

    render_details(open[selected], columns[1], buf);
}

fn render_details(quest: &Quest, area: Rect, buf: &mut Buffer) {
    let label = |text: &'static str| Span::styled(text, Style::default().fg(Color::Gray));

    let lines = vec![
        Line::from(quest.title.clone()).bold().fg(Color::White),
        Line::from(""),
        Line::from(quest.description.clone()),
        Line::from(""),
        Line::from(vec![
            label("Bounty    "),
            Span::styled(format!("₹{}", quest.reward), Style::default().fg(Color::Green).bold()),
            Span::styled(format!("  +{} XP", quest.xp), Style::default().fg(Color::Cyan)),
        ]),
        Line::from(vec![
            label("Urgency   "),
            Span::styled(quest.urgency.as_str(), Style::default().fg(style::urgency_color(quest.urgency))),
        ]),
        Line::from(vec![label("Deadline  "), Span::raw(quest.deadline.clone())]),
        Line::from(vec![
            label("Location  "),
            Span::raw(quest.location.clone().unwrap_or_else(|| "Not specified".to_string())),
        ]),
        Line::from(vec![label("Posted by "), Span::raw(quest.posted_by.clone())]),
    ];

    Paragraph::new(lines)
        .block(
            Block::bordered()
                .border_type(BorderType::Rounded)
                .title(" Quest Details ")
                .title_bottom(" a: accept "),
        )
        .wrap(Wrap { trim: true })
        .render(area, buf);
}
