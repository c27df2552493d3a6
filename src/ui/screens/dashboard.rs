use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, BorderType, Gauge, List, ListItem, Paragraph, Widget},
};

use crate::modules::leaderboard::XP_PER_LEVEL;
use crate::modules::marketplace::Marketplace;
use crate::modules::wallet::TransactionKind;
use crate::ui::components::UiComponent;

const RECENT_ROWS: usize = 8;

pub fn render_dashboard(marketplace: &Marketplace, area: Rect, buf: &mut Buffer) {
    let stats = marketplace.dashboard_stats();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),  // Stat cards
            Constraint::Length(3),  // Level progress
            Constraint::Min(1),     // Activity + transactions
        ])
        .split(area);

    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(rows[0]);

    let card_values = [
        ("Balance", format!("₹{}", stats.balance), Color::Green),
        ("Total XP", format!("{} (Lv {})", stats.total_xp, stats.level), Color::Cyan),
        ("Tasks Done", format!("{} • ₹{} earned", stats.tasks_done, stats.total_earned), Color::Magenta),
        ("In Escrow", format!("₹{} • {} open", stats.escrowed, stats.open_posted), Color::Yellow),
    ];
    for ((title, value, color), rect) in card_values.into_iter().zip(cards.iter()) {
        Paragraph::new(value)
            .style(Style::default().fg(color).bold())
            .alignment(Alignment::Center)
            .block(Block::bordered().border_type(BorderType::Rounded).title(format!(" {} ", title)))
            .render(*rect, buf);
    }

    let into_level = stats.total_xp.rem_euclid(XP_PER_LEVEL);
    Gauge::default()
        .block(Block::bordered().border_type(BorderType::Rounded).title(format!(" {} ", stats.badge)))
        .gauge_style(Style::default().fg(Color::Cyan))
        .ratio(into_level as f64 / XP_PER_LEVEL as f64)
        .label(format!("{}/{} XP to level {}", into_level, XP_PER_LEVEL, stats.level + 1))
        .render(rows[1], buf);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[2]);

    render_activity(marketplace, columns[0], buf);
    render_transactions(marketplace, columns[1], buf);
}

fn render_activity(marketplace: &Marketplace, area: Rect, buf: &mut Buffer) {
    let activity = marketplace.activity();
    if activity.is_empty() {
        UiComponent::empty_message("Complete a quest to see it here.", Some(" Completed Quests "))
            .render(area, buf);
        return;
    }

    let items: Vec<ListItem> = activity
        .iter()
        .take(RECENT_ROWS)
        .map(|quest| {
            ListItem::new(Line::from(vec![
                Span::styled("✔ ", Style::default().fg(Color::Green)),
                Span::raw(quest.title.clone()),
                Span::styled(format!("  +₹{} +{} XP", quest.reward, quest.xp), Style::default().fg(Color::Gray)),
            ]))
        })
        .collect();

    List::new(items)
        .block(Block::bordered().border_type(BorderType::Rounded).title(" Completed Quests "))
        .render(area, buf);
}

fn render_transactions(marketplace: &Marketplace, area: Rect, buf: &mut Buffer) {
    let transactions = marketplace.wallet().transactions();
    if transactions.is_empty() {
        UiComponent::empty_message("No transactions yet.", Some(" Recent Transactions ")).render(area, buf);
        return;
    }

    let items: Vec<ListItem> = transactions
        .iter()
        .take(RECENT_ROWS)
        .map(|txn| {
            let color = match txn.kind {
                TransactionKind::Credit => Color::Green,
                TransactionKind::Debit => Color::Red,
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{:>8} ", txn.signed_display()), Style::default().fg(color).bold()),
                Span::raw(txn.description.clone()),
            ]))
        })
        .collect();

    List::new(items)
        .block(Block::bordered().border_type(BorderType::Rounded).title(" Recent Transactions "))
        .render(area, buf);
}
