use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, BorderType, List, ListItem, Paragraph, Widget},
};

use crate::app::WalletAction;
use crate::modules::marketplace::Marketplace;
use crate::modules::wallet::{TransactionKind, TransactionStatus};

pub fn render_wallet(marketplace: &Marketplace, action: WalletAction, amount: &str, area: Rect, buf: &mut Buffer) {
    let block = Block::bordered()
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Green))
        .title(" Wallet ");
    let inner = block.inner(area);
    block.render(area, buf);

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),  // Balance
            Constraint::Length(1),  // Action toggle
            Constraint::Length(3),  // Amount
            Constraint::Min(1),     // History
        ])
        .split(inner);

    Paragraph::new(format!("₹{}", marketplace.wallet().balance()))
        .style(Style::default().fg(Color::Green).bold())
        .alignment(Alignment::Center)
        .block(Block::bordered().title(" Available Balance "))
        .render(layout[0], buf);

    let tab = |label: &'static str, selected: bool| {
        if selected {
            Span::styled(format!(" {} ", label), Style::default().fg(Color::Black).bg(Color::Green).bold())
        } else {
            Span::styled(format!(" {} ", label), Style::default().fg(Color::Gray))
        }
    };
    Paragraph::new(Line::from(vec![
        tab("Add Money", action == WalletAction::Deposit),
        Span::raw("  "),
        tab("Withdraw", action == WalletAction::Withdraw),
    ]))
    .alignment(Alignment::Center)
    .render(layout[1], buf);

    Paragraph::new(format!("₹{}_", amount))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::bordered().border_type(BorderType::Rounded).title(" Amount "))
        .render(layout[2], buf);

    let items: Vec<ListItem> = marketplace
        .wallet()
        .transactions()
        .iter()
        .map(|txn| {
            let color = match (txn.status, txn.kind) {
                (TransactionStatus::Failed, _) => Color::DarkGray,
                (_, TransactionKind::Credit) => Color::Green,
                (_, TransactionKind::Debit) => Color::Red,
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{:>8} ", txn.signed_display()), Style::default().fg(color).bold()),
                Span::raw(txn.description.clone()),
                Span::styled(
                    format!("  {} • {}", txn.id, txn.timestamp.format("%b %d %H:%M")),
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
        })
        .collect();

    List::new(items)
        .block(Block::bordered().title(" Transaction History "))
        .render(layout[3], buf);
}
