use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style, Stylize},
    widgets::{Block, BorderType, Cell, Row, Table, Widget},
};

use crate::modules::marketplace::Marketplace;

pub fn render_leaderboard(marketplace: &Marketplace, area: Rect, buf: &mut Buffer) {
    let board = marketplace.leaderboard();

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(area);

    let header = Row::new(["#", "Name", "Hostel", "Level", "XP", "Quests", "Earned"])
        .style(Style::default().fg(Color::Gray).bold());

    let rows = board.entries().iter().map(|entry| {
        let rank_style = match entry.rank {
            1 => Style::default().fg(Color::Yellow).bold(),
            2 => Style::default().fg(Color::White).bold(),
            3 => Style::default().fg(Color::LightRed).bold(),
            _ => Style::default(),
        };
        let row = Row::new(vec![
            Cell::from(entry.rank.to_string()).style(rank_style),
            Cell::from(entry.name.clone()),
            Cell::from(entry.hostel.clone()),
            Cell::from(format!("{} {}", entry.level(), entry.badge())),
            Cell::from(entry.xp.to_string()),
            Cell::from(entry.quests.to_string()),
            Cell::from(format!("₹{}", entry.earnings)),
        ]);
        if entry.is_current_user {
            row.style(Style::default().fg(Color::Magenta).bold())
        } else {
            row
        }
    });

    Table::new(
        rows,
        [
            Constraint::Length(3),
            Constraint::Min(16),
            Constraint::Length(9),
            Constraint::Length(16),
            Constraint::Length(7),
            Constraint::Length(7),
            Constraint::Length(8),
        ],
    )
    .header(header)
    .block(Block::bordered().border_type(BorderType::Rounded).title(" Campus Heroes "))
    .render(columns[0], buf);

    let hostels = board.hostel_standings().iter().enumerate().map(|(i, hostel)| {
        Row::new(vec![
            Cell::from((i + 1).to_string()),
            Cell::from(hostel.name),
            Cell::from(hostel.points.to_string()),
            Cell::from(hostel.members.to_string()),
        ])
    });

    Table::new(
        hostels,
        [Constraint::Length(2), Constraint::Min(9), Constraint::Length(7), Constraint::Length(5)],
    )
    .header(Row::new(["#", "Hostel", "Points", "Crew"]).style(Style::default().fg(Color::Gray).bold()))
    .block(Block::bordered().border_type(BorderType::Rounded).title(" Hostel Wars "))
    .render(columns[1], buf);
}
