pub mod active_quest;
pub mod components;
pub mod overlays;
pub mod screens;
pub mod style;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, BorderType, Clear, Paragraph, Tabs, Widget},
};

use crate::app::{App, Overlay, Tab};
use crate::modules::marketplace::Marketplace;
use components::UiComponent;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match &self.marketplace {
            None => screens::login::render_login(self, area, buf),
            Some(marketplace) => render_main(self, marketplace, area, buf),
        }

        if let Some(toast) = &self.toast {
            let width = (toast.message.chars().count() as u16 + 4).min(area.width);
            let toast_area = Rect {
                x: area.right().saturating_sub(width),
                y: area.y,
                width,
                height: 3.min(area.height),
            };
            Clear.render(toast_area, buf);
            UiComponent::toast(&toast.message, style::notification_color(toast.kind))
                .render(toast_area, buf);
        }
    }
}

fn render_main(app: &App, marketplace: &Marketplace, area: Rect, buf: &mut Buffer) {
    let active_bar_height = if marketplace.session().is_engaged() { 4 } else { 0 };

    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),                  // Header
            Constraint::Length(3),                  // Tabs
            Constraint::Min(1),                     // Content
            Constraint::Length(active_bar_height),  // Active quest
            Constraint::Length(3),                  // Help
        ])
        .split(area);

    render_header(marketplace, main_layout[0], buf);

    let titles = Tab::all()
        .iter()
        .enumerate()
        .map(|(i, tab)| format!("{} {}", i + 1, tab.title()))
        .collect::<Vec<_>>();
    Tabs::new(titles)
        .block(Block::bordered().border_type(BorderType::Rounded))
        .select(app.tab.index())
        .style(Style::default().fg(Color::Gray))
        .highlight_style(Style::default().fg(style::ACCENT).bold())
        .render(main_layout[1], buf);

    match app.tab {
        Tab::Post => screens::post::render_post(app, marketplace, main_layout[2], buf),
        Tab::Find => screens::find::render_find(app, marketplace, main_layout[2], buf),
        Tab::Dashboard => screens::dashboard::render_dashboard(marketplace, main_layout[2], buf),
        Tab::Leaderboard => screens::leaderboard::render_leaderboard(marketplace, main_layout[2], buf),
    }

    if active_bar_height > 0 {
        active_quest::render_active_quest(marketplace, main_layout[3], buf);
    }

    UiComponent::help(&help_keys(app)).render(main_layout[4], buf);

    if let Some(overlay) = &app.overlay {
        let popup = centered_rect(60, 70, area);
        Clear.render(popup, buf);
        match overlay {
            Overlay::Wallet { action, amount } => {
                overlays::wallet::render_wallet(marketplace, *action, amount, popup, buf)
            }
            Overlay::Notifications => overlays::notifications::render_notifications(marketplace, popup, buf),
            Overlay::Verify { code } => overlays::verify::render_verify(marketplace, code, popup, buf),
            Overlay::Chat { chat, input } => overlays::chat::render_chat(chat, input, popup, buf),
        }
    }
}

fn render_header(marketplace: &Marketplace, area: Rect, buf: &mut Buffer) {
    let stats = marketplace.dashboard_stats();
    let user = marketplace.user();

    let line = Line::from(vec![
        Span::styled(" CampusJugaad ", Style::default().fg(Color::Black).bg(style::ACCENT).bold()),
        Span::raw("  "),
        Span::styled(format!("[{}] {}", user.initials(), user.name), Style::default().fg(Color::White).bold()),
        Span::styled(format!("  Lv {} {}  {} XP", stats.level, stats.badge, stats.total_xp), Style::default().fg(Color::Cyan)),
        Span::styled(format!("  Wallet ₹{}", stats.balance), Style::default().fg(Color::Green).bold()),
        Span::styled(
            format!("  Alerts {}", stats.unread_notifications),
            if stats.unread_notifications > 0 {
                Style::default().fg(Color::Yellow).bold()
            } else {
                Style::default().fg(Color::DarkGray)
            },
        ),
    ]);

    Paragraph::new(line)
        .block(Block::bordered().border_type(BorderType::Rounded))
        .alignment(Alignment::Left)
        .render(area, buf);
}

fn help_keys(app: &App) -> String {
    match &app.overlay {
        Some(Overlay::Wallet { .. }) => "Digits: amount • Tab: deposit/withdraw • Enter: confirm • Esc: close".into(),
        Some(Overlay::Notifications) => "x: clear all • Esc: close".into(),
        Some(Overlay::Verify { .. }) => "Type the 4-digit OTP • Enter: verify • Esc: close".into(),
        Some(Overlay::Chat { .. }) => "Type a message • Enter: send • Esc: close chat".into(),
        None if app.tab == Tab::Post && app.post.editing => {
            "Tab/↑↓: field • ←→: urgency • Enter: post quest • Esc: stop editing".into()
        }
        None => {
            let tab_keys = match app.tab {
                Tab::Post => "e: edit form • ",
                Tab::Find => "↑↓: select • a: accept • r: refresh • ",
                Tab::Dashboard | Tab::Leaderboard => "",
            };
            let quest_keys = if app.is_engaged() { "v: verify • c: chat • " } else { "" };
            format!("{}{}1-4: tabs • w: wallet • n: alerts • L: logout • q: quit", tab_keys, quest_keys)
        }
    }
}

pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
