use ratatui::style::{Color, Style, Stylize};

use crate::modules::notification::NotificationKind;
use crate::modules::quest::Urgency;

pub const ACCENT: Color = Color::Magenta;

pub fn dim_unless_focused(is_focused: bool, style: Style) -> Style {
    if is_focused { style.bold() } else { style.dim() }
}

pub fn urgency_color(urgency: Urgency) -> Color {
    match urgency {
        Urgency::Low => Color::Green,
        Urgency::Medium => Color::Yellow,
        Urgency::Urgent => Color::Red,
    }
}

pub fn notification_color(kind: NotificationKind) -> Color {
    match kind {
        NotificationKind::Info => Color::Cyan,
        NotificationKind::Success => Color::Green,
        NotificationKind::Warning => Color::Yellow,
    }
}
