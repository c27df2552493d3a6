// src/modules/marketplace/stats.rs

use super::Marketplace;
use crate::modules::leaderboard::{badge_for_level, level_for_xp};

/// Figures shown on the dashboard header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardStats {
    pub balance: i64,
    pub total_xp: i64,
    pub level: i64,
    pub badge: &'static str,
    pub tasks_done: usize,
    pub total_earned: i64,
    pub posted: usize,
    pub open_posted: usize,
    /// Sum of rewards across every open quest on the board.
    pub open_bounty: i64,
    /// Rewards still held in escrow for the user's open quests.
    pub escrowed: i64,
    pub unread_notifications: usize,
}

impl DashboardStats {
    pub fn collect(marketplace: &Marketplace) -> Self {
        let user = marketplace.user();
        let posted = marketplace.list_posted();
        let open: Vec<_> = posted.iter().filter(|q| q.is_open()).collect();
        let level = level_for_xp(user.xp);

        Self {
            balance: marketplace.wallet().balance(),
            total_xp: user.xp,
            level,
            badge: badge_for_level(level),
            tasks_done: marketplace.activity().len(),
            total_earned: marketplace.activity().iter().map(|q| q.reward).sum(),
            posted: posted.len(),
            open_posted: open.len(),
            open_bounty: marketplace.list_open().iter().map(|q| q.reward).sum(),
            escrowed: open.iter().map(|q| q.reward).sum(),
            unread_notifications: marketplace.notifications().unread_count(),
        }
    }
}
