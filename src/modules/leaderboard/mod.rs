// src/modules/leaderboard/mod.rs
// Campus ranking: seeded players plus the logged-in user, ordered by XP

use crate::modules::user::User;

pub const XP_PER_LEVEL: i64 = 550;

#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub name: String,
    pub hostel: String,
    pub xp: i64,
    pub quests: u32,
    pub earnings: i64,
    pub is_current_user: bool,
}

impl LeaderboardEntry {
    pub fn level(&self) -> i64 {
        level_for_xp(self.xp)
    }

    pub fn badge(&self) -> &'static str {
        badge_for_level(self.level())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HostelStanding {
    pub name: &'static str,
    pub points: i64,
    pub members: u32,
}

pub fn level_for_xp(xp: i64) -> i64 {
    xp.max(0) / XP_PER_LEVEL + 1
}

pub fn badge_for_level(level: i64) -> &'static str {
    match level {
        28.. => "Legend",
        26..=27 => "Master",
        24..=25 => "Expert",
        20..=23 => "Pro",
        17..=19 => "Advanced",
        10..=16 => "Intermediate",
        _ => "Rookie",
    }
}

// (name, hostel, xp, quests, earnings)
const SEED_PLAYERS: &[(&str, &str, i64, u32, i64)] = &[
    ("Arjun Kumar", "Hostel A", 15420, 156, 18500),
    ("Priya Sharma", "Hostel B", 14200, 142, 16800),
    ("Rahul Verma", "Hostel C", 13100, 128, 15200),
    ("Sneha Patel", "Hostel A", 11800, 115, 13600),
    ("Vikram Singh", "Hostel D", 10500, 98, 11400),
    ("Ananya Das", "Hostel B", 9800, 89, 10200),
    ("Rohan Joshi", "Hostel C", 9100, 82, 9500),
];

const HOSTEL_STANDINGS: &[HostelStanding] = &[
    HostelStanding { name: "Hostel A", points: 45230, members: 234 },
    HostelStanding { name: "Hostel B", points: 42100, members: 198 },
    HostelStanding { name: "Hostel C", points: 38900, members: 221 },
    HostelStanding { name: "Hostel D", points: 35600, members: 187 },
];

#[derive(Debug, Clone, PartialEq)]
pub struct Leaderboard {
    entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    /// `tasks_done` and `earnings` describe the user's own record.
    pub fn with_user(user: &User, tasks_done: u32, earnings: i64) -> Self {
        let mut entries: Vec<LeaderboardEntry> = SEED_PLAYERS
            .iter()
            .map(|&(name, hostel, xp, quests, earnings)| LeaderboardEntry {
                rank: 0,
                name: name.to_string(),
                hostel: hostel.to_string(),
                xp,
                quests,
                earnings,
                is_current_user: false,
            })
            .collect();

        entries.push(LeaderboardEntry {
            rank: 0,
            name: format!("{} (You)", user.name),
            hostel: "Hostel A".to_string(),
            xp: user.xp,
            quests: tasks_done,
            earnings,
            is_current_user: true,
        });

        // Stable: ties keep seed order, so the user sits below an equal seed player
        entries.sort_by(|a, b| b.xp.cmp(&a.xp));
        for (i, entry) in entries.iter_mut().enumerate() {
            entry.rank = i + 1;
        }

        Self { entries }
    }

    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    pub fn current_user(&self) -> Option<&LeaderboardEntry> {
        self.entries.iter().find(|e| e.is_current_user)
    }

    pub fn hostel_standings(&self) -> &'static [HostelStanding] {
        HOSTEL_STANDINGS
    }
}
