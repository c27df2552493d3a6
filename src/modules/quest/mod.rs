// src/modules/quest/mod.rs

pub mod database;
pub mod form;
pub mod registry;
pub mod seed;

pub use database::QuestDatabase;
pub use form::{QuestDraft, QuestForm};
pub use registry::{Participant, QuestRegistry};

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Placeholder code carried by a quest until someone accepts it.
pub const OTP_SENTINEL: &str = "awaiting assignment";

/// Presentation only; urgency has no behavioral effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Low,
    #[default]
    Medium,
    Urgent,
}

impl Urgency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::Low => "low",
            Urgency::Medium => "medium",
            Urgency::Urgent => "urgent",
        }
    }

    pub fn all() -> [Urgency; 3] {
        [Urgency::Low, Urgency::Medium, Urgency::Urgent]
    }

    pub fn next(self) -> Self {
        match self {
            Urgency::Low => Urgency::Medium,
            Urgency::Medium => Urgency::Urgent,
            Urgency::Urgent => Urgency::Low,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Urgency::Low => Urgency::Urgent,
            Urgency::Medium => Urgency::Low,
            Urgency::Urgent => Urgency::Medium,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestStatus {
    Open,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quest {
    pub id: String,
    pub title: String,
    pub description: String,
    pub reward: i64,
    pub xp: i64,
    pub urgency: Urgency,
    pub deadline: String,
    pub deadline_iso: DateTime<Utc>,
    pub location: Option<String>,
    pub otp: String,
    pub posted_by: String,
    pub status: QuestStatus,
    pub created_at: DateTime<Utc>,
}

impl Quest {
    pub fn is_open(&self) -> bool {
        self.status != QuestStatus::Completed
    }

    pub fn has_code(&self) -> bool {
        self.otp != OTP_SENTINEL
    }

    pub fn is_posted_by(&self, username: &str) -> bool {
        self.posted_by == username
    }

    pub fn display_summary(&self) -> String {
        let urgency_icon = match self.urgency {
            Urgency::Low => "☁️",
            Urgency::Medium => "⚡",
            Urgency::Urgent => "🔥",
        };

        let location = self
            .location
            .as_ref()
            .map(|l| format!(" @ {}", l))
            .unwrap_or_default();

        format!(
            "{} {} - ₹{} / {} XP{} [by {}]",
            urgency_icon, self.title, self.reward, self.xp, location, self.deadline
        )
    }
}

/// Floor of a third of the reward.
pub fn xp_for_reward(reward: i64) -> i64 {
    reward.max(0) / 3
}

/// Four decimal digits, 1000..=9999.
pub fn generate_otp<R: Rng + ?Sized>(rng: &mut R) -> String {
    rng.gen_range(1000..=9999).to_string()
}

pub fn format_deadline(deadline: DateTime<Utc>) -> String {
    deadline
        .with_timezone(&chrono::Local)
        .format("%b %d, %I:%M %p")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_xp_is_floored_third() {
        assert_eq!(xp_for_reward(80), 26);
        assert_eq!(xp_for_reward(90), 30);
        assert_eq!(xp_for_reward(2), 0);
    }

    #[test]
    fn test_otp_is_four_digits() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let otp = generate_otp(&mut rng);
            assert_eq!(otp.len(), 4);
            assert!(otp.chars().all(|c| c.is_ascii_digit()));
            let n: u32 = otp.parse().unwrap();
            assert!((1000..=9999).contains(&n));
        }
    }

    #[test]
    fn test_urgency_cycles() {
        assert_eq!(Urgency::Urgent.next(), Urgency::Low);
        assert_eq!(Urgency::Low.prev(), Urgency::Urgent);
        for u in Urgency::all() {
            assert_eq!(u.next().prev(), u);
        }
    }

    #[test]
    fn test_urgency_label_outlives_value() {
        let labels: Vec<&'static str> = {
            let all = Urgency::all();
            all.iter().map(|u| u.as_str()).collect()
        };
        assert_eq!(labels, ["low", "medium", "urgent"]);
    }

    #[test]
    fn test_quest_json_uses_camel_case() {
        let now = Utc::now();
        let quest = Quest {
            id: "q1".into(),
            title: "Print Assignment".into(),
            description: "Library printer, 20 pages".into(),
            reward: 100,
            xp: 33,
            urgency: Urgency::Urgent,
            deadline: format_deadline(now),
            deadline_iso: now,
            location: None,
            otp: OTP_SENTINEL.into(),
            posted_by: "asha".into(),
            status: QuestStatus::Open,
            created_at: now,
        };

        let json = serde_json::to_value(&quest).unwrap();
        assert_eq!(json["postedBy"], "asha");
        assert_eq!(json["status"], "open");
        assert_eq!(json["urgency"], "urgent");
        assert!(json.get("deadlineIso").is_some());
        assert!(!quest.has_code());
        assert_eq!(
            quest.display_summary(),
            format!("🔥 Print Assignment - ₹100 / 33 XP [by {}]", quest.deadline)
        );
    }
}
