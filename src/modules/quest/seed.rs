// src/modules/quest/seed.rs
// Mock campus quests for a fresh board

use chrono::{DateTime, Duration, Utc};

use super::{format_deadline, xp_for_reward, Quest, QuestStatus, Urgency, OTP_SENTINEL};

struct SeedQuest {
    title: &'static str,
    description: &'static str,
    reward: i64,
    urgency: Urgency,
    minutes_left: i64,
    location: Option<&'static str>,
    posted_by: &'static str,
}

const SEED_QUESTS: &[SeedQuest] = &[
    SeedQuest {
        title: "Deliver Lab Coat",
        description: "Forgot my lab coat in room 214. Bring it to the Chem lab before practicals start.",
        reward: 60,
        urgency: Urgency::Urgent,
        minutes_left: 45,
        location: Some("Chemistry Block"),
        posted_by: "sneha_patel",
    },
    SeedQuest {
        title: "Hold Canteen Line",
        description: "Stand in the lunch queue for me for 20 mins.",
        reward: 150,
        urgency: Urgency::Medium,
        minutes_left: 120,
        location: Some("Main Canteen"),
        posted_by: "rahul_verma",
    },
    SeedQuest {
        title: "Print Assignment",
        description: "20 pages, double sided. Drop it at the hostel reception.",
        reward: 100,
        urgency: Urgency::Medium,
        minutes_left: 180,
        location: Some("Library Print Room"),
        posted_by: "priya_sharma",
    },
    SeedQuest {
        title: "Wake Me Up Call",
        description: "Call me at 6 AM until I pick up. Exam day.",
        reward: 80,
        urgency: Urgency::Low,
        minutes_left: 720,
        location: None,
        posted_by: "vikram_singh",
    },
];

pub fn seed_quests(now: DateTime<Utc>) -> Vec<Quest> {
    SEED_QUESTS
        .iter()
        .enumerate()
        .map(|(i, seed)| {
            let deadline_iso = now + Duration::minutes(seed.minutes_left);
            Quest {
                id: format!("seed-{}", i + 1),
                title: seed.title.to_string(),
                description: seed.description.to_string(),
                reward: seed.reward,
                xp: xp_for_reward(seed.reward),
                urgency: seed.urgency,
                deadline: format_deadline(deadline_iso),
                deadline_iso,
                location: seed.location.map(str::to_string),
                otp: OTP_SENTINEL.to_string(),
                posted_by: seed.posted_by.to_string(),
                status: QuestStatus::Open,
                created_at: now - Duration::minutes(i as i64 * 10),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_quests_are_open_and_unassigned() {
        let now = Utc::now();
        let quests = seed_quests(now);
        assert_eq!(quests.len(), 4);
        for quest in &quests {
            assert!(quest.is_open());
            assert!(!quest.has_code());
            assert!(quest.deadline_iso > now);
            assert_eq!(quest.xp, quest.reward / 3);
        }
    }
}
