// src/modules/quest/registry.rs
// Quest lifecycle: posted (escrowed) -> accepted (code issued) -> completed (paid out)

use chrono::{DateTime, Utc};
use rand::Rng;

use crate::error::{JugaadError, Result};
use crate::modules::notification::{NotificationKind, NotificationLog};
use crate::modules::session::ActiveQuestSession;
use crate::modules::user::User;
use crate::modules::wallet::Wallet;
use crate::{log_info, log_warn};
use super::form::{resolve_deadline, QuestDraft};
use super::{format_deadline, generate_otp, xp_for_reward, Quest, QuestStatus, OTP_SENTINEL};

/// Everything one logged-in user owns that a quest transition touches.
#[derive(Debug)]
pub struct Participant<'a> {
    pub user: &'a mut User,
    pub wallet: &'a mut Wallet,
    pub session: &'a mut ActiveQuestSession,
    pub activity: &'a mut Vec<Quest>,
    pub notifications: &'a mut NotificationLog,
}

/// Newest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuestRegistry {
    quests: Vec<Quest>,
}

impl QuestRegistry {
    pub fn new(quests: Vec<Quest>) -> Self {
        Self { quests }
    }

    pub fn all(&self) -> &[Quest] {
        &self.quests
    }

    pub fn get(&self, id: &str) -> Option<&Quest> {
        self.quests.iter().find(|q| q.id == id)
    }

    pub fn list_open(&self) -> Vec<&Quest> {
        self.quests.iter().filter(|q| q.is_open()).collect()
    }

    pub fn list_posted_by(&self, username: &str) -> Vec<&Quest> {
        self.quests.iter().filter(|q| q.is_posted_by(username)).collect()
    }

    /// Escrows the reward from the poster. Rejected drafts leave everything untouched.
    pub fn create(
        &mut self,
        draft: QuestDraft,
        poster: &mut Participant<'_>,
        now: DateTime<Utc>,
    ) -> Result<&Quest> {
        if !poster.wallet.can_afford(draft.reward) {
            return Err(JugaadError::InsufficientFunds {
                requested: draft.reward,
                available: poster.wallet.balance(),
            });
        }

        let deadline_iso = resolve_deadline(draft.deadline, now);
        if deadline_iso != draft.deadline {
            log_warn!("Deadline for \"{}\" already elapsed, moved to {}", draft.title, deadline_iso);
        }

        let quest = Quest {
            id: uuid::Uuid::new_v4().to_string(),
            xp: xp_for_reward(draft.reward),
            reward: draft.reward,
            urgency: draft.urgency,
            deadline: format_deadline(deadline_iso),
            deadline_iso,
            location: draft.location,
            otp: OTP_SENTINEL.to_string(),
            posted_by: poster.user.username.clone(),
            status: QuestStatus::Open,
            created_at: now,
            title: draft.title,
            description: draft.description,
        };

        poster
            .wallet
            .debit(quest.reward, &format!("Escrow: {}", quest.title), now)?;
        poster.notifications.record(
            "Quest Posted",
            &format!("\"{}\" is live. ₹{} held in escrow.", quest.title, quest.reward),
            NotificationKind::Info,
            now,
        );
        log_info!("{} posted quest {}: {}", quest.posted_by, quest.id, quest.display_summary());

        self.quests.insert(0, quest);
        Ok(&self.quests[0])
    }

    /// Issues the verification code on first acceptance and engages the hero's
    /// session. Status stays open until verified.
    pub fn accept<R: Rng + ?Sized>(
        &mut self,
        quest_id: &str,
        hero: &mut Participant<'_>,
        rng: &mut R,
        now: DateTime<Utc>,
    ) -> Result<&Quest> {
        if let Some(current) = hero.session.active_quest() {
            return Err(JugaadError::AlreadyActive {
                title: current.title.clone(),
            });
        }

        let index = self.index_of(quest_id)?;
        let quest = &mut self.quests[index];
        if !quest.is_open() {
            return Err(JugaadError::QuestUnavailable(quest.title.clone()));
        }

        if !quest.has_code() {
            quest.otp = generate_otp(rng);
        }

        hero.session.engage(quest.clone(), now)?;
        hero.notifications.record(
            "Quest Accepted",
            &format!(
                "You accepted \"{}\". Head to {}.",
                quest.title,
                quest.location.as_deref().unwrap_or("the location")
            ),
            NotificationKind::Info,
            now,
        );
        log_info!("{} accepted quest {}", hero.user.username, quest.id);

        Ok(&self.quests[index])
    }

    /// Verifies the submitted code against the held quest. A mismatch changes nothing.
    pub fn complete(
        &mut self,
        code: &str,
        hero: &mut Participant<'_>,
        now: DateTime<Utc>,
    ) -> Result<&Quest> {
        let quest_id = hero
            .session
            .active_quest()
            .map(|q| q.id.clone())
            .ok_or(JugaadError::NoActiveQuest)?;

        let index = match self.index_of(&quest_id) {
            Ok(index) => index,
            Err(e) => {
                // Board was rewritten under the hero; the hold can never resolve.
                log_warn!("Held quest {} is gone from the board", quest_id);
                hero.session.release();
                return Err(e);
            }
        };
        let quest = &mut self.quests[index];

        if !quest.has_code() || code.trim() != quest.otp {
            log_warn!("Wrong verification code for quest {}", quest.id);
            return Err(JugaadError::OtpMismatch);
        }

        if !quest.is_open() {
            // Someone holding the same code got there first; nothing left to pay out.
            hero.session.release();
            return Err(JugaadError::QuestUnavailable(quest.title.clone()));
        }

        hero.wallet.checked_credit(quest.reward)?;
        quest.status = QuestStatus::Completed;
        let quest = quest.clone();

        hero.wallet
            .credit(quest.reward, &format!("Quest Reward: {}", quest.title), now)?;
        hero.user.add_xp(quest.xp);
        hero.activity.insert(0, quest.clone());
        hero.session.release();
        hero.notifications.record(
            "Quest Completed",
            &format!("₹{} credited and +{} XP for \"{}\"", quest.reward, quest.xp, quest.title),
            NotificationKind::Success,
            now,
        );
        log_info!("{} completed quest {}", hero.user.username, quest.id);

        Ok(&self.quests[index])
    }

    fn index_of(&self, quest_id: &str) -> Result<usize> {
        self.quests
            .iter()
            .position(|q| q.id == quest_id)
            .ok_or_else(|| JugaadError::QuestNotFound(quest_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::quest::Urgency;
    use chrono::Duration;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    struct Fixture {
        user: User,
        wallet: Wallet,
        session: ActiveQuestSession,
        activity: Vec<Quest>,
        notifications: NotificationLog,
    }

    impl Fixture {
        fn new(username: &str, balance: i64) -> Self {
            Self {
                user: User::login(username, ""),
                wallet: Wallet::new(balance),
                session: ActiveQuestSession::default(),
                activity: Vec::new(),
                notifications: NotificationLog::new(),
            }
        }

        fn participant(&mut self) -> Participant<'_> {
            Participant {
                user: &mut self.user,
                wallet: &mut self.wallet,
                session: &mut self.session,
                activity: &mut self.activity,
                notifications: &mut self.notifications,
            }
        }
    }

    fn draft(title: &str, reward: i64, now: DateTime<Utc>) -> QuestDraft {
        QuestDraft {
            title: title.to_string(),
            description: "details".into(),
            reward,
            urgency: Urgency::Medium,
            deadline: now + Duration::hours(2),
            location: Some("Hostel A".into()),
        }
    }

    #[test]
    fn test_create_escrows_reward() {
        let now = Utc::now();
        let mut registry = QuestRegistry::default();
        let mut poster = Fixture::new("asha", 450);

        let quest = registry
            .create(draft("Print Assignment", 80, now), &mut poster.participant(), now)
            .unwrap()
            .clone();

        assert_eq!(quest.status, QuestStatus::Open);
        assert_eq!(quest.otp, OTP_SENTINEL);
        assert_eq!(quest.xp, 26);
        assert_eq!(quest.posted_by, "asha");
        assert_eq!(poster.wallet.balance(), 370);
        assert_eq!(poster.wallet.transactions().len(), 1);
        assert_eq!(poster.wallet.transactions()[0].description, "Escrow: Print Assignment");
        assert_eq!(poster.wallet.transactions()[0].amount, 80);
        assert_eq!(poster.notifications.len(), 1);
    }

    #[test]
    fn test_create_rejected_when_reward_exceeds_balance() {
        let now = Utc::now();
        let mut registry = QuestRegistry::default();
        let mut poster = Fixture::new("asha", 50);

        let err = registry
            .create(draft("Big Ask", 51, now), &mut poster.participant(), now)
            .unwrap_err();

        assert!(matches!(err, JugaadError::InsufficientFunds { requested: 51, available: 50 }));
        assert!(registry.all().is_empty());
        assert_eq!(poster.wallet, Wallet::new(50));
        assert!(poster.notifications.is_empty());
    }

    #[test]
    fn test_create_with_elapsed_deadline_falls_back() {
        let now = Utc::now();
        let mut registry = QuestRegistry::default();
        let mut poster = Fixture::new("asha", 450);
        let mut stale = draft("Late", 30, now);
        stale.deadline = now - Duration::minutes(5);

        let quest = registry.create(stale, &mut poster.participant(), now).unwrap();
        assert_eq!(quest.deadline_iso, now + Duration::hours(3));
    }

    #[test]
    fn test_listing_order_and_filters() {
        let now = Utc::now();
        let mut registry = QuestRegistry::default();
        let mut asha = Fixture::new("asha", 1000);
        let mut ravi = Fixture::new("ravi", 1000);

        registry.create(draft("first", 30, now), &mut asha.participant(), now).unwrap();
        registry.create(draft("second", 30, now), &mut ravi.participant(), now).unwrap();
        registry.create(draft("third", 30, now), &mut asha.participant(), now).unwrap();

        let titles: Vec<&str> = registry.list_open().iter().map(|q| q.title.as_str()).collect();
        assert_eq!(titles, vec!["third", "second", "first"]);

        let mine: Vec<&str> = registry
            .list_posted_by("asha")
            .iter()
            .map(|q| q.title.as_str())
            .collect();
        assert_eq!(mine, vec!["third", "first"]);
    }

    #[test]
    fn test_accept_issues_code_once() {
        let now = Utc::now();
        let mut rng = StdRng::seed_from_u64(42);
        let mut registry = QuestRegistry::default();
        let mut asha = Fixture::new("asha", 450);
        let mut ravi = Fixture::new("ravi", 0);
        let mut meera = Fixture::new("meera", 0);

        let id = registry
            .create(draft("Print Assignment", 80, now), &mut asha.participant(), now)
            .unwrap()
            .id
            .clone();

        let code = registry
            .accept(&id, &mut ravi.participant(), &mut rng, now)
            .unwrap()
            .otp
            .clone();
        assert_eq!(code.len(), 4);
        assert!(code.chars().all(|c| c.is_ascii_digit()));
        assert_eq!(registry.get(&id).unwrap().status, QuestStatus::Open);
        assert_eq!(registry.list_open().len(), 1);
        assert!(ravi.session.holds(&id));
        assert_eq!(ravi.session.active_quest().unwrap().otp, code);

        // A second hero sees the same code; it is never regenerated
        let again = registry
            .accept(&id, &mut meera.participant(), &mut rng, now)
            .unwrap()
            .otp
            .clone();
        assert_eq!(again, code);
    }

    #[test]
    fn test_accept_while_engaged_keeps_held_quest() {
        let now = Utc::now();
        let mut rng = StdRng::seed_from_u64(1);
        let mut registry = QuestRegistry::default();
        let mut asha = Fixture::new("asha", 450);
        let mut ravi = Fixture::new("ravi", 0);

        let a = registry.create(draft("a", 30, now), &mut asha.participant(), now).unwrap().id.clone();
        let b = registry.create(draft("b", 30, now), &mut asha.participant(), now).unwrap().id.clone();

        registry.accept(&a, &mut ravi.participant(), &mut rng, now).unwrap();
        let err = registry.accept(&b, &mut ravi.participant(), &mut rng, now).unwrap_err();

        assert!(matches!(err, JugaadError::AlreadyActive { .. }));
        assert!(ravi.session.holds(&a));
        assert_eq!(registry.get(&b).unwrap().otp, OTP_SENTINEL);
    }

    #[test]
    fn test_accept_unknown_quest() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut registry = QuestRegistry::default();
        let mut ravi = Fixture::new("ravi", 0);

        let err = registry
            .accept("missing", &mut ravi.participant(), &mut rng, Utc::now())
            .unwrap_err();
        assert!(matches!(err, JugaadError::QuestNotFound(_)));
        assert!(!ravi.session.is_engaged());
    }

    #[test]
    fn test_complete_wrong_code_then_right_code() {
        let now = Utc::now();
        let mut rng = StdRng::seed_from_u64(3);
        let mut registry = QuestRegistry::default();
        let mut asha = Fixture::new("asha", 450);
        let mut ravi = Fixture::new("ravi", 10);

        let id = registry.create(draft("Canteen Line", 150, now), &mut asha.participant(), now).unwrap().id.clone();
        let code = registry.accept(&id, &mut ravi.participant(), &mut rng, now).unwrap().otp.clone();
        let wrong = if code == "1000" { "1001" } else { "1000" };

        let err = registry.complete(wrong, &mut ravi.participant(), now).unwrap_err();
        assert!(matches!(err, JugaadError::OtpMismatch));
        assert_eq!(registry.get(&id).unwrap().status, QuestStatus::Open);
        assert!(ravi.session.is_engaged());
        assert_eq!(ravi.wallet.balance(), 10);

        let done = registry.complete(&code, &mut ravi.participant(), now).unwrap().clone();
        assert_eq!(done.status, QuestStatus::Completed);
        assert_eq!(ravi.wallet.balance(), 160);
        assert_eq!(ravi.wallet.transactions()[0].description, "Quest Reward: Canteen Line");
        assert_eq!(ravi.user.xp, 50);
        assert_eq!(ravi.activity.len(), 1);
        assert_eq!(ravi.activity[0].status, QuestStatus::Completed);
        assert_eq!(ravi.session, ActiveQuestSession::Idle);
        assert!(registry.list_open().is_empty());
        // Poster's escrow is not refunded
        assert_eq!(asha.wallet.balance(), 300);
    }

    #[test]
    fn test_complete_without_session() {
        let mut registry = QuestRegistry::default();
        let mut ravi = Fixture::new("ravi", 0);
        let err = registry.complete("1234", &mut ravi.participant(), Utc::now()).unwrap_err();
        assert!(matches!(err, JugaadError::NoActiveQuest));
    }

    #[test]
    fn test_second_hero_released_after_first_completes() {
        let now = Utc::now();
        let mut rng = StdRng::seed_from_u64(9);
        let mut registry = QuestRegistry::default();
        let mut asha = Fixture::new("asha", 450);
        let mut ravi = Fixture::new("ravi", 0);
        let mut meera = Fixture::new("meera", 0);

        let id = registry.create(draft("x", 60, now), &mut asha.participant(), now).unwrap().id.clone();
        let code = registry.accept(&id, &mut ravi.participant(), &mut rng, now).unwrap().otp.clone();
        registry.accept(&id, &mut meera.participant(), &mut rng, now).unwrap();

        registry.complete(&code, &mut ravi.participant(), now).unwrap();
        let err = registry.complete(&code, &mut meera.participant(), now).unwrap_err();

        assert!(matches!(err, JugaadError::QuestUnavailable(_)));
        assert!(!meera.session.is_engaged());
        assert_eq!(meera.wallet.balance(), 0);
    }

    #[test]
    fn test_codes_vary_across_quests() {
        let now = Utc::now();
        let mut rng = StdRng::seed_from_u64(11);
        let mut registry = QuestRegistry::default();
        let mut asha = Fixture::new("asha", 1000);
        let mut ravi = Fixture::new("ravi", 0);

        let ids: Vec<String> = (0..6)
            .map(|i| {
                registry
                    .create(draft(&format!("errand {i}"), 30, now), &mut asha.participant(), now)
                    .unwrap()
                    .id
                    .clone()
            })
            .collect();

        let mut codes = Vec::new();
        for id in &ids {
            let code = registry.accept(id, &mut ravi.participant(), &mut rng, now).unwrap().otp.clone();
            registry.complete(&code, &mut ravi.participant(), now).unwrap();
            codes.push(code);
        }

        assert_eq!(ravi.activity.len(), 6);
        assert!(codes.iter().any(|c| c != &codes[0]), "codes: {codes:?}");
    }

    #[test]
    fn test_complete_releases_hold_on_vanished_quest() {
        let now = Utc::now();
        let mut rng = StdRng::seed_from_u64(5);
        let mut registry = QuestRegistry::default();
        let mut asha = Fixture::new("asha", 450);
        let mut ravi = Fixture::new("ravi", 0);

        let id = registry.create(draft("gone", 40, now), &mut asha.participant(), now).unwrap().id.clone();
        let code = registry.accept(&id, &mut ravi.participant(), &mut rng, now).unwrap().otp.clone();

        let mut rewritten = QuestRegistry::default();
        let err = rewritten.complete(&code, &mut ravi.participant(), now).unwrap_err();

        assert!(matches!(err, JugaadError::QuestNotFound(_)));
        assert!(!ravi.session.is_engaged());
        assert_eq!(ravi.wallet.balance(), 0);
    }

    #[test]
    fn test_reward_overflow_leaves_quest_open() {
        let now = Utc::now();
        let mut rng = StdRng::seed_from_u64(8);
        let mut registry = QuestRegistry::default();
        let mut asha = Fixture::new("asha", 450);
        let mut ravi = Fixture::new("ravi", i64::MAX - 10);

        let id = registry.create(draft("big", 80, now), &mut asha.participant(), now).unwrap().id.clone();
        let code = registry.accept(&id, &mut ravi.participant(), &mut rng, now).unwrap().otp.clone();

        let err = registry.complete(&code, &mut ravi.participant(), now).unwrap_err();

        assert!(matches!(err, JugaadError::AmountOverflow { amount: 80, .. }));
        assert_eq!(registry.get(&id).unwrap().status, QuestStatus::Open);
        assert!(ravi.session.holds(&id));
        assert_eq!(ravi.wallet, Wallet::new(i64::MAX - 10));
        assert_eq!(ravi.user.xp, 0);
    }
}
