// src/modules/marketplace/mod.rs
//! The logged-in user's session controller. Every view reads from and
//! dispatches intents to one `Marketplace`; each mutation is mirrored to
//! storage right after it lands.

pub mod stats;
pub use stats::DashboardStats;

use chrono::{DateTime, Utc};
use rand::Rng;

use crate::error::{JugaadError, Result, ValidationErrors};
use crate::modules::leaderboard::Leaderboard;
use crate::modules::notification::{NotificationKind, NotificationLog};
use crate::modules::quest::{Participant, Quest, QuestDatabase, QuestDraft, QuestForm, QuestRegistry};
use crate::modules::session::{ActiveQuestSession, Countdown, SessionDatabase};
use crate::modules::user::{User, UserDatabase};
use crate::modules::wallet::{Transaction, Wallet, WalletDatabase};
use crate::util::database::Database;
use crate::{log_error, log_info};

#[derive(Debug)]
pub struct Marketplace {
    database: Database,
    user: User,
    wallet: Wallet,
    registry: QuestRegistry,
    session: ActiveQuestSession,
    activity: Vec<Quest>,
    notifications: NotificationLog,
}

impl Marketplace {
    /// Loads (or creates) everything stored for `user`. A returning username
    /// keeps its stored profile, including XP.
    pub fn login(
        database: Database,
        user: User,
        starting_balance: i64,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        let user = database.load_profile(&user.username)?.unwrap_or(user);
        database.save_current_user(&user)?;

        let username = user.username.clone();
        let marketplace = Self {
            wallet: database.load_wallet(&username, starting_balance)?,
            registry: QuestRegistry::new(database.load_quests(now)?),
            session: database.load_session(&username)?,
            activity: database.load_activity(&username)?,
            notifications: NotificationLog::new(),
            user,
            database,
        };

        log_info!(
            "Logged in as {} (balance ₹{}, {} quests on board)",
            username,
            marketplace.wallet.balance(),
            marketplace.registry.all().len()
        );
        Ok(marketplace)
    }

    /// Resumes whoever was logged in last, if anyone.
    pub fn restore(database: Database, starting_balance: i64, now: DateTime<Utc>) -> Result<Option<Self>> {
        match database.load_current_user()? {
            Some(user) => Self::login(database, user, starting_balance, now).map(Some),
            None => Ok(None),
        }
    }

    /// Drops the in-memory state; everything stored per username stays.
    pub fn logout(self) -> Result<Database> {
        self.database.clear_current_user()?;
        log_info!("Logged out {}", self.user.username);
        Ok(self.database)
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn wallet(&self) -> &Wallet {
        &self.wallet
    }

    pub fn registry(&self) -> &QuestRegistry {
        &self.registry
    }

    pub fn session(&self) -> &ActiveQuestSession {
        &self.session
    }

    pub fn activity(&self) -> &[Quest] {
        &self.activity
    }

    pub fn notifications(&self) -> &NotificationLog {
        &self.notifications
    }

    pub fn list_open(&self) -> Vec<&Quest> {
        self.registry.list_open()
    }

    pub fn list_posted(&self) -> Vec<&Quest> {
        self.registry.list_posted_by(&self.user.username)
    }

    pub fn countdown(&self, now: DateTime<Utc>) -> Option<Countdown> {
        self.session.countdown(now)
    }

    pub fn post_quest(&mut self, form: &QuestForm, now: DateTime<Utc>) -> Result<Quest> {
        let draft = form.validate(now)?;
        self.post_draft(draft, now)
    }

    pub fn post_draft(&mut self, draft: QuestDraft, now: DateTime<Utc>) -> Result<Quest> {
        let (registry, mut poster) = self.split();
        let quest = registry.create(draft, &mut poster, now)?.clone();

        self.mirror_wallet();
        self.mirror_quests();
        Ok(quest)
    }

    pub fn accept_quest(&mut self, quest_id: &str, now: DateTime<Utc>) -> Result<Quest> {
        self.accept_quest_with(quest_id, &mut rand::thread_rng(), now)
    }

    pub fn accept_quest_with<R: Rng + ?Sized>(
        &mut self,
        quest_id: &str,
        rng: &mut R,
        now: DateTime<Utc>,
    ) -> Result<Quest> {
        let (registry, mut hero) = self.split();
        let quest = registry.accept(quest_id, &mut hero, rng, now)?.clone();

        self.mirror_quests();
        self.mirror_session();
        Ok(quest)
    }

    pub fn complete_quest(&mut self, code: &str, now: DateTime<Utc>) -> Result<Quest> {
        let (registry, mut hero) = self.split();
        match registry.complete(code, &mut hero, now) {
            Ok(quest) => {
                let quest = quest.clone();
                self.mirror_quests();
                self.mirror_wallet();
                self.mirror_user();
                self.mirror_activity();
                self.mirror_session();
                Ok(quest)
            }
            Err(e @ (JugaadError::QuestUnavailable(_) | JugaadError::QuestNotFound(_))) => {
                self.mirror_session();
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    pub fn withdraw(&mut self, amount: i64, now: DateTime<Utc>) -> Result<Transaction> {
        ensure_positive(amount)?;
        let txn = self.wallet.withdraw(amount, now)?.clone();
        self.notifications.record(
            "Withdrawal",
            &format!("₹{} sent to your bank account", amount),
            NotificationKind::Info,
            now,
        );
        self.mirror_wallet();
        Ok(txn)
    }

    pub fn deposit(&mut self, amount: i64, now: DateTime<Utc>) -> Result<Transaction> {
        ensure_positive(amount)?;
        let txn = self.wallet.deposit(amount, now)?.clone();
        self.notifications.record(
            "Money Credited",
            &format!("₹{} has been credited to your wallet", amount),
            NotificationKind::Success,
            now,
        );
        self.mirror_wallet();
        Ok(txn)
    }

    pub fn clear_notifications(&mut self) {
        self.notifications.clear_all();
    }

    pub fn toggle_chat(&mut self) -> bool {
        let open = self.session.toggle_chat();
        self.mirror_session();
        open
    }

    pub fn set_chat_open(&mut self, open: bool) {
        if self.session.is_chat_open() != open {
            self.session.set_chat_open(open);
            self.mirror_session();
        }
    }

    /// Always false while a quest is held; see `ActiveQuestSession::dismiss`.
    pub fn dismiss_active_quest(&mut self) -> bool {
        self.session.dismiss()
    }

    /// Picks up quest board changes made under other usernames.
    pub fn reload_quests(&mut self, now: DateTime<Utc>) -> Result<()> {
        self.registry = QuestRegistry::new(self.database.load_quests(now)?);
        Ok(())
    }

    pub fn dashboard_stats(&self) -> DashboardStats {
        DashboardStats::collect(self)
    }

    pub fn leaderboard(&self) -> Leaderboard {
        let earnings = self.activity.iter().map(|q| q.reward).sum();
        Leaderboard::with_user(&self.user, self.activity.len() as u32, earnings)
    }

    fn split(&mut self) -> (&mut QuestRegistry, Participant<'_>) {
        (
            &mut self.registry,
            Participant {
                user: &mut self.user,
                wallet: &mut self.wallet,
                session: &mut self.session,
                activity: &mut self.activity,
                notifications: &mut self.notifications,
            },
        )
    }

    // Best-effort mirrors: the in-memory state stays authoritative for this
    // session even if a write fails.

    fn mirror_wallet(&self) {
        if let Err(e) = self.database.save_wallet(&self.user.username, &self.wallet) {
            log_error!("Failed to persist wallet for {}: {}", self.user.username, e);
        }
    }

    fn mirror_quests(&self) {
        if let Err(e) = self.database.save_quests(self.registry.all()) {
            log_error!("Failed to persist quest board: {}", e);
        }
    }

    fn mirror_session(&self) {
        if let Err(e) = self.database.save_session(&self.user.username, &self.session) {
            log_error!("Failed to persist active quest for {}: {}", self.user.username, e);
        }
    }

    fn mirror_activity(&self) {
        if let Err(e) = self.database.save_activity(&self.user.username, &self.activity) {
            log_error!("Failed to persist activity for {}: {}", self.user.username, e);
        }
    }

    fn mirror_user(&self) {
        if let Err(e) = self.database.save_current_user(&self.user) {
            log_error!("Failed to persist profile for {}: {}", self.user.username, e);
        }
    }
}

/// Parses wallet amount input: a positive whole number of rupees.
pub fn parse_amount(input: &str) -> Result<i64> {
    let amount = input.trim().parse::<i64>().map_err(|_| amount_error())?;
    ensure_positive(amount)?;
    Ok(amount)
}

fn ensure_positive(amount: i64) -> Result<()> {
    if amount > 0 {
        Ok(())
    } else {
        Err(amount_error())
    }
}

fn amount_error() -> JugaadError {
    let mut errors = ValidationErrors::new();
    errors.add("amount", "Enter a positive amount");
    JugaadError::Validation(errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::quest::Urgency;
    use chrono::Duration;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn marketplace(username: &str) -> Marketplace {
        let db = Database::open_in_memory().unwrap();
        Marketplace::login(db, User::login(username, ""), 450, Utc::now()).unwrap()
    }

    fn draft(reward: i64) -> QuestDraft {
        QuestDraft {
            title: "Print Assignment".into(),
            description: "20 pages".into(),
            reward,
            urgency: Urgency::Urgent,
            deadline: Utc::now() + Duration::hours(2),
            location: None,
        }
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount(" 200 ").unwrap(), 200);
        for bad in ["0", "-5", "", "ten", "2.5"] {
            assert!(matches!(parse_amount(bad), Err(JugaadError::Validation(_))), "{bad}");
        }
    }

    #[test]
    fn test_invalid_form_changes_nothing() {
        let mut m = marketplace("asha");
        let board_before = m.registry().clone();

        let err = m.post_quest(&QuestForm::default(), Utc::now()).unwrap_err();

        assert!(matches!(err, JugaadError::Validation(ref e) if e.len() == 4));
        assert_eq!(m.registry(), &board_before);
        assert_eq!(m.wallet().balance(), 450);
    }

    #[test]
    fn test_withdraw_and_deposit_notify() {
        let mut m = marketplace("asha");
        let now = Utc::now();

        m.deposit(50, now).unwrap();
        m.withdraw(100, now).unwrap();
        assert_eq!(m.wallet().balance(), 400);
        assert_eq!(m.notifications().len(), 2);
        assert_eq!(m.notifications().entries()[0].title, "Withdrawal");

        let err = m.withdraw(401, now).unwrap_err();
        assert!(matches!(err, JugaadError::InsufficientFunds { requested: 401, available: 400 }));
        assert_eq!(m.wallet().transactions().len(), 2);
        assert_eq!(m.notifications().len(), 2);

        assert!(matches!(m.deposit(0, now), Err(JugaadError::Validation(_))));
    }

    #[test]
    fn test_oversized_deposit_is_rejected() {
        let mut m = marketplace("asha");
        let now = Utc::now();
        let amount = parse_amount(&i64::MAX.to_string()).unwrap();

        let err = m.deposit(amount, now).unwrap_err();

        assert!(matches!(err, JugaadError::AmountOverflow { balance: 450, .. }));
        assert_eq!(m.wallet().balance(), 450);
        assert!(m.wallet().transactions().is_empty());
        assert!(m.notifications().is_empty());
    }

    #[test]
    fn test_dismiss_keeps_quest() {
        let mut m = marketplace("asha");
        let mut rng = StdRng::seed_from_u64(5);
        let id = m.post_draft(draft(30), Utc::now()).unwrap().id;
        m.accept_quest_with(&id, &mut rng, Utc::now()).unwrap();

        assert!(!m.dismiss_active_quest());
        assert!(m.session().holds(&id));
    }

    #[test]
    fn test_chat_flag_round_trips_through_storage() {
        let db = Database::open_in_memory().unwrap();
        let mut m = Marketplace::login(db, User::login("asha", ""), 450, Utc::now()).unwrap();
        let id = m.post_draft(draft(30), Utc::now()).unwrap().id;
        m.accept_quest(&id, Utc::now()).unwrap();

        assert!(m.toggle_chat());
        let db = m.logout().unwrap();

        let m = Marketplace::login(db, User::login("asha", ""), 450, Utc::now()).unwrap();
        assert!(m.session().is_chat_open());
        assert!(m.session().holds(&id));
    }

    #[test]
    fn test_leaderboard_uses_activity() {
        let mut m = marketplace("asha");
        let mut rng = StdRng::seed_from_u64(11);
        let now = Utc::now();
        let id = m.post_draft(draft(300), now).unwrap().id;
        let code = m.accept_quest_with(&id, &mut rng, now).unwrap().otp;
        m.complete_quest(&code, now).unwrap();

        let board = m.leaderboard();
        let me = board.current_user().unwrap();
        assert_eq!(me.xp, 100);
        assert_eq!(me.quests, 1);
        assert_eq!(me.earnings, 300);
    }
}
