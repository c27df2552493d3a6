// src/modules/session/database.rs

use rusqlite::Result;

use crate::util::database::{Database, StorageKey};
use super::{ActiveQuestSession, EngagedQuest};

pub trait SessionDatabase {
    fn load_session(&self, username: &str) -> Result<ActiveQuestSession>;
    /// Idle sessions remove the key rather than storing an empty value.
    fn save_session(&self, username: &str, session: &ActiveQuestSession) -> Result<()>;
}

impl SessionDatabase for Database {
    fn load_session(&self, username: &str) -> Result<ActiveQuestSession> {
        let snapshot: Option<EngagedQuest> =
            self.get_json(&StorageKey::ActiveQuest(username.to_string()))?;
        Ok(ActiveQuestSession::from_snapshot(snapshot))
    }

    fn save_session(&self, username: &str, session: &ActiveQuestSession) -> Result<()> {
        let key = StorageKey::ActiveQuest(username.to_string());
        match session.snapshot() {
            Some(engaged) => self.put_json(&key, engaged),
            None => self.remove(&key),
        }
    }
}
