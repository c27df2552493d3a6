// src/modules/quest/database.rs
// Quest persistence: the shared quest board plus each user's completed-quest history

use chrono::{DateTime, Utc};
use rusqlite::Result;

use crate::log_info;
use crate::util::database::{Database, StorageKey};
use super::{seed, Quest};

pub trait QuestDatabase {
    /// Seeds the board the first time it is read.
    fn load_quests(&self, now: DateTime<Utc>) -> Result<Vec<Quest>>;
    fn save_quests(&self, quests: &[Quest]) -> Result<()>;

    fn load_activity(&self, username: &str) -> Result<Vec<Quest>>;
    fn save_activity(&self, username: &str, activity: &[Quest]) -> Result<()>;
}

impl QuestDatabase for Database {
    fn load_quests(&self, now: DateTime<Utc>) -> Result<Vec<Quest>> {
        match self.get_json::<Vec<Quest>>(&StorageKey::Quests)? {
            Some(quests) => Ok(quests),
            None => {
                let quests = seed::seed_quests(now);
                self.save_quests(&quests)?;
                log_info!("Seeded quest board with {} quests", quests.len());
                Ok(quests)
            }
        }
    }

    fn save_quests(&self, quests: &[Quest]) -> Result<()> {
        self.put_json(&StorageKey::Quests, &quests)
    }

    fn load_activity(&self, username: &str) -> Result<Vec<Quest>> {
        Ok(self
            .get_json(&StorageKey::Activity(username.to_string()))?
            .unwrap_or_default())
    }

    fn save_activity(&self, username: &str, activity: &[Quest]) -> Result<()> {
        self.put_json(&StorageKey::Activity(username.to_string()), &activity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_load_seeds_then_persists() {
        let db = Database::open_in_memory().unwrap();
        let now = Utc::now();

        let first = db.load_quests(now).unwrap();
        assert!(!first.is_empty());

        let mut edited = first.clone();
        edited.remove(0);
        db.save_quests(&edited).unwrap();

        assert_eq!(db.load_quests(now).unwrap(), edited);
    }

    #[test]
    fn test_empty_board_is_not_reseeded() {
        let db = Database::open_in_memory().unwrap();
        db.save_quests(&[]).unwrap();
        assert!(db.load_quests(Utc::now()).unwrap().is_empty());
    }

    #[test]
    fn test_activity_is_per_user() {
        let db = Database::open_in_memory().unwrap();
        let quests = seed::seed_quests(Utc::now());

        db.save_activity("asha", &quests[..1]).unwrap();

        assert_eq!(db.load_activity("asha").unwrap(), quests[..1].to_vec());
        assert!(db.load_activity("ravi").unwrap().is_empty());
    }
}
