// src/modules/user/database.rs

use rusqlite::Result;

use crate::util::database::{Database, StorageKey};
use super::User;

pub trait UserDatabase {
    fn load_current_user(&self) -> Result<Option<User>>;
    fn load_profile(&self, username: &str) -> Result<Option<User>>;
    /// Writes both the per-user profile and the current-user pointer.
    fn save_current_user(&self, user: &User) -> Result<()>;
    fn clear_current_user(&self) -> Result<()>;
}

impl UserDatabase for Database {
    fn load_current_user(&self) -> Result<Option<User>> {
        self.get_json(&StorageKey::CurrentUser)
    }

    fn load_profile(&self, username: &str) -> Result<Option<User>> {
        self.get_json(&StorageKey::Profile(username.to_string()))
    }

    fn save_current_user(&self, user: &User) -> Result<()> {
        self.put_json(&StorageKey::Profile(user.username.clone()), user)?;
        self.put_json(&StorageKey::CurrentUser, user)
    }

    fn clear_current_user(&self) -> Result<()> {
        self.remove(&StorageKey::CurrentUser)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logout_keeps_profile() {
        let db = Database::open_in_memory().unwrap();
        let mut user = User::login("Asha", "asha@campus.edu");
        user.add_xp(40);

        db.save_current_user(&user).unwrap();
        assert_eq!(db.load_current_user().unwrap(), Some(user.clone()));

        db.clear_current_user().unwrap();
        assert_eq!(db.load_current_user().unwrap(), None);
        assert_eq!(db.load_profile("asha").unwrap(), Some(user));
    }
}
