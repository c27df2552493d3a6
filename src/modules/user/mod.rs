// src/modules/user/mod.rs

pub mod database;
pub use database::UserDatabase;

use serde::{Deserialize, Serialize};

pub const GUEST_USERNAME: &str = "guest";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    pub email: String,
    pub username: String,
    pub id: String,
    pub xp: i64,
}

impl User {
    /// Username comes from the email local part, else from the name.
    pub fn login(name: &str, email: &str) -> Self {
        let name = name.trim();
        let email = email.trim();

        let from_email = email
            .split('@')
            .next()
            .map(|local| local.trim().to_lowercase())
            .filter(|local| !local.is_empty());

        let username = from_email.unwrap_or_else(|| {
            name.to_lowercase()
                .split_whitespace()
                .collect::<Vec<_>>()
                .join("_")
        });

        if username.is_empty() {
            return Self::guest();
        }

        Self {
            name: if name.is_empty() { username.clone() } else { name.to_string() },
            email: email.to_string(),
            username,
            id: uuid::Uuid::new_v4().to_string(),
            xp: 0,
        }
    }

    pub fn guest() -> Self {
        Self {
            name: "Guest Hero".to_string(),
            email: String::new(),
            username: GUEST_USERNAME.to_string(),
            id: uuid::Uuid::new_v4().to_string(),
            xp: 0,
        }
    }

    pub fn add_xp(&mut self, xp: i64) {
        self.xp += xp;
    }

    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|w| w.chars().next())
            .take(2)
            .flat_map(|c| c.to_uppercase())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_from_email() {
        let user = User::login("Asha Rao", "Asha.Rao@campus.edu");
        assert_eq!(user.username, "asha.rao");
        assert_eq!(user.name, "Asha Rao");
        assert_eq!(user.xp, 0);
    }

    #[test]
    fn test_username_from_name_without_email() {
        let user = User::login("  Ravi  Kumar ", "");
        assert_eq!(user.username, "ravi_kumar");
        assert_eq!(user.initials(), "RK");
    }

    #[test]
    fn test_blank_login_is_guest() {
        let user = User::login("", "");
        assert_eq!(user.username, GUEST_USERNAME);
    }

    #[test]
    fn test_xp_accumulates() {
        let mut user = User::guest();
        user.add_xp(26);
        user.add_xp(50);
        assert_eq!(user.xp, 76);
    }
}
