use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

/// Field-level problems collected from the quest posting form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: BTreeMap<&'static str, String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.fields.entry(field).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(|s| s.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.fields.iter().map(|(k, v)| (*k, v.as_str()))
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.fields.values().map(|s| s.as_str()).collect();
        write!(f, "{}", messages.join("; "))
    }
}

#[derive(Error, Debug)]
pub enum JugaadError {
    #[error("Invalid quest: {0}")]
    Validation(ValidationErrors),

    #[error("Insufficient balance: need ₹{requested}, have ₹{available}")]
    InsufficientFunds { requested: i64, available: i64 },

    #[error("Finish \"{title}\" before accepting another quest")]
    AlreadyActive { title: String },

    #[error("Incorrect OTP! Please try again.")]
    OtpMismatch,

    #[error("Quest not found: {0}")]
    QuestNotFound(String),

    #[error("Quest is no longer open: {0}")]
    QuestUnavailable(String),

    #[error("Amount ₹{amount} would overflow a balance of ₹{balance}")]
    AmountOverflow { amount: i64, balance: i64 },

    #[error("No active quest")]
    NoActiveQuest,

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ValidationErrors> for JugaadError {
    fn from(errors: ValidationErrors) -> Self {
        JugaadError::Validation(errors)
    }
}

pub type Result<T> = std::result::Result<T, JugaadError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_keep_first_message_per_field() {
        let mut errors = ValidationErrors::new();
        errors.add("title", "Task name is required");
        errors.add("title", "something else");
        errors.add("reward", "Bounty is required");

        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get("title"), Some("Task name is required"));
        assert_eq!(
            errors.to_string(),
            "Bounty is required; Task name is required"
        );
    }

    #[test]
    fn test_insufficient_funds_message() {
        let err = JugaadError::InsufficientFunds { requested: 500, available: 450 };
        assert_eq!(err.to_string(), "Insufficient balance: need ₹500, have ₹450");
    }
}
