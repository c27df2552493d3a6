// src/modules/session/mod.rs

pub mod database;
pub use database::SessionDatabase;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{JugaadError, Result};
use crate::log_info;
use crate::modules::quest::Quest;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngagedQuest {
    /// Snapshot taken at acceptance, including the verification code.
    pub quest: Quest,
    pub accepted_at: DateTime<Utc>,
    pub chat_open: bool,
}

/// At most one accepted, unverified quest per user.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ActiveQuestSession {
    #[default]
    Idle,
    Engaged(EngagedQuest),
}

impl ActiveQuestSession {
    pub fn from_snapshot(snapshot: Option<EngagedQuest>) -> Self {
        snapshot.map_or(ActiveQuestSession::Idle, ActiveQuestSession::Engaged)
    }

    pub fn snapshot(&self) -> Option<&EngagedQuest> {
        match self {
            ActiveQuestSession::Idle => None,
            ActiveQuestSession::Engaged(engaged) => Some(engaged),
        }
    }

    pub fn is_engaged(&self) -> bool {
        matches!(self, ActiveQuestSession::Engaged(_))
    }

    pub fn active_quest(&self) -> Option<&Quest> {
        self.snapshot().map(|e| &e.quest)
    }

    pub fn holds(&self, quest_id: &str) -> bool {
        self.active_quest().is_some_and(|q| q.id == quest_id)
    }

    /// Idle -> Engaged. Already engaged stays put and reports the held quest.
    pub fn engage(&mut self, quest: Quest, now: DateTime<Utc>) -> Result<()> {
        if let ActiveQuestSession::Engaged(current) = self {
            return Err(JugaadError::AlreadyActive {
                title: current.quest.title.clone(),
            });
        }

        *self = ActiveQuestSession::Engaged(EngagedQuest {
            quest,
            accepted_at: now,
            chat_open: false,
        });
        Ok(())
    }

    /// Engaged -> Idle. Only called after a verified completion.
    pub(crate) fn release(&mut self) -> Option<EngagedQuest> {
        match std::mem::take(self) {
            ActiveQuestSession::Idle => None,
            ActiveQuestSession::Engaged(engaged) => Some(engaged),
        }
    }

    /// The dismiss control on the active-quest bar. It does nothing while a
    /// quest is held: the only way out is verification.
    pub fn dismiss(&mut self) -> bool {
        if let Some(quest) = self.active_quest() {
            log_info!("Dismiss ignored while \"{}\" is active", quest.title);
        }
        false
    }

    pub fn toggle_chat(&mut self) -> bool {
        match self {
            ActiveQuestSession::Idle => false,
            ActiveQuestSession::Engaged(engaged) => {
                engaged.chat_open = !engaged.chat_open;
                engaged.chat_open
            }
        }
    }

    pub fn set_chat_open(&mut self, open: bool) {
        if let ActiveQuestSession::Engaged(engaged) = self {
            engaged.chat_open = open;
        }
    }

    pub fn is_chat_open(&self) -> bool {
        self.snapshot().is_some_and(|e| e.chat_open)
    }

    pub fn countdown(&self, now: DateTime<Utc>) -> Option<Countdown> {
        self.active_quest().map(|q| Countdown::until(q.deadline_iso, now))
    }
}

/// Cosmetic only: expiry never changes session or quest state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Countdown {
    Remaining(Duration),
    Expired,
}

impl Countdown {
    pub fn until(deadline: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let distance = deadline - now;
        if distance < Duration::zero() {
            Countdown::Expired
        } else {
            Countdown::Remaining(distance)
        }
    }
}

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Countdown::Expired => write!(f, "EXPIRED"),
            Countdown::Remaining(d) => {
                let total = d.num_seconds();
                // Days roll over, matching the bar's HH:MM:SS width
                let hours = (total / 3600) % 24;
                let minutes = (total / 60) % 60;
                let seconds = total % 60;
                write!(f, "{:02}:{:02}:{:02}", hours, minutes, seconds)
            }
        }
    }
}
