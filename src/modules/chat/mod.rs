// src/modules/chat/mod.rs

pub mod offline;
pub mod service;

pub use offline::offline_reply;
pub use service::{ChatReply, ChatRequest, ChatService};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::modules::session::EngagedQuest;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Taskmaster,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub sender: Sender,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(sender: Sender, text: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            sender,
            text: text.into(),
            timestamp: now,
        }
    }
}

/// What the Task Master persona knows about the quest being chatted about.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestContext {
    pub title: String,
    pub location: Option<String>,
    pub reward: i64,
    pub otp: String,
}

impl QuestContext {
    pub fn from_engaged(engaged: &EngagedQuest) -> Self {
        Self {
            title: engaged.quest.title.clone(),
            location: engaged.quest.location.clone(),
            reward: engaged.quest.reward,
            otp: engaged.quest.otp.clone(),
        }
    }

    pub fn greeting(&self) -> String {
        format!(
            "Hey! Thanks for picking up \"{}\". I'm at {}. Let me know when you're close!",
            self.title,
            self.location.as_deref().unwrap_or("the location")
        )
    }

    pub fn system_prompt(&self) -> String {
        format!(
            "INSTRUCTIONS:\n\
             You are acting as the \"Task Master\" on the CampusJugaad app.\n\
             You posted a quest: \"{title}\" at \"{location}\".\n\
             Reward: ₹{reward}.\n\n\
             The user (Hero) has accepted your quest.\n\
             YOUR SECRET OTP IS: [ {otp} ]\n\n\
             RULES:\n\
             1. Be friendly, casual, and act like a college student.\n\
             2. Keep responses short (under 2 sentences).\n\
             3. DO NOT reveal the OTP at the start.\n\
             4. ONLY reveal the OTP when the user explicitly says they have \"completed\", \"finished\", or \"done\" the task.\n\
             5. If they ask for the OTP before finishing, tell them to finish the job first.\n\n\
             Start the conversation now.",
            title = self.title,
            location = self.location.as_deref().unwrap_or("Campus Center"),
            reward = self.reward,
            otp = self.otp,
        )
    }
}

/// One conversation with the Task Master for the active quest.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatSession {
    pub context: QuestContext,
    messages: Vec<ChatMessage>,
    /// Sticky: once a remote call fails, the rest of the session stays offline.
    pub offline: bool,
    pub awaiting_reply: bool,
}

impl ChatSession {
    pub fn open(context: QuestContext, remote_available: bool, now: DateTime<Utc>) -> Self {
        let greeting = ChatMessage::new(Sender::Taskmaster, context.greeting(), now);
        Self {
            context,
            messages: vec![greeting],
            offline: !remote_available,
            awaiting_reply: false,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Records the user's line and returns the request to send, or `None`
    /// for blank input or while a reply is still pending.
    pub fn submit(&mut self, text: &str, now: DateTime<Utc>) -> Option<ChatRequest> {
        let text = text.trim();
        if text.is_empty() || self.awaiting_reply {
            return None;
        }

        self.messages.push(ChatMessage::new(Sender::User, text, now));
        self.awaiting_reply = true;

        Some(ChatRequest {
            context: self.context.clone(),
            history: self.messages.clone(),
            text: text.to_string(),
            offline: self.offline,
        })
    }

    pub fn receive(&mut self, reply: ChatReply, now: DateTime<Utc>) {
        self.offline |= reply.offline;
        self.awaiting_reply = false;
        self.messages.push(ChatMessage::new(Sender::Taskmaster, reply.text, now));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn context() -> QuestContext {
        QuestContext {
            title: "Print Assignment".into(),
            location: Some("Library".into()),
            reward: 100,
            otp: "4821".into(),
        }
    }

    #[test]
    fn test_greeting_and_prompt() {
        let ctx = context();
        assert_eq!(
            ctx.greeting(),
            "Hey! Thanks for picking up \"Print Assignment\". I'm at Library. Let me know when you're close!"
        );

        let prompt = ctx.system_prompt();
        assert!(prompt.contains("YOUR SECRET OTP IS: [ 4821 ]"));
        assert!(prompt.contains("Reward: ₹100."));
        assert!(prompt.contains("at \"Library\""));

        let no_location = QuestContext { location: None, ..context() };
        assert!(no_location.system_prompt().contains("at \"Campus Center\""));
        assert!(no_location.greeting().contains("I'm at the location."));
    }

    #[test]
    fn test_session_submit_and_receive() {
        let now = Utc::now();
        let mut chat = ChatSession::open(context(), false, now);
        assert!(chat.offline);
        assert_eq!(chat.messages().len(), 1);

        assert!(chat.submit("   ", now).is_none());

        let request = chat.submit("on my way", now).unwrap();
        assert!(request.offline);
        assert_eq!(request.history.len(), 2);
        assert!(chat.submit("again", now).is_none());

        chat.receive(ChatReply { text: "Cool, see you soon.".into(), offline: true }, now);
        assert!(!chat.awaiting_reply);
        assert_eq!(chat.messages().len(), 3);
        assert_eq!(chat.messages()[2].sender, Sender::Taskmaster);
    }

    #[test]
    fn test_offline_is_sticky() {
        let now = Utc::now();
        let mut chat = ChatSession::open(context(), true, now);
        assert!(!chat.offline);

        chat.submit("hi", now).unwrap();
        chat.receive(ChatReply { text: "Perfect.".into(), offline: true }, now);
        assert!(chat.offline);

        chat.submit("hello?", now).unwrap();
        chat.receive(ChatReply { text: "hey".into(), offline: false }, now);
        assert!(chat.offline);
    }
}
