pub mod chat;
pub mod notifications;
pub mod verify;
pub mod wallet;
