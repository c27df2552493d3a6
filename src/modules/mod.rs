pub mod chat;
pub mod leaderboard;
pub mod marketplace;
pub mod notification;
pub mod quest;
pub mod session;
pub mod user;
pub mod wallet;
