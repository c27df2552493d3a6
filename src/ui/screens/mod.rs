pub mod dashboard;
pub mod find;
pub mod leaderboard;
pub mod login;
pub mod post;
