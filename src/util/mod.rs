pub mod database;
pub mod log;
