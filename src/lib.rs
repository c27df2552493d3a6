pub mod app;
pub mod config;
pub mod error;
pub mod event;
pub mod modules;
pub mod ui;
pub mod util;

pub use app::App;
pub use config::AppConfig;
pub use error::{JugaadError, Result};
pub use modules::marketplace::Marketplace;
