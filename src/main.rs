use std::fs::File;
use std::sync::Mutex;

use campus_jugaad::util::log::init_log_dir;
use campus_jugaad::{log_info, App, AppConfig};

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let config = AppConfig::load()?;
    init_log_dir(&config.log_dir);

    // The terminal belongs to the UI, so tracing output goes to a file too
    std::fs::create_dir_all(&config.log_dir)?;
    let trace_file = File::create(config.log_dir.join("trace.log"))?;
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(trace_file))
        .with_ansi(false)
        .init();

    log_info!("Starting CampusJugaad with store at {}", config.db_path.display());

    let app = App::new(config)?;
    let terminal = ratatui::init();
    let result = app.run(terminal).await;
    ratatui::restore();
    result
}
