mod config;
pub mod database;
pub mod session_store;

pub use config::{Config, NotificationsConfig, RestoreConfig, TickerConfig, UserConfig};
pub use database::Database;
pub use session_store::{HistoryEntry, HistorySummary, SessionStore};

use std::path::PathBuf;

/// Returns the data directory, creating it if needed.
///
/// `POMOCYCLE_HOME` overrides the location outright. Otherwise this is
/// `~/.config/pomocycle[-dev]/`, with POMOCYCLE_ENV=dev selecting the
/// development directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let dir = match std::env::var_os("POMOCYCLE_HOME") {
        Some(home) if !home.is_empty() => PathBuf::from(home),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("POMOCYCLE_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("pomocycle-dev")
            } else {
                base_dir.join("pomocycle")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
