use clap::Subcommand;
use pomocycle_core::Config;

/// Keys understood by `config get` and `config set`.
const KEYS: &str = "notifications.sound, notifications.desktop, notifications.toast, \
notifications.click_feedback, user.id, restore.reconcile_elapsed, ticker.interval_ms";

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    #[command(after_help = format!("Keys: {KEYS}"))]
    Get {
        /// Dotted key, e.g. "notifications.desktop" or "user.id"
        key: String,
    },
    /// Set a config value and save it
    #[command(after_help = format!("Keys: {KEYS}"))]
    Set {
        /// Dotted key, e.g. "restore.reconcile_elapsed"
        key: String,
        /// New value (true/false for switches, milliseconds for ticker.interval_ms)
        value: String,
    },
    /// List all config values
    List,
    /// Print the path of config.toml
    Path,
    /// Reset config to defaults
    Reset,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            let value = config
                .get(&key)
                .ok_or_else(|| format!("unknown key: {key} (known keys: {KEYS})"))?;
            println!("{value}");
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            config.save()?;
            let stored = config.get(&key).unwrap_or(value);
            println!("{key} = {stored}");
        }
        ConfigAction::List => {
            let config = Config::load()?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        ConfigAction::Path => {
            println!("{}", Config::path()?.display());
        }
        ConfigAction::Reset => {
            Config::default().save()?;
            println!("config reset to defaults");
        }
    }
    Ok(())
}
