//! Shared setup for commands that touch the session.

use pomocycle_core::notify::{LogNotifier, StderrToaster, TerminalBell};
use pomocycle_core::{
    Config, IdentityProvider, NotificationDispatcher, Permission, RestoreOptions, Session, SessionStore,
    StaticIdentity,
};

pub const USER_ENV: &str = "POMOCYCLE_USER";

pub struct Context {
    user_flag: Option<String>,
}

impl Context {
    pub fn new(user_flag: Option<String>) -> Self {
        Self { user_flag }
    }

    pub fn config(&self) -> Result<Config, Box<dyn std::error::Error>> {
        Ok(Config::load()?)
    }

    /// `--user`, then `POMOCYCLE_USER`, then `user.id` from config.
    pub fn identity(&self, config: &Config) -> StaticIdentity {
        let from_env = std::env::var(USER_ENV).ok().filter(|id| !id.trim().is_empty());
        let id = self
            .user_flag
            .clone()
            .or(from_env)
            .or_else(|| config.user_id().map(str::to_string));
        StaticIdentity::new(id)
    }

    /// Open the persisted session with terminal notification backends.
    pub fn open_session(&self) -> Result<Session, Box<dyn std::error::Error>> {
        let config = self.config()?;
        self.open_session_with(&config)
    }

    pub fn open_session_with(&self, config: &Config) -> Result<Session, Box<dyn std::error::Error>> {
        let store = SessionStore::open()?;
        let permission = if config.notifications.desktop {
            Permission::Granted
        } else {
            Permission::Denied
        };
        let notifier = NotificationDispatcher::new(
            Box::new(TerminalBell),
            Box::new(LogNotifier::new(permission)),
            Box::new(StderrToaster),
            config.notifications.clone(),
        );
        let options = RestoreOptions {
            reconcile_elapsed: config.restore.reconcile_elapsed,
        };
        Ok(Session::open(
            store,
            notifier,
            Box::new(self.identity(config)),
            options,
        ))
    }

    /// The resolved user id, if any.
    pub fn user_id(&self, config: &Config) -> Option<String> {
        self.identity(config).current_user_id()
    }
}
