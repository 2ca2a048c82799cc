//! # pomocycle core library
//!
//! Work/break interval timer with cycle tracking, persisted state,
//! notifications and per-user history. The CLI binary is a thin layer
//! over this crate.
//!
//! ## Architecture
//!
//! - **Session machine**: pure state machine over mode, countdown and
//!   cycle counters; every command returns an [`Event`]
//! - **Clock ticker**: the only component touching real time; posts one
//!   tick per interval on the tokio runtime
//! - **Storage**: SQLite key-value records for the snapshot, duration
//!   settings and history, plus TOML configuration
//! - **Notifications**: sound, desktop and toast channels behind traits
//! - **Session**: consumes machine events and performs the side effects
//!
//! ## Key Components
//!
//! - [`SessionMachine`]: core state machine
//! - [`Session`]: machine plus persistence and notifications
//! - [`SessionStore`]: snapshot, duration and history persistence
//! - [`NotificationDispatcher`]: completion side effects
//! - [`ClockTicker`]: countdown driver

pub mod error;
pub mod events;
pub mod identity;
pub mod notify;
pub mod session;
pub mod storage;
pub mod timer;

pub use error::{ConfigError, CoreError, DatabaseError, NotificationError, SnapshotError, ValidationError};
pub use events::{Completion, CompletionKind, Event};
pub use identity::{Anonymous, IdentityProvider, StaticIdentity};
pub use notify::{DispatchReport, NotificationDispatcher, Permission};
pub use session::{RestoreOptions, Session};
pub use storage::{Config, Database, HistoryEntry, HistorySummary, SessionStore};
pub use timer::{
    ClockTicker, DurationSettings, Mode, SessionMachine, SessionSnapshot, SessionStatus, Tick,
};
