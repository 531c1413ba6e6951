//! # FocusLite Core Library
//!
//! Business logic for the FocusLite focus timer: a countdown tracked against
//! user-defined projects, a newest-first log of completed sessions, and
//! per-day / per-project summaries derived from that log.
//!
//! ## Architecture
//!
//! - **Timer Engine**: whole-second countdown state machine; the caller
//!   ticks it once per second through an owned [`Ticker`]
//! - **Storage**: a JSON key-value store ([`KvStore`]) backed by SQLite,
//!   plus TOML configuration
//! - **Sessions & Stats**: the session recorder and stateless aggregation
//!
//! ## Key Components
//!
//! - [`FocusLite`]: application facade; every user action goes through it
//! - [`TimerEngine`]: Idle / Running / Paused / Expired transitions
//! - [`ProjectRegistry`]: projects and the active selection
//! - [`Database`]: SQLite-backed store
//! - [`Notifier`]: completion alerts

pub mod app;
pub mod error;
pub mod events;
pub mod notify;
pub mod project;
pub mod session;
pub mod stats;
pub mod storage;
pub mod timer;

pub use app::{FocusLite, ProjectTotal, View};
pub use error::{ConfigError, CoreError, StoreError};
pub use events::Event;
pub use notify::{Notifier, NullNotifier, Permission};
pub use project::{Project, ProjectRegistry, DEFAULT_PROJECT_ID};
pub use session::{day_key, today_key, Session, SessionLog};
pub use storage::{Config, Database, KvStore, MemoryStore, StoreExt};
pub use timer::{drive, DriveOutcome, Ticker, TimerEngine, TimerState};
