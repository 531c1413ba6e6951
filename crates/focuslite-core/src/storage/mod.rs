mod config;
pub mod database;
mod memory;

pub use config::{Config, LoggingConfig, NotificationsConfig, TimerConfig};
pub use database::Database;
pub use memory::MemoryStore;

use serde::{de::DeserializeOwned, Serialize};
use std::path::PathBuf;

use crate::error::{CoreError, Result};

/// Fixed names of every persisted value.
pub mod keys {
    pub const WORK_MINUTES: &str = "fl_workMin";
    pub const VIEW: &str = "fl_view";
    pub const PROJECTS: &str = "fl_projects";
    pub const ACTIVE_PROJECT: &str = "fl_activeProject";
    pub const SESSIONS: &str = "fl_sessions";
    pub const CURRENT_START: &str = "fl_currentStartISO";
    pub const REMAINING: &str = "fl_remaining";
    pub const RUNNING: &str = "fl_running";
    pub const DRIVER: &str = "fl_driver";
}

/// Synchronous key-value store holding JSON text.
pub trait KvStore {
    fn get_raw(&self, key: &str) -> Result<Option<String>>;

    fn set_raw(&self, key: &str, value: &str) -> Result<()>;

    /// Write several values as one unit.
    ///
    /// Backends that support transactions must apply all or none.
    fn set_many_raw(&self, entries: &[(&str, String)]) -> Result<()> {
        for (key, value) in entries {
            self.set_raw(key, value)?;
        }
        Ok(())
    }

    /// Write `value` only if the current value equals `expected`
    /// (`None` meaning absent). Returns whether the write happened.
    ///
    /// Backends shared between processes must make the check and the write
    /// atomic.
    fn compare_and_set_raw(&self, key: &str, expected: Option<&str>, value: &str) -> Result<bool> {
        if self.get_raw(key)?.as_deref() != expected {
            return Ok(false);
        }
        self.set_raw(key, value)?;
        Ok(true)
    }
}

impl<T: KvStore + ?Sized> KvStore for &T {
    fn get_raw(&self, key: &str) -> Result<Option<String>> {
        (**self).get_raw(key)
    }

    fn set_raw(&self, key: &str, value: &str) -> Result<()> {
        (**self).set_raw(key, value)
    }

    fn set_many_raw(&self, entries: &[(&str, String)]) -> Result<()> {
        (**self).set_many_raw(entries)
    }

    fn compare_and_set_raw(&self, key: &str, expected: Option<&str>, value: &str) -> Result<bool> {
        (**self).compare_and_set_raw(key, expected, value)
    }
}

/// Typed JSON access on top of [`KvStore`].
pub trait StoreExt: KvStore {
    /// Read `key`, falling back to `default` when absent or undecodable.
    fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> Result<T> {
        match self.get_raw(key)? {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(value) => Ok(value),
                Err(err) => {
                    tracing::warn!(key, error = %err, "stored value is not decodable, using default");
                    Ok(default)
                }
            },
            None => Ok(default),
        }
    }

    fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        self.set_raw(key, &serde_json::to_string(value)?)
    }
}

impl<S: KvStore + ?Sized> StoreExt for S {}

/// Encode one entry for [`KvStore::set_many_raw`].
pub fn entry<'k, T: Serialize + ?Sized>(key: &'k str, value: &T) -> Result<(&'k str, String)> {
    Ok((key, serde_json::to_string(value)?))
}

/// Resolve the data directory and create it if needed.
///
/// `FOCUSLITE_DATA_DIR` wins when set. Otherwise `~/.config/focuslite`, or
/// `~/.config/focuslite-dev` when `FOCUSLITE_ENV=dev`.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("FOCUSLITE_DATA_DIR") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => {
            let base_dir = dirs::home_dir()
                .ok_or_else(|| CoreError::DataDir("home directory not found".into()))?
                .join(".config");
            let env = std::env::var("FOCUSLITE_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("focuslite-dev")
            } else {
                base_dir.join("focuslite")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
