//! Completion notifications.
//!
//! Delivery is fire-and-forget: callers never learn whether a notification
//! was shown.

use serde::{Deserialize, Serialize};

pub const COMPLETION_TITLE: &str = "Focus session complete!";

/// Permission state of a notification channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    /// Not asked yet.
    Default,
    Granted,
    Denied,
}

pub trait Notifier {
    fn permission(&self) -> Permission;

    /// Ask for permission. Idempotent and best-effort.
    fn request_permission(&mut self);

    /// Show a notification. Must be a no-op unless permission is granted.
    fn notify(&mut self, title: &str, body: &str);
}

/// Body text for a completion notification.
pub fn completion_body(project_name: Option<&str>) -> String {
    match project_name {
        Some(name) => format!("Project: {name}"),
        None => "Nice work!".to_string(),
    }
}

/// Notifier that drops everything; permission stays denied.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn permission(&self) -> Permission {
        Permission::Denied
    }

    fn request_permission(&mut self) {}

    fn notify(&mut self, _title: &str, _body: &str) {}
}
