//! Terminal delivery of completion notifications.

use std::io::{IsTerminal, Write};

use focuslite_core::{Notifier, Permission};

/// Rings the terminal bell and prints the message to stderr.
///
/// Permission is granted on request only when notifications are enabled
/// and stderr is attached to a terminal.
pub struct TerminalNotifier {
    enabled: bool,
    permission: Permission,
}

impl TerminalNotifier {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            permission: if enabled {
                Permission::Default
            } else {
                Permission::Denied
            },
        }
    }
}

impl Notifier for TerminalNotifier {
    fn permission(&self) -> Permission {
        self.permission
    }

    fn request_permission(&mut self) {
        if self.permission != Permission::Default {
            return;
        }
        self.permission = if self.enabled && std::io::stderr().is_terminal() {
            Permission::Granted
        } else {
            Permission::Denied
        };
        tracing::debug!(permission = ?self.permission, "notification permission decided");
    }

    fn notify(&mut self, title: &str, body: &str) {
        if self.permission != Permission::Granted {
            return;
        }
        tracing::info!(title, body, "notification");
        let mut stderr = std::io::stderr().lock();
        let _ = writeln!(stderr, "\x07{title} {body}");
    }
}
