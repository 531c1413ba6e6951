use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::project::Project;
use crate::session::Session;
use crate::timer::TimerState;

/// Every user-visible state change produces an Event.
/// The CLI prints them as JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    TimerStarted {
        project_id: String,
        remaining_secs: u64,
        /// True when a new countdown began rather than a paused one resuming.
        fresh: bool,
        started_at: DateTime<Utc>,
        at: DateTime<Utc>,
    },
    TimerPaused {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// Countdown reached zero. `session` is `None` when nothing was recorded.
    TimerCompleted {
        session: Option<Session>,
        at: DateTime<Utc>,
    },
    WorkLengthChanged {
        work_minutes: Option<f64>,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    ProjectAdded {
        project: Project,
        at: DateTime<Utc>,
    },
    ProjectSelected {
        project_id: String,
        at: DateTime<Utc>,
    },
    ProjectDeleted {
        project_id: String,
        at: DateTime<Utc>,
    },
    HistoryCleared {
        removed: usize,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: TimerState,
        project_id: Option<String>,
        project_name: Option<String>,
        work_minutes: Option<f64>,
        remaining_secs: u64,
        running: bool,
        started_at: Option<DateTime<Utc>>,
        at: DateTime<Utc>,
    },
}
