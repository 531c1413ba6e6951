//! Completed focus sessions and the newest-first session log.
//!
//! A [`Session`] is created only by [`record_completion`], which is invoked
//! once per natural countdown expiry. Sessions are never edited afterwards;
//! the log can only grow at the front or be cleared as a whole.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::project::Project;

/// Build a prefixed opaque identifier, e.g. `p_1f0c...`.
pub fn new_id(prefix: &str) -> String {
    format!("{prefix}_{}", Uuid::new_v4().simple())
}

/// Calendar-day bucket (`YYYY-MM-DD`) of a timestamp.
///
/// Buckets are always computed in UTC so that `dayKey` values and "today"
/// agree regardless of the machine's local time zone.
pub fn day_key(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d").to_string()
}

/// Day key of the current instant.
pub fn today_key() -> String {
    day_key(Utc::now())
}

/// An immutable record of one completed focus interval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    /// Weak reference: the project may have been deleted since.
    pub project_id: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    /// Configured work length at completion, not measured elapsed time.
    pub duration_sec: u64,
    pub day_key: String,
}

/// Work length in whole seconds, rounding fractional minutes.
pub(crate) fn work_seconds(work_minutes: f64) -> u64 {
    (work_minutes * 60.0).round().max(0.0) as u64
}

/// Inputs gathered at the moment the countdown reached zero.
#[derive(Debug, Clone)]
pub struct Completion<'a> {
    pub started_at: Option<DateTime<Utc>>,
    pub project: Option<&'a Project>,
    pub work_minutes: Option<f64>,
    pub ended_at: DateTime<Utc>,
}

/// Materialize a session from a completed countdown.
///
/// Returns `None` when any precondition is missing (no start timestamp, no
/// resolvable project, or an invalid work length). Callers still clear the
/// run state in that case.
pub fn record_completion(completion: &Completion<'_>) -> Option<Session> {
    let started_at = completion.started_at?;
    let project = completion.project?;
    let minutes = completion
        .work_minutes
        .filter(|m| m.is_finite() && *m > 0.0)?;

    Some(Session {
        id: new_id("s"),
        project_id: project.id.clone(),
        started_at,
        ended_at: completion.ended_at,
        duration_sec: work_seconds(minutes),
        day_key: day_key(completion.ended_at),
    })
}

/// Append-only session history, newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionLog {
    sessions: Vec<Session>,
}

impl SessionLog {
    pub fn new(sessions: Vec<Session>) -> Self {
        Self { sessions }
    }

    pub fn prepend(&mut self, session: Session) {
        self.sessions.insert(0, session);
    }

    /// Remove every session if `confirm` agrees. Returns the number removed.
    ///
    /// The callback is the explicit confirmation step; it is consulted only
    /// when there is something to clear.
    pub fn clear_confirmed(&mut self, confirm: impl FnOnce() -> bool) -> Option<usize> {
        if self.sessions.is_empty() || !confirm() {
            return None;
        }
        let removed = self.sessions.len();
        self.sessions.clear();
        Some(removed)
    }

    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn project() -> Project {
        Project::default_project()
    }

    #[test]
    fn day_key_uses_utc_calendar_day() {
        let late = Utc.with_ymd_and_hms(2024, 3, 9, 23, 59, 59).unwrap();
        assert_eq!(day_key(late), "2024-03-09");
        let early = Utc.with_ymd_and_hms(2024, 3, 10, 0, 0, 0).unwrap();
        assert_eq!(day_key(early), "2024-03-10");
    }

    #[test]
    fn records_configured_duration_not_elapsed() {
        let p = project();
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        // Three hours of wall clock for a 25 minute session.
        let end = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let session = record_completion(&Completion {
            started_at: Some(start),
            project: Some(&p),
            work_minutes: Some(25.0),
            ended_at: end,
        })
        .unwrap();

        assert_eq!(session.duration_sec, 1500);
        assert_eq!(session.project_id, "p_default");
        assert_eq!(session.started_at, start);
        assert_eq!(session.ended_at, end);
        assert_eq!(session.day_key, "2024-05-01");
        assert!(session.id.starts_with("s_"));
    }

    #[test]
    fn fractional_minutes_round_to_seconds() {
        let p = project();
        let now = Utc::now();
        let session = record_completion(&Completion {
            started_at: Some(now),
            project: Some(&p),
            work_minutes: Some(0.255),
            ended_at: now,
        })
        .unwrap();
        assert_eq!(session.duration_sec, 15);
    }

    #[test]
    fn missing_preconditions_record_nothing() {
        let p = project();
        let now = Utc::now();
        let base = Completion {
            started_at: Some(now),
            project: Some(&p),
            work_minutes: Some(1.0),
            ended_at: now,
        };

        let no_start = Completion { started_at: None, ..base.clone() };
        assert!(record_completion(&no_start).is_none());

        let no_project = Completion { project: None, ..base.clone() };
        assert!(record_completion(&no_project).is_none());

        let blank = Completion { work_minutes: None, ..base.clone() };
        assert!(record_completion(&blank).is_none());

        let nan = Completion { work_minutes: Some(f64::NAN), ..base };
        assert!(record_completion(&nan).is_none());
    }

    #[test]
    fn prepend_keeps_newest_first() {
        let p = project();
        let now = Utc::now();
        let mut log = SessionLog::default();
        for _ in 0..3 {
            let s = record_completion(&Completion {
                started_at: Some(now),
                project: Some(&p),
                work_minutes: Some(1.0),
                ended_at: now,
            })
            .unwrap();
            log.prepend(s);
        }
        let first_id = log.sessions()[0].id.clone();
        let extra = record_completion(&Completion {
            started_at: Some(now),
            project: Some(&p),
            work_minutes: Some(2.0),
            ended_at: now,
        })
        .unwrap();
        let extra_id = extra.id.clone();
        log.prepend(extra);
        assert_eq!(log.len(), 4);
        assert_eq!(log.sessions()[0].id, extra_id);
        assert_eq!(log.sessions()[1].id, first_id);
    }

    #[test]
    fn clear_requires_confirmation() {
        let p = project();
        let now = Utc::now();
        let mut log = SessionLog::default();
        log.prepend(
            record_completion(&Completion {
                started_at: Some(now),
                project: Some(&p),
                work_minutes: Some(1.0),
                ended_at: now,
            })
            .unwrap(),
        );

        assert_eq!(log.clear_confirmed(|| false), None);
        assert_eq!(log.len(), 1);

        assert_eq!(log.clear_confirmed(|| true), Some(1));
        assert!(log.is_empty());
    }

    #[test]
    fn session_json_uses_camel_case() {
        let p = project();
        let now = Utc::now();
        let s = record_completion(&Completion {
            started_at: Some(now),
            project: Some(&p),
            work_minutes: Some(1.0),
            ended_at: now,
        })
        .unwrap();
        let json = serde_json::to_value(&s).unwrap();
        for key in ["id", "projectId", "startedAt", "endedAt", "durationSec", "dayKey"] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
    }
}
