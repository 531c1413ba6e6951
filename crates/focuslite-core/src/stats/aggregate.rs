//! Per-day and per-project totals.
//!
//! All sums are taken in integer seconds and converted to minutes by
//! truncation. Only the per-session display figure rounds.

use serde::Serialize;
use std::collections::HashMap;

use crate::session::Session;

fn total_secs<'a>(sessions: impl IntoIterator<Item = &'a Session>) -> u64 {
    sessions.into_iter().map(|s| s.duration_sec).sum()
}

/// Sessions whose day key equals `today`, in log order.
pub fn todays_sessions<'a>(sessions: &'a [Session], today: &str) -> Vec<&'a Session> {
    sessions.iter().filter(|s| s.day_key == today).collect()
}

/// Whole minutes focused on the day `today`.
pub fn todays_total_minutes(sessions: &[Session], today: &str) -> u64 {
    total_secs(sessions.iter().filter(|s| s.day_key == today)) / 60
}

/// Whole minutes attributed to a project across the whole log.
pub fn total_minutes_for_project(sessions: &[Session], project_id: &str) -> u64 {
    total_secs(sessions.iter().filter(|s| s.project_id == project_id)) / 60
}

/// Minutes shown next to a single session, rounded to nearest.
pub fn session_display_minutes(session: &Session) -> u64 {
    (session.duration_sec + 30) / 60
}

/// One calendar day of sessions, in log order.
#[derive(Debug, Clone)]
pub struct DayBucket<'a> {
    pub day_key: String,
    pub sessions: Vec<&'a Session>,
}

impl DayBucket<'_> {
    pub fn minutes(&self) -> u64 {
        total_secs(self.sessions.iter().copied()) / 60
    }
}

/// Partition the log by day key. Days are returned most recent first.
pub fn group_by_day(sessions: &[Session]) -> Vec<DayBucket<'_>> {
    let mut by_day: HashMap<&str, Vec<&Session>> = HashMap::new();
    for s in sessions {
        by_day.entry(s.day_key.as_str()).or_default().push(s);
    }

    let mut buckets: Vec<DayBucket<'_>> = by_day
        .into_iter()
        .map(|(day_key, sessions)| DayBucket {
            day_key: day_key.to_string(),
            sessions,
        })
        .collect();
    // YYYY-MM-DD sorts lexically in date order.
    buckets.sort_by(|a, b| b.day_key.cmp(&a.day_key));
    buckets
}

/// Whole minutes focused on the day `key`. Unknown days yield zero.
pub fn minutes_for_day(sessions: &[Session], key: &str) -> u64 {
    total_secs(sessions.iter().filter(|s| s.day_key == key)) / 60
}

/// Serializable summary of the Today view.
#[derive(Debug, Clone, Serialize)]
pub struct TodaySummary {
    pub day_key: String,
    pub total_minutes: u64,
    pub sessions: Vec<Session>,
}

/// Serializable summary of one History day.
#[derive(Debug, Clone, Serialize)]
pub struct DaySummary {
    pub day_key: String,
    pub minutes: u64,
    pub sessions: Vec<Session>,
}

impl From<&DayBucket<'_>> for DaySummary {
    fn from(bucket: &DayBucket<'_>) -> Self {
        Self {
            day_key: bucket.day_key.clone(),
            minutes: bucket.minutes(),
            sessions: bucket.sessions.iter().map(|s| (*s).clone()).collect(),
        }
    }
}
