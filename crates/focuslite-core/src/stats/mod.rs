//! Statistics over the session log.
//!
//! Everything here is derived on demand from the log; nothing is cached.

mod aggregate;

pub use aggregate::{
    group_by_day, minutes_for_day, session_display_minutes, todays_sessions,
    todays_total_minutes, total_minutes_for_project, DayBucket, DaySummary, TodaySummary,
};
