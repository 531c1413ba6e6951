//! Plain-text rendering of timer and summary views.

use chrono::{Local, NaiveDate};
use focuslite_core::stats::{session_display_minutes, DaySummary, TodaySummary};
use focuslite_core::{ProjectRegistry, ProjectTotal, Session};

/// Sessions listed in the Today view.
const TODAY_LIST_LIMIT: usize = 8;

/// `mm:ss`, minutes unbounded.
pub fn format_seconds(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

fn minutes_word(n: u64) -> &'static str {
    if n == 1 {
        "minute"
    } else {
        "minutes"
    }
}

fn session_line(session: &Session, projects: &ProjectRegistry) -> String {
    let when = session.ended_at.with_timezone(&Local).format("%H:%M");
    format!(
        "  ✅ {when}  {}m • {}",
        session_display_minutes(session),
        projects.display_name(&session.project_id)
    )
}

pub fn today(summary: &TodaySummary, projects: &ProjectRegistry) -> String {
    let mut out = String::from("Today\n");
    out.push_str(&format!(
        "{} {} focused\n",
        summary.total_minutes,
        minutes_word(summary.total_minutes)
    ));
    if summary.sessions.is_empty() {
        out.push_str("  No sessions yet.\n");
    }
    for session in summary.sessions.iter().take(TODAY_LIST_LIMIT) {
        out.push_str(&session_line(session, projects));
        out.push('\n');
    }
    out
}

fn day_label(day_key: &str) -> String {
    NaiveDate::parse_from_str(day_key, "%Y-%m-%d")
        .map(|d| d.format("%a, %b %-d, %Y").to_string())
        .unwrap_or_else(|_| day_key.to_string())
}

pub fn history(days: &[DaySummary], projects: &ProjectRegistry) -> String {
    let mut out = String::from("History\n");
    if days.is_empty() {
        out.push_str("  No past sessions yet.\n");
    }
    for day in days {
        out.push_str(&format!(
            "{} ({} {})\n",
            day_label(&day.day_key),
            day.minutes,
            minutes_word(day.minutes)
        ));
        for session in &day.sessions {
            out.push_str(&session_line(session, projects));
            out.push('\n');
        }
    }
    out
}

pub fn projects(totals: &[ProjectTotal]) -> String {
    let mut out = String::new();
    for total in totals {
        let marker = if total.active { '*' } else { ' ' };
        out.push_str(&format!(
            "{marker} {:<24} {:>6}m  {}  ({})\n",
            total.project.name,
            total.total_minutes,
            total.project.color.as_deref().unwrap_or("-"),
            total.project.id,
        ));
    }
    out
}
