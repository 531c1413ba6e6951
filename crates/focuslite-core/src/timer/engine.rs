//! Timer engine implementation.
//!
//! The timer engine is a whole-second countdown state machine. It does not
//! own a clock or a thread: the caller invokes `tick()` once per elapsed
//! second while the timer is running (see [`super::Ticker`]).
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running <-> Paused
//!           |
//!           v
//!        Expired -> Running (restart)
//! reset: any -> Idle
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::events::Event;
use crate::project::Project;
use crate::session::work_seconds;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    Running,
    Paused,
    /// Countdown reached zero and the timer stopped.
    Expired,
}

/// The persisted subset of the engine that changes while counting down.
///
/// These three fields are always written together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunState {
    pub remaining_secs: u64,
    pub running: bool,
    pub current_start: Option<DateTime<Utc>>,
}

/// What the countdown knew when it reached zero.
#[derive(Debug, Clone, PartialEq)]
pub struct Expiry {
    pub started_at: Option<DateTime<Utc>>,
    pub work_minutes: Option<f64>,
}

/// A usable work length: finite and strictly positive.
pub fn valid_work_minutes(work_minutes: Option<f64>) -> Option<f64> {
    work_minutes.filter(|m| m.is_finite() && *m > 0.0)
}

/// Interpret user input for the work length.
///
/// Returns `Some(None)` for blank input (the editing sentinel),
/// `Some(Some(m))` for a positive number, and `None` when the input should
/// be ignored.
pub fn parse_work_length(input: &str) -> Option<Option<f64>> {
    let input = input.trim();
    if input.is_empty() {
        return Some(None);
    }
    input
        .parse::<f64>()
        .ok()
        .filter(|m| m.is_finite() && *m > 0.0)
        .map(Some)
}

/// Core timer engine.
#[derive(Debug, Clone, PartialEq)]
pub struct TimerEngine {
    /// `None` while the preference is blank; timer controls are disabled.
    work_minutes: Option<f64>,
    remaining_secs: u64,
    running: bool,
    current_start: Option<DateTime<Utc>>,
}

impl TimerEngine {
    /// Create an idle engine seeded with the full work length.
    pub fn new(work_minutes: Option<f64>) -> Self {
        Self {
            work_minutes,
            remaining_secs: valid_work_minutes(work_minutes)
                .map(work_seconds)
                .unwrap_or(0),
            running: false,
            current_start: None,
        }
    }

    /// Rebuild an engine from persisted parts.
    pub fn from_parts(work_minutes: Option<f64>, run: RunState) -> Self {
        Self {
            work_minutes,
            remaining_secs: run.remaining_secs,
            running: run.running,
            current_start: run.current_start,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        if self.running {
            TimerState::Running
        } else if self.remaining_secs == 0 {
            TimerState::Expired
        } else if self.current_start.is_some() {
            TimerState::Paused
        } else {
            TimerState::Idle
        }
    }

    pub fn work_minutes(&self) -> Option<f64> {
        self.work_minutes
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn current_start(&self) -> Option<DateTime<Utc>> {
        self.current_start
    }

    pub fn run_state(&self) -> RunState {
        RunState {
            remaining_secs: self.remaining_secs,
            running: self.running,
            current_start: self.current_start,
        }
    }

    /// Whether start/resume is currently allowed.
    pub fn can_start(&self, project: Option<&Project>) -> bool {
        project.is_some() && valid_work_minutes(self.work_minutes).is_some()
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self, project: Option<&Project>) -> Event {
        Event::StateSnapshot {
            state: self.state(),
            project_id: project.map(|p| p.id.clone()),
            project_name: project.map(|p| p.name.clone()),
            work_minutes: self.work_minutes,
            remaining_secs: self.remaining_secs,
            running: self.running,
            started_at: self.current_start,
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Change the work length. Reseeds the countdown unless running.
    pub fn set_work_minutes(&mut self, work_minutes: Option<f64>) {
        self.work_minutes = work_minutes;
        if !self.running {
            if let Some(minutes) = valid_work_minutes(work_minutes) {
                self.remaining_secs = work_seconds(minutes);
            }
        }
    }

    /// Start a fresh countdown or resume a paused one.
    ///
    /// Ignored without a project or a valid work length, and while
    /// already running.
    pub fn start(&mut self, project: Option<&Project>) -> Option<Event> {
        if self.running {
            return None;
        }
        let project = project?;
        let minutes = valid_work_minutes(self.work_minutes)?;

        let now = Utc::now();
        let fresh = self.remaining_secs == 0 || self.current_start.is_none();
        if self.remaining_secs == 0 {
            self.remaining_secs = work_seconds(minutes);
            self.current_start = Some(now);
        }
        let started_at = *self.current_start.get_or_insert(now);
        self.running = true;

        tracing::debug!(
            project_id = %project.id,
            remaining_secs = self.remaining_secs,
            fresh,
            "timer started"
        );
        Some(Event::TimerStarted {
            project_id: project.id.clone(),
            remaining_secs: self.remaining_secs,
            fresh,
            started_at,
            at: now,
        })
    }

    pub fn pause(&mut self) -> Option<Event> {
        if !self.running {
            return None;
        }
        self.running = false;
        tracing::debug!(remaining_secs = self.remaining_secs, "timer paused");
        Some(Event::TimerPaused {
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Stop and rewind. Never records a session.
    pub fn reset(&mut self) -> Event {
        self.running = false;
        if let Some(minutes) = valid_work_minutes(self.work_minutes) {
            self.remaining_secs = work_seconds(minutes);
        }
        self.current_start = None;
        tracing::debug!(remaining_secs = self.remaining_secs, "timer reset");
        Event::TimerReset {
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        }
    }

    /// Advance one second. Returns `Some` exactly when the countdown expires.
    ///
    /// On expiry the engine stops and hands the start timestamp over in the
    /// returned [`Expiry`], leaving no start recorded.
    pub fn tick(&mut self) -> Option<Expiry> {
        if !self.running {
            return None;
        }
        if self.remaining_secs > 1 {
            self.remaining_secs -= 1;
            return None;
        }
        self.remaining_secs = 0;
        self.running = false;
        Some(Expiry {
            started_at: self.current_start.take(),
            work_minutes: self.work_minutes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn general() -> Project {
        Project::default_project()
    }

    #[test]
    fn new_engine_is_idle_and_seeded() {
        let engine = TimerEngine::new(Some(25.0));
        assert_eq!(engine.state(), TimerState::Idle);
        assert_eq!(engine.remaining_secs(), 1500);
        assert!(engine.current_start().is_none());
    }

    #[test]
    fn start_pause_resume() {
        let p = general();
        let mut engine = TimerEngine::new(Some(1.0));

        let started = engine.start(Some(&p)).unwrap();
        assert!(matches!(started, Event::TimerStarted { fresh: true, .. }));
        assert_eq!(engine.state(), TimerState::Running);
        let stamp = engine.current_start().unwrap();

        engine.tick();
        assert!(engine.pause().is_some());
        assert_eq!(engine.state(), TimerState::Paused);
        assert_eq!(engine.remaining_secs(), 59);
        assert_eq!(engine.current_start(), Some(stamp));

        // Ticks while paused are ignored.
        assert!(engine.tick().is_none());
        assert_eq!(engine.remaining_secs(), 59);

        let resumed = engine.start(Some(&p)).unwrap();
        assert!(matches!(resumed, Event::TimerStarted { fresh: false, .. }));
        assert_eq!(engine.remaining_secs(), 59);
        assert_eq!(engine.current_start(), Some(stamp));
    }

    #[test]
    fn start_requires_project_and_valid_length() {
        let p = general();
        let mut engine = TimerEngine::new(Some(5.0));
        assert!(engine.start(None).is_none());
        assert!(!engine.is_running());

        let mut blank = TimerEngine::new(None);
        assert!(!blank.can_start(Some(&p)));
        assert!(blank.start(Some(&p)).is_none());
        assert!(!blank.is_running());
        assert!(blank.current_start().is_none());
    }

    #[test]
    fn start_while_running_is_ignored() {
        let p = general();
        let mut engine = TimerEngine::new(Some(1.0));
        engine.start(Some(&p));
        assert!(engine.start(Some(&p)).is_none());
    }

    #[test]
    fn pause_when_idle_is_noop() {
        let mut engine = TimerEngine::new(Some(1.0));
        assert!(engine.pause().is_none());
        assert_eq!(engine.state(), TimerState::Idle);
    }

    #[test]
    fn countdown_expires_exactly_once() {
        let p = general();
        let mut engine = TimerEngine::new(Some(1.0));
        engine.start(Some(&p));
        let start = engine.current_start();

        let mut expiries = Vec::new();
        for _ in 0..120 {
            if let Some(e) = engine.tick() {
                expiries.push(e);
            }
        }
        assert_eq!(expiries.len(), 1);
        assert_eq!(expiries[0].started_at, start);
        assert_eq!(expiries[0].work_minutes, Some(1.0));
        assert_eq!(engine.remaining_secs(), 0);
        assert!(!engine.is_running());
        assert!(engine.current_start().is_none());
        assert_eq!(engine.state(), TimerState::Expired);
    }

    #[test]
    fn expiry_happens_on_the_sixtieth_tick() {
        let p = general();
        let mut engine = TimerEngine::new(Some(1.0));
        engine.start(Some(&p));
        for _ in 0..59 {
            assert!(engine.tick().is_none());
        }
        assert_eq!(engine.remaining_secs(), 1);
        assert!(engine.tick().is_some());
    }

    #[test]
    fn restart_after_expiry_reseeds_and_restamps() {
        let p = general();
        let mut engine = TimerEngine::new(Some(1.0));
        engine.start(Some(&p));
        while engine.tick().is_none() {}
        assert!(engine.start(Some(&p)).is_some());
        assert_eq!(engine.remaining_secs(), 60);
        assert!(engine.current_start().is_some());
    }

    #[test]
    fn reset_rewinds_and_clears_start() {
        let p = general();
        let mut engine = TimerEngine::new(Some(2.0));
        engine.start(Some(&p));
        engine.tick();
        engine.reset();
        assert_eq!(engine.state(), TimerState::Idle);
        assert_eq!(engine.remaining_secs(), 120);
        assert!(engine.current_start().is_none());
    }

    #[test]
    fn reset_with_blank_length_keeps_remaining() {
        let p = general();
        let mut engine = TimerEngine::new(Some(2.0));
        engine.start(Some(&p));
        engine.tick();
        engine.pause();
        engine.set_work_minutes(None);
        engine.reset();
        assert_eq!(engine.remaining_secs(), 119);
        assert!(engine.current_start().is_none());
    }

    #[test]
    fn changing_length_while_running_waits() {
        let p = general();
        let mut engine = TimerEngine::new(Some(1.0));
        engine.start(Some(&p));
        engine.tick();
        engine.set_work_minutes(Some(10.0));
        assert_eq!(engine.remaining_secs(), 59);
        engine.reset();
        assert_eq!(engine.remaining_secs(), 600);
    }

    #[test]
    fn blank_length_does_not_reseed() {
        let mut engine = TimerEngine::new(Some(3.0));
        engine.set_work_minutes(None);
        assert_eq!(engine.work_minutes(), None);
        assert_eq!(engine.remaining_secs(), 180);
    }

    #[test]
    fn parse_work_length_inputs() {
        assert_eq!(parse_work_length(""), Some(None));
        assert_eq!(parse_work_length("   "), Some(None));
        assert_eq!(parse_work_length("25"), Some(Some(25.0)));
        assert_eq!(parse_work_length(" 0.5 "), Some(Some(0.5)));
        assert_eq!(parse_work_length("0"), None);
        assert_eq!(parse_work_length("-3"), None);
        assert_eq!(parse_work_length("abc"), None);
        assert_eq!(parse_work_length("inf"), None);
        assert_eq!(parse_work_length("NaN"), None);
    }

    proptest! {
        #[test]
        fn idle_length_change_reseeds(m in 1u32..10_000) {
            let mut engine = TimerEngine::new(Some(25.0));
            engine.set_work_minutes(Some(m as f64));
            prop_assert_eq!(engine.remaining_secs(), m as u64 * 60);
            prop_assert_eq!(engine.state(), TimerState::Idle);
        }

        #[test]
        fn full_countdown_completes_once(n in 1u64..500) {
            let mut engine = TimerEngine::from_parts(Some(25.0), RunState {
                remaining_secs: n,
                running: true,
                current_start: Some(Utc::now()),
            });
            let mut completions = 0;
            for _ in 0..(n + 10) {
                if engine.tick().is_some() {
                    completions += 1;
                }
            }
            prop_assert_eq!(completions, 1);
            prop_assert_eq!(engine.remaining_secs(), 0);
        }
    }
}
