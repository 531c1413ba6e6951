//! Application facade tying the components to the persistent store.
//!
//! [`FocusLite`] loads every persisted value once, applies user actions to
//! the in-memory components and writes the affected keys back before
//! returning. Fields that must change together go through a single
//! [`KvStore::set_many_raw`] call.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Result;
use crate::events::Event;
use crate::notify::{completion_body, Notifier, Permission, COMPLETION_TITLE};
use crate::project::{Project, ProjectRegistry};
use crate::session::{record_completion, work_seconds, Completion, SessionLog};
use crate::stats::{self, DaySummary, TodaySummary};
use crate::storage::{entry, keys, KvStore, StoreExt};
use crate::timer::{parse_work_length, valid_work_minutes, Expiry, RunState, TimerEngine};

/// Which summary the user is looking at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    #[default]
    Today,
    History,
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            View::Today => f.write_str("today"),
            View::History => f.write_str("history"),
        }
    }
}

impl FromStr for View {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "today" => Ok(View::Today),
            "history" => Ok(View::History),
            other => Err(format!("unknown view '{other}', expected 'today' or 'history'")),
        }
    }
}

/// A project together with the minutes logged against it.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectTotal {
    #[serde(flatten)]
    pub project: Project,
    pub active: bool,
    pub total_minutes: u64,
}

pub struct FocusLite<S, N> {
    store: S,
    notifier: N,
    default_work_minutes: f64,
    registry: ProjectRegistry,
    sessions: SessionLog,
    timer: TimerEngine,
    view: View,
}

impl<S: KvStore, N: Notifier> FocusLite<S, N> {
    /// Load all state from `store`.
    ///
    /// `default_work_minutes` seeds the work length when the store has
    /// none. Notification permission is requested here if undecided.
    pub fn load(store: S, mut notifier: N, default_work_minutes: f64) -> Result<Self> {
        if notifier.permission() == Permission::Default {
            notifier.request_permission();
        }
        let mut app = Self {
            store,
            notifier,
            default_work_minutes,
            registry: ProjectRegistry::default(),
            sessions: SessionLog::default(),
            timer: TimerEngine::new(Some(default_work_minutes)),
            view: View::default(),
        };
        app.reload()?;
        Ok(app)
    }

    /// Re-read every persisted value, picking up writes from other processes.
    ///
    /// A store without a work length gets the configured default written
    /// to it along with the seeded run state, after which the store wins.
    pub fn reload(&mut self) -> Result<()> {
        let first_run = self.store.get_raw(keys::WORK_MINUTES)?.is_none();
        let work_minutes: Option<f64> = self
            .store
            .get_or(keys::WORK_MINUTES, Some(self.default_work_minutes))?;
        let seed = valid_work_minutes(work_minutes)
            .map(work_seconds)
            .unwrap_or(0);
        let run = RunState {
            remaining_secs: self.store.get_or(keys::REMAINING, seed)?,
            running: self.store.get_or(keys::RUNNING, false)?,
            current_start: self.store.get_or(keys::CURRENT_START, None)?,
        };
        self.timer = TimerEngine::from_parts(work_minutes, run);
        if first_run {
            let mut entries = vec![entry(keys::WORK_MINUTES, &work_minutes)?];
            entries.extend(self.run_state_entries()?);
            self.store.set_many_raw(&entries)?;
            tracing::info!(?work_minutes, "seeded work length from configuration");
        }

        let projects: Vec<Project> = self
            .store
            .get_or(keys::PROJECTS, vec![Project::default_project()])?;
        let active: Option<String> = self.store.get_or(keys::ACTIVE_PROJECT, None)?;
        self.registry = ProjectRegistry::new(projects, active);
        self.sessions = SessionLog::new(self.store.get_or(keys::SESSIONS, Vec::new())?);
        self.view = self.store.get_or(keys::VIEW, View::default())?;
        Ok(())
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn timer(&self) -> &TimerEngine {
        &self.timer
    }

    pub fn projects(&self) -> &ProjectRegistry {
        &self.registry
    }

    pub fn sessions(&self) -> &SessionLog {
        &self.sessions
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn active_project(&self) -> Option<&Project> {
        self.registry.active()
    }

    /// Whether start/resume is currently allowed.
    pub fn can_start(&self) -> bool {
        self.timer.can_start(self.registry.active())
    }

    pub fn snapshot(&self) -> Event {
        self.timer.snapshot(self.registry.active())
    }

    pub fn project_totals(&self) -> Vec<ProjectTotal> {
        let active = self.registry.active().map(|p| p.id.clone());
        self.registry
            .projects()
            .iter()
            .map(|p| ProjectTotal {
                project: p.clone(),
                active: active.as_deref() == Some(p.id.as_str()),
                total_minutes: stats::total_minutes_for_project(self.sessions.sessions(), &p.id),
            })
            .collect()
    }

    pub fn today_summary(&self, today: &str) -> TodaySummary {
        let sessions = self.sessions.sessions();
        TodaySummary {
            day_key: today.to_string(),
            total_minutes: stats::todays_total_minutes(sessions, today),
            sessions: stats::todays_sessions(sessions, today)
                .into_iter()
                .cloned()
                .collect(),
        }
    }

    pub fn history(&self) -> Vec<DaySummary> {
        stats::group_by_day(self.sessions.sessions())
            .iter()
            .map(DaySummary::from)
            .collect()
    }

    // ── Projects ─────────────────────────────────────────────────────

    /// Create and select a project. Blank names are ignored.
    pub fn add_project(&mut self, name: &str) -> Result<Option<Event>> {
        let Some(project) = self.registry.add(name).cloned() else {
            return Ok(None);
        };
        self.persist_projects()?;
        tracing::info!(project_id = %project.id, name = %project.name, "project added");
        Ok(Some(Event::ProjectAdded {
            project,
            at: Utc::now(),
        }))
    }

    pub fn select_project(&mut self, id: &str) -> Result<Event> {
        self.registry.select(id);
        self.store.set(keys::ACTIVE_PROJECT, self.registry.active_id())?;
        Ok(Event::ProjectSelected {
            project_id: id.to_string(),
            at: Utc::now(),
        })
    }

    /// Delete a project. The default project and unknown ids are ignored.
    pub fn delete_project(&mut self, id: &str) -> Result<Option<Event>> {
        if !self.registry.delete(id) {
            return Ok(None);
        }
        self.persist_projects()?;
        tracing::info!(project_id = %id, "project deleted");
        Ok(Some(Event::ProjectDeleted {
            project_id: id.to_string(),
            at: Utc::now(),
        }))
    }

    // ── Timer ────────────────────────────────────────────────────────

    /// Store a new work length (`None` is the blank sentinel).
    pub fn set_work_length(&mut self, work_minutes: Option<f64>) -> Result<Event> {
        self.timer.set_work_minutes(work_minutes);
        let mut entries = vec![entry(keys::WORK_MINUTES, &work_minutes)?];
        entries.extend(self.run_state_entries()?);
        self.store.set_many_raw(&entries)?;
        Ok(Event::WorkLengthChanged {
            work_minutes,
            remaining_secs: self.timer.remaining_secs(),
            at: Utc::now(),
        })
    }

    /// Apply raw user input for the work length; invalid input is ignored.
    pub fn set_work_length_input(&mut self, input: &str) -> Result<Option<Event>> {
        match parse_work_length(input) {
            Some(work_minutes) => self.set_work_length(work_minutes).map(Some),
            None => Ok(None),
        }
    }

    pub fn start(&mut self) -> Result<Option<Event>> {
        let event = self.timer.start(self.registry.active());
        if event.is_some() {
            self.persist_run_state()?;
        }
        Ok(event)
    }

    pub fn pause(&mut self) -> Result<Option<Event>> {
        let event = self.timer.pause();
        if event.is_some() {
            self.persist_run_state()?;
        }
        Ok(event)
    }

    pub fn reset(&mut self) -> Result<Event> {
        let event = self.timer.reset();
        self.persist_run_state()?;
        Ok(event)
    }

    /// Advance the countdown by one second.
    ///
    /// Returns the completion event on the tick that reaches zero.
    pub fn tick(&mut self) -> Result<Option<Event>> {
        match self.timer.tick() {
            Some(expiry) => self.complete(expiry).map(Some),
            None => {
                self.persist_run_state()?;
                Ok(None)
            }
        }
    }

    fn complete(&mut self, expiry: Expiry) -> Result<Event> {
        let now = Utc::now();
        let project = self.registry.active().cloned();
        let session = record_completion(&Completion {
            started_at: expiry.started_at,
            project: project.as_ref(),
            work_minutes: expiry.work_minutes,
            ended_at: now,
        });

        let mut entries = self.run_state_entries()?;
        match &session {
            Some(session) => {
                self.sessions.prepend(session.clone());
                entries.push(entry(keys::SESSIONS, &self.sessions)?);
                tracing::info!(
                    session_id = %session.id,
                    project_id = %session.project_id,
                    duration_sec = session.duration_sec,
                    "session recorded"
                );
            }
            None => {
                tracing::warn!(
                    has_start = expiry.started_at.is_some(),
                    has_project = project.is_some(),
                    valid_length = valid_work_minutes(expiry.work_minutes).is_some(),
                    "countdown expired, nothing recorded"
                );
            }
        }
        self.store.set_many_raw(&entries)?;

        let body = completion_body(project.as_ref().map(|p| p.name.as_str()));
        self.notifier.notify(COMPLETION_TITLE, &body);

        Ok(Event::TimerCompleted { session, at: now })
    }

    // ── View & history ───────────────────────────────────────────────

    pub fn set_view(&mut self, view: View) -> Result<()> {
        self.view = view;
        self.store.set(keys::VIEW, &view)
    }

    /// Delete all sessions once `confirm` returns true.
    ///
    /// Without confirmation (or with an empty log) nothing changes.
    pub fn clear_history(&mut self, confirm: impl FnOnce() -> bool) -> Result<Option<Event>> {
        let Some(removed) = self.sessions.clear_confirmed(confirm) else {
            return Ok(None);
        };
        self.store.set(keys::SESSIONS, &self.sessions)?;
        tracing::info!(removed, "session history cleared");
        Ok(Some(Event::HistoryCleared {
            removed,
            at: Utc::now(),
        }))
    }

    // ── Persistence ──────────────────────────────────────────────────

    fn run_state_entries(&self) -> Result<Vec<(&'static str, String)>> {
        let run = self.timer.run_state();
        Ok(vec![
            entry(keys::REMAINING, &run.remaining_secs)?,
            entry(keys::RUNNING, &run.running)?,
            entry(keys::CURRENT_START, &run.current_start)?,
        ])
    }

    fn persist_run_state(&self) -> Result<()> {
        self.store.set_many_raw(&self.run_state_entries()?)
    }

    fn persist_projects(&self) -> Result<()> {
        self.store.set_many_raw(&[
            entry(keys::PROJECTS, self.registry.projects())?,
            entry(keys::ACTIVE_PROJECT, self.registry.active_id())?,
        ])
    }
}
