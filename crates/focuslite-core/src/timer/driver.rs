//! Drives a running timer from the [`Ticker`].
//!
//! The driver owns the ticker for exactly as long as the timer is running.
//! Before every tick it reloads persisted state, so a pause or reset issued
//! by another process stops the countdown instead of being overwritten.
//! Ticking requires the driver lease, so at most one process ticks a
//! countdown at a time.

use chrono::Utc;
use std::future::Future;

use super::lease;
use super::ticker::Ticker;
use crate::app::FocusLite;
use crate::error::Result;
use crate::events::Event;
use crate::notify::Notifier;
use crate::session::new_id;
use crate::storage::KvStore;

/// Why [`drive`] returned.
#[derive(Debug)]
pub enum DriveOutcome {
    /// The timer was not running to begin with.
    NotRunning,
    /// The countdown expired; carries the completion event.
    Completed(Event),
    /// Running was cleared from outside (pause or reset).
    Stopped,
    /// The shutdown future resolved first. Persisted state is left as is.
    Detached,
    /// Another driver holds the lease, or took it over after ours went stale.
    AlreadyDriven,
}

/// Tick `app` once per second until it stops running or `shutdown` fires.
///
/// `on_tick` observes the app after every non-final tick.
pub async fn drive<S, N, F>(
    app: &mut FocusLite<S, N>,
    shutdown: F,
    on_tick: impl FnMut(&FocusLite<S, N>),
) -> Result<DriveOutcome>
where
    S: KvStore,
    N: Notifier,
    F: Future<Output = ()>,
{
    if !app.timer().is_running() {
        return Ok(DriveOutcome::NotRunning);
    }

    let owner = new_id("drv");
    if !lease::claim(app.store(), &owner, Utc::now())? {
        tracing::info!("countdown is already driven by another process");
        return Ok(DriveOutcome::AlreadyDriven);
    }

    let outcome = tick_until_stopped(app, &owner, shutdown, on_tick).await;
    let released = lease::release(app.store(), &owner);
    let outcome = outcome?;
    released?;
    tracing::debug!(?outcome, "ticker released");
    Ok(outcome)
}

async fn tick_until_stopped<S, N, F>(
    app: &mut FocusLite<S, N>,
    owner: &str,
    shutdown: F,
    mut on_tick: impl FnMut(&FocusLite<S, N>),
) -> Result<DriveOutcome>
where
    S: KvStore,
    N: Notifier,
    F: Future<Output = ()>,
{
    let mut ticker = Ticker::every_second();
    ticker.start();
    tracing::debug!(owner, remaining_secs = app.timer().remaining_secs(), "ticker acquired");
    tokio::pin!(shutdown);

    let outcome = loop {
        tokio::select! {
            _ = &mut shutdown => break DriveOutcome::Detached,
            _ = ticker.tick() => {
                app.reload()?;
                if !app.timer().is_running() {
                    break DriveOutcome::Stopped;
                }
                if !lease::claim(app.store(), owner, Utc::now())? {
                    tracing::warn!(owner, "driver lease lost to another process");
                    break DriveOutcome::AlreadyDriven;
                }
                match app.tick()? {
                    Some(event) => break DriveOutcome::Completed(event),
                    None => on_tick(app),
                }
            }
        }
    };

    ticker.stop();
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::NullNotifier;
    use crate::storage::{keys, MemoryStore, StoreExt};
    use crate::timer::lease::DriverLease;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn idle_timer_is_not_driven() {
        let mut app = FocusLite::load(MemoryStore::new(), NullNotifier, 1.0).unwrap();
        let outcome = drive(&mut app, std::future::pending(), |_| {}).await.unwrap();
        assert!(matches!(outcome, DriveOutcome::NotRunning));
    }

    #[tokio::test(start_paused = true)]
    async fn runs_to_completion() {
        let mut app = FocusLite::load(MemoryStore::new(), NullNotifier, 1.0).unwrap();
        app.start().unwrap();
        let begin = tokio::time::Instant::now();
        let mut ticks = 0;
        let outcome = drive(&mut app, std::future::pending(), |_| ticks += 1)
            .await
            .unwrap();

        assert!(matches!(outcome, DriveOutcome::Completed(_)));
        assert_eq!(ticks, 59);
        assert_eq!(begin.elapsed(), Duration::from_secs(60));
        assert_eq!(app.sessions().len(), 1);
        assert!(!app.timer().is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_detaches_without_touching_state() {
        let mut app = FocusLite::load(MemoryStore::new(), NullNotifier, 1.0).unwrap();
        app.start().unwrap();
        let shutdown = tokio::time::sleep(Duration::from_millis(10_500));
        let outcome = drive(&mut app, shutdown, |_| {}).await.unwrap();

        assert!(matches!(outcome, DriveOutcome::Detached));
        assert!(app.timer().is_running());
        assert_eq!(app.timer().remaining_secs(), 50);
        assert_eq!(app.store().get_or(keys::REMAINING, 0u64).unwrap(), 50);
    }

    #[tokio::test(start_paused = true)]
    async fn external_pause_stops_driver() {
        let mut app = FocusLite::load(MemoryStore::new(), NullNotifier, 1.0).unwrap();
        app.start().unwrap();
        let outcome = drive(&mut app, std::future::pending(), |app| {
            if app.timer().remaining_secs() == 55 {
                // Another process pauses by writing the running flag.
                app.store().set(keys::RUNNING, &false).unwrap();
            }
        })
        .await
        .unwrap();

        assert!(matches!(outcome, DriveOutcome::Stopped));
        assert_eq!(app.timer().remaining_secs(), 55);
        assert!(app.sessions().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn live_foreign_lease_blocks_driving() {
        let mut app = FocusLite::load(MemoryStore::new(), NullNotifier, 1.0).unwrap();
        app.start().unwrap();
        assert!(lease::claim(app.store(), "drv_other", Utc::now()).unwrap());

        let outcome = drive(&mut app, std::future::pending(), |_| {}).await.unwrap();
        assert!(matches!(outcome, DriveOutcome::AlreadyDriven));
        assert_eq!(app.timer().remaining_secs(), 60);
        // The foreign lease is left alone.
        let holder = lease::holder(app.store(), Utc::now()).unwrap().unwrap();
        assert_eq!(holder.owner, "drv_other");
    }

    #[tokio::test(start_paused = true)]
    async fn stale_lease_is_taken_over_and_released() {
        let mut app = FocusLite::load(MemoryStore::new(), NullNotifier, 1.0).unwrap();
        app.start().unwrap();
        let crashed = DriverLease {
            owner: "drv_crashed".into(),
            heartbeat: Utc::now() - chrono::Duration::seconds(60),
        };
        app.store().set(keys::DRIVER, &crashed).unwrap();

        let outcome = drive(&mut app, std::future::pending(), |_| {}).await.unwrap();
        assert!(matches!(outcome, DriveOutcome::Completed(_)));
        assert_eq!(app.store().get_raw(keys::DRIVER).unwrap().as_deref(), Some("null"));
    }

    #[tokio::test(start_paused = true)]
    async fn detaching_releases_the_lease() {
        let mut app = FocusLite::load(MemoryStore::new(), NullNotifier, 1.0).unwrap();
        app.start().unwrap();
        let shutdown = tokio::time::sleep(Duration::from_millis(2_500));
        let outcome = drive(&mut app, shutdown, |_| {}).await.unwrap();

        assert!(matches!(outcome, DriveOutcome::Detached));
        assert!(lease::holder(app.store(), Utc::now()).unwrap().is_none());
    }
}
