//! The recurring one-second tick as an owned resource.

use std::time::Duration;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

/// Owns at most one active interval.
///
/// `start` replaces any running interval, so two can never be live at once.
/// `stop` is idempotent, and dropping the ticker releases it.
#[derive(Debug)]
pub struct Ticker {
    period: Duration,
    interval: Option<Interval>,
}

impl Ticker {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            interval: None,
        }
    }

    pub fn every_second() -> Self {
        Self::new(Duration::from_secs(1))
    }

    pub fn is_active(&self) -> bool {
        self.interval.is_some()
    }

    /// Begin ticking; the first tick fires one period from now.
    pub fn start(&mut self) {
        let mut interval = interval_at(Instant::now() + self.period, self.period);
        // Late ticks are pushed back rather than fired in a burst.
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.interval = Some(interval);
    }

    pub fn stop(&mut self) {
        self.interval = None;
    }

    /// Wait for the next tick. Pending forever while stopped.
    pub async fn tick(&mut self) {
        match self.interval.as_mut() {
            Some(interval) => {
                interval.tick().await;
            }
            None => std::future::pending::<()>().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn ticks_once_per_period() {
        let mut ticker = Ticker::every_second();
        ticker.start();
        let begin = Instant::now();
        ticker.tick().await;
        assert_eq!(begin.elapsed(), Duration::from_secs(1));
        ticker.tick().await;
        assert_eq!(begin.elapsed(), Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn restart_replaces_previous_interval() {
        let mut ticker = Ticker::every_second();
        ticker.start();
        tokio::time::advance(Duration::from_millis(600)).await;
        ticker.start();
        let begin = Instant::now();
        ticker.tick().await;
        // The new interval starts over; the old one never fires.
        assert_eq!(begin.elapsed(), Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn stopped_ticker_never_fires() {
        let mut ticker = Ticker::every_second();
        ticker.start();
        ticker.stop();
        ticker.stop();
        assert!(!ticker.is_active());
        let fired = tokio::time::timeout(Duration::from_secs(5), ticker.tick()).await;
        assert!(fired.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn late_ticks_do_not_burst() {
        let mut ticker = Ticker::every_second();
        ticker.start();
        tokio::time::advance(Duration::from_secs(5)).await;
        ticker.tick().await;
        let after_late = Instant::now();
        ticker.tick().await;
        assert_eq!(after_late.elapsed(), Duration::from_secs(1));
    }
}
