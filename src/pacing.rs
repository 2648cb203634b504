//! Pause durations for retry backoff and politeness pacing.
//!
//! Components never call `rand` for their delays directly; they ask a
//! [`DelayStrategy`] for a duration inside a [`DelayWindow`] and sleep for
//! that long. Production runs use [`JitteredDelay`], tests use [`NoDelay`] so
//! the whole pipeline runs without waiting.

use rand::{Rng, rng};
use serde::Deserialize;
use std::time::Duration;
use tokio::time::sleep;
use tracing::debug;

/// Inclusive range a pause is drawn from, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct DelayWindow {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl DelayWindow {
    pub const fn from_millis(min_ms: u64, max_ms: u64) -> Self {
        Self { min_ms, max_ms }
    }

    pub fn is_valid(&self) -> bool {
        self.min_ms <= self.max_ms
    }

    pub fn min(&self) -> Duration {
        Duration::from_millis(self.min_ms)
    }

    pub fn max(&self) -> Duration {
        Duration::from_millis(self.max_ms)
    }
}

/// Source of pause durations.
pub trait DelayStrategy {
    /// Duration to pause for, given the window the caller allows.
    fn delay(&self, window: DelayWindow) -> Duration;
}

impl<T: DelayStrategy + ?Sized> DelayStrategy for &T {
    fn delay(&self, window: DelayWindow) -> Duration {
        (**self).delay(window)
    }
}

/// Uniformly random duration inside the window.
#[derive(Debug, Clone, Copy, Default)]
pub struct JitteredDelay;

impl DelayStrategy for JitteredDelay {
    fn delay(&self, window: DelayWindow) -> Duration {
        if window.max_ms <= window.min_ms {
            return window.min();
        }
        Duration::from_millis(rng().random_range(window.min_ms..=window.max_ms))
    }
}

/// Always zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

impl DelayStrategy for NoDelay {
    fn delay(&self, _window: DelayWindow) -> Duration {
        Duration::ZERO
    }
}

/// Ask `strategy` for a duration and sleep for it.
///
/// Returns the duration slept so callers can log it.
pub async fn pause<D: DelayStrategy + ?Sized>(
    strategy: &D,
    window: DelayWindow,
    reason: &'static str,
) -> Duration {
    let d = strategy.delay(window);
    if !d.is_zero() {
        debug!(?d, reason, "Pausing");
        sleep(d).await;
    }
    d
}
