//! Cosmetic upload progress.
//!
//! Nothing here measures bytes on the wire. The ticker only exists so the
//! user sees movement while the single multipart request is in flight; it
//! creeps towards [`PROGRESS_CEILING`] and the workflow jumps it to 100 once
//! the server answers. Real transfer progress would need its own source and
//! must not be fed through this type.

use crate::messages::{UploadPhase, UploadState};
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// Highest value reported before the real result is known
pub const PROGRESS_CEILING: f64 = 95.0;

/// Exclusive upper bound of a single random step
pub const MAX_INCREMENT: f64 = 15.0;

/// Produces the next step size on every tick
pub type IncrementSource = Box<dyn FnMut() -> f64 + Send>;

/// Uniform steps in `[0, MAX_INCREMENT)`
pub fn random_increments() -> IncrementSource {
    Box::new(|| rand::rng().random_range(0.0..MAX_INCREMENT))
}

/// Next progress value; never moves backwards and never passes `ceiling`
pub fn advance(current: f64, increment: f64, ceiling: f64) -> f64 {
    (current + increment.max(0.0)).min(ceiling).max(current)
}

/// Timer task nudging `progress_percent` while an upload is in flight.
///
/// Dropping the handle aborts the task as well, so an abandoned upload never
/// leaves a live timer behind.
pub struct SimulatedProgress {
    handle: JoinHandle<()>,
}

impl SimulatedProgress {
    pub fn start(
        state: Arc<watch::Sender<UploadState>>,
        period: Duration,
        mut increments: IncrementSource,
    ) -> Self {
        let handle = tokio::spawn(async move {
            // First bump lands one full period after the upload starts
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                let increment = increments();

                let mut finished = false;
                state.send_if_modified(|s| {
                    if s.phase != UploadPhase::Uploading {
                        finished = true;
                        return false;
                    }
                    let next = advance(s.progress_percent, increment, PROGRESS_CEILING);
                    finished = next >= PROGRESS_CEILING;
                    let changed = next > s.progress_percent;
                    s.progress_percent = next;
                    changed
                });

                if finished {
                    tracing::debug!("Simulated progress ticker finished");
                    break;
                }
            }
        });

        Self { handle }
    }

    /// Tear the ticker down and wait until it can no longer write
    pub async fn stop(mut self) {
        self.handle.abort();
        let _ = (&mut self.handle).await;
    }
}

impl Drop for SimulatedProgress {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
