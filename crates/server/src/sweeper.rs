// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Background sweep.
//!
//! The loop shares the request handlers' store lock, so a sweep and an HTTP
//! request never touch the database at the same time. A failed sweep is
//! logged and retried on the next tick.

use flightline::SystemClock;
use flightline_api::{ApiError, SweepResult, sweep};
use flightline_persistence::Persistence;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

/// Runs one sweep under the store lock.
///
/// # Errors
///
/// Returns an error if the template list cannot be read.
pub async fn run_sweep(
    persistence: &Mutex<Persistence>,
    max_count: usize,
) -> Result<SweepResult, ApiError> {
    let mut guard = persistence.lock().await;
    sweep(&mut *guard, SystemClock, max_count)
}

/// Starts the periodic sweep.
///
/// Returns `None` when `interval` is zero, which disables the loop. The
/// first sweep runs immediately.
pub fn spawn(
    persistence: Arc<Mutex<Persistence>>,
    interval: Duration,
    max_count: usize,
) -> Option<JoinHandle<()>> {
    if interval.is_zero() {
        info!("Background sweep disabled");
        return None;
    }

    info!(interval_secs = interval.as_secs(), max_count, "Starting background sweep");
    Some(tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            match run_sweep(&persistence, max_count).await {
                Ok(result) if result.errors.is_empty() => {
                    debug!(
                        processed = result.processed,
                        occurrences = result.total_occurrences,
                        jobs = result.total_jobs,
                        "Background sweep finished"
                    );
                }
                Ok(result) => {
                    error!(
                        processed = result.processed,
                        failed = result.errors.len(),
                        "Background sweep finished with failures"
                    );
                }
                Err(e) => error!(error = %e, "Background sweep could not start"),
            }
        }
    }))
}
