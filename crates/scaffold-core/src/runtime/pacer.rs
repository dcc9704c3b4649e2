// crates/scaffold-core/src/runtime/pacer.rs
// ============================================================================
// Module: Schema Scaffold Request Pacer
// Description: FIFO serialization, spacing, and throttle retries for store calls.
// Purpose: Keep outbound call rate under the record store's published limit.
// Dependencies: crate::interfaces, tokio
// ============================================================================

//! ## Overview
//! Every outbound record-store call funnels through one [`RequestPacer`].
//! The pacer executes tasks strictly one at a time in submission order,
//! keeps consecutive calls at least a configured interval apart, and retries
//! throttled calls with the server's wait hint or exponential backoff.
//! Invariants:
//! - Tasks run in submission order; the internal mutex is tokio's fair
//!   mutex, so waiters acquire their turn FIFO.
//! - Spacing is measured from the completion of the previous task.
//! - Only [`StoreError::Throttled`] is retried; all other errors propagate
//!   on the first attempt.
//!
//! The pacer has no knowledge of phases or schemas; it is a passive service
//! used by the engine.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::future::Future;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tokio::time::sleep;

use crate::interfaces::StoreError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default minimum spacing between outbound calls.
///
/// Derived from the record store's published limit of roughly three requests
/// per second, with margin.
pub const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(350);

/// Default number of retries granted to a throttled task.
pub const DEFAULT_MAX_RETRIES: u32 = 5;

// ============================================================================
// SECTION: Pacer Configuration
// ============================================================================

/// Configuration for the request pacer.
///
/// # Invariants
/// - `min_interval` is a lower bound on the gap between call starts.
/// - `max_retries` bounds retries per task; the task runs at most
///   `max_retries + 1` times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacerConfig {
    /// Minimum spacing between outbound calls.
    pub min_interval: Duration,
    /// Maximum retries for a throttled task.
    pub max_retries: u32,
}

impl Default for PacerConfig {
    fn default() -> Self {
        Self {
            min_interval: DEFAULT_MIN_INTERVAL,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

// ============================================================================
// SECTION: Request Pacer
// ============================================================================

/// Serializing, rate-limiting executor for record-store calls.
#[derive(Debug)]
pub struct RequestPacer {
    /// Pacer configuration.
    config: PacerConfig,
    /// Single execution slot; fairness of the lock provides FIFO ordering.
    turn: Mutex<PacerState>,
}

/// Mutable pacing state guarded by the execution slot.
#[derive(Debug, Default)]
struct PacerState {
    /// Completion instant of the most recent task, if any.
    last_finished: Option<Instant>,
}

impl RequestPacer {
    /// Creates a pacer with the provided configuration.
    #[must_use]
    pub fn new(config: PacerConfig) -> Self {
        Self {
            config,
            turn: Mutex::new(PacerState::default()),
        }
    }

    /// Executes `task`, serialized behind every previously submitted task.
    ///
    /// The task closure is re-invoked on each retry, so it must be safe to
    /// call more than once.
    ///
    /// # Errors
    ///
    /// Returns the task's error unchanged for non-throttling failures, or
    /// [`StoreError::Throttled`] once the retry budget is exhausted.
    pub async fn execute<T, F, Fut>(&self, task: F) -> Result<T, StoreError>
    where
        F: Fn() -> Fut + Send,
        Fut: Future<Output = Result<T, StoreError>> + Send,
    {
        let mut state = self.turn.lock().await;
        if let Some(last_finished) = state.last_finished {
            let elapsed = last_finished.elapsed();
            if elapsed < self.config.min_interval {
                sleep(self.config.min_interval - elapsed).await;
            }
        }

        let mut attempt: u32 = 0;
        let result = loop {
            match task().await {
                Ok(value) => break Ok(value),
                Err(StoreError::Throttled {
                    retry_after,
                }) if attempt < self.config.max_retries => {
                    let wait = retry_after
                        .unwrap_or_else(|| Duration::from_secs(2_u64.saturating_pow(attempt)));
                    sleep(wait).await;
                    attempt += 1;
                }
                Err(err) => break Err(err),
            }
        };

        state.last_finished = Some(Instant::now());
        result
    }
}
