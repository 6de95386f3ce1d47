//! Trailing call coalescing for bursty UI input
//!
//! Collapses a burst of triggers (search-as-you-type, map drag updates) into a
//! single delayed action:
//! - Only the most recent action of a burst runs
//! - An action never fires sooner than `interval` after the previous one fired
//! - Dropping the coalescer cancels whatever is still pending
//!
//! # Example
//!
//! ```rust,no_run
//! use spotfeed_core::coalescer::CallCoalescer;
//! use std::time::Duration;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let mut search = CallCoalescer::new(Duration::from_millis(300));
//!
//! for query in ["p", "pi", "piz", "pizza"] {
//!     search.call(move || println!("searching for {query}"));
//! }
//! // Only "pizza" is searched, 300ms from now.
//! # }
//! ```

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{sleep, Instant};
use tracing::trace;

#[derive(Debug, Default)]
struct State {
    /// Bumped on every `call` and on drop; a task only fires if it still
    /// holds the current generation when it wakes.
    generation: u64,
    last_fire: Option<Instant>,
}

/// State shared with the scheduled task
#[derive(Debug, Default)]
struct Shared {
    state: Mutex<State>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, State> {
        // Handle poisoned lock by recovering the data (an action panicking
        // after the timestamp was written leaves it valid)
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn supersede(&self) -> u64 {
        let mut state = self.lock();
        state.generation += 1;
        state.generation
    }

    /// Records the fire time if `generation` is still current.
    fn claim(&self, generation: u64) -> bool {
        let mut state = self.lock();
        if state.generation != generation {
            return false;
        }
        state.last_fire = Some(Instant::now());
        true
    }
}

/// Delays an action until a quiet period has passed, replacing any action
/// that is still waiting.
///
/// Actions run on the Tokio runtime that `call` is made from. `call` takes
/// `&mut self`: one owner drives the coalescer from one event loop.
///
/// The coalescer does not catch panics from an action; a panicking action
/// unwinds its task exactly as if it had been spawned directly.
#[derive(Debug)]
pub struct CallCoalescer {
    interval: Duration,
    shared: Arc<Shared>,
    pending: Option<JoinHandle<()>>,
}

impl CallCoalescer {
    /// Create a coalescer with the given quiet interval
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            shared: Arc::new(Shared::default()),
            pending: None,
        }
    }

    /// The configured quiet interval
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// When an action last actually ran, if ever
    #[must_use]
    pub fn last_fire(&self) -> Option<Instant> {
        self.shared.lock().last_fire
    }

    /// Whether an action is scheduled and has not run yet
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    /// Schedule `action` one full interval from now, cancelling any action
    /// that has not fired yet.
    ///
    /// Every call restarts the quiet period, so only the last call of a burst
    /// runs, and it runs no sooner than `interval` after the previous firing.
    /// The generation check and the `last_fire` write happen under one lock,
    /// so a call racing a waking task on a multi-threaded runtime either
    /// supersedes it or lands after it has fired.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    pub fn call<F>(&mut self, action: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.cancel_pending();

        let generation = self.shared.supersede();
        let shared = Arc::clone(&self.shared);
        let delay = self.interval;

        trace!(
            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            generation,
            "Scheduling coalesced call"
        );

        self.pending = Some(tokio::spawn(async move {
            sleep(delay).await;

            if !shared.claim(generation) {
                return;
            }
            trace!(generation, "Firing coalesced call");
            action();
        }));
    }

    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            if !handle.is_finished() {
                trace!("Superseding pending coalesced call");
            }
            handle.abort();
        }
    }
}

impl Drop for CallCoalescer {
    fn drop(&mut self) {
        self.shared.supersede();
        self.cancel_pending();
    }
}
