//! Submission cooldown tracking
//!
//! The site enforces a per-user wait between answers and reports it only as
//! text. [`Backoff`] remembers the last stated wait and refuses to let further
//! submissions reach the network until it has elapsed.

use crate::client::Outcome;
use crate::error::ClientError;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Source of the current instant
pub trait Clock: Send + Sync + fmt::Debug {
    fn now(&self) -> Instant;
}

/// Wall clock backed by [`Instant::now`]
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<Instant>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Instant::now()),
        }
    }

    /// Move the clock forward
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Whether submissions may currently go out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThrottleState {
    Open,
    Cooling {
        started_at: Instant,
        duration: Duration,
    },
}

impl ThrottleState {
    fn remaining(&self, now: Instant) -> Option<Duration> {
        match *self {
            ThrottleState::Open => None,
            ThrottleState::Cooling {
                started_at,
                duration,
            } => {
                let elapsed = now.saturating_duration_since(started_at);
                (elapsed < duration).then(|| duration - elapsed)
            }
        }
    }
}

/// Gate shared by every submission that should respect the same cooldown
///
/// The upstream limit is per user, so the default client uses the
/// process-wide [`Backoff::shared`] instance. Tests and embedders can create
/// their own, optionally with a [`ManualClock`].
///
/// # Example
///
/// ```
/// use aoc_client::{Backoff, ManualClock, Outcome};
/// use std::sync::Arc;
///
/// let backoff = Backoff::with_clock(Arc::new(ManualClock::new()));
/// let outcome = backoff.attempt(|| Ok(Outcome::Success)).unwrap();
/// assert_eq!(outcome, Outcome::Success);
/// ```
#[derive(Debug)]
pub struct Backoff {
    clock: Arc<dyn Clock>,
    state: Mutex<ThrottleState>,
}

impl Backoff {
    /// Create an open gate driven by the system clock
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create an open gate driven by the given clock
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            state: Mutex::new(ThrottleState::Open),
        }
    }

    /// The process-wide gate, created open on first use
    pub fn shared() -> Arc<Backoff> {
        static SHARED: OnceLock<Arc<Backoff>> = OnceLock::new();
        SHARED.get_or_init(|| Arc::new(Backoff::new())).clone()
    }

    // Poisoning is ignored: the state is always written whole.
    fn lock(&self) -> MutexGuard<'_, ThrottleState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Reopen the gate if its deadline has passed, returning what is left otherwise
    fn refresh(&self, state: &mut ThrottleState) -> Option<Duration> {
        let remaining = state.remaining(self.clock.now());
        if remaining.is_none() && *state != ThrottleState::Open {
            info!("submission cooldown elapsed");
            *state = ThrottleState::Open;
        }
        remaining
    }

    /// Current state, after applying any pending reopen
    pub fn state(&self) -> ThrottleState {
        let mut state = self.lock();
        self.refresh(&mut state);
        *state
    }

    /// Time left before submissions are allowed again
    pub fn remaining(&self) -> Option<Duration> {
        let mut state = self.lock();
        self.refresh(&mut state)
    }

    /// Run one submission attempt through the gate
    ///
    /// While cooling, `submit` is not called and `Waiting` reports the time
    /// left. Otherwise `submit` runs with the gate held, so concurrent callers
    /// go one at a time and each sees any cooldown armed by the previous one.
    /// A `RateLimited` error arms a new cooldown and is returned unchanged.
    pub fn attempt<F>(&self, submit: F) -> Result<Outcome, ClientError>
    where
        F: FnOnce() -> Result<Outcome, ClientError>,
    {
        let mut state = self.lock();

        if let Some(remaining) = self.refresh(&mut state) {
            info!(remaining_ms = remaining.as_millis() as u64, "submission suppressed during cooldown");
            return Ok(Outcome::Waiting { remaining });
        }

        let result = submit();

        if let Err(ClientError::RateLimited { wait }) = &result {
            warn!(%wait, "submission rate limited, cooling down");
            *state = ThrottleState::Cooling {
                started_at: self.clock.now(),
                duration: wait.as_duration(),
            };
        }

        result
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Self::new()
    }
}
