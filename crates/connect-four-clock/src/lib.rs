//! Per-session move deadline for Connect Four.
//!
//! A [`TurnClock`] holds at most one pending deadline. Arming it replaces
//! whatever was pending (re-arming, not stacking); cancelling clears it.
//! Each arm cycle fires at most once.
//!
//! # Integration
//!
//! The clock is meant to sit inside a session actor's `tokio::select!`
//! loop next to the command channel:
//!
//! ```ignore
//! loop {
//!     tokio::select! {
//!         Some(cmd) = cmd_rx.recv() => { /* may re-arm or cancel */ }
//!         firing = clock.fired() => { /* the player ran out of time */ }
//!     }
//! }
//! ```
//!
//! Whichever branch wins owns that loop iteration. The `fired()` future
//! of the losing branch is dropped, and the next iteration builds a new
//! one from the clock's current deadline, so a deadline that a move
//! replaced can never fire.

use std::time::Duration;

use tokio::time::{self, Instant};
use tracing::{debug, trace};

/// Move deadline used when nothing else is configured.
pub const DEFAULT_MOVE_TIMEOUT: Duration = Duration::from_secs(60);

/// Returned by [`TurnClock::fired`] when a deadline elapses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Firing {
    /// The arm cycle that fired (see [`TurnClock::cycle`]).
    pub cycle: u64,
    /// How far past the deadline the clock was observed.
    pub late_by: Duration,
}

/// A single-shot, re-armable, cancellable deadline.
#[derive(Debug, Default)]
pub struct TurnClock {
    /// When the pending deadline elapses. `None` while disarmed.
    deadline: Option<Instant>,
    /// Incremented on every `arm`.
    cycle: u64,
}

impl TurnClock {
    /// Creates a disarmed clock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a deadline `duration` from now and returns its cycle number.
    ///
    /// Any pending deadline is discarded first.
    pub fn arm(&mut self, duration: Duration) -> u64 {
        if self.deadline.is_some() {
            trace!(cycle = self.cycle, "turn clock re-armed, previous deadline dropped");
        }
        self.cycle += 1;
        self.deadline = Some(Instant::now() + duration);
        trace!(
            cycle = self.cycle,
            timeout_ms = duration.as_millis() as u64,
            "turn clock armed"
        );
        self.cycle
    }

    /// Disarms the clock without firing. Returns `true` if a deadline was
    /// pending.
    ///
    /// Safe to call on a clock that already fired or was already
    /// cancelled.
    pub fn cancel(&mut self) -> bool {
        let was_armed = self.deadline.take().is_some();
        if was_armed {
            trace!(cycle = self.cycle, "turn clock cancelled");
        }
        was_armed
    }

    /// Waits for the pending deadline, then disarms the clock.
    ///
    /// Pends forever while disarmed. Cancel-safe: dropping the future
    /// before the deadline leaves the clock untouched.
    pub async fn fired(&mut self) -> Firing {
        let Some(deadline) = self.deadline else {
            return std::future::pending().await;
        };

        time::sleep_until(deadline).await;

        self.deadline = None;
        let late_by = Instant::now().saturating_duration_since(deadline);
        debug!(
            cycle = self.cycle,
            late_ms = late_by.as_millis() as u64,
            "turn clock fired"
        );
        Firing {
            cycle: self.cycle,
            late_by,
        }
    }

    /// Whether a deadline is pending.
    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// The pending deadline, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time until the pending deadline. `Some(ZERO)` once it has passed
    /// but not yet been observed by [`fired`](Self::fired).
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|d| d.saturating_duration_since(Instant::now()))
    }

    /// Number of times the clock has been armed.
    pub fn cycle(&self) -> u64 {
        self.cycle
    }
}
