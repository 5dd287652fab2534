use std::time::{Duration, Instant};

pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(200);

/// Handle for a scheduled emission. Replaced on every reschedule, so only
/// the latest one can fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingEmission {
    pub due: Instant,
    pub generation: u64,
}

/// Trailing-edge debounce: an emission becomes due once `quiet_period` has
/// passed since the last change.
#[derive(Debug)]
pub struct NotificationScheduler {
    quiet_period: Duration,
    pending: Option<PendingEmission>,
    generation: u64,
}

impl Default for NotificationScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_QUIET_PERIOD)
    }
}

impl NotificationScheduler {
    pub fn new(quiet_period: Duration) -> Self {
        Self {
            quiet_period,
            pending: None,
            generation: 0,
        }
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet_period
    }

    /// Record a change at `now`, cancelling whatever was pending.
    pub fn schedule(&mut self, now: Instant) -> PendingEmission {
        self.generation += 1;
        let pending = PendingEmission {
            due: now + self.quiet_period,
            generation: self.generation,
        };
        self.pending = Some(pending);
        pending
    }

    /// Drop the pending emission, if any. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    pub fn pending(&self) -> Option<PendingEmission> {
        self.pending
    }

    /// Returns true, once, when the pending emission has come due.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.pending {
            Some(pending) if now >= pending.due => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }

    /// Time left until the pending emission is due.
    pub fn time_remaining(&self, now: Instant) -> Option<Duration> {
        self.pending
            .map(|pending| pending.due.saturating_duration_since(now))
    }
}
