//! Window-level guards: closing during an upload, periodic timestamp
//! refresh and the delayed board reload.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseDecision {
    Allow,
    Confirm,
}

/// Closing mid-upload needs confirmation, unless the window is going away
/// because of a reload we scheduled ourselves.
pub fn close_decision(in_progress: bool, reloading: bool) -> CloseDecision {
    if in_progress && !reloading {
        CloseDecision::Confirm
    } else {
        CloseDecision::Allow
    }
}

/// Fires once per interval.
#[derive(Debug)]
pub struct RefreshTimer {
    interval: Duration,
    last: Instant,
}

impl RefreshTimer {
    pub fn new(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            last: now,
        }
    }

    pub fn poll(&mut self, now: Instant) -> bool {
        if now.saturating_duration_since(self.last) >= self.interval {
            self.last = now;
            true
        } else {
            false
        }
    }

    pub fn until_next(&self, now: Instant) -> Duration {
        self.interval
            .saturating_sub(now.saturating_duration_since(self.last))
    }
}

/// A one-shot reload, armed after a successful post.
#[derive(Debug, Default)]
pub struct ReloadSchedule {
    due: Option<Instant>,
}

impl ReloadSchedule {
    pub fn schedule(&mut self, now: Instant, delay: Duration) {
        self.due = Some(now + delay);
    }

    /// Drops a pending reload. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        self.due.take().is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.due.is_some()
    }

    /// True exactly once, when the deadline has passed.
    pub fn take_due(&mut self, now: Instant) -> bool {
        match self.due {
            Some(due) if now >= due => {
                self.due = None;
                true
            }
            _ => false,
        }
    }

    pub fn until_due(&self, now: Instant) -> Option<Duration> {
        self.due.map(|due| due.saturating_duration_since(now))
    }
}
