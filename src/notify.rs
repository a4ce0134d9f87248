//! Transient status banner.
//!
//! Only one notification is visible at a time. Notices raised while one is
//! showing wait in a queue and each gets the full display duration.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Success,
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub text: String,
    pub kind: NotificationKind,
}

impl Notification {
    pub fn new(kind: NotificationKind, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind,
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self::new(NotificationKind::Info, text)
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self::new(NotificationKind::Success, text)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(NotificationKind::Error, text)
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self::new(NotificationKind::Warning, text)
    }
}

#[derive(Debug)]
pub struct Notifier {
    duration: Duration,
    current: Option<(Notification, Instant)>,
    pending: VecDeque<Notification>,
}

impl Notifier {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            current: None,
            pending: VecDeque::new(),
        }
    }

    pub fn show(&mut self, notification: Notification, now: Instant) {
        log::debug!("Notify {:?}: {}", notification.kind, notification.text);
        if self.current.is_none() {
            self.current = Some((notification, now));
        } else {
            self.pending.push_back(notification);
        }
    }

    /// Expires the visible notification if its time is up and promotes the
    /// next queued one. Returns what should be on screen at `now`.
    pub fn visible(&mut self, now: Instant) -> Option<&Notification> {
        while let Some(shown_at) = self.current.as_ref().map(|(_, at)| *at) {
            if now.saturating_duration_since(shown_at) < self.duration {
                break;
            }
            self.current = self.pending.pop_front().map(|next| (next, now));
        }
        self.current.as_ref().map(|(notification, _)| notification)
    }

    /// Time left before the visible notification changes, for repaint
    /// scheduling.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.current
            .as_ref()
            .map(|(_, shown_at)| self.duration.saturating_sub(now.saturating_duration_since(*shown_at)))
    }

    pub fn dismiss(&mut self, now: Instant) {
        self.current = self.pending.pop_front().map(|next| (next, now));
    }
}
