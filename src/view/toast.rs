use std::collections::VecDeque;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Alert,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub text: String,
    expires_at: Instant,
}

/// Transient messages that expire after a fixed time to live
#[derive(Debug)]
pub struct ToastQueue {
    ttl: Duration,
    items: VecDeque<Toast>,
}

impl ToastQueue {
    pub fn new(ttl: Duration) -> Self {
        ToastQueue {
            ttl,
            items: VecDeque::new(),
        }
    }

    pub fn push(&mut self, kind: ToastKind, text: impl Into<String>, now: Instant) {
        self.items.push_back(Toast {
            kind,
            text: text.into(),
            expires_at: now + self.ttl,
        });
    }

    pub fn success(&mut self, text: impl Into<String>, now: Instant) {
        self.push(ToastKind::Success, text, now);
    }

    pub fn error(&mut self, text: impl Into<String>, now: Instant) {
        self.push(ToastKind::Error, text, now);
    }

    /// Drop expired toasts. Returns true if anything was removed.
    pub fn prune(&mut self, now: Instant) -> bool {
        let before = self.items.len();
        self.items.retain(|t| t.expires_at > now);
        self.items.len() != before
    }

    /// Live toasts, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.items.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
