//! Due-date alerts.
//!
//! The notifier is a timer queue owned by the front-end's event loop. Every
//! store refresh is fed to [`Notifier::scan`], which queues one alert per
//! task whose due time falls inside the lead window. The loop calls
//! [`Notifier::poll`] to fire whatever has come due.

use chrono::{NaiveDateTime, TimeDelta};
use tracing::debug;

use crate::model::config::AlertConfig;
use crate::model::task::{Task, TaskId};

pub const ALERT_HEADING: &str = "Task Due Soon";

/// A delivered alert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub task_id: TaskId,
    pub heading: String,
    pub body: String,
}

impl Alert {
    pub fn for_task(task_id: TaskId, title: &str) -> Self {
        Alert {
            task_id,
            heading: ALERT_HEADING.to_string(),
            body: format!("Your task \"{}\" is due now!", title),
        }
    }
}

/// Where fired alerts go (a terminal bell, stdout, a toast queue)
pub trait AlertSink {
    fn deliver(&mut self, alert: Alert);
}

impl<F: FnMut(Alert)> AlertSink for F {
    fn deliver(&mut self, alert: Alert) {
        self(alert)
    }
}

/// An alert waiting for its fire time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAlert {
    pub task_id: TaskId,
    pub title: String,
    pub fire_at: NaiveDateTime,
}

/// Tasks that deserve an alert: notification on, not completed, and due
/// within `(now, now + lead]`.
pub fn candidates(tasks: &[Task], now: NaiveDateTime, lead: TimeDelta) -> Vec<PendingAlert> {
    tasks
        .iter()
        .filter(|t| t.notification_enabled && !t.completed)
        .filter_map(|t| {
            let due = t.due_date?;
            let until = due - now;
            (until > TimeDelta::zero() && until <= lead).then(|| PendingAlert {
                task_id: t.id.clone(),
                title: t.title.clone(),
                fire_at: due,
            })
        })
        .collect()
}

pub struct Notifier {
    sink: Option<Box<dyn AlertSink>>,
    lead: TimeDelta,
    pending: Vec<PendingAlert>,
}

impl Notifier {
    pub fn new(sink: Option<Box<dyn AlertSink>>, lead: TimeDelta) -> Self {
        Notifier {
            sink,
            lead,
            pending: Vec::new(),
        }
    }

    /// Build from config. Disabled alerts drop the sink.
    pub fn from_config(config: &AlertConfig, sink: Box<dyn AlertSink>) -> Self {
        let sink = config.enabled.then_some(sink);
        Notifier::new(sink, TimeDelta::minutes(config.lead_minutes.max(0)))
    }

    pub fn is_active(&self) -> bool {
        self.sink.is_some()
    }

    /// Queue alerts for the given task set. Tasks already queued are queued
    /// again; each scan inside the window adds one more alert.
    pub fn scan(&mut self, tasks: &[Task], now: NaiveDateTime) {
        if self.sink.is_none() {
            return;
        }
        let found = candidates(tasks, now, self.lead);
        if !found.is_empty() {
            debug!(count = found.len(), "alerts scheduled");
        }
        self.pending.extend(found);
    }

    /// Fire every alert due at or before `now`.
    ///
    /// `lookup` reports a task's current `completed` flag. Alerts for tasks
    /// completed since scheduling are dropped; tasks no longer in the current
    /// set still fire. Returns the number delivered.
    pub fn poll(&mut self, now: NaiveDateTime, lookup: impl Fn(&TaskId) -> Option<bool>) -> usize {
        let Some(sink) = self.sink.as_mut() else {
            return 0;
        };
        let (due, waiting): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|p| p.fire_at <= now);
        self.pending = waiting;

        let mut delivered = 0;
        for alert in due {
            if lookup(&alert.task_id) == Some(true) {
                debug!(id = %alert.task_id, "alert suppressed, task completed");
                continue;
            }
            sink.deliver(Alert::for_task(alert.task_id, &alert.title));
            delivered += 1;
        }
        delivered
    }

    pub fn pending(&self) -> &[PendingAlert] {
        &self.pending
    }

    /// Earliest fire time still queued
    pub fn next_fire(&self) -> Option<NaiveDateTime> {
        self.pending.iter().map(|p| p.fire_at).min()
    }
}
