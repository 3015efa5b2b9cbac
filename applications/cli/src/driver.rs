//! Tokio-backed poll scheduling for the headless session.

use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;
use tunedeck_playback::{PollScheduler, PollTaskId};

use crate::session::SessionInput;

/// Delivers poll ticks into the session channel from tokio intervals
pub struct IntervalScheduler {
    tx: UnboundedSender<SessionInput>,
    tasks: HashMap<PollTaskId, JoinHandle<()>>,
}

impl IntervalScheduler {
    pub fn new(tx: UnboundedSender<SessionInput>) -> Self {
        Self {
            tx,
            tasks: HashMap::new(),
        }
    }

    /// Number of running interval tasks
    pub fn active(&self) -> usize {
        self.tasks.len()
    }
}

impl PollScheduler for IntervalScheduler {
    fn start(&mut self, task: PollTaskId, interval: Duration) {
        debug!(task = %task, interval_ms = interval.as_millis() as u64, "Starting poll task");

        let tx = self.tx.clone();
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first tick completes immediately
            ticker.tick().await;

            loop {
                ticker.tick().await;
                if tx.send(SessionInput::Tick(task)).is_err() {
                    break;
                }
            }
        });

        if let Some(previous) = self.tasks.insert(task, handle) {
            previous.abort();
        }
    }

    fn cancel(&mut self, task: PollTaskId) {
        if let Some(handle) = self.tasks.remove(&task) {
            debug!(task = %task, "Cancelled poll task");
            handle.abort();
        }
    }
}

impl Drop for IntervalScheduler {
    fn drop(&mut self) {
        for (_, handle) in self.tasks.drain() {
            handle.abort();
        }
    }
}
