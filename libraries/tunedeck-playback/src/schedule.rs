//! Progress poll scheduling
//!
//! Neither backend pushes position updates, so the engine asks the host to
//! tick it periodically while something is playing. The host calls
//! [`crate::PlaybackEngine::on_poll_tick`] with the task id it was given.

use std::fmt;
use std::time::Duration;

/// Identity of one poll task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PollTaskId(u64);

impl PollTaskId {
    /// Raw id
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl From<u64> for PollTaskId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for PollTaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "poll-{}", self.0)
    }
}

/// Host timer service
///
/// At most one task is live at a time. After `cancel`, ticks for that task
/// are ignored by the engine even if the host still delivers them.
pub trait PollScheduler {
    /// Begin ticking `task` every `interval`
    fn start(&mut self, task: PollTaskId, interval: Duration);

    /// Stop ticking `task`
    fn cancel(&mut self, task: PollTaskId);
}
