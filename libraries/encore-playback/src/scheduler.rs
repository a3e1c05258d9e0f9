//! Timer seam for the delayed auto-advance
//!
//! The controller never sleeps. It asks the host to fire a timer and the host
//! calls `PlaybackController::handle_timer` with the same id when it elapses.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Handle of a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerId(pub u64);

/// One-shot timer facility provided by the host
pub trait Scheduler {
    /// Arrange for `handle_timer(id)` to be called after `delay`
    fn schedule(&mut self, delay: Duration) -> TimerId;

    /// Cancel a timer; unknown or already-fired ids are ignored
    fn cancel(&mut self, id: TimerId);
}

impl<S: Scheduler + ?Sized> Scheduler for Box<S> {
    fn schedule(&mut self, delay: Duration) -> TimerId {
        (**self).schedule(delay)
    }

    fn cancel(&mut self, id: TimerId) {
        (**self).cancel(id);
    }
}
