//! Timer Engine
//!
//! Whole-second countdowns. The engine does not own a clock: its owner
//! delivers one `on_second` call per elapsed second, carrying the handle the
//! countdown was started with. A call carrying any other handle (an older
//! countdown, or one that was cancelled) is rejected, so a restarted timer
//! never hears from its predecessor.

use serde::{Serialize, Deserialize};

use crate::core::schedule::Epoch;

/// Identifies one countdown instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerHandle {
    id: u64,
    epoch: Epoch,
}

impl TimerHandle {
    /// Epoch the countdown was started in.
    pub fn epoch(&self) -> Epoch {
        self.epoch
    }
}

/// What a second of countdown produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerSignal {
    /// Still running with this many seconds left.
    Tick {
        /// Seconds left.
        remaining: u32,
    },
    /// Reached zero. Delivered once.
    Expired,
}

/// Lifecycle of a countdown.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerStatus {
    /// Counting down.
    Running,
    /// Reached zero.
    Expired,
    /// Stopped before reaching zero.
    Cancelled,
}

#[derive(Debug)]
struct Countdown {
    handle: TimerHandle,
    remaining: u32,
    status: TimerStatus,
}

/// Owner of at most one live countdown.
#[derive(Debug, Default)]
pub struct TimerEngine {
    next_id: u64,
    current: Option<Countdown>,
}

impl TimerEngine {
    /// Engine with no countdown.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a countdown at `duration_secs`, replacing any previous one.
    pub fn start(&mut self, duration_secs: u32, epoch: Epoch) -> TimerHandle {
        let handle = TimerHandle { id: self.next_id, epoch };
        self.next_id += 1;

        self.current = Some(Countdown {
            handle,
            remaining: duration_secs,
            status: TimerStatus::Running,
        });

        handle
    }

    /// Stop the countdown behind `handle`. Returns false if it was not
    /// running.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        match self.current.as_mut() {
            Some(c) if c.handle == handle && c.status == TimerStatus::Running => {
                c.status = TimerStatus::Cancelled;
                true
            }
            _ => false,
        }
    }

    /// One second elapsed for `handle`.
    ///
    /// `None` when the handle is stale or the countdown already stopped.
    pub fn on_second(&mut self, handle: TimerHandle) -> Option<TimerSignal> {
        let countdown = self.current.as_mut()?;
        if countdown.handle != handle || countdown.status != TimerStatus::Running {
            return None;
        }

        countdown.remaining = countdown.remaining.saturating_sub(1);
        if countdown.remaining == 0 {
            countdown.status = TimerStatus::Expired;
            Some(TimerSignal::Expired)
        } else {
            Some(TimerSignal::Tick { remaining: countdown.remaining })
        }
    }

    /// Seconds left on the current countdown, 0 if there is none.
    pub fn remaining(&self) -> u32 {
        self.current.as_ref().map_or(0, |c| c.remaining)
    }

    /// Handle of the current countdown.
    pub fn handle(&self) -> Option<TimerHandle> {
        self.current.as_ref().map(|c| c.handle)
    }

    /// Status of the current countdown.
    pub fn status(&self) -> Option<TimerStatus> {
        self.current.as_ref().map(|c| c.status)
    }
}
