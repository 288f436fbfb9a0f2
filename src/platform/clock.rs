//! Repeating tick sources
//!
//! The session arms the source once per tick while playing. Each arm schedules at most
//! one future tick; cancelling drops it.

/// A source of one-shot tick callbacks plus a millisecond time base
pub trait TickSource {
    /// Monotonic time in milliseconds, used for spawn timing
    fn now_ms(&self) -> f64;
    /// Wall-clock time (Unix ms) used to stamp records
    fn timestamp_ms(&self) -> f64 {
        self.now_ms()
    }
    /// Schedule the next tick. Does nothing if one is already pending.
    fn arm(&mut self);
    /// Drop the pending tick, if any
    fn cancel(&mut self);
    /// Whether a tick is pending
    fn is_armed(&self) -> bool;
}

/// Clock advanced by hand, for tests and headless runs.
///
/// The host calls [`ManualClock::advance`] and then delivers the tick itself when
/// [`ManualClock::take_tick`] says one is due.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now_ms: f64,
    armed: bool,
    arm_count: u32,
    cancel_count: u32,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(now_ms: f64) -> Self {
        Self {
            now_ms,
            ..Self::default()
        }
    }

    /// Move time forward
    pub fn advance(&mut self, dt_ms: f64) {
        self.now_ms += dt_ms;
    }

    /// Consume the pending tick. Returns false if nothing was scheduled.
    pub fn take_tick(&mut self) -> bool {
        std::mem::take(&mut self.armed)
    }

    /// Number of times a tick was actually scheduled
    pub fn arm_count(&self) -> u32 {
        self.arm_count
    }

    /// Number of times a pending tick was dropped
    pub fn cancel_count(&self) -> u32 {
        self.cancel_count
    }
}

impl TickSource for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now_ms
    }

    fn arm(&mut self) {
        if !self.armed {
            self.armed = true;
            self.arm_count += 1;
        }
    }

    fn cancel(&mut self) {
        if self.armed {
            self.armed = false;
            self.cancel_count += 1;
        }
    }

    fn is_armed(&self) -> bool {
        self.armed
    }
}
