//! Monotonic time source consumed by the countdown state.
//!
//! Readings are milliseconds since an arbitrary origin. `u64` keeps
//! wraparound far outside any realistic uptime; implementations must never
//! go backwards within a run, and consumers saturate if one does.

/// Read-only monotonic millisecond counter.
pub trait MonotonicClock {
    /// Current reading in milliseconds.
    fn now_ms(&self) -> u64;
}

impl<C> MonotonicClock for &C
where
    C: MonotonicClock + ?Sized,
{
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }
}

/// Manually advanced clock for tests and bench simulations.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: core::cell::Cell<u64>,
}

impl ManualClock {
    /// Creates a clock that reads `start_ms`.
    #[must_use]
    pub const fn new(start_ms: u64) -> Self {
        Self {
            now: core::cell::Cell::new(start_ms),
        }
    }

    /// Moves the clock forward by `delta_ms`.
    pub fn advance(&self, delta_ms: u64) {
        self.now.set(self.now.get().saturating_add(delta_ms));
    }

    /// Jumps the clock to an absolute reading.
    pub fn set(&self, now_ms: u64) {
        self.now.set(now_ms);
    }
}

impl MonotonicClock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_reads_through_references() {
        let clock = ManualClock::new(100);
        let handle = &clock;
        clock.advance(50);
        assert_eq!(handle.now_ms(), 150);

        clock.set(20);
        assert_eq!((&handle).now_ms(), 20);
    }
}
