//! Monotonic millisecond clock.
//!
//! Every timing decision in the radio (debounce, long-click threshold,
//! double-click gap, retry cooldown, heartbeat) is an elapsed-time
//! comparison against this clock. Time is represented with
//! [`embassy_time::Instant`] / [`embassy_time::Duration`] so that hardware
//! builds share the executor's tick source.

use embassy_time::{Duration, Instant};

/// A monotonic time source.
pub trait Clock {
    /// Current instant. Must never go backwards.
    fn now(&self) -> Instant;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Instant {
        (**self).now()
    }
}

/// Clock backed by the embassy time driver.
///
/// On hardware the driver is the MCU timer; on desktop it requires the
/// `embassy-time/std` feature.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Time elapsed from `since` to `now`, saturating at zero.
///
/// Timestamps recorded by the state machines are always taken from the same
/// clock, so `now >= since` in practice; saturation keeps a misbehaving clock
/// from panicking the control loop.
#[must_use]
pub fn elapsed(now: Instant, since: Instant) -> Duration {
    now.checked_duration_since(since)
        .unwrap_or(Duration::from_ticks(0))
}
