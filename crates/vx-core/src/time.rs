//! Simulated time model.
//!
//! # Design
//!
//! Time is an integer nanosecond counter (`SimTime`).  Every timestamp the
//! harness writes, compares, or subtracts goes through this type, so schedule
//! arithmetic is exact: a 0.1 s sampling period accumulated 800 times lands
//! on exactly 80 s, with no floating-point drift.
//!
//! Conversion to seconds happens only at the output boundary (trace columns,
//! log lines) via [`SimTime::as_secs_f64`] or the `Display` impl.

use std::fmt;

const NANOS_PER_SEC: u64 = 1_000_000_000;
const NANOS_PER_MILLI: u64 = 1_000_000;

// ── SimTime ───────────────────────────────────────────────────────────────────

/// An absolute (or relative) simulated time in nanoseconds.
///
/// Stored as `u64`: enough for ~584 years of simulated time at nanosecond
/// resolution.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimTime(pub u64);

impl SimTime {
    pub const ZERO: SimTime = SimTime(0);
    pub const MAX: SimTime = SimTime(u64::MAX);

    #[inline]
    pub const fn from_nanos(ns: u64) -> SimTime {
        SimTime(ns)
    }

    pub const fn from_millis(ms: u64) -> SimTime {
        SimTime(ms * NANOS_PER_MILLI)
    }

    #[inline]
    pub const fn from_secs(secs: u64) -> SimTime {
        SimTime(secs * NANOS_PER_SEC)
    }

    /// Convert fractional seconds, rounding to the nearest nanosecond.
    ///
    /// Negative and NaN inputs map to `ZERO`; values beyond the `u64` range
    /// saturate at `MAX`.
    pub fn from_secs_f64(secs: f64) -> SimTime {
        if !(secs > 0.0) {
            return SimTime::ZERO;
        }
        let ns = (secs * NANOS_PER_SEC as f64).round();
        if ns >= u64::MAX as f64 {
            SimTime::MAX
        } else {
            SimTime(ns as u64)
        }
    }

    #[inline]
    pub const fn as_nanos(self) -> u64 {
        self.0
    }

    #[inline]
    pub fn as_secs_f64(self) -> f64 {
        self.0 as f64 / NANOS_PER_SEC as f64
    }

    /// Time elapsed from `earlier` to `self`, or `None` if `earlier > self`.
    #[inline]
    pub fn checked_since(self, earlier: SimTime) -> Option<SimTime> {
        self.0.checked_sub(earlier.0).map(SimTime)
    }

    #[inline]
    pub fn saturating_add(self, rhs: SimTime) -> SimTime {
        SimTime(self.0.saturating_add(rhs.0))
    }

    #[inline]
    pub fn saturating_sub(self, rhs: SimTime) -> SimTime {
        SimTime(self.0.saturating_sub(rhs.0))
    }

    #[inline]
    pub fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl std::ops::Add for SimTime {
    type Output = SimTime;
    #[inline]
    fn add(self, rhs: SimTime) -> SimTime {
        SimTime(self.0 + rhs.0)
    }
}

impl std::ops::AddAssign for SimTime {
    #[inline]
    fn add_assign(&mut self, rhs: SimTime) {
        self.0 += rhs.0;
    }
}

impl std::ops::Sub for SimTime {
    type Output = SimTime;
    #[inline]
    fn sub(self, rhs: SimTime) -> SimTime {
        SimTime(self.0 - rhs.0)
    }
}

/// Seconds, printed with the shortest representation that round-trips
/// (`0.1`, `12.00004096`, `80`).  This is the `<time_s>` trace column.
impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_secs_f64())
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// The event loop's notion of "now" plus the exclusive run horizon.
///
/// `SimClock` is cheap to copy and intentionally holds no heap data.
#[derive(Copy, Clone, Debug)]
pub struct SimClock {
    /// Timestamp of the event currently being processed.
    pub now: SimTime,
    /// Events at or beyond this time are never processed.
    pub horizon: SimTime,
}

impl SimClock {
    pub fn new(horizon: SimTime) -> Self {
        Self { now: SimTime::ZERO, horizon }
    }

    /// Move the clock forward to `t`.
    ///
    /// # Panics
    /// Panics in debug mode if `t` is earlier than the current time.
    #[inline]
    pub fn advance_to(&mut self, t: SimTime) {
        debug_assert!(t >= self.now, "clock moved backwards: {} -> {}", self.now, t);
        self.now = t;
    }

    /// `true` once `t` is at or past the horizon.
    #[inline]
    pub fn is_past_horizon(&self, t: SimTime) -> bool {
        t >= self.horizon
    }

    /// Fraction of the horizon already simulated, in `[0.0, 1.0]`.
    pub fn progress(&self) -> f64 {
        if self.horizon.is_zero() {
            return 1.0;
        }
        (self.now.0 as f64 / self.horizon.0 as f64).min(1.0)
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} s / {} s ({:.0}%)", self.now, self.horizon, self.progress() * 100.0)
    }
}
