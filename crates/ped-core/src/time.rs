//! Simulation time model.
//!
//! # Design
//!
//! The agent advances in fixed increments of `time_step_secs` (Δt).  The
//! canonical counter is the integer tick held by `SimClock`; the continuous
//! time in seconds is derived from it:
//!
//!   now = tick * time_step_secs
//!
//! Deriving time from an integer counter avoids floating-point drift over
//! long runs (36 000 ticks for one simulated hour at Δt = 100 ms).
//!
//! Task queues key on [`SimTime`], a totally ordered `f64` wrapper, because
//! scheduled occurrences are sampled from continuous distributions and do
//! not fall on tick boundaries.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::{PedError, PedResult};

// ── SimTime ───────────────────────────────────────────────────────────────────

/// An absolute simulation time in seconds since the start of the run.
///
/// Ordered with `f64::total_cmp`, hashed by bit pattern, so it can key both
/// `BTreeMap` and `HashMap`.
#[derive(Copy, Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimTime(pub f64);

impl SimTime {
    pub const ZERO: SimTime = SimTime(0.0);

    #[inline]
    pub fn secs(self) -> f64 {
        self.0
    }

    #[inline]
    pub fn from_hours(hours: f64) -> SimTime {
        SimTime(hours * 3_600.0)
    }

    #[inline]
    pub fn hours(self) -> f64 {
        self.0 / 3_600.0
    }
}

impl PartialEq for SimTime {
    fn eq(&self, other: &Self) -> bool {
        self.0.total_cmp(&other.0) == Ordering::Equal
    }
}

impl Eq for SimTime {}

impl PartialOrd for SimTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SimTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Hash for SimTime {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl std::ops::Add<f64> for SimTime {
    type Output = SimTime;
    #[inline]
    fn add(self, rhs: f64) -> SimTime {
        SimTime(self.0 + rhs)
    }
}

impl std::ops::Sub<f64> for SimTime {
    type Output = SimTime;
    #[inline]
    fn sub(self, rhs: f64) -> SimTime {
        SimTime(self.0 - rhs)
    }
}

impl std::ops::Sub for SimTime {
    type Output = f64;
    #[inline]
    fn sub(self, rhs: SimTime) -> f64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}s", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Tick counter plus the fixed increment it represents.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// Seconds per tick (Δt).
    pub time_step_secs: f64,
    /// Whole ticks completed so far.
    pub ticks: u64,
}

impl SimClock {
    pub fn new(time_step_secs: f64) -> Self {
        Self { time_step_secs, ticks: 0 }
    }

    /// Advance the clock by one tick.
    #[inline]
    pub fn advance(&mut self) {
        self.ticks += 1;
    }

    /// Current simulation time.
    #[inline]
    pub fn now(&self) -> SimTime {
        SimTime(self.ticks as f64 * self.time_step_secs)
    }

    /// Break elapsed time into (hours, minutes, seconds) for log lines.
    pub fn elapsed_hms(&self) -> (u64, u32, f64) {
        let total = self.now().secs().max(0.0);
        let hours = (total / 3_600.0).floor();
        let minutes = ((total - hours * 3_600.0) / 60.0).floor();
        let seconds = total - hours * 3_600.0 - minutes * 60.0;
        (hours as u64, minutes as u32, seconds)
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (h, m, s) = self.elapsed_hms();
        write!(f, "tick {} ({:02}:{:02}:{:06.3})", self.ticks, h, m, s)
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level run configuration.
///
/// Typically loaded from a JSON file by the application crate (with the
/// `serde` feature) and passed to the simulation builder.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Fixed integration increment Δt in seconds.  Default: 0.1.
    pub time_step_secs: f64,

    /// Simulated duration in seconds.  Default: 3600 (one hour).
    pub duration_secs: f64,

    /// Seed for the run's single RNG.  The same seed always produces
    /// identical results.
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            time_step_secs: 0.1,
            duration_secs:  3_600.0,
            seed:           42,
        }
    }
}

impl SimConfig {
    /// Number of whole ticks needed to cover `duration_secs`.
    #[inline]
    pub fn total_ticks(&self) -> u64 {
        (self.duration_secs / self.time_step_secs).round() as u64
    }

    /// Construct a `SimClock` pre-configured for this run.
    pub fn make_clock(&self) -> SimClock {
        SimClock::new(self.time_step_secs)
    }

    /// Reject non-positive or non-finite increments and durations.
    pub fn validate(&self) -> PedResult<()> {
        if !(self.time_step_secs.is_finite() && self.time_step_secs > 0.0) {
            return Err(PedError::Config(format!(
                "time_step_secs must be positive, got {}",
                self.time_step_secs
            )));
        }
        if !(self.duration_secs.is_finite() && self.duration_secs > 0.0) {
            return Err(PedError::Config(format!(
                "duration_secs must be positive, got {}",
                self.duration_secs
            )));
        }
        if self.time_step_secs > self.duration_secs {
            return Err(PedError::Config(format!(
                "time step {} exceeds duration {}",
                self.time_step_secs, self.duration_secs
            )));
        }
        Ok(())
    }
}
