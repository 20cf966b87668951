//! `TaskQueue` — pending sequence occurrences keyed by simulation time.
//!
//! Two containers:
//!
//! - **expected**: sequences without a visual trigger, ordered by time.  The
//!   scheduler consumes the earliest entry once its time has come.
//! - **unexpected**: visually triggered sequences.  They only become work
//!   once the detector notices their trigger region; until then their time
//!   is merely the moment they started to be "out there".
//!
//! Keys are unique per container.  An insert that collides with an existing
//! key is nudged later by [`KEY_NUDGE_SECS`] until it finds a free slot, so
//! no occurrence is ever silently dropped.  Requested times are first clamped
//! to [`MAX_KEY_SECS`]: an occurrence that far out never comes due, and
//! below it a nudge always changes the `f64`.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;
use tracing::trace;

use ped_core::{SequenceId, SimTime};

/// Offset applied when a key is already taken.
pub const KEY_NUDGE_SECS: f64 = 1e-6;

/// Largest key magnitude, roughly 31.7 years.
pub const MAX_KEY_SECS: f64 = 1e9;

/// Clamp `at` into `±MAX_KEY_SECS`; NaN goes to the far end.
fn bounded(at: SimTime) -> SimTime {
    if at.0.is_nan() {
        SimTime(MAX_KEY_SECS)
    } else {
        SimTime(at.0.clamp(-MAX_KEY_SECS, MAX_KEY_SECS))
    }
}

#[derive(Clone, Debug, Default)]
pub struct TaskQueue {
    expected:   BTreeMap<SimTime, SequenceId>,
    unexpected: FxHashMap<SimTime, SequenceId>,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Expected ──────────────────────────────────────────────────────────

    /// File `sequence` at `at` (or the first free slot after it, clamped to
    /// [`MAX_KEY_SECS`]).  Returns the key actually used.
    pub fn push_expected(&mut self, at: SimTime, sequence: SequenceId) -> SimTime {
        let mut key = bounded(at);
        while self.expected.contains_key(&key) {
            key = key + KEY_NUDGE_SECS;
        }
        if key != at {
            trace!(%sequence, requested = at.secs(), used = key.secs(), "expected key nudged");
        }
        self.expected.insert(key, sequence);
        key
    }

    /// File `sequence` strictly before every expected entry and no later than
    /// `now`, so it is the next thing the scheduler picks up.
    pub fn push_before_earliest(&mut self, now: SimTime, sequence: SequenceId) -> SimTime {
        let mut key = match self.earliest_expected() {
            Some((t, _)) if t < now => t - KEY_NUDGE_SECS,
            _                       => bounded(now) - KEY_NUDGE_SECS,
        };
        // Only reachable when two entries were placed within one nudge.
        while self.expected.contains_key(&key) {
            key = key - KEY_NUDGE_SECS;
        }
        self.expected.insert(key, sequence);
        key
    }

    pub fn earliest_expected(&self) -> Option<(SimTime, SequenceId)> {
        self.expected.first_key_value().map(|(t, s)| (*t, *s))
    }

    pub fn pop_expected(&mut self) -> Option<(SimTime, SequenceId)> {
        self.expected.pop_first()
    }

    pub fn expected_len(&self) -> usize {
        self.expected.len()
    }

    pub fn expected(&self) -> impl Iterator<Item = (SimTime, SequenceId)> + '_ {
        self.expected.iter().map(|(t, s)| (*t, *s))
    }

    // ── Unexpected ────────────────────────────────────────────────────────

    /// File a visually triggered `sequence` at `at` (nudged later on
    /// collision).  Returns the key actually used.
    pub fn push_unexpected(&mut self, at: SimTime, sequence: SequenceId) -> SimTime {
        let mut key = bounded(at);
        while self.unexpected.contains_key(&key) {
            key = key + KEY_NUDGE_SECS;
        }
        self.unexpected.insert(key, sequence);
        key
    }

    pub fn remove_unexpected(&mut self, at: SimTime) -> Option<SequenceId> {
        self.unexpected.remove(&at)
    }

    /// Unordered view of the unexpected entries.
    pub fn unexpected(&self) -> impl Iterator<Item = (SimTime, SequenceId)> + '_ {
        self.unexpected.iter().map(|(t, s)| (*t, *s))
    }

    pub fn unexpected_len(&self) -> usize {
        self.unexpected.len()
    }

    // ── Both ──────────────────────────────────────────────────────────────

    /// `true` if `sequence` is waiting in either container.
    pub fn contains(&self, sequence: SequenceId) -> bool {
        self.expected.values().any(|s| *s == sequence)
            || self.unexpected.values().any(|s| *s == sequence)
    }

    pub fn len(&self) -> usize {
        self.expected.len() + self.unexpected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
