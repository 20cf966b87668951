//! `Scenario` — everything the agent can do, and what it has pending.

use rustc_hash::FxHashMap;
use tracing::debug;

use ped_core::{ActivityId, SequenceId, SimRng, SimTime, Vec2};

use crate::{Activity, PartialSequence, Sequence, TaskQueue};

/// Activities (main stations included), sequences, the task queue, and the
/// at-most-one pending partial sequence.
///
/// Built by [`ScenarioBuilder`](crate::ScenarioBuilder), which guarantees at
/// least one main station and that every sequence references known
/// activities.
#[derive(Clone, Debug)]
pub struct Scenario {
    activities:      Vec<Activity>,
    activity_index:  FxHashMap<String, ActivityId>,
    main_stations:   Vec<ActivityId>,
    sequences:       Vec<Sequence>,
    sequence_index:  FxHashMap<String, SequenceId>,
    pub queue:       TaskQueue,
    partial:         Option<PartialSequence>,
}

impl Scenario {
    pub(crate) fn new(
        activities:     Vec<Activity>,
        activity_index: FxHashMap<String, ActivityId>,
        main_stations:  Vec<ActivityId>,
        sequences:      Vec<Sequence>,
        sequence_index: FxHashMap<String, SequenceId>,
    ) -> Self {
        Self {
            activities,
            activity_index,
            main_stations,
            sequences,
            sequence_index,
            queue: TaskQueue::new(),
            partial: None,
        }
    }

    // ── Activities ────────────────────────────────────────────────────────

    /// # Panics
    /// If `id` was not issued by the builder of this scenario.
    pub fn activity(&self, id: ActivityId) -> &Activity {
        &self.activities[id.index()]
    }

    pub fn activity_mut(&mut self, id: ActivityId) -> &mut Activity {
        &mut self.activities[id.index()]
    }

    pub fn activity_id(&self, name: &str) -> Option<ActivityId> {
        self.activity_index.get(name).copied()
    }

    pub fn activity_count(&self) -> usize {
        self.activities.len()
    }

    pub fn main_stations(&self) -> &[ActivityId] {
        &self.main_stations
    }

    pub fn is_main_station(&self, id: ActivityId) -> bool {
        self.main_stations.contains(&id)
    }

    /// The main station whose default pose is closest to `location`.
    pub fn nearest_main_station(&self, location: Vec2) -> ActivityId {
        self.main_stations
            .iter()
            .copied()
            .min_by(|a, b| {
                let da = self.activity(*a).default_pose().location.distance(location);
                let db = self.activity(*b).default_pose().location.distance(location);
                da.total_cmp(&db)
            })
            .unwrap_or(ActivityId(0))
    }

    // ── Sequences ─────────────────────────────────────────────────────────

    pub fn sequence(&self, id: SequenceId) -> &Sequence {
        &self.sequences[id.index()]
    }

    pub fn sequence_id(&self, name: &str) -> Option<SequenceId> {
        self.sequence_index.get(name).copied()
    }

    pub fn sequence_count(&self) -> usize {
        self.sequences.len()
    }

    pub fn sequences(&self) -> impl Iterator<Item = (SequenceId, &Sequence)> + '_ {
        self.sequences.iter().enumerate().map(|(i, s)| (SequenceId(i as u16), s))
    }

    /// Number of sequences carrying a visual trigger.
    pub fn visual_sequence_count(&self) -> usize {
        self.sequences.iter().filter(|s| s.visual_trigger().is_some()).count()
    }

    // ── Queue ─────────────────────────────────────────────────────────────

    /// Schedule the next occurrence of `id` at `now + Exp(rate)` hours.
    ///
    /// Visually triggered sequences go to the unexpected container, all
    /// others to the expected one.  Returns the key used.
    pub fn reactivate(&mut self, id: SequenceId, now: SimTime, rng: &mut SimRng) -> SimTime {
        let sequence = &self.sequences[id.index()];
        let at = now + rng.exponential(sequence.activation_rate()) * 3_600.0;
        let key = if sequence.visual_trigger().is_some() {
            self.queue.push_unexpected(at, id)
        } else {
            self.queue.push_expected(at, id)
        };
        debug!(sequence = sequence.name(), at = key.secs(), "sequence reactivated");
        key
    }

    /// Activate every sequence once, relative to `now`.
    pub fn start(&mut self, now: SimTime, rng: &mut SimRng) {
        for i in 0..self.sequences.len() {
            self.reactivate(SequenceId(i as u16), now, rng);
        }
    }

    // ── Partial slot ──────────────────────────────────────────────────────

    pub fn partial(&self) -> Option<&PartialSequence> {
        self.partial.as_ref()
    }

    pub fn has_partial(&self) -> bool {
        self.partial.is_some()
    }

    pub fn take_partial(&mut self) -> Option<PartialSequence> {
        self.partial.take()
    }

    /// Store `partial`, replacing (and returning) any previous one.
    pub fn set_partial(&mut self, partial: PartialSequence) -> Option<PartialSequence> {
        self.partial.replace(partial)
    }

    pub fn clear_partial(&mut self) {
        self.partial = None;
    }
}
