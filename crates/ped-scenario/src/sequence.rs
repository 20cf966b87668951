//! Sequences and the tagged "what is the agent working on" value.

use ped_core::{ActivityId, SequenceId};
use ped_spatial::Region;

// ── Priority ──────────────────────────────────────────────────────────────────

/// Scheduling class of a sequence.
///
/// `Urgent` sequences carry a visual trigger and cannot be interrupted;
/// `Partial` marks the resumable remainder of an interrupted sequence.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Priority {
    Regular,
    Urgent,
    Partial,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Regular => "regular",
            Priority::Urgent  => "urgent",
            Priority::Partial => "partial",
        }
    }
}

// ── Sequence ──────────────────────────────────────────────────────────────────

/// An ordered, non-empty list of activities performed in one go, recurring
/// at `activation_rate` occurrences per hour.
///
/// Two sequences are equal when their names are equal.
#[derive(Clone, Debug)]
pub struct Sequence {
    name:            String,
    activities:      Vec<ActivityId>,
    visual_trigger:  Option<Region>,
    activation_rate: f64,
}

impl Sequence {
    pub(crate) fn new(
        name:            String,
        activities:      Vec<ActivityId>,
        visual_trigger:  Option<Region>,
        activation_rate: f64,
    ) -> Self {
        Self { name, activities, visual_trigger, activation_rate }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn activities(&self) -> &[ActivityId] {
        &self.activities
    }

    pub fn visual_trigger(&self) -> Option<&Region> {
        self.visual_trigger.as_ref()
    }

    /// Mean occurrences per hour.
    pub fn activation_rate(&self) -> f64 {
        self.activation_rate
    }

    /// `Urgent` if the sequence has a visual trigger, `Regular` otherwise.
    pub fn priority(&self) -> Priority {
        if self.visual_trigger.is_some() { Priority::Urgent } else { Priority::Regular }
    }
}

impl PartialEq for Sequence {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Sequence {}

// ── PartialSequence ───────────────────────────────────────────────────────────

/// The not-yet-performed tail of an interrupted sequence.
///
/// `remainder[0]` is the activity that was in progress at interruption time.
#[derive(Clone, Debug, PartialEq)]
pub struct PartialSequence {
    pub remainder: Vec<ActivityId>,
    pub original:  SequenceId,
}

// ── ActiveSequence ────────────────────────────────────────────────────────────

/// What the agent is currently working through.
#[derive(Clone, Debug, PartialEq)]
pub enum ActiveSequence {
    Regular(SequenceId),
    Urgent(SequenceId),
    Partial(PartialSequence),
}

impl ActiveSequence {
    /// Wrap a whole sequence according to its own priority.
    pub fn whole(id: SequenceId, sequence: &Sequence) -> Self {
        match sequence.priority() {
            Priority::Urgent => ActiveSequence::Urgent(id),
            _                => ActiveSequence::Regular(id),
        }
    }

    pub fn priority(&self) -> Priority {
        match self {
            ActiveSequence::Regular(_) => Priority::Regular,
            ActiveSequence::Urgent(_)  => Priority::Urgent,
            ActiveSequence::Partial(_) => Priority::Partial,
        }
    }

    /// The sequence to reactivate once this one completes.
    pub fn original(&self) -> SequenceId {
        match self {
            ActiveSequence::Regular(id) | ActiveSequence::Urgent(id) => *id,
            ActiveSequence::Partial(p) => p.original,
        }
    }
}
