//! Agent kinematic state and the two scheduling enums.

use std::fmt;

use crate::Vec2;

// ── Pose ──────────────────────────────────────────────────────────────────────

/// A location plus a unit facing direction.
///
/// Activities expose a default pose: where the agent stands and which way it
/// faces while engaged.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pose {
    pub location:  Vec2,
    pub direction: Vec2,
}

impl Pose {
    /// Construct a pose, normalizing `direction` (falls back to +x when it
    /// has no length).
    pub fn new(location: Vec2, direction: Vec2) -> Self {
        Self {
            location,
            direction: direction.normalized().unwrap_or(Vec2::new(1.0, 0.0)),
        }
    }
}

// ── AgentState ────────────────────────────────────────────────────────────────

/// The agent's kinematic state.
///
/// `Copy` on purpose: the integrator snapshots the previous state by value
/// before every sub-step and compares before/after during collision
/// resolution.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentState {
    pub location:  Vec2,
    pub velocity:  Vec2,
    /// Unit facing direction.
    pub direction: Vec2,
}

impl AgentState {
    /// An agent at rest at `location`, facing `direction`.
    pub fn at_rest(location: Vec2, direction: Vec2) -> Self {
        let pose = Pose::new(location, direction);
        Self {
            location:  pose.location,
            velocity:  Vec2::ZERO,
            direction: pose.direction,
        }
    }

    #[inline]
    pub fn speed(&self) -> f64 {
        self.velocity.length()
    }

    pub fn pose(&self) -> Pose {
        Pose { location: self.location, direction: self.direction }
    }
}

// ── AgentEngagementStatus ─────────────────────────────────────────────────────

/// Coarse scheduling state of the agent.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AgentEngagementStatus {
    /// Idling at or walking to a main station; no scripted task due.
    Free,
    /// Walking toward the current activity of the active sequence.
    WalkingInSequence,
    /// Dwelling at an activity for a sampled engagement time.
    Engaged,
}

impl AgentEngagementStatus {
    pub const ALL: [AgentEngagementStatus; 3] = [
        AgentEngagementStatus::Free,
        AgentEngagementStatus::WalkingInSequence,
        AgentEngagementStatus::Engaged,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AgentEngagementStatus::Free              => "free",
            AgentEngagementStatus::WalkingInSequence => "walking",
            AgentEngagementStatus::Engaged           => "engaged",
        }
    }
}

impl fmt::Display for AgentEngagementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── PhysicalMovementMode ──────────────────────────────────────────────────────

/// Fine-grained locomotion mode consumed by the step integrator.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PhysicalMovementMode {
    /// Accelerate along the steering gradient.
    #[default]
    Move,
    /// Brake to rest on the activity's default pose and turn to face it.
    StopAndOrient,
}

impl PhysicalMovementMode {
    pub fn as_str(self) -> &'static str {
        match self {
            PhysicalMovementMode::Move          => "move",
            PhysicalMovementMode::StopAndOrient => "stop_and_orient",
        }
    }
}

impl fmt::Display for PhysicalMovementMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
