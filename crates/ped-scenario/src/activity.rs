//! Activities: destinations the agent walks to and engages with.

use std::fmt;
use std::sync::Arc;

use tracing::warn;

use ped_core::{Pose, SimRng, Vec2};
use ped_spatial::PotentialField;

use crate::{ScenarioError, ScenarioResult};

// ── EngagementBounds ──────────────────────────────────────────────────────────

/// Minimum and maximum engagement (dwell) time in seconds.
///
/// `0 <= min < max` holds at all times: setters reject writes that would
/// break it and keep the previous value.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EngagementBounds {
    min_secs: f64,
    max_secs: f64,
}

impl EngagementBounds {
    pub fn new(min_secs: f64, max_secs: f64) -> ScenarioResult<Self> {
        check_bounds(min_secs, max_secs)?;
        Ok(Self { min_secs, max_secs })
    }

    pub fn min_secs(&self) -> f64 {
        self.min_secs
    }

    pub fn max_secs(&self) -> f64 {
        self.max_secs
    }

    pub fn set_min(&mut self, min_secs: f64) -> ScenarioResult<()> {
        check_bounds(min_secs, self.max_secs).inspect_err(|e| warn!(%e, "rejected engagement minimum"))?;
        self.min_secs = min_secs;
        Ok(())
    }

    pub fn set_max(&mut self, max_secs: f64) -> ScenarioResult<()> {
        check_bounds(self.min_secs, max_secs).inspect_err(|e| warn!(%e, "rejected engagement maximum"))?;
        self.max_secs = max_secs;
        Ok(())
    }

    /// Draw an engagement duration uniformly from `[min, max)`.
    pub fn sample(&self, rng: &mut SimRng) -> f64 {
        rng.uniform(self.min_secs, self.max_secs)
    }
}

fn check_bounds(min: f64, max: f64) -> ScenarioResult<()> {
    if min.is_finite() && max.is_finite() && min >= 0.0 && min < max {
        Ok(())
    } else {
        Err(ScenarioError::InvalidEngagementBounds { min, max })
    }
}

// ── Activity ──────────────────────────────────────────────────────────────────

/// A named destination with a steering field, a default engagement pose and
/// engagement-time bounds.
///
/// The field is shared behind an `Arc` so scenario replicas can reuse the
/// same precomputed data.
#[derive(Clone)]
pub struct Activity {
    name:       String,
    pose:       Pose,
    engagement: EngagementBounds,
    field:      Arc<dyn PotentialField>,
}

impl Activity {
    pub fn new(
        name:       impl Into<String>,
        pose:       Pose,
        engagement: EngagementBounds,
        field:      Arc<dyn PotentialField>,
    ) -> Self {
        Self { name: name.into(), pose, engagement, field }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Where the agent stands, and which way it faces, while engaged.
    pub fn default_pose(&self) -> Pose {
        self.pose
    }

    /// Steering direction toward this activity (see [`PotentialField::gradient`]).
    #[inline]
    pub fn gradient(&self, location: Vec2) -> Option<Vec2> {
        self.field.gradient(location)
    }

    /// `true` when `location` is inside this activity's origin region.
    #[inline]
    pub fn contains(&self, location: Vec2) -> bool {
        self.field.contains(location)
    }

    pub fn engagement(&self) -> &EngagementBounds {
        &self.engagement
    }

    pub fn engagement_mut(&mut self) -> &mut EngagementBounds {
        &mut self.engagement
    }
}

impl fmt::Debug for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Activity")
            .field("name", &self.name)
            .field("pose", &self.pose)
            .field("engagement", &self.engagement)
            .finish_non_exhaustive()
    }
}
