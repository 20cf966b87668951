//! Potential fields: steering toward a destination.
//!
//! # Pluggability
//!
//! An activity only needs "something that yields a gradient and a membership
//! test".  Hosts typically back it with a precomputed cost field over the
//! floor's cells; [`RadialField`] is the straight-line stand-in used by the
//! tests and the demo.

use ped_core::Vec2;

/// Steering field toward one destination.
///
/// Implementations must be `Send + Sync` so that activities can be shared by
/// `Arc` between scenario replicas.
pub trait PotentialField: Send + Sync {
    /// Steering direction toward the destination at `location`.
    ///
    /// Need not be normalized.  `None` when undefined, typically at the
    /// destination itself; callers then keep their previous heading.
    fn gradient(&self, location: Vec2) -> Option<Vec2>;

    /// `true` when `location` lies in the destination's origin region.
    fn contains(&self, location: Vec2) -> bool;
}

// ── RadialField ───────────────────────────────────────────────────────────────

/// A field that points straight at `target` everywhere.
#[derive(Clone, Debug, PartialEq)]
pub struct RadialField {
    target: Vec2,
    /// Radius of the origin region around `target`.
    radius: f64,
    /// Below this distance the gradient is undefined.
    snap:   f64,
}

impl RadialField {
    pub const DEFAULT_SNAP: f64 = 1e-3;

    pub fn new(target: Vec2, radius: f64) -> Self {
        Self { target, radius, snap: Self::DEFAULT_SNAP }
    }

    pub fn with_snap(mut self, snap: f64) -> Self {
        self.snap = snap;
        self
    }

    pub fn target(&self) -> Vec2 {
        self.target
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }
}

impl PotentialField for RadialField {
    fn gradient(&self, location: Vec2) -> Option<Vec2> {
        let offset = self.target - location;
        if offset.length() <= self.snap {
            return None;
        }
        offset.normalized()
    }

    fn contains(&self, location: Vec2) -> bool {
        location.distance(self.target) <= self.radius
    }
}
