//! Collision records produced by a [`SpatialEnvironment`][crate::SpatialEnvironment].
//!
//! Both are recomputed every integrator sub-step and discarded afterwards.

use ped_core::Vec2;

/// Distance from a point to the nearest barrier edge.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BarrierProximity {
    /// Euclidean distance to the closest point of the nearest barrier.
    pub distance: f64,
    /// Outward unit normal of the barrier: points from the barrier toward
    /// the query point (the repulsion direction).
    pub normal: Vec2,
}

/// Where and when a moving agent first touches a barrier.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Contact {
    /// Agent centre at the instant of contact.
    pub point: Vec2,
    /// Fraction of the sub-step elapsed before contact.  Must lie in
    /// `[0, 1]`; anything else is a geometry inconsistency.
    pub time_fraction: f64,
    /// Outward unit normal of the barrier that was hit.
    pub normal: Vec2,
}
