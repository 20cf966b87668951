//! Locomotion constants.

use crate::{MotionError, MotionResult};

/// Physical parameters of one pedestrian.
///
/// Lengths in metres, times in seconds, angles in radians.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MotionParams {
    /// Body diameter.
    pub body_size: f64,
    /// Speed cap (m/s).
    pub max_speed: f64,
    /// Acceleration magnitude (m/s²) used for walking and braking.
    pub acceleration: f64,
    /// Maximum turning rate (rad/s).
    pub angular_velocity: f64,
    /// Distance below which barriers push back.
    pub repulsion_range: f64,
    /// Repulsion (m/s²) at zero distance.
    pub max_repulsion: f64,
    /// Fraction of the into-wall speed kept (reversed) on impact.
    pub elasticity: f64,
    /// Coulomb friction coefficient along the wall.
    pub friction: f64,
    /// Slack handed to the environment's contact solver.
    pub collision_tolerance: f64,
}

impl Default for MotionParams {
    fn default() -> Self {
        Self {
            body_size:           0.6,
            max_speed:           1.4,
            acceleration:        2.0,
            angular_velocity:    std::f64::consts::PI,
            repulsion_range:     0.9,
            max_repulsion:       4.0,
            elasticity:          0.2,
            friction:            0.3,
            collision_tolerance: 1e-4,
        }
    }
}

impl MotionParams {
    #[inline]
    pub fn half_body(&self) -> f64 {
        self.body_size * 0.5
    }

    pub fn validate(&self) -> MotionResult<()> {
        let positive = [
            ("body_size", self.body_size),
            ("max_speed", self.max_speed),
            ("acceleration", self.acceleration),
            ("angular_velocity", self.angular_velocity),
            ("repulsion_range", self.repulsion_range),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(MotionError::Config(format!("{name} must be positive, got {value}")));
            }
        }
        let non_negative = [
            ("max_repulsion", self.max_repulsion),
            ("friction", self.friction),
            ("collision_tolerance", self.collision_tolerance),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(MotionError::Config(format!("{name} must be non-negative, got {value}")));
            }
        }
        if !(0.0..=1.0).contains(&self.elasticity) {
            return Err(MotionError::Config(format!(
                "elasticity must lie in [0, 1], got {}",
                self.elasticity
            )));
        }
        Ok(())
    }
}
