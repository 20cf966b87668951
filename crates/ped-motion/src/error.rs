use thiserror::Error;

use ped_core::Vec2;

#[derive(Debug, Error)]
pub enum MotionError {
    #[error("invalid motion parameters: {0}")]
    Config(String),

    /// The environment reported no barrier after a position update.
    #[error("no collision information at {location} after a position update")]
    MissingCollisionInfo { location: Vec2 },

    /// A barrier crossing was detected but the environment found no contact.
    #[error("barrier crossed between {from} and {to} but no contact was reported")]
    MissingContact { from: Vec2, to: Vec2 },

    #[error("collision time fraction {fraction} outside [0, 1]")]
    TimeFractionOutOfRange { fraction: f64 },
}

pub type MotionResult<T> = Result<T, MotionError>;
