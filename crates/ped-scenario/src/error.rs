use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("engagement bounds must satisfy 0 <= min < max, got min {min} max {max}")]
    InvalidEngagementBounds { min: f64, max: f64 },

    #[error("activity {0:?} is already registered")]
    DuplicateActivity(String),

    #[error("unknown activity {0:?}")]
    UnknownActivity(String),

    #[error("sequence {0:?} is already registered")]
    DuplicateSequence(String),

    #[error("sequence {0:?} has no activities")]
    EmptySequence(String),

    #[error("sequence {name:?} has invalid activation rate {rate}")]
    InvalidRate { name: String, rate: f64 },

    #[error("scenario has no main station")]
    NoMainStation,

    #[error("too many {0} for a 16-bit id")]
    Capacity(&'static str),

    #[error("scenario parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ScenarioResult<T> = Result<T, ScenarioError>;
