use thiserror::Error;

#[derive(Debug, Error)]
pub enum BehaviorError {
    #[error("invalid behavior configuration: {0}")]
    Config(String),
}

pub type BehaviorResult<T> = Result<T, BehaviorError>;
