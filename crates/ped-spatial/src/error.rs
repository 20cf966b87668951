//! Spatial-subsystem error type.

use thiserror::Error;

use ped_core::CellId;

/// Errors produced by `ped-spatial`.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("invalid grid: {0}")]
    InvalidGrid(String),

    #[error("cell {0} is outside the grid")]
    CellOutOfRange(CellId),

    #[error("degenerate barrier from {from} to {to}")]
    DegenerateBarrier { from: ped_core::Vec2, to: ped_core::Vec2 },
}

pub type SpatialResult<T> = Result<T, SpatialError>;
