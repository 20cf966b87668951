use thiserror::Error;

use ped_behavior::BehaviorError;
use ped_core::{CellId, PedError, Vec2};
use ped_motion::MotionError;
use ped_output::OutputError;
use ped_scenario::ScenarioError;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Core(#[from] PedError),

    /// Integration failed; fatal for the run.
    #[error("integration error: {0}")]
    Motion(#[from] MotionError),

    #[error("behavior error: {0}")]
    Behavior(#[from] BehaviorError),

    #[error("scenario error: {0}")]
    Scenario(#[from] ScenarioError),

    #[error("output error: {0}")]
    Output(#[from] OutputError),

    /// The agent stands where the environment has no cell.
    #[error("agent at {location} is outside the floor")]
    OutsideFloor { location: Vec2 },

    /// A located cell was not pre-seeded from the environment's field cells.
    #[error("{cell} is missing from the trail map")]
    CellNotInTrail { cell: CellId },
}

pub type SimResult<T> = Result<T, SimError>;
