//! `ped-core` — foundational types for the `pedsim` occupancy simulator.
//!
//! This crate is a dependency of every other `ped-*` crate.  It has no
//! `ped-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module     | Contents                                                       |
//! |------------|----------------------------------------------------------------|
//! | [`ids`]    | `CellId`, `ActivityId`, `SequenceId`                           |
//! | [`vec2`]   | `Vec2` planar vector arithmetic                                |
//! | [`state`]  | `AgentState`, `Pose`, `AgentEngagementStatus`, `PhysicalMovementMode` |
//! | [`time`]   | `SimTime`, `SimClock`, `SimConfig`                             |
//! | [`rng`]    | `SimRng` (one seeded generator per simulation instance)        |
//! | [`error`]  | `PedError`, `PedResult`                                        |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod ids;
pub mod rng;
pub mod state;
pub mod time;
pub mod vec2;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{PedError, PedResult};
pub use ids::{ActivityId, CellId, SequenceId};
pub use rng::SimRng;
pub use state::{AgentEngagementStatus, AgentState, PhysicalMovementMode, Pose};
pub use time::{SimClock, SimConfig, SimTime};
pub use vec2::Vec2;
