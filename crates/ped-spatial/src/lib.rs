//! `ped-spatial` — the spatial collaborators consumed by the simulation core.
//!
//! The simulator never builds floors itself.  It talks to a floor through the
//! [`SpatialEnvironment`] trait (barrier and visibility queries) and to
//! destinations through the [`PotentialField`] trait (steering gradients).
//! Hosts back these with whatever precomputed representation they have; this
//! crate ships one concrete implementation of each for tests and demos.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                   |
//! |-----------------|------------------------------------------------------------|
//! | [`environment`] | `SpatialEnvironment` trait                                 |
//! | [`collision`]   | `BarrierProximity`, `Contact`                              |
//! | [`field`]       | `PotentialField` trait, `RadialField`                      |
//! | [`region`]      | `Region` (set of cells)                                    |
//! | [`floor`]       | `GridFloor` (cells + R-tree of barriers), `GridFloorBuilder` |
//! | [`error`]       | `SpatialError`, `SpatialResult<T>`                         |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public record types.    |

pub mod collision;
pub mod environment;
pub mod error;
pub mod field;
pub mod floor;
pub mod region;


pub use collision::{BarrierProximity, Contact};
pub use environment::SpatialEnvironment;
pub use error::{SpatialError, SpatialResult};
pub use field::{PotentialField, RadialField};
pub use floor::{GridFloor, GridFloorBuilder};
pub use region::Region;
