//! `ped-motion` — continuous agent kinematics.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                      |
//! |----------------|---------------------------------------------------------------|
//! | [`params`]     | `MotionParams` — body and locomotion constants                |
//! | [`repulsion`]  | `barrier_repulsion` — wall push profile                       |
//! | [`kinematics`] | direction slewing, stop-and-orient velocity law, stop tests   |
//! | [`integrator`] | `KinematicIntegrator` — one Δt with collision sub-stepping    |
//! | [`error`]      | `MotionError`, `MotionResult<T>`                              |
//!
//! # Step model
//!
//! One call to [`KinematicIntegrator::advance`] consumes exactly Δt:
//!
//! ```text
//! remaining = Δt
//! while remaining > 0:
//!     steer  ← activity gradient (or previous facing)
//!     accel  ← mode law (+ barrier repulsion in Move)
//!     v      ← clamp(v + accel·rem, max_speed);  x ← x + v·rem
//!     if the body just touched a barrier:
//!         pin x to the contact point, bounce/slide v, consume only up to contact
//!     remaining -= consumed
//! ```
//!
//! The same integrator drives the scheduled agent and the bare trainer; only
//! the caller that picks the target differs.

pub mod error;
pub mod integrator;
pub mod kinematics;
pub mod params;
pub mod repulsion;


pub use error::{MotionError, MotionResult};
pub use integrator::{KinematicIntegrator, StepReport, Target};
pub use kinematics::{guaranteed_stop, ready_to_stop, slew_direction, stop_and_orient_velocity};
pub use params::MotionParams;
pub use repulsion::barrier_repulsion;
