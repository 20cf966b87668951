//! `ped-sim` — single-agent simulation loop and its drivers.
//!
//! # Tick
//!
//! ```text
//! every Δt:
//!   ① Integrate  — KinematicIntegrator::advance toward the scheduler's
//!                  current activity in its current movement mode
//!                  (sub-stepped at collisions).
//!   ② Clock      — tick counter advances; now = ticks · Δt.
//!   ③ Schedule   — ScenarioScheduler::update: visual detection, possible
//!                  interruption, walking/engaged/free transitions.
//!   ④ Observe    — SimObserver::on_tick_end, then whole-percent
//!                  on_progress notifications.
//! ```
//!
//! # Modules
//!
//! | Module           | Contents                                                |
//! |------------------|---------------------------------------------------------|
//! | [`agent`]        | `AgentSim`, `TickReport`                                |
//! | [`builder`]      | `SimBuilder` — validation and assembly                  |
//! | [`trainer`]      | `Trainer` — integrator only, one fixed activity         |
//! | [`stats_driver`] | `StatisticsDriver` → `OccupancyStats`                   |
//! | [`capture`]      | `EventCaptureDriver` → `CaptureResult`, `CaptureConfig` |
//! | [`observer`]     | `SimObserver`, `NoopObserver`                           |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use ped_sim::{NoopObserver, SimBuilder, StatisticsDriver};
//!
//! let sim = SimBuilder::new(floor, scenario).build()?;
//! let stats = StatisticsDriver::new(sim).run(&mut NoopObserver)?;
//! println!("walked {:.0} m/h", stats.walked_distance_per_hour);
//! ```

pub mod agent;
pub mod builder;
pub mod capture;
pub mod error;
pub mod observer;
pub mod stats_driver;
pub mod trainer;

#[cfg(test)]
mod tests;

pub use agent::{AgentSim, TickReport};
pub use builder::SimBuilder;
pub use capture::{
    CaptureConfig, EventCaptureDriver, EventCriteria, FieldInterval, VisibilityCriterion,
};
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver};
pub use stats_driver::StatisticsDriver;
pub use trainer::{REST_SPEED, Trainer, TrainingOutcome};
