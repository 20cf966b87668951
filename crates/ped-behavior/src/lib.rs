//! `ped-behavior` — what the agent wants to do next.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`scheduler`] | `ScenarioScheduler` — Free / Walking / Engaged machine    |
//! | [`detector`]  | `VisualTriggerDetector`, `VisionParams`, `Detection`      |
//! | [`stats`]     | `DetectionStats`, `DelayStat` — per-sequence delays       |
//! | [`error`]     | `BehaviorError`, `BehaviorResult<T>`                      |
//!
//! # Tick order
//!
//! The scheduler runs once per whole Δt, after the integrator has consumed
//! it:
//!
//! 1. detect visually triggered sequences that came into view;
//! 2. interrupt the current (non-urgent) sequence if anything was detected;
//! 3. step the engagement state machine.

pub mod detector;
pub mod error;
pub mod scheduler;
pub mod stats;


pub use detector::{Detection, VisionParams, VisualTriggerDetector};
pub use error::{BehaviorError, BehaviorResult};
pub use scheduler::{ScenarioScheduler, TickOutcome};
pub use stats::{DelayStat, DelaySummary, DetectionStats};
