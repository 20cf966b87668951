//! `ped-scenario` — the scripted occupancy scenario an agent pursues.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                    |
//! |----------------|-------------------------------------------------------------|
//! | [`activity`]   | `Activity`, `EngagementBounds`                              |
//! | [`sequence`]   | `Sequence`, `Priority`, `PartialSequence`, `ActiveSequence` |
//! | [`task_queue`] | `TaskQueue` (expected `BTreeMap` + unexpected hash map)     |
//! | [`scenario`]   | `Scenario` — activities, main stations, sequences, queue    |
//! | [`builder`]    | `ScenarioBuilder`                                           |
//! | [`loader`]     | `load_sequences_csv`, `load_sequences_reader`               |
//! | [`error`]      | `ScenarioError`, `ScenarioResult<T>`                        |
//!
//! # Queue model (summary)
//!
//! Every sequence recurs with exponentially distributed inter-arrival times.
//! When a sequence is (re)activated its next occurrence is filed:
//!
//! ```text
//! no visual trigger → expected[now + Exp(rate)]     (ordered, consumed earliest first)
//! visual trigger    → unexpected[now + Exp(rate)]   (waits to be noticed)
//! ```
//!
//! A sequence sits in at most one of the two maps at a time, and in neither
//! while it is being worked on.

pub mod activity;
pub mod builder;
pub mod error;
pub mod loader;
pub mod scenario;
pub mod sequence;
pub mod task_queue;

#[cfg(test)]
mod tests;

pub use activity::{Activity, EngagementBounds};
pub use builder::ScenarioBuilder;
pub use error::{ScenarioError, ScenarioResult};
pub use loader::{load_sequences_csv, load_sequences_reader};
pub use scenario::Scenario;
pub use sequence::{ActiveSequence, PartialSequence, Priority, Sequence};
pub use task_queue::TaskQueue;
