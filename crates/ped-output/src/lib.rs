//! `ped-output` — what a simulation run hands back to its host.
//!
//! | Module       | Contents                                                     |
//! |--------------|--------------------------------------------------------------|
//! | [`record`]   | `OccupancyStats`, `CaptureResult`, `SimulationRecord`        |
//! | [`row`]      | `TraceRow` — one sample of the optional state trace          |
//! | [`writer`]   | `TraceWriter` and `ResultSink` traits, `MemorySink`          |
//! | [`csv`]      | `CsvTraceWriter`, `CsvSink`                                  |
//! | [`sqlite`]   | `SqliteSink` (feature `sqlite`)                              |
//! | [`spectrum`] | `frequency_spectrum` — DFT magnitude of the capture signal   |
//! | [`error`]    | `OutputError`, `OutputResult<T>`                             |
//!
//! | Feature   | Backend | Files created                                      |
//! |-----------|---------|----------------------------------------------------|
//! | *(none)*  | CSV     | `occupancy.csv`, `capture.csv`, `trail.csv`        |
//! | `sqlite`  | SQLite  | `results.db`                                       |

pub mod csv;
pub mod error;
pub mod record;
pub mod row;
pub mod spectrum;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;


pub use csv::{CsvSink, CsvTraceWriter};
pub use error::{OutputError, OutputResult};
pub use record::{CaptureResult, OccupancyStats, SimulationRecord};
pub use row::TraceRow;
pub use spectrum::{dominant_frequency, frequency_spectrum, SpectrumBin};
pub use writer::{MemorySink, ResultSink, TraceWriter};

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteSink;
