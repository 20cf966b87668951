//! Result records produced by the simulation drivers.

use std::collections::BTreeMap;

use ped_core::CellId;

use crate::SpectrumBin;

/// Aggregate occupancy statistics of one statistics-driver run.
///
/// Delay fractions are detection delays divided by the run duration; they
/// are `None` when nothing was ever detected.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OccupancyStats {
    pub duration_secs:            f64,
    pub walked_distance_m:        f64,
    pub walked_distance_per_hour: f64,
    pub free_fraction:            f64,
    pub walking_fraction:         f64,
    pub engaged_fraction:         f64,
    /// Sequences that need visual discovery.
    pub visual_sequence_count:    usize,
    /// Detections that happened during the run.
    pub detections:               u32,
    pub avg_delay_fraction:       Option<f64>,
    pub min_delay_fraction:       Option<f64>,
    pub max_delay_fraction:       Option<f64>,
}

impl OccupancyStats {
    /// `free + walking + engaged`; 1 for any complete run.
    pub fn fraction_sum(&self) -> f64 {
        self.free_fraction + self.walking_fraction + self.engaged_fraction
    }
}

/// Result of one event-capture run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CaptureResult {
    pub duration_secs:        f64,
    pub sample_interval_secs: f64,
    pub captured:             u64,
    pub uncaptured:           u64,
    /// `captured / (captured + uncaptured)`, 0 without samples.
    pub capture_probability:  f64,
    /// Captured samples per walkable cell.  Every walkable cell is present.
    pub trail:                BTreeMap<CellId, u64>,
    /// 1.0 for captured samples, 0.0 otherwise, in sampling order.
    pub signal:               Vec<f64>,
    pub spectrum:             Option<Vec<SpectrumBin>>,
}

impl CaptureResult {
    pub fn samples(&self) -> u64 {
        self.captured + self.uncaptured
    }

    /// Cells with at least one captured sample.
    pub fn visited_cells(&self) -> usize {
        self.trail.values().filter(|&&n| n > 0).count()
    }
}

/// Anything a driver hands to a [`ResultSink`](crate::ResultSink).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SimulationRecord {
    Occupancy(OccupancyStats),
    Capture(CaptureResult),
}
