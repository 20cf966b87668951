//! CSV sequence loader.
//!
//! # CSV format
//!
//! One row per sequence.  Activities must already be registered on the
//! builder; list fields are `;`-separated.
//!
//! ```csv
//! name,activities,rate_per_hour,trigger_cells
//! coffee,kitchen;desk,1.5,
//! meeting,meeting_room,0.5,
//! visitor,door;desk,0.25,12;13;14
//! ```
//!
//! An empty `trigger_cells` field means the sequence has no visual trigger.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use ped_core::{CellId, SequenceId};
use ped_spatial::Region;

use crate::{ScenarioBuilder, ScenarioError, ScenarioResult};

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct SequenceRecord {
    name:          String,
    activities:    String,
    rate_per_hour: f64,
    #[serde(default)]
    trigger_cells: String,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load sequences from a CSV file into `builder`.
///
/// Returns the ids in file order.
pub fn load_sequences_csv(path: &Path, builder: &mut ScenarioBuilder) -> ScenarioResult<Vec<SequenceId>> {
    let file = std::fs::File::open(path)?;
    load_sequences_reader(file, builder)
}

/// Like [`load_sequences_csv`] but accepts any `Read` source.
pub fn load_sequences_reader<R: Read>(
    reader:  R,
    builder: &mut ScenarioBuilder,
) -> ScenarioResult<Vec<SequenceId>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut ids = Vec::new();

    for result in csv_reader.deserialize::<SequenceRecord>() {
        let row = result.map_err(|e| ScenarioError::Parse(e.to_string()))?;
        let activities = split_list(&row.activities);
        let trigger = parse_trigger(&row.trigger_cells)?;
        ids.push(builder.add_sequence(row.name.trim(), &activities, row.rate_per_hour, trigger)?);
    }

    Ok(ids)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn split_list(s: &str) -> Vec<&str> {
    s.split(';').map(str::trim).filter(|p| !p.is_empty()).collect()
}

fn parse_trigger(s: &str) -> ScenarioResult<Option<Region>> {
    let parts = split_list(s);
    if parts.is_empty() {
        return Ok(None);
    }
    parts
        .into_iter()
        .map(|p| {
            p.parse::<u32>()
                .map(CellId)
                .map_err(|_| ScenarioError::Parse(format!("invalid trigger cell {p:?}")))
        })
        .collect::<ScenarioResult<Region>>()
        .map(Some)
}
