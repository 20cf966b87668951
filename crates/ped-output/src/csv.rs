//! CSV output backend.
//!
//! [`CsvTraceWriter`] writes one trace file; [`CsvSink`] creates three files
//! in its output directory:
//! - `occupancy.csv` — one row per occupancy record
//! - `capture.csv`   — one row per capture record
//! - `trail.csv`     — `run,cell,visits` rows for every capture record

use std::fs::File;
use std::io::Write;
use std::path::Path;

use csv::Writer;

use crate::record::{CaptureResult, OccupancyStats};
use crate::spectrum::dominant_frequency;
use crate::writer::{ResultSink, TraceWriter};
use crate::{OutputResult, SimulationRecord, TraceRow};

// ── Trace ─────────────────────────────────────────────────────────────────────

/// Newline-delimited agent trace, one row per sample.
pub struct CsvTraceWriter<W: Write = File> {
    out:      Writer<W>,
    finished: bool,
}

impl CsvTraceWriter<File> {
    /// Create (truncate) `path` and write the header row.
    pub fn create(path: &Path) -> OutputResult<Self> {
        Self::from_writer(File::create(path)?)
    }
}

impl<W: Write> CsvTraceWriter<W> {
    pub fn from_writer(inner: W) -> OutputResult<Self> {
        let mut out = Writer::from_writer(inner);
        out.write_record(TraceRow::HEADER)?;
        Ok(Self { out, finished: false })
    }
}

impl<W: Write> TraceWriter for CsvTraceWriter<W> {
    fn write_sample(&mut self, row: &TraceRow) -> OutputResult<()> {
        let s = &row.state;
        self.out.write_record(&[
            row.time_secs.to_string(),
            s.location.x.to_string(),
            s.location.y.to_string(),
            s.velocity.x.to_string(),
            s.velocity.y.to_string(),
            s.direction.x.to_string(),
            s.direction.y.to_string(),
            row.status.as_str().to_owned(),
            row.mode.as_str().to_owned(),
            (row.captured as u8).to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.out.flush()?;
        Ok(())
    }
}

// ── Results ───────────────────────────────────────────────────────────────────

/// Writes result records to CSV files in one directory.
pub struct CsvSink {
    occupancy: Writer<File>,
    capture:   Writer<File>,
    trail:     Writer<File>,
    /// Index of the next record, shared by both record kinds.
    run:       u64,
    finished:  bool,
}

impl CsvSink {
    /// Open (or create) the three CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut occupancy = Writer::from_path(dir.join("occupancy.csv"))?;
        occupancy.write_record([
            "run",
            "duration_secs",
            "walked_distance_m",
            "walked_distance_per_hour",
            "free_fraction",
            "walking_fraction",
            "engaged_fraction",
            "visual_sequence_count",
            "detections",
            "avg_delay_fraction",
            "min_delay_fraction",
            "max_delay_fraction",
        ])?;

        let mut capture = Writer::from_path(dir.join("capture.csv"))?;
        capture.write_record([
            "run",
            "duration_secs",
            "sample_interval_secs",
            "captured",
            "uncaptured",
            "capture_probability",
            "visited_cells",
            "dominant_frequency_hz",
        ])?;

        let mut trail = Writer::from_path(dir.join("trail.csv"))?;
        trail.write_record(["run", "cell", "visits"])?;

        Ok(Self { occupancy, capture, trail, run: 0, finished: false })
    }

    fn write_occupancy(&mut self, r: &OccupancyStats) -> OutputResult<()> {
        self.occupancy.write_record(&[
            self.run.to_string(),
            r.duration_secs.to_string(),
            r.walked_distance_m.to_string(),
            r.walked_distance_per_hour.to_string(),
            r.free_fraction.to_string(),
            r.walking_fraction.to_string(),
            r.engaged_fraction.to_string(),
            r.visual_sequence_count.to_string(),
            r.detections.to_string(),
            opt(r.avg_delay_fraction),
            opt(r.min_delay_fraction),
            opt(r.max_delay_fraction),
        ])?;
        Ok(())
    }

    fn write_capture(&mut self, r: &CaptureResult) -> OutputResult<()> {
        let dominant = r.spectrum.as_deref().and_then(dominant_frequency).map(|b| b.frequency_hz);
        self.capture.write_record(&[
            self.run.to_string(),
            r.duration_secs.to_string(),
            r.sample_interval_secs.to_string(),
            r.captured.to_string(),
            r.uncaptured.to_string(),
            r.capture_probability.to_string(),
            r.visited_cells().to_string(),
            opt(dominant),
        ])?;
        for (cell, visits) in &r.trail {
            self.trail.write_record(&[self.run.to_string(), cell.0.to_string(), visits.to_string()])?;
        }
        Ok(())
    }
}

impl ResultSink for CsvSink {
    fn record(&mut self, record: SimulationRecord) -> OutputResult<()> {
        match &record {
            SimulationRecord::Occupancy(r) => self.write_occupancy(r)?,
            SimulationRecord::Capture(r) => self.write_capture(r)?,
        }
        self.run += 1;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.occupancy.flush()?;
        self.capture.flush()?;
        self.trail.flush()?;
        Ok(())
    }
}

/// Empty field for `None`.
fn opt(v: Option<f64>) -> String {
    v.map(|x| x.to_string()).unwrap_or_default()
}
