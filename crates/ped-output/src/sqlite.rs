//! SQLite output backend (feature `sqlite`).
//!
//! Creates a single `results.db` file in the configured output directory with
//! three tables: `occupancy`, `capture` and `trail`.

use std::path::Path;

use rusqlite::Connection;

use crate::record::{CaptureResult, OccupancyStats};
use crate::writer::ResultSink;
use crate::{OutputResult, SimulationRecord};

/// Writes result records to an SQLite database.
pub struct SqliteSink {
    conn:     Connection,
    run:      i64,
    finished: bool,
}

impl SqliteSink {
    /// Open (or create) `results.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let conn = Connection::open(dir.join("results.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS occupancy (
                 run                      INTEGER PRIMARY KEY,
                 duration_secs            REAL NOT NULL,
                 walked_distance_m        REAL NOT NULL,
                 walked_distance_per_hour REAL NOT NULL,
                 free_fraction            REAL NOT NULL,
                 walking_fraction         REAL NOT NULL,
                 engaged_fraction         REAL NOT NULL,
                 visual_sequence_count    INTEGER NOT NULL,
                 detections               INTEGER NOT NULL,
                 avg_delay_fraction       REAL,
                 min_delay_fraction       REAL,
                 max_delay_fraction       REAL
             );
             CREATE TABLE IF NOT EXISTS capture (
                 run                  INTEGER PRIMARY KEY,
                 duration_secs        REAL NOT NULL,
                 sample_interval_secs REAL NOT NULL,
                 captured             INTEGER NOT NULL,
                 uncaptured           INTEGER NOT NULL,
                 capture_probability  REAL NOT NULL
             );
             CREATE TABLE IF NOT EXISTS trail (
                 run    INTEGER NOT NULL,
                 cell   INTEGER NOT NULL,
                 visits INTEGER NOT NULL
             );",
        )?;

        // Continue numbering after runs already in the file.
        let run: i64 = conn.query_row(
            "SELECT COALESCE(MAX(run) + 1, 0) FROM \
             (SELECT run FROM occupancy UNION ALL SELECT run FROM capture)",
            [],
            |row| row.get(0),
        )?;

        Ok(Self { conn, run, finished: false })
    }

    fn write_occupancy(&mut self, r: &OccupancyStats) -> OutputResult<()> {
        self.conn.execute(
            "INSERT INTO occupancy \
             (run, duration_secs, walked_distance_m, walked_distance_per_hour, free_fraction, \
              walking_fraction, engaged_fraction, visual_sequence_count, detections, \
              avg_delay_fraction, min_delay_fraction, max_delay_fraction) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            rusqlite::params![
                self.run,
                r.duration_secs,
                r.walked_distance_m,
                r.walked_distance_per_hour,
                r.free_fraction,
                r.walking_fraction,
                r.engaged_fraction,
                r.visual_sequence_count as i64,
                r.detections,
                r.avg_delay_fraction,
                r.min_delay_fraction,
                r.max_delay_fraction,
            ],
        )?;
        Ok(())
    }

    fn write_capture(&mut self, r: &CaptureResult) -> OutputResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO capture \
             (run, duration_secs, sample_interval_secs, captured, uncaptured, capture_probability) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![
                self.run,
                r.duration_secs,
                r.sample_interval_secs,
                r.captured as i64,
                r.uncaptured as i64,
                r.capture_probability,
            ],
        )?;
        {
            let mut stmt =
                tx.prepare_cached("INSERT INTO trail (run, cell, visits) VALUES (?1, ?2, ?3)")?;
            for (cell, visits) in &r.trail {
                stmt.execute(rusqlite::params![self.run, cell.0, *visits as i64])?;
            }
        }
        tx.commit()?;
        Ok(())
    }
}

impl ResultSink for SqliteSink {
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
        self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
