//! Output traits and the in-memory sink.

use crate::{OutputResult, SimulationRecord, TraceRow};

/// Destination of the optional per-sample state trace.
pub trait TraceWriter {
    fn write_sample(&mut self, row: &TraceRow) -> OutputResult<()>;

    /// Flush underlying handles.  Idempotent.
    fn finish(&mut self) -> OutputResult<()> {
        Ok(())
    }
}

/// Collects trace rows in memory.
impl TraceWriter for Vec<TraceRow> {
    fn write_sample(&mut self, row: &TraceRow) -> OutputResult<()> {
        self.push(*row);
        Ok(())
    }
}

/// Receives finished result records from the drivers.
pub trait ResultSink {
    fn record(&mut self, record: SimulationRecord) -> OutputResult<()>;

    /// Flush underlying handles.  Idempotent.
    fn finish(&mut self) -> OutputResult<()> {
        Ok(())
    }
}

/// Keeps every record in a `Vec`.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub records: Vec<SimulationRecord>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ResultSink for MemorySink {
    fn record(&mut self, record: SimulationRecord) -> OutputResult<()> {
        self.records.push(record);
        Ok(())
    }
}
