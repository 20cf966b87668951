//! Plain data row written by trace writers.

use ped_core::{AgentEngagementStatus, AgentState, PhysicalMovementMode};

/// One sample of the agent trace.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceRow {
    pub time_secs: f64,
    pub state:     AgentState,
    pub status:    AgentEngagementStatus,
    pub mode:      PhysicalMovementMode,
    /// Whether the capture criteria held at this sample.
    pub captured:  bool,
}

impl TraceRow {
    /// Column names, in write order.
    pub const HEADER: [&'static str; 10] =
        ["time", "x", "y", "vx", "vy", "dir_x", "dir_y", "status", "mode", "captured"];
}
