//! Simulation observer trait for progress reporting and data collection.

use ped_core::{AgentEngagementStatus, AgentState, SimTime};

/// Callbacks invoked by [`AgentSim::run_with`][crate::AgentSim::run_with]
/// and the drivers built on it.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example — progress printer
///
/// ```rust
/// use ped_sim::SimObserver;
///
/// struct ProgressPrinter;
///
/// impl SimObserver for ProgressPrinter {
///     fn on_progress(&mut self, percent: u32) {
///         if percent % 10 == 0 {
///             println!("{percent}% done");
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called after every whole Δt, once the scheduler has run.
    ///
    /// `status` is the status the agent held while the tick elapsed.
    fn on_tick_end(&mut self, _time: SimTime, _state: &AgentState, _status: AgentEngagementStatus) {}

    /// Called once per whole percent of the run completed, `1..=100`.
    fn on_progress(&mut self, _percent: u32) {}

    /// Called once after the final tick completes.
    fn on_sim_end(&mut self, _time: SimTime) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}

/// Turns tick counts into whole-percent notifications.
#[derive(Clone, Debug)]
pub(crate) struct ProgressTracker {
    total:    u64,
    reported: u32,
}

impl ProgressTracker {
    pub(crate) fn new(total_ticks: u64) -> Self {
        Self { total: total_ticks, reported: 0 }
    }

    /// Percentages newly reached after `done` ticks.
    pub(crate) fn advance(&mut self, done: u64) -> std::ops::RangeInclusive<u32> {
        if self.total == 0 {
            return 1..=0;
        }
        let percent = ((done.min(self.total) * 100) / self.total) as u32;
        let range = self.reported + 1..=percent;
        self.reported = self.reported.max(percent);
        range
    }
}
