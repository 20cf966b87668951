//! `StatisticsDriver` — a whole scenario run reduced to occupancy statistics.

use ped_core::AgentEngagementStatus;
use ped_output::{OccupancyStats, ResultSink, SimulationRecord};
use ped_spatial::SpatialEnvironment;
use tracing::info;

use crate::{AgentSim, SimObserver, SimResult};

/// Runs an [`AgentSim`] to completion with no event filtering.
///
/// Accumulates the distance walked, the time spent in each
/// [`AgentEngagementStatus`] and the visual-detection delays.
pub struct StatisticsDriver<E: SpatialEnvironment> {
    sim: AgentSim<E>,
}

/// Per-status time accumulator.
#[derive(Default)]
struct StatusTimes {
    free:    f64,
    walking: f64,
    engaged: f64,
}

impl StatusTimes {
    fn add(&mut self, status: AgentEngagementStatus, secs: f64) {
        match status {
            AgentEngagementStatus::Free              => self.free += secs,
            AgentEngagementStatus::WalkingInSequence => self.walking += secs,
            AgentEngagementStatus::Engaged           => self.engaged += secs,
        }
    }
}

impl<E: SpatialEnvironment> StatisticsDriver<E> {
    pub fn new(sim: AgentSim<E>) -> Self {
        Self { sim }
    }

    pub fn sim(&self) -> &AgentSim<E> {
        &self.sim
    }

    pub fn into_sim(self) -> AgentSim<E> {
        self.sim
    }

    /// Run to the configured duration and summarise.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<OccupancyStats> {
        let dt = self.sim.clock().time_step_secs;
        let start = self.sim.clock().ticks;
        let mut walked = 0.0;
        let mut times = StatusTimes::default();

        let ticks = self.sim.config().total_ticks().saturating_sub(start);
        info!(ticks, "statistics run started");
        self.sim.run_with(observer, |_, report| {
            walked += report.distance;
            times.add(report.status, dt);
            Ok(())
        })?;

        let duration = (self.sim.clock().ticks - start) as f64 * dt;
        let per_duration = |secs: f64| if duration > 0.0 { secs / duration } else { 0.0 };
        let scenario = self.sim.scheduler().scenario();
        let detections = self.sim.scheduler().detection_stats();
        let summary = detections.summary();

        let stats = OccupancyStats {
            duration_secs: duration,
            walked_distance_m: walked,
            walked_distance_per_hour: if duration > 0.0 { walked * 3_600.0 / duration } else { 0.0 },
            free_fraction: per_duration(times.free),
            walking_fraction: per_duration(times.walking),
            engaged_fraction: per_duration(times.engaged),
            visual_sequence_count: scenario.visual_sequence_count(),
            detections: detections.detections(),
            avg_delay_fraction: summary.map(|s| per_duration(s.mean_secs)),
            min_delay_fraction: summary.map(|s| per_duration(s.min_secs)),
            max_delay_fraction: summary.map(|s| per_duration(s.max_secs)),
        };
        info!(
            walked_m = stats.walked_distance_m,
            free = stats.free_fraction,
            walking = stats.walking_fraction,
            engaged = stats.engaged_fraction,
            detections = stats.detections,
            "statistics run finished"
        );
        Ok(stats)
    }

    /// [`run`](Self::run), then hand the record to `sink`.
    pub fn run_into<O, S>(&mut self, observer: &mut O, sink: &mut S) -> SimResult<OccupancyStats>
    where
        O: SimObserver,
        S: ResultSink + ?Sized,
    {
        let stats = self.run(observer)?;
        sink.record(SimulationRecord::Occupancy(stats.clone()))?;
        Ok(stats)
    }
}
