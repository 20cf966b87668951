//! `EventCaptureDriver` — samples the run against event criteria.
//!
//! At every sampling instant the driver asks whether all configured criteria
//! hold for the agent:
//!
//! | Criterion          | Holds when                                              |
//! |--------------------|---------------------------------------------------------|
//! | field interval     | the named data field at the agent's cell is in `[min, max]` |
//! | visibility         | the target region is (or is not) visible from the agent |
//! | engaged in         | the agent is engaged at one of the flagged activities   |
//!
//! With no criteria configured every sample is captured.  Captured samples
//! are counted per cell in the trail heatmap; each sample also contributes a
//! `1.0`/`0.0` entry to the capture signal.

use std::collections::BTreeMap;

use ped_core::{ActivityId, AgentEngagementStatus, CellId};
use ped_output::{
    CaptureResult, ResultSink, SimulationRecord, TraceRow, TraceWriter, frequency_spectrum,
};
use ped_scenario::ScenarioError;
use ped_spatial::{Region, SpatialEnvironment};
use tracing::info;

use crate::{AgentSim, SimError, SimObserver, SimResult};

// ── Configuration ─────────────────────────────────────────────────────────────

/// Inclusive value range of one named data field.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FieldInterval {
    pub field: String,
    pub min:   f64,
    pub max:   f64,
}

impl FieldInterval {
    pub fn new(field: impl Into<String>, min: f64, max: f64) -> Self {
        Self { field: field.into(), min, max }
    }

    fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }
}

/// Whether a target region must be in sight (`visible = true`) or out of it.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VisibilityCriterion {
    pub target:  Region,
    pub visible: bool,
}

/// Conjunction of the capture criteria.  Empty parts impose nothing.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EventCriteria {
    pub field_intervals: Vec<FieldInterval>,
    pub visibility:      Option<VisibilityCriterion>,
    /// Activity names; the agent must be engaged at one of them.
    pub engaged_in:      Vec<String>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CaptureConfig {
    /// Seconds between samples, rounded to whole ticks (at least one).
    /// Default: 1.0.
    pub sample_interval_secs: f64,
    pub criteria:             EventCriteria,
    /// Attach the magnitude spectrum of the capture signal to the result.
    pub frequency_analysis:   bool,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            sample_interval_secs: 1.0,
            criteria:             EventCriteria::default(),
            frequency_analysis:   false,
        }
    }
}

impl CaptureConfig {
    pub fn validate(&self) -> SimResult<()> {
        if !(self.sample_interval_secs.is_finite() && self.sample_interval_secs > 0.0) {
            return Err(SimError::Config(format!(
                "sample_interval_secs must be positive, got {}",
                self.sample_interval_secs
            )));
        }
        for interval in &self.criteria.field_intervals {
            if interval.min.is_nan() || interval.max.is_nan() || interval.min > interval.max {
                return Err(SimError::Config(format!(
                    "field {:?} interval [{}, {}] is empty",
                    interval.field, interval.min, interval.max
                )));
            }
        }
        Ok(())
    }
}

// ── Driver ────────────────────────────────────────────────────────────────────

/// Runs an [`AgentSim`] to completion and samples it against
/// [`EventCriteria`].
pub struct EventCaptureDriver<E: SpatialEnvironment> {
    sim:          AgentSim<E>,
    config:       CaptureConfig,
    /// `criteria.engaged_in` resolved to ids.
    engaged_in:   Vec<ActivityId>,
    sample_ticks: u64,
}

/// Running tallies of one capture run.
struct Tally {
    trail:      BTreeMap<CellId, u64>,
    signal:     Vec<f64>,
    captured:   u64,
    uncaptured: u64,
}

impl<E: SpatialEnvironment> EventCaptureDriver<E> {
    /// # Errors
    /// [`SimError::Config`] for an invalid [`CaptureConfig`];
    /// [`SimError::Scenario`] when `engaged_in` names an unknown activity.
    pub fn new(sim: AgentSim<E>, config: CaptureConfig) -> SimResult<Self> {
        config.validate()?;
        let scenario = sim.scheduler().scenario();
        let engaged_in = config
            .criteria
            .engaged_in
            .iter()
            .map(|name| {
                scenario
                    .activity_id(name)
                    .ok_or_else(|| ScenarioError::UnknownActivity(name.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let dt = sim.clock().time_step_secs;
        let sample_ticks = ((config.sample_interval_secs / dt).round() as u64).max(1);
        Ok(Self { sim, config, engaged_in, sample_ticks })
    }

    pub fn sim(&self) -> &AgentSim<E> {
        &self.sim
    }

    pub fn into_sim(self) -> AgentSim<E> {
        self.sim
    }

    /// Effective seconds between samples.
    pub fn sample_interval_secs(&self) -> f64 {
        self.sample_ticks as f64 * self.sim.clock().time_step_secs
    }

    /// Run to the configured duration, writing every sample to `trace` when
    /// one is given.
    ///
    /// # Errors
    /// Besides integration failures, [`SimError::OutsideFloor`] when the
    /// agent is not on any cell at a sample and [`SimError::CellNotInTrail`]
    /// when its cell was not among the environment's field cells.
    pub fn run<O: SimObserver>(
        &mut self,
        observer:  &mut O,
        mut trace: Option<&mut dyn TraceWriter>,
    ) -> SimResult<CaptureResult> {
        let mut tally = Tally {
            trail:      self.sim.env().field_cells().into_iter().map(|c| (c, 0)).collect(),
            signal:     Vec::new(),
            captured:   0,
            uncaptured: 0,
        };
        let start = self.sim.clock().ticks;
        let sample_ticks = self.sample_ticks;
        let criteria = &self.config.criteria;
        let engaged_in = &self.engaged_in;

        info!(
            sample_ticks,
            cells = tally.trail.len(),
            "event capture run started"
        );
        self.sim.run_with(observer, |sim, report| {
            if (sim.clock().ticks - start) % sample_ticks != 0 {
                return Ok(());
            }
            let state = sim.state();
            let cell = sim
                .env()
                .cell_at(state.location)
                .ok_or(SimError::OutsideFloor { location: state.location })?;
            let captured = criteria_hold(sim, criteria, engaged_in, cell);

            let slot = tally.trail.get_mut(&cell).ok_or(SimError::CellNotInTrail { cell })?;
            if captured {
                *slot += 1;
                tally.captured += 1;
            } else {
                tally.uncaptured += 1;
            }
            tally.signal.push(if captured { 1.0 } else { 0.0 });

            if let Some(writer) = trace.as_deref_mut() {
                writer.write_sample(&TraceRow {
                    time_secs: report.time.secs(),
                    state: *state,
                    status: sim.scheduler().status(),
                    mode: sim.scheduler().mode(),
                    captured,
                })?;
            }
            Ok(())
        })?;
        if let Some(writer) = trace.as_deref_mut() {
            writer.finish()?;
        }

        let interval = self.sample_interval_secs();
        let samples = tally.captured + tally.uncaptured;
        let capture_probability =
            if samples > 0 { tally.captured as f64 / samples as f64 } else { 0.0 };
        let spectrum = self
            .config
            .frequency_analysis
            .then(|| frequency_spectrum(&tally.signal, interval));

        let result = CaptureResult {
            duration_secs: (self.sim.clock().ticks - start) as f64 * self.sim.clock().time_step_secs,
            sample_interval_secs: interval,
            captured: tally.captured,
            uncaptured: tally.uncaptured,
            capture_probability,
            trail: tally.trail,
            signal: tally.signal,
            spectrum,
        };
        info!(
            samples,
            captured = result.captured,
            probability = result.capture_probability,
            "event capture run finished"
        );
        Ok(result)
    }

    /// [`run`](Self::run), then hand the record to `sink`.
    pub fn run_into<O, S>(
        &mut self,
        observer: &mut O,
        trace:    Option<&mut dyn TraceWriter>,
        sink:     &mut S,
    ) -> SimResult<CaptureResult>
    where
        O: SimObserver,
        S: ResultSink + ?Sized,
    {
        let result = self.run(observer, trace)?;
        sink.record(SimulationRecord::Capture(result.clone()))?;
        Ok(result)
    }
}

fn criteria_hold<E: SpatialEnvironment>(
    sim:        &AgentSim<E>,
    criteria:   &EventCriteria,
    engaged_in: &[ActivityId],
    cell:       CellId,
) -> bool {
    let env = sim.env();
    for interval in &criteria.field_intervals {
        match env.field_value(&interval.field, cell) {
            Some(value) if interval.contains(value) => {}
            _ => return false,
        }
    }
    if let Some(visibility) = &criteria.visibility {
        if env.visible_from(sim.state().location, &visibility.target) != visibility.visible {
            return false;
        }
    }
    if engaged_in.is_empty() {
        return true;
    }
    let scheduler = sim.scheduler();
    scheduler.status() == AgentEngagementStatus::Engaged
        && engaged_in.contains(&scheduler.current_activity())
}
