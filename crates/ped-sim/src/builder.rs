//! Fluent builder for constructing an [`AgentSim`].

use ped_behavior::{ScenarioScheduler, VisionParams, VisualTriggerDetector};
use ped_core::{AgentState, SimConfig, SimRng, SimTime};
use ped_motion::{KinematicIntegrator, MotionParams};
use ped_scenario::{Scenario, ScenarioError};
use ped_spatial::SpatialEnvironment;
use tracing::debug;

use crate::{AgentSim, SimError, SimResult};

/// Fluent builder for [`AgentSim<E>`].
///
/// # Required inputs
///
/// - `E: SpatialEnvironment` — the floor
/// - [`Scenario`] — from [`ped_scenario::ScenarioBuilder`]
///
/// # Optional inputs (have defaults)
///
/// | Method                | Default                                         |
/// |-----------------------|-------------------------------------------------|
/// | `.config(c)`          | `SimConfig::default()` (Δt 0.1 s, 1 h, seed 42) |
/// | `.motion(p)`          | `MotionParams::default()`                       |
/// | `.vision(v)`          | `VisionParams::default()` (60° half-angle)      |
/// | `.initial_state(s)`   | At rest on the first main station's pose        |
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(floor, scenario)
///     .config(SimConfig { duration_secs: 1_800.0, ..SimConfig::default() })
///     .build()?;
/// sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder<E: SpatialEnvironment> {
    env:      E,
    scenario: Scenario,
    config:   SimConfig,
    motion:   MotionParams,
    vision:   VisionParams,
    initial:  Option<AgentState>,
}

impl<E: SpatialEnvironment> SimBuilder<E> {
    pub fn new(env: E, scenario: Scenario) -> Self {
        Self {
            env,
            scenario,
            config:  SimConfig::default(),
            motion:  MotionParams::default(),
            vision:  VisionParams::default(),
            initial: None,
        }
    }

    pub fn config(mut self, config: SimConfig) -> Self {
        self.config = config;
        self
    }

    pub fn motion(mut self, motion: MotionParams) -> Self {
        self.motion = motion;
        self
    }

    pub fn vision(mut self, vision: VisionParams) -> Self {
        self.vision = vision;
        self
    }

    pub fn initial_state(mut self, state: AgentState) -> Self {
        self.initial = Some(state);
        self
    }

    /// Validate every configuration block and assemble the simulation.
    ///
    /// The scenario's first occurrences are sampled here, at time zero, from
    /// the run's RNG.
    ///
    /// # Errors
    /// - [`SimError::Config`] for an invalid [`SimConfig`] or a non-finite
    ///   initial state.
    /// - [`SimError::Motion`] / [`SimError::Behavior`] for invalid motion or
    ///   vision parameters.
    /// - [`SimError::OutsideFloor`] when the agent does not start on a cell.
    pub fn build(self) -> SimResult<AgentSim<E>> {
        self.config.validate().map_err(|e| SimError::Config(e.to_string()))?;
        let integrator = KinematicIntegrator::new(self.motion)?;
        let detector = VisualTriggerDetector::new(&self.vision)?;

        let state = match self.initial {
            Some(state) => state,
            None => {
                let station = self
                    .scenario
                    .main_stations()
                    .first()
                    .copied()
                    .ok_or(ScenarioError::NoMainStation)?;
                let pose = self.scenario.activity(station).default_pose();
                AgentState::at_rest(pose.location, pose.direction)
            }
        };
        if !(state.location.is_finite() && state.velocity.is_finite() && state.direction.is_finite())
        {
            return Err(SimError::Config(format!("initial state is not finite: {state:?}")));
        }
        if self.env.cell_at(state.location).is_none() {
            return Err(SimError::OutsideFloor { location: state.location });
        }

        let mut rng = SimRng::new(self.config.seed);
        let mut scheduler = ScenarioScheduler::new(self.scenario, detector, &state);
        scheduler.start(SimTime::ZERO, &mut rng);
        debug!(
            seed = self.config.seed,
            ticks = self.config.total_ticks(),
            target = scheduler.target().name(),
            "simulation assembled"
        );

        Ok(AgentSim {
            env: self.env,
            state,
            integrator,
            scheduler,
            rng,
            clock: self.config.make_clock(),
            config: self.config,
        })
    }
}
