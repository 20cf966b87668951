//! `Trainer` — the integrator walking to one fixed activity, no scheduler.
//!
//! Used to calibrate motion parameters: how long does a walk from A to B
//! take, how far does the agent actually travel, where does it come to rest.

use ped_core::{AgentState, PhysicalMovementMode, SimClock};
use ped_motion::{KinematicIntegrator, MotionParams, Target, ready_to_stop};
use ped_scenario::Activity;
use ped_spatial::SpatialEnvironment;
use tracing::info;

use crate::{SimError, SimResult};

/// Below this speed an agent in StopAndOrient on its pose counts as arrived.
pub const REST_SPEED: f64 = 1e-3;

/// Result of a training walk.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TrainingOutcome {
    /// Seconds from start to arrival; `None` when the time limit ran out.
    pub arrival_secs:      Option<f64>,
    pub walked_distance_m: f64,
    pub final_state:       AgentState,
    pub ticks:             u64,
}

impl TrainingOutcome {
    pub fn arrived(&self) -> bool {
        self.arrival_secs.is_some()
    }
}

/// Drives a [`KinematicIntegrator`] toward a single activity.
///
/// Walks in Move mode and switches, once and for good, to StopAndOrient
/// when the proximity test passes.
pub struct Trainer<'a, E: SpatialEnvironment + ?Sized> {
    env:        &'a E,
    activity:   &'a Activity,
    integrator: KinematicIntegrator,
    state:      AgentState,
    mode:       PhysicalMovementMode,
    clock:      SimClock,
    walked:     f64,
}

impl<'a, E: SpatialEnvironment + ?Sized> Trainer<'a, E> {
    pub fn new(
        env:            &'a E,
        activity:       &'a Activity,
        params:         MotionParams,
        start:          AgentState,
        time_step_secs: f64,
    ) -> SimResult<Self> {
        if !(time_step_secs.is_finite() && time_step_secs > 0.0) {
            return Err(SimError::Config(format!(
                "time_step_secs must be positive, got {time_step_secs}"
            )));
        }
        if env.cell_at(start.location).is_none() {
            return Err(SimError::OutsideFloor { location: start.location });
        }
        Ok(Self {
            env,
            activity,
            integrator: KinematicIntegrator::new(params)?,
            state: start,
            mode: PhysicalMovementMode::Move,
            clock: SimClock::new(time_step_secs),
            walked: 0.0,
        })
    }

    pub fn state(&self) -> &AgentState {
        &self.state
    }

    pub fn mode(&self) -> PhysicalMovementMode {
        self.mode
    }

    /// One whole Δt.  Returns the distance covered.
    pub fn step(&mut self) -> SimResult<f64> {
        let before = self.state.location;
        let target = Target { activity: self.activity, mode: self.mode };
        self.integrator
            .advance(&mut self.state, target, self.env, self.clock.time_step_secs)?;
        self.clock.advance();

        if self.mode == PhysicalMovementMode::Move
            && ready_to_stop(&self.state, self.activity, self.integrator.params())
        {
            self.mode = PhysicalMovementMode::StopAndOrient;
        }

        let distance = self.state.location.distance(before);
        self.walked += distance;
        Ok(distance)
    }

    /// At rest on the activity's pose.
    pub fn has_arrived(&self) -> bool {
        self.mode == PhysicalMovementMode::StopAndOrient
            && self.state.speed() < REST_SPEED
            && self.state.location.distance(self.activity.default_pose().location)
                < self.integrator.params().half_body()
    }

    /// Step until arrival or until `max_secs` of simulated time.
    pub fn run(&mut self, max_secs: f64) -> SimResult<TrainingOutcome> {
        let limit = (max_secs / self.clock.time_step_secs).ceil() as u64;
        let mut arrival_secs = None;
        while self.clock.ticks < limit {
            self.step()?;
            if self.has_arrived() {
                arrival_secs = Some(self.clock.now().secs());
                break;
            }
        }

        info!(
            activity = self.activity.name(),
            arrived = arrival_secs.is_some(),
            walked_m = self.walked,
            "training walk finished"
        );
        Ok(TrainingOutcome {
            arrival_secs,
            walked_distance_m: self.walked,
            final_state: self.state,
            ticks: self.clock.ticks,
        })
    }
}
