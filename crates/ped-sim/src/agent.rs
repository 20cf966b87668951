//! `AgentSim` — the integrator and the scenario scheduler on one clock.

use ped_behavior::{ScenarioScheduler, TickOutcome};
use ped_core::{
    AgentEngagementStatus, AgentState, PhysicalMovementMode, SimClock, SimConfig, SimRng, SimTime,
};
use ped_motion::{KinematicIntegrator, StepReport, Target};
use ped_spatial::SpatialEnvironment;

use crate::observer::ProgressTracker;
use crate::{SimObserver, SimResult};

/// What happened during one whole Δt.
#[derive(Clone, Debug)]
pub struct TickReport {
    /// Time at the end of the tick.
    pub time:     SimTime,
    /// Straight-line distance between the start and end locations.
    pub distance: f64,
    /// Status held while the tick elapsed (before the scheduler ran).
    pub status:   AgentEngagementStatus,
    /// Mode the integrator ran in.
    pub mode:     PhysicalMovementMode,
    pub step:     StepReport,
    pub outcome:  TickOutcome,
}

/// A single pedestrian walking a scenario on a floor.
///
/// Construct with [`SimBuilder`](crate::SimBuilder).  Each [`tick`](Self::tick)
/// integrates one Δt toward the scheduler's current target, advances the
/// clock, then lets the scheduler react to the new state.
pub struct AgentSim<E: SpatialEnvironment> {
    pub(crate) env:        E,
    pub(crate) state:      AgentState,
    pub(crate) integrator: KinematicIntegrator,
    pub(crate) scheduler:  ScenarioScheduler,
    pub(crate) rng:        SimRng,
    pub(crate) clock:      SimClock,
    pub(crate) config:     SimConfig,
}

impl<E: SpatialEnvironment> AgentSim<E> {
    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn env(&self) -> &E {
        &self.env
    }

    pub fn state(&self) -> &AgentState {
        &self.state
    }

    pub fn scheduler(&self) -> &ScenarioScheduler {
        &self.scheduler
    }

    pub fn integrator(&self) -> &KinematicIntegrator {
        &self.integrator
    }

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn now(&self) -> SimTime {
        self.clock.now()
    }

    /// `true` once the configured duration has been simulated.
    pub fn is_finished(&self) -> bool {
        self.clock.ticks >= self.config.total_ticks()
    }

    // ── Stepping ──────────────────────────────────────────────────────────

    /// Advance the simulation by one whole Δt.
    ///
    /// # Errors
    /// Integration failures are fatal; the state is left as it was at the
    /// failing sub-step and the run should be abandoned.
    pub fn tick(&mut self) -> SimResult<TickReport> {
        let status = self.scheduler.status();
        let mode = self.scheduler.mode();
        let before = self.state.location;

        let target = Target { activity: self.scheduler.target(), mode };
        let step = self.integrator.advance(
            &mut self.state,
            target,
            &self.env,
            self.clock.time_step_secs,
        )?;

        self.clock.advance();
        let now = self.clock.now();
        let outcome = self.scheduler.update(
            now,
            &self.state,
            &self.env,
            self.integrator.params(),
            &mut self.rng,
        );

        Ok(TickReport {
            time: now,
            distance: self.state.location.distance(before),
            status,
            mode,
            step,
            outcome,
        })
    }

    /// Run to the configured duration with no per-tick work beyond the
    /// observer.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        self.run_with(observer, |_, _| Ok(()))
    }

    /// Run to the configured duration, calling `on_tick` after every tick.
    ///
    /// Progress is reported at whole-percent boundaries of the remaining
    /// run, so a sim resumed half way reports from 1 % again.
    pub fn run_with<O, F>(&mut self, observer: &mut O, mut on_tick: F) -> SimResult<()>
    where
        O: SimObserver,
        F: FnMut(&Self, &TickReport) -> SimResult<()>,
    {
        let first = self.clock.ticks;
        let mut progress = ProgressTracker::new(self.config.total_ticks().saturating_sub(first));

        while !self.is_finished() {
            let report = self.tick()?;
            observer.on_tick_end(report.time, &self.state, report.status);
            on_tick(&*self, &report)?;
            for percent in progress.advance(self.clock.ticks - first) {
                observer.on_progress(percent);
            }
        }

        observer.on_sim_end(self.clock.now());
        Ok(())
    }
}
