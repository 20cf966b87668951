//! `ScenarioScheduler` — the engagement state machine.
//!
//! ```text
//!            due work                     ready to stop
//!   Free ───────────────▶ WalkingInSequence ─────────────▶ Engaged
//!    ▲                          ▲                            │
//!    │                          └──── more activities ───────┤ dwell over
//!    └──────────── nothing due ◀── sequence finished ────────┘
//! ```
//!
//! "Due work" is a pending partial sequence, or an expected entry whose time
//! has come.

use tracing::{debug, warn};

use ped_core::{ActivityId, AgentEngagementStatus, AgentState, PhysicalMovementMode, SimRng, SimTime};
use ped_motion::{ready_to_stop, MotionParams};
use ped_scenario::{Activity, ActiveSequence, PartialSequence, Priority, Scenario};
use ped_spatial::SpatialEnvironment;

use crate::{Detection, DetectionStats, VisualTriggerDetector};

/// What one [`ScenarioScheduler::update`] did.
#[derive(Clone, Debug, Default)]
pub struct TickOutcome {
    pub detections:  Vec<Detection>,
    /// The current sequence was cut short and parked as a partial.
    pub interrupted: bool,
}

pub struct ScenarioScheduler {
    scenario:      Scenario,
    detector:      VisualTriggerDetector,
    stats:         DetectionStats,
    status:        AgentEngagementStatus,
    mode:          PhysicalMovementMode,
    active:        Option<ActiveSequence>,
    /// Index of the current activity within the active sequence.
    step:          usize,
    current:       ActivityId,
    engaged_until: SimTime,
}

impl ScenarioScheduler {
    /// A Free scheduler heading for the main station nearest `state`.
    ///
    /// Call [`start`](Self::start) before the first tick to seed the queue.
    pub fn new(scenario: Scenario, detector: VisualTriggerDetector, state: &AgentState) -> Self {
        let current = scenario.nearest_main_station(state.location);
        Self {
            scenario,
            detector,
            stats: DetectionStats::new(),
            status: AgentEngagementStatus::Free,
            mode: PhysicalMovementMode::Move,
            active: None,
            step: 0,
            current,
            engaged_until: SimTime::ZERO,
        }
    }

    /// Schedule every sequence's first occurrence.
    pub fn start(&mut self, now: SimTime, rng: &mut SimRng) {
        self.scenario.start(now, rng);
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn status(&self) -> AgentEngagementStatus {
        self.status
    }

    pub fn mode(&self) -> PhysicalMovementMode {
        self.mode
    }

    pub fn current_activity(&self) -> ActivityId {
        self.current
    }

    /// The activity the integrator should steer toward.
    pub fn target(&self) -> &Activity {
        self.scenario.activity(self.current)
    }

    pub fn active(&self) -> Option<&ActiveSequence> {
        self.active.as_ref()
    }

    pub fn engaged_until(&self) -> SimTime {
        self.engaged_until
    }

    pub fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    pub fn scenario_mut(&mut self) -> &mut Scenario {
        &mut self.scenario
    }

    pub fn detection_stats(&self) -> &DetectionStats {
        &self.stats
    }

    pub fn detector(&self) -> &VisualTriggerDetector {
        &self.detector
    }

    // ── Tick ──────────────────────────────────────────────────────────────

    /// Run detection, interruption and the state machine for the tick that
    /// just ended at `now`.
    pub fn update<E>(
        &mut self,
        now:    SimTime,
        state:  &AgentState,
        env:    &E,
        params: &MotionParams,
        rng:    &mut SimRng,
    ) -> TickOutcome
    where
        E: SpatialEnvironment + ?Sized,
    {
        let detections = self.detector.detect(now, state, env, &mut self.scenario);
        for d in &detections {
            self.stats.record(d.sequence, d.delay_secs);
        }

        if !detections.is_empty() && self.interruptible() {
            self.park_remainder(now, rng);
            self.begin_next(now);
            return TickOutcome { detections, interrupted: true };
        }

        match self.status {
            AgentEngagementStatus::Free => {
                if self.is_due(now) {
                    self.begin_next(now);
                } else if self.mode == PhysicalMovementMode::Move
                    && ready_to_stop(state, self.target(), params)
                {
                    self.mode = PhysicalMovementMode::StopAndOrient;
                }
            }
            AgentEngagementStatus::WalkingInSequence => {
                self.mode = PhysicalMovementMode::Move;
                if ready_to_stop(state, self.target(), params) {
                    let dwell = self.target().engagement().sample(rng);
                    self.engaged_until = now + dwell;
                    self.status = AgentEngagementStatus::Engaged;
                    self.mode = PhysicalMovementMode::StopAndOrient;
                    debug!(activity = self.target().name(), dwell, "engaged");
                }
            }
            AgentEngagementStatus::Engaged => {
                if now >= self.engaged_until {
                    self.step += 1;
                    let next = self.active_activities().get(self.step).copied();
                    match next {
                        Some(next) => {
                            self.current = next;
                            self.status = AgentEngagementStatus::WalkingInSequence;
                            self.mode = PhysicalMovementMode::Move;
                        }
                        None => self.finish(now, state, rng),
                    }
                }
            }
        }

        TickOutcome { detections, interrupted: false }
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn interruptible(&self) -> bool {
        self.status != AgentEngagementStatus::Free
            && self.active.as_ref().is_some_and(|a| a.priority() != Priority::Urgent)
    }

    fn active_activities(&self) -> &[ActivityId] {
        match &self.active {
            Some(active) => self.activities_of(active),
            None => &[],
        }
    }

    fn activities_of<'a>(&'a self, active: &'a ActiveSequence) -> &'a [ActivityId] {
        match active {
            ActiveSequence::Regular(id) | ActiveSequence::Urgent(id) => {
                self.scenario.sequence(*id).activities()
            }
            ActiveSequence::Partial(p) => &p.remainder,
        }
    }

    fn is_due(&self, now: SimTime) -> bool {
        self.scenario.has_partial()
            || self.scenario.queue.earliest_expected().is_some_and(|(t, _)| t <= now)
    }

    /// Save the not-yet-finished tail of the active sequence (the current
    /// activity included) into the partial slot.
    fn park_remainder(&mut self, now: SimTime, rng: &mut SimRng) {
        let Some(active) = self.active.take() else {
            return;
        };
        let remainder = self
            .activities_of(&active)
            .get(self.step..)
            .map(<[ActivityId]>::to_vec)
            .unwrap_or_default();
        if remainder.is_empty() {
            self.scenario.reactivate(active.original(), now, rng);
            return;
        }
        let partial = PartialSequence { remainder, original: active.original() };
        debug!(
            sequence = self.scenario.sequence(partial.original).name(),
            left = partial.remainder.len(),
            "sequence interrupted"
        );
        if let Some(displaced) = self.scenario.set_partial(partial) {
            warn!(
                sequence = self.scenario.sequence(displaced.original).name(),
                "partial slot overwritten, rescheduling its sequence"
            );
            self.scenario.reactivate(displaced.original, now, rng);
        }
    }

    /// Load the next piece of work.  Returns `false` when nothing is due.
    ///
    /// A pending partial wins unless the front of the expected queue is a
    /// due urgent sequence.
    fn begin_next(&mut self, now: SimTime) -> bool {
        let front = self.scenario.queue.earliest_expected().filter(|(t, _)| *t <= now);
        let urgent_due = front
            .is_some_and(|(_, id)| self.scenario.sequence(id).priority() == Priority::Urgent);

        if !urgent_due {
            if let Some(partial) = self.scenario.take_partial() {
                self.load(ActiveSequence::Partial(partial));
                return true;
            }
        }
        if front.is_none() {
            return false;
        }
        let Some((_, id)) = self.scenario.queue.pop_expected() else {
            return false;
        };
        let active = ActiveSequence::whole(id, self.scenario.sequence(id));
        self.load(active);
        true
    }

    fn load(&mut self, active: ActiveSequence) {
        self.step = 0;
        self.active = Some(active);
        if let Some(first) = self.active_activities().first().copied() {
            self.current = first;
        }
        self.status = AgentEngagementStatus::WalkingInSequence;
        self.mode = PhysicalMovementMode::Move;
        if let Some(active) = &self.active {
            debug!(
                sequence = self.scenario.sequence(active.original()).name(),
                priority = active.priority().as_str(),
                "sequence started"
            );
        }
    }

    fn finish(&mut self, now: SimTime, state: &AgentState, rng: &mut SimRng) {
        if let Some(active) = self.active.take() {
            self.scenario.reactivate(active.original(), now, rng);
            if active.priority() == Priority::Partial {
                self.scenario.clear_partial();
            }
            debug!(sequence = self.scenario.sequence(active.original()).name(), "sequence finished");
        }
        if self.is_due(now) && self.begin_next(now) {
            return;
        }
        self.status = AgentEngagementStatus::Free;
        self.mode = PhysicalMovementMode::Move;
        self.current = self.scenario.nearest_main_station(state.location);
    }
}
