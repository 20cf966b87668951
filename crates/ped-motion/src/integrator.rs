//! `KinematicIntegrator` — advance an [`AgentState`] by one fixed Δt.

use tracing::trace;

use ped_core::{AgentState, PhysicalMovementMode, Vec2};
use ped_scenario::Activity;
use ped_spatial::{BarrierProximity, SpatialEnvironment};

use crate::kinematics::{guaranteed_stop, slew_direction, stop_and_orient_velocity};
use crate::{barrier_repulsion, MotionError, MotionParams, MotionResult};

/// Remaining time below which a Δt counts as fully consumed.
const MIN_SUB_STEP_SECS: f64 = 1e-9;

/// What the agent is heading for and how.
#[derive(Copy, Clone, Debug)]
pub struct Target<'a> {
    pub activity: &'a Activity,
    pub mode:     PhysicalMovementMode,
}

/// Bookkeeping for one [`KinematicIntegrator::advance`] call.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct StepReport {
    pub sub_steps:  u32,
    pub collisions: u32,
}

/// Result of one sub-step.
struct SubStep {
    consumed: f64,
    collided: bool,
}

/// Explicit-Euler integrator with barrier repulsion and collision response.
///
/// Keeps the barrier proximity of the agent's current location between
/// calls; [`reset`](Self::reset) it whenever the state is moved by anything
/// other than this integrator.
#[derive(Clone, Debug)]
pub struct KinematicIntegrator {
    params:    MotionParams,
    proximity: Option<BarrierProximity>,
}

impl KinematicIntegrator {
    pub fn new(params: MotionParams) -> MotionResult<Self> {
        params.validate()?;
        Ok(Self { params, proximity: None })
    }

    pub fn params(&self) -> &MotionParams {
        &self.params
    }

    /// The cached proximity of the current location, if any.
    pub fn proximity(&self) -> Option<BarrierProximity> {
        self.proximity
    }

    pub fn reset(&mut self) {
        self.proximity = None;
    }

    /// Advance `state` by exactly `dt` seconds.
    ///
    /// A collision splits the step: the part up to contact is integrated,
    /// the response applied, and the remainder integrated from the contact
    /// point.  Because the cached distance is snapped to half a body after a
    /// contact, the sub-step following a collision cannot collide again, so
    /// the loop always terminates.  An overlap that does not come from a
    /// fresh approach is resolved by pushing the body back out instead.
    ///
    /// # Errors
    /// [`MotionError::MissingCollisionInfo`], [`MotionError::MissingContact`]
    /// and [`MotionError::TimeFractionOutOfRange`] are fatal: the environment
    /// and the agent no longer agree on the geometry.
    pub fn advance<E>(
        &mut self,
        state:  &mut AgentState,
        target: Target<'_>,
        env:    &E,
        dt:     f64,
    ) -> MotionResult<StepReport>
    where
        E: SpatialEnvironment + ?Sized,
    {
        let mut report = StepReport::default();
        let mut remaining = dt;
        while remaining > MIN_SUB_STEP_SECS {
            let after_contact = report.collisions > 0;
            let sub = self.time_step_update(state, &target, env, remaining, after_contact)?;
            remaining -= sub.consumed;
            report.sub_steps += 1;
            if sub.collided {
                report.collisions += 1;
            }
        }
        Ok(report)
    }

    fn time_step_update<E>(
        &mut self,
        state:         &mut AgentState,
        target:        &Target<'_>,
        env:           &E,
        dt:            f64,
        after_contact: bool,
    ) -> MotionResult<SubStep>
    where
        E: SpatialEnvironment + ?Sized,
    {
        let p = &self.params;
        let prev = *state;

        // ── 1. Steering ───────────────────────────────────────────────────
        let steer = target
            .activity
            .gradient(prev.location)
            .and_then(Vec2::normalized)
            .unwrap_or(prev.direction);

        // ── 2. Barrier repulsion ──────────────────────────────────────────
        let proximity = self.proximity.or_else(|| env.nearest_barrier(prev.location));
        let repulsion = proximity
            .filter(|b| b.normal.dot(prev.direction) < 0.0)
            .map(|b| b.normal * barrier_repulsion(b.distance, p.repulsion_range, p.max_repulsion))
            .unwrap_or(Vec2::ZERO);

        // ── 3. Mode-dependent acceleration ────────────────────────────────
        let (velocity, facing_goal, accel) = match target.mode {
            PhysicalMovementMode::Move => {
                let accel = steer * p.acceleration + repulsion;
                (prev.velocity + accel * dt, steer, accel)
            }
            PhysicalMovementMode::StopAndOrient => {
                let pose = target.activity.default_pose();
                let velocity = stop_and_orient_velocity(
                    prev.velocity,
                    prev.location,
                    pose.location,
                    p.acceleration,
                    dt,
                );
                let remaining = prev.location.distance(pose.location);
                let goal = if guaranteed_stop(prev.speed(), remaining, p.acceleration) {
                    pose.direction
                } else {
                    steer
                };
                (velocity, goal, (velocity - prev.velocity) / dt)
            }
        };

        // ── 4–6. Clamp, move, turn ────────────────────────────────────────
        let velocity = velocity.clamp_length(p.max_speed);
        *state = AgentState {
            location:  prev.location + velocity * dt,
            velocity,
            direction: slew_direction(prev.direction, facing_goal, p.angular_velocity * dt),
        };

        // ── 7. Collision detection ────────────────────────────────────────
        let next = env
            .nearest_barrier(state.location)
            .ok_or(MotionError::MissingCollisionInfo { location: state.location })?;

        let r = p.half_body();
        if next.distance >= r {
            self.proximity = Some(next);
            return Ok(SubStep { consumed: dt, collided: false });
        }

        // A body resting against a barrier sits at `r` give or take round-off
        // and still counts as clear.  Within the Δt of a contact it does not.
        let clear_above = if after_contact { r } else { r - p.collision_tolerance };
        let was_clear = proximity.is_none_or(|b| b.distance > clear_above);
        if !was_clear || next.distance >= r - p.collision_tolerance {
            self.settle_against(state, next, r);
            return Ok(SubStep { consumed: dt, collided: false });
        }

        let contact = env
            .segment_collision(&prev, state, r, p.collision_tolerance)
            .ok_or(MotionError::MissingContact { from: prev.location, to: state.location })?;
        if !(0.0..=1.0).contains(&contact.time_fraction) {
            return Err(MotionError::TimeFractionOutOfRange { fraction: contact.time_fraction });
        }

        // ── Collision response ────────────────────────────────────────────
        let consumed = dt * contact.time_fraction;
        let rest = dt - consumed;
        let n = contact.normal;

        let v = (prev.velocity + accel * consumed).clamp_length(p.max_speed);
        let vn_mag = v.dot(n);
        let mut vn = n * vn_mag;
        let mut vt = v - vn;
        if vn_mag < 0.0 {
            vn = vn * -p.elasticity;
        }
        let vt_len = vt.length();
        if vt_len > 0.0 {
            let reduction = (p.friction * vn_mag.abs()).min(vt_len);
            vt = vt * ((vt_len - reduction) / vt_len);
        }
        let mut v = vn + vt;
        let an = accel.dot(n);
        if an < 0.0 {
            v -= n * (an * rest);
        }
        let velocity = v.clamp_length(p.max_speed);

        trace!(
            x = contact.point.x,
            y = contact.point.y,
            fraction = contact.time_fraction,
            speed = velocity.length(),
            "barrier contact"
        );

        self.proximity = Some(BarrierProximity { distance: r, normal: n });
        *state = AgentState {
            location:  contact.point,
            velocity,
            direction: slew_direction(prev.direction, facing_goal, p.angular_velocity * consumed),
        };
        Ok(SubStep { consumed, collided: true })
    }

    /// Push an overlapping body back out to half a body from the barrier and
    /// drop the velocity component pointing into it.
    fn settle_against(&mut self, state: &mut AgentState, barrier: BarrierProximity, r: f64) {
        let n = barrier.normal;
        state.location += n * (r - barrier.distance);
        let vn = state.velocity.dot(n);
        if vn < 0.0 {
            state.velocity -= n * vn;
        }
        self.proximity = Some(BarrierProximity { distance: r, normal: n });
    }
}
