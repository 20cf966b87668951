//! Pure kinematic helpers shared by the integrator and the scheduler.

use ped_core::{AgentState, Vec2};
use ped_scenario::Activity;

use crate::MotionParams;

/// Slack on the guaranteed-stop test so an agent resting on its pose still
/// counts as stopped.
pub const STOP_TOLERANCE: f64 = 1e-9;

/// Below this distance the agent is treated as standing on its destination.
const ARRIVAL_EPSILON: f64 = 1e-6;

/// Rotate `current` toward `target` by at most `max_angle` radians.
///
/// Returns a unit vector.  A degenerate `target` leaves the heading as is.
pub fn slew_direction(current: Vec2, target: Vec2, max_angle: f64) -> Vec2 {
    let Some(target) = target.normalized() else {
        return current;
    };
    let Some(current) = current.normalized() else {
        return target;
    };
    let angle = current.angle_to(target);
    if angle.abs() <= max_angle {
        target
    } else {
        current.rotated(max_angle.copysign(angle))
    }
}

/// Stop-and-orient velocity law.
///
/// Splits `velocity` into a component toward `destination` (x) and one
/// perpendicular to it (y).  The y component is cancelled first at full
/// `acceleration`; whatever time is left is spent on x, braking when the
/// stopping distance already covers the remaining distance and accelerating
/// toward the destination otherwise.  The x speed never exceeds what can
/// still be braked away, nor what would overshoot within `dt`.
pub fn stop_and_orient_velocity(
    velocity:     Vec2,
    location:     Vec2,
    destination:  Vec2,
    acceleration: f64,
    dt:           f64,
) -> Vec2 {
    let offset = destination - location;
    let distance = offset.length();
    let Some(ex) = offset.normalized().filter(|_| distance > ARRIVAL_EPSILON) else {
        // The x speed is capped to land exactly on the destination, so
        // arriving means stopping.
        return Vec2::ZERO;
    };
    let ey = ex.perp();

    let mut vx = velocity.dot(ex);
    let mut vy = velocity.dot(ey);

    let budget = acceleration * dt;
    if vy.abs() >= budget {
        vy -= budget.copysign(vy);
        return ex * vx + ey * vy;
    }

    let rest = dt - vy.abs() / acceleration;
    vy = 0.0;
    let dv = acceleration * rest;

    if vx > 0.0 && vx * vx >= 2.0 * acceleration * distance {
        vx = (vx - dv).max(0.0).min(distance / dt);
    } else {
        let cap = (2.0 * acceleration * distance).sqrt().min(distance / dt);
        vx = (vx + dv).min(cap);
    }
    ex * vx + ey * vy
}

/// `true` when an agent moving at `speed` can still come to rest within
/// `distance` at `acceleration` (|v|² ≤ 2·a·d).
#[inline]
pub fn guaranteed_stop(speed: f64, distance: f64, acceleration: f64) -> bool {
    speed * speed <= 2.0 * acceleration * distance + STOP_TOLERANCE
}

/// `true` once the agent should switch from walking to stop-and-orient.
///
/// The agent must be inside the activity's region and either need to brake
/// now to halt on the pose, or already be within half a body of it.
pub fn ready_to_stop(state: &AgentState, activity: &Activity, params: &MotionParams) -> bool {
    if !activity.contains(state.location) {
        return false;
    }
    let distance = state.location.distance(activity.default_pose().location);
    let speed_sq = state.velocity.length_squared();
    speed_sq >= 2.0 * params.acceleration * distance || distance < params.half_body()
}
