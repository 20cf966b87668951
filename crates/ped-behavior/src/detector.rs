//! Visual trigger detection.

use tracing::debug;

use ped_core::{AgentState, SequenceId, SimTime};
use ped_scenario::Scenario;
use ped_spatial::SpatialEnvironment;

use crate::{BehaviorError, BehaviorResult};

/// Field-of-view configuration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct VisionParams {
    /// Half the opening angle of the view cone, radians, in `(0, π]`.
    pub half_angle_rad: f64,
}

impl Default for VisionParams {
    fn default() -> Self {
        Self { half_angle_rad: std::f64::consts::FRAC_PI_3 }
    }
}

impl VisionParams {
    pub fn validate(&self) -> BehaviorResult<()> {
        let a = self.half_angle_rad;
        if !a.is_finite() || a <= 0.0 || a > std::f64::consts::PI {
            return Err(BehaviorError::Config(format!("half_angle_rad must lie in (0, π], got {a}")));
        }
        Ok(())
    }
}

/// A visually triggered sequence noticed this tick.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Detection {
    pub sequence:   SequenceId,
    /// When the sequence became discoverable.
    pub nominal:    SimTime,
    /// `now - nominal`.
    pub delay_secs: f64,
}

#[derive(Clone, Debug)]
pub struct VisualTriggerDetector {
    cosine_half_angle: f64,
}

impl VisualTriggerDetector {
    pub fn new(params: &VisionParams) -> BehaviorResult<Self> {
        params.validate()?;
        Ok(Self { cosine_half_angle: params.half_angle_rad.cos() })
    }

    pub fn cosine_half_angle(&self) -> f64 {
        self.cosine_half_angle
    }

    /// Move every due, visible unexpected sequence to the front of the
    /// expected queue.
    ///
    /// Candidates are re-filed latest-nominal first, each strictly before the
    /// current front, so the earliest-discoverable one ends up first in
    /// line.  Returned detections are ordered by nominal time.
    pub fn detect<E>(
        &self,
        now:      SimTime,
        state:    &AgentState,
        env:      &E,
        scenario: &mut Scenario,
    ) -> Vec<Detection>
    where
        E: SpatialEnvironment + ?Sized,
    {
        let mut seen: Vec<(SimTime, SequenceId)> = scenario
            .queue
            .unexpected()
            .filter(|(t, _)| *t <= now)
            .filter(|(_, id)| {
                scenario
                    .sequence(*id)
                    .visual_trigger()
                    .is_some_and(|region| env.field_of_view(state, self.cosine_half_angle, region))
            })
            .collect();
        if seen.is_empty() {
            return Vec::new();
        }
        seen.sort_unstable_by(|a, b| b.cmp(a));

        let mut detections = Vec::with_capacity(seen.len());
        for (nominal, sequence) in seen {
            scenario.queue.remove_unexpected(nominal);
            scenario.queue.push_before_earliest(now, sequence);
            let delay_secs = now - nominal;
            debug!(
                sequence = scenario.sequence(sequence).name(),
                delay_secs,
                "visual trigger detected"
            );
            detections.push(Detection { sequence, nominal, delay_secs });
        }
        detections.reverse();
        detections
    }
}
