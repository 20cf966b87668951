//! `ScenarioBuilder` — validated construction of a [`Scenario`].

use rustc_hash::FxHashMap;

use ped_core::{ActivityId, SequenceId};
use ped_spatial::Region;

use crate::{Activity, Scenario, ScenarioError, ScenarioResult, Sequence};

/// Collects activities and sequences, then checks them in [`build`](Self::build).
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use ped_core::{Pose, Vec2};
/// use ped_spatial::RadialField;
/// use ped_scenario::{Activity, EngagementBounds, ScenarioBuilder};
///
/// let station = |name: &str, x: f64| {
///     Activity::new(
///         name,
///         Pose::new(Vec2::new(x, 1.0), Vec2::new(0.0, 1.0)),
///         EngagementBounds::new(10.0, 20.0).unwrap(),
///         Arc::new(RadialField::new(Vec2::new(x, 1.0), 0.5)),
///     )
/// };
///
/// let mut builder = ScenarioBuilder::new();
/// builder.add_main_station(station("desk", 1.0)).unwrap();
/// builder.add_activity(station("printer", 4.0)).unwrap();
/// builder.add_sequence("print", &["printer", "desk"], 2.0, None).unwrap();
/// let scenario = builder.build().unwrap();
/// assert_eq!(scenario.sequence_count(), 1);
/// ```
#[derive(Default)]
pub struct ScenarioBuilder {
    activities:     Vec<Activity>,
    activity_index: FxHashMap<String, ActivityId>,
    main_stations:  Vec<ActivityId>,
    sequences:      Vec<Sequence>,
    sequence_index: FxHashMap<String, SequenceId>,
}

impl ScenarioBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_activity(&mut self, activity: Activity) -> ScenarioResult<ActivityId> {
        if self.activity_index.contains_key(activity.name()) {
            return Err(ScenarioError::DuplicateActivity(activity.name().to_owned()));
        }
        let id = ActivityId::try_from(self.activities.len())
            .map_err(|_| ScenarioError::Capacity("activities"))?;
        self.activity_index.insert(activity.name().to_owned(), id);
        self.activities.push(activity);
        Ok(id)
    }

    /// Register an activity the agent idles at when it has nothing to do.
    pub fn add_main_station(&mut self, activity: Activity) -> ScenarioResult<ActivityId> {
        let id = self.add_activity(activity)?;
        self.main_stations.push(id);
        Ok(id)
    }

    pub fn activity_id(&self, name: &str) -> Option<ActivityId> {
        self.activity_index.get(name).copied()
    }

    /// Register a sequence over previously added activities.
    ///
    /// `rate_per_hour` must be finite and positive.  A `Some` trigger makes
    /// the sequence visually triggered (urgent).
    pub fn add_sequence<S: AsRef<str>>(
        &mut self,
        name:          &str,
        activities:    &[S],
        rate_per_hour: f64,
        trigger:       Option<Region>,
    ) -> ScenarioResult<SequenceId> {
        if self.sequence_index.contains_key(name) {
            return Err(ScenarioError::DuplicateSequence(name.to_owned()));
        }
        if activities.is_empty() {
            return Err(ScenarioError::EmptySequence(name.to_owned()));
        }
        if !rate_per_hour.is_finite() || rate_per_hour <= 0.0 {
            return Err(ScenarioError::InvalidRate { name: name.to_owned(), rate: rate_per_hour });
        }
        let ids = activities
            .iter()
            .map(|a| {
                self.activity_id(a.as_ref())
                    .ok_or_else(|| ScenarioError::UnknownActivity(a.as_ref().to_owned()))
            })
            .collect::<ScenarioResult<Vec<_>>>()?;

        let id = SequenceId::try_from(self.sequences.len())
            .map_err(|_| ScenarioError::Capacity("sequences"))?;
        self.sequence_index.insert(name.to_owned(), id);
        self.sequences.push(Sequence::new(name.to_owned(), ids, trigger, rate_per_hour));
        Ok(id)
    }

    pub fn build(self) -> ScenarioResult<Scenario> {
        if self.main_stations.is_empty() {
            return Err(ScenarioError::NoMainStation);
        }
        Ok(Scenario::new(
            self.activities,
            self.activity_index,
            self.main_stations,
            self.sequences,
            self.sequence_index,
        ))
    }
}
