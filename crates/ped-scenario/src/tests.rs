//! Unit tests for ped-scenario.

use std::sync::Arc;

use ped_core::{Pose, Vec2};
use ped_spatial::RadialField;

use crate::{Activity, EngagementBounds, Scenario, ScenarioBuilder};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn station(name: &str, x: f64, y: f64) -> Activity {
    Activity::new(
        name,
        Pose::new(Vec2::new(x, y), Vec2::new(0.0, 1.0)),
        EngagementBounds::new(5.0, 10.0).unwrap(),
        Arc::new(RadialField::new(Vec2::new(x, y), 0.5)),
    )
}

/// Two main stations, two auxiliary activities, one regular sequence.
fn office() -> ScenarioBuilder {
    let mut b = ScenarioBuilder::new();
    b.add_main_station(station("desk_a", 1.0, 1.0)).unwrap();
    b.add_main_station(station("desk_b", 8.0, 1.0)).unwrap();
    b.add_activity(station("printer", 4.0, 4.0)).unwrap();
    b.add_activity(station("kitchen", 6.0, 5.0)).unwrap();
    b.add_sequence("print", &["printer", "desk_a"], 2.0, None).unwrap();
    b
}

// ── EngagementBounds ──────────────────────────────────────────────────────────

#[cfg(test)]
mod engagement {
    use ped_core::SimRng;

    use crate::{EngagementBounds, ScenarioError};

    #[test]
    fn rejects_inverted_bounds() {
        assert!(matches!(
            EngagementBounds::new(10.0, 5.0),
            Err(ScenarioError::InvalidEngagementBounds { .. })
        ));
        assert!(EngagementBounds::new(5.0, 5.0).is_err());
        assert!(EngagementBounds::new(-1.0, 5.0).is_err());
        assert!(EngagementBounds::new(1.0, f64::INFINITY).is_err());
    }

    #[test]
    fn invalid_writes_keep_previous_value() {
        let mut b = EngagementBounds::new(5.0, 10.0).unwrap();
        assert!(b.set_min(12.0).is_err());
        assert_eq!(b.min_secs(), 5.0);
        assert!(b.set_max(4.0).is_err());
        assert_eq!(b.max_secs(), 10.0);

        b.set_max(30.0).unwrap();
        b.set_min(20.0).unwrap();
        assert_eq!((b.min_secs(), b.max_secs()), (20.0, 30.0));
    }

    #[test]
    fn samples_stay_in_range() {
        let b = EngagementBounds::new(2.0, 3.0).unwrap();
        let mut rng = SimRng::new(7);
        for _ in 0..1_000 {
            let s = b.sample(&mut rng);
            assert!((2.0..3.0).contains(&s));
        }
    }
}

// ── TaskQueue ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod task_queue {
    use ped_core::{SequenceId, SimTime};

    use crate::task_queue::{KEY_NUDGE_SECS, MAX_KEY_SECS};
    use crate::TaskQueue;

    #[test]
    fn expected_pops_in_time_order() {
        let mut q = TaskQueue::new();
        q.push_expected(SimTime(30.0), SequenceId(2));
        q.push_expected(SimTime(10.0), SequenceId(0));
        q.push_expected(SimTime(20.0), SequenceId(1));

        let order: Vec<_> = std::iter::from_fn(|| q.pop_expected()).map(|(_, s)| s).collect();
        assert_eq!(order, vec![SequenceId(0), SequenceId(1), SequenceId(2)]);
        assert!(q.is_empty());
    }

    #[test]
    fn colliding_keys_are_nudged_not_dropped() {
        let mut q = TaskQueue::new();
        let a = q.push_expected(SimTime(5.0), SequenceId(0));
        let b = q.push_expected(SimTime(5.0), SequenceId(1));
        assert_eq!(a, SimTime(5.0));
        assert!(b > a);
        assert!((b - a - KEY_NUDGE_SECS).abs() < 1e-12);
        assert_eq!(q.expected_len(), 2);

        let c = q.push_unexpected(SimTime(1.0), SequenceId(2));
        let d = q.push_unexpected(SimTime(1.0), SequenceId(3));
        assert_ne!(c, d);
        assert_eq!(q.unexpected_len(), 2);
    }

    #[test]
    fn push_before_earliest_jumps_the_line() {
        let mut q = TaskQueue::new();
        q.push_expected(SimTime(2.0), SequenceId(0));
        q.push_expected(SimTime(50.0), SequenceId(1));

        // Earliest (2.0) is already overdue at now = 10.
        q.push_before_earliest(SimTime(10.0), SequenceId(7));
        assert_eq!(q.earliest_expected().unwrap().1, SequenceId(7));

        // With nothing overdue the key lands just before now.
        let mut q = TaskQueue::new();
        q.push_expected(SimTime(50.0), SequenceId(1));
        let key = q.push_before_earliest(SimTime(10.0), SequenceId(7));
        assert!(key < SimTime(10.0));
        assert_eq!(q.earliest_expected().unwrap().1, SequenceId(7));
    }

    #[test]
    fn repeated_front_inserts_keep_lifo_order() {
        let mut q = TaskQueue::new();
        q.push_before_earliest(SimTime(10.0), SequenceId(0));
        q.push_before_earliest(SimTime(10.0), SequenceId(1));
        assert_eq!(q.pop_expected().unwrap().1, SequenceId(1));
        assert_eq!(q.pop_expected().unwrap().1, SequenceId(0));
    }

    #[test]
    fn remove_unexpected_by_key() {
        let mut q = TaskQueue::new();
        let key = q.push_unexpected(SimTime(3.0), SequenceId(4));
        assert!(q.contains(SequenceId(4)));
        assert_eq!(q.remove_unexpected(key), Some(SequenceId(4)));
        assert!(!q.contains(SequenceId(4)));
        assert_eq!(q.remove_unexpected(key), None);
    }

    #[test]
    fn far_future_keys_are_clamped_and_still_nudged() {
        let mut q = TaskQueue::new();
        let a = q.push_expected(SimTime(f64::INFINITY), SequenceId(0));
        let b = q.push_expected(SimTime(1e300), SequenceId(1));
        assert_eq!(a, SimTime(MAX_KEY_SECS));
        assert!(b > a && b.secs().is_finite());
        assert_eq!(q.expected_len(), 2);

        let c = q.push_unexpected(SimTime(f64::NAN), SequenceId(2));
        let d = q.push_unexpected(SimTime(f64::INFINITY), SequenceId(3));
        assert_eq!(c, SimTime(MAX_KEY_SECS));
        assert!(d > c && d.secs().is_finite());
        assert_eq!(q.unexpected_len(), 2);
    }
}

// ── Sequences ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod sequences {
    use ped_core::{ActivityId, CellId, SequenceId};
    use ped_spatial::Region;

    use super::office;
    use crate::{ActiveSequence, PartialSequence, Priority};

    #[test]
    fn trigger_makes_sequence_urgent() {
        let mut b = office();
        let region: Region = [CellId(3)].into_iter().collect();
        let id = b.add_sequence("visitor", &["kitchen"], 1.0, Some(region)).unwrap();
        let scenario = b.build().unwrap();

        assert_eq!(scenario.sequence(SequenceId(0)).priority(), Priority::Regular);
        assert_eq!(scenario.sequence(id).priority(), Priority::Urgent);
        assert_eq!(
            ActiveSequence::whole(id, scenario.sequence(id)),
            ActiveSequence::Urgent(id)
        );
        assert_eq!(scenario.visual_sequence_count(), 1);
    }

    #[test]
    fn partial_reports_its_original() {
        let active = ActiveSequence::Partial(PartialSequence {
            remainder: vec![ActivityId(2)],
            original:  SequenceId(5),
        });
        assert_eq!(active.priority(), Priority::Partial);
        assert_eq!(active.original(), SequenceId(5));
    }
}

// ── Builder ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use super::{office, station};
    use crate::{ScenarioBuilder, ScenarioError};

    #[test]
    fn requires_a_main_station() {
        let mut b = ScenarioBuilder::new();
        b.add_activity(station("printer", 1.0, 1.0)).unwrap();
        assert!(matches!(b.build(), Err(ScenarioError::NoMainStation)));
    }

    #[test]
    fn rejects_bad_sequences() {
        let mut b = office();
        assert!(matches!(
            b.add_sequence("print", &["kitchen"], 1.0, None),
            Err(ScenarioError::DuplicateSequence(_))
        ));
        assert!(matches!(
            b.add_sequence("ghost", &["nowhere"], 1.0, None),
            Err(ScenarioError::UnknownActivity(_))
        ));
        assert!(matches!(
            b.add_sequence::<&str>("empty", &[], 1.0, None),
            Err(ScenarioError::EmptySequence(_))
        ));
        assert!(matches!(
            b.add_sequence("never", &["kitchen"], 0.0, None),
            Err(ScenarioError::InvalidRate { .. })
        ));
    }

    #[test]
    fn rejects_duplicate_activity() {
        let mut b = office();
        assert!(matches!(
            b.add_activity(station("printer", 0.0, 0.0)),
            Err(ScenarioError::DuplicateActivity(_))
        ));
    }
}

// ── Scenario ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod scenario {
    use ped_core::{CellId, SequenceId, SimRng, SimTime, Vec2};
    use ped_spatial::Region;

    use super::{office, Scenario};
    use crate::PartialSequence;

    fn with_visitor() -> Scenario {
        let mut b = office();
        let region: Region = [CellId(1)].into_iter().collect();
        b.add_sequence("visitor", &["kitchen", "desk_b"], 0.5, Some(region)).unwrap();
        b.build().unwrap()
    }

    #[test]
    fn start_files_each_sequence_in_its_container() {
        let mut s = with_visitor();
        let mut rng = SimRng::new(1);
        s.start(SimTime::ZERO, &mut rng);

        assert_eq!(s.queue.expected_len(), 1);
        assert_eq!(s.queue.unexpected_len(), 1);
        let visitor = s.sequence_id("visitor").unwrap();
        assert!(s.queue.unexpected().any(|(_, id)| id == visitor));
        assert!(s.queue.expected().all(|(t, _)| t > SimTime::ZERO));
    }

    #[test]
    fn reactivation_delay_matches_rate() {
        // Mean inter-arrival for 2 per hour is 1800 s.
        let mut s = office().build().unwrap();
        let mut rng = SimRng::new(99);
        let n = 4_000;
        let mut total = 0.0;
        for _ in 0..n {
            let at = s.reactivate(SequenceId(0), SimTime::ZERO, &mut rng);
            total += at.secs();
            s.queue.pop_expected();
        }
        let mean = total / n as f64;
        assert!((mean - 1_800.0).abs() < 120.0, "mean {mean}");
    }

    #[test]
    fn vanishing_rate_reactivates_without_hanging() {
        let mut b = office();
        b.add_sequence("rare", &["kitchen"], 1e-306, None).unwrap();
        let mut s = b.build().unwrap();
        let rare = s.sequence_id("rare").unwrap();
        let mut rng = SimRng::new(5);

        let first = s.reactivate(rare, SimTime::ZERO, &mut rng);
        let second = s.reactivate(rare, SimTime::ZERO, &mut rng);
        assert!(first.secs().is_finite() && second.secs().is_finite());
        assert_ne!(first, second);
        assert_eq!(s.queue.expected_len(), 2);
    }

    #[test]
    fn nearest_main_station() {
        let s = office().build().unwrap();
        let a = s.activity_id("desk_a").unwrap();
        let b = s.activity_id("desk_b").unwrap();
        assert_eq!(s.nearest_main_station(Vec2::new(2.0, 2.0)), a);
        assert_eq!(s.nearest_main_station(Vec2::new(7.0, 0.0)), b);
        assert!(s.is_main_station(a));
        assert!(!s.is_main_station(s.activity_id("printer").unwrap()));
    }

    #[test]
    fn partial_slot_holds_one() {
        let mut s = office().build().unwrap();
        let printer = s.activity_id("printer").unwrap();
        let p = PartialSequence { remainder: vec![printer], original: SequenceId(0) };
        assert!(s.set_partial(p.clone()).is_none());
        assert!(s.has_partial());
        assert_eq!(s.take_partial(), Some(p));
        assert!(!s.has_partial());
    }

    #[test]
    fn engagement_edits_through_scenario() {
        let mut s = office().build().unwrap();
        let printer = s.activity_id("printer").unwrap();
        assert!(s.activity_mut(printer).engagement_mut().set_min(50.0).is_err());
        assert_eq!(s.activity(printer).engagement().min_secs(), 5.0);
    }
}

// ── Loader ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod loader {
    use std::io::Cursor;

    use ped_core::CellId;

    use super::office;
    use crate::{load_sequences_reader, Priority, ScenarioError};

    #[test]
    fn loads_regular_and_triggered_rows() {
        let csv = "\
name,activities,rate_per_hour,trigger_cells
coffee,kitchen;desk_a,1.5,
visitor,kitchen;desk_b,0.25,12; 13;14
";
        let mut b = office();
        let ids = load_sequences_reader(Cursor::new(csv), &mut b).unwrap();
        let s = b.build().unwrap();

        assert_eq!(ids.len(), 2);
        assert_eq!(s.sequence(ids[0]).activities().len(), 2);
        assert_eq!(s.sequence(ids[0]).priority(), Priority::Regular);

        let trigger = s.sequence(ids[1]).visual_trigger().unwrap();
        assert_eq!(trigger.sorted_cells(), vec![CellId(12), CellId(13), CellId(14)]);
        assert_eq!(s.sequence(ids[1]).activation_rate(), 0.25);
    }

    #[test]
    fn bad_cell_is_a_parse_error() {
        let csv = "name,activities,rate_per_hour,trigger_cells\nx,kitchen,1.0,abc\n";
        let mut b = office();
        assert!(matches!(
            load_sequences_reader(Cursor::new(csv), &mut b),
            Err(ScenarioError::Parse(_))
        ));
    }

    #[test]
    fn unknown_activity_propagates() {
        let csv = "name,activities,rate_per_hour,trigger_cells\nx,sauna,1.0,\n";
        let mut b = office();
        assert!(matches!(
            load_sequences_reader(Cursor::new(csv), &mut b),
            Err(ScenarioError::UnknownActivity(_))
        ));
    }
}
