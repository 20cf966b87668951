//! Unit and end-to-end tests for ped-sim.

#[cfg(test)]
mod helpers {
    use std::sync::Arc;

    use ped_core::{AgentState, CellId, Pose, SimConfig, Vec2};
    use ped_scenario::{Activity, EngagementBounds, Scenario, ScenarioBuilder};
    use ped_spatial::{
        BarrierProximity, Contact, GridFloor, GridFloorBuilder, RadialField, Region,
        SpatialEnvironment,
    };

    use crate::{AgentSim, SimBuilder};

    /// Barrier-free space; every location is cell 0.
    pub struct Open {
        /// Fixed field-of-view answer.
        pub visible: bool,
        /// Whether cell 0 is reported as a field cell.
        pub seeded:  bool,
    }

    pub const OPEN: Open = Open { visible: true, seeded: true };

    impl SpatialEnvironment for Open {
        fn cell_at(&self, _: Vec2) -> Option<CellId> {
            Some(CellId(0))
        }
        fn field_cells(&self) -> Vec<CellId> {
            if self.seeded { vec![CellId(0)] } else { Vec::new() }
        }
        fn nearest_barrier(&self, _: Vec2) -> Option<BarrierProximity> {
            Some(BarrierProximity { distance: 1_000.0, normal: Vec2::new(0.0, 1.0) })
        }
        fn segment_collision(&self, _: &AgentState, _: &AgentState, _: f64, _: f64) -> Option<Contact> {
            None
        }
        fn field_of_view(&self, _: &AgentState, _: f64, _: &Region) -> bool {
            self.visible
        }
    }

    /// A wall along y = 0 whose contact solver reports a fixed fraction.
    pub struct InjectedWall {
        pub fraction: f64,
    }

    impl SpatialEnvironment for InjectedWall {
        fn cell_at(&self, _: Vec2) -> Option<CellId> {
            Some(CellId(0))
        }
        fn field_cells(&self) -> Vec<CellId> {
            vec![CellId(0)]
        }
        fn nearest_barrier(&self, location: Vec2) -> Option<BarrierProximity> {
            Some(BarrierProximity { distance: location.y.abs(), normal: Vec2::new(0.0, 1.0) })
        }
        fn segment_collision(&self, old: &AgentState, new: &AgentState, _: f64, _: f64) -> Option<Contact> {
            Some(Contact {
                point:         old.location + (new.location - old.location) * 0.5,
                time_fraction: self.fraction,
                normal:        Vec2::new(0.0, 1.0),
            })
        }
        fn field_of_view(&self, _: &AgentState, _: f64, _: &Region) -> bool {
            false
        }
    }

    /// No cells anywhere.
    pub struct Nowhere;

    impl SpatialEnvironment for Nowhere {
        fn cell_at(&self, _: Vec2) -> Option<CellId> {
            None
        }
        fn field_cells(&self) -> Vec<CellId> {
            Vec::new()
        }
        fn nearest_barrier(&self, _: Vec2) -> Option<BarrierProximity> {
            None
        }
        fn segment_collision(&self, _: &AgentState, _: &AgentState, _: f64, _: f64) -> Option<Contact> {
            None
        }
        fn field_of_view(&self, _: &AgentState, _: f64, _: &Region) -> bool {
            false
        }
    }

    pub fn station(name: &str, x: f64, y: f64) -> Activity {
        Activity::new(
            name,
            Pose::new(Vec2::new(x, y), Vec2::new(1.0, 0.0)),
            EngagementBounds::new(5.0, 10.0).unwrap(),
            Arc::new(RadialField::new(Vec2::new(x, y), 0.5)),
        )
    }

    /// A 10 m × 6 m room with 0.5 m cells and no furniture.
    pub fn room() -> GridFloor {
        GridFloorBuilder::new(10.0, 6.0, 0.5).build().unwrap()
    }

    /// desk (main) at (2, 3); `errand` = printer (7, 2) → shelf (8, 4).
    pub fn errand_scenario(rate_per_hour: f64) -> Scenario {
        let mut b = ScenarioBuilder::new();
        b.add_main_station(station("desk", 2.0, 3.0)).unwrap();
        b.add_activity(station("printer", 7.0, 2.0)).unwrap();
        b.add_activity(station("shelf", 8.0, 4.0)).unwrap();
        b.add_sequence("errand", &["printer", "shelf"], rate_per_hour, None).unwrap();
        b.build().unwrap()
    }

    pub fn config(duration_secs: f64) -> SimConfig {
        SimConfig { time_step_secs: 0.1, duration_secs, seed: 7 }
    }

    pub fn room_sim(rate_per_hour: f64, duration_secs: f64) -> AgentSim<GridFloor> {
        SimBuilder::new(room(), errand_scenario(rate_per_hour))
            .config(config(duration_secs))
            .build()
            .unwrap()
    }
}

// ── Builder ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use ped_core::{AgentState, SimConfig, Vec2};
    use ped_motion::MotionParams;
    use ped_behavior::VisionParams;

    use super::helpers::{Nowhere, errand_scenario, room, room_sim};
    use crate::{SimBuilder, SimError};

    #[test]
    fn agent_starts_on_main_station_pose() {
        let sim = room_sim(1.0, 60.0);
        assert_eq!(sim.state().location, Vec2::new(2.0, 3.0));
        assert_eq!(sim.state().velocity, Vec2::ZERO);
        assert_eq!(sim.scheduler().target().name(), "desk");
        assert_eq!(sim.clock().ticks, 0);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let err = SimBuilder::new(room(), errand_scenario(1.0))
            .config(SimConfig { time_step_secs: 0.0, ..SimConfig::default() })
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, SimError::Config(_)));
    }

    #[test]
    fn invalid_motion_and_vision_are_rejected() {
        let motion = MotionParams { max_speed: -1.0, ..MotionParams::default() };
        let err = SimBuilder::new(room(), errand_scenario(1.0)).motion(motion).build().err().unwrap();
        assert!(matches!(err, SimError::Motion(_)));

        let vision = VisionParams { half_angle_rad: 0.0 };
        let err = SimBuilder::new(room(), errand_scenario(1.0)).vision(vision).build().err().unwrap();
        assert!(matches!(err, SimError::Behavior(_)));
    }

    #[test]
    fn start_off_the_floor_is_rejected() {
        let err = SimBuilder::new(Nowhere, errand_scenario(1.0)).build().err().unwrap();
        assert!(matches!(err, SimError::OutsideFloor { .. }));

        let outside = AgentState::at_rest(Vec2::new(-3.0, 1.0), Vec2::new(1.0, 0.0));
        let err = SimBuilder::new(room(), errand_scenario(1.0))
            .initial_state(outside)
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, SimError::OutsideFloor { .. }));
    }
}

// ── Observer ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod observer {
    use ped_core::{AgentEngagementStatus, AgentState, SimTime};

    use super::helpers::room_sim;
    use crate::observer::ProgressTracker;
    use crate::SimObserver;

    #[derive(Default)]
    struct Recorder {
        percents:  Vec<u32>,
        ticks:     u64,
        max_speed: f64,
        ended_at:  Option<SimTime>,
    }

    impl SimObserver for Recorder {
        fn on_tick_end(&mut self, _: SimTime, state: &AgentState, _: AgentEngagementStatus) {
            self.ticks += 1;
            self.max_speed = self.max_speed.max(state.speed());
        }
        fn on_progress(&mut self, percent: u32) {
            self.percents.push(percent);
        }
        fn on_sim_end(&mut self, time: SimTime) {
            self.ended_at = Some(time);
        }
    }

    #[test]
    fn progress_reports_each_whole_percent_once() {
        let mut sim = room_sim(30.0, 100.0);
        let mut rec = Recorder::default();
        sim.run(&mut rec).unwrap();

        assert_eq!(rec.percents, (1..=100).collect::<Vec<_>>());
        assert_eq!(rec.ticks, 1_000);
        assert!((rec.ended_at.unwrap().secs() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn short_runs_report_every_crossed_percent() {
        let mut p = ProgressTracker::new(3);
        assert_eq!(p.advance(1).collect::<Vec<_>>(), (1..=33).collect::<Vec<_>>());
        assert_eq!(p.advance(2).count(), 33);
        assert_eq!(p.advance(3).last(), Some(100));
        assert_eq!(p.advance(3).count(), 0);
        assert_eq!(ProgressTracker::new(0).advance(0).count(), 0);
    }

    #[test]
    fn speed_never_exceeds_cap_over_a_busy_hour() {
        let mut sim = room_sim(30.0, 3_600.0);
        let cap = sim.integrator().params().max_speed;
        let mut rec = Recorder::default();
        sim.run(&mut rec).unwrap();
        assert!(rec.max_speed > 0.0);
        assert!(rec.max_speed <= cap + 1e-9, "max speed {}", rec.max_speed);
    }
}

// ── Ticks and fatal paths ─────────────────────────────────────────────────────

#[cfg(test)]
mod ticking {
    use ped_core::{AgentState, Vec2};
    use ped_motion::MotionError;
    use ped_scenario::ScenarioBuilder;

    use super::helpers::{InjectedWall, config, room_sim, station};
    use crate::{SimBuilder, SimError};

    #[test]
    fn tick_advances_clock_and_reports_distance() {
        let mut sim = room_sim(1.0, 10.0);
        let before = sim.state().location;
        let report = sim.tick().unwrap();
        assert_eq!(sim.clock().ticks, 1);
        assert!((report.time.secs() - 0.1).abs() < 1e-12);
        assert!((report.distance - sim.state().location.distance(before)).abs() < 1e-12);
        assert!(report.step.sub_steps >= 1);
    }

    fn walk_into(fraction: f64) -> SimError {
        // The only station lies behind the wall, so the agent walks into it.
        let mut b = ScenarioBuilder::new();
        b.add_main_station(station("behind", 0.0, -5.0)).unwrap();
        let scenario = b.build().unwrap();
        let start = AgentState::at_rest(Vec2::new(0.0, 2.0), Vec2::new(0.0, -1.0));
        let mut sim = SimBuilder::new(InjectedWall { fraction }, scenario)
            .config(config(60.0))
            .initial_state(start)
            .build()
            .unwrap();
        for _ in 0..600 {
            if let Err(e) = sim.tick() {
                return e;
            }
        }
        panic!("agent never reached the wall");
    }

    #[test]
    fn out_of_range_fraction_aborts_the_run() {
        for fraction in [1.5, -0.25] {
            let err = walk_into(fraction);
            assert!(
                matches!(err, SimError::Motion(MotionError::TimeFractionOutOfRange { .. })),
                "{err}"
            );
        }
    }

    #[test]
    fn in_range_fraction_is_absorbed() {
        let mut b = ScenarioBuilder::new();
        b.add_main_station(station("behind", 0.0, -5.0)).unwrap();
        let start = AgentState::at_rest(Vec2::new(0.0, 2.0), Vec2::new(0.0, -1.0));
        let mut sim = SimBuilder::new(InjectedWall { fraction: 0.5 }, b.build().unwrap())
            .config(config(5.0))
            .initial_state(start)
            .build()
            .unwrap();
        let mut collisions = 0;
        for _ in 0..30 {
            collisions += sim.tick().unwrap().step.collisions;
        }
        assert!(collisions >= 1);
    }
}

// ── Trainer ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod trainer {
    use ped_core::{AgentState, PhysicalMovementMode, Vec2};
    use ped_motion::MotionParams;

    use super::helpers::{room, station};
    use crate::{SimError, Trainer};

    #[test]
    fn walks_straight_and_comes_to_rest_on_the_pose() {
        let floor = room();
        let target = station("window", 8.0, 3.0);
        let start = AgentState::at_rest(Vec2::new(1.0, 3.0), Vec2::new(1.0, 0.0));
        let mut trainer = Trainer::new(&floor, &target, MotionParams::default(), start, 0.1).unwrap();

        let out = trainer.run(30.0).unwrap();
        assert!(out.arrived());
        let t = out.arrival_secs.unwrap();
        assert!(t > 4.0 && t < 10.0, "arrival after {t} s");
        assert!((out.walked_distance_m - 7.0).abs() < 0.5, "walked {}", out.walked_distance_m);
        assert!(out.final_state.location.distance(Vec2::new(8.0, 3.0)) < 0.3);
        assert_eq!(trainer.mode(), PhysicalMovementMode::StopAndOrient);
    }

    #[test]
    fn time_limit_leaves_agent_unarrived() {
        let floor = room();
        let target = station("window", 8.0, 3.0);
        let start = AgentState::at_rest(Vec2::new(1.0, 3.0), Vec2::new(1.0, 0.0));
        let mut trainer = Trainer::new(&floor, &target, MotionParams::default(), start, 0.1).unwrap();

        let out = trainer.run(1.0).unwrap();
        assert!(!out.arrived());
        assert_eq!(out.ticks, 10);
        assert_eq!(trainer.mode(), PhysicalMovementMode::Move);
    }

    #[test]
    fn rejects_bad_step_and_outside_start() {
        let floor = room();
        let target = station("window", 8.0, 3.0);
        let inside = AgentState::at_rest(Vec2::new(1.0, 3.0), Vec2::new(1.0, 0.0));
        let outside = AgentState::at_rest(Vec2::new(20.0, 3.0), Vec2::new(1.0, 0.0));

        let err = Trainer::new(&floor, &target, MotionParams::default(), inside, 0.0).err().unwrap();
        assert!(matches!(err, SimError::Config(_)));
        let err = Trainer::new(&floor, &target, MotionParams::default(), outside, 0.1).err().unwrap();
        assert!(matches!(err, SimError::OutsideFloor { .. }));
    }
}

// ── Statistics driver ─────────────────────────────────────────────────────────

#[cfg(test)]
mod statistics {
    use ped_core::CellId;
    use ped_output::{MemorySink, SimulationRecord};
    use ped_scenario::ScenarioBuilder;
    use ped_spatial::Region;

    use super::helpers::{OPEN, config, room_sim, station};
    use crate::{NoopObserver, SimBuilder, StatisticsDriver};

    #[test]
    fn time_fractions_sum_to_one_over_an_hour() {
        let mut driver = StatisticsDriver::new(room_sim(20.0, 3_600.0));
        let stats = driver.run(&mut NoopObserver).unwrap();

        assert!((stats.duration_secs - 3_600.0).abs() < 1e-6);
        assert!((stats.fraction_sum() - 1.0).abs() < 1e-9, "sum {}", stats.fraction_sum());
        assert!(stats.walking_fraction > 0.0);
        assert!(stats.engaged_fraction > 0.0);
        assert!(stats.free_fraction > 0.0);
        assert!(stats.walked_distance_m > 0.0);
        assert!((stats.walked_distance_per_hour - stats.walked_distance_m).abs() < 1e-6);
        assert_eq!(stats.visual_sequence_count, 0);
        assert_eq!(stats.detections, 0);
        assert!(stats.avg_delay_fraction.is_none());
    }

    #[test]
    fn always_visible_trigger_is_detected_within_one_tick() {
        let trigger: Region = [CellId(0)].into_iter().collect();
        let mut b = ScenarioBuilder::new();
        b.add_main_station(station("desk", 0.0, 0.0)).unwrap();
        b.add_activity(station("door", 6.0, 0.0)).unwrap();
        b.add_sequence("visitor", &["door"], 20.0, Some(trigger)).unwrap();

        let sim = SimBuilder::new(OPEN, b.build().unwrap())
            .config(config(3_600.0))
            .build()
            .unwrap();
        let dt = sim.clock().time_step_secs;
        let mut driver = StatisticsDriver::new(sim);
        let stats = driver.run(&mut NoopObserver).unwrap();

        assert_eq!(stats.visual_sequence_count, 1);
        assert!(stats.detections > 0);
        let max = stats.max_delay_fraction.unwrap();
        assert!(max >= 0.0);
        assert!(max * stats.duration_secs <= dt + 1e-9, "delay {} s", max * stats.duration_secs);
        assert!(stats.min_delay_fraction.unwrap() <= stats.avg_delay_fraction.unwrap());
    }

    #[test]
    fn run_into_hands_the_record_to_the_sink() {
        let mut driver = StatisticsDriver::new(room_sim(5.0, 60.0));
        let mut sink = MemorySink::new();
        let stats = driver.run_into(&mut NoopObserver, &mut sink).unwrap();
        assert_eq!(sink.records, vec![SimulationRecord::Occupancy(stats)]);
        assert!(driver.sim().is_finished());
    }
}

// ── Event capture driver ──────────────────────────────────────────────────────

#[cfg(test)]
mod capture {
    use ped_core::Vec2;
    use ped_output::{MemorySink, SimulationRecord, TraceRow};
    use ped_spatial::{GridFloor, SpatialEnvironment};

    use super::helpers::{Open, config, errand_scenario, room, room_sim};
    use crate::{
        CaptureConfig, EventCaptureDriver, EventCriteria, FieldInterval, NoopObserver,
        SimBuilder, SimError, VisibilityCriterion,
    };

    fn noisy_room() -> GridFloor {
        let mut floor = room();
        for cell in floor.field_cells() {
            floor.set_field_value("noise", cell, 1.0).unwrap();
        }
        floor
    }

    fn noise_between(min: f64, max: f64) -> CaptureConfig {
        CaptureConfig {
            criteria: EventCriteria {
                field_intervals: vec![FieldInterval::new("noise", min, max)],
                ..EventCriteria::default()
            },
            ..CaptureConfig::default()
        }
    }

    fn noisy_sim(duration_secs: f64) -> crate::AgentSim<GridFloor> {
        SimBuilder::new(noisy_room(), errand_scenario(20.0))
            .config(config(duration_secs))
            .build()
            .unwrap()
    }

    #[test]
    fn interval_met_everywhere_captures_every_sample() {
        let mut driver = EventCaptureDriver::new(noisy_sim(120.0), noise_between(0.5, 1.5)).unwrap();
        let mut trace: Vec<TraceRow> = Vec::new();
        let result = driver.run(&mut NoopObserver, Some(&mut trace)).unwrap();

        assert_eq!(result.samples(), 120);
        assert_eq!(result.captured, 120);
        assert_eq!(result.capture_probability, 1.0);
        assert_eq!(result.trail.values().sum::<u64>(), 120);
        assert!(result.visited_cells() >= 1);
        assert_eq!(result.signal.len(), 120);
        assert!(result.spectrum.is_none());
        assert_eq!(trace.len(), 120);
        assert!(trace.iter().all(|row| row.captured));
        assert!((trace[0].time_secs - 1.0).abs() < 1e-9);
    }

    #[test]
    fn interval_never_met_captures_nothing() {
        let mut driver = EventCaptureDriver::new(noisy_sim(60.0), noise_between(2.0, 3.0)).unwrap();
        let result = driver.run(&mut NoopObserver, None).unwrap();

        assert_eq!(result.captured, 0);
        assert_eq!(result.uncaptured, 60);
        assert_eq!(result.capture_probability, 0.0);
        assert_eq!(result.visited_cells(), 0);
        assert_eq!(result.trail.len(), room().field_cells().len());
    }

    #[test]
    fn missing_field_counts_as_not_captured() {
        let mut driver = EventCaptureDriver::new(room_sim(1.0, 10.0), noise_between(0.0, 9.0)).unwrap();
        let result = driver.run(&mut NoopObserver, None).unwrap();
        assert_eq!(result.captured, 0);
        assert_eq!(result.uncaptured, 10);
    }

    #[test]
    fn visibility_of_own_surroundings_holds_while_idle() {
        let floor = room();
        let target = floor.region_around(Vec2::new(2.0, 3.0), 0.5);
        let sim = SimBuilder::new(floor, errand_scenario(0.001))
            .config(config(20.0))
            .build()
            .unwrap();
        let cfg = CaptureConfig {
            sample_interval_secs: 0.5,
            criteria: EventCriteria {
                visibility: Some(VisibilityCriterion { target, visible: true }),
                ..EventCriteria::default()
            },
            ..CaptureConfig::default()
        };
        let mut driver = EventCaptureDriver::new(sim, cfg).unwrap();
        assert!((driver.sample_interval_secs() - 0.5).abs() < 1e-12);
        let result = driver.run(&mut NoopObserver, None).unwrap();
        assert_eq!(result.samples(), 40);
        assert_eq!(result.capture_probability, 1.0);
    }

    #[test]
    fn idle_agent_is_never_engaged_in_a_flagged_activity() {
        let sim = SimBuilder::new(room(), errand_scenario(0.001))
            .config(config(20.0))
            .build()
            .unwrap();
        let cfg = CaptureConfig {
            criteria: EventCriteria { engaged_in: vec!["printer".into()], ..EventCriteria::default() },
            ..CaptureConfig::default()
        };
        let result = EventCaptureDriver::new(sim, cfg).unwrap().run(&mut NoopObserver, None).unwrap();
        assert_eq!(result.captured, 0);
    }

    #[test]
    fn frequency_analysis_attaches_a_spectrum() {
        let cfg = CaptureConfig { frequency_analysis: true, ..noise_between(0.5, 1.5) };
        let mut driver = EventCaptureDriver::new(noisy_sim(64.0), cfg).unwrap();
        let mut sink = MemorySink::new();
        let result = driver.run_into(&mut NoopObserver, None, &mut sink).unwrap();

        let spectrum = result.spectrum.as_ref().unwrap();
        assert!(!spectrum.is_empty());
        assert_eq!(spectrum[0].frequency_hz, 0.0);
        assert_eq!(sink.records, vec![SimulationRecord::Capture(result)]);
    }

    #[test]
    fn invalid_configs_are_rejected() {
        let cfg = CaptureConfig { sample_interval_secs: 0.0, ..CaptureConfig::default() };
        let err = EventCaptureDriver::new(room_sim(1.0, 10.0), cfg).err().unwrap();
        assert!(matches!(err, SimError::Config(_)));

        let err = EventCaptureDriver::new(room_sim(1.0, 10.0), noise_between(2.0, 1.0)).err().unwrap();
        assert!(matches!(err, SimError::Config(_)));

        let cfg = CaptureConfig {
            criteria: EventCriteria { engaged_in: vec!["sofa".into()], ..EventCriteria::default() },
            ..CaptureConfig::default()
        };
        let err = EventCaptureDriver::new(room_sim(1.0, 10.0), cfg).err().unwrap();
        assert!(matches!(err, SimError::Scenario(_)));
    }

    #[test]
    fn cell_missing_from_trail_is_fatal() {
        let sim = SimBuilder::new(Open { visible: false, seeded: false }, errand_scenario(1.0))
            .config(config(10.0))
            .build()
            .unwrap();
        let err = EventCaptureDriver::new(sim, CaptureConfig::default())
            .unwrap()
            .run(&mut NoopObserver, None)
            .err()
            .unwrap();
        assert!(matches!(err, SimError::CellNotInTrail { .. }));
    }
}
