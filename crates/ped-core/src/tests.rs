//! Unit tests for ped-core primitives.

#[cfg(test)]
mod ids {
    use crate::{ActivityId, CellId, SequenceId};

    #[test]
    fn index_roundtrip() {
        let id = CellId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(CellId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn try_from_rejects_out_of_range() {
        assert_eq!(ActivityId::try_from(65_535usize).unwrap(), ActivityId(u16::MAX));
        assert!(ActivityId::try_from(65_536usize).is_err());
        assert!(SequenceId::try_from(usize::MAX).is_err());
    }

    #[test]
    fn display() {
        assert_eq!(SequenceId(7).to_string(), "SequenceId(7)");
    }
}

#[cfg(test)]
mod vec2 {
    use std::f64::consts::{FRAC_PI_2, PI};

    use crate::Vec2;

    #[test]
    fn normalized_rejects_zero() {
        assert!(Vec2::ZERO.normalized().is_none());
        let n = Vec2::new(3.0, 4.0).normalized().unwrap();
        assert!((n.length() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn clamp_length_preserves_direction() {
        let v = Vec2::new(3.0, 4.0).clamp_length(1.0);
        assert!((v.length() - 1.0).abs() < 1e-12);
        assert!((v.x - 0.6).abs() < 1e-12 && (v.y - 0.8).abs() < 1e-12);
        // Shorter vectors are untouched.
        assert_eq!(Vec2::new(0.1, 0.0).clamp_length(1.0), Vec2::new(0.1, 0.0));
    }

    #[test]
    fn signed_angle() {
        let x = Vec2::new(1.0, 0.0);
        assert!((x.angle_to(Vec2::new(0.0, 1.0)) - FRAC_PI_2).abs() < 1e-12);
        assert!((x.angle_to(Vec2::new(0.0, -1.0)) + FRAC_PI_2).abs() < 1e-12);
        assert!((x.angle_to(Vec2::new(-1.0, 0.0)).abs() - PI).abs() < 1e-12);
    }

    #[test]
    fn rotation_quarter_turn_matches_perp() {
        let v = Vec2::new(2.0, 1.0);
        let r = v.rotated(FRAC_PI_2);
        assert!((r - v.perp()).length() < 1e-12);
    }
}

#[cfg(test)]
mod time {
    use std::collections::BTreeMap;

    use crate::{SimClock, SimConfig, SimTime};

    #[test]
    fn clock_derives_time_from_ticks() {
        let mut clock = SimClock::new(0.1);
        for _ in 0..36_000 {
            clock.advance();
        }
        assert_eq!(clock.ticks, 36_000);
        assert!((clock.now().secs() - 3_600.0).abs() < 1e-9);
        let (h, m, _) = clock.elapsed_hms();
        assert_eq!((h, m), (1, 0));
    }

    #[test]
    fn sim_time_orders_in_btree() {
        let mut map = BTreeMap::new();
        map.insert(SimTime(5.0), "b");
        map.insert(SimTime(-1.0), "a");
        map.insert(SimTime(7.5), "c");
        let order: Vec<_> = map.values().copied().collect();
        assert_eq!(order, ["a", "b", "c"]);
    }

    #[test]
    fn total_ticks_rounds() {
        let cfg = SimConfig { time_step_secs: 0.1, duration_secs: 3_600.0, seed: 1 };
        assert_eq!(cfg.total_ticks(), 36_000);
    }

    #[test]
    fn validate_rejects_bad_step() {
        let cfg = SimConfig { time_step_secs: 0.0, ..SimConfig::default() };
        assert!(cfg.validate().is_err());
        let cfg = SimConfig { time_step_secs: 10.0, duration_secs: 1.0, seed: 0 };
        assert!(cfg.validate().is_err());
        assert!(SimConfig::default().validate().is_ok());
    }
}

#[cfg(test)]
mod rng {
    use crate::SimRng;

    #[test]
    fn same_seed_same_stream() {
        let mut a = SimRng::new(9);
        let mut b = SimRng::new(9);
        for _ in 0..10 {
            assert_eq!(a.exponential(2.0), b.exponential(2.0));
        }
    }

    #[test]
    fn exponential_mean_close_to_inverse_rate() {
        let mut rng = SimRng::new(1);
        let n = 20_000;
        let mean: f64 = (0..n).map(|_| rng.exponential(4.0)).sum::<f64>() / n as f64;
        assert!((mean - 0.25).abs() < 0.02, "mean {mean}");
    }

    #[test]
    fn exponential_zero_rate_never_fires() {
        let mut rng = SimRng::new(1);
        assert!(rng.exponential(0.0).is_infinite());
    }

    #[test]
    fn uniform_within_bounds() {
        let mut rng = SimRng::new(3);
        for _ in 0..1_000 {
            let x = rng.uniform(2.0, 5.0);
            assert!((2.0..5.0).contains(&x));
        }
        assert_eq!(rng.uniform(4.0, 4.0), 4.0);
    }
}
