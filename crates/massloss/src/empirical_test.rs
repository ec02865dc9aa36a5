use approx::assert_relative_eq;

use crate::empirical::*;
use crate::estimator::RetentionEstimator;

#[test]
fn test_retention_within_loss_ranges() {
    let mut estimator = EmpiricalRetention::new(42);

    for _ in 0..1000 {
        let r = estimator.estimate(30.0, 2.0, 1e22, 0.5);
        assert!(r.water >= 1.0 - WATER_LOSS_RANGE.1 && r.water <= 1.0 - WATER_LOSS_RANGE.0);
        assert!(r.mantle >= 1.0 - MANTLE_LOSS_RANGE.1 && r.mantle <= 1.0 - MANTLE_LOSS_RANGE.0);
        assert_eq!(r.core, r.mantle);
    }
}

#[test]
fn test_same_seed_same_sequence() {
    let mut a = EmpiricalRetention::new(1234);
    let mut b = EmpiricalRetention::new(1234);

    for _ in 0..10 {
        assert_eq!(
            a.estimate(10.0, 1.5, 1e21, 0.2),
            b.estimate(10.0, 1.5, 1e21, 0.2)
        );
    }
}

#[test]
fn test_deterministic_uses_midpoints() {
    let mut estimator = EmpiricalRetention::deterministic();
    let r = estimator.estimate(45.0, 3.0, 1e23, 1.0);

    assert_relative_eq!(r.water, 1.0 - 0.045);
    assert_relative_eq!(r.mantle, 1.0 - 0.055);
    assert_relative_eq!(r.core, 1.0 - 0.055);
}
