use std::collections::BTreeMap;

use approx::assert_relative_eq;
use massloss::EstimatorKind;
use units::{Length, Mass, Time};

use crate::analysis::*;
use crate::body::BodyId;
use crate::collisions::LostMass;
use crate::registry::{BodyRecord, BodyType, TerminalKind};
use crate::state::{RunMeta, RunState};
use crate::test_support::collision_record;

fn record(body_type: BodyType, earth_masses: f64, water: f64) -> BodyRecord {
    BodyRecord::new(water, 0.3, body_type, Mass::from_earth_masses(earth_masses)).unwrap()
}

/// Sun, one giant, three embryos and three planetesimals; two embryos and a
/// planetesimal grow into body 10, the giant swallows body 8.
fn evolved_state() -> RunState {
    let mut state = RunState::new(RunMeta::new(
        EstimatorKind::PerfectMerging,
        Time::from_myr(1.0),
        100,
    ));
    let seeds = [
        BodyRecord::new(0.0, 1.0, BodyType::Sun, Mass::from_solar_masses(1.0)).unwrap(),
        record(BodyType::GasGiant, 300.0, 0.0),
        record(BodyType::Embryo, 0.5, 0.01),
        record(BodyType::Embryo, 0.3, 0.05),
        record(BodyType::Planetesimal, 0.01, 0.2),
        record(BodyType::Embryo, 0.2, 0.1),
        record(BodyType::Planetesimal, 0.02, 0.1),
        record(BodyType::Planetesimal, 0.01, 0.1),
    ];
    for seed in seeds {
        state.register_seed(seed).unwrap();
    }

    let mut lossy = collision_record(1_000.0, [0.5, 0.3]);
    lossy.lost = LostMass {
        water: Mass::from_earth_masses(0.001),
        mantle: Mass::from_earth_masses(0.002),
        core: Mass::zero(),
    };
    state
        .record_merger([BodyId(3), BodyId(4)], record(BodyType::Embryo, 0.797, 0.02), lossy)
        .unwrap();
    state
        .record_merger(
            [BodyId(9), BodyId(5)],
            record(BodyType::Embryo, 0.807, 0.022),
            collision_record(2_000.0, [0.797, 0.01]),
        )
        .unwrap();
    state
        .record_merger(
            [BodyId(2), BodyId(8)],
            record(BodyType::GasGiant, 300.01, 0.0),
            collision_record(3_000.0, [300.0, 0.01]),
        )
        .unwrap();

    state
        .set_terminal(BodyId(6), TerminalKind::Escaped, Time::from_years(1_500.0))
        .unwrap();
    state
        .set_terminal(BodyId(7), TerminalKind::CollidedWithCenter, Time::from_years(2_500.0))
        .unwrap();
    state.meta.current_time = Time::from_years(5_000.0);
    state
}

#[test]
fn test_habitable_zone_bounds() {
    assert!(is_potentially_habitable(Length::from_au(0.75)));
    assert!(is_potentially_habitable(Length::from_au(1.5)));
    assert!(!is_potentially_habitable(Length::from_au(0.7)));
    assert!(!is_potentially_habitable(Length::from_au(2.0)));
}

#[test]
fn test_trace_follows_dominant_parents() {
    let state = evolved_state();
    let points = trace(&state, BodyId(10)).unwrap();

    let ids: Vec<BodyId> = points.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![BodyId(10), BodyId(10), BodyId(9), BodyId(3)]);

    let times: Vec<f64> = points.iter().map(|p| p.time.to_years()).collect();
    assert_eq!(times, vec![5_000.0, 2_000.0, 1_000.0, 0.0]);

    assert_relative_eq!(points[3].mass.to_earth_masses(), 0.5, epsilon = 1e-12);
    assert_relative_eq!(points[3].water_mass_fraction, 0.01);
    assert_relative_eq!(points[0].water_mass_fraction, 0.022);
}

#[test]
fn test_trace_of_seed() {
    let state = evolved_state();
    let points = trace(&state, BodyId(6)).unwrap();

    assert_eq!(points.len(), 2);
    assert!(points.iter().all(|p| p.id == BodyId(6)));
    assert_eq!(points[1].time, Time::zero());
}

#[test]
fn test_trace_unknown_body() {
    let state = evolved_state();
    assert!(trace(&state, BodyId(99)).is_err());
}

#[test]
fn test_water_budget() {
    let state = evolved_state();
    let mut axes = BTreeMap::new();
    axes.insert(BodyId(10), Length::from_au(1.1));
    axes.insert(BodyId(11), Length::from_au(5.2));

    let budget = WaterBudget::compute(&state, &axes).unwrap();

    assert_eq!(budget.planets, 1);
    assert_relative_eq!(budget.planet.mass.to_earth_masses(), 0.807, epsilon = 1e-12);
    assert_eq!(budget.habitable_planets, 1);
    assert_eq!(budget.habitable, budget.planet);

    assert_relative_eq!(budget.escaped.mass.to_earth_masses(), 0.2, epsilon = 1e-12);
    assert_relative_eq!(budget.escaped.water.to_earth_masses(), 0.02, epsilon = 1e-12);
    assert_relative_eq!(budget.central.mass.to_earth_masses(), 0.02, epsilon = 1e-12);

    assert_relative_eq!(budget.gas_giants.mass.to_earth_masses(), 0.01, epsilon = 1e-12);
    assert_relative_eq!(budget.gas_giants.water.to_earth_masses(), 0.001, epsilon = 1e-12);

    assert_relative_eq!(budget.collisions.mass.to_earth_masses(), 0.003, epsilon = 1e-12);
    assert_relative_eq!(budget.collisions.water.to_earth_masses(), 0.001, epsilon = 1e-12);
    assert_eq!(budget.last_collision, Some(Time::from_years(3_000.0)));
}

#[test]
fn test_planet_outside_habitable_zone() {
    let state = evolved_state();
    let mut axes = BTreeMap::new();
    axes.insert(BodyId(10), Length::from_au(2.3));

    let budget = WaterBudget::compute(&state, &axes).unwrap();
    assert_eq!(budget.planets, 1);
    assert_eq!(budget.habitable_planets, 0);
    assert_eq!(budget.habitable.mass, Mass::zero());
}

#[test]
fn test_empty_run_budget() {
    let state = RunState::new(RunMeta::new(EstimatorKind::Rbf, Time::from_myr(1.0), 10));
    let budget = WaterBudget::compute(&state, &BTreeMap::new()).unwrap();

    assert_eq!(budget, WaterBudget::default());
    assert_eq!(budget.last_collision, None);
}

#[test]
fn test_collision_stats() {
    let state = evolved_state();
    let stats = CollisionStats::from_forest(&state.forest);

    assert_eq!(stats.len(), 3);
    let times: Vec<f64> = stats.samples.iter().map(|s| s.time.to_years()).collect();
    assert_eq!(times, vec![1_000.0, 2_000.0, 3_000.0]);
    assert_relative_eq!(stats.mean_alpha().unwrap(), 30.0);
    assert_relative_eq!(stats.mean_velocity_esc().unwrap(), 1.5);

    assert_eq!(CollisionStats::default().mean_alpha(), None);
}
