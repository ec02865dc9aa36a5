use approx::assert_relative_eq;
use units::Length;

use crate::error::AccretionError;
use crate::initcon::*;
use crate::registry::BodyType;

const SAMPLE: &str = "\
# Planetary system generator output
# Generated 2 minor bodies
# Generated 3 small bodies
1.98847e30 0 0 0 0 0 0
1.898e27 5.2 0.048 0.0227 4.78 1.75 0.33
5.683e26 9.58 0.056 0.0434 5.92 1.98 5.53
3.0e23 0.8 0.01 0.005 1.0 2.0 3.0 0.3 0.7 0.0
3.1e23 1.3 0.02 0.006 1.1 2.1 3.1 0.3 0.65 0.05

ERROR: orbit rejected
2.0e21 2.1 0.03 0.010 0.5 0.6 0.7 0.25 0.55 0.2
2.1e21 2.4 0.04 0.011 0.4 0.3 0.2 0.25 0.5 0.2
2.2e21 2.9 0.05 0.012 0.3 0.2 0.1 0.2 0.6 0.2
";

#[test]
fn test_parse_counts_and_types() {
    let ic = InitialConditions::parse(SAMPLE).unwrap();

    assert_eq!(ic.num_embryos, 2);
    assert_eq!(ic.num_planetesimals, 3);
    assert_eq!(ic.n_active(), 5);
    assert_eq!(ic.bodies.len(), 8);

    let types: Vec<BodyType> = ic.bodies.iter().map(|b| b.body_type).collect();
    assert_eq!(
        types,
        vec![
            BodyType::Sun,
            BodyType::GasGiant,
            BodyType::GasGiant,
            BodyType::Embryo,
            BodyType::Embryo,
            BodyType::Planetesimal,
            BodyType::Planetesimal,
            BodyType::Planetesimal,
        ]
    );
}

#[test]
fn test_massive_bodies_are_pure_core() {
    let ic = InitialConditions::parse(SAMPLE).unwrap();
    let sun = &ic.bodies[0];
    let jupiter = &ic.bodies[1];

    assert_eq!(sun.orbit, None);
    assert_eq!(sun.core_mass_fraction, 1.0);
    assert_eq!(jupiter.water_mass_fraction, 0.0);
    assert_relative_eq!(jupiter.orbit.unwrap().a, 5.2);
    assert_eq!(sun.radius(), Length::from_solar_radii(1.0));
}

#[test]
fn test_orbit_columns() {
    let ic = InitialConditions::parse(SAMPLE).unwrap();
    let embryo = ic.bodies[4].orbit.unwrap();

    assert_eq!(embryo.a, 1.3);
    assert_eq!(embryo.e, 0.02);
    assert_eq!(embryo.inc, 0.006);
    assert_eq!(embryo.omega, 1.1);
    assert_eq!(embryo.big_omega, 2.1);
    assert_eq!(embryo.mean_anomaly, 3.1);
    assert_relative_eq!(ic.bodies[4].mass.to_kg(), 3.1e23);
    assert_relative_eq!(ic.bodies[4].water_mass_fraction, 0.05);
}

#[test]
fn test_remainder_goes_to_mantle() {
    // 0.25 + 0.5 + 0.2 = 0.95
    let ic = InitialConditions::parse(SAMPLE).unwrap();
    let record = ic.bodies[6].record().unwrap();

    assert_relative_eq!(record.core_mass_fraction, 0.25);
    assert_relative_eq!(record.water_mass_fraction, 0.2);
    assert_relative_eq!(record.mantle_mass_fraction(), 0.55, epsilon = 1e-12);
}

#[test]
fn test_count_mismatch() {
    let text = SAMPLE.replace("Generated 3 small", "Generated 4 small");
    assert!(matches!(
        InitialConditions::parse(&text),
        Err(AccretionError::InitialConditions { .. })
    ));
}

#[test]
fn test_missing_header() {
    let text = SAMPLE.replace("# Generated 2 minor bodies\n", "");
    let err = InitialConditions::parse(&text).unwrap_err();
    assert!(err.to_string().contains("minor"));
}

#[test]
fn test_malformed_line_reports_line_number() {
    let text = SAMPLE.replace("3.1e23 1.3", "3.1e23 one");
    match InitialConditions::parse(&text) {
        Err(AccretionError::InitialConditions { line, .. }) => assert_eq!(line, 8),
        other => panic!("expected a line error, got {:?}", other),
    }
}

#[test]
fn test_wrong_column_count() {
    let text = SAMPLE.replace("2.2e21 2.9 0.05 0.012 0.3 0.2 0.1 0.2 0.6 0.2", "2.2e21 2.9 0.05");
    assert!(matches!(
        InitialConditions::parse(&text),
        Err(AccretionError::InitialConditions { line: 13, .. })
    ));
}

#[test]
fn test_impossible_composition_rejected() {
    let text = SAMPLE.replace("0.3 0.7 0.0\n", "0.8 0.1 0.5\n");
    assert!(InitialConditions::parse(&text).is_err());
}
