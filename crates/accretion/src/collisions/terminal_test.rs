use approx::assert_relative_eq;
use nalgebra::{Point3, Vector3};
use units::{Length, Time};

use crate::body::{Body, BodyId};
use crate::collisions::terminal::*;
use crate::registry::TerminalKind;

fn body_at(id: u32, distance: f64) -> Body {
    Body {
        id: BodyId(id),
        mass: 1e23,
        radius: 1e-5,
        position: Point3::new(0.0, distance, 0.0),
        velocity: Vector3::zeros(),
    }
}

#[test]
fn test_kepler_scales_with_two_thirds_power() {
    let one = kepler_semi_major_axis(Time::from_years(1.0));
    let eight = kepler_semi_major_axis(Time::from_years(8.0));
    assert_relative_eq!(eight.to_au() / one.to_au(), 4.0, max_relative = 1e-12);
}

#[test]
fn test_for_timestep() {
    // 20 steps of 0.01 yr is a 0.2 yr orbit
    let criteria =
        TerminalCriteria::for_timestep(Time::from_years(0.01), 20.0, Length::from_au(30.0));
    let expected = kepler_semi_major_axis(Time::from_years(0.2));
    assert_relative_eq!(criteria.min_distance.to_au(), expected.to_au(), max_relative = 1e-12);
    assert_relative_eq!(criteria.min_distance.to_au(), 0.2f64.powf(2.0 / 3.0), max_relative = 1e-3);
    assert_eq!(criteria.max_distance, Length::from_au(30.0));
}

#[test]
fn test_classify() {
    let criteria = TerminalCriteria::new(Length::from_au(0.1), Length::from_au(30.0));

    assert_eq!(criteria.classify(&body_at(1, 1.0)), None);
    assert_eq!(criteria.classify(&body_at(1, 31.0)), Some(TerminalKind::Escaped));
    assert_eq!(
        criteria.classify(&body_at(1, 0.05)),
        Some(TerminalKind::CollidedWithCenter)
    );
}

#[test]
fn test_scan_skips_central_body() {
    let criteria = TerminalCriteria::new(Length::from_au(0.1), Length::from_au(30.0));
    let bodies = vec![body_at(1, 0.0), body_at(2, 1.0), body_at(3, 45.0), body_at(4, 0.01)];

    let events = criteria.scan(&bodies, BodyId(1), Time::from_years(500.0));

    assert_eq!(
        events,
        vec![
            TerminalEvent {
                id: BodyId(3),
                kind: TerminalKind::Escaped,
                time: Time::from_years(500.0),
            },
            TerminalEvent {
                id: BodyId(4),
                kind: TerminalKind::CollidedWithCenter,
                time: Time::from_years(500.0),
            },
        ]
    );
}
