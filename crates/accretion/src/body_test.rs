use approx::assert_relative_eq;
use nalgebra::{Point3, Vector3};
use units::{Length, Mass};

use crate::body::{Body, BodyId};

fn body(mass: f64, position: [f64; 3], velocity: [f64; 3]) -> Body {
    Body {
        id: BodyId(0),
        mass,
        radius: 0.01,
        position: Point3::from(position),
        velocity: Vector3::from(velocity),
    }
}

#[test]
fn test_new_earth_masses() {
    let body = Body::new_earth_masses(BodyId(3), 1.0, 2.0, [1.0, 0.0, 0.0], [0.0, 6.28, 0.0]);

    assert_eq!(body.id, BodyId(3));
    assert_relative_eq!(body.mass, Mass::from_earth_masses(1.0).to_kg());
    assert_relative_eq!(body.radius, Length::from_earth_radii(2.0).to_au());
    assert_eq!(body.position, Point3::new(1.0, 0.0, 0.0));
    assert_eq!(body.velocity, Vector3::new(0.0, 6.28, 0.0));
}

#[test]
fn test_momentum() {
    let body = body(2.0, [1.0, 0.0, 0.0], [3.0, 4.0, -1.0]);
    assert_eq!(body.momentum(), Vector3::new(6.0, 8.0, -2.0));
}

#[test]
fn test_distance_to() {
    let a = body(1.0, [0.0, 0.0, 0.0], [0.0; 3]);
    let b = body(1.0, [1.0, 2.0, 2.0], [0.0; 3]);

    assert_relative_eq!(a.distance_to(&b), 3.0);
    assert_relative_eq!(b.distance_to(&a), 3.0);
}

#[test]
fn test_orbital_radius() {
    let body = body(1.0, [3.0, 0.0, 4.0], [0.0; 3]);
    assert_relative_eq!(body.orbital_radius(), 5.0);
}

#[test]
fn test_touches() {
    let a = body(1.0, [1.0, 0.0, 0.0], [0.0; 3]);
    let near = body(1.0, [1.015, 0.0, 0.0], [0.0; 3]);
    let far = body(1.0, [1.05, 0.0, 0.0], [0.0; 3]);

    assert!(a.touches(&near));
    assert!(!a.touches(&far));
}

#[test]
fn test_body_id_display_and_order() {
    assert_eq!(BodyId(42).to_string(), "42");
    assert!(BodyId(3) < BodyId(10));
}
