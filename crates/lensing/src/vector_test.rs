use approx::assert_relative_eq;
use nalgebra::Matrix2;
use units::Angle;

use crate::vector::{angular_vector_arcsec, to_arcsec, Derivatives};

#[test]
fn test_arcsec_round_trip() {
    let v = angular_vector_arcsec(1.5, -0.25);
    let [x, y] = to_arcsec(&v);

    assert_relative_eq!(x, 1.5, max_relative = 1e-14);
    assert_relative_eq!(y, -0.25, max_relative = 1e-14);
    assert_relative_eq!(v.x, 1.5 * std::f64::consts::PI / 648_000.0, max_relative = 1e-14);
}

#[test]
fn test_matrix_form_is_symmetric() {
    let d = Derivatives::new(2.0, -1.0, 0.5);
    let m = d.to_matrix();

    assert_eq!(m, Matrix2::new(2.0, 0.5, 0.5, -1.0));
    assert_eq!(Derivatives::from_matrix(&m), d);
}

#[test]
fn test_from_matrix_averages_off_diagonal() {
    let m = Matrix2::new(1.0, 0.2, 0.4, 3.0);
    let d = Derivatives::from_matrix(&m);

    assert_relative_eq!(d.xy, 0.3, epsilon = 1e-15);
}

#[test]
fn test_quarter_turn_swaps_diagonal() {
    let d = Derivatives::new(2.0, -1.0, 0.5);
    let r = d.rotated(Angle::from_degrees(90.0));

    assert_relative_eq!(r.xx, -1.0, epsilon = 1e-12);
    assert_relative_eq!(r.yy, 2.0, epsilon = 1e-12);
    assert_relative_eq!(r.xy, -0.5, epsilon = 1e-12);
}

#[test]
fn test_rotation_preserves_invariants() {
    let d = Derivatives::new(0.7, 1.9, -0.35);
    let det = |d: &Derivatives| d.xx * d.yy - d.xy * d.xy;

    for degrees in [13.0, 90.0, 145.0, -60.0, 360.0] {
        let r = d.rotated(Angle::from_degrees(degrees));
        assert_relative_eq!(r.trace(), d.trace(), epsilon = 1e-12);
        assert_relative_eq!(det(&r), det(&d), epsilon = 1e-12);
    }
}

#[test]
fn test_full_turn_is_identity() {
    let d = Derivatives::new(0.7, 1.9, -0.35);
    let r = d.rotated(Angle::from_degrees(360.0));

    assert_relative_eq!(r.xx, d.xx, epsilon = 1e-12);
    assert_relative_eq!(r.yy, d.yy, epsilon = 1e-12);
    assert_relative_eq!(r.xy, d.xy, epsilon = 1e-12);
}

#[test]
fn test_arithmetic() {
    let a = Derivatives::new(1.0, 2.0, 3.0);
    let b = Derivatives::new(0.5, -2.0, 1.0);

    assert_eq!(a + b, Derivatives::new(1.5, 0.0, 4.0));
    assert_eq!(a * 2.0, Derivatives::new(2.0, 4.0, 6.0));
    assert_eq!(a.swapped_axes(), Derivatives::new(2.0, 1.0, 3.0));
    assert_eq!(Derivatives::zero(), Derivatives::new(0.0, 0.0, 0.0));
}

#[test]
fn test_is_finite() {
    assert!(Derivatives::new(1.0, 2.0, 3.0).is_finite());
    assert!(!Derivatives::new(1.0, f64::NAN, 3.0).is_finite());
    assert!(!Derivatives::new(f64::INFINITY, 0.0, 0.0).is_finite());
}

#[test]
fn test_serializes_as_named_fields() {
    let d = Derivatives::new(1.0, 2.0, -0.5);
    let json = serde_json::to_string(&d).unwrap();
    assert_eq!(json, r#"{"xx":1.0,"yy":2.0,"xy":-0.5}"#);
}
