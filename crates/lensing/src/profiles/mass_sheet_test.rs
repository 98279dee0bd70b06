use approx::assert_relative_eq;
use units::SurfaceDensity;

use crate::distance::LensDistance;
use crate::error::LensError;
use crate::lens::LensModel;
use crate::profiles::MassSheetLens;
use crate::vector::{angular_vector_arcsec, AngularVector};

fn sheet(kg_per_m2: f64) -> MassSheetLens {
    let d_d = LensDistance::from_mpc(1500.0).unwrap();
    MassSheetLens::new(d_d, SurfaceDensity::from_kg_per_m2(kg_per_m2)).unwrap()
}

#[test]
fn test_deflection_is_linear_in_position() {
    let lens = sheet(2.5);
    let a = lens.deflection(angular_vector_arcsec(1.0, -2.0)).unwrap();
    let b = lens.deflection(angular_vector_arcsec(3.0, -6.0)).unwrap();

    assert_relative_eq!(b, a * 3.0, max_relative = 1e-12);
    assert_eq!(lens.deflection(AngularVector::zeros()).unwrap(), AngularVector::zeros());
}

#[test]
fn test_jacobian_is_constant_diagonal() {
    let lens = sheet(2.5);
    let here = lens.derivatives(angular_vector_arcsec(0.1, 0.2)).unwrap();
    let there = lens.derivatives(angular_vector_arcsec(-40.0, 17.0)).unwrap();

    assert_eq!(here, there);
    assert_eq!(here.xx, here.yy);
    assert_eq!(here.xy, 0.0);
}

#[test]
fn test_surface_density_is_recovered() {
    let lens = sheet(3.7);
    let density = lens.surface_density(angular_vector_arcsec(5.0, 5.0)).unwrap();

    assert_relative_eq!(density.to_kg_per_m2(), 3.7, max_relative = 1e-12);
}

#[test]
fn test_critical_sheet_has_unit_convergence() {
    // Σ = 2 × c² / (8 π G D_d) makes f = 1, the critical sheet for a distant source
    let d_d = LensDistance::from_mpc(1500.0).unwrap();
    let critical = 2.0 * d_d.critical_density_factor();
    let lens = MassSheetLens::new(d_d, SurfaceDensity::from_kg_per_m2(critical)).unwrap();

    let d = lens.derivatives(AngularVector::zeros()).unwrap();
    assert_relative_eq!(d.xx, 1.0, max_relative = 1e-12);
}

#[test]
fn test_rejects_negative_density() {
    let d_d = LensDistance::from_mpc(1500.0).unwrap();
    assert!(matches!(
        MassSheetLens::new(d_d, SurfaceDensity::from_kg_per_m2(-1.0)),
        Err(LensError::InvalidParameter {
            name: "surface_density",
            ..
        })
    ));
}
