//! Elementary lens profiles
//!
//! Each profile evaluates its deflection and Jacobian in closed form. Scale
//! constants are computed once in the constructor from the physical inputs
//! and the lens distance.
//!
//! Singular profiles (point mass, SIS, SIE and the cored variants with zero
//! core) have no finite field at their center; querying exactly there
//! returns [`LensError::SingularEvaluation`] rather than a clamped value.
//! Positions are rescaled before squaring, so points arbitrarily close to a
//! center still evaluate; where the true value exceeds `f64` the query is
//! singular as well.

use crate::error::{LensError, Result};
use crate::vector::{AngularVector, Derivatives};

#[cfg(test)]
use crate::lens::LensModel;
#[cfg(test)]
use nalgebra::Matrix2;

pub mod elliptical;
pub mod isothermal;
pub mod mass_sheet;
pub mod plummer;

#[cfg(test)]
mod mass_sheet_test;

pub use elliptical::{NsieLens, SieLens};
pub use isothermal::{NsisLens, SisLens};
pub use mass_sheet::MassSheetLens;
pub use plummer::PlummerLens;

/// Turns a quantity's failed `is_physical` check (negative, NaN or
/// infinite) into an `InvalidParameter` naming the input.
pub(crate) fn require_physical(name: &'static str, physical: bool, value: f64) -> Result<()> {
    if physical {
        Ok(())
    } else {
        Err(LensError::invalid(
            name,
            format!("must be finite and non-negative, got {value}"),
        ))
    }
}

/// Ellipticity ε = 1 − q must lie in [0, 1); ε = 1 is a degenerate line mass.
pub(crate) fn require_ellipticity(value: f64) -> Result<()> {
    if value.is_finite() && (0.0..1.0).contains(&value) {
        Ok(())
    } else {
        Err(LensError::invalid(
            "ellipticity",
            format!("must lie in [0, 1), got {value}"),
        ))
    }
}

pub(crate) fn singular_at(theta: AngularVector) -> LensError {
    LensError::SingularEvaluation {
        x: theta.x,
        y: theta.y,
    }
}

pub(crate) fn is_origin(theta: &AngularVector) -> bool {
    theta.x == 0.0 && theta.y == 0.0
}

/// A field too large for `f64` this close to a singular center is reported
/// as singular, never returned as ∞ or NaN.
pub(crate) fn finite_deflection(theta: AngularVector, alpha: AngularVector) -> Result<AngularVector> {
    if alpha.x.is_finite() && alpha.y.is_finite() {
        Ok(alpha)
    } else {
        Err(singular_at(theta))
    }
}

pub(crate) fn finite_derivatives(theta: AngularVector, d: Derivatives) -> Result<Derivatives> {
    if d.is_finite() {
        Ok(d)
    } else {
        Err(singular_at(theta))
    }
}

/// Full (unsymmetrized) Jacobian of the deflection by central differences.
#[cfg(test)]
pub(crate) fn central_difference(lens: &dyn LensModel, theta: AngularVector, h: f64) -> Matrix2<f64> {
    let dx = AngularVector::new(h, 0.0);
    let dy = AngularVector::new(0.0, h);
    let along_x = (lens.deflection(theta + dx).unwrap() - lens.deflection(theta - dx).unwrap()) / (2.0 * h);
    let along_y = (lens.deflection(theta + dy).unwrap() - lens.deflection(theta - dy).unwrap()) / (2.0 * h);
    Matrix2::new(along_x.x, along_y.x, along_x.y, along_y.y)
}

/// Checks the closed-form Jacobian against central differences, including
/// both off-diagonal entries.
#[cfg(test)]
pub(crate) fn assert_matches_finite_difference(lens: &dyn LensModel, theta: AngularVector, h: f64) {
    use approx::assert_relative_eq;

    let d = lens.derivatives(theta).unwrap();
    let m = central_difference(lens, theta, h);
    let eps = 1e-6 * d.xx.abs().max(d.yy.abs()).max(d.xy.abs());

    assert_relative_eq!(d.xx, m[(0, 0)], epsilon = eps, max_relative = 1e-6);
    assert_relative_eq!(d.yy, m[(1, 1)], epsilon = eps, max_relative = 1e-6);
    assert_relative_eq!(d.xy, m[(0, 1)], epsilon = eps, max_relative = 1e-6);
    assert_relative_eq!(d.xy, m[(1, 0)], epsilon = eps, max_relative = 1e-6);
}
