//! Angular vectors and the symmetric deflection Jacobian.
//!
//! Positions and deflections are plain `nalgebra::Vector2<f64>` values in
//! radians. Conversions to arc-seconds happen at the edges through
//! [`units::Angle`], never inside the profiles.

use std::ops::{Add, Mul};

use nalgebra::{Matrix2, Rotation2, Vector2};
use serde::{Deserialize, Serialize};
use units::Angle;

/// A sky position or deflection angle, in radians.
pub type AngularVector = Vector2<f64>;

/// Builds an angular vector from arc-second components.
///
/// # Examples
///
/// ```
/// use lensing::vector::angular_vector_arcsec;
///
/// let theta = angular_vector_arcsec(1.0, 0.0);
/// assert!((theta.x - 4.848136811e-6).abs() < 1e-14);
/// assert_eq!(theta.y, 0.0);
/// ```
pub fn angular_vector_arcsec(x: f64, y: f64) -> AngularVector {
    Vector2::new(
        Angle::from_arcsec(x).to_radians(),
        Angle::from_arcsec(y).to_radians(),
    )
}

/// Expresses an angular vector in arc-seconds, component by component.
pub fn to_arcsec(v: &AngularVector) -> [f64; 2] {
    [
        Angle::from_radians(v.x).to_arcsec(),
        Angle::from_radians(v.y).to_arcsec(),
    ]
}

/// Spatial derivatives of the deflection field.
///
/// The Jacobian of a deflection field is symmetric (the field is a gradient),
/// so three components describe it completely:
///
/// ```text
/// | xx  xy |     xx = ∂αx/∂x,  yy = ∂αy/∂y,  xy = ∂αx/∂y = ∂αy/∂x
/// | xy  yy |
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Derivatives {
    pub xx: f64,
    pub yy: f64,
    pub xy: f64,
}

impl Derivatives {
    pub fn new(xx: f64, yy: f64, xy: f64) -> Self {
        Self { xx, yy, xy }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    pub fn to_matrix(&self) -> Matrix2<f64> {
        Matrix2::new(self.xx, self.xy, self.xy, self.yy)
    }

    /// Reads the symmetric part of a 2×2 matrix.
    pub fn from_matrix(m: &Matrix2<f64>) -> Self {
        Self {
            xx: m[(0, 0)],
            yy: m[(1, 1)],
            xy: 0.5 * (m[(0, 1)] + m[(1, 0)]),
        }
    }

    /// The Jacobian of the same field after rotating its frame by `angle`.
    ///
    /// A deflection vector rotates as `R α`, its Jacobian as `R J Rᵀ`.
    pub fn rotated(&self, angle: Angle) -> Self {
        self.rotated_by(&Rotation2::new(angle.to_radians()))
    }

    pub fn rotated_by(&self, rotation: &Rotation2<f64>) -> Self {
        let r = rotation.matrix();
        Self::from_matrix(&(r * self.to_matrix() * r.transpose()))
    }

    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            xx: self.xx * factor,
            yy: self.yy * factor,
            xy: self.xy * factor,
        }
    }

    /// Sum of the diagonal, twice the convergence in deflection units
    pub fn trace(&self) -> f64 {
        self.xx + self.yy
    }

    /// Exchanges the roles of the x and y axes.
    pub fn swapped_axes(&self) -> Self {
        Self {
            xx: self.yy,
            yy: self.xx,
            xy: self.xy,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.xx.is_finite() && self.yy.is_finite() && self.xy.is_finite()
    }
}

impl Add for Derivatives {
    type Output = Derivatives;

    fn add(self, rhs: Derivatives) -> Derivatives {
        Derivatives {
            xx: self.xx + rhs.xx,
            yy: self.yy + rhs.yy,
            xy: self.xy + rhs.xy,
        }
    }
}

impl Mul<f64> for Derivatives {
    type Output = Derivatives;

    fn mul(self, rhs: f64) -> Derivatives {
        self.scaled(rhs)
    }
}
