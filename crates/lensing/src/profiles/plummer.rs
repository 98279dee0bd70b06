//! Plummer sphere

use units::{Angle, Mass};

use crate::distance::LensDistance;
use crate::error::Result;
use crate::lens::{LensModel, ProfileKind};
use crate::params::LensParams;
use crate::profiles::{finite_deflection, finite_derivatives, is_origin, require_physical, singular_at};
use crate::vector::{AngularVector, Derivatives};

/// A Plummer mass distribution of total mass M and angular core width w.
///
/// ```text
/// α(θ) = S θ / (|θ|² + w²),    S = 4 G M / (c² D_d)
/// ```
///
/// The deflection rises linearly inside the core, peaks at |θ| = w and
/// falls off as 1/|θ| like a point mass outside it. With w = 0 it is a point
/// mass, singular at the origin.
///
/// # Examples
///
/// ```
/// use lensing::distance::LensDistance;
/// use lensing::lens::LensModel;
/// use lensing::profiles::PlummerLens;
/// use lensing::vector::angular_vector_arcsec;
/// use units::{Angle, Mass};
///
/// let d_d = LensDistance::from_mpc(1000.0).unwrap();
/// let lens = PlummerLens::new(d_d, Mass::from_solar_masses(1e13), Angle::from_arcsec(2.0)).unwrap();
///
/// let inner = lens.deflection(angular_vector_arcsec(1.0, 0.0)).unwrap();
/// let peak = lens.deflection(angular_vector_arcsec(2.0, 0.0)).unwrap();
/// let outer = lens.deflection(angular_vector_arcsec(8.0, 0.0)).unwrap();
/// assert!(inner.x < peak.x && outer.x < peak.x);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PlummerLens {
    distance: LensDistance,
    mass: Mass,
    angular_width: Angle,
    scale: f64,
    width: f64,
}

impl PlummerLens {
    pub fn new(distance: LensDistance, mass: Mass, angular_width: Angle) -> Result<Self> {
        require_physical("mass", mass.is_physical(), mass.to_kg())?;
        require_physical("angular_width", angular_width.is_physical(), angular_width.to_radians())?;

        Ok(Self {
            distance,
            mass,
            angular_width,
            scale: distance.plummer_scale(mass),
            width: angular_width.to_radians(),
        })
    }

    pub fn mass(&self) -> Mass {
        self.mass
    }

    pub fn angular_width(&self) -> Angle {
        self.angular_width
    }

    fn check(&self, theta: AngularVector) -> Result<()> {
        if self.width == 0.0 && is_origin(&theta) {
            return Err(singular_at(theta));
        }
        Ok(())
    }

    /// Position and width divided by the largest of |x|, |y| and w, so the
    /// squares neither underflow near a point mass nor overflow far out.
    fn rescaled(&self, theta: AngularVector) -> (f64, f64, f64, f64) {
        let m = theta.x.abs().max(theta.y.abs()).max(self.width);
        (theta.x / m, theta.y / m, self.width / m, m)
    }
}

impl LensModel for PlummerLens {
    fn kind(&self) -> ProfileKind {
        ProfileKind::Plummer
    }

    fn distance(&self) -> LensDistance {
        self.distance
    }

    fn deflection(&self, theta: AngularVector) -> Result<AngularVector> {
        self.check(theta)?;
        let (x, y, w, m) = self.rescaled(theta);
        let denom = x * x + y * y + w * w;
        let alpha = AngularVector::new(x, y) * (self.scale / m / denom);
        finite_deflection(theta, alpha)
    }

    fn derivatives(&self, theta: AngularVector) -> Result<Derivatives> {
        self.check(theta)?;
        let (x, y, w, m) = self.rescaled(theta);
        let denom = x * x + y * y + w * w;
        let factor = self.scale / m / m / (denom * denom);

        finite_derivatives(
            theta,
            Derivatives::new(
                factor * (w * w + y * y - x * x),
                factor * (w * w + x * x - y * y),
                -2.0 * factor * x * y,
            ),
        )
    }

    fn params(&self) -> LensParams {
        LensParams::Plummer {
            distance: self.distance.length(),
            mass: self.mass,
            angular_width: self.angular_width,
        }
    }
}
