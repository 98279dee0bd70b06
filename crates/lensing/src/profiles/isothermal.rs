//! Circular isothermal spheres, singular and cored

use units::{Angle, Velocity};

use crate::distance::LensDistance;
use crate::error::Result;
use crate::lens::{LensModel, ProfileKind};
use crate::params::LensParams;
use crate::profiles::{finite_deflection, finite_derivatives, is_origin, require_physical, singular_at};
use crate::vector::{AngularVector, Derivatives};

/// Singular isothermal sphere.
///
/// The deflection has constant magnitude A = 4 π σ² / c² and points along θ:
///
/// ```text
/// α(θ) = A θ / |θ|
/// ```
///
/// The direction is undefined at the center, so the origin is singular.
#[derive(Debug, Clone, PartialEq)]
pub struct SisLens {
    distance: LensDistance,
    velocity_dispersion: Velocity,
    scale: f64,
}

impl SisLens {
    pub fn new(distance: LensDistance, velocity_dispersion: Velocity) -> Result<Self> {
        require_physical(
            "velocity_dispersion",
            velocity_dispersion.is_physical(),
            velocity_dispersion.to_meters_per_sec(),
        )?;
        Ok(Self {
            distance,
            velocity_dispersion,
            scale: distance.isothermal_scale(velocity_dispersion),
        })
    }

    pub fn velocity_dispersion(&self) -> Velocity {
        self.velocity_dispersion
    }

    /// Deflection magnitude, equal to the Einstein radius for a distant source
    pub fn einstein_angle(&self) -> Angle {
        Angle::from_radians(self.scale)
    }
}

impl LensModel for SisLens {
    fn kind(&self) -> ProfileKind {
        ProfileKind::Sis
    }

    fn distance(&self) -> LensDistance {
        self.distance
    }

    fn deflection(&self, theta: AngularVector) -> Result<AngularVector> {
        if is_origin(&theta) {
            return Err(singular_at(theta));
        }
        let r = theta.x.hypot(theta.y);
        finite_deflection(theta, theta.unscale(r) * self.scale)
    }

    fn derivatives(&self, theta: AngularVector) -> Result<Derivatives> {
        if is_origin(&theta) {
            return Err(singular_at(theta));
        }
        let r = theta.x.hypot(theta.y);
        let (ux, uy) = (theta.x / r, theta.y / r);
        let factor = self.scale / r;

        finite_derivatives(
            theta,
            Derivatives::new(factor * uy * uy, factor * ux * ux, -factor * ux * uy),
        )
    }

    fn params(&self) -> LensParams {
        LensParams::Sis {
            distance: self.distance.length(),
            velocity_dispersion: self.velocity_dispersion,
        }
    }
}

/// Non-singular isothermal sphere with angular core radius s.
///
/// ```text
/// α(θ) = A (√(|θ|² + s²) − s) / |θ|² · θ
/// ```
///
/// The radial factor is evaluated as 1 / (√(|θ|² + s²) + s), which is the
/// same quantity without the cancellation, so it stays finite at the center
/// for s > 0 and reduces exactly to the SIS for s = 0.
#[derive(Debug, Clone, PartialEq)]
pub struct NsisLens {
    distance: LensDistance,
    velocity_dispersion: Velocity,
    core_radius: Angle,
    scale: f64,
    core: f64,
}

impl NsisLens {
    pub fn new(distance: LensDistance, velocity_dispersion: Velocity, core_radius: Angle) -> Result<Self> {
        require_physical(
            "velocity_dispersion",
            velocity_dispersion.is_physical(),
            velocity_dispersion.to_meters_per_sec(),
        )?;
        require_physical("core_radius", core_radius.is_physical(), core_radius.to_radians())?;
        Ok(Self {
            distance,
            velocity_dispersion,
            core_radius,
            scale: distance.isothermal_scale(velocity_dispersion),
            core: core_radius.to_radians(),
        })
    }

    pub fn velocity_dispersion(&self) -> Velocity {
        self.velocity_dispersion
    }

    pub fn core_radius(&self) -> Angle {
        self.core_radius
    }

    fn check(&self, theta: AngularVector) -> Result<()> {
        if self.core == 0.0 && is_origin(&theta) {
            return Err(singular_at(theta));
        }
        Ok(())
    }

    /// Position and core divided by the largest of |x|, |y| and s.
    fn rescaled(&self, theta: AngularVector) -> (f64, f64, f64, f64) {
        let m = theta.x.abs().max(theta.y.abs()).max(self.core);
        (theta.x / m, theta.y / m, self.core / m, m)
    }
}

impl LensModel for NsisLens {
    fn kind(&self) -> ProfileKind {
        ProfileKind::Nsis
    }

    fn distance(&self) -> LensDistance {
        self.distance
    }

    fn deflection(&self, theta: AngularVector) -> Result<AngularVector> {
        self.check(theta)?;
        let (x, y, s, _) = self.rescaled(theta);
        let root = (x * x + y * y + s * s).sqrt();
        finite_deflection(theta, AngularVector::new(x, y) * (self.scale / (root + s)))
    }

    fn derivatives(&self, theta: AngularVector) -> Result<Derivatives> {
        self.check(theta)?;
        let (x, y, s, m) = self.rescaled(theta);
        let root = (x * x + y * y + s * s).sqrt();
        let sum = root + s;
        let radial = 1.0 / sum;
        let cross = 1.0 / (root * sum * sum);
        let scale = self.scale / m;

        finite_derivatives(
            theta,
            Derivatives::new(
                scale * (radial - x * x * cross),
                scale * (radial - y * y * cross),
                -scale * x * y * cross,
            ),
        )
    }

    fn params(&self) -> LensParams {
        LensParams::Nsis {
            distance: self.distance.length(),
            velocity_dispersion: self.velocity_dispersion,
            core_radius: self.core_radius,
        }
    }
}
