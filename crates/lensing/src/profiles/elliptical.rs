//! Isothermal ellipsoids, singular and cored.
//!
//! Both share one closed-form kernel. With axis ratio q = 1 − ε,
//! e = √(1 − q²) and ω = √(q² (x² + s²) + y²), the convergence is
//! κ ∝ √q / (2ω) (major axis along x) and the deflection is
//!
//! ```text
//! αx = A √q · atan(e x / (ω + s)) / e
//! αy = A √q · atanh(e y / (ω + q² s)) / e
//! ```
//!
//! with A = 4 π σ² / c². For ε → 0 the ratios atan(e z)/e and atanh(e z)/e
//! are taken from their Taylor series, so a round ellipsoid reproduces the
//! isothermal sphere instead of dividing by zero.

use units::{Angle, Velocity};

use crate::distance::LensDistance;
use crate::error::Result;
use crate::lens::{LensModel, ProfileKind};
use crate::params::LensParams;
use crate::profiles::{
    finite_deflection, finite_derivatives, is_origin, require_ellipticity, require_physical, singular_at,
};
use crate::vector::{AngularVector, Derivatives};

/// Below this eccentricity the series forms are used.
const SERIES_LIMIT: f64 = 1e-4;

/// atan(e z) / e
fn atan_ratio(e: f64, z: f64) -> f64 {
    if e < SERIES_LIMIT {
        let t = (e * z) * (e * z);
        z * (1.0 - t / 3.0 + t * t / 5.0)
    } else {
        (e * z).atan() / e
    }
}

/// atanh(e z) / e
fn atanh_ratio(e: f64, z: f64) -> f64 {
    if e < SERIES_LIMIT {
        let t = (e * z) * (e * z);
        z * (1.0 + t / 3.0 + t * t / 5.0)
    } else {
        (e * z).atanh() / e
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct EllipticalKernel {
    /// A √q
    strength: f64,
    q: f64,
    e: f64,
    core: f64,
}

impl EllipticalKernel {
    fn new(scale: f64, ellipticity: f64, core: f64) -> Self {
        let q = 1.0 - ellipticity;
        Self {
            strength: scale * q.sqrt(),
            q,
            // 1 − q² without cancellation for small ε
            e: (ellipticity * (2.0 - ellipticity)).sqrt(),
            core,
        }
    }

    /// Position and core divided by the largest of |x|, |y| and s. The
    /// deflection is unchanged by this rescaling and the Jacobian scales
    /// by 1/m.
    fn rescaled(&self, theta: AngularVector) -> (f64, f64, f64, f64) {
        let m = theta.x.abs().max(theta.y.abs()).max(self.core);
        (theta.x / m, theta.y / m, self.core / m, m)
    }

    fn omega(&self, x: f64, y: f64, core: f64) -> f64 {
        let q2 = self.q * self.q;
        (q2 * (x * x + core * core) + y * y).sqrt()
    }

    fn check(&self, theta: AngularVector) -> Result<()> {
        if self.core == 0.0 && is_origin(&theta) {
            return Err(singular_at(theta));
        }
        Ok(())
    }

    fn deflection(&self, theta: AngularVector) -> Result<AngularVector> {
        self.check(theta)?;
        let (x, y, s, _) = self.rescaled(theta);
        let omega = self.omega(x, y, s);
        let q2s = self.q * self.q * s;

        finite_deflection(
            theta,
            AngularVector::new(
                self.strength * atan_ratio(self.e, x / (omega + s)),
                self.strength * atanh_ratio(self.e, y / (omega + q2s)),
            ),
        )
    }

    fn derivatives(&self, theta: AngularVector) -> Result<Derivatives> {
        self.check(theta)?;
        let (x, y, s, m) = self.rescaled(theta);
        let q2 = self.q * self.q;
        let omega = self.omega(x, y, s);
        let wx = omega + s;
        let wy = omega + q2 * s;
        let u = self.e * x / wx;
        let v = self.e * y / wy;
        let du = 1.0 + u * u;
        let dv = 1.0 - v * v;
        let strength = self.strength / m;

        finite_derivatives(
            theta,
            Derivatives::new(
                strength / du * (1.0 / wx - q2 * x * x / (omega * wx * wx)),
                strength / dv * (1.0 / wy - y * y / (omega * wy * wy)),
                -strength * x * y / (du * omega * wx * wx),
            ),
        )
    }
}

/// Singular isothermal ellipsoid: the isothermal sphere flattened to axis
/// ratio 1 − ε, with the major axis along x.
///
/// # Examples
///
/// ```
/// use lensing::distance::LensDistance;
/// use lensing::lens::LensModel;
/// use lensing::profiles::SieLens;
/// use lensing::vector::angular_vector_arcsec;
/// use units::Velocity;
///
/// let d_d = LensDistance::from_mpc(800.0).unwrap();
/// let sie = SieLens::new(d_d, Velocity::from_km_per_sec(200.0), 0.3).unwrap();
///
/// // Deflection along the minor axis is stronger than along the major axis
/// let major = sie.deflection(angular_vector_arcsec(1.0, 0.0)).unwrap();
/// let minor = sie.deflection(angular_vector_arcsec(0.0, 1.0)).unwrap();
/// assert!(minor.y > major.x);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SieLens {
    distance: LensDistance,
    velocity_dispersion: Velocity,
    ellipticity: f64,
    kernel: EllipticalKernel,
}

impl SieLens {
    pub fn new(distance: LensDistance, velocity_dispersion: Velocity, ellipticity: f64) -> Result<Self> {
        require_physical(
            "velocity_dispersion",
            velocity_dispersion.is_physical(),
            velocity_dispersion.to_meters_per_sec(),
        )?;
        require_ellipticity(ellipticity)?;
        Ok(Self {
            distance,
            velocity_dispersion,
            ellipticity,
            kernel: EllipticalKernel::new(distance.isothermal_scale(velocity_dispersion), ellipticity, 0.0),
        })
    }

    pub fn velocity_dispersion(&self) -> Velocity {
        self.velocity_dispersion
    }

    pub fn ellipticity(&self) -> f64 {
        self.ellipticity
    }

    /// Minor-to-major axis ratio, 1 − ε
    pub fn axis_ratio(&self) -> f64 {
        self.kernel.q
    }
}

impl LensModel for SieLens {
    fn kind(&self) -> ProfileKind {
        ProfileKind::Sie
    }

    fn distance(&self) -> LensDistance {
        self.distance
    }

    fn deflection(&self, theta: AngularVector) -> Result<AngularVector> {
        self.kernel.deflection(theta)
    }

    fn derivatives(&self, theta: AngularVector) -> Result<Derivatives> {
        self.kernel.derivatives(theta)
    }

    fn params(&self) -> LensParams {
        LensParams::Sie {
            distance: self.distance.length(),
            velocity_dispersion: self.velocity_dispersion,
            ellipticity: self.ellipticity,
        }
    }
}

/// Non-singular isothermal ellipsoid with angular core radius s.
///
/// s = 0 gives back the SIE; ε = 0 gives back the NSIS.
#[derive(Debug, Clone, PartialEq)]
pub struct NsieLens {
    distance: LensDistance,
    velocity_dispersion: Velocity,
    ellipticity: f64,
    core_radius: Angle,
    kernel: EllipticalKernel,
}

impl NsieLens {
    pub fn new(
        distance: LensDistance,
        velocity_dispersion: Velocity,
        ellipticity: f64,
        core_radius: Angle,
    ) -> Result<Self> {
        require_physical(
            "velocity_dispersion",
            velocity_dispersion.is_physical(),
            velocity_dispersion.to_meters_per_sec(),
        )?;
        require_ellipticity(ellipticity)?;
        require_physical("core_radius", core_radius.is_physical(), core_radius.to_radians())?;
        Ok(Self {
            distance,
            velocity_dispersion,
            ellipticity,
            core_radius,
            kernel: EllipticalKernel::new(
                distance.isothermal_scale(velocity_dispersion),
                ellipticity,
                core_radius.to_radians(),
            ),
        })
    }

    pub fn velocity_dispersion(&self) -> Velocity {
        self.velocity_dispersion
    }

    pub fn ellipticity(&self) -> f64 {
        self.ellipticity
    }

    pub fn core_radius(&self) -> Angle {
        self.core_radius
    }
}

impl LensModel for NsieLens {
    fn kind(&self) -> ProfileKind {
        ProfileKind::Nsie
    }

    fn distance(&self) -> LensDistance {
        self.distance
    }

    fn deflection(&self, theta: AngularVector) -> Result<AngularVector> {
        self.kernel.deflection(theta)
    }

    fn derivatives(&self, theta: AngularVector) -> Result<Derivatives> {
        self.kernel.derivatives(theta)
    }

    fn params(&self) -> LensParams {
        LensParams::Nsie {
            distance: self.distance.length(),
            velocity_dispersion: self.velocity_dispersion,
            ellipticity: self.ellipticity,
            core_radius: self.core_radius,
        }
    }
}
