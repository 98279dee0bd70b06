use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// Radians per degree
pub const DEG_TO_RAD: f64 = PI / 180.0;

/// Radians per arc-second
pub const ARCSEC_TO_RAD: f64 = PI / (180.0 * 3600.0);

/// A plane angle with radians as the base unit.
///
/// Sky positions, core widths and rotation angles are all carried as
/// `Angle`. Arc-seconds are the usual human-facing unit for lens scales.
///
/// # Examples
///
/// ```rust
/// use units::Angle;
///
/// let core = Angle::from_arcsec(0.5);
/// let tilt = Angle::from_degrees(30.0);
///
/// assert!((core.to_arcsec() - 0.5).abs() < 1e-12);
/// assert!((tilt.to_radians() - std::f64::consts::PI / 6.0).abs() < 1e-15);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Angle(f64); // Base unit: rad

impl Angle {
    pub fn zero() -> Self {
        Self(0.0)
    }

    pub fn from_radians(value: f64) -> Self {
        Self(value)
    }

    pub fn from_degrees(value: f64) -> Self {
        Self(value * DEG_TO_RAD)
    }

    pub fn from_arcmin(value: f64) -> Self {
        Self(value * 60.0 * ARCSEC_TO_RAD)
    }

    pub fn from_arcsec(value: f64) -> Self {
        Self(value * ARCSEC_TO_RAD)
    }

    pub fn to_radians(&self) -> f64 {
        self.0
    }

    pub fn to_degrees(&self) -> f64 {
        self.0 / DEG_TO_RAD
    }

    pub fn to_arcmin(&self) -> f64 {
        self.0 / (60.0 * ARCSEC_TO_RAD)
    }

    pub fn to_arcsec(&self) -> f64 {
        self.0 / ARCSEC_TO_RAD
    }

    /// Sine and cosine of the angle, in that order
    pub fn sin_cos(&self) -> (f64, f64) {
        self.0.sin_cos()
    }

    pub fn is_physical(&self) -> bool {
        self.0.is_finite() && self.0 >= 0.0
    }
}

impl Add for Angle {
    type Output = Angle;

    fn add(self, rhs: Angle) -> Angle {
        Angle(self.0 + rhs.0)
    }
}

impl Sub for Angle {
    type Output = Angle;

    fn sub(self, rhs: Angle) -> Angle {
        Angle(self.0 - rhs.0)
    }
}

impl Neg for Angle {
    type Output = Angle;

    fn neg(self) -> Angle {
        Angle(-self.0)
    }
}

impl Mul<f64> for Angle {
    type Output = Angle;

    fn mul(self, rhs: f64) -> Angle {
        Angle(self.0 * rhs)
    }
}

impl Div<f64> for Angle {
    type Output = Angle;

    fn div(self, rhs: f64) -> Angle {
        Angle(self.0 / rhs)
    }
}

/// Division of Angle by Angle returns a dimensionless ratio
impl Div for Angle {
    type Output = f64;

    fn div(self, rhs: Angle) -> f64 {
        self.0 / rhs.0
    }
}

/// Allow f64 * Angle (commutative multiplication)
impl Mul<Angle> for f64 {
    type Output = Angle;

    fn mul(self, rhs: Angle) -> Angle {
        rhs * self
    }
}
