use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

pub const AU_TO_M: f64 = 1.495978707e11;
pub const PARSEC_TO_M: f64 = 3.085_677_581_491_367_3e16;
pub const KPC_TO_M: f64 = PARSEC_TO_M * 1e3;
pub const MPC_TO_M: f64 = PARSEC_TO_M * 1e6;

/// A physical length quantity using f64 precision.
///
/// The `Length` struct represents length values with meters as the base unit.
/// Cosmological distances are normally given in megaparsecs, galaxy scales in
/// kiloparsecs; both convert through the parsec.
///
/// # Examples
///
/// ```rust
/// use units::Length;
///
/// // Angular diameter distance to a lens at moderate redshift
/// let d_d = Length::from_mpc(1000.0);
/// let core = Length::from_kpc(1.5);
///
/// // Physical core size seen from the lens distance, in radians
/// let angle = core / d_d;
/// assert!(angle < 1e-5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Length(f64); // Base unit: m

impl Length {
    /// Creates a zero length value
    pub fn zero() -> Self {
        Self(0.0)
    }

    /// Creates a new `Length` from a value in meters.
    pub fn from_meters(value: f64) -> Self {
        Self(value)
    }

    /// Creates a new `Length` from a value in kilometers.
    pub fn from_km(value: f64) -> Self {
        Self(value * 1e3)
    }

    /// Creates a new `Length` from a value in astronomical units.
    pub fn from_au(value: f64) -> Self {
        Self(value * AU_TO_M)
    }

    /// Creates a new `Length` from a value in parsecs.
    pub fn from_parsecs(value: f64) -> Self {
        Self(value * PARSEC_TO_M)
    }

    /// Creates a new `Length` from a value in kiloparsecs.
    pub fn from_kpc(value: f64) -> Self {
        Self(value * KPC_TO_M)
    }

    /// Creates a new `Length` from a value in megaparsecs.
    pub fn from_mpc(value: f64) -> Self {
        Self(value * MPC_TO_M)
    }

    /// Returns the length in meters.
    pub fn to_m(&self) -> f64 {
        self.0
    }

    /// Converts the length to kilometers.
    pub fn to_km(&self) -> f64 {
        self.0 / 1e3
    }

    /// Converts the length to astronomical units.
    pub fn to_au(&self) -> f64 {
        self.0 / AU_TO_M
    }

    /// Converts the length to parsecs.
    pub fn to_parsecs(&self) -> f64 {
        self.0 / PARSEC_TO_M
    }

    /// Converts the length to kiloparsecs.
    pub fn to_kpc(&self) -> f64 {
        self.0 / KPC_TO_M
    }

    /// Converts the length to megaparsecs.
    pub fn to_mpc(&self) -> f64 {
        self.0 / MPC_TO_M
    }

    /// Returns the minimum of two lengths.
    pub fn min(self, other: Self) -> Self {
        if self.0 < other.0 {
            self
        } else {
            other
        }
    }

    /// Returns the maximum of two lengths.
    pub fn max(self, other: Self) -> Self {
        if self.0 > other.0 {
            self
        } else {
            other
        }
    }

    /// True when the value is finite and not negative.
    pub fn is_physical(&self) -> bool {
        self.0.is_finite() && self.0 >= 0.0
    }
}

impl Add for Length {
    type Output = Length;

    fn add(self, rhs: Length) -> Length {
        Length(self.0 + rhs.0)
    }
}

impl Sub for Length {
    type Output = Length;

    fn sub(self, rhs: Length) -> Length {
        Length(self.0 - rhs.0)
    }
}

impl Mul<f64> for Length {
    type Output = Length;

    fn mul(self, rhs: f64) -> Length {
        Length(self.0 * rhs)
    }
}

impl Div<f64> for Length {
    type Output = Length;

    fn div(self, rhs: f64) -> Length {
        Length(self.0 / rhs)
    }
}

/// Division of Length by Length returns a dimensionless ratio
impl Div for Length {
    type Output = f64;

    fn div(self, rhs: Self) -> f64 {
        self.0 / rhs.0
    }
}

/// Allow f64 * Length (commutative multiplication)
impl Mul<Length> for f64 {
    type Output = Length;

    fn mul(self, rhs: Length) -> Length {
        rhs * self
    }
}
