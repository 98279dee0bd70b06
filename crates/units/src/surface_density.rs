use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

use crate::length::PARSEC_TO_M;
use crate::mass::SOLAR_MASS_KG;

/// A physical surface density quantity using f64 precision.
///
/// The `SurfaceDensity` struct represents projected mass per area with
/// kilograms per square meter as the base unit. Lensing work commonly quotes
/// surface densities in M☉/pc² or g/cm²; the critical density for a
/// galaxy-scale lens is of order a few g/cm².
///
/// # Examples
///
/// ```rust
/// use units::SurfaceDensity;
///
/// let sheet = SurfaceDensity::from_grams_per_cm2(0.5);
/// assert_eq!(sheet.to_kg_per_m2(), 5.0);
///
/// let disk = SurfaceDensity::from_solar_masses_per_pc2(100.0);
/// assert!(disk.to_kg_per_m2() > 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Deserialize, Serialize)]
#[serde(transparent)]
pub struct SurfaceDensity(f64); // Base unit: kg/m²

impl SurfaceDensity {
    /// Creates a zero surface density value
    pub fn zero() -> Self {
        Self(0.0)
    }

    /// Creates a new `SurfaceDensity` from a value in kilograms per square meter.
    pub fn from_kg_per_m2(value: f64) -> Self {
        Self(value)
    }

    /// Creates a new `SurfaceDensity` from a value in grams per square centimeter.
    ///
    /// 1 g/cm² = 10 kg/m²
    pub fn from_grams_per_cm2(value: f64) -> Self {
        Self(value * 10.0)
    }

    /// Creates a new `SurfaceDensity` from solar masses per square parsec.
    pub fn from_solar_masses_per_pc2(value: f64) -> Self {
        Self(value * SOLAR_MASS_KG / (PARSEC_TO_M * PARSEC_TO_M))
    }

    /// Returns the surface density in kg/m²
    pub fn to_kg_per_m2(&self) -> f64 {
        self.0
    }

    /// Converts the surface density to g/cm²
    pub fn to_grams_per_cm2(&self) -> f64 {
        self.0 * 0.1
    }

    /// Converts the surface density to M☉/pc²
    pub fn to_solar_masses_per_pc2(&self) -> f64 {
        self.0 * PARSEC_TO_M * PARSEC_TO_M / SOLAR_MASS_KG
    }

    pub fn is_physical(&self) -> bool {
        self.0.is_finite() && self.0 >= 0.0
    }
}

impl Add for SurfaceDensity {
    type Output = SurfaceDensity;

    fn add(self, rhs: SurfaceDensity) -> SurfaceDensity {
        SurfaceDensity(self.0 + rhs.0)
    }
}

impl Sub for SurfaceDensity {
    type Output = SurfaceDensity;

    fn sub(self, rhs: SurfaceDensity) -> SurfaceDensity {
        SurfaceDensity(self.0 - rhs.0)
    }
}

impl Mul<f64> for SurfaceDensity {
    type Output = SurfaceDensity;

    fn mul(self, rhs: f64) -> SurfaceDensity {
        SurfaceDensity(self.0 * rhs)
    }
}

impl Div<f64> for SurfaceDensity {
    type Output = SurfaceDensity;

    fn div(self, rhs: f64) -> SurfaceDensity {
        SurfaceDensity(self.0 / rhs)
    }
}

/// Division of SurfaceDensity by SurfaceDensity returns a ratio
impl Div for SurfaceDensity {
    type Output = f64;

    fn div(self, rhs: SurfaceDensity) -> f64 {
        self.0 / rhs.0
    }
}

/// Allow f64 * SurfaceDensity (commutative multiplication)
impl Mul<SurfaceDensity> for f64 {
    type Output = SurfaceDensity;

    fn mul(self, rhs: SurfaceDensity) -> SurfaceDensity {
        rhs * self
    }
}
