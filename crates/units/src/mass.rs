use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

/// Mass of the Sun in kilograms (1.98847 × 10³⁰ kg)
pub const SOLAR_MASS_KG: f64 = 1.98847e30;

/// Mass of the Earth in kilograms (5.972 × 10²⁴ kg)
pub const EARTH_MASS_KG: f64 = 5.972e24;

/// A physical mass quantity using f64 precision.
///
/// The `Mass` struct stores kilograms as the base unit so that lens scale
/// factors can be formed directly from SI constants. Galaxy and cluster
/// masses are usually quoted in solar masses, which is what the
/// astronomical constructors are for.
///
/// # Examples
///
/// ```rust
/// use units::Mass;
///
/// let galaxy = Mass::from_solar_masses(1e12);
/// let cluster = Mass::from_solar_masses(1e15);
///
/// let in_kg = galaxy.to_kg();
/// assert!(cluster > galaxy);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Mass(f64); // Base unit: kg

impl Mass {
    /// Creates a zero mass value
    pub fn zero() -> Self {
        Self(0.0)
    }

    /// Creates a new `Mass` from a value in kilograms.
    ///
    /// This is the most direct constructor since kilograms are the base unit.
    pub fn from_kg(value: f64) -> Self {
        Self(value)
    }

    /// Creates a new `Mass` from a value in grams.
    pub fn from_grams(value: f64) -> Self {
        Self(value / 1000.0)
    }

    /// Creates a new `Mass` from a value in solar masses.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use units::Mass;
    ///
    /// let sun = Mass::from_solar_masses(1.0);
    /// assert_eq!(sun.to_kg(), units::mass::SOLAR_MASS_KG);
    /// ```
    pub fn from_solar_masses(value: f64) -> Self {
        Self(value * SOLAR_MASS_KG)
    }

    /// Creates a new `Mass` from a value in Earth masses.
    pub fn from_earth_masses(value: f64) -> Self {
        Self(value * EARTH_MASS_KG)
    }

    /// Returns the mass in kilograms.
    pub fn to_kg(&self) -> f64 {
        self.0
    }

    /// Converts the mass to grams.
    pub fn to_grams(&self) -> f64 {
        self.0 * 1000.0
    }

    /// Converts the mass to solar masses.
    pub fn to_solar_masses(&self) -> f64 {
        self.0 / SOLAR_MASS_KG
    }

    /// Converts the mass to Earth masses.
    pub fn to_earth_masses(&self) -> f64 {
        self.0 / EARTH_MASS_KG
    }

    /// True when the value is a usable physical mass (finite and not negative).
    pub fn is_physical(&self) -> bool {
        self.0.is_finite() && self.0 >= 0.0
    }
}

impl Add for Mass {
    type Output = Mass;

    fn add(self, rhs: Mass) -> Mass {
        Mass(self.0 + rhs.0)
    }
}

impl Sub for Mass {
    type Output = Mass;

    fn sub(self, rhs: Mass) -> Mass {
        Mass(self.0 - rhs.0)
    }
}

impl Mul<f64> for Mass {
    type Output = Mass;

    fn mul(self, rhs: f64) -> Mass {
        Mass(self.0 * rhs)
    }
}

impl Div<f64> for Mass {
    type Output = Mass;

    fn div(self, rhs: f64) -> Mass {
        Mass(self.0 / rhs)
    }
}

/// Division of Mass by Mass returns a dimensionless ratio
impl Div for Mass {
    type Output = f64;

    fn div(self, rhs: Mass) -> f64 {
        self.0 / rhs.0
    }
}

/// Allow f64 * Mass (commutative multiplication)
impl Mul<Mass> for f64 {
    type Output = Mass;

    fn mul(self, rhs: Mass) -> Mass {
        rhs * self
    }
}
