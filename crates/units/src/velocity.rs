use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

/// Speed of light in vacuum, m/s
pub const SPEED_OF_LIGHT_M_S: f64 = 299_792_458.0;

/// A velocity magnitude with meters per second as the base unit.
///
/// Lens models use it for line-of-sight velocity dispersions, which are
/// quoted in km/s in the literature.
///
/// # Examples
///
/// ```rust
/// use units::Velocity;
///
/// let sigma = Velocity::from_km_per_sec(250.0);
/// assert_eq!(sigma.to_meters_per_sec(), 250_000.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Velocity(f64); // Base unit: m/s

impl Velocity {
    pub fn zero() -> Self {
        Self(0.0)
    }

    pub fn from_meters_per_sec(value: f64) -> Self {
        Self(value)
    }

    pub fn from_km_per_sec(value: f64) -> Self {
        Self(value * 1e3)
    }

    pub fn from_cm_per_sec(value: f64) -> Self {
        Self(value / 100.0)
    }

    pub fn to_meters_per_sec(&self) -> f64 {
        self.0
    }

    pub fn to_km_per_sec(&self) -> f64 {
        self.0 / 1e3
    }

    pub fn to_cm_per_sec(&self) -> f64 {
        self.0 * 100.0
    }

    /// Velocity as a fraction of the speed of light
    pub fn beta(&self) -> f64 {
        self.0 / SPEED_OF_LIGHT_M_S
    }

    pub fn is_physical(&self) -> bool {
        self.0.is_finite() && self.0 >= 0.0
    }
}

impl Add for Velocity {
    type Output = Velocity;

    fn add(self, rhs: Velocity) -> Velocity {
        Velocity(self.0 + rhs.0)
    }
}

impl Sub for Velocity {
    type Output = Velocity;

    fn sub(self, rhs: Velocity) -> Velocity {
        Velocity(self.0 - rhs.0)
    }
}

impl Mul<f64> for Velocity {
    type Output = Velocity;

    fn mul(self, rhs: f64) -> Velocity {
        Velocity(self.0 * rhs)
    }
}

impl Div<f64> for Velocity {
    type Output = Velocity;

    fn div(self, rhs: f64) -> Velocity {
        Velocity(self.0 / rhs)
    }
}
