//! Angular-diameter distance to the lens plane and the scale factors derived from it.
//!
//! Every lens is initialized with one distance D_d. It is used exactly once,
//! at construction, to turn physical inputs (mass, velocity dispersion,
//! surface density) into the angular constants the profiles evaluate with.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use units::{Length, Mass, SurfaceDensity, Velocity, SPEED_OF_LIGHT_M_S};

use crate::error::{LensError, Result};

/// Newtonian gravitational constant in m³ kg⁻¹ s⁻²
pub const G: f64 = 6.674_30e-11;

/// Speed of light in m/s
pub const SPEED_OF_LIGHT: f64 = SPEED_OF_LIGHT_M_S;

/// Validated angular-diameter distance from the observer to the lens.
///
/// # Examples
///
/// ```
/// use lensing::distance::LensDistance;
/// use units::Length;
///
/// let d_d = LensDistance::new(Length::from_mpc(1000.0)).unwrap();
/// assert!((d_d.length().to_mpc() - 1000.0).abs() < 1e-9);
///
/// assert!(LensDistance::new(Length::zero()).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Length", into = "Length")]
pub struct LensDistance(Length);

impl LensDistance {
    /// Accepts finite, strictly positive distances.
    pub fn new(length: Length) -> Result<Self> {
        let meters = length.to_m();
        if !meters.is_finite() || meters <= 0.0 {
            return Err(LensError::invalid(
                "distance",
                format!("angular diameter distance must be finite and positive, got {meters} m"),
            ));
        }
        Ok(Self(length))
    }

    pub fn from_mpc(value: f64) -> Result<Self> {
        Self::new(Length::from_mpc(value))
    }

    pub fn length(&self) -> Length {
        self.0
    }

    pub fn to_m(&self) -> f64 {
        self.0.to_m()
    }

    /// Plummer/point-mass scale 4 G M / (c² D_d), in rad².
    pub fn plummer_scale(&self, mass: Mass) -> f64 {
        4.0 * G * mass.to_kg() / (SPEED_OF_LIGHT * SPEED_OF_LIGHT * self.to_m())
    }

    /// Isothermal deflection scale 4 π σ² / c², in radians.
    ///
    /// This is the Einstein radius of an isothermal sphere for a source at
    /// infinite distance; it does not depend on D_d.
    pub fn isothermal_scale(&self, velocity_dispersion: Velocity) -> f64 {
        let beta = velocity_dispersion.beta();
        4.0 * PI * beta * beta
    }

    /// Mass-sheet scale 4 π G Σ D_d / c² (dimensionless).
    pub fn sheet_scale(&self, density: SurfaceDensity) -> f64 {
        4.0 * PI * G * density.to_kg_per_m2() * self.to_m() / (SPEED_OF_LIGHT * SPEED_OF_LIGHT)
    }

    /// c² / (8 π G D_d) in kg/m², half the critical density for a distant source.
    pub fn critical_density_factor(&self) -> f64 {
        SPEED_OF_LIGHT * SPEED_OF_LIGHT / (8.0 * PI * G * self.to_m())
    }

    /// Converts the trace of a deflection Jacobian into projected density.
    ///
    /// Σ(θ) = c² / (8 π G D_d) · (∂αx/∂x + ∂αy/∂y)
    pub fn density_from_trace(&self, trace: f64) -> SurfaceDensity {
        SurfaceDensity::from_kg_per_m2(self.critical_density_factor() * trace)
    }
}

impl TryFrom<Length> for LensDistance {
    type Error = LensError;

    fn try_from(length: Length) -> Result<Self> {
        Self::new(length)
    }
}

impl From<LensDistance> for Length {
    fn from(distance: LensDistance) -> Length {
        distance.0
    }
}
