//! Uniform mass sheet

use units::SurfaceDensity;

use crate::distance::LensDistance;
use crate::error::Result;
use crate::lens::{LensModel, ProfileKind};
use crate::params::LensParams;
use crate::profiles::require_physical;
use crate::vector::{AngularVector, Derivatives};

/// An infinite sheet of constant surface density Σ.
///
/// ```text
/// α(θ) = f θ,    f = 4 π G Σ D_d / c²
/// ```
///
/// Regular everywhere; the Jacobian is the constant diag(f, f).
#[derive(Debug, Clone, PartialEq)]
pub struct MassSheetLens {
    distance: LensDistance,
    density: SurfaceDensity,
    factor: f64,
}

impl MassSheetLens {
    pub fn new(distance: LensDistance, density: SurfaceDensity) -> Result<Self> {
        require_physical("surface_density", density.is_physical(), density.to_kg_per_m2())?;
        Ok(Self {
            distance,
            density,
            factor: distance.sheet_scale(density),
        })
    }

    pub fn density(&self) -> SurfaceDensity {
        self.density
    }
}

impl LensModel for MassSheetLens {
    fn kind(&self) -> ProfileKind {
        ProfileKind::MassSheet
    }

    fn distance(&self) -> LensDistance {
        self.distance
    }

    fn deflection(&self, theta: AngularVector) -> Result<AngularVector> {
        Ok(theta * self.factor)
    }

    fn derivatives(&self, _theta: AngularVector) -> Result<Derivatives> {
        Ok(Derivatives::new(self.factor, self.factor, 0.0))
    }

    fn params(&self) -> LensParams {
        LensParams::MassSheet {
            distance: self.distance.length(),
            surface_density: self.density,
        }
    }
}
