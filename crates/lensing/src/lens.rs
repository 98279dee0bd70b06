//! The lens capability shared by every profile and by composites.
//!
//! [`LensModel`] is the query surface; [`Lens`] is the closed set of
//! variants, dispatched by match. Adding a profile means adding one variant
//! here, one in [`crate::params::LensParams`] and one codec case.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;
use units::SurfaceDensity;

use crate::composite::CompositeLens;
use crate::distance::LensDistance;
use crate::error::{LensError, Result};
use crate::params::LensParams;
use crate::profiles::{MassSheetLens, NsieLens, NsisLens, PlummerLens, SieLens, SisLens};
use crate::vector::{AngularVector, Derivatives};

/// Stable identity of a lens variant.
///
/// The discriminants are the record tags of the binary model format and
/// must never be renumbered.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileKind {
    Plummer = 1,
    Sis = 2,
    Nsis = 3,
    Sie = 4,
    Nsie = 5,
    MassSheet = 6,
    Composite = 7,
}

impl ProfileKind {
    pub const ALL: [ProfileKind; 7] = [
        ProfileKind::Plummer,
        ProfileKind::Sis,
        ProfileKind::Nsis,
        ProfileKind::Sie,
        ProfileKind::Nsie,
        ProfileKind::MassSheet,
        ProfileKind::Composite,
    ];

    pub fn tag(self) -> u8 {
        self as u8
    }

    pub fn from_tag(tag: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.tag() == tag)
    }

    pub fn name(self) -> &'static str {
        match self {
            ProfileKind::Plummer => "plummer",
            ProfileKind::Sis => "sis",
            ProfileKind::Nsis => "nsis",
            ProfileKind::Sie => "sie",
            ProfileKind::Nsie => "nsie",
            ProfileKind::MassSheet => "mass_sheet",
            ProfileKind::Composite => "composite",
        }
    }
}

impl fmt::Display for ProfileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A deflection field that can be queried at any sky position.
///
/// Implementations are immutable after construction, so a single instance
/// may be queried from many threads at once.
///
/// # Examples
///
/// ```
/// use lensing::distance::LensDistance;
/// use lensing::lens::LensModel;
/// use lensing::profiles::SisLens;
/// use lensing::vector::angular_vector_arcsec;
/// use units::Velocity;
///
/// let d_d = LensDistance::from_mpc(1000.0).unwrap();
/// let sis = SisLens::new(d_d, Velocity::from_km_per_sec(250.0)).unwrap();
///
/// let alpha = sis.deflection(angular_vector_arcsec(1.0, 0.0)).unwrap();
/// // Pulls toward the center, along the position vector
/// assert!(alpha.x > 0.0);
/// assert!(alpha.y.abs() < 1e-20);
/// ```
pub trait LensModel: Send + Sync {
    /// Which variant this is
    fn kind(&self) -> ProfileKind;

    /// Angular-diameter distance the lens was initialized with
    fn distance(&self) -> LensDistance;

    /// Deflection angle at `theta`, in radians
    fn deflection(&self, theta: AngularVector) -> Result<AngularVector>;

    /// Symmetric Jacobian of the deflection at `theta`
    fn derivatives(&self, theta: AngularVector) -> Result<Derivatives>;

    /// Parameter record sufficient to rebuild an identical lens
    fn params(&self) -> LensParams;

    /// Projected surface mass density at `theta`.
    ///
    /// Derived from the Jacobian trace, so it shares its singularities.
    fn surface_density(&self, theta: AngularVector) -> Result<SurfaceDensity> {
        let derivatives = self.derivatives(theta)?;
        Ok(self.distance().density_from_trace(derivatives.trace()))
    }
}

/// Any lens: one of the elementary profiles or a composite.
#[derive(Debug, Clone, PartialEq)]
pub enum Lens {
    Plummer(PlummerLens),
    Sis(SisLens),
    Nsis(NsisLens),
    Sie(SieLens),
    Nsie(NsieLens),
    MassSheet(MassSheetLens),
    Composite(CompositeLens),
}

impl Lens {
    /// Initializes a lens, recursively for composites, from its parameters.
    ///
    /// Either the whole tree is built or an error is returned; no partially
    /// initialized lens is ever observable.
    pub fn from_params(params: &LensParams) -> Result<Lens> {
        let lens = match params {
            LensParams::Plummer {
                distance,
                mass,
                angular_width,
            } => Lens::Plummer(PlummerLens::new(
                LensDistance::new(*distance)?,
                *mass,
                *angular_width,
            )?),
            LensParams::Sis {
                distance,
                velocity_dispersion,
            } => Lens::Sis(SisLens::new(LensDistance::new(*distance)?, *velocity_dispersion)?),
            LensParams::Nsis {
                distance,
                velocity_dispersion,
                core_radius,
            } => Lens::Nsis(NsisLens::new(
                LensDistance::new(*distance)?,
                *velocity_dispersion,
                *core_radius,
            )?),
            LensParams::Sie {
                distance,
                velocity_dispersion,
                ellipticity,
            } => Lens::Sie(SieLens::new(
                LensDistance::new(*distance)?,
                *velocity_dispersion,
                *ellipticity,
            )?),
            LensParams::Nsie {
                distance,
                velocity_dispersion,
                ellipticity,
                core_radius,
            } => Lens::Nsie(NsieLens::new(
                LensDistance::new(*distance)?,
                *velocity_dispersion,
                *ellipticity,
                *core_radius,
            )?),
            LensParams::MassSheet {
                distance,
                surface_density,
            } => Lens::MassSheet(MassSheetLens::new(
                LensDistance::new(*distance)?,
                *surface_density,
            )?),
            LensParams::Composite { distance, members } => {
                Lens::Composite(CompositeLens::from_params(LensDistance::new(*distance)?, members)?)
            }
        };
        debug!(kind = %lens.kind(), "initialized lens");
        Ok(lens)
    }

    /// Parses a JSON model description and initializes it.
    ///
    /// # Examples
    ///
    /// ```
    /// use lensing::lens::{Lens, LensModel, ProfileKind};
    ///
    /// let json = r#"{ "kind": "sis", "distance": 3.0857e25, "velocity_dispersion": 2.5e5 }"#;
    /// let lens = Lens::from_json(json).unwrap();
    /// assert_eq!(lens.kind(), ProfileKind::Sis);
    /// ```
    pub fn from_json(json: &str) -> Result<Lens> {
        let params: LensParams = serde_json::from_str(json)
            .map_err(|e| LensError::invalid("model", format!("malformed model description: {e}")))?;
        Lens::from_params(&params)
    }

    /// JSON model description of this lens.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.params())
            .map_err(|e| LensError::invalid("model", format!("cannot describe model: {e}")))
    }

    fn as_model(&self) -> &dyn LensModel {
        match self {
            Lens::Plummer(lens) => lens,
            Lens::Sis(lens) => lens,
            Lens::Nsis(lens) => lens,
            Lens::Sie(lens) => lens,
            Lens::Nsie(lens) => lens,
            Lens::MassSheet(lens) => lens,
            Lens::Composite(lens) => lens,
        }
    }
}

impl LensModel for Lens {
    fn kind(&self) -> ProfileKind {
        self.as_model().kind()
    }

    fn distance(&self) -> LensDistance {
        self.as_model().distance()
    }

    fn deflection(&self, theta: AngularVector) -> Result<AngularVector> {
        self.as_model().deflection(theta)
    }

    fn derivatives(&self, theta: AngularVector) -> Result<Derivatives> {
        self.as_model().derivatives(theta)
    }

    fn params(&self) -> LensParams {
        self.as_model().params()
    }

    fn surface_density(&self, theta: AngularVector) -> Result<SurfaceDensity> {
        self.as_model().surface_density(theta)
    }
}

macro_rules! impl_from_profile {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for Lens {
                fn from(lens: $ty) -> Lens {
                    Lens::$variant(lens)
                }
            }
        )*
    };
}

impl_from_profile!(
    Plummer(PlummerLens),
    Sis(SisLens),
    Nsis(NsisLens),
    Sie(SieLens),
    Nsie(NsieLens),
    MassSheet(MassSheetLens),
    Composite(CompositeLens),
);
