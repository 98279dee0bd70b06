//! Parameter records: the inert, serializable description of a lens tree.
//!
//! A [`LensParams`] value has no behaviour of its own; it is what the model
//! codec reads and writes and what JSON model descriptions deserialize into.
//! [`crate::lens::Lens::from_params`] turns it into a queryable lens.

use serde::{Deserialize, Serialize};
use units::{Angle, Length, Mass, SurfaceDensity, Velocity};

use crate::lens::ProfileKind;
use crate::vector::AngularVector;

/// Construction parameters of one lens, tagged by variant.
///
/// All quantities are SI/radian internally; `distance` is the
/// angular-diameter distance D_d.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LensParams {
    Plummer {
        distance: Length,
        mass: Mass,
        angular_width: Angle,
    },
    Sis {
        distance: Length,
        velocity_dispersion: Velocity,
    },
    Nsis {
        distance: Length,
        velocity_dispersion: Velocity,
        core_radius: Angle,
    },
    Sie {
        distance: Length,
        velocity_dispersion: Velocity,
        ellipticity: f64,
    },
    Nsie {
        distance: Length,
        velocity_dispersion: Velocity,
        ellipticity: f64,
        core_radius: Angle,
    },
    MassSheet {
        distance: Length,
        surface_density: SurfaceDensity,
    },
    Composite {
        distance: Length,
        members: Vec<MemberParams>,
    },
}

impl LensParams {
    pub fn kind(&self) -> ProfileKind {
        match self {
            LensParams::Plummer { .. } => ProfileKind::Plummer,
            LensParams::Sis { .. } => ProfileKind::Sis,
            LensParams::Nsis { .. } => ProfileKind::Nsis,
            LensParams::Sie { .. } => ProfileKind::Sie,
            LensParams::Nsie { .. } => ProfileKind::Nsie,
            LensParams::MassSheet { .. } => ProfileKind::MassSheet,
            LensParams::Composite { .. } => ProfileKind::Composite,
        }
    }

    pub fn distance(&self) -> Length {
        match self {
            LensParams::Plummer { distance, .. }
            | LensParams::Sis { distance, .. }
            | LensParams::Nsis { distance, .. }
            | LensParams::Sie { distance, .. }
            | LensParams::Nsie { distance, .. }
            | LensParams::MassSheet { distance, .. }
            | LensParams::Composite { distance, .. } => *distance,
        }
    }

    /// Nesting depth: 0 for an elementary lens, 1 + deepest member otherwise.
    pub fn depth(&self) -> usize {
        match self {
            LensParams::Composite { members, .. } => {
                1 + members.iter().map(|m| m.lens.depth()).max().unwrap_or(0)
            }
            _ => 0,
        }
    }
}

/// One entry of a composite: how a member is weighted and placed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberParams {
    /// Multiplier on the member's field; negative values subtract
    pub weight: f64,
    /// Member center in the composite's frame, radians
    pub offset: [f64; 2],
    /// Rotation of the member's frame relative to the composite's
    pub rotation: Angle,
    pub lens: LensParams,
}

impl MemberParams {
    pub fn offset_vector(&self) -> AngularVector {
        AngularVector::new(self.offset[0], self.offset[1])
    }
}
