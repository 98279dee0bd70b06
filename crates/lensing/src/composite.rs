//! Composite lenses: weighted, shifted and rotated superpositions of other lenses.
//!
//! Assembly is two-phase. A [`CompositeBuilder`] collects members and is
//! consumed by [`CompositeBuilder::build`]; the resulting [`CompositeLens`]
//! has no mutators. Members are held as `Arc<Lens>` snapshots, so the same
//! sub-lens may appear several times and nothing can change under a
//! finished composite.
//!
//! # Example
//!
//! ```
//! use lensing::composite::CompositeBuilder;
//! use lensing::distance::LensDistance;
//! use lensing::lens::{Lens, LensModel};
//! use lensing::profiles::{PlummerLens, SieLens};
//! use lensing::vector::angular_vector_arcsec;
//! use units::{Angle, Mass, Velocity};
//!
//! let d_d = LensDistance::from_mpc(1200.0).unwrap();
//! let galaxy = SieLens::new(d_d, Velocity::from_km_per_sec(220.0), 0.2).unwrap();
//! let satellite = PlummerLens::new(d_d, Mass::from_solar_masses(1e10), Angle::from_arcsec(0.1)).unwrap();
//!
//! let mut builder = CompositeBuilder::new(d_d);
//! builder
//!     .add_member(1.0, angular_vector_arcsec(0.0, 0.0), Angle::from_degrees(30.0), galaxy)
//!     .add_member(1.0, angular_vector_arcsec(1.5, -0.4), Angle::zero(), satellite);
//! let model = Lens::from(builder.build().unwrap());
//!
//! let alpha = model.deflection(angular_vector_arcsec(0.7, 0.9)).unwrap();
//! assert!(alpha.magnitude() > 0.0);
//! ```

use std::sync::Arc;

use nalgebra::Rotation2;
use tracing::debug;
use units::{Angle, SurfaceDensity};

use crate::distance::LensDistance;
use crate::error::{LensError, Result};
use crate::lens::{Lens, LensModel, ProfileKind};
use crate::params::{LensParams, MemberParams};
use crate::profiles::singular_at;
use crate::vector::{AngularVector, Derivatives};

/// One member of a composite and its placement.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeMember {
    weight: f64,
    offset: AngularVector,
    rotation: Angle,
    frame: Rotation2<f64>,
    lens: Arc<Lens>,
}

impl CompositeMember {
    pub fn new(weight: f64, offset: AngularVector, rotation: Angle, lens: Arc<Lens>) -> Self {
        Self {
            weight,
            offset,
            rotation,
            frame: Rotation2::new(rotation.to_radians()),
            lens,
        }
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn offset(&self) -> AngularVector {
        self.offset
    }

    pub fn rotation(&self) -> Angle {
        self.rotation
    }

    pub fn lens(&self) -> &Arc<Lens> {
        &self.lens
    }

    fn validate(&self) -> Result<()> {
        if !self.weight.is_finite() {
            return Err(LensError::invalid("weight", format!("must be finite, got {}", self.weight)));
        }
        if !(self.offset.x.is_finite() && self.offset.y.is_finite()) {
            return Err(LensError::invalid(
                "offset",
                format!("must be finite, got ({}, {})", self.offset.x, self.offset.y),
            ));
        }
        if !self.rotation.to_radians().is_finite() {
            return Err(LensError::invalid(
                "rotation",
                format!("must be finite, got {}", self.rotation.to_radians()),
            ));
        }
        Ok(())
    }

    /// Position expressed in the member's own frame
    fn local(&self, theta: AngularVector) -> AngularVector {
        self.frame.inverse_transform_vector(&(theta - self.offset))
    }

    fn deflection(&self, theta: AngularVector) -> Result<AngularVector> {
        let alpha = self.lens.deflection(self.local(theta))?;
        Ok(self.frame * alpha * self.weight)
    }

    fn derivatives(&self, theta: AngularVector) -> Result<Derivatives> {
        let local = self.lens.derivatives(self.local(theta))?;
        Ok(local.rotated_by(&self.frame).scaled(self.weight))
    }

    fn params(&self) -> MemberParams {
        MemberParams {
            weight: self.weight,
            offset: [self.offset.x, self.offset.y],
            rotation: self.rotation,
            lens: self.lens.params(),
        }
    }
}

/// Superposition of member lenses in a common frame.
///
/// ```text
/// α(θ) = Σᵢ wᵢ R(φᵢ) αᵢ(R(−φᵢ)(θ − θᵢ))
/// J(θ) = Σᵢ wᵢ R(φᵢ) Jᵢ(…) R(φᵢ)ᵀ
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeLens {
    distance: LensDistance,
    members: Vec<CompositeMember>,
}

impl CompositeLens {
    /// Builds a composite from a complete member list in one step.
    pub fn new(distance: LensDistance, members: Vec<CompositeMember>) -> Result<Self> {
        for member in &members {
            member.validate()?;
        }
        debug!(members = members.len(), "assembled composite lens");
        Ok(Self { distance, members })
    }

    /// Initializes every member from its parameters, then the composite.
    pub fn from_params(distance: LensDistance, members: &[MemberParams]) -> Result<Self> {
        let members = members
            .iter()
            .map(|m| -> Result<CompositeMember> {
                let lens = Lens::from_params(&m.lens)?;
                Ok(CompositeMember::new(m.weight, m.offset_vector(), m.rotation, Arc::new(lens)))
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(distance, members)
    }

    pub fn members(&self) -> &[CompositeMember] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Member errors are reported at the composite-frame position queried.
    fn at(theta: AngularVector, err: LensError) -> LensError {
        match err {
            LensError::SingularEvaluation { .. } => singular_at(theta),
            other => other,
        }
    }
}

impl LensModel for CompositeLens {
    fn kind(&self) -> ProfileKind {
        ProfileKind::Composite
    }

    fn distance(&self) -> LensDistance {
        self.distance
    }

    fn deflection(&self, theta: AngularVector) -> Result<AngularVector> {
        self.members
            .iter()
            .try_fold(AngularVector::zeros(), |acc, m| -> Result<AngularVector> {
                Ok(acc + m.deflection(theta)?)
            })
            .map_err(|e| Self::at(theta, e))
    }

    fn derivatives(&self, theta: AngularVector) -> Result<Derivatives> {
        self.members
            .iter()
            .try_fold(Derivatives::zero(), |acc, m| -> Result<Derivatives> {
                Ok(acc + m.derivatives(theta)?)
            })
            .map_err(|e| Self::at(theta, e))
    }

    fn params(&self) -> LensParams {
        LensParams::Composite {
            distance: self.distance.length(),
            members: self.members.iter().map(CompositeMember::params).collect(),
        }
    }

    /// Members may sit at different distances, so their densities are summed
    /// individually rather than derived from the combined Jacobian.
    fn surface_density(&self, theta: AngularVector) -> Result<SurfaceDensity> {
        self.members
            .iter()
            .try_fold(SurfaceDensity::zero(), |acc, m| -> Result<SurfaceDensity> {
                Ok(acc + m.lens.surface_density(m.local(theta))? * m.weight)
            })
            .map_err(|e| Self::at(theta, e))
    }
}

/// Mutable assembly phase of a [`CompositeLens`].
#[derive(Debug, Clone)]
pub struct CompositeBuilder {
    distance: LensDistance,
    members: Vec<CompositeMember>,
}

impl CompositeBuilder {
    pub fn new(distance: LensDistance) -> Self {
        Self {
            distance,
            members: Vec::new(),
        }
    }

    /// Appends a member, taking ownership of the lens.
    pub fn add_member(
        &mut self,
        weight: f64,
        offset: AngularVector,
        rotation: Angle,
        lens: impl Into<Lens>,
    ) -> &mut Self {
        self.add_shared_member(weight, offset, rotation, Arc::new(lens.into()))
    }

    /// Appends a member that is shared with other composites or callers.
    pub fn add_shared_member(
        &mut self,
        weight: f64,
        offset: AngularVector,
        rotation: Angle,
        lens: Arc<Lens>,
    ) -> &mut Self {
        self.members.push(CompositeMember::new(weight, offset, rotation, lens));
        self
    }

    /// Chaining form of [`CompositeBuilder::add_member`].
    pub fn with_member(
        mut self,
        weight: f64,
        offset: AngularVector,
        rotation: Angle,
        lens: impl Into<Lens>,
    ) -> Self {
        self.add_member(weight, offset, rotation, lens);
        self
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Validates every member and freezes the composite.
    pub fn build(self) -> Result<CompositeLens> {
        CompositeLens::new(self.distance, self.members)
    }
}
