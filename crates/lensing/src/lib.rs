//! Gravitational lens models.
//!
//! Elementary deflection profiles, weighted composites of them, and a binary
//! format for persisting whole model trees. All angles are radians and all
//! physical quantities SI; see the `units` crate for conversions.

pub mod arena;
pub mod batch;
pub mod codec;
pub mod composite;
pub mod config;
pub mod distance;
pub mod error;
pub mod lens;
pub mod params;
pub mod profiles;
pub mod vector;

#[cfg(test)]
mod arena_test;
#[cfg(test)]
mod vector_test;

pub use composite::{CompositeBuilder, CompositeLens, CompositeMember};
pub use config::CodecConfig;
pub use distance::LensDistance;
pub use error::{LensError, Result};
pub use lens::{Lens, LensModel, ProfileKind};
pub use params::{LensParams, MemberParams};
pub use vector::{AngularVector, Derivatives};
