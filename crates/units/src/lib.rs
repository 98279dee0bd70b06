pub mod angle;
pub mod length;
pub mod mass;
pub mod surface_density;
pub mod velocity;

#[cfg(test)]
mod mass_test;

pub use angle::{Angle, ARCSEC_TO_RAD, DEG_TO_RAD};
pub use length::Length;
pub use mass::{Mass, EARTH_MASS_KG, SOLAR_MASS_KG};
pub use surface_density::SurfaceDensity;
pub use velocity::{Velocity, SPEED_OF_LIGHT_M_S};
