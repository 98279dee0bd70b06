//! Bulk evaluation into caller-provided buffers.
//!
//! Each position is evaluated exactly as a single query would be, so the
//! values written are identical to calling [`LensModel::deflection`] or
//! [`LensModel::derivatives`] in a loop. The buffer length is checked before
//! anything is written.

use tracing::trace;

use crate::error::{LensError, Result};
use crate::lens::LensModel;
use crate::vector::AngularVector;

/// Values written per position by [`deflections_into`]
pub const DEFLECTION_STRIDE: usize = 2;

/// Values written per position by [`derivatives_into`]
pub const DERIVATIVE_STRIDE: usize = 3;

fn check_capacity(out: &[f64], offset: usize, count: usize, stride: usize) -> Result<()> {
    let needed = count
        .checked_mul(stride)
        .and_then(|n| n.checked_add(offset))
        .unwrap_or(usize::MAX);
    if needed > out.len() {
        return Err(LensError::BufferTooSmall {
            needed,
            available: out.len(),
        });
    }
    Ok(())
}

/// Writes `[αx, αy]` for every position into `out`, starting at `offset`.
///
/// On an evaluation error the batch stops; slots for earlier positions
/// already hold their results.
///
/// # Examples
///
/// ```
/// use lensing::batch::deflections_into;
/// use lensing::distance::LensDistance;
/// use lensing::profiles::SisLens;
/// use lensing::vector::angular_vector_arcsec;
/// use units::Velocity;
///
/// let d_d = LensDistance::from_mpc(1000.0).unwrap();
/// let sis = SisLens::new(d_d, Velocity::from_km_per_sec(200.0)).unwrap();
/// let positions = [angular_vector_arcsec(1.0, 0.0), angular_vector_arcsec(0.0, 2.0)];
///
/// let mut out = vec![0.0; 5];
/// deflections_into(&sis, &positions, &mut out, 1).unwrap();
/// assert_eq!(out[0], 0.0);
/// assert!(out[1] > 0.0 && out[4] > 0.0);
/// ```
pub fn deflections_into<L: LensModel + ?Sized>(
    lens: &L,
    positions: &[AngularVector],
    out: &mut [f64],
    offset: usize,
) -> Result<()> {
    check_capacity(out, offset, positions.len(), DEFLECTION_STRIDE)?;
    trace!(count = positions.len(), offset, "bulk deflection query");

    let slots = out[offset..].chunks_exact_mut(DEFLECTION_STRIDE);
    for (theta, slot) in positions.iter().zip(slots) {
        let alpha = lens.deflection(*theta)?;
        slot[0] = alpha.x;
        slot[1] = alpha.y;
    }
    Ok(())
}

/// Writes `[xx, yy, xy]` for every position into `out`, starting at `offset`.
pub fn derivatives_into<L: LensModel + ?Sized>(
    lens: &L,
    positions: &[AngularVector],
    out: &mut [f64],
    offset: usize,
) -> Result<()> {
    check_capacity(out, offset, positions.len(), DERIVATIVE_STRIDE)?;
    trace!(count = positions.len(), offset, "bulk derivative query");

    let slots = out[offset..].chunks_exact_mut(DERIVATIVE_STRIDE);
    for (theta, slot) in positions.iter().zip(slots) {
        let d = lens.derivatives(*theta)?;
        slot[0] = d.xx;
        slot[1] = d.yy;
        slot[2] = d.xy;
    }
    Ok(())
}
