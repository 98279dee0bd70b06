//! # Model format
//!
//! Binary persistence for lens trees, elementary or arbitrarily nested.
//!
//! ```text
//! [Header: 8 bytes]
//!   - Magic: "LENS" (4 bytes)
//!   - Version: u32 (4 bytes)
//!
//! [Record: variable]
//!   - Tag: u8 (1=Plummer 2=SIS 3=NSIS 4=SIE 5=NSIE 6=MassSheet 7=Composite)
//!   - Distance D_d: f64, meters
//!   - Variant fields, f64 each:
//!       Plummer:    mass (kg), angular width (rad)
//!       SIS:        velocity dispersion (m/s)
//!       NSIS:       velocity dispersion (m/s), core radius (rad)
//!       SIE:        velocity dispersion (m/s), ellipticity
//!       NSIE:       velocity dispersion (m/s), ellipticity, core radius (rad)
//!       MassSheet:  surface density (kg/m²)
//!       Composite:  member count: u32, then per member
//!                   weight, offset x (rad), offset y (rad), rotation (rad),
//!                   followed by the member's own record
//! ```
//!
//! Integers and floats are little-endian. Values are written at full `f64`
//! precision, so a decoded model evaluates bit-for-bit like the original.
//!
//! Encoding and decoding share the limits in [`CodecConfig`]: a model the
//! encoder accepts under a configuration decodes under the same one.
//!
//! Decoding reads the whole parameter tree before initializing anything:
//! an error anywhere means no lens at all. Unknown tags are never skipped.
//!
//! ## Usage
//!
//! ```rust,ignore
//! // Save
//! let bytes = codec::to_bytes(&lens)?;
//! std::fs::write("model.lens", bytes)?;
//!
//! // Load
//! let bytes = std::fs::read("model.lens")?;
//! let lens = codec::from_bytes(&bytes)?;
//! ```

use std::io::{self, Cursor, Read, Write};

use tracing::{debug, trace, warn};
use units::{Angle, Length, Mass, SurfaceDensity, Velocity};

use crate::config::CodecConfig;
use crate::error::{LensError, Result};
use crate::lens::{Lens, LensModel, ProfileKind};
use crate::params::{LensParams, MemberParams};

/// Magic bytes opening every model stream
const MAGIC: &[u8; 4] = b"LENS";

/// Current format version
pub const FORMAT_VERSION: u32 = 1;

/// Encodes a lens, header included.
///
/// Models nested deeper, or with more members per composite, than the
/// default [`CodecConfig`] allows are refused, so anything this returns
/// decodes with [`from_bytes`].
pub fn to_bytes(lens: &Lens) -> Result<Vec<u8>> {
    to_bytes_with(lens, &CodecConfig::default())
}

pub fn to_bytes_with(lens: &Lens, config: &CodecConfig) -> Result<Vec<u8>> {
    params_to_bytes_with(&lens.params(), config)
}

/// Encodes a parameter tree, header included.
pub fn params_to_bytes(params: &LensParams) -> Result<Vec<u8>> {
    params_to_bytes_with(params, &CodecConfig::default())
}

pub fn params_to_bytes_with(params: &LensParams, config: &CodecConfig) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    buf.extend_from_slice(MAGIC);
    buf.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
    encode_record(&mut buf, params, 0, config)?;
    debug!(kind = %params.kind(), bytes = buf.len(), "encoded lens model");
    Ok(buf)
}

/// Writes a lens to any byte sink.
pub fn write_lens<W: Write>(writer: &mut W, lens: &Lens) -> Result<()> {
    write_lens_with(writer, lens, &CodecConfig::default())
}

pub fn write_lens_with<W: Write>(writer: &mut W, lens: &Lens, config: &CodecConfig) -> Result<()> {
    writer.write_all(&to_bytes_with(lens, config)?)?;
    Ok(())
}

/// Decodes a lens from a complete byte buffer; trailing bytes are an error.
pub fn from_bytes(data: &[u8]) -> Result<Lens> {
    from_bytes_with(data, &CodecConfig::default())
}

pub fn from_bytes_with(data: &[u8], config: &CodecConfig) -> Result<Lens> {
    let mut cursor = Cursor::new(data);
    let params = read_params_with(&mut cursor, config)?;
    let consumed = cursor.position() as usize;
    if consumed != data.len() {
        return Err(corrupt(format!(
            "{} trailing bytes after model record",
            data.len() - consumed
        )));
    }
    initialize(&params)
}

/// Reads one lens from a byte source, leaving anything after it unread.
pub fn read_lens<R: Read>(reader: &mut R) -> Result<Lens> {
    read_lens_with(reader, &CodecConfig::default())
}

pub fn read_lens_with<R: Read>(reader: &mut R, config: &CodecConfig) -> Result<Lens> {
    let params = read_params_with(reader, config)?;
    initialize(&params)
}

/// Reads the parameter tree without initializing it.
pub fn read_params_with<R: Read>(reader: &mut R, config: &CodecConfig) -> Result<LensParams> {
    let mut decoder = Decoder { reader, config };

    let mut magic = [0u8; 4];
    decoder.read_exact(&mut magic, "magic")?;
    if &magic != MAGIC {
        warn!(?magic, "rejected model stream with bad magic");
        return Err(LensError::UnsupportedFormat(format!(
            "bad magic {magic:02x?}, expected {MAGIC:02x?}"
        )));
    }
    let version = decoder.read_u32("version")?;
    if version != FORMAT_VERSION {
        warn!(version, "rejected model stream with unknown version");
        return Err(LensError::UnsupportedFormat(format!(
            "format version {version}, this build reads {FORMAT_VERSION}"
        )));
    }

    let params = decoder.record(0)?;
    debug!(kind = %params.kind(), depth = params.depth(), "decoded lens model");
    Ok(params)
}

/// Out-of-domain values in the stream mean the model is corrupt.
fn initialize(params: &LensParams) -> Result<Lens> {
    Lens::from_params(params).map_err(|err| match err {
        LensError::InvalidParameter { name, reason } => {
            corrupt(format!("stored parameter `{name}` is invalid: {reason}"))
        }
        other => other,
    })
}

fn corrupt(message: impl Into<String>) -> LensError {
    LensError::CorruptModel(message.into())
}

fn put_f64(buf: &mut Vec<u8>, value: f64) {
    buf.extend_from_slice(&value.to_le_bytes());
}

fn encode_record(buf: &mut Vec<u8>, params: &LensParams, depth: usize, config: &CodecConfig) -> Result<()> {
    buf.push(params.kind().tag());
    put_f64(buf, params.distance().to_m());

    match params {
        LensParams::Plummer {
            mass, angular_width, ..
        } => {
            put_f64(buf, mass.to_kg());
            put_f64(buf, angular_width.to_radians());
        }
        LensParams::Sis {
            velocity_dispersion, ..
        } => {
            put_f64(buf, velocity_dispersion.to_meters_per_sec());
        }
        LensParams::Nsis {
            velocity_dispersion,
            core_radius,
            ..
        } => {
            put_f64(buf, velocity_dispersion.to_meters_per_sec());
            put_f64(buf, core_radius.to_radians());
        }
        LensParams::Sie {
            velocity_dispersion,
            ellipticity,
            ..
        } => {
            put_f64(buf, velocity_dispersion.to_meters_per_sec());
            put_f64(buf, *ellipticity);
        }
        LensParams::Nsie {
            velocity_dispersion,
            ellipticity,
            core_radius,
            ..
        } => {
            put_f64(buf, velocity_dispersion.to_meters_per_sec());
            put_f64(buf, *ellipticity);
            put_f64(buf, core_radius.to_radians());
        }
        LensParams::MassSheet {
            surface_density, ..
        } => {
            put_f64(buf, surface_density.to_kg_per_m2());
        }
        LensParams::Composite { members, .. } => {
            if depth + 1 > config.max_depth {
                return Err(LensError::invalid(
                    "depth",
                    format!("composite nesting exceeds the limit of {}", config.max_depth),
                ));
            }
            if members.len() > config.max_members {
                return Err(LensError::invalid(
                    "members",
                    format!("{} members, limit is {}", members.len(), config.max_members),
                ));
            }
            let count = u32::try_from(members.len()).map_err(|_| {
                LensError::invalid("members", format!("{} members do not fit a u32 count", members.len()))
            })?;
            buf.extend_from_slice(&count.to_le_bytes());
            for member in members {
                put_f64(buf, member.weight);
                put_f64(buf, member.offset[0]);
                put_f64(buf, member.offset[1]);
                put_f64(buf, member.rotation.to_radians());
                encode_record(buf, &member.lens, depth + 1, config)?;
            }
        }
    }
    Ok(())
}

struct Decoder<'a, R> {
    reader: &'a mut R,
    config: &'a CodecConfig,
}

impl<R: Read> Decoder<'_, R> {
    fn read_exact(&mut self, buf: &mut [u8], what: &str) -> Result<()> {
        self.reader.read_exact(buf).map_err(|err| {
            if err.kind() == io::ErrorKind::UnexpectedEof {
                corrupt(format!("stream ends inside {what}"))
            } else {
                LensError::Io(err)
            }
        })
    }

    fn read_u8(&mut self, what: &str) -> Result<u8> {
        let mut bytes = [0u8; 1];
        self.read_exact(&mut bytes, what)?;
        Ok(bytes[0])
    }

    fn read_u32(&mut self, what: &str) -> Result<u32> {
        let mut bytes = [0u8; 4];
        self.read_exact(&mut bytes, what)?;
        Ok(u32::from_le_bytes(bytes))
    }

    /// Reads an f64 that must be finite.
    fn read_f64(&mut self, what: &str) -> Result<f64> {
        let mut bytes = [0u8; 8];
        self.read_exact(&mut bytes, what)?;
        let value = f64::from_le_bytes(bytes);
        if !value.is_finite() {
            return Err(corrupt(format!("{what} is not finite ({value})")));
        }
        Ok(value)
    }

    fn record(&mut self, depth: usize) -> Result<LensParams> {
        let tag = self.read_u8("record tag")?;
        let kind = ProfileKind::from_tag(tag)
            .ok_or_else(|| LensError::UnsupportedFormat(format!("unknown lens tag {tag}")))?;
        let distance = Length::from_meters(self.read_f64("distance")?);
        trace!(%kind, depth, "decoding lens record");

        let params = match kind {
            ProfileKind::Plummer => LensParams::Plummer {
                distance,
                mass: Mass::from_kg(self.read_f64("plummer mass")?),
                angular_width: Angle::from_radians(self.read_f64("plummer width")?),
            },
            ProfileKind::Sis => LensParams::Sis {
                distance,
                velocity_dispersion: self.velocity()?,
            },
            ProfileKind::Nsis => LensParams::Nsis {
                distance,
                velocity_dispersion: self.velocity()?,
                core_radius: Angle::from_radians(self.read_f64("core radius")?),
            },
            ProfileKind::Sie => LensParams::Sie {
                distance,
                velocity_dispersion: self.velocity()?,
                ellipticity: self.read_f64("ellipticity")?,
            },
            ProfileKind::Nsie => LensParams::Nsie {
                distance,
                velocity_dispersion: self.velocity()?,
                ellipticity: self.read_f64("ellipticity")?,
                core_radius: Angle::from_radians(self.read_f64("core radius")?),
            },
            ProfileKind::MassSheet => LensParams::MassSheet {
                distance,
                surface_density: SurfaceDensity::from_kg_per_m2(self.read_f64("surface density")?),
            },
            ProfileKind::Composite => LensParams::Composite {
                distance,
                members: self.members(depth + 1)?,
            },
        };
        Ok(params)
    }

    fn velocity(&mut self) -> Result<Velocity> {
        Ok(Velocity::from_meters_per_sec(self.read_f64("velocity dispersion")?))
    }

    fn members(&mut self, depth: usize) -> Result<Vec<MemberParams>> {
        if depth > self.config.max_depth {
            return Err(corrupt(format!(
                "composite nesting exceeds the limit of {}",
                self.config.max_depth
            )));
        }
        let count = self.read_u32("member count")? as usize;
        if count > self.config.max_members {
            return Err(corrupt(format!(
                "composite declares {count} members, limit is {}",
                self.config.max_members
            )));
        }

        // Capacity is bounded so a lying count cannot force a huge allocation
        let mut members = Vec::with_capacity(count.min(1024));
        for _ in 0..count {
            let weight = self.read_f64("member weight")?;
            let offset = [self.read_f64("member offset x")?, self.read_f64("member offset y")?];
            let rotation = Angle::from_radians(self.read_f64("member rotation")?);
            let lens = self.record(depth)?;
            members.push(MemberParams {
                weight,
                offset,
                rotation,
                lens,
            });
        }
        Ok(members)
    }
}
