//! Error type shared by construction, evaluation and the model codec.

use std::io;

use thiserror::Error;

/// Everything that can go wrong while building, querying or persisting a lens.
///
/// Construction and assembly errors leave nothing behind; evaluation errors
/// are per call and do not poison the lens.
#[derive(Debug, Error)]
pub enum LensError {
    /// A physical input is outside its domain (negative mass, ellipticity ≥ 1, ...)
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// The query position sits on a singularity with no finite limit
    #[error("field is singular at ({x:e}, {y:e}) rad")]
    SingularEvaluation { x: f64, y: f64 },

    /// Adding the member would make a composite contain itself
    #[error("composite #{composite} cannot take #{member} as a member: membership would form a cycle")]
    CyclicComposition { composite: u32, member: u32 },

    /// Unknown record tag, bad magic or unsupported format version
    #[error("unsupported model format: {0}")]
    UnsupportedFormat(String),

    /// Truncated or malformed model data
    #[error("corrupt model: {0}")]
    CorruptModel(String),

    /// A bulk query was handed a buffer that cannot hold the results
    #[error("output buffer too small: need {needed} values, have {available}")]
    BufferTooSmall { needed: usize, available: usize },

    /// Failure of the underlying byte sink or source
    #[error("model i/o failed: {0}")]
    Io(#[from] io::Error),
}

impl LensError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        LensError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LensError>;
