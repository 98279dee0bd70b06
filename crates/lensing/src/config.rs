//! Limits applied when decoding model data.

use serde::{Deserialize, Serialize};

/// Configuration for the model decoder
///
/// Model bytes may come from anywhere, so the decoder bounds how deep
/// composites may nest and how many members one composite may declare
/// before it allocates or recurses.
///
/// # Examples
///
/// ```
/// use lensing::config::CodecConfig;
///
/// let config: CodecConfig = serde_json::from_str(r#"{ "maxDepth": 8 }"#).unwrap();
/// assert_eq!(config.max_depth, 8);
/// assert_eq!(config.max_members, CodecConfig::default().max_members);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodecConfig {
    /// Deepest composite nesting accepted (an elementary lens has depth 0)
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    /// Most members a single composite record may declare
    #[serde(default = "default_max_members")]
    pub max_members: usize,
}

fn default_max_depth() -> usize {
    64
}

fn default_max_members() -> usize {
    1 << 20
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            max_members: default_max_members(),
        }
    }
}
