//! Reader configuration.
//!
//! Area floors for marker and digit blobs plus the red-mask and dial
//! binarization parameters. Loadable from partial JSON.

use std::path::Path;

use crate::digits::BinarizeParams;
use crate::marker::RedMaskParams;

/// Reader configuration.
///
/// Every field has a default, so a JSON config only needs the keys it
/// overrides.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ReadConfig {
    /// Smallest red region (pixels) kept as a marker candidate.
    pub min_marker_area: u32,
    /// Smallest dial region (pixels) kept as a digit candidate.
    pub min_digit_area: u32,
    pub binarize: BinarizeParams,
    pub red_mask: RedMaskParams,
}

impl Default for ReadConfig {
    fn default() -> Self {
        Self {
            min_marker_area: 20,
            min_digit_area: 10,
            binarize: BinarizeParams::default(),
            red_mask: RedMaskParams::default(),
        }
    }
}

impl ReadConfig {
    /// Load a config from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let data = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }
}
