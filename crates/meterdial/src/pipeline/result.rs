use image::GrayImage;

use crate::blob::Blob;
use crate::classify::{Classification, PairResolution};
use crate::digits::{DigitImage, OrderGroup};
use crate::marker::{MarkerAnchors, RoleAssignment};
use crate::rectify::DialCorners;

/// Full reading result for a single photograph.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ReadResult {
    /// Meter index, most significant wheel first.
    pub reading: u64,
    /// Photograph dimensions [width, height].
    pub image_size: [u32; 2],
    /// Red marker blobs in scan order.
    pub marker_blobs: Vec<Blob>,
    pub roles: RoleAssignment,
    /// Marker anchors in photograph pixels.
    pub anchors: MarkerAnchors,
    /// Dial window corners in photograph pixels.
    pub dial_corners: DialCorners,
    /// Dial-pixel to photograph-pixel homography (3x3, row-major).
    pub homography: [[f64; 3]; 3],
    /// Digit blobs in rectified-dial pixels, scan order.
    pub digit_blobs: Vec<Blob>,
    /// Wheel groups, most significant first.
    pub groups: Vec<OrderGroup>,
    /// Raw classifier output per digit image.
    pub classifications: Vec<Classification>,
    /// Labels after split-wheel repair, aligned with `classifications`.
    pub labels: Vec<Classification>,
    /// One entry per split group.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pair_resolutions: Vec<PairResolution>,
}

impl ReadResult {
    /// Final digit labels.
    pub fn digit_labels(&self) -> Vec<u8> {
        self.labels.iter().map(|c| c.label).collect()
    }

    /// Largest final-label distance; `0.0` with no digits.
    pub fn worst_distance(&self) -> f64 {
        self.labels.iter().map(|c| c.distance).fold(0.0, f64::max)
    }
}

/// Intermediate images, kept for debugging and dumps.
#[derive(Debug, Clone)]
pub struct ReadArtifacts {
    pub marker_mask: GrayImage,
    pub rectified_dial: GrayImage,
    pub binarized_dial: GrayImage,
    pub digit_images: Vec<DigitImage>,
}
