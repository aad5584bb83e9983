//! Error type shared by all reading stages.

use crate::homography::HomographyError;

/// Contract failure that aborts the reading of one photograph.
///
/// Every variant is fatal for the current image: nothing is retried and no
/// partial reading is produced.
#[derive(Debug, Clone, PartialEq)]
pub enum ReadError {
    /// A mask handed to blob measurement holds a value other than 0 or 255.
    NonBinaryMask { value: u8, x: u32, y: u32 },
    /// Calibration needs exactly five marker blobs.
    WrongBlobCount { expected: usize, found: usize },
    /// Role indices do not form a permutation of the five marker blobs.
    InvalidRoleAssignment(String),
    /// Not enough point correspondences to rectify the dial.
    TooFewCorrespondences { needed: usize, got: usize },
    /// The reference points used for the affine fit are collinear.
    DegenerateReference,
    /// Dial-corner homography could not be estimated.
    Homography(HomographyError),
    /// Meter type record is malformed.
    InvalidMeterType(String),
    /// Classified label count disagrees with the digit blob count.
    LabelCountMismatch { labels: usize, blobs: usize },
    /// A classifier produced a label outside `0..=9`.
    InvalidDigitLabel { image: usize, label: u8 },
    /// The assembled reading does not fit into `u64`.
    ReadingOverflow { digits: usize },
}

impl std::fmt::Display for ReadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonBinaryMask { value, x, y } => {
                write!(f, "mask is not binary: value {} at ({}, {})", value, x, y)
            }
            Self::WrongBlobCount { expected, found } => {
                write!(f, "wrong number of blobs: expected {}, found {}", expected, found)
            }
            Self::InvalidRoleAssignment(msg) => write!(f, "invalid role assignment: {}", msg),
            Self::TooFewCorrespondences { needed, got } => {
                write!(f, "too few correspondences: need {}, got {}", needed, got)
            }
            Self::DegenerateReference => {
                write!(f, "reference marker positions are collinear")
            }
            Self::Homography(e) => write!(f, "dial homography: {}", e),
            Self::InvalidMeterType(msg) => write!(f, "invalid meter type: {}", msg),
            Self::LabelCountMismatch { labels, blobs } => {
                write!(f, "label count {} does not match blob count {}", labels, blobs)
            }
            Self::InvalidDigitLabel { image, label } => {
                write!(f, "digit image {} has label {} (expected 0..=9)", image, label)
            }
            Self::ReadingOverflow { digits } => {
                write!(f, "reading with {} digits overflows u64", digits)
            }
        }
    }
}

impl std::error::Error for ReadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Homography(e) => Some(e),
            _ => None,
        }
    }
}

impl From<HomographyError> for ReadError {
    fn from(e: HomographyError) -> Self {
        Self::Homography(e)
    }
}
