//! Pure-Rust reader for analog water-meter digit wheels.
//!
//! A photographed meter face carries five red reference dots: a large one at
//! the dial centre and four pointer marks beside the digit wheels. The
//! pipeline stages are:
//!
//! 1. **Marker mask** – HSB threshold isolating red paint.
//! 2. **Blobs** – 8-connected components with area, centroid, bounding box.
//! 3. **Roles** – which dot is CENTER, TENTH, HUNDREDTH, THOUSANDTH,
//!    TENTHOUSANDTH, from size and pairwise distances.
//! 4. **Anchors** – needle-tip point of each pointer mark.
//! 5. **Rectify** – affine placement of the meter type's dial window, then a
//!    4-point homography warp to an upright dial image.
//! 6. **Digits** – binarize, group stacked half-digits per wheel, cut glyphs.
//! 7. **Classify** – nearest-prototype labels, split-wheel repair, reading.
//!
//! # Public API
//! - [`MeterReader`] and [`MeterType`] as primary entry points
//! - [`ReadConfig`] for tuning
//! - per-stage functions for callers that drive the stages themselves

mod api;
mod blob;
mod classify;
mod config;
mod digits;
mod error;
mod homography;
mod marker;
mod meter_type;
mod pipeline;
mod rectify;

#[cfg(test)]
mod test_utils;

pub use api::MeterReader;
pub use blob::{ensure_binary, measure_blobs, Blob, BoundingBox, BACKGROUND, FOREGROUND};
pub use classify::{
    digits_to_reading, disambiguate, glyph_features, Classification, DigitClassifier,
    Disambiguated, PairResolution, SomClassifier, SomPrototype,
};
pub use config::ReadConfig;
pub use digits::{
    binarize_dial, group_entry_count, order_digits, resize_glyph, segment_digits,
    BinarizeParams, DigitImage, DigitPolarity, GlyphSize, OrderGroup, SLIVER_RATIO,
};
pub use error::ReadError;
pub use homography::HomographyError;
pub use marker::{
    identify_markers, locate_anchors, red_marker_mask, MarkerAnchors, MarkerRole,
    RedMaskParams, RoleAssignment, MARKER_COUNT,
};
pub use meter_type::{MeterType, MeterTypeSummary};
pub use pipeline::{ReadArtifacts, ReadResult};
pub use rectify::{rectify_dial, DialCorners, DialRect, RectifiedDial};
