//! Digit strip processing: binarization, wheel ordering and glyph extraction.

mod binarize;
mod order;
mod segment;

pub use binarize::{binarize_dial, BinarizeParams, DigitPolarity};
pub use order::{group_entry_count, order_digits, OrderGroup};
pub use segment::{resize_glyph, segment_digits, DigitImage, GlyphSize, SLIVER_RATIO};
