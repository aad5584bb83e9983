pub(crate) use image::{GrayImage, RgbImage};

pub(crate) use crate::blob::{measure_blobs, Blob};
pub(crate) use crate::classify::{
    digits_to_reading, disambiguate, glyph_features, Classification, DigitClassifier,
};
pub(crate) use crate::config::ReadConfig;
pub(crate) use crate::digits::{binarize_dial, order_digits, segment_digits};
pub(crate) use crate::marker::{identify_markers, locate_anchors, red_marker_mask};
pub(crate) use crate::meter_type::MeterType;
pub(crate) use crate::rectify::rectify_dial;
pub(crate) use crate::ReadError;
