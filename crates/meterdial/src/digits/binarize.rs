//! Fixed-threshold binarization of the rectified dial.

use image::{GrayImage, Luma};

use crate::blob::{BACKGROUND, FOREGROUND};

/// Digit colour relative to the wheel background.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DigitPolarity {
    /// Light digits on dark wheels.
    #[default]
    LightOnDark,
    /// Dark digits on light wheels.
    DarkOnLight,
}

/// Dial binarization parameters.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BinarizeParams {
    /// Grey values strictly above this are bright.
    pub threshold: u8,
    pub polarity: DigitPolarity,
}

impl Default for BinarizeParams {
    fn default() -> Self {
        Self {
            threshold: 120,
            polarity: DigitPolarity::LightOnDark,
        }
    }
}

/// Map the dial to digit foreground (255) over background (0).
pub fn binarize_dial(dial: &GrayImage, params: &BinarizeParams) -> GrayImage {
    let invert = params.polarity == DigitPolarity::DarkOnLight;
    let mut out = GrayImage::new(dial.width(), dial.height());
    for (src, dst) in dial.pixels().zip(out.pixels_mut()) {
        let bright = src[0] > params.threshold;
        *dst = Luma([if bright != invert { FOREGROUND } else { BACKGROUND }]);
    }
    out
}
