//! Red reference-marker segmentation.
//!
//! A fixed piecewise-linear threshold in HSB space. The score is positive for
//! saturated reds of moderate brightness and for very bright, very saturated
//! pixels with a hue just above red.

use image::{GrayImage, Luma, RgbImage};

use crate::blob::{BACKGROUND, FOREGROUND};

/// Threshold constants of the red-marker score. Hue is a fraction of a turn.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RedMaskParams {
    /// Hues above this count as red (wrap-around side).
    pub hue_high: f32,
    /// Hues below this count as red.
    pub hue_low: f32,
    /// Minimum saturation.
    pub sat_min: f32,
    /// Brightness floor at `sat_min`.
    pub val_at_sat_min: f32,
    /// Brightness floor at full saturation is interpolated from this value.
    pub val_at_sat_max: f32,
    /// Bright branch: hue upper bound.
    pub bright_hue_max: f32,
    /// Bright branch: saturation lower bound.
    pub bright_sat_min: f32,
    /// Bright branch: brightness lower bound.
    pub bright_val_min: f32,
    /// Scores above this are foreground.
    pub score_threshold: f32,
}

impl Default for RedMaskParams {
    fn default() -> Self {
        Self {
            hue_high: 0.68,
            hue_low: 0.035,
            sat_min: 0.13,
            val_at_sat_min: 0.35,
            val_at_sat_max: 0.7,
            bright_hue_max: 0.06,
            bright_sat_min: 0.85,
            bright_val_min: 0.75,
            score_threshold: 0.001,
        }
    }
}

/// Convert 8-bit RGB into `(hue, saturation, brightness)`, each in `[0, 1]`.
pub(crate) fn rgb_to_hsb(r: u8, g: u8, b: u8) -> [f32; 3] {
    let cmax = r.max(g).max(b) as f32;
    let cmin = r.min(g).min(b) as f32;
    let brightness = cmax / 255.0;
    let saturation = if cmax > 0.0 { (cmax - cmin) / cmax } else { 0.0 };
    if saturation == 0.0 {
        return [0.0, 0.0, brightness];
    }

    let span = cmax - cmin;
    let (r, g, b) = (r as f32, g as f32, b as f32);
    let redc = (cmax - r) / span;
    let greenc = (cmax - g) / span;
    let bluec = (cmax - b) / span;
    let mut hue = if r == cmax {
        bluec - greenc
    } else if g == cmax {
        2.0 + redc - bluec
    } else {
        4.0 + greenc - redc
    };
    hue /= 6.0;
    if hue < 0.0 {
        hue += 1.0;
    }
    [hue, saturation, brightness]
}

impl RedMaskParams {
    /// Red-marker score of one HSB triple; foreground when above
    /// `score_threshold`.
    pub fn score(&self, hsb: [f32; 3]) -> f32 {
        let [h, s, v] = hsb;
        let mut pix = (h - self.hue_high).max(self.hue_low - h);
        pix = pix.min(s - self.sat_min);
        let p = (self.val_at_sat_min - self.val_at_sat_max) / (1.0 - self.sat_min);
        pix = pix.min(v - (self.val_at_sat_min - p) - p * s);

        let bright = (self.bright_hue_max - h)
            .min(s - self.bright_sat_min)
            .min(v - self.bright_val_min);
        pix.max(bright)
    }

    pub fn is_marker(&self, r: u8, g: u8, b: u8) -> bool {
        self.score(rgb_to_hsb(r, g, b)) > self.score_threshold
    }
}

/// Binary mask of red marker pixels (255) over background (0), same size as
/// the input.
pub fn red_marker_mask(image: &RgbImage, params: &RedMaskParams) -> GrayImage {
    let (w, h) = image.dimensions();
    GrayImage::from_fn(w, h, |x, y| {
        let p = image.get_pixel(x, y);
        if params.is_marker(p[0], p[1], p[2]) {
            Luma([FOREGROUND])
        } else {
            Luma([BACKGROUND])
        }
    })
}
