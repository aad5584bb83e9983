//! Shared test utilities for image-based unit tests.

use image::{GrayImage, Luma, Rgb, RgbImage};
use std::ops::Range;

use crate::classify::SomClassifier;
use crate::digits::{resize_glyph, GlyphSize};
use crate::marker::MarkerAnchors;
use crate::meter_type::MeterType;
use crate::rectify::DialRect;

/// Fill an axis-aligned rectangle, clipped to the image.
pub(crate) fn fill_rect(img: &mut GrayImage, x: u32, y: u32, w: u32, h: u32, value: u8) {
    for yy in y..(y + h).min(img.height()) {
        for xx in x..(x + w).min(img.width()) {
            img.put_pixel(xx, yy, Luma([value]));
        }
    }
}

/// RGB variant of [`fill_rect`].
pub(crate) fn fill_rect_rgb(img: &mut RgbImage, x: u32, y: u32, w: u32, h: u32, rgb: [u8; 3]) {
    for yy in y..(y + h).min(img.height()) {
        for xx in x..(x + w).min(img.width()) {
            img.put_pixel(xx, yy, Rgb(rgb));
        }
    }
}

pub(crate) const GLYPH: GlyphSize = GlyphSize {
    width: 8,
    height: 12,
};

/// Synthetic 8x12 digit glyph: white spine (column 0), cap (row 0) and base
/// (row 11), plus one full-height column per set bit of `digit` at x = 1, 3,
/// 5, 7. Always one 8-connected blob filling the box, and every horizontal
/// band that includes the cap or the base is still a full-width blob.
pub(crate) fn draw_glyph(digit: u8) -> GrayImage {
    let mut g = GrayImage::new(GLYPH.width, GLYPH.height);
    fill_rect(&mut g, 0, 0, 1, GLYPH.height, 255);
    fill_rect(&mut g, 0, 0, GLYPH.width, 1, 255);
    fill_rect(&mut g, 0, GLYPH.height - 1, GLYPH.width, 1, 255);
    for bit in 0..4u32 {
        if digit & (1 << bit) != 0 {
            fill_rect(&mut g, 1 + 2 * bit, 0, 1, GLYPH.height, 255);
        }
    }
    g
}

/// Classifier with one exact prototype per synthetic glyph.
pub(crate) fn glyph_classifier() -> SomClassifier {
    let glyphs: Vec<(u8, GrayImage)> = (0..10u8)
        .map(|d| (d, resize_glyph(&draw_glyph(d), GLYPH)))
        .collect();
    SomClassifier::from_glyphs(glyphs.iter().map(|(d, g)| (*d, g)))
        .expect("synthetic prototypes are valid")
}

pub(crate) struct SyntheticMeter {
    pub photo: RgbImage,
    pub meter_type: MeterType,
}

const MARKER_RED: [u8; 3] = [220, 20, 20];
const FACE_GREY: [u8; 3] = [90, 90, 90];
const WHEEL_BLACK: [u8; 3] = [20, 20, 20];

/// One digit wheel as seen through the dial window.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Wheel {
    /// A whole glyph.
    Whole(u8),
    /// Wheel caught mid-turn: rows `cut..12` of `from` on top, a 4-pixel
    /// gap, then rows `0..cut` of `(from + 1) % 10` below.
    Rolling { from: u8, cut: u32 },
}

/// Fronto-parallel 240x180 meter photograph showing `digits`.
///
/// Pointer markers are 3x10 vertical bars, so each anchor is the bar centre;
/// the meter type's reference points equal those anchors and rectification is
/// an exact crop of the dial window at (20, 80), 200x40.
pub(crate) fn synthetic_meter(digits: &[u8]) -> SyntheticMeter {
    let wheels: Vec<Wheel> = digits.iter().map(|&d| Wheel::Whole(d)).collect();
    synthetic_meter_with_wheels(&wheels)
}

/// [`synthetic_meter`] with explicit wheel states.
pub(crate) fn synthetic_meter_with_wheels(wheels: &[Wheel]) -> SyntheticMeter {
    let mut photo = RgbImage::from_pixel(240, 180, Rgb(FACE_GREY));

    // Centre dot: 12x12 at (94, 144), centroid (100, 150).
    fill_rect_rgb(&mut photo, 94, 144, 12, 12, MARKER_RED);
    let bar = |photo: &mut RgbImage, x: u32| {
        fill_rect_rgb(photo, x, 55, 3, 10, MARKER_RED);
        [x as f64 + 1.5, 59.5]
    };
    let ten_thousandth = bar(&mut photo, 29);
    let thousandth = bar(&mut photo, 69);
    let hundredth = bar(&mut photo, 129);
    let tenth = bar(&mut photo, 189);

    let dial = DialRect {
        x: 20.0,
        y: 80.0,
        width: 200,
        height: 40,
    };
    fill_rect_rgb(&mut photo, 20, 80, 200, 40, WHEEL_BLACK);
    for (k, wheel) in wheels.iter().enumerate() {
        let ox = 30 + 38 * k as u32;
        match *wheel {
            Wheel::Whole(d) => paint_rows(&mut photo, &draw_glyph(d), 0..GLYPH.height, ox, 94),
            Wheel::Rolling { from, cut } => {
                let top_rows = GLYPH.height - cut;
                paint_rows(&mut photo, &draw_glyph(from), cut..GLYPH.height, ox, 88);
                let next = draw_glyph((from + 1) % 10);
                paint_rows(&mut photo, &next, 0..cut, ox, 88 + top_rows + 4);
            }
        }
    }

    let reference = MarkerAnchors {
        center: [100.0, 150.0],
        tenth,
        hundredth,
        thousandth,
        ten_thousandth,
    };
    let meter_type = MeterType::new("synthetic", reference, dial, GLYPH, glyph_classifier())
        .expect("synthetic meter type is valid");
    SyntheticMeter { photo, meter_type }
}

/// Paint the white pixels of `glyph` rows `rows` with the first row at `(ox, oy)`.
fn paint_rows(photo: &mut RgbImage, glyph: &GrayImage, rows: Range<u32>, ox: u32, oy: u32) {
    let first = rows.start;
    for y in rows {
        for x in 0..glyph.width() {
            if glyph.get_pixel(x, y)[0] == 255 {
                photo.put_pixel(ox + x, oy + y - first, Rgb([255, 255, 255]));
            }
        }
    }
}
