//! Cropping digit blobs into fixed-size glyph images.

use image::imageops::{self, FilterType};
use image::GrayImage;

use crate::blob::Blob;
use crate::digits::order::OrderGroup;

/// Partial digits shorter than this fraction of their partner are dropped.
pub const SLIVER_RATIO: f64 = 0.1;

/// Classifier input size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GlyphSize {
    pub width: u32,
    pub height: u32,
}

impl GlyphSize {
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// One glyph ready for classification.
#[derive(Debug, Clone)]
pub struct DigitImage {
    /// Index of the source [`OrderGroup`].
    pub group: usize,
    /// Index of the source digit blob.
    pub blob: usize,
    pub image: GrayImage,
}

/// Bilinear resize to glyph size.
pub fn resize_glyph(img: &GrayImage, glyph: GlyphSize) -> GrayImage {
    imageops::resize(img, glyph.width, glyph.height, FilterType::Triangle)
}

fn crop(dial: &GrayImage, blob: &Blob) -> GrayImage {
    let b = &blob.bbox;
    imageops::crop_imm(dial, b.x, b.y, b.width, b.height).to_image()
}

/// Produce glyph images for every group, upper halves first.
///
/// A split group normally yields two images: each half is padded vertically to
/// the combined height, the upper half sitting at the bottom of its canvas and
/// the lower half at the top, approximating where each sat on its full digit.
/// When one half is a sliver, only the taller half is emitted.
pub fn segment_digits(
    dial: &GrayImage,
    blobs: &[Blob],
    groups: &[OrderGroup],
    glyph: GlyphSize,
) -> Vec<DigitImage> {
    let mut out = Vec::new();
    for (g, group) in groups.iter().enumerate() {
        match *group {
            OrderGroup::Single(i) => out.push(DigitImage {
                group: g,
                blob: i,
                image: resize_glyph(&crop(dial, &blobs[i]), glyph),
            }),
            OrderGroup::Split { upper, lower } => {
                let hu = blobs[upper].bbox.height;
                let hl = blobs[lower].bbox.height;
                let sliver = |a: u32, b: u32| (a as f64) < SLIVER_RATIO * b as f64;
                if sliver(hu, hl) || sliver(hl, hu) {
                    let taller = if hu >= hl { upper } else { lower };
                    tracing::debug!(
                        "Group {} is a sliver split ({}px vs {}px); keeping blob {}",
                        g,
                        hu,
                        hl,
                        taller
                    );
                    out.push(DigitImage {
                        group: g,
                        blob: taller,
                        image: resize_glyph(&crop(dial, &blobs[taller]), glyph),
                    });
                    continue;
                }

                let total = hu + hl;
                let mut top = GrayImage::new(blobs[upper].bbox.width, total);
                imageops::replace(&mut top, &crop(dial, &blobs[upper]), 0, hl as i64);
                let mut bottom = GrayImage::new(blobs[lower].bbox.width, total);
                imageops::replace(&mut bottom, &crop(dial, &blobs[lower]), 0, 0);

                out.push(DigitImage {
                    group: g,
                    blob: upper,
                    image: resize_glyph(&top, glyph),
                });
                out.push(DigitImage {
                    group: g,
                    blob: lower,
                    image: resize_glyph(&bottom, glyph),
                });
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blob::{measure_blobs, FOREGROUND};
    use crate::test_utils::fill_rect;

    const GLYPH: GlyphSize = GlyphSize {
        width: 6,
        height: 10,
    };

    #[test]
    fn single_digit_is_cropped_and_resized() {
        let mut dial = GrayImage::new(40, 20);
        fill_rect(&mut dial, 5, 4, 6, 10, FOREGROUND);
        let blobs = measure_blobs(&dial, 1).unwrap();
        let out = segment_digits(&dial, &blobs, &[OrderGroup::Single(0)], GLYPH);
        assert_eq!(out.len(), 1);
        assert_eq!((out[0].group, out[0].blob), (0, 0));
        assert_eq!(out[0].image.dimensions(), (6, 10));
        assert!(out[0].image.pixels().all(|p| p[0] == FOREGROUND));
    }

    #[test]
    fn split_group_is_stitched_onto_padded_canvases() {
        let mut dial = GrayImage::new(40, 40);
        fill_rect(&mut dial, 10, 0, 6, 4, FOREGROUND);
        fill_rect(&mut dial, 10, 10, 6, 6, FOREGROUND);
        let blobs = measure_blobs(&dial, 1).unwrap();
        let group = OrderGroup::Split { upper: 0, lower: 1 };
        // Canvas height 10 equals the glyph height, so the resize only copies.
        let out = segment_digits(&dial, &blobs, &[group], GLYPH);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].blob, 0);
        assert_eq!(out[1].blob, 1);

        let column = |img: &GrayImage| {
            (0..10)
                .map(|y| img.get_pixel(2, y)[0])
                .collect::<Vec<u8>>()
        };
        // Upper half (4 rows) sits below a 6-row pad.
        assert_eq!(column(&out[0].image), [vec![0u8; 6], vec![255u8; 4]].concat());
        // Lower half (6 rows) sits on top of a 4-row pad.
        assert_eq!(column(&out[1].image), [vec![255u8; 6], vec![0u8; 4]].concat());
    }

    #[test]
    fn sliver_keeps_only_taller_half() {
        let mut dial = GrayImage::new(40, 60);
        fill_rect(&mut dial, 10, 0, 6, 1, FOREGROUND);
        fill_rect(&mut dial, 10, 5, 6, 30, FOREGROUND);
        let blobs = measure_blobs(&dial, 1).unwrap();
        let out = segment_digits(
            &dial,
            &blobs,
            &[OrderGroup::Split { upper: 0, lower: 1 }],
            GLYPH,
        );
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].blob, 1);
    }
}
