//! Perspective rectification of the digit dial.
//!
//! The meter type stores where the five markers sit on a fronto-parallel
//! template and where the digit window lies in that frame. An affine transform
//! from three template markers to their detected anchors places the window's
//! corners in the photograph; a 4-point homography then inverse-warps that
//! quadrilateral into an upright `width × height` grey image.

use image::{GrayImage, Luma};
use nalgebra::Matrix3;

use crate::homography::{
    fit_affine_3pt, homography_from_quad, homography_project, matrix3_to_array,
};
use crate::marker::MARKER_COUNT;
use crate::ReadError;

/// Digit window in template coordinates.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DialRect {
    pub x: f64,
    pub y: f64,
    pub width: u32,
    pub height: u32,
}

impl DialRect {
    /// Corners in the order top-left, top-right, bottom-left, bottom-right.
    pub fn corners(&self) -> [[f64; 2]; 4] {
        let (x1, y1) = (self.x + self.width as f64, self.y + self.height as f64);
        [[self.x, self.y], [x1, self.y], [self.x, y1], [x1, y1]]
    }
}

/// Dial window corners located in the source photograph.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DialCorners {
    pub top_left: [f64; 2],
    pub top_right: [f64; 2],
    pub bottom_left: [f64; 2],
    pub bottom_right: [f64; 2],
}

impl DialCorners {
    fn as_array(&self) -> [[f64; 2]; 4] {
        [
            self.top_left,
            self.top_right,
            self.bottom_left,
            self.bottom_right,
        ]
    }
}

/// Upright dial image plus the geometry that produced it.
#[derive(Debug, Clone)]
pub struct RectifiedDial {
    pub image: GrayImage,
    pub corners: DialCorners,
    /// Output-pixel to source-pixel homography, row-major.
    pub homography: [[f64; 3]; 3],
}

/// Bilinear sample in `[0, 1]`, `None` outside the pixel-centre hull.
///
/// `(x, y)` uses pixel-centre coordinates: pixel `(i, j)` sits at `(i, j)`.
#[inline]
pub(crate) fn sample_bilinear_checked(img: &GrayImage, x: f32, y: f32) -> Option<f32> {
    let (w, h) = img.dimensions();
    if w == 0 || h == 0 || x < 0.0 || y < 0.0 || x > (w - 1) as f32 || y > (h - 1) as f32 {
        return None;
    }
    let x0 = x.floor() as u32;
    let y0 = y.floor() as u32;
    let x1 = (x0 + 1).min(w - 1);
    let y1 = (y0 + 1).min(h - 1);
    let fx = x - x0 as f32;
    let fy = y - y0 as f32;

    const INV_255: f32 = 1.0 / 255.0;
    let p00 = img.get_pixel(x0, y0)[0] as f32 * INV_255;
    let p10 = img.get_pixel(x1, y0)[0] as f32 * INV_255;
    let p01 = img.get_pixel(x0, y1)[0] as f32 * INV_255;
    let p11 = img.get_pixel(x1, y1)[0] as f32 * INV_255;

    Some(
        (1.0 - fx) * (1.0 - fy) * p00
            + fx * (1.0 - fy) * p10
            + (1.0 - fx) * fy * p01
            + fx * fy * p11,
    )
}

/// Inverse-warp `src` through `h` (output → source, pixel-area coordinates).
fn warp_gray(src: &GrayImage, h: &Matrix3<f64>, width: u32, height: u32) -> GrayImage {
    GrayImage::from_fn(width, height, |u, v| {
        let p = homography_project(h, u as f64 + 0.5, v as f64 + 0.5);
        let sample = if p[0].is_finite() && p[1].is_finite() {
            sample_bilinear_checked(src, (p[0] - 0.5) as f32, (p[1] - 0.5) as f32)
        } else {
            None
        };
        Luma([(sample.unwrap_or(0.0) * 255.0).round().clamp(0.0, 255.0) as u8])
    })
}

/// Rectify the dial window.
///
/// `reference` and `detected` hold marker positions in the same role order
/// (see [`MarkerRole::RECTIFY_ORDER`](crate::MarkerRole::RECTIFY_ORDER)); only
/// the first three pairs determine the transform.
pub fn rectify_dial(
    gray: &GrayImage,
    reference: &[[f64; 2]],
    detected: &[[f64; 2]],
    dial: &DialRect,
) -> Result<RectifiedDial, ReadError> {
    let got = reference.len().min(detected.len());
    if got < MARKER_COUNT {
        return Err(ReadError::TooFewCorrespondences {
            needed: MARKER_COUNT,
            got,
        });
    }

    let affine = fit_affine_3pt(reference, detected).ok_or(ReadError::DegenerateReference)?;
    let mapped = dial
        .corners()
        .map(|c| homography_project(&affine, c[0], c[1]));
    let corners = DialCorners {
        top_left: mapped[0],
        top_right: mapped[1],
        bottom_left: mapped[2],
        bottom_right: mapped[3],
    };

    let (w, h) = (dial.width as f64, dial.height as f64);
    let out_corners = [[0.0, 0.0], [w, 0.0], [0.0, h], [w, h]];
    let homography = homography_from_quad(&out_corners, &corners.as_array())?;

    let image = warp_gray(gray, &homography, dial.width, dial.height);
    tracing::debug!(
        "Dial corners TL=({:.1},{:.1}) TR=({:.1},{:.1}) BL=({:.1},{:.1}) BR=({:.1},{:.1})",
        corners.top_left[0],
        corners.top_left[1],
        corners.top_right[0],
        corners.top_right[1],
        corners.bottom_left[0],
        corners.bottom_left[1],
        corners.bottom_right[0],
        corners.bottom_right[1]
    );

    Ok(RectifiedDial {
        image,
        corners,
        homography: matrix3_to_array(&homography),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn gradient_image(w: u32, h: u32) -> GrayImage {
        GrayImage::from_fn(w, h, |x, y| Luma([((x * 7 + y * 13) % 256) as u8]))
    }

    fn reference_points() -> Vec<[f64; 2]> {
        vec![
            [100.0, 150.0],
            [130.0, 60.0],
            [30.0, 60.0],
            [190.0, 60.0],
            [70.0, 60.0],
        ]
    }

    #[test]
    fn bilinear_midpoint_and_bounds() {
        let mut img = GrayImage::new(4, 4);
        img.put_pixel(1, 1, Luma([100]));
        img.put_pixel(2, 1, Luma([200]));
        img.put_pixel(1, 2, Luma([100]));
        img.put_pixel(2, 2, Luma([200]));
        let v = sample_bilinear_checked(&img, 1.5, 1.5).unwrap();
        assert_relative_eq!(v, 150.0 / 255.0, epsilon = 1e-6);
        assert!(sample_bilinear_checked(&img, -0.1, 1.0).is_none());
        assert!(sample_bilinear_checked(&img, 3.5, 1.0).is_none());
        // Last pixel row and column are reachable.
        assert!(sample_bilinear_checked(&img, 3.0, 3.0).is_some());
    }

    #[test]
    fn identical_reference_gives_direct_crop() {
        let gray = gradient_image(240, 180);
        let pts = reference_points();
        let dial = DialRect {
            x: 20.0,
            y: 80.0,
            width: 200,
            height: 40,
        };
        let out = rectify_dial(&gray, &pts, &pts, &dial).unwrap();
        assert_eq!(out.image.dimensions(), (200, 40));
        let crop = image::imageops::crop_imm(&gray, 20, 80, 200, 40).to_image();
        assert_eq!(out.image, crop);
        assert_relative_eq!(out.corners.top_left[0], 20.0, epsilon = 1e-9);
        assert_relative_eq!(out.corners.bottom_right[1], 120.0, epsilon = 1e-9);
    }

    #[test]
    fn translated_markers_shift_the_window() {
        let gray = gradient_image(240, 180);
        let reference = reference_points();
        let detected: Vec<[f64; 2]> = reference
            .iter()
            .map(|p| [p[0] + 5.0, p[1] - 3.0])
            .collect();
        let dial = DialRect {
            x: 20.0,
            y: 80.0,
            width: 100,
            height: 30,
        };
        let out = rectify_dial(&gray, &reference, &detected, &dial).unwrap();
        let crop = image::imageops::crop_imm(&gray, 25, 77, 100, 30).to_image();
        assert_eq!(out.image, crop);
    }

    #[test]
    fn only_first_three_correspondences_matter() {
        let gray = gradient_image(240, 180);
        let reference = reference_points();
        let mut detected = reference.clone();
        detected[3] = [0.0, 0.0];
        detected[4] = [239.0, 179.0];
        let dial = DialRect {
            x: 40.0,
            y: 90.0,
            width: 50,
            height: 20,
        };
        let out = rectify_dial(&gray, &reference, &detected, &dial).unwrap();
        let crop = image::imageops::crop_imm(&gray, 40, 90, 50, 20).to_image();
        assert_eq!(out.image, crop);
    }

    #[test]
    fn outside_source_is_background() {
        let gray = GrayImage::from_pixel(50, 50, Luma([200]));
        let pts = reference_points();
        let dial = DialRect {
            x: 30.0,
            y: 30.0,
            width: 40,
            height: 10,
        };
        let out = rectify_dial(&gray, &pts, &pts, &dial).unwrap();
        assert_eq!(out.image.get_pixel(5, 5)[0], 200);
        assert_eq!(out.image.get_pixel(35, 5)[0], 0);
    }

    #[test]
    fn too_few_correspondences() {
        let gray = GrayImage::new(10, 10);
        let pts = reference_points();
        let dial = DialRect {
            x: 0.0,
            y: 0.0,
            width: 4,
            height: 4,
        };
        assert_eq!(
            rectify_dial(&gray, &pts[..4], &pts[..4], &dial).unwrap_err(),
            ReadError::TooFewCorrespondences { needed: 5, got: 4 }
        );
    }

    #[test]
    fn collinear_reference_is_degenerate() {
        let gray = GrayImage::new(10, 10);
        let pts = vec![[0.0, 0.0], [1.0, 1.0], [2.0, 2.0], [5.0, 1.0], [7.0, 3.0]];
        let dial = DialRect {
            x: 0.0,
            y: 0.0,
            width: 4,
            height: 4,
        };
        assert_eq!(
            rectify_dial(&gray, &pts, &pts, &dial).unwrap_err(),
            ReadError::DegenerateReference
        );
    }
}
