//! Four-corner homography for the dial warp.
//!
//! The rectifier maps the output rectangle's corners onto their positions in
//! the photograph. Four exact correspondences fix the homography up to scale,
//! so with `h33 = 1` it is the solution of one 8x8 linear system.

use nalgebra::{Matrix3, SMatrix, SVector, Vector3};

#[derive(Debug, Clone, PartialEq)]
pub enum HomographyError {
    /// A corner coordinate is NaN or infinite.
    NonFiniteCorner,
    /// Three corners of one quadrilateral are (nearly) collinear.
    DegenerateQuad,
}

impl std::fmt::Display for HomographyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonFiniteCorner => write!(f, "corner coordinate is not finite"),
            Self::DegenerateQuad => write!(f, "three quadrilateral corners are collinear"),
        }
    }
}

impl std::error::Error for HomographyError {}

/// Project a 2D point through a 3×3 homography: H * [x, y, 1]^T → [u, v].
pub fn homography_project(h: &Matrix3<f64>, x: f64, y: f64) -> [f64; 2] {
    let p = h * Vector3::new(x, y, 1.0);
    if p[2].abs() < 1e-15 {
        return [f64::NAN, f64::NAN];
    }
    [p[0] / p[2], p[1] / p[2]]
}

pub fn matrix3_to_array(m: &Matrix3<f64>) -> [[f64; 3]; 3] {
    [
        [m[(0, 0)], m[(0, 1)], m[(0, 2)]],
        [m[(1, 0)], m[(1, 1)], m[(1, 2)]],
        [m[(2, 0)], m[(2, 1)], m[(2, 2)]],
    ]
}

/// Any corner triangle with area below `1e-9` of the squared extent.
fn is_degenerate(quad: &[[f64; 2]; 4]) -> bool {
    let mut lo = [f64::INFINITY; 2];
    let mut hi = [f64::NEG_INFINITY; 2];
    for p in quad {
        for k in 0..2 {
            lo[k] = lo[k].min(p[k]);
            hi[k] = hi[k].max(p[k]);
        }
    }
    let extent = (hi[0] - lo[0]).max(hi[1] - lo[1]);
    if extent <= 0.0 {
        return true;
    }

    const TRIPLES: [[usize; 3]; 4] = [[0, 1, 2], [0, 1, 3], [0, 2, 3], [1, 2, 3]];
    TRIPLES.iter().any(|&[a, b, c]| {
        let (pa, pb, pc) = (quad[a], quad[b], quad[c]);
        let cross = (pb[0] - pa[0]) * (pc[1] - pa[1]) - (pb[1] - pa[1]) * (pc[0] - pa[0]);
        cross.abs() < 1e-9 * extent * extent
    })
}

/// Homography H with `dst[k] = project(H, src[k])` for all four corners.
pub fn homography_from_quad(
    src: &[[f64; 2]; 4],
    dst: &[[f64; 2]; 4],
) -> Result<Matrix3<f64>, HomographyError> {
    if src
        .iter()
        .chain(dst)
        .any(|p| !p[0].is_finite() || !p[1].is_finite())
    {
        return Err(HomographyError::NonFiniteCorner);
    }
    if is_degenerate(src) || is_degenerate(dst) {
        return Err(HomographyError::DegenerateQuad);
    }

    // x = (h0 u + h1 v + h2) / (h6 u + h7 v + 1), likewise y with h3..h5.
    let mut a = SMatrix::<f64, 8, 8>::zeros();
    let mut b = SVector::<f64, 8>::zeros();
    for (i, (s, d)) in src.iter().zip(dst).enumerate() {
        let (u, v, x, y) = (s[0], s[1], d[0], d[1]);
        let r = 2 * i;
        a[(r, 0)] = u;
        a[(r, 1)] = v;
        a[(r, 2)] = 1.0;
        a[(r, 6)] = -u * x;
        a[(r, 7)] = -v * x;
        b[r] = x;

        a[(r + 1, 3)] = u;
        a[(r + 1, 4)] = v;
        a[(r + 1, 5)] = 1.0;
        a[(r + 1, 6)] = -u * y;
        a[(r + 1, 7)] = -v * y;
        b[r + 1] = y;
    }

    let h = a.lu().solve(&b).ok_or(HomographyError::DegenerateQuad)?;
    Ok(Matrix3::new(
        h[0], h[1], h[2], //
        h[3], h[4], h[5], //
        h[6], h[7], 1.0,
    ))
}
