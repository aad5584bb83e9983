use nalgebra::Matrix3;

/// Exact affine transform mapping `src[k] → dst[k]` for `k = 0, 1, 2`.
///
/// Only the first three correspondences are used even if more are supplied.
/// Returns `None` when the three source points are collinear.
pub fn fit_affine_3pt(src: &[[f64; 2]], dst: &[[f64; 2]]) -> Option<Matrix3<f64>> {
    if src.len() < 3 || dst.len() < 3 {
        return None;
    }

    // Columns are homogeneous points: A * P = Q.
    let p = Matrix3::new(
        src[0][0], src[1][0], src[2][0],
        src[0][1], src[1][1], src[2][1],
        1.0, 1.0, 1.0,
    );
    let q = Matrix3::new(
        dst[0][0], dst[1][0], dst[2][0],
        dst[0][1], dst[1][1], dst[2][1],
        1.0, 1.0, 1.0,
    );

    // det(P) is twice the signed triangle area.
    if p.determinant().abs() < 1e-9 {
        return None;
    }
    let mut a = q * p.try_inverse()?;
    a[(2, 0)] = 0.0;
    a[(2, 1)] = 0.0;
    a[(2, 2)] = 1.0;
    Some(a)
}
