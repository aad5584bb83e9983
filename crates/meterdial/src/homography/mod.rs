//! Point-correspondence transforms: exact 3-point affine fits and
//! four-corner homographies.

mod affine;
mod core;

pub use self::affine::fit_affine_3pt;
pub use self::core::{
    homography_from_quad, homography_project, matrix3_to_array, HomographyError,
};
