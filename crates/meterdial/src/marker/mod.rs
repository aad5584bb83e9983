//! Reference-marker segmentation, identification and anchoring.

mod anchor;
mod mask;
mod roles;

pub use anchor::{locate_anchors, MarkerAnchors};
pub use mask::{red_marker_mask, RedMaskParams};
pub use roles::{identify_markers, MarkerRole, RoleAssignment, MARKER_COUNT};
