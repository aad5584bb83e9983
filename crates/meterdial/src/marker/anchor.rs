//! Needle-tip anchors of the pointer markers.
//!
//! Each pointer marker is an elongated red stroke. Its anchor is the middle of
//! the densest scanline across the stroke: rows for tall markers, columns for
//! wide ones, and the better of two diagonals otherwise.

use image::GrayImage;

use crate::blob::{Blob, BoundingBox, FOREGROUND};
use crate::marker::roles::{MarkerRole, RoleAssignment};
use crate::ReadError;

/// One anchor point per marker role, in source-image pixel-area coordinates.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MarkerAnchors {
    pub center: [f64; 2],
    pub tenth: [f64; 2],
    pub hundredth: [f64; 2],
    pub thousandth: [f64; 2],
    pub ten_thousandth: [f64; 2],
}

impl MarkerAnchors {
    pub fn get(&self, role: MarkerRole) -> [f64; 2] {
        match role {
            MarkerRole::Center => self.center,
            MarkerRole::Tenth => self.tenth,
            MarkerRole::Hundredth => self.hundredth,
            MarkerRole::Thousandth => self.thousandth,
            MarkerRole::TenThousandth => self.ten_thousandth,
        }
    }

    /// Anchors in `order`.
    pub fn in_order(&self, order: &[MarkerRole]) -> Vec<[f64; 2]> {
        order.iter().map(|&role| self.get(role)).collect()
    }
}

/// Which scan produced a pointer anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScanKind {
    Rows,
    Columns,
    Diagonal,
    AntiDiagonal,
}

/// Midpoint of the first and last index holding the maximum count.
fn tied_max_midpoint(counts: &[u32]) -> f64 {
    let Some(&max) = counts.iter().max() else {
        return 0.0;
    };
    let first = counts.iter().position(|&c| c == max).unwrap_or(0);
    let last = counts.iter().rposition(|&c| c == max).unwrap_or(first);
    (first + last) as f64 / 2.0
}

fn is_fg(mask: &GrayImage, x: u32, y: u32) -> bool {
    mask.get_pixel_checked(x, y).is_some_and(|p| p[0] == FOREGROUND)
}

/// Locate the anchor of a pointer marker inside `bbox`.
pub(crate) fn scan_anchor(mask: &GrayImage, bbox: &BoundingBox) -> ([f64; 2], ScanKind) {
    let (bx, by, w, h) = (bbox.x, bbox.y, bbox.width, bbox.height);
    let (xf, yf, wf, hf) = (bx as f64, by as f64, w as f64, h as f64);
    let r = bbox.aspect_ratio();

    if r <= 0.5 {
        let rows: Vec<u32> = (0..h)
            .map(|dy| (0..w).filter(|&dx| is_fg(mask, bx + dx, by + dy)).count() as u32)
            .collect();
        let j = tied_max_midpoint(&rows);
        return ([xf + wf / 2.0, yf + j], ScanKind::Rows);
    }
    if r >= 2.0 {
        let cols: Vec<u32> = (0..w)
            .map(|dx| (0..h).filter(|&dy| is_fg(mask, bx + dx, by + dy)).count() as u32)
            .collect();
        let j = tied_max_midpoint(&cols);
        return ([xf + j, yf + hf / 2.0], ScanKind::Columns);
    }

    let n = (w + h - 1) as usize;
    let mut diag = vec![0u32; n];
    let mut anti = vec![0u32; n];
    for dy in 0..h {
        for dx in 0..w {
            if is_fg(mask, bx + dx, by + dy) {
                diag[(dx + dy) as usize] += 1;
                anti[(w - 1 - dx + dy) as usize] += 1;
            }
        }
    }
    let zeros = |v: &[u32]| v.iter().filter(|&&c| c == 0).count();

    if zeros(&diag) > zeros(&anti) {
        let j = tied_max_midpoint(&anti) * hf / n as f64;
        let k = wf - r * j;
        ([xf + k, yf + j], ScanKind::AntiDiagonal)
    } else {
        let j = tied_max_midpoint(&diag) * hf / n as f64;
        let k = j * r;
        ([xf + k, yf + j], ScanKind::Diagonal)
    }
}

/// Anchor of every marker: CENTER keeps its centroid, pointers use
/// [`scan_anchor`] over their bounding box.
pub fn locate_anchors(
    mask: &GrayImage,
    blobs: &[Blob],
    roles: &RoleAssignment,
) -> Result<MarkerAnchors, ReadError> {
    if blobs.len() != super::MARKER_COUNT {
        return Err(ReadError::WrongBlobCount {
            expected: super::MARKER_COUNT,
            found: blobs.len(),
        });
    }

    let pointer = |role: MarkerRole| {
        let blob = &blobs[roles.index(role)];
        let (p, kind) = scan_anchor(mask, &blob.bbox);
        tracing::debug!(
            "{:?} anchor ({:.2}, {:.2}) via {:?} scan of {}x{} box",
            role,
            p[0],
            p[1],
            kind,
            blob.bbox.width,
            blob.bbox.height
        );
        p
    };

    Ok(MarkerAnchors {
        center: blobs[roles.center].centroid,
        tenth: pointer(MarkerRole::Tenth),
        hundredth: pointer(MarkerRole::Hundredth),
        thousandth: pointer(MarkerRole::Thousandth),
        ten_thousandth: pointer(MarkerRole::TenThousandth),
    })
}
