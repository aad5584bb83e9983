//! Connected-component measurement on binary masks.
//!
//! Pixel `(i, j)` covers the unit square `[i, i+1) × [j, j+1)`, so centroids
//! are means of pixel centres `(i + 0.5, j + 0.5)` and agree with bounding-box
//! midpoints `x + w/2`.

use image::{GrayImage, Luma};
use imageproc::region_labelling::{connected_components, Connectivity};

use crate::ReadError;

/// Foreground value of every binary mask handled by the reader.
pub const FOREGROUND: u8 = 255;
/// Background value of every binary mask handled by the reader.
pub const BACKGROUND: u8 = 0;

/// Axis-aligned pixel bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    /// `width / height`.
    pub fn aspect_ratio(&self) -> f64 {
        self.width as f64 / self.height as f64
    }

    /// Half-open x-intervals `[x, x + width)` intersect.
    pub fn overlaps_horizontally(&self, other: &BoundingBox) -> bool {
        self.x < other.right() && other.x < self.right()
    }

    /// `self` ends strictly above where `other` starts.
    pub fn is_strictly_above(&self, other: &BoundingBox) -> bool {
        self.bottom() < other.y
    }
}

/// One measured connected component.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Blob {
    /// Pixel count.
    pub area: u32,
    /// Area-weighted mean position in pixel-area coordinates.
    pub centroid: [f64; 2],
    pub bbox: BoundingBox,
}

impl Blob {
    pub(crate) fn squared_distance(&self, other: &Blob) -> f64 {
        let dx = self.centroid[0] - other.centroid[0];
        let dy = self.centroid[1] - other.centroid[1];
        dx * dx + dy * dy
    }
}

#[derive(Debug, Clone)]
struct Accumulator {
    first_pixel: usize,
    area: u32,
    sum_x: f64,
    sum_y: f64,
    min_x: u32,
    min_y: u32,
    max_x: u32,
    max_y: u32,
}

impl Accumulator {
    fn new(first_pixel: usize, x: u32, y: u32) -> Self {
        Self {
            first_pixel,
            area: 0,
            sum_x: 0.0,
            sum_y: 0.0,
            min_x: x,
            min_y: y,
            max_x: x,
            max_y: y,
        }
    }

    fn add(&mut self, x: u32, y: u32) {
        self.area += 1;
        self.sum_x += x as f64 + 0.5;
        self.sum_y += y as f64 + 0.5;
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    fn finish(&self) -> Blob {
        let n = self.area as f64;
        Blob {
            area: self.area,
            centroid: [self.sum_x / n, self.sum_y / n],
            bbox: BoundingBox {
                x: self.min_x,
                y: self.min_y,
                width: self.max_x - self.min_x + 1,
                height: self.max_y - self.min_y + 1,
            },
        }
    }
}

/// Reject masks holding anything but [`BACKGROUND`] and [`FOREGROUND`].
pub fn ensure_binary(mask: &GrayImage) -> Result<(), ReadError> {
    match mask
        .enumerate_pixels()
        .find(|(_, _, p)| p[0] != FOREGROUND && p[0] != BACKGROUND)
    {
        Some((x, y, p)) => Err(ReadError::NonBinaryMask { value: p[0], x, y }),
        None => Ok(()),
    }
}

/// Measure 8-connected foreground regions of at least `min_area` pixels.
///
/// Blobs are returned in raster-scan order of each region's first pixel.
pub fn measure_blobs(mask: &GrayImage, min_area: u32) -> Result<Vec<Blob>, ReadError> {
    ensure_binary(mask)?;
    let min_area = min_area.max(1);

    let labels = connected_components(mask, Connectivity::Eight, Luma([BACKGROUND]));
    let width = mask.width() as usize;

    let mut accumulators: Vec<Option<Accumulator>> = Vec::new();
    for (x, y, label) in labels.enumerate_pixels() {
        let label = label[0] as usize;
        if label == 0 {
            continue;
        }
        if accumulators.len() <= label {
            accumulators.resize(label + 1, None);
        }
        accumulators[label]
            .get_or_insert_with(|| Accumulator::new(y as usize * width + x as usize, x, y))
            .add(x, y);
    }

    let mut regions: Vec<Accumulator> = accumulators
        .into_iter()
        .flatten()
        .filter(|acc| acc.area >= min_area)
        .collect();
    regions.sort_by_key(|acc| acc.first_pixel);

    let blobs: Vec<Blob> = regions.iter().map(Accumulator::finish).collect();
    tracing::debug!(
        "Measured {} blobs (min_area={}) in {}x{} mask",
        blobs.len(),
        min_area,
        mask.width(),
        mask.height()
    );
    Ok(blobs)
}
