//! Marker stage: red mask -> blobs -> roles -> anchors -> rectified dial.

use super::*;
use crate::marker::{MarkerAnchors, MarkerRole, RoleAssignment};
use crate::rectify::RectifiedDial;

pub(super) struct Calibration {
    pub marker_mask: GrayImage,
    pub marker_blobs: Vec<Blob>,
    pub roles: RoleAssignment,
    pub anchors: MarkerAnchors,
    pub dial: RectifiedDial,
}

pub(super) fn run(
    photo: &RgbImage,
    meter_type: &MeterType,
    config: &ReadConfig,
) -> Result<Calibration, ReadError> {
    let marker_mask = red_marker_mask(photo, &config.red_mask);
    let marker_blobs = measure_blobs(&marker_mask, config.min_marker_area)?;
    tracing::info!(
        "{} red marker blobs (min_area={})",
        marker_blobs.len(),
        config.min_marker_area
    );
    for (i, b) in marker_blobs.iter().enumerate() {
        tracing::debug!(
            "  marker blob {}: area={} centroid=({:.1},{:.1}) bbox={}x{}@({},{})",
            i,
            b.area,
            b.centroid[0],
            b.centroid[1],
            b.bbox.width,
            b.bbox.height,
            b.bbox.x,
            b.bbox.y
        );
    }

    let roles = identify_markers(&marker_blobs).map_err(|e| {
        tracing::warn!("Calibration rejected: {}", e);
        e
    })?;
    let anchors = locate_anchors(&marker_mask, &marker_blobs, &roles)?;

    let gray = image::imageops::grayscale(photo);
    let detected = anchors.in_order(&MarkerRole::RECTIFY_ORDER);
    let dial = rectify_dial(
        &gray,
        &meter_type.reference_points(),
        &detected,
        &meter_type.dial,
    )
    .map_err(|e| {
        tracing::warn!("Dial rectification failed: {}", e);
        e
    })?;
    tracing::info!(
        "Rectified {}x{} dial for meter type '{}'",
        dial.image.width(),
        dial.image.height(),
        meter_type.name
    );

    Ok(Calibration {
        marker_mask,
        marker_blobs,
        roles,
        anchors,
        dial,
    })
}
