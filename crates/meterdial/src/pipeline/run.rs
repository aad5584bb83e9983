//! Top-level pipeline orchestrator: calibrate -> recognize.

use super::*;

/// Read one photograph.
pub(crate) fn read_meter<C: DigitClassifier + ?Sized>(
    photo: &RgbImage,
    meter_type: &MeterType,
    config: &ReadConfig,
    classifier: &C,
) -> Result<(ReadResult, ReadArtifacts), ReadError> {
    let (w, h) = photo.dimensions();
    tracing::info!("Reading {}x{} photograph", w, h);

    let cal = super::calibrate::run(photo, meter_type, config)?;
    let rec = super::recognize::run(&cal.dial.image, meter_type, config, classifier)?;
    tracing::info!(
        "Reading {} from {} wheels ({} split)",
        rec.reading,
        rec.groups.len(),
        rec.pairs.len()
    );

    let result = ReadResult {
        reading: rec.reading,
        image_size: [w, h],
        marker_blobs: cal.marker_blobs,
        roles: cal.roles,
        anchors: cal.anchors,
        dial_corners: cal.dial.corners,
        homography: cal.dial.homography,
        digit_blobs: rec.digit_blobs,
        groups: rec.groups,
        classifications: rec.classifications,
        labels: rec.labels,
        pair_resolutions: rec.pairs,
    };
    let artifacts = ReadArtifacts {
        marker_mask: cal.marker_mask,
        rectified_dial: cal.dial.image,
        binarized_dial: rec.binarized,
        digit_images: rec.digit_images,
    };
    Ok((result, artifacts))
}
