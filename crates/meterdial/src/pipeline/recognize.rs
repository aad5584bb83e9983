//! Digit stage: binarize -> digit blobs -> wheel order -> glyphs -> labels.

use super::*;
use crate::classify::PairResolution;
use crate::digits::{DigitImage, OrderGroup};

pub(super) struct Recognition {
    pub binarized: GrayImage,
    pub digit_blobs: Vec<Blob>,
    pub groups: Vec<OrderGroup>,
    pub digit_images: Vec<DigitImage>,
    pub classifications: Vec<Classification>,
    pub labels: Vec<Classification>,
    pub pairs: Vec<PairResolution>,
    pub reading: u64,
}

pub(super) fn run<C: DigitClassifier + ?Sized>(
    dial: &GrayImage,
    meter_type: &MeterType,
    config: &ReadConfig,
    classifier: &C,
) -> Result<Recognition, ReadError> {
    let binarized = binarize_dial(dial, &config.binarize);
    let digit_blobs = measure_blobs(&binarized, config.min_digit_area)?;
    let groups = order_digits(&digit_blobs);
    tracing::info!(
        "{} digit blobs in {} wheel groups (min_area={})",
        digit_blobs.len(),
        groups.len(),
        config.min_digit_area
    );

    let digit_images = segment_digits(&binarized, &digit_blobs, &groups, meter_type.glyph);
    let features: Vec<Vec<f64>> = digit_images
        .iter()
        .map(|d| glyph_features(&d.image))
        .collect();
    let classifications: Vec<Classification> =
        features.iter().map(|f| classifier.classify(f)).collect();
    for (d, c) in digit_images.iter().zip(&classifications) {
        tracing::debug!(
            "  glyph group={} blob={}: label={} dist={:.2}",
            d.group,
            d.blob,
            c.label,
            c.distance
        );
    }

    let resolved = disambiguate(classifier, &features, &classifications, &groups)?;
    let final_labels: Vec<u8> = resolved.labels.iter().map(|c| c.label).collect();
    let reading = digits_to_reading(&final_labels, &groups, &digit_blobs).map_err(|e| {
        tracing::warn!("Reading assembly failed: {}", e);
        e
    })?;

    Ok(Recognition {
        binarized,
        digit_blobs,
        groups,
        digit_images,
        classifications,
        labels: resolved.labels,
        pairs: resolved.pairs,
        reading,
    })
}
