//! Consistency repair for split wheels.
//!
//! Both halves of a split group belong to consecutive digits on one wheel, so
//! their labels must differ by exactly one (mod 10). Two hypotheses are scored
//! by classifier distance: trust the upper label and force the lower to its
//! successor, or trust the lower label and force the upper to its predecessor.

use crate::classify::som::{Classification, DigitClassifier};
use crate::digits::{group_entry_count, OrderGroup};
use crate::ReadError;

/// Outcome of one split-group repair.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PairResolution {
    /// Group index.
    pub group: usize,
    /// Index of the upper image; the lower image follows it.
    pub image: usize,
    /// Cost when the upper label is kept.
    pub as_classified_cost: f64,
    /// Cost when the lower label is kept.
    pub shifted_cost: f64,
    /// `true` when the lower label was kept.
    pub shifted: bool,
    /// Half the chosen cost; lower is better.
    pub confidence: f64,
}

/// Disambiguated labels aligned with the digit images.
#[derive(Debug, Clone, PartialEq)]
pub struct Disambiguated {
    pub labels: Vec<Classification>,
    pub pairs: Vec<PairResolution>,
}

/// Force split-group labels to be consecutive.
///
/// `features` and `initial` are aligned with the digit image sequence. Final
/// distances are re-measured against the final labels.
pub fn disambiguate<C: DigitClassifier + ?Sized>(
    classifier: &C,
    features: &[Vec<f64>],
    initial: &[Classification],
    groups: &[OrderGroup],
) -> Result<Disambiguated, ReadError> {
    let entries = group_entry_count(groups);
    if initial.len() != entries || features.len() != entries {
        return Err(ReadError::LabelCountMismatch {
            labels: initial.len().min(features.len()),
            blobs: entries,
        });
    }

    if let Some((image, c)) = initial.iter().enumerate().find(|(_, c)| c.label > 9) {
        return Err(ReadError::InvalidDigitLabel {
            image,
            label: c.label,
        });
    }

    let mut labels = initial.to_vec();
    let mut pairs = Vec::new();
    let mut i = 0;
    for (g, group) in groups.iter().enumerate() {
        if !group.is_split() {
            i += 1;
            continue;
        }
        let j = i + 1;
        let (li, lj) = (labels[i].label, labels[j].label);
        let next = (li + 1) % 10;
        let prev = (lj + 9) % 10;

        let as_classified = classifier.distance_to_label(&features[i], li)
            + classifier.distance_to_label(&features[j], next);
        let shifted = classifier.distance_to_label(&features[i], prev)
            + classifier.distance_to_label(&features[j], lj);

        let take_shifted = shifted < as_classified;
        let (upper, lower) = if take_shifted { (prev, lj) } else { (li, next) };
        labels[i] = Classification {
            label: upper,
            distance: classifier.distance_to_label(&features[i], upper),
        };
        labels[j] = Classification {
            label: lower,
            distance: classifier.distance_to_label(&features[j], lower),
        };

        let chosen = if take_shifted { shifted } else { as_classified };
        tracing::debug!(
            "Split group {}: {}/{} -> {}/{} (cost {:.2} vs {:.2})",
            g,
            li,
            lj,
            upper,
            lower,
            as_classified,
            shifted
        );
        pairs.push(PairResolution {
            group: g,
            image: i,
            as_classified_cost: as_classified,
            shifted_cost: shifted,
            shifted: take_shifted,
            confidence: chosen / 2.0,
        });
        i += 2;
    }

    Ok(Disambiguated { labels, pairs })
}
