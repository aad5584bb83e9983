//! Prototype-based digit classifier.
//!
//! The meter type carries a trained self-organising map flattened to its
//! labelled units: each unit is a weight vector over glyph pixels plus the
//! digit it was calibrated to. Classification is nearest-unit search.

use image::GrayImage;

use crate::ReadError;

/// Nearest label and its Euclidean distance.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Classification {
    pub label: u8,
    pub distance: f64,
}

/// Digit classifier over glyph feature vectors.
pub trait DigitClassifier {
    /// Best label for `features`, first prototype winning ties.
    fn classify(&self, features: &[f64]) -> Classification;

    /// Distance from `features` to the closest prototype labelled `label`.
    fn distance_to_label(&self, features: &[f64], label: u8) -> f64;
}

/// Glyph pixel intensities (0–255) in row-major order.
pub fn glyph_features(glyph: &GrayImage) -> Vec<f64> {
    glyph.as_raw().iter().map(|&v| v as f64).collect()
}

fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

/// One labelled map unit.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SomPrototype {
    pub label: u8,
    pub weights: Vec<f64>,
}

/// Labelled SOM units.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "Vec<SomPrototype>", into = "Vec<SomPrototype>")]
pub struct SomClassifier {
    prototypes: Vec<SomPrototype>,
}

impl SomClassifier {
    /// Validate and wrap prototypes: labels 0–9, every digit present, equal
    /// non-zero lengths.
    pub fn new(prototypes: Vec<SomPrototype>) -> Result<Self, ReadError> {
        let Some(first) = prototypes.first() else {
            return Err(ReadError::InvalidMeterType(
                "classifier has no prototypes".into(),
            ));
        };
        let len = first.weights.len();
        if len == 0 {
            return Err(ReadError::InvalidMeterType(
                "classifier prototypes are empty".into(),
            ));
        }
        for (i, p) in prototypes.iter().enumerate() {
            if p.label > 9 {
                return Err(ReadError::InvalidMeterType(format!(
                    "prototype {} has label {} (expected 0..=9)",
                    i, p.label
                )));
            }
            if p.weights.len() != len {
                return Err(ReadError::InvalidMeterType(format!(
                    "prototype {} has {} weights, expected {}",
                    i,
                    p.weights.len(),
                    len
                )));
            }
        }
        let out = Self { prototypes };
        if let Some(missing) = out.missing_label() {
            return Err(ReadError::InvalidMeterType(format!(
                "classifier has no prototype for digit {}",
                missing
            )));
        }
        Ok(out)
    }

    /// One prototype per labelled glyph, weights taken from its pixels.
    pub fn from_glyphs<'a>(
        glyphs: impl IntoIterator<Item = (u8, &'a GrayImage)>,
    ) -> Result<Self, ReadError> {
        Self::new(
            glyphs
                .into_iter()
                .map(|(label, img)| SomPrototype {
                    label,
                    weights: glyph_features(img),
                })
                .collect(),
        )
    }

    pub fn prototypes(&self) -> &[SomPrototype] {
        &self.prototypes
    }

    /// Feature-vector length every prototype shares.
    pub fn input_len(&self) -> usize {
        self.prototypes.first().map_or(0, |p| p.weights.len())
    }

    /// Prototype count per label `0..=9`.
    pub fn label_histogram(&self) -> [usize; 10] {
        let mut out = [0usize; 10];
        for p in &self.prototypes {
            out[p.label as usize] += 1;
        }
        out
    }

    /// First digit without a prototype.
    pub fn missing_label(&self) -> Option<u8> {
        let histogram = self.label_histogram();
        (0..10u8).find(|&d| histogram[d as usize] == 0)
    }
}

impl TryFrom<Vec<SomPrototype>> for SomClassifier {
    type Error = ReadError;

    fn try_from(prototypes: Vec<SomPrototype>) -> Result<Self, Self::Error> {
        Self::new(prototypes)
    }
}

impl From<SomClassifier> for Vec<SomPrototype> {
    fn from(som: SomClassifier) -> Self {
        som.prototypes
    }
}

impl DigitClassifier for SomClassifier {
    fn classify(&self, features: &[f64]) -> Classification {
        let mut best = Classification {
            label: 0,
            distance: f64::INFINITY,
        };
        for p in &self.prototypes {
            let d = euclidean(features, &p.weights);
            if d < best.distance {
                best = Classification {
                    label: p.label,
                    distance: d,
                };
            }
        }
        best
    }

    fn distance_to_label(&self, features: &[f64], label: u8) -> f64 {
        self.prototypes
            .iter()
            .filter(|p| p.label == label)
            .map(|p| euclidean(features, &p.weights))
            .fold(f64::INFINITY, f64::min)
    }
}
