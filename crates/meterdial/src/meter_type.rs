//! Per-model meter template.
//!
//! Meter type JSON follows the `meterdial.type.v1` schema: template marker
//! positions per role, the digit window in that frame, the glyph size fed to
//! the classifier, and the classifier prototypes themselves.

use std::path::Path;

use crate::classify::{SomClassifier, SomPrototype};
use crate::digits::GlyphSize;
use crate::marker::{MarkerAnchors, MarkerRole};
use crate::rectify::DialRect;
use crate::ReadError;

const METER_TYPE_SCHEMA_V1: &str = "meterdial.type.v1";

/// Read-only template for one meter model.
#[derive(Debug, Clone)]
pub struct MeterType {
    pub name: String,
    /// Marker positions on the fronto-parallel template.
    pub reference: MarkerAnchors,
    pub dial: DialRect,
    pub glyph: GlyphSize,
    pub classifier: SomClassifier,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct MeterTypeSpecV1 {
    schema: String,
    name: String,
    reference: MarkerAnchors,
    dial: DialRect,
    glyph: GlyphSize,
    prototypes: Vec<SomPrototype>,
}

/// Compact description printed by `meterdial type-info`.
#[derive(Debug, Clone, serde::Serialize)]
pub struct MeterTypeSummary {
    pub name: String,
    pub dial: DialRect,
    pub glyph: GlyphSize,
    pub n_prototypes: usize,
    /// Prototype count per digit `0..=9`.
    pub prototypes_per_label: [usize; 10],
}

impl MeterType {
    /// Assemble and validate a meter type.
    pub fn new(
        name: impl Into<String>,
        reference: MarkerAnchors,
        dial: DialRect,
        glyph: GlyphSize,
        classifier: SomClassifier,
    ) -> Result<Self, ReadError> {
        let out = Self {
            name: name.into(),
            reference,
            dial,
            glyph,
            classifier,
        };
        out.validate()?;
        Ok(out)
    }

    /// Check sizes and classifier compatibility.
    pub fn validate(&self) -> Result<(), ReadError> {
        let invalid = |msg: String| Err(ReadError::InvalidMeterType(msg));
        if self.name.trim().is_empty() {
            return invalid("meter type name must not be empty".into());
        }
        if self.dial.width == 0 || self.dial.height == 0 {
            return invalid(format!(
                "dial size must be positive, got {}x{}",
                self.dial.width, self.dial.height
            ));
        }
        if !self.dial.x.is_finite() || !self.dial.y.is_finite() {
            return invalid("dial origin must be finite".into());
        }
        if self.glyph.width == 0 || self.glyph.height == 0 {
            return invalid(format!(
                "glyph size must be positive, got {}x{}",
                self.glyph.width, self.glyph.height
            ));
        }
        for role in MarkerRole::ALL {
            let p = self.reference.get(role);
            if !p[0].is_finite() || !p[1].is_finite() {
                return invalid(format!("reference point for {:?} is not finite", role));
            }
        }
        if let Some(digit) = self.classifier.missing_label() {
            return invalid(format!("no classifier prototype for digit {}", digit));
        }
        if self.classifier.input_len() != self.glyph.pixel_count() {
            return invalid(format!(
                "prototype length {} does not match glyph {}x{}",
                self.classifier.input_len(),
                self.glyph.width,
                self.glyph.height
            ));
        }
        Ok(())
    }

    /// Template marker positions in rectification order.
    pub fn reference_points(&self) -> Vec<[f64; 2]> {
        self.reference.in_order(&MarkerRole::RECTIFY_ORDER)
    }

    pub fn summary(&self) -> MeterTypeSummary {
        MeterTypeSummary {
            name: self.name.clone(),
            dial: self.dial,
            glyph: self.glyph,
            n_prototypes: self.classifier.prototypes().len(),
            prototypes_per_label: self.classifier.label_histogram(),
        }
    }

    /// Load a meter type from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json_str(&data)
    }

    pub fn from_json_str(data: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let spec: MeterTypeSpecV1 = serde_json::from_str(data)?;
        Self::from_spec(spec).map_err(Into::into)
    }

    /// Serialize to `meterdial.type.v1` JSON.
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        let spec = MeterTypeSpecV1 {
            schema: METER_TYPE_SCHEMA_V1.to_string(),
            name: self.name.clone(),
            reference: self.reference,
            dial: self.dial,
            glyph: self.glyph,
            prototypes: self.classifier.prototypes().to_vec(),
        };
        serde_json::to_string_pretty(&spec)
    }

    fn from_spec(spec: MeterTypeSpecV1) -> Result<Self, ReadError> {
        if spec.schema != METER_TYPE_SCHEMA_V1 {
            return Err(ReadError::InvalidMeterType(format!(
                "unsupported meter type schema '{}' (expected '{}')",
                spec.schema, METER_TYPE_SCHEMA_V1
            )));
        }
        let classifier = SomClassifier::new(spec.prototypes)?;
        Self::new(spec.name, spec.reference, spec.dial, spec.glyph, classifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference() -> MarkerAnchors {
        MarkerAnchors {
            center: [100.0, 150.0],
            tenth: [190.0, 60.0],
            hundredth: [130.0, 60.0],
            thousandth: [70.0, 60.0],
            ten_thousandth: [30.0, 60.0],
        }
    }

    fn sample_type() -> MeterType {
        let classifier = SomClassifier::new(
            (0..10u8)
                .map(|label| SomPrototype {
                    label,
                    weights: vec![label as f64 * 25.0; 6],
                })
                .collect(),
        )
        .unwrap();
        MeterType::new(
            "test-meter",
            reference(),
            DialRect {
                x: 20.0,
                y: 80.0,
                width: 200,
                height: 40,
            },
            GlyphSize {
                width: 2,
                height: 3,
            },
            classifier,
        )
        .unwrap()
    }

    #[test]
    fn json_round_trip() {
        let mt = sample_type();
        let json = mt.to_json_string().unwrap();
        assert!(json.contains("meterdial.type.v1"));
        let back = MeterType::from_json_str(&json).unwrap();
        assert_eq!(back.name, "test-meter");
        assert_eq!(back.reference, mt.reference);
        assert_eq!(back.dial, mt.dial);
        assert_eq!(back.classifier, mt.classifier);
    }

    #[test]
    fn reference_points_follow_rectify_order() {
        let pts = sample_type().reference_points();
        assert_eq!(
            pts,
            vec![
                [100.0, 150.0],
                [130.0, 60.0],
                [30.0, 60.0],
                [190.0, 60.0],
                [70.0, 60.0]
            ]
        );
    }

    #[test]
    fn rejects_wrong_schema_and_sizes() {
        let json = sample_type().to_json_string().unwrap();
        let bad_schema = json.replace("meterdial.type.v1", "meterdial.type.v0");
        let err = MeterType::from_json_str(&bad_schema).unwrap_err();
        assert!(err.to_string().contains("unsupported meter type schema"));

        let bad_glyph = json.replace("\"height\": 3", "\"height\": 4");
        assert!(MeterType::from_json_str(&bad_glyph).is_err());

        let unknown_field = json.replacen('{', "{\n  \"extra\": 1,", 1);
        assert!(MeterType::from_json_str(&unknown_field).is_err());
    }

    #[test]
    fn zero_sized_dial_is_invalid() {
        let mut mt = sample_type();
        mt.dial.width = 0;
        assert!(matches!(
            mt.validate(),
            Err(ReadError::InvalidMeterType(_))
        ));
    }

    #[test]
    fn missing_digit_prototype_is_rejected() {
        let json = sample_type().to_json_string().unwrap();
        let mut value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let prototypes = value["prototypes"].as_array_mut().unwrap();
        prototypes.retain(|p| p["label"] != 4);
        assert_eq!(prototypes.len(), 9);
        let err = MeterType::from_json_str(&value.to_string()).unwrap_err();
        assert!(err.to_string().contains("digit 4"));
    }

    #[test]
    fn summary_counts_prototypes() {
        let s = sample_type().summary();
        assert_eq!(s.n_prototypes, 10);
        assert_eq!(s.prototypes_per_label, [1; 10]);
    }
}
