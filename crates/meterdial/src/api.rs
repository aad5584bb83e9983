//! High-level reading API.
//!
//! [`MeterReader`] is the primary entry point. It owns a [`MeterType`] and a
//! [`ReadConfig`]; create it once per meter model and read many photographs.

use image::RgbImage;
use std::path::Path;

use crate::classify::DigitClassifier;
use crate::config::ReadConfig;
use crate::meter_type::MeterType;
use crate::pipeline::{self, ReadArtifacts, ReadResult};
use crate::ReadError;

/// Primary reading interface.
///
/// # Examples
///
/// ```no_run
/// use meterdial::MeterReader;
/// use std::path::Path;
///
/// let reader = MeterReader::from_meter_type_json_file(Path::new("meter.json")).unwrap();
/// let photo = image::open("meter.jpg").unwrap().to_rgb8();
/// match reader.read(&photo) {
///     Ok(result) => println!("reading: {}", result.reading),
///     Err(e) => eprintln!("no reading: {}", e),
/// }
/// ```
#[derive(Debug, Clone)]
pub struct MeterReader {
    meter_type: MeterType,
    config: ReadConfig,
}

impl MeterReader {
    /// Create a reader with default configuration.
    pub fn new(meter_type: MeterType) -> Self {
        Self::with_config(meter_type, ReadConfig::default())
    }

    /// Create with full config control.
    pub fn with_config(meter_type: MeterType, config: ReadConfig) -> Self {
        Self { meter_type, config }
    }

    /// Load a meter type JSON and create a reader in one step.
    pub fn from_meter_type_json_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        Ok(Self::new(MeterType::from_json_file(path)?))
    }

    pub fn meter_type(&self) -> &MeterType {
        &self.meter_type
    }

    /// Access the current configuration.
    pub fn config(&self) -> &ReadConfig {
        &self.config
    }

    /// Mutable access to configuration for post-construction tuning.
    pub fn config_mut(&mut self) -> &mut ReadConfig {
        &mut self.config
    }

    /// Read the meter index from a colour photograph.
    pub fn read(&self, photo: &RgbImage) -> Result<ReadResult, ReadError> {
        self.read_with_artifacts(photo).map(|(result, _)| result)
    }

    /// Read and keep intermediate images.
    pub fn read_with_artifacts(
        &self,
        photo: &RgbImage,
    ) -> Result<(ReadResult, ReadArtifacts), ReadError> {
        pipeline::read_meter(
            photo,
            &self.meter_type,
            &self.config,
            &self.meter_type.classifier,
        )
    }

    /// Read with a caller-supplied digit classifier instead of the meter
    /// type's own prototypes.
    pub fn read_with_classifier<C: DigitClassifier + ?Sized>(
        &self,
        photo: &RgbImage,
        classifier: &C,
    ) -> Result<(ReadResult, ReadArtifacts), ReadError> {
        pipeline::read_meter(photo, &self.meter_type, &self.config, classifier)
    }
}
