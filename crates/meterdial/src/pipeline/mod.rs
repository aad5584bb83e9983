//! Meter reading pipeline.
//!
//! Internal glue between the stage modules:
//! red mask -> marker blobs -> roles -> anchors -> rectified dial (calibrate),
//! then binarize -> digit blobs -> order -> segment -> classify -> disambiguate
//! -> assemble (recognize).
//!
//! Each stage consumes its predecessor's output in full; any stage error
//! aborts the photograph.

mod calibrate;
mod prelude;
mod recognize;
mod result;
mod run;

pub use result::{ReadArtifacts, ReadResult};

pub(crate) use prelude::*;
pub(crate) use run::read_meter;
