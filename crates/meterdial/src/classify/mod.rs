//! Glyph classification, split-wheel repair and reading assembly.

mod assemble;
mod disambiguate;
mod som;

pub use assemble::digits_to_reading;
pub use disambiguate::{disambiguate, Disambiguated, PairResolution};
pub use som::{glyph_features, Classification, DigitClassifier, SomClassifier, SomPrototype};
