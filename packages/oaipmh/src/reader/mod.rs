//! Schema-driven metadata readers.
//!
//! A [`FieldReader`] evaluates a fixed set of declared fields against an
//! element and always produces a complete record, degrading individual
//! fields instead of failing the whole read.

mod dublin_core;
mod field;

pub use dublin_core::{oai_dc_reader, DC_ELEMENTS};
pub use field::{coerce, FieldReader, FieldSpec};
