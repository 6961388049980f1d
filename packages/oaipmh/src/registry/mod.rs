//! Metadata registry for dispatching on metadata prefixes.
//!
//! Readers and writers are registered per metadata prefix, so code that
//! handles harvested records does not need to know about concrete formats.

mod config;
mod core;
mod handler;

pub use config::create_default_registry;
pub use core::MetadataRegistry;
pub use handler::{MetadataReader, MetadataWriter};
