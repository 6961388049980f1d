//! RegelRecht OAI-PMH - Schema-driven metadata readers for harvested XML.
//!
//! This crate turns the `<metadata>` payload of OAI-PMH records into
//! field maps. Formats are identified by their metadata prefix and
//! dispatched through a [`MetadataRegistry`].
//!
//! # Example
//!
//! ```
//! use roxmltree::Document;
//! use regelrecht_oaipmh::{FieldValue, MetadataRegistry};
//!
//! let xml = r#"<oai_dc:dc xmlns:oai_dc="http://www.openarchives.org/OAI/2.0/oai_dc/"
//!                        xmlns:dc="http://purl.org/dc/elements/1.1/">
//!     <dc:title>Wet op de zorgtoeslag</dc:title>
//! </oai_dc:dc>"#;
//! let doc = Document::parse(xml).unwrap();
//!
//! let registry = MetadataRegistry::with_defaults();
//! assert!(registry.has_reader("oai_dc"));
//!
//! let metadata = registry.read_metadata("oai_dc", doc.root()).unwrap();
//! assert_eq!(
//!     metadata.get("title"),
//!     Some(&FieldValue::List(vec!["Wet op de zorgtoeslag".to_string()]))
//! );
//! ```
//!
//! # Architecture
//!
//! - [`config`]: Namespace constants and metadata prefix validation
//! - [`types`]: Records, field types and field values
//! - [`error`]: Error types and Result alias
//! - [`xml`]: Path queries, DOM helpers and the writer target tree
//! - [`reader`]: Schema-driven field reader and the Dublin Core schema
//! - [`registry`]: Reader/writer dispatch by metadata prefix
//! - [`schema`]: YAML schema files for additional formats
//! - [`oai`]: Locating metadata inside OAI-PMH responses
//! - [`cli`]: Command-line interface

pub mod cli;
pub mod config;
pub mod error;
pub mod oai;
pub mod reader;
pub mod registry;
pub mod schema;
pub mod types;
pub mod xml;

// Re-export commonly used items
pub use error::{MetadataError, PathError, Result};
pub use reader::{oai_dc_reader, FieldReader};
pub use registry::{create_default_registry, MetadataReader, MetadataRegistry, MetadataWriter};
pub use types::{FieldDiagnostic, FieldType, FieldValue, Metadata};
