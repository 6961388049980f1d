//! Schema files declaring field readers for additional metadata formats.
//!
//! ```yaml
//! formats:
//!   marc_title:
//!     namespaces:
//!       marc: "http://www.loc.gov/MARC21/slim"
//!     fields:
//!       title:
//!         type: list-text
//!         path: "marc:record/marc:datafield[1]/marc:subfield/text()"
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::reader::FieldReader;
use crate::types::FieldType;
use crate::xml::Namespaces;

/// Top-level schema file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaConfig {
    /// Reader declarations keyed by metadata prefix.
    #[serde(default)]
    pub formats: BTreeMap<String, ReaderConfig>,
}

/// Declaration of one field reader.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReaderConfig {
    pub fields: BTreeMap<String, FieldConfig>,
    #[serde(default)]
    pub namespaces: Namespaces,
}

/// Declaration of one field.
///
/// The type is kept as a string here so that an unknown type surfaces as
/// `UnknownFieldType` when the reader is built, not as a YAML error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldConfig {
    #[serde(rename = "type")]
    pub field_type: String,
    pub path: String,
}

impl SchemaConfig {
    /// Parse a schema from YAML text.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml_ng::from_str(yaml)?)
    }

    /// Load a schema file.
    pub fn load(path: &Path) -> Result<Self> {
        let yaml = fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), "Loading metadata schema");
        Self::from_yaml_str(&yaml)
    }
}

impl ReaderConfig {
    /// Build the field reader this config declares.
    ///
    /// # Errors
    /// Returns `UnknownFieldType` for the first field with an unrecognized
    /// type.
    pub fn build(&self) -> Result<FieldReader> {
        let mut reader = self
            .namespaces
            .iter()
            .fold(FieldReader::new(), |reader, (prefix, uri)| {
                reader.with_namespace(prefix.as_str(), uri.as_str())
            });

        for (name, field) in &self.fields {
            let field_type: FieldType = field.field_type.parse()?;
            reader = reader.with_field(name.as_str(), field_type, field.path.as_str());
        }

        Ok(reader)
    }
}

impl From<&FieldReader> for ReaderConfig {
    fn from(reader: &FieldReader) -> Self {
        Self {
            fields: reader
                .fields()
                .map(|(name, spec)| {
                    (
                        name.to_string(),
                        FieldConfig {
                            field_type: spec.field_type.as_str().to_string(),
                            path: spec.path.clone(),
                        },
                    )
                })
                .collect(),
            namespaces: reader.namespaces().clone(),
        }
    }
}
