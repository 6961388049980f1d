//! Core data types for metadata records.
//!
//! A record maps every field declared by a reader's schema to either a
//! single string or an ordered list of strings, and keeps a reference to
//! the element it was read from.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use roxmltree::Node;
use serde::{Serialize, Serializer};

use crate::error::{MetadataError, PathError, Result};

/// Declared type of a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// Single value kept as raw bytes in the source schema (`bytes`).
    ScalarBytes,
    /// List of raw byte values (`bytesList`).
    ListBytes,
    /// Single text value (`text`).
    ScalarText,
    /// List of text values (`textList`).
    ListText,
}

impl FieldType {
    /// Canonical name used in schema files.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ScalarBytes => "scalar-bytes",
            Self::ListBytes => "list-bytes",
            Self::ScalarText => "scalar-text",
            Self::ListText => "list-text",
        }
    }

    /// Check if values of this type are lists.
    #[must_use]
    pub fn is_list(&self) -> bool {
        matches!(self, Self::ListBytes | Self::ListText)
    }

    /// Value substituted when extraction of a field fails.
    #[must_use]
    pub fn default_value(&self) -> FieldValue {
        if self.is_list() {
            FieldValue::List(Vec::new())
        } else {
            FieldValue::Text(String::new())
        }
    }
}

impl FromStr for FieldType {
    type Err = MetadataError;

    /// Parse a declared type, accepting the canonical and the legacy
    /// camelCase names.
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "scalar-bytes" | "bytes" => Ok(Self::ScalarBytes),
            "list-bytes" | "bytesList" => Ok(Self::ListBytes),
            "scalar-text" | "text" => Ok(Self::ScalarText),
            "list-text" | "textList" => Ok(Self::ListText),
            other => Err(MetadataError::UnknownFieldType(other.to_string())),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value of one metadata field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
}

impl FieldValue {
    /// Get the value if this is a scalar field.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::List(_) => None,
        }
    }

    /// Get the values if this is a list field.
    #[must_use]
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(items) => Some(items),
            Self::Text(_) => None,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(text) => text.is_empty(),
            Self::List(items) => items.is_empty(),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(values: Vec<String>) -> Self {
        Self::List(values)
    }
}

/// A field that could not be extracted and was filled with its default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDiagnostic {
    /// Name of the degraded field.
    pub field: String,
    /// Path expression that failed.
    pub expression: String,
    /// Underlying cause.
    pub error: PathError,
}

impl fmt::Display for FieldDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "field '{}' with expression '{}': {}",
            self.field, self.expression, self.error
        )
    }
}

/// Metadata read from one XML element.
#[derive(Debug, Clone)]
pub struct Metadata<'a, 'input> {
    element: Node<'a, 'input>,
    fields: BTreeMap<String, FieldValue>,
    diagnostics: Vec<FieldDiagnostic>,
}

impl<'a, 'input> Metadata<'a, 'input> {
    /// Create a record.
    #[must_use]
    pub fn new(
        element: Node<'a, 'input>,
        fields: BTreeMap<String, FieldValue>,
        diagnostics: Vec<FieldDiagnostic>,
    ) -> Self {
        Self {
            element,
            fields,
            diagnostics,
        }
    }

    /// The element this record was read from.
    #[must_use]
    pub fn element(&self) -> Node<'a, 'input> {
        self.element
    }

    /// All fields, keyed by name.
    #[must_use]
    pub fn map(&self) -> &BTreeMap<String, FieldValue> {
        &self.fields
    }

    /// Get a field value, if the schema declares it.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Get a field value, failing for names the schema does not declare.
    pub fn field(&self, name: &str) -> Result<&FieldValue> {
        self.get(name)
            .ok_or_else(|| MetadataError::UnknownField(name.to_string()))
    }

    /// Fields that fell back to their default value, in schema order.
    #[must_use]
    pub fn diagnostics(&self) -> &[FieldDiagnostic] {
        &self.diagnostics
    }

    /// Check if any field failed to extract.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    /// Take ownership of the field map.
    #[must_use]
    pub fn into_map(self) -> BTreeMap<String, FieldValue> {
        self.fields
    }
}

impl Serialize for Metadata<'_, '_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}
