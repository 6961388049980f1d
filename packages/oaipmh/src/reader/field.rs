//! Generic field reader driven by a declarative field schema.

use std::collections::BTreeMap;

use roxmltree::Node;

use crate::error::PathError;
use crate::registry::MetadataReader;
use crate::types::{FieldDiagnostic, FieldType, FieldValue, Metadata};
use crate::xml::{Namespaces, PathQuery, PathValue};

/// Declared type and path expression of one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub field_type: FieldType,
    pub path: String,
}

/// Reader that extracts a fixed set of fields from an element.
///
/// The schema and namespace table are fixed once the reader is built, so
/// a single reader can serve any number of concurrent reads.
#[derive(Debug, Clone, Default)]
pub struct FieldReader {
    fields: BTreeMap<String, FieldSpec>,
    namespaces: Namespaces,
}

impl FieldReader {
    /// Create a reader without fields or namespaces.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a field. A later declaration with the same name replaces
    /// the earlier one.
    #[must_use]
    pub fn with_field(
        mut self,
        name: impl Into<String>,
        field_type: FieldType,
        path: impl Into<String>,
    ) -> Self {
        self.fields.insert(
            name.into(),
            FieldSpec {
                field_type,
                path: path.into(),
            },
        );
        self
    }

    /// Bind a namespace prefix for use in path expressions.
    #[must_use]
    pub fn with_namespace(mut self, prefix: impl Into<String>, uri: impl Into<String>) -> Self {
        self.namespaces.insert(prefix.into(), uri.into());
        self
    }

    /// Declared fields in name order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldSpec)> {
        self.fields.iter().map(|(name, spec)| (name.as_str(), spec))
    }

    /// Get the declaration of a single field.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.get(name)
    }

    #[must_use]
    pub fn namespaces(&self) -> &Namespaces {
        &self.namespaces
    }

    /// Read a record from an element.
    ///
    /// Never fails: fields whose expression cannot be evaluated get their
    /// type's default value and are reported in the record's diagnostics.
    ///
    /// # Examples
    /// ```
    /// use roxmltree::Document;
    /// use regelrecht_oaipmh::reader::FieldReader;
    /// use regelrecht_oaipmh::types::{FieldType, FieldValue};
    ///
    /// let reader = FieldReader::new()
    ///     .with_namespace("x", "urn:x")
    ///     .with_field("title", FieldType::ScalarText, "x:rec/x:title/text()");
    ///
    /// let doc = Document::parse(r#"<x:rec xmlns:x="urn:x"><x:title>T</x:title></x:rec>"#).unwrap();
    /// let metadata = reader.read(doc.root());
    /// assert_eq!(metadata.get("title"), Some(&FieldValue::Text("T".into())));
    /// ```
    pub fn read<'a, 'input>(&self, element: Node<'a, 'input>) -> Metadata<'a, 'input> {
        let (fields, diagnostics) = self.extract(&element);
        Metadata::new(element, fields, diagnostics)
    }

    /// Evaluate every declared field against any queryable element.
    ///
    /// Returns the complete field map and one diagnostic per degraded field.
    pub fn extract<E: PathQuery + ?Sized>(
        &self,
        element: &E,
    ) -> (BTreeMap<String, FieldValue>, Vec<FieldDiagnostic>) {
        let mut values = BTreeMap::new();
        let mut diagnostics = Vec::new();

        for (name, spec) in &self.fields {
            let value = match extract_field(element, spec, &self.namespaces) {
                Ok(value) => value,
                Err(error) => {
                    tracing::warn!(
                        field = %name,
                        expression = %spec.path,
                        error = %error,
                        "Error processing metadata field, using default"
                    );
                    diagnostics.push(FieldDiagnostic {
                        field: name.clone(),
                        expression: spec.path.clone(),
                        error,
                    });
                    spec.field_type.default_value()
                }
            };
            values.insert(name.clone(), value);
        }

        (values, diagnostics)
    }
}

impl MetadataReader for FieldReader {
    fn read<'a, 'input>(&self, element: Node<'a, 'input>) -> Metadata<'a, 'input> {
        FieldReader::read(self, element)
    }
}

fn extract_field<E: PathQuery + ?Sized>(
    element: &E,
    spec: &FieldSpec,
    namespaces: &Namespaces,
) -> Result<FieldValue, PathError> {
    let raw = element.query(&spec.path, namespaces)?;
    Ok(coerce(spec.field_type, raw))
}

/// Coerce a raw path result into a value of the declared type.
///
/// Scalars take the first match, or an empty string when nothing
/// matched. Lists keep every match in order and wrap a non-empty scalar
/// result into a single-element list.
#[must_use]
pub fn coerce(field_type: FieldType, raw: PathValue) -> FieldValue {
    match field_type {
        FieldType::ScalarBytes | FieldType::ScalarText => FieldValue::Text(match raw {
            PathValue::Sequence(items) => items.into_iter().next().unwrap_or_default(),
            PathValue::Scalar(value) => value,
        }),
        FieldType::ListBytes | FieldType::ListText => FieldValue::List(match raw {
            PathValue::Sequence(items) => items,
            PathValue::Scalar(value) if value.is_empty() => Vec::new(),
            PathValue::Scalar(value) => vec![value],
        }),
    }
}
