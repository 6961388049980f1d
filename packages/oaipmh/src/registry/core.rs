//! Metadata registry mapping metadata prefixes to readers and writers.

use std::collections::HashMap;

use roxmltree::Node;

use super::handler::{MetadataReader, MetadataWriter};
use crate::config::validate_metadata_prefix;
use crate::error::{FormatKind, MetadataError, Result};
use crate::schema::SchemaConfig;
use crate::types::Metadata;
use crate::xml::XmlElement;

/// Registry of metadata readers and writers, keyed by metadata prefix.
///
/// Readers and writers are kept in independent maps: a format may have a
/// reader without a writer and vice versa. Registration needs `&mut self`,
/// so a registry is populated up front and then shared read-only.
pub struct MetadataRegistry {
    readers: HashMap<String, Box<dyn MetadataReader>>,
    writers: HashMap<String, Box<dyn MetadataWriter>>,
}

impl MetadataRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            readers: HashMap::new(),
            writers: HashMap::new(),
        }
    }

    /// Register a reader for a metadata prefix, replacing any earlier one.
    ///
    /// Any string is accepted as a prefix. Use
    /// [`validate_metadata_prefix`] first when the prefix comes from outside.
    pub fn register_reader(
        &mut self,
        prefix: impl Into<String>,
        reader: impl MetadataReader + 'static,
    ) {
        let prefix = prefix.into();
        if self.readers.contains_key(&prefix) {
            tracing::debug!(prefix = %prefix, "Replacing metadata reader");
        }
        self.readers.insert(prefix, Box::new(reader));
    }

    /// Register a writer for a metadata prefix, replacing any earlier one.
    pub fn register_writer(
        &mut self,
        prefix: impl Into<String>,
        writer: impl MetadataWriter + 'static,
    ) {
        let prefix = prefix.into();
        if self.writers.contains_key(&prefix) {
            tracing::debug!(prefix = %prefix, "Replacing metadata writer");
        }
        self.writers.insert(prefix, Box::new(writer));
    }

    /// Register one field reader per format declared in a schema config.
    ///
    /// # Errors
    /// Fails on the first format whose prefix is not a valid OAI-PMH
    /// metadata prefix or whose fields declare an unknown type. Formats
    /// before it stay registered.
    pub fn register_from_config(&mut self, config: &SchemaConfig) -> Result<()> {
        for (prefix, reader_config) in &config.formats {
            validate_metadata_prefix(prefix)?;
            let reader = reader_config.build()?;
            self.register_reader(prefix.as_str(), reader);
        }
        Ok(())
    }

    /// Check if a reader is registered for a prefix.
    #[must_use]
    pub fn has_reader(&self, prefix: &str) -> bool {
        self.readers.contains_key(prefix)
    }

    /// Check if a writer is registered for a prefix.
    #[must_use]
    pub fn has_writer(&self, prefix: &str) -> bool {
        self.writers.contains_key(prefix)
    }

    /// Read a metadata record using the reader registered for `prefix`.
    ///
    /// # Errors
    /// Returns `UnknownFormat` if no reader is registered for `prefix`.
    pub fn read_metadata<'a, 'input>(
        &self,
        prefix: &str,
        element: Node<'a, 'input>,
    ) -> Result<Metadata<'a, 'input>> {
        let reader = self
            .readers
            .get(prefix)
            .ok_or_else(|| MetadataError::UnknownFormat {
                prefix: prefix.to_string(),
                kind: FormatKind::Reader,
            })?;
        Ok(reader.read(element))
    }

    /// Write a metadata record under `target` using the writer registered
    /// for `prefix`.
    ///
    /// # Errors
    /// Returns `UnknownFormat` if no writer is registered for `prefix`, or
    /// whatever error the writer reports.
    pub fn write_metadata(
        &self,
        prefix: &str,
        target: &mut XmlElement,
        metadata: &Metadata<'_, '_>,
    ) -> Result<()> {
        let writer = self
            .writers
            .get(prefix)
            .ok_or_else(|| MetadataError::UnknownFormat {
                prefix: prefix.to_string(),
                kind: FormatKind::Writer,
            })?;
        writer.write(target, metadata)
    }

    /// Return all prefixes with a registered reader, sorted.
    #[must_use]
    pub fn reader_prefixes(&self) -> Vec<&str> {
        let mut prefixes: Vec<&str> = self.readers.keys().map(String::as_str).collect();
        prefixes.sort_unstable();
        prefixes
    }

    /// Return all prefixes with a registered writer, sorted.
    #[must_use]
    pub fn writer_prefixes(&self) -> Vec<&str> {
        let mut prefixes: Vec<&str> = self.writers.keys().map(String::as_str).collect();
        prefixes.sort_unstable();
        prefixes
    }
}

impl Default for MetadataRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::FieldReader;
    use crate::types::{FieldType, FieldValue};
    use roxmltree::Document;
    use std::collections::BTreeMap;

    struct ConstantReader(&'static str);

    impl MetadataReader for ConstantReader {
        fn read<'a, 'input>(&self, element: Node<'a, 'input>) -> Metadata<'a, 'input> {
            let fields = BTreeMap::from([("value".to_string(), FieldValue::from(self.0))]);
            Metadata::new(element, fields, Vec::new())
        }
    }

    struct TitleWriter;

    impl MetadataWriter for TitleWriter {
        fn write(&self, target: &mut XmlElement, metadata: &Metadata<'_, '_>) -> Result<()> {
            let value = metadata
                .field("value")?
                .as_text()
                .ok_or_else(|| MetadataError::Writer("value must be text".to_string()))?;
            target.push_element(XmlElement::new("title").with_text(value));
            Ok(())
        }
    }

    #[test]
    fn test_registry_register_and_has_reader() {
        let mut registry = MetadataRegistry::new();
        registry.register_reader("x", ConstantReader("a"));

        assert!(registry.has_reader("x"));
        assert!(!registry.has_reader("y"));
        assert!(!registry.has_writer("x"));
    }

    #[test]
    fn test_registry_read_metadata() {
        let mut registry = MetadataRegistry::new();
        registry.register_reader("x", ConstantReader("a"));

        let doc = Document::parse("<r/>").unwrap();
        let metadata = registry.read_metadata("x", doc.root_element()).unwrap();
        assert_eq!(metadata.get("value"), Some(&FieldValue::from("a")));
    }

    #[test]
    fn test_registry_unknown_format() {
        let registry = MetadataRegistry::new();
        let doc = Document::parse("<r/>").unwrap();

        assert!(!registry.has_reader("unknown-format"));
        let err = registry
            .read_metadata("unknown-format", doc.root_element())
            .unwrap_err();
        assert!(matches!(
            err,
            MetadataError::UnknownFormat { ref prefix, kind: FormatKind::Reader }
                if prefix == "unknown-format"
        ));
    }

    #[test]
    fn test_registry_last_registration_wins() {
        let mut registry = MetadataRegistry::new();
        registry.register_reader("x", ConstantReader("first"));
        registry.register_reader("x", ConstantReader("second"));

        let doc = Document::parse("<r/>").unwrap();
        let metadata = registry.read_metadata("x", doc.root_element()).unwrap();
        assert_eq!(metadata.get("value"), Some(&FieldValue::from("second")));
        assert_eq!(registry.reader_prefixes(), vec!["x"]);
    }

    #[test]
    fn test_registry_write_metadata() {
        let mut registry = MetadataRegistry::new();
        registry.register_reader("x", ConstantReader("T"));
        registry.register_writer("x", TitleWriter);
        assert!(registry.has_writer("x"));

        let doc = Document::parse("<r/>").unwrap();
        let metadata = registry.read_metadata("x", doc.root_element()).unwrap();

        let mut target = XmlElement::new("metadata");
        registry.write_metadata("x", &mut target, &metadata).unwrap();
        assert_eq!(
            target.to_xml_string(),
            "<metadata><title>T</title></metadata>"
        );

        let err = registry
            .write_metadata("y", &mut target, &metadata)
            .unwrap_err();
        assert!(matches!(
            err,
            MetadataError::UnknownFormat { kind: FormatKind::Writer, .. }
        ));
    }

    #[test]
    fn test_registry_writer_without_reader() {
        let mut registry = MetadataRegistry::new();
        registry.register_writer("w", TitleWriter);

        assert!(registry.has_writer("w"));
        assert!(!registry.has_reader("w"));
        assert_eq!(registry.writer_prefixes(), vec!["w"]);
        assert!(registry.reader_prefixes().is_empty());
    }

    #[test]
    fn test_registry_accepts_any_prefix() {
        let mut registry = MetadataRegistry::new();
        registry.register_reader("not a metadataPrefix", FieldReader::new());
        registry.register_writer("", TitleWriter);

        assert!(registry.has_reader("not a metadataPrefix"));
        assert!(registry.has_writer(""));
    }

    #[test]
    fn test_register_from_config_rejects_invalid_prefix() {
        let config = SchemaConfig::from_yaml_str(
            "formats:\n  \"bad prefix\":\n    fields:\n      t: { type: text, path: \"t\" }\n",
        )
        .unwrap();
        let mut registry = MetadataRegistry::new();

        let err = registry.register_from_config(&config).unwrap_err();
        assert!(matches!(err, MetadataError::InvalidMetadataPrefix(p) if p == "bad prefix"));
        assert!(!registry.has_reader("bad prefix"));
    }

    #[test]
    fn test_registry_with_field_reader() {
        let mut registry = MetadataRegistry::new();
        registry.register_reader(
            "simple",
            FieldReader::new().with_field("root", FieldType::ScalarText, "string(.)"),
        );

        let doc = Document::parse("<r>text</r>").unwrap();
        let metadata = registry.read_metadata("simple", doc.root_element()).unwrap();
        assert_eq!(metadata.get("root"), Some(&FieldValue::from("text")));
    }

    #[test]
    fn test_registry_is_shareable_across_threads() {
        let mut registry = MetadataRegistry::new();
        registry.register_reader("x", ConstantReader("a"));
        let registry = std::sync::Arc::new(registry);

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let registry = std::sync::Arc::clone(&registry);
                std::thread::spawn(move || {
                    let doc = Document::parse("<r/>").unwrap();
                    let metadata = registry.read_metadata("x", doc.root_element()).unwrap();
                    metadata.get("value").cloned()
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), Some(FieldValue::from("a")));
        }
    }
}
