//! Default registry configuration.

use super::core::MetadataRegistry;
use crate::config::OAI_DC_PREFIX;
use crate::reader::oai_dc_reader;

/// Create a registry with the built-in readers.
///
/// Currently this is the Dublin Core reader registered under `oai_dc`.
/// Callers construct their own registry with this function and pass it to
/// whatever needs it; there is no process-wide instance.
#[must_use]
pub fn create_default_registry() -> MetadataRegistry {
    let mut registry = MetadataRegistry::new();
    registry.register_reader(OAI_DC_PREFIX, oai_dc_reader());
    registry
}

impl MetadataRegistry {
    /// Create a registry with the built-in readers.
    ///
    /// Shorthand for [`create_default_registry`].
    #[must_use]
    pub fn with_defaults() -> Self {
        create_default_registry()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_default_registry() {
        let registry = create_default_registry();

        assert!(registry.has_reader("oai_dc"));
        assert!(!registry.has_writer("oai_dc"));
        assert_eq!(registry.reader_prefixes(), vec!["oai_dc"]);
    }

    #[test]
    fn test_default_registries_are_independent() {
        let mut first = MetadataRegistry::with_defaults();
        let second = MetadataRegistry::with_defaults();

        first.register_reader("extra", crate::reader::FieldReader::new());
        assert!(first.has_reader("extra"));
        assert!(!second.has_reader("extra"));
    }
}
