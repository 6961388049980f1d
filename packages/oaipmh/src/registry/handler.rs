//! Reader and writer trait definitions.

use roxmltree::Node;

use crate::error::Result;
use crate::types::Metadata;
use crate::xml::XmlElement;

/// Trait for metadata readers.
///
/// A reader turns one parsed XML element into a metadata record. Readers
/// are registered per metadata prefix in a
/// [`MetadataRegistry`](super::MetadataRegistry).
pub trait MetadataReader: Send + Sync {
    /// Read a record from `element`.
    fn read<'a, 'input>(&self, element: Node<'a, 'input>) -> Metadata<'a, 'input>;
}

/// Trait for metadata writers.
///
/// Writers append the XML serialization of a record under `target`.
pub trait MetadataWriter: Send + Sync {
    fn write(&self, target: &mut XmlElement, metadata: &Metadata<'_, '_>) -> Result<()>;
}
