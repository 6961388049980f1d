//! Locating metadata elements inside OAI-PMH responses.
//!
//! A `GetRecord` or `ListRecords` response wraps each record as
//! `record/header` plus `record/metadata`. Readers expect the `metadata`
//! element, whose single child is the format-specific container.

use roxmltree::{Document, Node};

use crate::config::OAI_PMH_NAMESPACE;
use crate::xml::{find_child_ns, get_text, is_element_ns};

/// Find the elements to hand to a metadata reader.
///
/// For an OAI-PMH response this is the `<metadata>` element of every
/// record that has one (deleted records do not). Any other document is
/// returned as its root node, so a bare `<oai_dc:dc>` file can be read with
/// the same paths.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use regelrecht_oaipmh::oai::metadata_elements;
///
/// let doc = Document::parse("<dc/>").unwrap();
/// assert_eq!(metadata_elements(&doc), vec![doc.root()]);
/// ```
pub fn metadata_elements<'a, 'input>(doc: &'a Document<'input>) -> Vec<Node<'a, 'input>> {
    let root = doc.root_element();
    if !is_element_ns(root, OAI_PMH_NAMESPACE, "OAI-PMH") {
        return vec![doc.root()];
    }

    doc.descendants()
        .filter(|n| is_element_ns(*n, OAI_PMH_NAMESPACE, "record"))
        .filter_map(|record| {
            let metadata = find_child_ns(record, OAI_PMH_NAMESPACE, "metadata");
            if metadata.is_none() {
                tracing::debug!(
                    identifier = %record_header_identifier(record).unwrap_or_default(),
                    "Record without metadata, skipping"
                );
            }
            metadata
        })
        .collect()
}

/// Get the identifier of the record a metadata element belongs to.
///
/// Returns `None` outside an OAI-PMH `record`.
pub fn record_identifier(metadata: Node<'_, '_>) -> Option<String> {
    metadata
        .parent_element()
        .filter(|record| is_element_ns(*record, OAI_PMH_NAMESPACE, "record"))
        .and_then(record_header_identifier)
}

fn record_header_identifier(record: Node<'_, '_>) -> Option<String> {
    find_child_ns(record, OAI_PMH_NAMESPACE, "header")
        .and_then(|header| find_child_ns(header, OAI_PMH_NAMESPACE, "identifier"))
        .map(get_text)
        .filter(|s| !s.is_empty())
}
