//! Reader for unqualified Dublin Core wrapped in `oai_dc:dc`.

use super::field::FieldReader;
use crate::config::{DC_NAMESPACE, OAI_DC_NAMESPACE};
use crate::types::FieldType;

/// The fifteen elements of the Dublin Core Metadata Element Set.
pub const DC_ELEMENTS: [&str; 15] = [
    "title",
    "creator",
    "subject",
    "description",
    "publisher",
    "contributor",
    "date",
    "type",
    "format",
    "identifier",
    "source",
    "language",
    "relation",
    "coverage",
    "rights",
];

/// Create the reader for the `oai_dc` metadata format.
///
/// Every element is read as a list of text values relative to the OAI
/// `<metadata>` element, i.e. the parent of `oai_dc:dc`.
#[must_use]
pub fn oai_dc_reader() -> FieldReader {
    DC_ELEMENTS
        .iter()
        .fold(
            FieldReader::new()
                .with_namespace("oai_dc", OAI_DC_NAMESPACE)
                .with_namespace("dc", DC_NAMESPACE),
            |reader, element| {
                reader.with_field(
                    *element,
                    FieldType::ListText,
                    format!("oai_dc:dc/dc:{element}/text()"),
                )
            },
        )
}
