//! Configuration constants and validation functions for metadata formats.

use regex::Regex;
use std::sync::LazyLock;

use crate::error::{MetadataError, Result};

/// Metadata prefix of unqualified Dublin Core inside an OAI wrapper.
pub const OAI_DC_PREFIX: &str = "oai_dc";

/// Namespace of the `oai_dc:dc` container element.
pub const OAI_DC_NAMESPACE: &str = "http://www.openarchives.org/OAI/2.0/oai_dc/";

/// Namespace of the fifteen Dublin Core elements.
pub const DC_NAMESPACE: &str = "http://purl.org/dc/elements/1.1/";

/// Namespace bound to the reserved `xml` prefix.
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// Namespace of the OAI-PMH response envelope.
pub const OAI_PMH_NAMESPACE: &str = "http://www.openarchives.org/OAI/2.0/";

/// Metadata prefix pattern from the OAI-PMH XML schema.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static METADATA_PREFIX_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9\-_.!~*'()]+$").expect("valid regex"));

/// Validate a metadata prefix.
///
/// # Arguments
/// * `prefix` - The metadata prefix to validate
///
/// # Returns
/// * `Ok(())` if valid
/// * `Err(MetadataError::InvalidMetadataPrefix)` if invalid
///
/// # Examples
/// ```
/// use regelrecht_oaipmh::config::validate_metadata_prefix;
///
/// assert!(validate_metadata_prefix("oai_dc").is_ok());
/// assert!(validate_metadata_prefix("marc21").is_ok());
/// assert!(validate_metadata_prefix("oai dc").is_err());
/// ```
pub fn validate_metadata_prefix(prefix: &str) -> Result<()> {
    if METADATA_PREFIX_PATTERN.is_match(prefix) {
        Ok(())
    } else {
        Err(MetadataError::InvalidMetadataPrefix(prefix.to_string()))
    }
}
