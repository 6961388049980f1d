//! Error types for metadata reading.
//!
//! Uses the dual-error pattern: `MetadataError` for library consumers
//! and `PathError` for failures local to a single path expression. Path
//! errors never escape a field read; they end up in the record's
//! diagnostics instead.

use thiserror::Error;

/// Which side of the registry a lookup targeted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatKind {
    Reader,
    Writer,
}

impl std::fmt::Display for FormatKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Reader => f.write_str("reader"),
            Self::Writer => f.write_str("writer"),
        }
    }
}

/// Main error type for the metadata library.
#[derive(Debug, Error)]
pub enum MetadataError {
    /// No reader or writer registered for a metadata prefix.
    #[error("No metadata {kind} registered for format '{prefix}'")]
    UnknownFormat { prefix: String, kind: FormatKind },

    /// Schema declares a field type outside the four known kinds.
    #[error("Unknown field type: '{0}'. Expected one of scalar-bytes, list-bytes, scalar-text, list-text")]
    UnknownFieldType(String),

    /// Record lookup by a field name the schema does not declare.
    #[error("Field '{0}' is not declared in this metadata schema")]
    UnknownField(String),

    /// Metadata prefix contains characters OAI-PMH does not allow.
    #[error("Invalid metadata prefix: '{0}'. Allowed characters are A-Z a-z 0-9 - _ . ! ~ * ' ( )")]
    InvalidMetadataPrefix(String),

    /// Path expression failed to compile or evaluate.
    #[error(transparent)]
    Path(#[from] PathError),

    /// A registered writer could not serialize the record.
    #[error("Metadata writer failed: {0}")]
    Writer(String),

    /// XML parsing failed.
    #[error("XML parsing failed: {0}")]
    XmlParse(#[from] roxmltree::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Schema file could not be parsed.
    #[error("YAML parsing failed: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    /// JSON serialization error.
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised while compiling or evaluating a path expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("Empty path expression")]
    EmptyExpression,

    #[error("Syntax error in '{expression}' at offset {position}: {message}")]
    Syntax {
        expression: String,
        position: usize,
        message: String,
    },

    #[error("Namespace prefix '{0}' is not bound")]
    UnknownPrefix(String),

    #[error("Attribute step must be the last step in '{0}'")]
    AttributeNotLast(String),
}

/// Result type alias for metadata operations.
pub type Result<T> = std::result::Result<T, MetadataError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_format_display() {
        let err = MetadataError::UnknownFormat {
            prefix: "marc21".to_string(),
            kind: FormatKind::Reader,
        };
        assert_eq!(
            err.to_string(),
            "No metadata reader registered for format 'marc21'"
        );
    }

    #[test]
    fn test_unknown_field_type_display() {
        let err = MetadataError::UnknownFieldType("number".to_string());
        assert!(err.to_string().contains("'number'"));
        assert!(err.to_string().contains("list-text"));
    }

    #[test]
    fn test_path_error_is_transparent() {
        let err: MetadataError = PathError::UnknownPrefix("dc".to_string()).into();
        assert_eq!(err.to_string(), "Namespace prefix 'dc' is not bound");
    }

    #[test]
    fn test_syntax_error_display() {
        let err = PathError::Syntax {
            expression: "dc:title[".to_string(),
            position: 9,
            message: "unterminated predicate".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Syntax error in 'dc:title[' at offset 9: unterminated predicate"
        );
    }
}
