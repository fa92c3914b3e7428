//! Error types for pmlr-bibtex.
//!
//! Only conditions that must stop a run live here. Problems that should be
//! reported but never abort processing are collected as
//! [`Issue`](crate::validate::Issue)s instead.

use thiserror::Error;

/// Result type alias for pmlr-bibtex operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Fatal errors raised while reading or fixing a batch of records.
#[derive(Error, Debug)]
pub enum Error {
    /// The batch must describe exactly one venue.
    #[error("Found {found} Proceedings entries, expected 1")]
    ProceedingsCount { found: usize },

    /// A Proceedings record lacks fields the publisher requires.
    #[error("Missing required field(s) in Proceedings '{id}': {}", fields.join(", "))]
    MissingProceedingsFields { id: String, fields: Vec<String> },

    /// Malformed BibTeX input.
    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// Entry type other than Proceedings or InProceedings.
    #[error("Unsupported entry type '@{entry_type}' at line {line}")]
    UnsupportedEntryType { entry_type: String, line: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this error comes from structural validation of the batch
    /// (as opposed to reading it).
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Error::ProceedingsCount { .. } | Error::MissingProceedingsFields { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_display_names_every_field() {
        let err = Error::MissingProceedingsFields {
            id: "corl2024".to_string(),
            fields: vec!["volume".to_string(), "address".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Missing required field(s) in Proceedings 'corl2024': volume, address"
        );
        assert!(err.is_structural());
    }

    #[test]
    fn test_count_display() {
        let err = Error::ProceedingsCount { found: 2 };
        assert_eq!(err.to_string(), "Found 2 Proceedings entries, expected 1");
    }

    #[test]
    fn test_parse_error_is_not_structural() {
        let err = Error::Parse {
            line: 3,
            message: "expected '='".to_string(),
        };
        assert!(!err.is_structural());
        assert!(err.to_string().contains("line 3"));
    }
}
