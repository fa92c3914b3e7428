//! Structural and advisory checks on records.
//!
//! Proceedings checks are fatal: a batch that does not describe exactly one
//! complete venue is rejected before anything is written. InProceedings
//! checks only produce [`Issue`]s, which are collected in an [`IssueLog`] and
//! reported once the run is over.

use crate::error::{Error, Result};
use crate::record::{Record, RecordKind};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt;

/// Fields every Proceedings record must carry.
pub const REQUIRED_PROCEEDINGS_FIELDS: &[&str] = &[
    "booktitle",
    "name",
    "shortname",
    "year",
    "editor",
    "volume",
    "start",
    "end",
    "published",
    "address",
    "conference_url",
];

/// Fields every InProceedings record is expected to carry, non-empty.
pub const EXPECTED_INPROCEEDINGS_FIELDS: &[&str] = &["title", "author", "pages", "abstract"];

/// No character that would end or corrupt a BibTeX key.
static LEGAL_IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r##"^[^,{}()="#%~\\\s]+$"##).unwrap());

static SOFTWARE_URL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^https?://[^\s,]+$").unwrap());

/// A non-fatal finding about one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Issue {
    MissingField { id: String, field: String },
    IllegalIdentifier { id: String },
    MalformedSoftwareUrl { id: String },
}

impl Issue {
    /// Identifier of the record the issue is about.
    pub fn record_id(&self) -> &str {
        match self {
            Issue::MissingField { id, .. }
            | Issue::IllegalIdentifier { id }
            | Issue::MalformedSoftwareUrl { id } => id,
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Issue::MissingField { id, field } => {
                write!(f, "Missing or empty required field '{}' in entry {}", field, id)
            }
            Issue::IllegalIdentifier { id } => {
                write!(f, "Invalid ID format (contains illegal characters): {}", id)
            }
            Issue::MalformedSoftwareUrl { id } => {
                write!(f, "Software field should contain a single valid URL in entry {}", id)
            }
        }
    }
}

/// Advisory issues in the order they were found.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct IssueLog {
    issues: Vec<Issue>,
}

impl IssueLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, issue: Issue) {
        self.issues.push(issue);
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter()
    }

    /// Issues rendered as report lines.
    pub fn messages(&self) -> Vec<String> {
        self.issues.iter().map(ToString::to_string).collect()
    }
}

impl<'a> IntoIterator for &'a IssueLog {
    type Item = &'a Issue;
    type IntoIter = std::slice::Iter<'a, Issue>;

    fn into_iter(self) -> Self::IntoIter {
        self.issues.iter()
    }
}

/// Required Proceedings fields missing from `record`, in canonical order.
pub fn missing_proceedings_fields(record: &Record) -> Vec<String> {
    REQUIRED_PROCEEDINGS_FIELDS
        .iter()
        .copied()
        .filter(|field| !record.has_field(field))
        .map(String::from)
        .collect()
}

/// Check that the batch holds exactly one complete Proceedings record.
///
/// Each Proceedings record is checked for missing fields first, so a batch
/// with an incomplete venue reports the missing fields even if the count is
/// also wrong.
pub fn validate_proceedings(records: &[Record]) -> Result<()> {
    let mut found = 0;

    for record in records.iter().filter(|r| r.kind == RecordKind::Proceedings) {
        tracing::info!(id = %record.id, "Found proceedings entry");
        found += 1;

        let missing = missing_proceedings_fields(record);
        if !missing.is_empty() {
            return Err(Error::MissingProceedingsFields {
                id: record.id.clone(),
                fields: missing,
            });
        }
    }

    if found != 1 {
        return Err(Error::ProceedingsCount { found });
    }

    Ok(())
}

/// Whether `id` can be written as a BibTeX key.
pub fn is_legal_identifier(id: &str) -> bool {
    LEGAL_IDENTIFIER.is_match(id)
}

/// Whether `value` is a single bare http(s) URL.
pub fn is_single_url(value: &str) -> bool {
    SOFTWARE_URL.is_match(value.trim())
}

/// Expected InProceedings fields that are absent or blank.
pub fn check_expected_fields(record: &Record) -> Vec<Issue> {
    EXPECTED_INPROCEEDINGS_FIELDS
        .iter()
        .copied()
        .filter(|field| record.get(field).is_none_or(|v| v.is_blank()))
        .map(|field| Issue::MissingField {
            id: record.id.clone(),
            field: field.to_string(),
        })
        .collect()
}

/// Identifier legality and the `software` URL format.
pub fn check_identifier_and_links(record: &Record) -> Vec<Issue> {
    let mut issues = Vec::new();

    if !is_legal_identifier(&record.id) {
        issues.push(Issue::IllegalIdentifier {
            id: record.id.clone(),
        });
    }

    if let Some(software) = record.get_text("software")
        && !software.trim().is_empty()
        && !is_single_url(&software)
    {
        issues.push(Issue::MalformedSoftwareUrl {
            id: record.id.clone(),
        });
    }

    issues
}

/// Every advisory check for one InProceedings record.
pub fn check_inproceedings(record: &Record) -> Vec<Issue> {
    let mut issues = check_expected_fields(record);
    issues.extend(check_identifier_and_links(record));
    issues
}
