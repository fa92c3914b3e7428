//! Bibliographic record types.
//!
//! A [`Record`] is the unit every stage consumes and produces. Stages never
//! mutate a record they were handed; they build a replacement with the
//! `with_*` helpers below.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fields whose values are `and`-separated name lists.
pub const NAME_LIST_FIELDS: &[&str] = &["author", "editor"];

/// Structural category of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordKind {
    /// The single record describing the venue.
    Proceedings,
    /// One record per contribution.
    InProceedings,
}

impl RecordKind {
    /// Canonical (title-cased) entry type name.
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Proceedings => "Proceedings",
            RecordKind::InProceedings => "InProceedings",
        }
    }

    /// Parse an entry type, ignoring case.
    pub fn from_entry_type(entry_type: &str) -> Option<Self> {
        if entry_type.eq_ignore_ascii_case("proceedings") {
            Some(RecordKind::Proceedings)
        } else if entry_type.eq_ignore_ascii_case("inproceedings") {
            Some(RecordKind::InProceedings)
        } else {
            None
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A field value: plain text, or a list of names for author-like fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
}

impl FieldValue {
    /// True when there is no non-whitespace content.
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Text(text) => text.trim().is_empty(),
            FieldValue::List(names) => names.iter().all(|n| n.trim().is_empty()),
        }
    }

    /// The value as it is written out; lists are joined with ` and `.
    pub fn to_bibtex(&self) -> String {
        match self {
            FieldValue::Text(text) => text.clone(),
            FieldValue::List(names) => names.join(" and "),
        }
    }

    /// Apply `f` to the text, or to every name of a list.
    pub fn map_text<F>(&self, mut f: F) -> FieldValue
    where
        F: FnMut(&str) -> String,
    {
        match self {
            FieldValue::Text(text) => FieldValue::Text(f(text)),
            FieldValue::List(names) => FieldValue::List(names.iter().map(|n| f(n)).collect()),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(value: Vec<String>) -> Self {
        FieldValue::List(value)
    }
}

/// One bibliographic entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub kind: RecordKind,
    pub id: String,
    /// Fields in insertion order. Names are lower-case.
    pub fields: IndexMap<String, FieldValue>,
}

impl Record {
    pub fn new(kind: RecordKind, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
            fields: IndexMap::new(),
        }
    }

    /// Builder-style field insertion, mostly useful in tests.
    pub fn field(mut self, name: &str, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Text of a field; lists are joined with ` and `.
    pub fn get_text(&self, name: &str) -> Option<String> {
        self.fields.get(name).map(FieldValue::to_bibtex)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// A copy of this record under a different identifier.
    pub fn with_id(&self, id: impl Into<String>) -> Record {
        Record {
            kind: self.kind,
            id: id.into(),
            fields: self.fields.clone(),
        }
    }

    /// A copy of this record with its fields replaced.
    pub fn with_fields(&self, fields: IndexMap<String, FieldValue>) -> Record {
        Record {
            kind: self.kind,
            id: self.id.clone(),
            fields,
        }
    }
}
