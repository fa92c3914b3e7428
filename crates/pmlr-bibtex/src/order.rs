//! Canonical field order for serialization.

use crate::record::{FieldValue, Record, RecordKind};
use indexmap::IndexMap;

pub const PROCEEDINGS_ORDER: &[&str] = &[
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
    "conference_number",
];

/// Required fields first, then the recognised optional ones.
pub const INPROCEEDINGS_ORDER: &[&str] = &[
    "title",
    "author",
    "pages",
    "abstract",
    "section",
    "openreview",
    "software",
    "video",
];

/// Priority list for a record kind.
pub fn field_order(kind: RecordKind) -> &'static [&'static str] {
    match kind {
        RecordKind::Proceedings => PROCEEDINGS_ORDER,
        RecordKind::InProceedings => INPROCEEDINGS_ORDER,
    }
}

/// The same record with fields in canonical order: the kind's priority list
/// first, then every other field in its original relative order.
pub fn order_fields(record: &Record) -> Record {
    let mut ordered: IndexMap<String, FieldValue> = IndexMap::with_capacity(record.fields.len());

    for name in field_order(record.kind) {
        if let Some(value) = record.fields.get(*name) {
            ordered.insert((*name).to_string(), value.clone());
        }
    }
    for (name, value) in &record.fields {
        if !ordered.contains_key(name) {
            ordered.insert(name.clone(), value.clone());
        }
    }

    record.with_fields(ordered)
}
