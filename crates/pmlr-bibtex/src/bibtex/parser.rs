//! BibTeX reader on top of the `biblatex` raw parser.
//!
//! The raw parser keeps entries and fields in file order and leaves braced
//! values verbatim. This module resolves `@string` abbreviations and month
//! macros and maps entries onto [`Record`]s.

use crate::error::{Error, Result};
use crate::record::{FieldValue, NAME_LIST_FIELDS, Record, RecordKind};
use biblatex::{RawBibliography, RawChunk};
use indexmap::IndexMap;
use std::collections::HashMap;

const MONTH_MACROS: &[(&str, &str)] = &[
    ("jan", "January"),
    ("feb", "February"),
    ("mar", "March"),
    ("apr", "April"),
    ("may", "May"),
    ("jun", "June"),
    ("jul", "July"),
    ("aug", "August"),
    ("sep", "September"),
    ("oct", "October"),
    ("nov", "November"),
    ("dec", "December"),
];

/// Parse every entry in `source`, in file order.
pub fn parse_bibtex(source: &str) -> Result<Vec<Record>> {
    let raw = RawBibliography::parse(source).map_err(|err| Error::Parse {
        line: line_at(source, err.span.start),
        message: err.to_string(),
    })?;

    let mut macros: HashMap<String, String> = MONTH_MACROS
        .iter()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect();
    for pair in &raw.abbreviations {
        let chunks = pair.value.v.iter().map(|chunk| (&chunk.v, chunk.span.start));
        let value = resolve_chunks(source, chunks, &macros)?;
        macros.insert(pair.key.v.to_ascii_lowercase(), value);
    }

    let mut records = Vec::with_capacity(raw.entries.len());
    for entry in &raw.entries {
        let entry = &entry.v;
        let kind = RecordKind::from_entry_type(entry.kind.v).ok_or_else(|| {
            Error::UnsupportedEntryType {
                entry_type: entry.kind.v.to_string(),
                line: line_at(source, entry.kind.span.start),
            }
        })?;
        let id = entry.key.v.to_string();

        let mut fields = IndexMap::with_capacity(entry.fields.len());
        for pair in &entry.fields {
            let name = pair.key.v.to_ascii_lowercase();
            let chunks = pair.value.v.iter().map(|chunk| (&chunk.v, chunk.span.start));
            let raw_value = resolve_chunks(source, chunks, &macros)?;
            if !braces_balance(&raw_value) {
                return Err(Error::Parse {
                    line: line_at(source, pair.key.span.start),
                    message: format!("unbalanced braces in field '{name}' of entry '{id}'"),
                });
            }

            let value = if NAME_LIST_FIELDS.contains(&name.as_str()) {
                FieldValue::List(split_names(&raw_value))
            } else {
                FieldValue::Text(raw_value)
            };
            if fields.insert(name.clone(), value).is_some() {
                tracing::warn!(id = %id, field = %name, "Duplicate field, keeping the last value");
            }
        }

        records.push(Record { kind, id, fields });
    }

    tracing::debug!(count = records.len(), "Parsed BibTeX entries");
    Ok(records)
}

/// Split a name list on top-level `and`.
///
/// Whitespace is collapsed. An `and` inside braces is part of a name.
pub fn split_names(raw: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut words: Vec<String> = Vec::new();
    let mut word = String::new();
    let mut depth = 0usize;

    for c in raw.chars() {
        match c {
            '{' => {
                depth += 1;
                word.push(c);
            }
            '}' => {
                depth = depth.saturating_sub(1);
                word.push(c);
            }
            c if c.is_whitespace() && depth == 0 => {
                end_word(&mut word, &mut words, &mut names);
            }
            c if c.is_whitespace() => {
                if !word.ends_with(' ') {
                    word.push(' ');
                }
            }
            _ => word.push(c),
        }
    }
    end_word(&mut word, &mut words, &mut names);
    if !words.is_empty() {
        names.push(words.join(" "));
    }

    names
}

fn end_word(word: &mut String, words: &mut Vec<String>, names: &mut Vec<String>) {
    if word.is_empty() {
        return;
    }
    if word == "and" {
        if !words.is_empty() {
            names.push(words.join(" "));
            words.clear();
        }
        word.clear();
    } else {
        words.push(std::mem::take(word));
    }
}

/// Concatenate a field's chunks, expanding abbreviations.
fn resolve_chunks<'a, 's: 'a>(
    source: &str,
    chunks: impl Iterator<Item = (&'a RawChunk<'s>, usize)>,
    macros: &HashMap<String, String>,
) -> Result<String> {
    let mut value = String::new();
    for (chunk, offset) in chunks {
        match chunk {
            RawChunk::Normal(text) => value.push_str(text),
            RawChunk::Abbreviation(name) => match macros.get(&name.to_ascii_lowercase()) {
                Some(expansion) => value.push_str(expansion),
                None => {
                    return Err(Error::Parse {
                        line: line_at(source, offset),
                        message: format!("undefined string macro '{name}'"),
                    });
                }
            },
        }
    }
    Ok(value)
}

/// Every `}` closes an earlier `{` and nothing is left open.
fn braces_balance(text: &str) -> bool {
    let mut depth = 0usize;
    for c in text.chars() {
        match c {
            '{' => depth += 1,
            '}' => match depth.checked_sub(1) {
                Some(d) => depth = d,
                None => return false,
            },
            _ => {}
        }
    }
    depth == 0
}

/// One-based line of the byte `offset` in `source`.
fn line_at(source: &str, offset: usize) -> usize {
    let end = offset.min(source.len());
    source.as_bytes()[..end].iter().filter(|&&b| b == b'\n').count() + 1
}
