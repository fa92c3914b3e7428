//! BibTeX writer.

use crate::record::Record;

const INDENT: &str = "    ";

/// One entry: kind and identifier, then one `name = {value}` line per field.
pub fn write_record(record: &Record) -> String {
    let mut out = format!("@{}{{{},\n", record.kind, record.id);

    let lines: Vec<String> = record
        .fields
        .iter()
        .map(|(name, value)| format!("{INDENT}{name} = {{{}}}", value.to_bibtex()))
        .collect();
    if !lines.is_empty() {
        out.push_str(&lines.join(",\n"));
        out.push('\n');
    }

    out.push('}');
    out
}

/// All entries, separated by a blank line.
pub fn write_bibtex(records: &[Record]) -> String {
    let mut out = records
        .iter()
        .map(write_record)
        .collect::<Vec<_>>()
        .join("\n\n");
    if !out.is_empty() {
        out.push('\n');
    }
    out
}
