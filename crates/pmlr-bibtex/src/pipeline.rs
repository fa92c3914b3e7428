//! The fixing pipeline over one batch of records.
//!
//! Stages, in order:
//!
//! 1. Proceedings validation (fatal on failure, nothing is produced)
//! 2. Per record, in encounter order:
//!    - text normalization: character tables, then quote rewriting, then
//!      `%`/`&` escaping for the configured fields
//!    - identifier folding for InProceedings records
//!    - advisory checks
//!    - field ordering
//!
//! Progress and findings go through a [`FixObserver`] supplied by the caller.
//! The observer is told when the run starts and when it ends; the end
//! notification carries the complete [`IssueLog`].

use crate::bibtex::{parse_bibtex, write_bibtex};
use crate::charmap::{escape_specials, normalize_text, residual_non_ascii};
use crate::error::{Error, Result};
use crate::identifier::{IdentifierMap, IdentifierRegistry};
use crate::options::FixOptions;
use crate::order::order_fields;
use crate::quotes::rewrite_quotes;
use crate::record::{Record, RecordKind};
use crate::validate::{Issue, IssueLog, check_inproceedings, validate_proceedings};

/// Receives pipeline events.
///
/// All methods have empty default implementations, so observers only
/// implement what they care about.
pub trait FixObserver {
    /// Called once before validation.
    fn on_pipeline_start(&self, _total_records: usize) {}

    fn on_stage_start(&self, _name: &str) {}

    /// Called before a record is fixed.
    fn on_record(&self, _record: &Record) {}

    fn on_identifier_renamed(&self, _original: &str, _normalized: &str) {}

    /// Non-ASCII code points that survived normalization of a field.
    fn on_unmapped_characters(&self, _id: &str, _field: &str, _chars: &[char]) {}

    fn on_issue(&self, _issue: &Issue) {}

    /// Called once after the last record, with every issue found.
    fn on_pipeline_complete(&self, _issues: &IssueLog) {}

    fn on_pipeline_error(&self, _error: &Error) {}
}

/// Observer that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl FixObserver for NoopObserver {}

/// Observer that emits `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl FixObserver for TracingObserver {
    fn on_pipeline_start(&self, total_records: usize) {
        tracing::info!(total_records = total_records, "Loaded entries");
    }

    fn on_stage_start(&self, name: &str) {
        tracing::debug!(stage.name = name, "Starting stage");
    }

    fn on_record(&self, record: &Record) {
        tracing::debug!(kind = %record.kind, id = %record.id, "Checking entry");
    }

    fn on_identifier_renamed(&self, original: &str, normalized: &str) {
        tracing::warn!(original = original, normalized = normalized, "Renamed entry");
    }

    fn on_unmapped_characters(&self, id: &str, field: &str, chars: &[char]) {
        let listed: Vec<String> = chars.iter().map(|c| format!("U+{:04X}", *c as u32)).collect();
        tracing::debug!(
            id = id,
            field = field,
            chars = %listed.join(" "),
            "Unmapped non-ASCII characters"
        );
    }

    fn on_issue(&self, issue: &Issue) {
        tracing::debug!(id = issue.record_id(), "{}", issue);
    }

    fn on_pipeline_complete(&self, issues: &IssueLog) {
        if issues.is_empty() {
            tracing::info!("No issues found");
            return;
        }
        tracing::warn!(count = issues.len(), "Issues found");
        for issue in issues {
            tracing::warn!(id = issue.record_id(), "- {}", issue);
        }
    }

    fn on_pipeline_error(&self, error: &Error) {
        tracing::error!(error = %error, "Pipeline failed");
    }
}

/// Result of a successful run.
#[derive(Debug, Clone, Default)]
pub struct FixOutcome {
    /// Fixed records, in input order.
    pub records: Vec<Record>,
    pub issues: IssueLog,
    /// Identifier rewrites, in the order they happened.
    pub id_changes: IdentifierMap,
}

/// Character tables followed by quote rewriting.
pub fn normalize_field_text(text: &str) -> String {
    rewrite_quotes(&normalize_text(text))
}

/// A copy of `record` with its configured fields normalized.
pub fn normalize_record(record: &Record, options: &FixOptions) -> Record {
    let fields = record
        .fields
        .iter()
        .map(|(name, value)| {
            let mut value = value.clone();
            if options.is_text_field(name) {
                value = value.map_text(normalize_field_text);
            }
            if options.escapes_specials(name) {
                value = value.map_text(escape_specials);
            }
            (name.clone(), value)
        })
        .collect();
    record.with_fields(fields)
}

/// Run the pipeline over `records`.
///
/// Returns an error, without producing any records, when the batch does not
/// contain exactly one complete Proceedings record.
pub fn fix_records(
    records: Vec<Record>,
    options: &FixOptions,
    observer: &dyn FixObserver,
) -> Result<FixOutcome> {
    observer.on_pipeline_start(records.len());

    observer.on_stage_start("validate-proceedings");
    if let Err(err) = validate_proceedings(&records) {
        observer.on_pipeline_error(&err);
        return Err(err);
    }

    observer.on_stage_start("fix-records");
    let mut registry = IdentifierRegistry::seeded(
        records
            .iter()
            .filter(|r| r.id.is_ascii())
            .map(|r| r.id.clone()),
    );
    let mut issues = IssueLog::new();
    let mut fixed = Vec::with_capacity(records.len());

    for record in &records {
        observer.on_record(record);

        let mut current = normalize_record(record, options);
        report_unmapped(&current, options, observer);

        if current.kind == RecordKind::InProceedings {
            let assigned = registry.assign(&current.id);
            if assigned != current.id {
                observer.on_identifier_renamed(&current.id, &assigned);
                current = current.with_id(assigned);
            }

            for issue in check_inproceedings(&current) {
                observer.on_issue(&issue);
                issues.push(issue);
            }
        }

        fixed.push(order_fields(&current));
    }

    observer.on_pipeline_complete(&issues);

    Ok(FixOutcome {
        records: fixed,
        issues,
        id_changes: registry.into_changes(),
    })
}

fn report_unmapped(record: &Record, options: &FixOptions, observer: &dyn FixObserver) {
    for (name, value) in &record.fields {
        if !options.is_text_field(name) {
            continue;
        }
        let residual = residual_non_ascii(&value.to_bibtex());
        if !residual.is_empty() {
            observer.on_unmapped_characters(&record.id, name, &residual);
        }
    }
}

/// Parse BibTeX source, fix it, and serialize the result.
pub fn fix_bibtex(
    source: &str,
    options: &FixOptions,
    observer: &dyn FixObserver,
) -> Result<(String, FixOutcome)> {
    let records = parse_bibtex(source)?;
    let outcome = fix_records(records, options, observer)?;
    Ok((write_bibtex(&outcome.records), outcome))
}
