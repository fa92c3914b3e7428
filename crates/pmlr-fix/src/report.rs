//! Console summary and the JSON run report.

use colored::Colorize;
use pmlr_bibtex::{FixOutcome, IdentifierMap, IssueLog, RenameOutcome};
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct RenameEntry<'a> {
    pub id: &'a str,
    #[serde(flatten)]
    pub outcome: &'a RenameOutcome,
}

/// Everything a run found and changed.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub input: &'a Path,
    pub output: &'a Path,
    pub records: usize,
    pub issues: &'a IssueLog,
    pub id_changes: &'a IdentifierMap,
    pub renames: Vec<RenameEntry<'a>>,
}

impl<'a> Report<'a> {
    pub fn new(
        input: &'a Path,
        output: &'a Path,
        outcome: &'a FixOutcome,
        renames: &'a [(String, RenameOutcome)],
    ) -> Self {
        Self {
            input,
            output,
            records: outcome.records.len(),
            issues: &outcome.issues,
            id_changes: &outcome.id_changes,
            renames: renames
                .iter()
                .map(|(id, outcome)| RenameEntry { id, outcome })
                .collect(),
        }
    }
}

pub fn print_summary(outcome: &FixOutcome) {
    if !outcome.id_changes.is_empty() {
        println!("{}", "Renamed entries:".bold());
        for (original, normalized) in &outcome.id_changes {
            println!("  {} -> {}", original, normalized.cyan());
        }
    }

    if outcome.issues.is_empty() {
        println!("{} No issues found", "✓".green());
        return;
    }

    println!("{}", format!("Issues found ({}):", outcome.issues.len()).bold());
    for issue in &outcome.issues {
        println!("  {} {}", "✗".red(), issue);
    }
}

pub fn print_renames(renames: &[(String, RenameOutcome)]) {
    for (id, outcome) in renames {
        match outcome {
            RenameOutcome::Renamed(count) => {
                println!("  {} {}: renamed {} file(s)", "✓".green(), id, count);
            }
            RenameOutcome::Conflict(paths) => {
                println!(
                    "  {} {}: target file(s) already exist: {}",
                    "✗".red(),
                    id,
                    paths
                        .iter()
                        .map(|p| p.display().to_string())
                        .collect::<Vec<_>>()
                        .join(", ")
                );
            }
            RenameOutcome::Failed(message) => {
                println!("  {} {}: {}", "✗".red(), id, message);
            }
            RenameOutcome::Declined | RenameOutcome::NoFiles => {}
        }
    }
}
