//! Renaming the files that belong to a renamed entry.
//!
//! Papers and their supplements sit next to the BibTeX file as
//! `<id>.<ext>` and `<id>-supp.<ext>`. When an identifier is normalized the
//! files have to follow, but only with the operator's consent, which is
//! asked through [`Confirm`].

use crate::identifier::IdentifierMap;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// One planned file move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRename {
    pub from: PathBuf,
    pub to: PathBuf,
}

/// Asks whether a set of renames may go ahead.
pub trait Confirm {
    /// Called once per identifier, after conflicts have been ruled out.
    fn confirm(&mut self, original: &str, normalized: &str, renames: &[FileRename]) -> bool;
}

/// Approves everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysConfirm;

impl Confirm for AlwaysConfirm {
    fn confirm(&mut self, _original: &str, _normalized: &str, _renames: &[FileRename]) -> bool {
        true
    }
}

/// What happened to the files of one identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "kebab-case")]
pub enum RenameOutcome {
    /// This many files were moved.
    Renamed(usize),
    Declined,
    NoFiles,
    /// Destinations that already exist. Nothing was moved.
    Conflict(Vec<PathBuf>),
    Failed(String),
}

/// Renames needed for `original` to become `normalized` in `dir`, sorted by
/// source path.
pub fn plan_renames(dir: &Path, original: &str, normalized: &str) -> io::Result<Vec<FileRename>> {
    let direct = format!("{original}.");
    let supplement = format!("{original}-supp.");
    let mut renames = Vec::new();

    for entry in fs::read_dir(dir)? {
        let file_name = entry?.file_name();
        let Some(name) = file_name.to_str() else {
            continue;
        };
        if name.starts_with(&direct) || name.starts_with(&supplement) {
            renames.push(FileRename {
                from: dir.join(name),
                to: dir.join(format!("{normalized}{}", &name[original.len()..])),
            });
        }
    }

    renames.sort_by(|a, b| a.from.cmp(&b.from));
    Ok(renames)
}

/// Rename the files of one identifier.
///
/// Filesystem errors are returned as [`RenameOutcome::Failed`].
pub fn rename_for_identifier(
    dir: &Path,
    original: &str,
    normalized: &str,
    confirm: &mut dyn Confirm,
) -> RenameOutcome {
    match try_rename(dir, original, normalized, confirm) {
        Ok(outcome) => outcome,
        Err(err) => {
            tracing::error!(original = original, error = %err, "Error renaming files");
            RenameOutcome::Failed(err.to_string())
        }
    }
}

fn try_rename(
    dir: &Path,
    original: &str,
    normalized: &str,
    confirm: &mut dyn Confirm,
) -> io::Result<RenameOutcome> {
    let renames = plan_renames(dir, original, normalized)?;
    if renames.is_empty() {
        tracing::info!("No files found matching '{original}.*' or '{original}-supp.*'");
        return Ok(RenameOutcome::NoFiles);
    }

    let conflicts: Vec<PathBuf> = renames
        .iter()
        .filter(|r| r.to.exists())
        .map(|r| r.to.clone())
        .collect();
    if !conflicts.is_empty() {
        tracing::warn!(
            original = original,
            normalized = normalized,
            conflicts = conflicts.len(),
            "Cannot rename files, destination already exists"
        );
        return Ok(RenameOutcome::Conflict(conflicts));
    }

    if !confirm.confirm(original, normalized, &renames) {
        tracing::info!("Skipped renaming files for {original}");
        return Ok(RenameOutcome::Declined);
    }

    for rename in &renames {
        fs::rename(&rename.from, &rename.to)?;
        tracing::info!(
            from = %rename.from.display(),
            to = %rename.to.display(),
            "Renamed file"
        );
    }

    Ok(RenameOutcome::Renamed(renames.len()))
}

/// Run the rename workflow for every identifier change, in order.
///
/// A failure for one identifier does not stop the others.
pub fn rename_associated_files(
    dir: &Path,
    changes: &IdentifierMap,
    confirm: &mut dyn Confirm,
) -> Vec<(String, RenameOutcome)> {
    changes
        .iter()
        .map(|(original, normalized)| {
            (
                original.clone(),
                rename_for_identifier(dir, original, normalized, confirm),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    struct Answer {
        approve: bool,
        asked: Vec<String>,
    }

    impl Confirm for Answer {
        fn confirm(&mut self, original: &str, _normalized: &str, _renames: &[FileRename]) -> bool {
            self.asked.push(original.to_string());
            self.approve
        }
    }

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), b"x").unwrap();
    }

    #[test]
    fn test_plan_matches_paper_and_supplement_only() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "müller24.pdf");
        touch(dir.path(), "müller24-supp.zip");
        touch(dir.path(), "müller24b.pdf");
        touch(dir.path(), "other.pdf");

        let plan = plan_renames(dir.path(), "müller24", "muller24").unwrap();
        let names: Vec<_> = plan
            .iter()
            .map(|r| r.to.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["muller24-supp.zip", "muller24.pdf"]);
    }

    #[test]
    fn test_approved_renames_move_files() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "müller24.pdf");
        touch(dir.path(), "müller24-supp.pdf");
        let mut answer = Answer {
            approve: true,
            asked: Vec::new(),
        };

        let outcome = rename_for_identifier(dir.path(), "müller24", "muller24", &mut answer);
        assert_eq!(outcome, RenameOutcome::Renamed(2));
        assert!(dir.path().join("muller24.pdf").exists());
        assert!(dir.path().join("muller24-supp.pdf").exists());
        assert!(!dir.path().join("müller24.pdf").exists());
    }

    #[test]
    fn test_declined_renames_leave_files() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "müller24.pdf");
        let mut answer = Answer {
            approve: false,
            asked: Vec::new(),
        };

        let outcome = rename_for_identifier(dir.path(), "müller24", "muller24", &mut answer);
        assert_eq!(outcome, RenameOutcome::Declined);
        assert!(dir.path().join("müller24.pdf").exists());
        assert_eq!(answer.asked, vec!["müller24".to_string()]);
    }

    #[test]
    fn test_conflict_skips_without_asking() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "müller24.pdf");
        touch(dir.path(), "muller24.pdf");
        let mut answer = Answer {
            approve: true,
            asked: Vec::new(),
        };

        let outcome = rename_for_identifier(dir.path(), "müller24", "muller24", &mut answer);
        assert_eq!(
            outcome,
            RenameOutcome::Conflict(vec![dir.path().join("muller24.pdf")])
        );
        assert!(answer.asked.is_empty());
        assert!(dir.path().join("müller24.pdf").exists());
    }

    #[test]
    fn test_workflow_continues_after_failure() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "größe24.pdf");
        let missing = dir.path().join("missing");

        let mut changes = IdentifierMap::new();
        changes.insert("müller24".to_string(), "muller24".to_string());
        changes.insert("größe24".to_string(), "grosse24".to_string());

        let failed = rename_associated_files(&missing, &changes, &mut AlwaysConfirm);
        assert!(matches!(failed[0].1, RenameOutcome::Failed(_)));
        assert!(matches!(failed[1].1, RenameOutcome::Failed(_)));

        let outcomes = rename_associated_files(dir.path(), &changes, &mut AlwaysConfirm);
        assert_eq!(
            outcomes,
            vec![
                ("müller24".to_string(), RenameOutcome::NoFiles),
                ("größe24".to_string(), RenameOutcome::Renamed(1)),
            ]
        );
        assert!(dir.path().join("grosse24.pdf").exists());
    }
}
