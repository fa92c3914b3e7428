use anyhow::{Context, Result};
use clap::Parser;
use pmlr_bibtex::{
    AlwaysConfirm, FixOptions, FixOutcome, TracingObserver, fix_bibtex, rename_associated_files,
};
use std::path::{Path, PathBuf};

mod file_io;
mod logging;
mod prompt;
mod report;

use file_io::{load_options, read_file, write_file};
use prompt::ConsolePrompt;
use report::Report;

#[derive(Parser, Debug)]
#[command(name = "pmlr-fix")]
#[command(about = "Validate and fix PMLR proceedings BibTeX files")]
#[command(version)]
struct Cli {
    /// BibTeX file to read
    input: PathBuf,

    /// Where to write the fixed BibTeX
    output: PathBuf,

    /// TOML file with run options
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Also write a debug-level log to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Write a JSON report of issues, identifier changes and renames
    #[arg(short, long)]
    report: Option<PathBuf>,

    /// Rename associated files without asking
    #[arg(short, long, conflicts_with = "no_rename")]
    yes: bool,

    /// Leave associated files alone
    #[arg(long)]
    no_rename: bool,

    /// Only print warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log_file.as_deref(), cli.quiet)?;
    run(&cli)
}

fn run(cli: &Cli) -> Result<()> {
    let options = match &cli.config {
        Some(path) => load_options(path)?,
        None => FixOptions::default(),
    };

    let outcome = fix_file(&cli.input, &cli.output, &options)?;
    if !cli.quiet {
        report::print_summary(&outcome);
    }

    let renames = if cli.no_rename || outcome.id_changes.is_empty() {
        Vec::new()
    } else {
        let dir = input_dir(&cli.input);
        tracing::info!(dir = %dir.display(), "Checking for associated files to rename");
        if cli.yes {
            rename_associated_files(dir, &outcome.id_changes, &mut AlwaysConfirm)
        } else {
            rename_associated_files(dir, &outcome.id_changes, &mut ConsolePrompt::stdio())
        }
    };
    if !cli.quiet {
        report::print_renames(&renames);
    }

    if let Some(path) = &cli.report {
        let report = Report::new(&cli.input, &cli.output, &outcome, &renames);
        let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
        write_file(path, &json)?;
        tracing::info!(path = %path.display(), "Wrote report");
    }

    Ok(())
}

/// Read, fix and write one file. Nothing is written when fixing fails.
fn fix_file(input: &Path, output: &Path, options: &FixOptions) -> Result<FixOutcome> {
    let source = read_file(input)?;
    let (fixed, outcome) = match fix_bibtex(&source, options, &TracingObserver) {
        Ok(fixed) => fixed,
        Err(err) if err.is_structural() => {
            return Err(anyhow::Error::new(err).context(format!(
                "{} must contain exactly one complete @Proceedings entry",
                input.display()
            )));
        }
        Err(err) => {
            return Err(anyhow::Error::new(err)
                .context(format!("Failed to process {}", input.display())));
        }
    };
    write_file(output, &fixed)?;
    tracing::info!(path = %output.display(), records = outcome.records.len(), "Wrote fixed file");
    Ok(outcome)
}

fn input_dir(input: &Path) -> &Path {
    input
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
}
