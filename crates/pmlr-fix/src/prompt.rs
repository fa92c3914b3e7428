//! Interactive `y/n` confirmation for file renames.

use pmlr_bibtex::{Confirm, FileRename};
use std::io::{self, BufRead, Stdout, StdinLock, Write};
use std::path::Path;

/// Asks on `output` and reads answers from `input` until one is understood.
pub struct ConsolePrompt<R, W> {
    input: R,
    output: W,
}

impl ConsolePrompt<StdinLock<'static>, Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> ConsolePrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn ask(&mut self, original: &str, renames: &[FileRename]) -> io::Result<bool> {
        writeln!(self.output, "\nFound the following files for '{original}':")?;
        for rename in renames {
            writeln!(
                self.output,
                "  {} -> {}",
                file_name(&rename.from),
                file_name(&rename.to)
            )?;
        }

        loop {
            write!(self.output, "Rename these files? [y/n]: ")?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Ok(false);
            }
            match parse_answer(&line) {
                Some(answer) => return Ok(answer),
                None => writeln!(self.output, "Please answer 'y' or 'n'")?,
            }
        }
    }
}

impl<R: BufRead, W: Write> Confirm for ConsolePrompt<R, W> {
    fn confirm(&mut self, original: &str, _normalized: &str, renames: &[FileRename]) -> bool {
        match self.ask(original, renames) {
            Ok(answer) => answer,
            Err(err) => {
                tracing::warn!(error = %err, "Could not read answer, skipping rename");
                false
            }
        }
    }
}

/// `y`/`yes` or `n`/`no`, any case.
pub fn parse_answer(line: &str) -> Option<bool> {
    match line.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}

fn file_name(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |name| name.to_string_lossy().into_owned(),
    )
}
