use anyhow::{Context, Result};
use pmlr_bibtex::FixOptions;
use std::fs;
use std::path::Path;

/// Read a file to a string
pub fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path.display()))
}

/// Write content to a file
pub fn write_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).with_context(|| format!("Failed to write file: {}", path.display()))
}

/// Load run options from a TOML file
pub fn load_options(path: &Path) -> Result<FixOptions> {
    let content = read_file(path)?;
    toml::from_str(&content).with_context(|| format!("Failed to parse config: {}", path.display()))
}
