//! Subscriber setup.
//!
//! Console output goes to stderr and honours `RUST_LOG`. With `--log-file`
//! a second layer writes everything at debug level to that file.

use anyhow::{Context, Result};
use std::fs::File;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "pmlr_fix=info,pmlr_bibtex=info";
const QUIET_FILTER: &str = "pmlr_fix=warn,pmlr_bibtex=warn";

pub fn init(log_file: Option<&Path>, quiet: bool) -> Result<()> {
    let default_filter = if quiet { QUIET_FILTER } else { DEFAULT_FILTER };
    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()));

    let file = match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file: {}", path.display()))?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file))
                    .with_filter(LevelFilter::DEBUG),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(console)
        .with(file)
        .try_init()
        .context("Failed to initialize logging")?;

    Ok(())
}
