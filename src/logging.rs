//! Diagnostic logging for the plugin.
//!
//! Hosts usually swallow a plugin's stdout and stderr, so log records go to a file instead. A
//! host may instantiate the plugin many times within one process, but a global subscriber can
//! only be installed once, so installation is guarded by a process-wide cell.
//!
//! Nothing on the audio processing thread may log: formatting and writing a record allocates and
//! can block on I/O.

use std::fs::OpenOptions;
use std::sync::Mutex;

use once_cell::sync::OnceCell;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::error::Error;

static INSTALLED: OnceCell<()> = OnceCell::new();

/// Installs the file-backed subscriber described by `config`, if logging is enabled. Later calls
/// are no-ops.
pub fn init(config: &Config) {
    let filter = match &config.log_filter {
        Some(filter) => filter,
        None => return,
    };

    if let Err(e) = INSTALLED.get_or_try_init(|| install(filter, config)) {
        eprintln!("trisynth: logging disabled: {}", e);
    }
}

fn install(filter: &str, config: &Config) -> Result<(), Error> {
    let filter = EnvFilter::try_new(filter)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)?;

    // Another library in the host process may already own the global subscriber; that is fine.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        log_file = %config.log_file.display(),
        "logging started"
    );
    Ok(())
}
