//! Failures that can occur outside of the audio processing path.
//!
//! Audio processing itself cannot fail. Everything here is either caused by data handed to the
//! plugin by the host (preset chunks), by the environment (log files), or by the editor's GPU
//! setup. The VST API has no way to report errors, so they are logged at the trait boundary.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("malformed preset data: {0}")]
    Preset(#[from] serde_json::Error),

    #[error("unsupported preset version {found} (expected {expected})")]
    PresetVersion { found: u32, expected: u32 },

    #[error("log file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid log filter: {0}")]
    LogFilter(#[from] tracing_subscriber::filter::ParseError),

    #[cfg(feature = "editor")]
    #[error("no compatible graphics adapter found")]
    NoAdapter,

    #[cfg(feature = "editor")]
    #[error("could not open graphics device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
}
