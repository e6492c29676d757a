//! Error types for the stub server adapter.

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the adapter and its embedded engine.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// The operation requires a running stub server.
    #[error("stub server is not running")]
    NotRunning,

    /// A descriptor file could not be opened, read, or parsed.
    #[error("cannot read stub descriptor [{}]: {reason}", path.display())]
    DescriptorRead { path: PathBuf, reason: String },

    /// The port allocator exhausted the dynamic range.
    #[error("no free TCP port available in the dynamic range")]
    NoFreePort,

    /// The engine failed to bind or start.
    #[error("failed to start stub engine on port {port}: {reason}")]
    EngineStart { port: u16, reason: String },

    /// The engine rejected a mapping during registration.
    #[error("engine rejected stub mapping: {reason}")]
    Register { reason: String },
}
