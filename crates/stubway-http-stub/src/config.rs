//! Engine configuration assembly.
//!
//! The adapter builds an [`EngineConfig`] per start: base options come
//! from an injected [`ConfigSource`] (default or host-tuned), extensions
//! from the provider registry, and a [`Notifier`] forwards engine log
//! events to `tracing`.

use crate::extensions::Extension;
use std::sync::Arc;
use tracing::{debug, error};

/// Sink for engine log events.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
    fn error(&self, message: &str);
}

/// Forwards engine events to the process logger; informational events
/// are emitted at debug level only when verbose.
pub struct TracingNotifier {
    verbose: bool,
}

impl TracingNotifier {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl Notifier for TracingNotifier {
    fn notify(&self, message: &str) {
        if self.verbose {
            debug!(target: "stubway::engine", "{message}");
        }
    }

    fn error(&self, message: &str) {
        error!(target: "stubway::engine", "{message}");
    }
}

/// Configuration used to construct a [`crate::engine::StubEngine`].
pub struct EngineConfig {
    /// Interface to bind; localhost by default.
    pub host: String,
    /// TCP port to bind; 0 lets the OS pick.
    pub port: u16,
    /// Whether the notifier forwards informational engine events.
    pub verbose: bool,
    /// Response-transformer extensions, applied in order.
    pub extensions: Vec<Arc<dyn Extension>>,
    /// Log event sink.
    pub notifier: Arc<dyn Notifier>,
}

impl EngineConfig {
    pub fn new() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 0,
            verbose: true,
            extensions: Vec::new(),
            notifier: Arc::new(TracingNotifier::new(true)),
        }
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn extensions(mut self, extensions: Vec<Arc<dyn Extension>>) -> Self {
        self.extensions = extensions;
        self
    }

    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Source of base engine options. The caller injects a host-tuned
/// implementation when the environment calls for one; [`DefaultConfigSource`]
/// serves everyone else.
pub trait ConfigSource: Send + Sync {
    fn base_config(&self) -> EngineConfig;
}

pub struct DefaultConfigSource;

impl ConfigSource for DefaultConfigSource {
    fn base_config(&self) -> EngineConfig {
        EngineConfig::new()
    }
}
