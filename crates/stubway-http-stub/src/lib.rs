// Library exports for integration testing and embedding

// ===== Adapter core =====
pub mod adapter;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod net;
pub mod registry;

// ===== Embedded stub engine =====
pub mod engine;

// ===== Response-template extension points =====
pub mod extensions;

pub use adapter::{StubAdapter, StubAdapterBuilder, INVALID_PORT};
pub use config::{ConfigSource, DefaultConfigSource, EngineConfig, Notifier, TracingNotifier};
pub use engine::{RequestPattern, ResponseDefinition, StubEngine, StubMapping};
pub use error::AdapterError;
pub use extensions::{
    register_provider, resolve_extensions, Extension, ExtensionProvider, Helper,
    ResponseTransformer,
};
pub use registry::{AdapterId, PortAndMappings};
