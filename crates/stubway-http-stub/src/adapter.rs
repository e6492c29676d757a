//! The stub server adapter: lifecycle control and mapping registration.
//!
//! One [`StubAdapter`] per logical stub server. Callers serialize
//! `start`/`stop`/`register_mappings` on a given adapter; multiple
//! adapters may run in parallel and share only the process registry.

use crate::config::{ConfigSource, DefaultConfigSource, EngineConfig, TracingNotifier};
use crate::descriptor;
use crate::engine::mapping::{RequestPattern, ResponseDefinition, StubMapping};
use crate::engine::StubEngine;
use crate::error::AdapterError;
use crate::extensions::{resolve_extensions, Helper};
use crate::net;
use crate::registry::{self, AdapterId, PortAndMappings};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::sync::OnceLock;
use std::time::Duration;
use tracing::{debug, trace};

/// Sentinel returned by [`StubAdapter::port`] when the server is not running.
pub const INVALID_PORT: i32 = -1;

/// Shared client for admin round-trips against running engines.
static ADMIN_CLIENT: OnceLock<reqwest::Client> = OnceLock::new();

fn admin_client() -> &'static reqwest::Client {
    ADMIN_CLIENT.get_or_init(|| {
        reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client")
    })
}

/// Adapter over the embedded engine as an HTTP server stub.
pub struct StubAdapter {
    id: AdapterId,
    engine: Option<StubEngine>,
    config_source: Arc<dyn ConfigSource>,
    helpers: Option<HashMap<String, Arc<dyn Helper>>>,
}

impl std::fmt::Debug for StubAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StubAdapter")
            .field("id", &self.id)
            .field("running", &self.engine.is_some())
            .finish_non_exhaustive()
    }
}

impl StubAdapter {
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> StubAdapterBuilder {
        StubAdapterBuilder::default()
    }

    /// Identity used as the process registry key.
    pub fn id(&self) -> AdapterId {
        self.id
    }

    pub fn is_running(&self) -> bool {
        self.engine.as_ref().is_some_and(StubEngine::is_running)
    }

    /// The bound port when running, [`INVALID_PORT`] otherwise.
    pub fn port(&self) -> i32 {
        match self.running_engine() {
            Some(engine) => i32::from(engine.port()),
            None => INVALID_PORT,
        }
    }

    /// Whether a file would be loaded as a stub descriptor.
    pub fn is_accepted(path: &Path) -> bool {
        descriptor::is_accepted(path)
    }

    /// Start on a freshly allocated free port. No-op when already running.
    pub async fn start(&mut self) -> Result<&mut Self, AdapterError> {
        if self.is_running() {
            trace!("stub server already running at port [{}]", self.port());
            return Ok(self);
        }
        let port = net::find_available_port().await?;
        self.start_on(port).await
    }

    /// Start on a fixed port (0 lets the OS pick). On a running adapter
    /// this replaces the engine handle; the prior engine is abandoned
    /// and its listener closes when the handle drops.
    pub async fn start_on(&mut self, port: u16) -> Result<&mut Self, AdapterError> {
        let config = self.build_config(port);
        let engine = StubEngine::start(config).await?;
        let bound = engine.port();
        self.engine = Some(engine);
        debug!("started stub engine at port [{bound}]");
        if !registry::contains(self.id) {
            registry::insert(self.id, PortAndMappings::new(bound, Vec::new()));
        }
        Ok(self)
    }

    /// Stop the engine. The registry entry is retained for observability.
    pub async fn stop(&mut self) -> &mut Self {
        match self.running_engine() {
            Some(engine) => engine.stop().await,
            None => trace!("trying to stop a stub server that is not running"),
        }
        self
    }

    /// Register stub descriptors from files, in order. Per-file failures
    /// are isolated: a descriptor that cannot be loaded or that the
    /// engine rejects is logged at debug and skipped, and the batch
    /// continues. The default health checks are installed first so user
    /// mappings can override them.
    pub async fn register_mappings<P: AsRef<Path>>(
        &mut self,
        files: &[P],
    ) -> Result<&mut Self, AdapterError> {
        let port = self.bound_port()?;

        self.register_default_health_checks(port).await?;

        let mut registered = Vec::new();
        for file in files {
            let path = file.as_ref();
            let mapping = match descriptor::load(path) {
                Ok(mapping) => mapping,
                Err(e) => {
                    debug!("skipping stub descriptor [{}]: {e}", path.display());
                    continue;
                }
            };
            match register_with_engine(port, &mapping).await {
                Ok(()) => {
                    debug!("registered stub mapping from [{}]", path.display());
                    registered.push(mapping);
                }
                Err(e) => {
                    debug!("failed to register stub mapping [{}]: {e}", path.display());
                }
            }
        }

        registry::insert(self.id, PortAndMappings::new(port, registered));
        Ok(self)
    }

    /// The engine's current mappings as a JSON array string: each
    /// element is the engine's own rendering, joined with `,\n`.
    pub fn registered_mappings(&self) -> String {
        let rendered: Vec<String> = self
            .engine
            .as_ref()
            .map(StubEngine::mappings)
            .unwrap_or_default()
            .iter()
            .map(ToString::to_string)
            .collect();
        format!("[{}]", rendered.join(",\n"))
    }

    /// Bulk registration of already-built mappings (e.g. from a remote
    /// feed). Registers with the engine only; the registry is untouched.
    pub async fn register_descriptors(&self, mappings: &[StubMapping]) -> Result<(), AdapterError> {
        let port = self.bound_port()?;
        debug!(
            "registering stub mappings size [{}] at port [{port}]",
            mappings.len()
        );
        for mapping in mappings {
            register_with_engine(port, mapping).await?;
        }
        Ok(())
    }

    fn build_config(&self, port: u16) -> EngineConfig {
        let base = self.config_source.base_config();
        let verbose = base.verbose;
        base.extensions(resolve_extensions(self.helpers.as_ref()))
            .port(port)
            .notifier(Arc::new(TracingNotifier::new(verbose)))
    }

    fn running_engine(&self) -> Option<&StubEngine> {
        self.engine.as_ref().filter(|e| e.is_running())
    }

    fn bound_port(&self) -> Result<u16, AdapterError> {
        self.running_engine()
            .map(StubEngine::port)
            .ok_or(AdapterError::NotRunning)
    }

    async fn register_default_health_checks(&self, port: u16) -> Result<(), AdapterError> {
        for url in ["/ping", "/health"] {
            register_with_engine(port, &health_check(url)).await?;
        }
        Ok(())
    }
}

impl Default for StubAdapter {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for [`StubAdapter`]. Custom helpers replace the built-in set
/// used by the fallback response transformer; a custom config source
/// supplies host-tuned base options.
#[derive(Default)]
pub struct StubAdapterBuilder {
    config_source: Option<Arc<dyn ConfigSource>>,
    helpers: Option<HashMap<String, Arc<dyn Helper>>>,
}

impl StubAdapterBuilder {
    pub fn config_source(mut self, source: Arc<dyn ConfigSource>) -> Self {
        self.config_source = Some(source);
        self
    }

    pub fn helpers(mut self, helpers: HashMap<String, Arc<dyn Helper>>) -> Self {
        self.helpers = Some(helpers);
        self
    }

    pub fn build(self) -> StubAdapter {
        StubAdapter {
            id: AdapterId::next(),
            engine: None,
            config_source: self
                .config_source
                .unwrap_or_else(|| Arc::new(DefaultConfigSource)),
            helpers: self.helpers,
        }
    }
}

async fn register_with_engine(port: u16, mapping: &StubMapping) -> Result<(), AdapterError> {
    let url = format!("http://127.0.0.1:{port}/__admin/mappings");
    let response = admin_client()
        .post(&url)
        .json(mapping)
        .send()
        .await
        .map_err(|e| AdapterError::Register {
            reason: e.to_string(),
        })?;
    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(AdapterError::Register {
            reason: format!("{status}: {body}"),
        });
    }
    Ok(())
}

fn health_check(url: &str) -> StubMapping {
    StubMapping {
        priority: None,
        request: RequestPattern {
            method: "GET".to_string(),
            url: Some(url.to_string()),
            url_path: None,
            headers: HashMap::new(),
        },
        response: ResponseDefinition {
            status: 200,
            body: Some("OK".to_string()),
            json_body: None,
            headers: HashMap::new(),
        },
    }
}
