//! The embedded stub engine: a hyper HTTP/1 server over a tokio accept
//! loop with a broadcast shutdown channel.

use super::handler::handle_request;
use super::mapping::StubMapping;
use crate::config::{EngineConfig, Notifier};
use crate::error::AdapterError;
use crate::extensions::Extension;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tracing::{debug, error};

/// Shared state handed to per-request handlers.
pub(crate) struct EngineContext {
    pub stubs: Arc<RwLock<Vec<StubMapping>>>,
    pub extensions: Vec<Arc<dyn Extension>>,
    pub notifier: Arc<dyn Notifier>,
}

/// A running stub engine bound to a TCP port.
///
/// Dropping the handle closes the shutdown channel, which tears the
/// accept loop (and the listener) down; an abandoned engine does not
/// keep its port.
#[derive(Debug)]
pub struct StubEngine {
    port: u16,
    stubs: Arc<RwLock<Vec<StubMapping>>>,
    running: Arc<AtomicBool>,
    shutdown_tx: broadcast::Sender<()>,
    started_at: chrono::DateTime<chrono::Utc>,
}

impl StubEngine {
    /// Bind the configured port and start serving. Returns once the
    /// listener accepts connections.
    pub async fn start(config: EngineConfig) -> Result<Self, AdapterError> {
        let requested = config.port;
        let listener = TcpListener::bind((config.host.as_str(), requested))
            .await
            .map_err(|e| AdapterError::EngineStart {
                port: requested,
                reason: e.to_string(),
            })?;
        let port = listener
            .local_addr()
            .map_err(|e| AdapterError::EngineStart {
                port: requested,
                reason: e.to_string(),
            })?
            .port();

        let stubs: Arc<RwLock<Vec<StubMapping>>> = Arc::new(RwLock::new(Vec::new()));
        let running = Arc::new(AtomicBool::new(true));
        let (shutdown_tx, mut shutdown_rx) = broadcast::channel(1);

        let ctx = Arc::new(EngineContext {
            stubs: Arc::clone(&stubs),
            extensions: config.extensions,
            notifier: config.notifier,
        });

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    result = listener.accept() => {
                        match result {
                            Ok((stream, _addr)) => {
                                let ctx = Arc::clone(&ctx);
                                tokio::spawn(async move {
                                    let io = TokioIo::new(stream);
                                    let service = service_fn(move |req| {
                                        let ctx = Arc::clone(&ctx);
                                        async move { handle_request(req, ctx).await }
                                    });
                                    if let Err(e) = http1::Builder::new()
                                        .serve_connection(io, service)
                                        .await
                                    {
                                        debug!("connection error on port {}: {}", port, e);
                                    }
                                });
                            }
                            Err(e) => {
                                error!("accept error on port {}: {}", port, e);
                            }
                        }
                    }
                    // Both an explicit stop and a dropped handle end the loop
                    _ = shutdown_rx.recv() => {
                        debug!("stub engine on port {} shutting down", port);
                        break;
                    }
                }
            }
        });

        Ok(Self {
            port,
            stubs,
            running,
            shutdown_tx,
            started_at: chrono::Utc::now(),
        })
    }

    /// The actual bound port, which may differ from the requested one
    /// when port 0 was configured.
    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn started_at(&self) -> chrono::DateTime<chrono::Utc> {
        self.started_at
    }

    /// Stop accepting connections. In-flight requests finish on their
    /// own tasks.
    pub async fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
        let _ = self.shutdown_tx.send(());
    }

    /// Snapshot of the currently registered mappings, in registration order.
    pub fn mappings(&self) -> Vec<StubMapping> {
        self.stubs.read().clone()
    }
}
