//! Free TCP port allocation.

use crate::error::AdapterError;
use tokio::net::TcpListener;

/// Find a free TCP port in the dynamic/private range (49152-65535).
///
/// The probe listener is dropped before returning, so the caller must
/// bind promptly; the engine does so as its first start step.
pub async fn find_available_port() -> Result<u16, AdapterError> {
    for port in 49152..=u16::MAX {
        if TcpListener::bind(("127.0.0.1", port)).await.is_ok() {
            return Ok(port);
        }
    }
    Err(AdapterError::NoFreePort)
}
