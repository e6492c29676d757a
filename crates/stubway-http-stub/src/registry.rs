//! Process-wide registry of running stub instances.
//!
//! Maps adapter identity to its bound port and most recent mapping
//! batch. Entries are written only by the owning adapter's lifecycle
//! sequencing; concurrent readers are fine. The core never evicts:
//! external teardown tooling may call [`remove`].

use crate::engine::mapping::StubMapping;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Process-unique adapter identity, usable as a map key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AdapterId(u64);

impl AdapterId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        AdapterId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for AdapterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "adapter-{}", self.0)
    }
}

/// The bound port of a running adapter together with the mappings from
/// its most recent successful registration batch. Replaced wholesale on
/// re-registration, never mutated in place.
#[derive(Debug, Clone)]
pub struct PortAndMappings {
    pub port: u16,
    pub mappings: Vec<StubMapping>,
}

impl PortAndMappings {
    pub fn new(port: u16, mappings: Vec<StubMapping>) -> Self {
        Self { port, mappings }
    }
}

impl fmt::Display for PortAndMappings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PortAndMappings{{port={}, mappings={}}}",
            self.port,
            self.mappings.len()
        )
    }
}

static SERVERS: Lazy<RwLock<HashMap<AdapterId, PortAndMappings>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

pub fn insert(id: AdapterId, record: PortAndMappings) {
    SERVERS.write().insert(id, record);
}

pub fn get(id: AdapterId) -> Option<PortAndMappings> {
    SERVERS.read().get(&id).cloned()
}

pub fn contains(id: AdapterId) -> bool {
    SERVERS.read().contains_key(&id)
}

/// Explicit teardown for long-lived hosts; the core itself never evicts.
pub fn remove(id: AdapterId) -> Option<PortAndMappings> {
    SERVERS.write().remove(&id)
}
