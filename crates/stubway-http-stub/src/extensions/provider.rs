//! Process-wide extension provider registry.
//!
//! Providers register themselves once at process init via
//! [`register_provider`]; the resolver concatenates their extensions in
//! registration order. When no provider is registered, a single default
//! [`ResponseTransformer`] carrying the built-in helper set is used, so
//! the adapter stays useful standalone.

use super::helpers::Helper;
use super::transformer::{Extension, ResponseTransformer};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// A pluggable source of engine extensions.
pub trait ExtensionProvider: Send + Sync {
    fn extensions(&self) -> Vec<Arc<dyn Extension>>;
}

static PROVIDERS: Lazy<RwLock<Vec<Arc<dyn ExtensionProvider>>>> =
    Lazy::new(|| RwLock::new(Vec::new()));

/// Register an extension provider. Call once per provider at process init.
pub fn register_provider(provider: Arc<dyn ExtensionProvider>) {
    PROVIDERS.write().push(provider);
}

/// Remove all registered providers. Intended for test teardown and
/// long-lived hosts that re-initialize.
pub fn clear_providers() {
    PROVIDERS.write().clear();
}

/// Resolve the extension list for a new engine instance.
///
/// Registered providers win, in discovery order, preserving each
/// provider's own ordering. With no providers, falls back to the default
/// response transformer, using `custom_helpers` when the caller supplied
/// a set at adapter construction.
pub fn resolve_extensions(
    custom_helpers: Option<&HashMap<String, Arc<dyn Helper>>>,
) -> Vec<Arc<dyn Extension>> {
    let providers = PROVIDERS.read();
    if !providers.is_empty() {
        return providers.iter().flat_map(|p| p.extensions()).collect();
    }

    let transformer = match custom_helpers {
        Some(helpers) => ResponseTransformer::new(helpers.clone()),
        None => ResponseTransformer::with_default_helpers(),
    };
    vec![Arc::new(transformer)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    struct NamedExtension(&'static str);

    impl Extension for NamedExtension {
        fn name(&self) -> &'static str {
            self.0
        }
    }

    struct StaticProvider(Vec<&'static str>);

    impl ExtensionProvider for StaticProvider {
        fn extensions(&self) -> Vec<Arc<dyn Extension>> {
            self.0
                .iter()
                .map(|&name| Arc::new(NamedExtension(name)) as Arc<dyn Extension>)
                .collect()
        }
    }

    #[test]
    #[serial]
    fn test_fallback_is_default_transformer() {
        clear_providers();
        let extensions = resolve_extensions(None);
        assert_eq!(extensions.len(), 1);
        assert_eq!(extensions[0].name(), ResponseTransformer::NAME);
    }

    #[test]
    #[serial]
    fn test_providers_concatenate_in_order() {
        clear_providers();
        register_provider(Arc::new(StaticProvider(vec!["a", "b"])));
        register_provider(Arc::new(StaticProvider(vec!["c"])));

        let extensions = resolve_extensions(None);
        let names: Vec<&str> = extensions.iter().map(|e| e.name()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);

        clear_providers();
    }
}
