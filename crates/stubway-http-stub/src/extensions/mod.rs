//! Response-template extension points.
//!
//! - **Helpers** (`helpers`): named functions invoked during response
//!   rendering (JSONPath extraction, JSON escaping)
//! - **Transformer** (`transformer`): the `Extension` trait and the
//!   default `{{helper …}}` token expander
//! - **Provider registry** (`provider`): process-wide discovery of
//!   caller-supplied extension sets

pub mod helpers;
pub mod provider;
pub mod transformer;

pub use helpers::{default_helpers, EscapeHelper, Helper, JsonPathHelper};
pub use provider::{clear_providers, register_provider, resolve_extensions, ExtensionProvider};
pub use transformer::{Extension, ResponseTransformer};
