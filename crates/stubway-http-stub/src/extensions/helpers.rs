//! Built-in response-template helpers.
//!
//! Helpers are invoked from `{{name args…}}` tokens in a response body.
//! The built-in set covers JSONPath extraction and JSON string escaping;
//! callers may supply their own map at adapter construction.

use crate::engine::template::RequestData;
use serde_json_path::JsonPath;
use std::collections::HashMap;
use std::sync::Arc;

/// A named response-template helper. Identified by a unique name per
/// adapter; assembled once at config time and immutable afterwards.
pub trait Helper: Send + Sync {
    fn name(&self) -> &'static str;

    /// Expand a token. Returns `None` when the arguments cannot be
    /// resolved, in which case the token is left in place.
    fn apply(&self, args: &str, request: &RequestData) -> Option<String>;
}

/// Extracts a JSONPath value from a request field.
///
/// Token form: `{{jsonpath request.body '$.name'}}`.
pub struct JsonPathHelper;

impl JsonPathHelper {
    pub const NAME: &'static str = "jsonpath";
}

impl Helper for JsonPathHelper {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn apply(&self, args: &str, request: &RequestData) -> Option<String> {
        let (source, expr) = split_args(args)?;
        let value = request.get(strip_request_prefix(&source))?;
        let parsed: serde_json::Value = serde_json::from_str(&value).ok()?;
        let path = JsonPath::parse(&expr).ok()?;
        let nodes = path.query(&parsed).all();
        let node = nodes.first()?;
        Some(match node {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }
}

/// JSON-escapes the value of a request field.
///
/// Token form: `{{escape request.query.msg}}`.
pub struct EscapeHelper;

impl EscapeHelper {
    pub const NAME: &'static str = "escape";
}

impl Helper for EscapeHelper {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn apply(&self, args: &str, request: &RequestData) -> Option<String> {
        let value = request.get(strip_request_prefix(args.trim()))?;
        let quoted = serde_json::to_string(&value).ok()?;
        // Drop the surrounding quotes added by the JSON serializer
        Some(quoted[1..quoted.len() - 1].to_string())
    }
}

/// The built-in helper set used when no extension provider is registered.
pub fn default_helpers() -> HashMap<String, Arc<dyn Helper>> {
    let mut helpers: HashMap<String, Arc<dyn Helper>> = HashMap::new();
    helpers.insert(JsonPathHelper::NAME.to_string(), Arc::new(JsonPathHelper));
    helpers.insert(EscapeHelper::NAME.to_string(), Arc::new(EscapeHelper));
    helpers
}

fn strip_request_prefix(source: &str) -> &str {
    source.strip_prefix("request.").unwrap_or(source)
}

/// Split helper arguments into a request field and a quoted expression,
/// e.g. `request.body '$.name'`.
fn split_args(args: &str) -> Option<(String, String)> {
    let trimmed = args.trim();
    let (source, rest) = trimmed.split_once(char::is_whitespace)?;
    let rest = rest.trim();
    let expr = rest
        .strip_prefix('\'')
        .and_then(|r| r.strip_suffix('\''))
        .or_else(|| rest.strip_prefix('"').and_then(|r| r.strip_suffix('"')))
        .unwrap_or(rest);
    Some((source.to_string(), expr.to_string()))
}
