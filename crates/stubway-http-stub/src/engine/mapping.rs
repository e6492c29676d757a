//! Stub mapping wire types.
//!
//! A mapping pairs a request matcher with a response template. Descriptor
//! files on disk are UTF-8 JSON documents in this format:
//!
//! ```json
//! {
//!   "request": { "method": "GET", "url": "/user" },
//!   "response": { "status": 200, "body": "{\"id\":1}" }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Default matcher priority; lower values win, ties go to the most
/// recently registered mapping.
pub const DEFAULT_PRIORITY: u32 = 5;

fn default_method() -> String {
    "GET".to_string()
}

fn default_status() -> u16 {
    200
}

/// Request side of a stub mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestPattern {
    /// HTTP method to match; `ANY` matches every method.
    #[serde(default = "default_method")]
    pub method: String,
    /// Exact URL match including the query string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Exact path match, query string ignored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url_path: Option<String>,
    /// Headers that must be present with exactly these values.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub headers: HashMap<String, String>,
}

/// Response side of a stub mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseDefinition {
    #[serde(default = "default_status")]
    pub status: u16,
    /// Literal body text; may contain `{{helper …}}` template tokens.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Structured JSON body, serialized compactly when rendered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json_body: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub headers: HashMap<String, String>,
}

/// A stub descriptor understood by the engine: request matcher plus
/// response template. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StubMapping {
    /// Explicit matcher priority; lower wins. Defaults to [`DEFAULT_PRIORITY`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u32>,
    pub request: RequestPattern,
    pub response: ResponseDefinition,
}

impl StubMapping {
    /// Parse a mapping from the textual content of a descriptor file.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn effective_priority(&self) -> u32 {
        self.priority.unwrap_or(DEFAULT_PRIORITY)
    }
}

impl fmt::Display for StubMapping {
    /// The engine's own string rendering of a mapping: pretty-printed JSON.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = serde_json::to_string_pretty(self).map_err(|_| fmt::Error)?;
        f.write_str(&rendered)
    }
}
