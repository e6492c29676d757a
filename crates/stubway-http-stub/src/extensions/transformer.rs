//! Engine extensions and the default response transformer.

use super::helpers::{default_helpers, Helper};
use crate::engine::template::RequestData;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::sync::Arc;

/// An engine extension. Extensions are assembled at config time and
/// applied to every rendered response body in order.
pub trait Extension: Send + Sync {
    fn name(&self) -> &'static str;

    /// Transform a response body before it is sent. The default is the
    /// identity transform.
    fn transform(&self, body: String, _request: &RequestData) -> String {
        body
    }
}

/// Regex for `{{helper args…}}` tokens.
static TOKEN_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{([a-zA-Z][a-zA-Z0-9_-]*)([^{}]*)\}\}").expect("valid regex"));

/// Default response-transformer extension: expands `{{helper args…}}`
/// tokens in response bodies using a named helper map. Unknown helpers
/// and unresolvable arguments leave the token untouched.
pub struct ResponseTransformer {
    helpers: HashMap<String, Arc<dyn Helper>>,
}

impl ResponseTransformer {
    pub const NAME: &'static str = "response-template";

    pub fn new(helpers: HashMap<String, Arc<dyn Helper>>) -> Self {
        Self { helpers }
    }

    pub fn with_default_helpers() -> Self {
        Self::new(default_helpers())
    }
}

impl Extension for ResponseTransformer {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn transform(&self, body: String, request: &RequestData) -> String {
        TOKEN_REGEX
            .replace_all(&body, |caps: &regex::Captures<'_>| {
                let name = &caps[1];
                let args = &caps[2];
                match self.helpers.get(name).and_then(|h| h.apply(args, request)) {
                    Some(expanded) => expanded,
                    None => caps[0].to_string(),
                }
            })
            .into_owned()
    }
}
