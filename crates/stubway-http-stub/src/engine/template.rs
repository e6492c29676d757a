//! Request data extraction for response-template helpers.
//!
//! Helpers receive a snapshot of the matched request and resolve values
//! by dotted path, e.g. `body`, `path`, `query.name`, `headers.accept`.

use std::collections::HashMap;

/// Parsed request data handed to response-template helpers.
#[derive(Debug, Clone, Default)]
pub struct RequestData {
    /// HTTP method (GET, POST, ...)
    pub method: String,
    /// Request path without the query string
    pub path: String,
    /// Query parameters parsed from the URL
    pub query: HashMap<String, String>,
    /// Request headers (keys lowercased)
    pub headers: HashMap<String, String>,
    /// Raw request body
    pub body: String,
}

impl RequestData {
    pub fn new(
        method: &str,
        path: &str,
        query_string: Option<&str>,
        headers: &hyper::HeaderMap,
        body: Option<&str>,
    ) -> Self {
        let headers_map = headers
            .iter()
            .filter_map(|(k, v)| {
                v.to_str()
                    .ok()
                    .map(|val| (k.as_str().to_lowercase(), val.to_string()))
            })
            .collect();

        Self {
            method: method.to_string(),
            path: path.to_string(),
            query: parse_query_string(query_string),
            headers: headers_map,
            body: body.unwrap_or("").to_string(),
        }
    }

    /// Resolve a value by dotted path (e.g. `query.name`, `headers.content-type`).
    pub fn get(&self, path: &str) -> Option<String> {
        let parts: Vec<&str> = path.splitn(2, '.').collect();

        match parts.as_slice() {
            ["path"] => Some(self.path.clone()),
            ["method"] => Some(self.method.clone()),
            ["body"] => Some(self.body.clone()),
            ["query", name] => self.query.get(*name).cloned(),
            ["headers", name] => self.headers.get(&name.to_lowercase()).cloned(),
            _ => None,
        }
    }
}

/// Parse a query string into a map, URL-decoding values.
pub fn parse_query_string(query: Option<&str>) -> HashMap<String, String> {
    let mut params = HashMap::new();
    if let Some(q) = query {
        for pair in q.split('&') {
            if let Some((key, value)) = pair.split_once('=') {
                let decoded = urlencoding::decode(value).unwrap_or_default().to_string();
                params.insert(key.to_string(), decoded);
            } else if !pair.is_empty() {
                params.insert(pair.to_string(), String::new());
            }
        }
    }
    params
}
