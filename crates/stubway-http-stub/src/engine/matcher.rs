//! Request-to-mapping matching.
//!
//! Selection order: explicit priority ascending (lower wins), then most
//! recently registered first. Registering a user mapping after the
//! default health checks therefore lets it shadow them.

use super::mapping::{RequestPattern, StubMapping};
use std::cmp::Reverse;
use std::collections::HashMap;

/// Find the mapping that should serve a request, if any.
///
/// `headers` must carry lowercased keys.
pub fn find_match<'a>(
    mappings: &'a [StubMapping],
    method: &str,
    path: &str,
    query: Option<&str>,
    headers: &HashMap<String, String>,
) -> Option<&'a StubMapping> {
    let mut order: Vec<usize> = (0..mappings.len()).collect();
    order.sort_by_key(|&i| (mappings[i].effective_priority(), Reverse(i)));

    order
        .into_iter()
        .map(|i| &mappings[i])
        .find(|m| request_matches(&m.request, method, path, query, headers))
}

fn request_matches(
    pattern: &RequestPattern,
    method: &str,
    path: &str,
    query: Option<&str>,
    headers: &HashMap<String, String>,
) -> bool {
    if pattern.method != "ANY" && !pattern.method.eq_ignore_ascii_case(method) {
        return false;
    }

    let url_ok = if let Some(ref url) = pattern.url {
        let full = match query {
            Some(q) => format!("{path}?{q}"),
            None => path.to_string(),
        };
        *url == full
    } else if let Some(ref url_path) = pattern.url_path {
        *url_path == path
    } else {
        true
    };
    if !url_ok {
        return false;
    }

    pattern
        .headers
        .iter()
        .all(|(name, expected)| headers.get(&name.to_lowercase()) == Some(expected))
}
