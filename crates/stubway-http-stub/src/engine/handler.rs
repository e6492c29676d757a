//! Per-request dispatch: admin surface first, then stub matching and
//! response rendering.

use super::admin;
use super::mapping::ResponseDefinition;
use super::matcher::find_match;
use super::server::EngineContext;
use super::template::RequestData;
use crate::extensions::Extension;
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::{Request, Response, StatusCode};
use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::Arc;

pub(crate) async fn handle_request(
    req: Request<Incoming>,
    ctx: Arc<EngineContext>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let method = req.method().to_string();
    let uri = req.uri().clone();
    let path = uri.path().to_string();
    let query = uri.query().map(|q| q.to_string());
    let header_map = req.headers().clone();

    let body = match req.into_body().collect().await {
        Ok(collected) => {
            let bytes = collected.to_bytes();
            if bytes.is_empty() {
                None
            } else {
                Some(String::from_utf8_lossy(&bytes).to_string())
            }
        }
        Err(_) => None,
    };

    if path.starts_with("/__admin/") {
        return Ok(admin::handle_admin(&method, &path, body.as_deref(), &ctx));
    }

    let headers: HashMap<String, String> = header_map
        .iter()
        .filter_map(|(k, v)| {
            v.to_str()
                .ok()
                .map(|val| (k.as_str().to_lowercase(), val.to_string()))
        })
        .collect();

    let matched = {
        let stubs = ctx.stubs.read();
        find_match(&stubs, &method, &path, query.as_deref(), &headers).cloned()
    };

    match matched {
        Some(mapping) => {
            ctx.notifier
                .notify(&format!("matched stub mapping for {method} {path}"));
            let request_data =
                RequestData::new(&method, &path, query.as_deref(), &header_map, body.as_deref());
            Ok(render_response(
                &mapping.response,
                &ctx.extensions,
                &request_data,
            ))
        }
        None => {
            ctx.notifier
                .notify(&format!("no stub mapping matched {method} {path}"));
            Ok(text_response(
                StatusCode::NOT_FOUND,
                "No matching stub mapping",
            ))
        }
    }
}

fn render_response(
    definition: &ResponseDefinition,
    extensions: &[Arc<dyn Extension>],
    request: &RequestData,
) -> Response<Full<Bytes>> {
    let mut body = match (&definition.body, &definition.json_body) {
        (Some(text), _) => text.clone(),
        (None, Some(json)) => json.to_string(),
        (None, None) => String::new(),
    };
    for extension in extensions {
        body = extension.transform(body, request);
    }

    let mut builder = Response::builder().status(definition.status);
    for (name, value) in &definition.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    let has_content_type = definition
        .headers
        .keys()
        .any(|k| k.eq_ignore_ascii_case("content-type"));
    if definition.json_body.is_some() && !has_content_type {
        builder = builder.header("content-type", "application/json");
    }

    // Builder failure means an invalid header name/value in the mapping
    builder
        .body(Full::new(Bytes::from(body)))
        .unwrap_or_else(|_| text_response(StatusCode::INTERNAL_SERVER_ERROR, "invalid stub response"))
}

pub(crate) fn text_response(status: StatusCode, body: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header("content-type", "text/plain")
        .body(Full::new(Bytes::from(body.to_string())))
        .unwrap_or_else(|_| Response::new(Full::new(Bytes::from("Internal Server Error"))))
}
