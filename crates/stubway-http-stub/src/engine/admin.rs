//! Engine admin surface, served on the stub port under `/__admin`.
//!
//! The registrar registers mappings through this surface via a localhost
//! client rather than touching engine internals directly.

use super::handler::text_response;
use super::mapping::StubMapping;
use super::server::EngineContext;
use bytes::Bytes;
use http_body_util::Full;
use hyper::{Response, StatusCode};
use serde::Serialize;
use serde_json::json;

pub(crate) fn handle_admin(
    method: &str,
    path: &str,
    body: Option<&str>,
    ctx: &EngineContext,
) -> Response<Full<Bytes>> {
    match (method, path) {
        ("POST", "/__admin/mappings") => register_mapping(body, ctx),
        ("GET", "/__admin/mappings") => list_mappings(ctx),
        _ => text_response(StatusCode::NOT_FOUND, "unknown admin route"),
    }
}

fn register_mapping(body: Option<&str>, ctx: &EngineContext) -> Response<Full<Bytes>> {
    let Some(text) = body else {
        return error_response(StatusCode::UNPROCESSABLE_ENTITY, "missing request body");
    };
    match StubMapping::from_json(text) {
        Ok(mapping) => {
            ctx.notifier.notify(&format!(
                "registered stub mapping for {} {}",
                mapping.request.method,
                mapping
                    .request
                    .url
                    .as_deref()
                    .or(mapping.request.url_path.as_deref())
                    .unwrap_or("<any>")
            ));
            let rendered = json_body(&mapping);
            ctx.stubs.write().push(mapping);
            json_response(StatusCode::CREATED, rendered)
        }
        Err(e) => error_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            &format!("invalid stub mapping: {e}"),
        ),
    }
}

fn list_mappings(ctx: &EngineContext) -> Response<Full<Bytes>> {
    let stubs = ctx.stubs.read();
    let payload = json!({
        "mappings": &*stubs,
        "meta": { "total": stubs.len() },
    });
    json_response(StatusCode::OK, payload.to_string())
}

fn error_response(status: StatusCode, message: &str) -> Response<Full<Bytes>> {
    let payload = json!({ "errors": [{ "message": message }] });
    json_response(status, payload.to_string())
}

fn json_body<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
}

fn json_response(status: StatusCode, body: String) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header("content-type", "application/json")
        .body(Full::new(Bytes::from(body)))
        .unwrap_or_else(|_| Response::new(Full::new(Bytes::from("Internal Server Error"))))
}
