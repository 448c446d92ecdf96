use crate::AppState;
use crate::middleware::error_log::ErrorLogEntry;
use crate::middleware::request_errors::RequestErrors;
use crate::middleware::request_id::RequestIds;

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::time::{Instant, SystemTime};

use axum::body::Body;
use axum::Extension;
use axum::extract::{ConnectInfo, Request, State};
use axum::http::{HeaderMap, StatusCode};
use axum::middleware::Next;
use axum::response::Response;
use bytes::Bytes;
use http_body_util::BodyExt;
use rapid_log::context_from;
use serde_json::{Value, json};

/// Bodies are captured for logging up to this many bytes.
const MAX_BODY_CAPTURE: usize = 64 * 1024;

/// Request headers copied into error-log entries, wire name to logged name.
const ERROR_LOG_HEADERS: [(&str, &str); 4] = [
    ("content-type", "Content-Type"),
    ("authorization", "Authorization"),
    ("x-request-id", "X-Request-ID"),
    ("x-trace-id", "X-Trace-ID"),
];

/// Log the start and completion of every request through the dual-sink
/// logger, and append a compact `error.log` entry for 4xx/5xx responses.
///
/// Both bodies are read once and handed back untouched, so handlers and
/// clients see exactly what they would without this middleware.
pub async fn request_logger(
    State(state): State<AppState>,
    connect_info: Option<Extension<ConnectInfo<SocketAddr>>>,
    mut request: Request,
    next: Next,
) -> Response {
    let ids = request
        .extensions()
        .get::<RequestIds>()
        .cloned()
        .unwrap_or_default();
    let errors = RequestErrors::default();
    request.extensions_mut().insert(errors.clone());

    let method = request.method().to_string();
    let uri = request.uri().clone();
    let path = uri.path().to_string();
    let query = uri.query().unwrap_or("").to_string();
    let user_agent = header_value(request.headers(), "user-agent");
    let client_ip = client_ip(
        request.headers(),
        connect_info.map(|Extension(connect_info)| connect_info),
    );
    let whitelisted_headers = whitelisted_headers(request.headers());

    state.logger.info_with(
        "request started",
        context_from(json!({
            "request_id": ids.request_id,
            "trace_id": ids.trace_id,
            "method": method,
            "path": path,
            "client_ip": client_ip,
            "user_agent": user_agent,
        })),
    );

    let started = Instant::now();

    let (parts, body) = request.into_parts();
    let request_body = collect_body(body).await;
    let request = Request::from_parts(parts, Body::from(request_body.clone()));

    let response = next.run(request).await;

    let latency = started.elapsed();
    let status = response.status();

    let (parts, body) = response.into_parts();
    let response_body = collect_body(body).await;
    let response = Response::from_parts(parts, Body::from(response_body.clone()));

    let mut context = json!({
        "request_id": ids.request_id,
        "trace_id": ids.trace_id,
        "status_code": status.as_u16(),
        "latency": format!("{latency:?}"),
        "client_ip": client_ip,
        "method": method,
        "path": path,
        "query_params": query,
        "user_agent": user_agent,
        "request_body": captured(&request_body),
        "response_body": captured(&response_body),
    });
    if !errors.is_empty()
        && let Value::Object(map) = &mut context
    {
        map.insert(String::from("error"), Value::String(errors.joined()));
    }

    if status.is_server_error() {
        state
            .logger
            .error_with("request failed", context_from(context));
    } else if status.is_client_error() {
        state
            .logger
            .warn_with("request rejected", context_from(context));
    } else {
        state
            .logger
            .info_with("request completed", context_from(context));
    }

    if status.is_client_error() || status.is_server_error() {
        let entry = error_entry(
            &ids,
            status,
            &method,
            &path,
            &query,
            &client_ip,
            &user_agent,
            latency.as_millis() as u64,
            &errors,
            whitelisted_headers,
            &request_body,
            &response_body,
        );
        if let Err(e) = state.error_log.write(&entry) {
            state.logger.error(format!("error log write failed: {e}"));
        }
    }

    response
}

async fn collect_body(body: Body) -> Bytes {
    match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(_) => Bytes::new(),
    }
}

/// Body bytes as logged: size-capped, lossy UTF-8.
fn captured(bytes: &Bytes) -> String {
    let end = bytes.len().min(MAX_BODY_CAPTURE);
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}

#[allow(clippy::too_many_arguments)]
fn error_entry(
    ids: &RequestIds,
    status: StatusCode,
    method: &str,
    path: &str,
    query: &str,
    client_ip: &str,
    user_agent: &str,
    latency_ms: u64,
    errors: &RequestErrors,
    headers: BTreeMap<String, String>,
    request_body: &Bytes,
    response_body: &Bytes,
) -> ErrorLogEntry {
    ErrorLogEntry {
        t: humantime::format_rfc3339_millis(SystemTime::now()).to_string(),
        request_id: ids.request_id.clone(),
        trace_id: ids.trace_id.clone(),
        st: status.as_u16(),
        m: method.to_string(),
        p: path.to_string(),
        q: query.to_string(),
        ip: client_ip.to_string(),
        ua: user_agent.to_string(),
        l: latency_ms,
        e: errors.joined(),
        h: (!headers.is_empty()).then_some(headers),
        req: (!request_body.is_empty()).then(|| compact_json(request_body)),
        res: (!response_body.is_empty()).then(|| compact_json(response_body)),
    }
}

fn whitelisted_headers(headers: &HeaderMap) -> BTreeMap<String, String> {
    let mut out = BTreeMap::new();
    for (wire_name, logged_name) in ERROR_LOG_HEADERS {
        if let Some(value) = headers.get(wire_name).and_then(|v| v.to_str().ok()) {
            out.insert(logged_name.to_string(), value.to_string());
        }
    }
    out
}

/// Re-encode JSON bodies compactly; anything else is logged as-is.
fn compact_json(bytes: &Bytes) -> String {
    let end = bytes.len().min(MAX_BODY_CAPTURE);
    let capped = &bytes[..end];
    match serde_json::from_slice::<Value>(capped) {
        Ok(value) => serde_json::to_string(&value)
            .unwrap_or_else(|_| String::from_utf8_lossy(capped).into_owned()),
        Err(_) => String::from_utf8_lossy(capped).into_owned(),
    }
}

fn header_value(headers: &HeaderMap, name: &str) -> String {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string()
}

/// Client address resolution: proxy headers first, then the socket peer.
fn client_ip(headers: &HeaderMap, connect_info: Option<ConnectInfo<SocketAddr>>) -> String {
    if let Some(forwarded) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok())
        && let Some(first) = forwarded.split(',').next()
        && !first.trim().is_empty()
    {
        return first.trim().to_string();
    }

    if let Some(real_ip) = headers.get("x-real-ip").and_then(|v| v.to_str().ok())
        && !real_ip.is_empty()
    {
        return real_ip.to_string();
    }

    match connect_info {
        Some(ConnectInfo(addr)) => addr.ip().to_string(),
        None => String::from(rapid_log::UNKNOWN_ID),
    }
}
