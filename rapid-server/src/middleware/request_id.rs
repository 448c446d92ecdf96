use axum::extract::Request;
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";
pub const TRACE_ID_HEADER: &str = "x-trace-id";

/// Correlation IDs carried by one in-flight request. The trace ID mirrors
/// the request ID until a distributed tracer takes over the field.
#[derive(Debug, Clone)]
pub struct RequestIds {
    pub request_id: String,
    pub trace_id: String,
}

impl Default for RequestIds {
    fn default() -> Self {
        Self {
            request_id: String::from(rapid_log::UNKNOWN_ID),
            trace_id: String::from(rapid_log::UNKNOWN_ID),
        }
    }
}

/// Outermost middleware: generate an ID pair, stash it in the request
/// extensions for everything downstream, and mirror it into the response
/// headers for the client.
pub async fn request_id(mut request: Request, next: Next) -> Response {
    let id = Uuid::new_v4().to_string();
    let ids = RequestIds {
        request_id: id.clone(),
        trace_id: id,
    };
    request.extensions_mut().insert(ids.clone());

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&ids.request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    if let Ok(value) = HeaderValue::from_str(&ids.trace_id) {
        response.headers_mut().insert(TRACE_ID_HEADER, value);
    }

    response
}
