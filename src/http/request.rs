//! Request handling.
//!
//! # Responsibilities
//! - Generate unique request ID (UUID v4)
//! - Extract domain/culture signals from query string and headers
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - Extraction only copies values; it never decides anything

use axum::http::{HeaderMap, HeaderValue, Request, Uri};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

use crate::culture::Signals;

/// Header carrying the request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Generates a UUID v4 request ID for requests that arrive without one.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Copy query parameters and headers into [`Signals`].
///
/// The query string is form-urlencoded; a repeated key keeps its first value.
/// Header values that are not visible ASCII are skipped.
pub fn extract_signals(uri: &Uri, headers: &HeaderMap) -> Signals {
    let mut signals = Signals::new();

    if let Some(query) = uri.query() {
        for (name, value) in url::form_urlencoded::parse(query.as_bytes()) {
            signals.insert_query(name, value);
        }
    }

    for (name, value) in headers {
        if let Ok(value) = value.to_str() {
            signals.insert_header(name.as_str(), value);
        }
    }

    signals
}
