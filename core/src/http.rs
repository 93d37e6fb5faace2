//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! These types describe HTTP requests and responses as plain data. The core
//! crate builds `HttpRequest` values and parses `HttpResponse` values without
//! ever touching the network; the host (`dia-client`, or a test harness)
//! executes the actual I/O.
//!
//! Every DIA call is a JSON `POST`, so the request carries no method field
//! and the body is always present.

/// Content type sent with every request.
pub const CONTENT_TYPE_JSON: &str = "application/json;charset=UTF-8";

/// An HTTP `POST` described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpRequest {
    pub(crate) fn json_post(url: String, body: String) -> Self {
        Self {
            url,
            headers: vec![("Content-Type".to_string(), CONTENT_TYPE_JSON.to_string())],
            body,
        }
    }
}

/// An HTTP response described as plain data.
///
/// The status is kept for diagnostics only: DIA signals success through the
/// `code` field of the JSON body, not through the HTTP status line.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}
