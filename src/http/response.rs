//! HTTP response model

use crate::http::headers::Headers;
use bytes::Bytes;

/// Response from an executed request: status code, body bytes and headers.
///
/// The body is owned by the response; `Bytes` keeps large GET payloads
/// zero-copy when handed back to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    status: u16,
    body: Bytes,
    headers: Headers,
}

impl HttpResponse {
    pub fn new(status: u16, body: Bytes, headers: Headers) -> Self {
        Self {
            status,
            body,
            headers,
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn into_body(self) -> Bytes {
        self.body
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Convenience lookup, case-insensitive.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_redirect(&self) -> bool {
        (300..400).contains(&self.status)
    }

    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status)
    }

    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status)
    }
}
