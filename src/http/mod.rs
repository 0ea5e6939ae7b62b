//! Typed HTTP request/response model
//!
//! This module provides:
//! - An ordered, case-insensitive header container (the ordering is part of
//!   the SigV4 contract)
//! - Fluent request builders over a shared hyper client
//! - A response type with status-range predicates

pub mod client;
pub mod headers;
pub mod response;

pub use client::{HttpBodyRequest, HttpClient, HttpRequest};
pub use headers::Headers;
pub use response::HttpResponse;

use hyper::Method;

/// Surface the signer needs from a request: method, URL and mutable access
/// to the header map. Implemented by both the no-body and body-capable
/// builders so one `sign` covers them.
pub trait SignableRequest {
    fn method(&self) -> &Method;
    fn url(&self) -> &str;
    fn headers(&self) -> &Headers;
    fn headers_mut(&mut self) -> &mut Headers;
}
