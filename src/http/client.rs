//! HTTP client and fluent request builders
//!
//! The client owns a single hyper client with a tuned connection pool and
//! hands out request builders tied to its lifetime. GET/HEAD requests have
//! no body; POST/PUT/DELETE are body-capable. Requests are plain values and
//! may be executed repeatedly; each execution is independent.

use crate::error::S3Error;
use crate::http::headers::Headers;
use crate::http::response::HttpResponse;
use crate::http::SignableRequest;
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::{Method, Request};
use hyper_tls::HttpsConnector;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client as HyperClient;
use hyper_util::rt::TokioExecutor;
use native_tls::TlsConnector;
use std::time::Duration;

const USER_AGENT: &str = concat!("s3lite/", env!("CARGO_PKG_VERSION"));

/// HTTP client wrapping a hyper connection pool.
///
/// Exclusively owned by its user; moving it transfers the pool. HTTP/1.1
/// only, TCP_NODELAY, 10s connect timeout, 90s keepalive.
pub struct HttpClient {
    client: HyperClient<HttpsConnector<HttpConnector>, Full<Bytes>>,
}

impl HttpClient {
    pub fn new() -> Self {
        let mut http = HttpConnector::new();
        http.set_nodelay(true);
        http.enforce_http(false);
        http.set_connect_timeout(Some(Duration::from_secs(10)));
        http.set_keepalive(Some(Duration::from_secs(90)));

        let tls = TlsConnector::new().expect("failed to build TLS connector");
        let https = HttpsConnector::from((http, tls.into()));

        let client = HyperClient::builder(TokioExecutor::new())
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(32)
            .set_host(false)
            .build(https);

        Self { client }
    }

    /// Start a GET request (no body).
    pub fn get(&self, url: impl Into<String>) -> HttpRequest<'_> {
        HttpRequest::new(self, url.into(), Method::GET)
    }

    /// Start a HEAD request (no body).
    pub fn head(&self, url: impl Into<String>) -> HttpRequest<'_> {
        HttpRequest::new(self, url.into(), Method::HEAD)
    }

    /// Start a POST request (body-capable).
    pub fn post(&self, url: impl Into<String>) -> HttpBodyRequest<'_> {
        HttpBodyRequest::new(self, url.into(), Method::POST)
    }

    /// Start a PUT request (body-capable).
    pub fn put(&self, url: impl Into<String>) -> HttpBodyRequest<'_> {
        HttpBodyRequest::new(self, url.into(), Method::PUT)
    }

    /// Start a DELETE request (body-capable, usually empty).
    pub fn delete(&self, url: impl Into<String>) -> HttpBodyRequest<'_> {
        HttpBodyRequest::new(self, url.into(), Method::DELETE)
    }

    async fn dispatch(
        &self,
        method: Method,
        url: &str,
        headers: &Headers,
        body: Bytes,
        timeout: Duration,
    ) -> Result<HttpResponse, S3Error> {
        let mut builder = Request::builder().method(method).uri(url);
        let mut has_user_agent = false;
        for (name, value) in headers.iter() {
            // An empty value is a deletion signal: the header is suppressed
            // from the wire entirely.
            if value.is_empty() {
                continue;
            }
            if name.eq_ignore_ascii_case("user-agent") {
                has_user_agent = true;
            }
            builder = builder.header(name, value);
        }
        if !has_user_agent {
            builder = builder.header("User-Agent", USER_AGENT);
        }

        let request = builder
            .body(Full::new(body))
            .map_err(|e| S3Error::Transport(format!("request build error: {e}")))?;

        let pending = self.client.request(request);
        let response = if timeout.is_zero() {
            pending
                .await
                .map_err(|e| S3Error::Transport(format!("request failed: {e}")))?
        } else {
            tokio::time::timeout(timeout, pending)
                .await
                .map_err(|_| {
                    S3Error::Transport(format!("request timed out after {}s", timeout.as_secs()))
                })?
                .map_err(|e| S3Error::Transport(format!("request failed: {e}")))?
        };

        let status = response.status().as_u16();
        let mut response_headers = Headers::new();
        for (name, value) in response.headers() {
            if let Ok(value) = value.to_str() {
                response_headers.insert(name.as_str(), value);
            }
        }

        let body = response
            .into_body()
            .collect()
            .await
            .map_err(|e| S3Error::Transport(format!("body read error: {e}")))?
            .to_bytes();

        Ok(HttpResponse::new(status, body, response_headers))
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

/// GET/HEAD request builder.
pub struct HttpRequest<'a> {
    client: &'a HttpClient,
    url: String,
    method: Method,
    headers: Headers,
    timeout: Duration,
}

impl<'a> HttpRequest<'a> {
    fn new(client: &'a HttpClient, url: String, method: Method) -> Self {
        Self {
            client,
            url,
            method,
            headers: Headers::new(),
            timeout: Duration::ZERO,
        }
    }

    /// Set (or overwrite) a header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Per-request timeout; zero means no timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout_secs(self, seconds: u64) -> Self {
        self.timeout(Duration::from_secs(seconds))
    }

    pub async fn execute(&self) -> Result<HttpResponse, S3Error> {
        self.client
            .dispatch(
                self.method.clone(),
                &self.url,
                &self.headers,
                Bytes::new(),
                self.timeout,
            )
            .await
    }
}

impl SignableRequest for HttpRequest<'_> {
    fn method(&self) -> &Method {
        &self.method
    }

    fn url(&self) -> &str {
        &self.url
    }

    fn headers(&self) -> &Headers {
        &self.headers
    }

    fn headers_mut(&mut self) -> &mut Headers {
        &mut self.headers
    }
}

/// POST/PUT/DELETE request builder.
pub struct HttpBodyRequest<'a> {
    client: &'a HttpClient,
    url: String,
    method: Method,
    headers: Headers,
    timeout: Duration,
    body: Bytes,
}

impl<'a> HttpBodyRequest<'a> {
    fn new(client: &'a HttpClient, url: String, method: Method) -> Self {
        Self {
            client,
            url,
            method,
            headers: Headers::new(),
            timeout: Duration::ZERO,
            body: Bytes::new(),
        }
    }

    /// Set (or overwrite) a header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Per-request timeout; zero means no timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout_secs(self, seconds: u64) -> Self {
        self.timeout(Duration::from_secs(seconds))
    }

    /// Set the request body.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub async fn execute(&self) -> Result<HttpResponse, S3Error> {
        self.client
            .dispatch(
                self.method.clone(),
                &self.url,
                &self.headers,
                self.body.clone(),
                self.timeout,
            )
            .await
    }
}

impl SignableRequest for HttpBodyRequest<'_> {
    fn method(&self) -> &Method {
        &self.method
    }

    fn url(&self) -> &str {
        &self.url
    }

    fn headers(&self) -> &Headers {
        &self.headers
    }

    fn headers_mut(&mut self) -> &mut Headers {
        &mut self.headers
    }
}
