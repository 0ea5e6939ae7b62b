//! S3 client facade
//!
//! One method per S3 operation. Each call builds the operation URL for the
//! configured addressing style, maps the typed input onto query parameters
//! and headers, signs the request, executes it, and decodes the response
//! into a typed result or a structured error.

use crate::config::{Credentials, Profile};
use crate::error::{ErrorResponse, Result, S3Error};
use crate::http::{HttpClient, HttpResponse, SignableRequest};
use crate::s3::decode;
use crate::s3::signer::{self, Signer, EMPTY_PAYLOAD_SHA256};
use crate::s3::types::{
    AddressingStyle, CreateBucketConfiguration, CreateBucketInput, CreateBucketResult,
    DeleteBucketInput, DeleteObjectInput, DeleteObjectResult, GetObjectInput, HeadBucketInput,
    HeadBucketResult, HeadObjectInput, HeadObjectResult, ListBucketsResult, ListObjectsInput,
    ListObjectsResult, PutObjectInput, PutObjectResult,
};
use crate::s3::xml::{self, XmlNode};
use bytes::Bytes;
use std::borrow::Cow;
use std::fmt::Write as _;

/// Hex lookup table for URI encoding
static HEX_UPPER: &[u8; 16] = b"0123456789ABCDEF";

/// S3 client over one endpoint and one set of credentials.
///
/// Exclusively owned: the HTTP connection pool lives and dies with the
/// client, and the type is deliberately not `Clone`. Operations happen in
/// program order; there is no internal request multiplexing.
pub struct S3Client {
    http: HttpClient,
    signer: Signer,
    endpoint: String,
    addressing_style: AddressingStyle,
}

impl S3Client {
    /// Client against AWS itself: `s3.{region}.amazonaws.com`,
    /// virtual-hosted addressing.
    pub fn new(credentials: Credentials) -> Self {
        let endpoint = format!("s3.{}.amazonaws.com", credentials.region);
        Self {
            http: HttpClient::new(),
            signer: Signer::new(credentials),
            endpoint,
            addressing_style: AddressingStyle::VirtualHosted,
        }
    }

    /// Client against a custom endpoint (MinIO, local testing).
    pub fn with_endpoint(
        credentials: Credentials,
        endpoint: impl Into<String>,
        addressing_style: AddressingStyle,
    ) -> Self {
        Self {
            http: HttpClient::new(),
            signer: Signer::new(credentials),
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            addressing_style,
        }
    }

    /// Client from a configuration profile.
    pub fn from_profile(profile: &Profile) -> Self {
        match &profile.endpoint {
            Some(endpoint) => Self::with_endpoint(
                profile.credentials(),
                endpoint.clone(),
                profile.addressing_style,
            ),
            None => Self::new(profile.credentials()),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn addressing_style(&self) -> AddressingStyle {
        self.addressing_style
    }

    /// List objects in a bucket (ListObjectsV2).
    ///
    /// `max_keys` above 1000 is passed through unchanged; the server caps
    /// the page. Pagination is opt-in: the caller (or the paginator) echoes
    /// `next_continuation_token` into the next call.
    pub async fn list_objects(
        &self,
        bucket: &str,
        input: &ListObjectsInput,
    ) -> Result<ListObjectsResult> {
        let mut url = format!("{}/?list-type=2", self.bucket_url(bucket));
        if let Some(prefix) = &input.prefix {
            url.push_str("&prefix=");
            url_encode_into(&mut url, prefix);
        }
        let max_keys = input.max_keys.unwrap_or(1000);
        let _ = write!(url, "&max-keys={max_keys}");
        if let Some(token) = &input.continuation_token {
            url.push_str("&continuation-token=");
            url_encode_into(&mut url, token);
        }
        if let Some(delimiter) = &input.delimiter {
            url.push_str("&delimiter=");
            url_encode_into(&mut url, delimiter);
        }
        if let Some(encoding_type) = &input.encoding_type {
            url.push_str("&encoding-type=");
            url_encode_into(&mut url, encoding_type);
        }
        if let Some(start_after) = &input.start_after {
            url.push_str("&start-after=");
            url_encode_into(&mut url, start_after);
        }
        if input.fetch_owner == Some(true) {
            url.push_str("&fetch-owner=true");
        }

        let mut req = self.http.get(url);
        if let Some(owner) = &input.expected_bucket_owner {
            req = req.header("x-amz-expected-bucket-owner", owner);
        }
        if let Some(payer) = &input.request_payer {
            req = req.header("x-amz-request-payer", payer);
        }
        self.sign(&mut req, self.host_header(bucket), EMPTY_PAYLOAD_SHA256);

        let res = req.execute().await?;
        tracing::debug!(bucket, status = res.status(), "list_objects");

        let nodes = parse_body(&res)?;
        if res.is_ok() {
            decode::decode_list_objects(&nodes)
        } else {
            Err(S3Error::Server(decode::decode_error(&nodes)))
        }
    }

    /// Fetch an object. Returns the raw body bytes on success.
    pub async fn get_object(
        &self,
        bucket: &str,
        key: &str,
        input: &GetObjectInput,
    ) -> Result<Bytes> {
        let url = self.object_url(bucket, key);

        let mut req = self.http.get(url);
        if let Some(range) = &input.range {
            req = req.header("Range", range);
        }
        if let Some(if_match) = &input.if_match {
            req = req.header("If-Match", if_match);
        }
        if let Some(if_none_match) = &input.if_none_match {
            req = req.header("If-None-Match", if_none_match);
        }
        if let Some(if_modified_since) = &input.if_modified_since {
            req = req.header("If-Modified-Since", if_modified_since);
        }
        if let Some(if_unmodified_since) = &input.if_unmodified_since {
            req = req.header("If-Unmodified-Since", if_unmodified_since);
        }
        self.sign(&mut req, self.host_header(bucket), EMPTY_PAYLOAD_SHA256);

        let res = req.execute().await?;
        tracing::debug!(bucket, key, status = res.status(), "get_object");

        if res.is_ok() {
            return Ok(res.into_body());
        }
        Err(S3Error::Server(decode::decode_error(&parse_body(&res)?)))
    }

    /// Store an object. The body is written raw; its SHA-256 becomes the
    /// signed payload hash.
    pub async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: impl Into<Bytes>,
        input: &PutObjectInput,
    ) -> Result<PutObjectResult> {
        let url = self.object_url(bucket, key);
        let body = body.into();
        let payload_hash = signer::sha256_hex(&body);

        let mut req = self.http.put(url).body(body);
        let content_type = input.content_type.as_deref().unwrap_or("application/octet-stream");
        req = req.header("Content-Type", content_type);
        if let Some(cache_control) = &input.cache_control {
            req = req.header("Cache-Control", cache_control);
        }
        if let Some(content_disposition) = &input.content_disposition {
            req = req.header("Content-Disposition", content_disposition);
        }
        if let Some(content_encoding) = &input.content_encoding {
            req = req.header("Content-Encoding", content_encoding);
        }
        if let Some(content_language) = &input.content_language {
            req = req.header("Content-Language", content_language);
        }
        if let Some(expires) = &input.expires {
            req = req.header("Expires", expires);
        }
        if let Some(if_match) = &input.if_match {
            req = req.header("If-Match", if_match);
        }
        if let Some(if_none_match) = &input.if_none_match {
            req = req.header("If-None-Match", if_none_match);
        }
        if let Some(owner) = &input.expected_bucket_owner {
            req = req.header("x-amz-expected-bucket-owner", owner);
        }
        if let Some(payer) = &input.request_payer {
            req = req.header("x-amz-request-payer", payer);
        }
        if let Some(storage_class) = &input.storage_class {
            req = req.header("x-amz-storage-class", storage_class);
        }
        if let Some(tagging) = &input.tagging {
            req = req.header("x-amz-tagging", tagging);
        }
        if let Some(redirect) = &input.website_redirect_location {
            req = req.header("x-amz-website-redirect-location", redirect);
        }
        self.sign(&mut req, self.host_header(bucket), &payload_hash);

        let res = req.execute().await?;
        tracing::debug!(bucket, key, status = res.status(), "put_object");

        if res.is_ok() {
            return decode::decode_put_object(res.headers());
        }
        Err(S3Error::Server(decode::decode_error(&parse_body(&res)?)))
    }

    /// Delete an object (or a specific version).
    pub async fn delete_object(
        &self,
        bucket: &str,
        key: &str,
        input: &DeleteObjectInput,
    ) -> Result<DeleteObjectResult> {
        let mut url = self.object_url(bucket, key);
        if let Some(version_id) = &input.version_id {
            url.push_str("?versionId=");
            url_encode_into(&mut url, version_id);
        }

        let mut req = self.http.delete(url);
        if let Some(mfa) = &input.mfa {
            req = req.header("x-amz-mfa", mfa);
        }
        if let Some(payer) = &input.request_payer {
            req = req.header("x-amz-request-payer", payer);
        }
        if let Some(bypass) = input.bypass_governance_retention {
            req = req.header(
                "x-amz-bypass-governance-retention",
                if bypass { "true" } else { "false" },
            );
        }
        if let Some(owner) = &input.expected_bucket_owner {
            req = req.header("x-amz-expected-bucket-owner", owner);
        }
        if let Some(if_match) = &input.if_match {
            req = req.header("If-Match", if_match);
        }
        if let Some(last_modified) = &input.if_match_last_modified_time {
            req = req.header("x-amz-if-match-last-modified-time", last_modified);
        }
        if let Some(size) = input.if_match_size {
            req = req.header("x-amz-if-match-size", size.to_string());
        }
        self.sign(&mut req, self.host_header(bucket), EMPTY_PAYLOAD_SHA256);

        let res = req.execute().await?;
        tracing::debug!(bucket, key, status = res.status(), "delete_object");

        if res.is_ok() {
            return decode::decode_delete_object(res.headers());
        }
        Err(S3Error::Server(decode::decode_error(&parse_body(&res)?)))
    }

    /// Create a bucket. The configuration record becomes the XML request
    /// body; empty sub-records are omitted.
    pub async fn create_bucket(
        &self,
        bucket: &str,
        configuration: &CreateBucketConfiguration,
        input: &CreateBucketInput,
    ) -> Result<CreateBucketResult> {
        let url = self.bucket_url(bucket);
        let body = create_bucket_body(configuration);
        let payload_hash = signer::sha256_hex(body.as_bytes());

        let mut req = self
            .http
            .put(url)
            .header("Content-Type", "application/xml")
            .body(body.into_bytes());
        if let Some(acl) = &input.acl {
            req = req.header("x-amz-acl", acl);
        }
        if let Some(grant) = &input.grant_full_control {
            req = req.header("x-amz-grant-full-control", grant);
        }
        if let Some(grant) = &input.grant_read {
            req = req.header("x-amz-grant-read", grant);
        }
        if let Some(grant) = &input.grant_read_acp {
            req = req.header("x-amz-grant-read-acp", grant);
        }
        if let Some(grant) = &input.grant_write {
            req = req.header("x-amz-grant-write", grant);
        }
        if let Some(grant) = &input.grant_write_acp {
            req = req.header("x-amz-grant-write-acp", grant);
        }
        if let Some(lock) = input.object_lock_enabled_for_bucket {
            req = req.header(
                "x-amz-bucket-object-lock-enabled",
                if lock { "true" } else { "false" },
            );
        }
        if let Some(ownership) = &input.object_ownership {
            req = req.header("x-amz-object-ownership", ownership);
        }
        self.sign(&mut req, self.host_header(bucket), &payload_hash);

        let res = req.execute().await?;
        tracing::debug!(bucket, status = res.status(), "create_bucket");

        if res.is_ok() {
            return Ok(decode::decode_create_bucket(res.headers()));
        }
        Err(S3Error::Server(decode::decode_error(&parse_body(&res)?)))
    }

    /// Delete a bucket. Success is exactly HTTP 204.
    pub async fn delete_bucket(&self, bucket: &str, input: &DeleteBucketInput) -> Result<()> {
        let url = self.bucket_url(bucket);

        let mut req = self.http.delete(url);
        if let Some(owner) = &input.expected_bucket_owner {
            req = req.header("x-amz-expected-bucket-owner", owner);
        }
        self.sign(&mut req, self.host_header(bucket), EMPTY_PAYLOAD_SHA256);

        let res = req.execute().await?;
        tracing::debug!(bucket, status = res.status(), "delete_bucket");

        if res.status() == 204 {
            return Ok(());
        }
        Err(S3Error::Server(decode::decode_error(&parse_body(&res)?)))
    }

    /// Check bucket existence and permissions.
    ///
    /// HEAD responses carry no body, so failures are synthesized from the
    /// error headers MinIO and AWS set.
    pub async fn head_bucket(
        &self,
        bucket: &str,
        input: &HeadBucketInput,
    ) -> Result<HeadBucketResult> {
        let url = self.bucket_url(bucket);

        let mut req = self.http.head(url);
        if let Some(owner) = &input.expected_bucket_owner {
            req = req.header("x-amz-expected-bucket-owner", owner);
        }
        self.sign(&mut req, self.host_header(bucket), EMPTY_PAYLOAD_SHA256);

        let res = req.execute().await?;
        tracing::debug!(bucket, status = res.status(), "head_bucket");

        if res.status() == 200 {
            return Ok(decode::decode_head_bucket(res.headers()));
        }
        Err(S3Error::Head(head_error(&res)))
    }

    /// Fetch object metadata without the body.
    pub async fn head_object(
        &self,
        bucket: &str,
        key: &str,
        input: &HeadObjectInput,
    ) -> Result<HeadObjectResult> {
        let mut url = self.object_url(bucket, key);

        let mut first = true;
        let mut push_param = |url: &mut String, name: &str, value: &str| {
            url.push(if first { '?' } else { '&' });
            first = false;
            url.push_str(name);
            url.push('=');
            url_encode_into(url, value);
        };
        if let Some(part_number) = input.part_number {
            push_param(&mut url, "partNumber", &part_number.to_string());
        }
        if let Some(version_id) = &input.version_id {
            push_param(&mut url, "versionId", version_id);
        }
        if let Some(value) = &input.response_cache_control {
            push_param(&mut url, "response-cache-control", value);
        }
        if let Some(value) = &input.response_content_disposition {
            push_param(&mut url, "response-content-disposition", value);
        }
        if let Some(value) = &input.response_content_encoding {
            push_param(&mut url, "response-content-encoding", value);
        }
        if let Some(value) = &input.response_content_language {
            push_param(&mut url, "response-content-language", value);
        }
        if let Some(value) = &input.response_content_type {
            push_param(&mut url, "response-content-type", value);
        }
        if let Some(value) = &input.response_expires {
            push_param(&mut url, "response-expires", value);
        }

        let mut req = self.http.head(url);
        if let Some(if_match) = &input.if_match {
            req = req.header("If-Match", if_match);
        }
        if let Some(if_modified_since) = &input.if_modified_since {
            req = req.header("If-Modified-Since", if_modified_since);
        }
        if let Some(if_none_match) = &input.if_none_match {
            req = req.header("If-None-Match", if_none_match);
        }
        if let Some(if_unmodified_since) = &input.if_unmodified_since {
            req = req.header("If-Unmodified-Since", if_unmodified_since);
        }
        if let Some(range) = &input.range {
            req = req.header("Range", range);
        }
        if let Some(mode) = &input.checksum_mode {
            req = req.header("x-amz-checksum-mode", mode);
        }
        if let Some(owner) = &input.expected_bucket_owner {
            req = req.header("x-amz-expected-bucket-owner", owner);
        }
        if let Some(payer) = &input.request_payer {
            req = req.header("x-amz-request-payer", payer);
        }
        if let Some(algorithm) = &input.sse_customer_algorithm {
            req = req.header("x-amz-server-side-encryption-customer-algorithm", algorithm);
        }
        if let Some(sse_key) = &input.sse_customer_key {
            req = req.header("x-amz-server-side-encryption-customer-key", sse_key);
        }
        if let Some(md5) = &input.sse_customer_key_md5 {
            req = req.header("x-amz-server-side-encryption-customer-key-MD5", md5);
        }
        self.sign(&mut req, self.host_header(bucket), EMPTY_PAYLOAD_SHA256);

        let res = req.execute().await?;
        tracing::debug!(bucket, key, status = res.status(), "head_object");

        if res.status() == 200 {
            return decode::decode_head_object(res.headers());
        }
        Err(S3Error::Head(head_error(&res)))
    }

    /// List all buckets owned by the authenticated sender.
    pub async fn list_buckets(&self) -> Result<ListBucketsResult> {
        let url = match self.addressing_style {
            AddressingStyle::VirtualHosted => format!("https://{}/", self.endpoint),
            AddressingStyle::PathStyle => format!("http://{}/", self.endpoint),
        };

        let mut req = self.http.get(url);
        self.sign(&mut req, self.endpoint.clone(), EMPTY_PAYLOAD_SHA256);

        let res = req.execute().await?;
        tracing::debug!(status = res.status(), "list_buckets");

        let nodes = parse_body(&res)?;
        if res.is_ok() {
            decode::decode_list_buckets(&nodes)
        } else {
            Err(S3Error::Server(decode::decode_error(&nodes)))
        }
    }

    /// Set the signing preconditions and sign.
    fn sign<R: SignableRequest>(&self, req: &mut R, host: String, payload_hash: &str) {
        req.headers_mut().insert("Host", host);
        req.headers_mut().insert("X-Amz-Date", signer::timestamp());
        req.headers_mut()
            .insert("X-Amz-Content-Sha256", payload_hash);
        self.signer.sign(req);
    }

    /// Base URL for a bucket, per addressing style.
    fn bucket_url(&self, bucket: &str) -> String {
        match self.addressing_style {
            AddressingStyle::VirtualHosted => format!("https://{}.{}", bucket, self.endpoint),
            AddressingStyle::PathStyle => format!("http://{}/{}", self.endpoint, bucket),
        }
    }

    /// URL for an object, key percent-encoded with `/` preserved.
    fn object_url(&self, bucket: &str, key: &str) -> String {
        let base = self.bucket_url(bucket);
        let encoded_key = encode_key(key);
        let mut url = String::with_capacity(base.len() + 1 + encoded_key.len());
        url.push_str(&base);
        url.push('/');
        url.push_str(&encoded_key);
        url
    }

    /// Host header value implied by the addressing style.
    fn host_header(&self, bucket: &str) -> String {
        match self.addressing_style {
            AddressingStyle::VirtualHosted => format!("{}.{}", bucket, self.endpoint),
            AddressingStyle::PathStyle => self.endpoint.clone(),
        }
    }
}

/// Parse a response body as UTF-8 XML into its leaf sequence.
fn parse_body(res: &HttpResponse) -> Result<Vec<XmlNode>> {
    let text = std::str::from_utf8(res.body())
        .map_err(|e| S3Error::Decode(format!("response body is not UTF-8: {e}")))?;
    xml::parse(text)
}

/// Synthesize an error record from HEAD response headers.
fn head_error(res: &HttpResponse) -> ErrorResponse {
    let mut error = ErrorResponse::default();
    if let Some(code) = res.header("X-Minio-Error-Code") {
        error.code = code.to_string();
        if let Some(desc) = res.header("X-Minio-Error-Desc") {
            error.message = desc.to_string();
        }
    } else if let Some(code) = res.header("x-amz-error-code") {
        error.code = code.to_string();
        if let Some(message) = res.header("x-amz-error-message") {
            error.message = message.to_string();
        }
    } else {
        error.code = "UnknownError".to_string();
        error.message = format!("HTTP {}", res.status());
    }
    error
}

/// Serialize a `CreateBucketConfiguration` into its XML request body,
/// omitting empty sub-records.
fn create_bucket_body(configuration: &CreateBucketConfiguration) -> String {
    let mut xml = String::with_capacity(256);
    xml.push_str(r#"<CreateBucketConfiguration xmlns="http://s3.amazonaws.com/doc/2006-03-01/">"#);
    if !configuration.location_constraint.is_empty() {
        xml.push_str("<LocationConstraint>");
        xml_escape_into(&mut xml, &configuration.location_constraint);
        xml.push_str("</LocationConstraint>");
    }
    if !configuration.location.name.is_empty() || !configuration.location.type_.is_empty() {
        xml.push_str("<Location>");
        if !configuration.location.name.is_empty() {
            xml.push_str("<Name>");
            xml_escape_into(&mut xml, &configuration.location.name);
            xml.push_str("</Name>");
        }
        if !configuration.location.type_.is_empty() {
            xml.push_str("<Type>");
            xml_escape_into(&mut xml, &configuration.location.type_);
            xml.push_str("</Type>");
        }
        xml.push_str("</Location>");
    }
    if !configuration.bucket.data_redundancy.is_empty() || !configuration.bucket.type_.is_empty() {
        xml.push_str("<Bucket>");
        if !configuration.bucket.data_redundancy.is_empty() {
            xml.push_str("<DataRedundancy>");
            xml_escape_into(&mut xml, &configuration.bucket.data_redundancy);
            xml.push_str("</DataRedundancy>");
        }
        if !configuration.bucket.type_.is_empty() {
            xml.push_str("<Type>");
            xml_escape_into(&mut xml, &configuration.bucket.type_);
            xml.push_str("</Type>");
        }
        xml.push_str("</Bucket>");
    }
    if !configuration.tags.is_empty() {
        xml.push_str("<Tags>");
        for tag in &configuration.tags {
            xml.push_str("<Tag><Key>");
            xml_escape_into(&mut xml, &tag.key);
            xml.push_str("</Key><Value>");
            xml_escape_into(&mut xml, &tag.value);
            xml.push_str("</Value></Tag>");
        }
        xml.push_str("</Tags>");
    }
    xml.push_str("</CreateBucketConfiguration>");
    xml
}

/// Encode an object key, preserving forward slashes.
/// Returns borrowed when no encoding is needed (the common case).
fn encode_key(key: &str) -> Cow<'_, str> {
    let needs_encoding = key.bytes().any(|b| {
        !matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' | b'/')
    });

    if !needs_encoding {
        return Cow::Borrowed(key);
    }

    let mut result = String::with_capacity(key.len() + 32);
    for byte in key.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' | b'/' => {
                result.push(byte as char);
            }
            _ => {
                result.push('%');
                result.push(HEX_UPPER[(byte >> 4) as usize] as char);
                result.push(HEX_UPPER[(byte & 0xf) as usize] as char);
            }
        }
    }
    Cow::Owned(result)
}

/// Percent-encode a query parameter value directly into the URL buffer.
fn url_encode_into(buf: &mut String, s: &str) {
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                buf.push(byte as char);
            }
            _ => {
                buf.push('%');
                buf.push(HEX_UPPER[(byte >> 4) as usize] as char);
                buf.push(HEX_UPPER[(byte & 0xf) as usize] as char);
            }
        }
    }
}

/// Escape XML special characters into an existing buffer.
fn xml_escape_into(buf: &mut String, s: &str) {
    for ch in s.chars() {
        match ch {
            '&' => buf.push_str("&amp;"),
            '<' => buf.push_str("&lt;"),
            '>' => buf.push_str("&gt;"),
            '"' => buf.push_str("&quot;"),
            '\'' => buf.push_str("&apos;"),
            _ => buf.push(ch),
        }
    }
}
