//! AWS Signature Version 4 signer
//!
//! Canonicalizes a request into the byte-exact form both sides hash,
//! derives a per-request signing key through the chained-HMAC ladder, and
//! attaches the resulting `Authorization` header.
//!
//! The caller must have populated `Host`, `X-Amz-Date` (ISO 8601 basic,
//! `YYYYMMDDThhmmssZ`) and `X-Amz-Content-Sha256` before signing; given
//! those, signing cannot fail. Missing preconditions are programming
//! errors and are debug-asserted.

use crate::config::Credentials;
use crate::http::{Headers, SignableRequest};
use chrono::Utc;
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use std::sync::Mutex;

type HmacSha256 = Hmac<Sha256>;

/// Hex lookup table for percent encoding
static HEX_UPPER: &[u8; 16] = b"0123456789ABCDEF";

/// SHA-256 of the empty payload; callers put this in `X-Amz-Content-Sha256`
/// for body-less requests.
pub const EMPTY_PAYLOAD_SHA256: &str =
    "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

/// SigV4 signer bound to one set of credentials.
///
/// The signing key only changes with the UTC date, so the derived key is
/// cached per `YYYYMMDD` stamp.
pub struct Signer {
    access_key: String,
    region: String,
    service: &'static str,
    /// Pre-computed "AWS4" + secret_key bytes
    aws4_key: Vec<u8>,
    /// (date_stamp, derived key) of the last derivation
    cached_signing_key: Mutex<Option<(String, [u8; 32])>>,
}

impl Signer {
    pub fn new(credentials: Credentials) -> Self {
        let aws4_key = format!("AWS4{}", credentials.secret_key).into_bytes();
        Self {
            access_key: credentials.access_key,
            region: credentials.region,
            service: "s3",
            aws4_key,
            cached_signing_key: Mutex::new(None),
        }
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    /// Sign the request in place, adding the `Authorization` header.
    ///
    /// Repeated signing of the same request with the same `X-Amz-Date` is
    /// deterministic: the header value is bit-identical across calls.
    pub fn sign<R: SignableRequest>(&self, req: &mut R) {
        debug_assert!(
            req.headers().contains("Host"),
            "request must carry a Host header before signing"
        );
        debug_assert!(
            req.headers().contains("X-Amz-Date"),
            "request must carry an X-Amz-Date header before signing"
        );
        debug_assert!(
            req.headers().contains("X-Amz-Content-Sha256"),
            "request must carry an X-Amz-Content-Sha256 header before signing"
        );

        let canonical_request = self.canonical_request(req);
        tracing::trace!(canonical = %canonical_request, "sigv4 canonical request");

        let amz_date = req.headers().get("X-Amz-Date").unwrap_or("").to_string();
        let date_stamp = &amz_date[..8.min(amz_date.len())];

        let credential_scope = format!(
            "{}/{}/{}/aws4_request",
            date_stamp, self.region, self.service
        );
        let hashed_request = sha256_hex(canonical_request.as_bytes());
        let string_to_sign = format!(
            "AWS4-HMAC-SHA256\n{}\n{}\n{}",
            amz_date, credential_scope, hashed_request
        );

        let signature = self.calculate_signature(date_stamp, &string_to_sign);
        let signed_headers = signed_headers(req.headers());

        let authorization = format!(
            "AWS4-HMAC-SHA256 Credential={}/{}, SignedHeaders={}, Signature={}",
            self.access_key, credential_scope, signed_headers, signature
        );
        req.headers_mut().insert("Authorization", authorization);
    }

    /// Build the canonical request string for the given request.
    ///
    /// Public so the exact byte form can be asserted in tests.
    pub fn canonical_request<R: SignableRequest>(&self, req: &R) -> String {
        let (path, query) = split_url(req.url());
        let canonical_query = canonical_query_string(query);
        let canonical_headers = canonical_headers(req.headers());
        let signed_headers = signed_headers(req.headers());
        let payload_hash = req.headers().get("X-Amz-Content-Sha256").unwrap_or("");

        format!(
            "{}\n{}\n{}\n{}\n{}\n{}",
            req.method().as_str(),
            path,
            canonical_query,
            canonical_headers,
            signed_headers,
            payload_hash
        )
    }

    /// Compute the signature for a string-to-sign, reusing the cached
    /// signing key when the date has not changed.
    fn calculate_signature(&self, date_stamp: &str, string_to_sign: &str) -> String {
        let signing_key = {
            let mut cache = self.cached_signing_key.lock().unwrap();
            match &*cache {
                Some((cached_date, cached_key)) if cached_date == date_stamp => *cached_key,
                _ => {
                    let key = self.derive_signing_key(date_stamp);
                    *cache = Some((date_stamp.to_string(), key));
                    key
                }
            }
        };

        hex::encode(hmac_sha256(&signing_key, string_to_sign.as_bytes()))
    }

    /// Derive the signing key: four chained HMAC operations over date,
    /// region, service and the terminator.
    fn derive_signing_key(&self, date_stamp: &str) -> [u8; 32] {
        let k_date = hmac_sha256(&self.aws4_key, date_stamp.as_bytes());
        let k_region = hmac_sha256(&k_date, self.region.as_bytes());
        let k_service = hmac_sha256(&k_region, self.service.as_bytes());
        hmac_sha256(&k_service, b"aws4_request")
    }
}

/// Current UTC time in ISO 8601 basic form, whole seconds.
pub fn timestamp() -> String {
    Utc::now().format("%Y%m%dT%H%M%SZ").to_string()
}

/// Lowercase hex SHA-256 digest.
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// HMAC-SHA256 into a fixed-size array.
pub fn hmac_sha256(key: &[u8], msg: &[u8]) -> [u8; 32] {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts keys of any size");
    mac.update(msg);
    let mut output = [0u8; 32];
    output.copy_from_slice(&mac.finalize().into_bytes());
    output
}

/// Split a URL into (path, query), dropping scheme and authority.
///
/// The path starts at the first `/` after the authority; an absent path is
/// `/`. Virtual-hosted `amazonaws.com` URLs fall out of the same rule: the
/// bucket lives in the authority, so the path is everything after it.
fn split_url(url: &str) -> (&str, &str) {
    let after_scheme = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);

    let path_and_query = match after_scheme.find('/') {
        Some(pos) => &after_scheme[pos..],
        None => "/",
    };

    match path_and_query.find('?') {
        Some(pos) => (&path_and_query[..pos], &path_and_query[pos + 1..]),
        None => (path_and_query, ""),
    }
}

/// Canonical headers: `lowercase-name:value\n` for every header, in the
/// map's case-insensitive ascending order.
fn canonical_headers(headers: &Headers) -> String {
    let mut result = String::with_capacity(headers.len() * 64);
    for (name, value) in headers.iter() {
        for byte in name.bytes() {
            result.push(byte.to_ascii_lowercase() as char);
        }
        result.push(':');
        result.push_str(value.trim());
        result.push('\n');
    }
    result
}

/// Signed headers: the `;`-joined lowercased names in the same order.
fn signed_headers(headers: &Headers) -> String {
    let mut result = String::with_capacity(headers.len() * 20);
    let mut first = true;
    for (name, _) in headers.iter() {
        if !first {
            result.push(';');
        }
        for byte in name.bytes() {
            result.push(byte.to_ascii_lowercase() as char);
        }
        first = false;
    }
    result
}

/// Canonical query string: parameters sorted by name, keys and values in
/// RFC 3986 form.
///
/// Fast path: when every byte is already canonical, parameters are sorted
/// and each has an `=`, the query is returned verbatim. Otherwise each
/// pair is decoded and re-encoded before sorting.
fn canonical_query_string(query: &str) -> String {
    if query.is_empty() {
        return String::new();
    }

    let all_canonical = query.bytes().all(|b| {
        matches!(b,
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9'
            | b'-' | b'_' | b'.' | b'~'
            | b'=' | b'&' | b'%'
        )
    });

    if all_canonical {
        let mut sorted = true;
        let mut all_have_equals = true;
        let mut last_key = "";
        for pair in query.split('&') {
            let key = match pair.find('=') {
                Some(pos) => &pair[..pos],
                None => {
                    all_have_equals = false;
                    pair
                }
            };
            if key < last_key {
                sorted = false;
                break;
            }
            last_key = key;
        }
        if sorted && all_have_equals {
            return query.to_string();
        }
    }

    let mut params: Vec<(String, String)> = Vec::new();
    for pair in query.split('&') {
        if let Some(pos) = pair.find('=') {
            let key = &pair[..pos];
            let value = &pair[pos + 1..];
            let decoded_key = urlencoding::decode(key).unwrap_or_else(|_| key.into());
            let decoded_value = urlencoding::decode(value).unwrap_or_else(|_| value.into());
            params.push((
                uri_encode(&decoded_key, true),
                uri_encode(&decoded_value, true),
            ));
        } else {
            let decoded = urlencoding::decode(pair).unwrap_or_else(|_| pair.into());
            params.push((uri_encode(&decoded, true), String::new()));
        }
    }

    params.sort_unstable_by(|a, b| a.0.cmp(&b.0));

    params
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}

/// RFC 3986 percent-encode via the hex lookup table.
pub(crate) fn uri_encode(s: &str, encode_slash: bool) -> String {
    let mut result = String::with_capacity(s.len() + 16);
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                result.push(byte as char);
            }
            b'/' if !encode_slash => {
                result.push('/');
            }
            _ => {
                result.push('%');
                result.push(HEX_UPPER[(byte >> 4) as usize] as char);
                result.push(HEX_UPPER[(byte & 0xf) as usize] as char);
            }
        }
    }
    result
}
