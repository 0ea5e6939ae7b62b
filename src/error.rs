//! Error types shared across the crate

use std::fmt;
use thiserror::Error;

/// Structured S3 error record.
///
/// Populated from an XML `<Error>` body, or synthesized from response
/// headers for HEAD requests (which carry no body).
/// https://docs.aws.amazon.com/AmazonS3/latest/API/ErrorResponses.html
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorResponse {
    /// Machine-readable error code (e.g. `NoSuchBucket`, `NoSuchKey`)
    pub code: String,
    /// Human-readable description
    pub message: String,
    /// The bucket or object the error relates to
    pub resource: String,
    /// Request ID assigned by the server
    pub request_id: String,
    /// Bucket name, when the server includes it
    pub bucket_name: String,
    /// Host that handled the request, when the server includes it
    pub host_id: String,
}

impl ErrorResponse {
    /// The well-known error code, when recognized.
    pub fn error_code(&self) -> ErrorCode {
        ErrorCode::from_code(&self.code)
    }
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)?;
        if !self.resource.is_empty() {
            write!(f, " (resource: {})", self.resource)?;
        }
        if !self.request_id.is_empty() {
            write!(f, " (request id: {})", self.request_id)?;
        }
        Ok(())
    }
}

/// Well-known S3 error codes callers commonly branch on. Everything else
/// is carried verbatim in `ErrorResponse::code`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorCode {
    AccessDenied,
    BucketAlreadyExists,
    BucketAlreadyOwnedByYou,
    BucketNotEmpty,
    InvalidBucketName,
    NoSuchBucket,
    NoSuchKey,
    /// A code outside the well-known set
    Other,
}

impl ErrorCode {
    pub fn from_code(code: &str) -> Self {
        match code {
            "AccessDenied" => Self::AccessDenied,
            "BucketAlreadyExists" => Self::BucketAlreadyExists,
            "BucketAlreadyOwnedByYou" => Self::BucketAlreadyOwnedByYou,
            "BucketNotEmpty" => Self::BucketNotEmpty,
            "InvalidBucketName" => Self::InvalidBucketName,
            "NoSuchBucket" => Self::NoSuchBucket,
            "NoSuchKey" => Self::NoSuchKey,
            _ => Self::Other,
        }
    }
}

/// Errors returned by every client operation
#[derive(Debug, Error)]
pub enum S3Error {
    /// Non-2xx response with an S3 XML error body, or a 2xx response whose
    /// body decodes to an `<Error>` document anyway
    #[error("server error: {0}")]
    Server(ErrorResponse),

    /// Non-2xx HEAD response; HEAD carries no body, so the error is
    /// synthesized from response headers
    #[error("head request failed: {0}")]
    Head(ErrorResponse),

    /// Malformed XML, an unknown tag in a strict context, or a numeric or
    /// boolean conversion failure
    #[error("decode error: {0}")]
    Decode(String),

    /// HTTP transport failure, including timeouts and connection errors
    #[error("transport error: {0}")]
    Transport(String),
}

pub type Result<T> = std::result::Result<T, S3Error>;
