//! s3lite - S3-compatible object storage client with AWS SigV4 signing
//!
//! A small client for Amazon S3 and S3-compatible services (MinIO). The
//! crate centers on three pieces: a byte-exact SigV4 signer, a streaming
//! XML parser that flattens response documents into dotted-path leaves,
//! and decoders that fold those leaves (or response headers) into typed
//! results.

pub mod cli;
pub mod config;
pub mod error;
pub mod http;
pub mod s3;

pub use config::{Config, Credentials, Profile};
pub use error::{ErrorCode, ErrorResponse, Result, S3Error};
pub use s3::{AddressingStyle, ListObjectsPaginator, S3Client};
