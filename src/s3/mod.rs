//! S3 protocol implementation
//!
//! This module provides:
//! - AWS Signature Version 4 signing
//! - A streaming XML parser producing dotted-path leaf records
//! - Response decoders for XML bodies and header-only results
//! - The per-operation client facade and the list paginator

pub mod client;
pub mod decode;
pub mod paginator;
pub mod signer;
pub mod types;
pub mod xml;

pub use client::S3Client;
pub use paginator::ListObjectsPaginator;
pub use signer::Signer;
pub use types::{
    AddressingStyle, BucketSummary, CommonPrefix, CreateBucketConfiguration, CreateBucketInput,
    CreateBucketResult, DeleteBucketInput, DeleteObjectInput, DeleteObjectResult, GetObjectInput,
    HeadBucketInput, HeadBucketResult, HeadObjectInput, HeadObjectResult, ListBucketsResult,
    ListObjectsInput, ListObjectsResult, Object, Owner, PutObjectInput, PutObjectResult,
};
pub use xml::XmlNode;
