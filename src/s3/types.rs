//! Typed S3 inputs and outputs
//!
//! Input records carry the optional parameters of an operation; each set
//! field maps to exactly one query parameter or wire header. Output records
//! are filled by the response decoders. Field sets follow the AWS API
//! references for the corresponding operations.

use serde::{Deserialize, Serialize};

/// How the bucket is addressed in URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressingStyle {
    /// `https://{bucket}.{endpoint}/{key}` over TLS (AWS default)
    #[default]
    VirtualHosted,
    /// `http://{endpoint}/{bucket}/{key}` (MinIO and local testing)
    PathStyle,
}

// ListObjectsV2
// https://docs.aws.amazon.com/AmazonS3/latest/API/API_ListObjectsV2.html

/// Optional parameters for `list_objects`.
#[derive(Debug, Clone, Default)]
pub struct ListObjectsInput {
    /// HTTP query: `continuation-token`
    pub continuation_token: Option<String>,
    /// HTTP query: `delimiter`
    pub delimiter: Option<String>,
    /// HTTP query: `encoding-type`
    pub encoding_type: Option<String>,
    /// HTTP header: `x-amz-expected-bucket-owner`
    pub expected_bucket_owner: Option<String>,
    /// HTTP query: `fetch-owner`
    pub fetch_owner: Option<bool>,
    /// HTTP query: `max-keys` (default 1000; larger values are passed
    /// through, the server caps the response)
    pub max_keys: Option<i32>,
    /// HTTP query: `prefix`
    pub prefix: Option<String>,
    /// HTTP header: `x-amz-request-payer`
    pub request_payer: Option<String>,
    /// HTTP query: `start-after`
    pub start_after: Option<String>,
}

/// Owner of an object or bucket listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Owner {
    pub display_name: String,
    pub id: String,
}

/// Restore state reported inside `Contents`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestoreStatus {
    pub is_restore_in_progress: bool,
    pub restore_expiry_date: String,
}

/// One `Contents` entry of a `ListBucketResult`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Object {
    pub checksum_algorithm: String,
    pub checksum_type: String,
    pub etag: String,
    pub key: String,
    pub last_modified: String,
    pub owner: Owner,
    pub restore_status: RestoreStatus,
    pub size: i64,
    pub storage_class: String,
}

/// One `CommonPrefixes` entry: a pseudo-directory rolled up to the
/// delimiter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommonPrefix {
    pub prefix: String,
}

/// Decoded `ListBucketResult`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListObjectsResult {
    pub is_truncated: bool,
    pub marker: String,
    pub next_marker: String,
    pub contents: Vec<Object>,
    pub name: String,
    pub prefix: String,
    pub delimiter: String,
    pub max_keys: i32,
    pub common_prefixes: Vec<CommonPrefix>,
    pub encoding_type: String,
    pub key_count: i32,
    pub continuation_token: String,
    pub next_continuation_token: String,
    pub start_after: String,
}

// GetObject
// https://docs.aws.amazon.com/AmazonS3/latest/API/API_GetObject.html

/// Optional parameters for `get_object`.
#[derive(Debug, Clone, Default)]
pub struct GetObjectInput {
    /// HTTP header: `If-Match`
    pub if_match: Option<String>,
    /// HTTP header: `If-Modified-Since`
    pub if_modified_since: Option<String>,
    /// HTTP header: `If-None-Match`
    pub if_none_match: Option<String>,
    /// HTTP header: `If-Unmodified-Since`
    pub if_unmodified_since: Option<String>,
    /// HTTP header: `Range`, e.g. `bytes=0-9`
    pub range: Option<String>,
}

// PutObject
// https://docs.aws.amazon.com/AmazonS3/latest/API/API_PutObject.html

/// Optional parameters for `put_object`. The body itself is written raw.
#[derive(Debug, Clone, Default)]
pub struct PutObjectInput {
    /// HTTP header: `Cache-Control`
    pub cache_control: Option<String>,
    /// HTTP header: `Content-Disposition`
    pub content_disposition: Option<String>,
    /// HTTP header: `Content-Encoding`
    pub content_encoding: Option<String>,
    /// HTTP header: `Content-Language`
    pub content_language: Option<String>,
    /// HTTP header: `Content-Type`
    pub content_type: Option<String>,
    /// HTTP header: `Expires`
    pub expires: Option<String>,
    /// HTTP header: `If-Match`
    pub if_match: Option<String>,
    /// HTTP header: `If-None-Match`
    pub if_none_match: Option<String>,
    /// HTTP header: `x-amz-expected-bucket-owner`
    pub expected_bucket_owner: Option<String>,
    /// HTTP header: `x-amz-request-payer`
    pub request_payer: Option<String>,
    /// HTTP header: `x-amz-storage-class`
    pub storage_class: Option<String>,
    /// HTTP header: `x-amz-tagging` (URL-encoded tag set)
    pub tagging: Option<String>,
    /// HTTP header: `x-amz-website-redirect-location`
    pub website_redirect_location: Option<String>,
}

/// Result of `put_object`, decoded from response headers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PutObjectResult {
    pub etag: String,
    pub expiration: String,
    pub checksum_crc32: String,
    pub checksum_crc32c: String,
    pub checksum_crc64nvme: String,
    pub checksum_sha1: String,
    pub checksum_sha256: String,
    pub checksum_type: String,
    pub server_side_encryption: String,
    pub version_id: String,
    pub sse_customer_algorithm: String,
    pub sse_customer_key_md5: String,
    pub sse_kms_key_id: String,
    pub sse_kms_encryption_context: String,
    pub bucket_key_enabled: bool,
    pub size: i64,
    pub request_charged: String,
}

// DeleteObject
// https://docs.aws.amazon.com/AmazonS3/latest/API/API_DeleteObject.html

/// Optional parameters for `delete_object`.
#[derive(Debug, Clone, Default)]
pub struct DeleteObjectInput {
    /// HTTP query: `versionId`
    pub version_id: Option<String>,
    /// HTTP header: `x-amz-mfa`
    pub mfa: Option<String>,
    /// HTTP header: `x-amz-request-payer`
    pub request_payer: Option<String>,
    /// HTTP header: `x-amz-bypass-governance-retention`
    pub bypass_governance_retention: Option<bool>,
    /// HTTP header: `x-amz-expected-bucket-owner`
    pub expected_bucket_owner: Option<String>,
    /// HTTP header: `If-Match`
    pub if_match: Option<String>,
    /// HTTP header: `x-amz-if-match-last-modified-time`
    pub if_match_last_modified_time: Option<String>,
    /// HTTP header: `x-amz-if-match-size`
    pub if_match_size: Option<i64>,
}

/// Result of `delete_object`, decoded from response headers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteObjectResult {
    pub version_id: String,
    pub delete_marker: bool,
    pub request_charged: String,
}

// CreateBucket
// https://docs.aws.amazon.com/AmazonS3/latest/API/API_CreateBucket.html

/// One tag of a bucket tag set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tag {
    pub key: String,
    pub value: String,
}

/// `Bucket` sub-record of the create-bucket configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BucketInfo {
    /// `DataRedundancy` element
    pub data_redundancy: String,
    /// `Type` element
    pub type_: String,
}

/// `Location` sub-record of the create-bucket configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationInfo {
    /// `Name` element
    pub name: String,
    /// `Type` element
    pub type_: String,
}

/// XML request body of `create_bucket`; empty sub-records are omitted from
/// the serialized document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateBucketConfiguration {
    pub bucket: BucketInfo,
    pub location: LocationInfo,
    pub location_constraint: String,
    pub tags: Vec<Tag>,
}

/// Optional parameters for `create_bucket`.
#[derive(Debug, Clone, Default)]
pub struct CreateBucketInput {
    /// HTTP header: `x-amz-acl`
    pub acl: Option<String>,
    /// HTTP header: `x-amz-bucket-object-lock-enabled`
    pub object_lock_enabled_for_bucket: Option<bool>,
    /// HTTP header: `x-amz-grant-full-control`
    pub grant_full_control: Option<String>,
    /// HTTP header: `x-amz-grant-read`
    pub grant_read: Option<String>,
    /// HTTP header: `x-amz-grant-read-acp`
    pub grant_read_acp: Option<String>,
    /// HTTP header: `x-amz-grant-write`
    pub grant_write: Option<String>,
    /// HTTP header: `x-amz-grant-write-acp`
    pub grant_write_acp: Option<String>,
    /// HTTP header: `x-amz-object-ownership`
    pub object_ownership: Option<String>,
}

/// Result of `create_bucket`, decoded from response headers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateBucketResult {
    pub location: String,
    pub bucket_arn: String,
}

// DeleteBucket / HeadBucket

/// Optional parameters for `delete_bucket`.
#[derive(Debug, Clone, Default)]
pub struct DeleteBucketInput {
    /// HTTP header: `x-amz-expected-bucket-owner`
    pub expected_bucket_owner: Option<String>,
}

/// Optional parameters for `head_bucket`.
#[derive(Debug, Clone, Default)]
pub struct HeadBucketInput {
    /// HTTP header: `x-amz-expected-bucket-owner`
    pub expected_bucket_owner: Option<String>,
}

/// Result of `head_bucket`, decoded from response headers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeadBucketResult {
    pub bucket_arn: String,
    pub bucket_location_type: String,
    pub bucket_location_name: String,
    pub bucket_region: String,
    pub access_point_alias: String,
}

// HeadObject
// https://docs.aws.amazon.com/AmazonS3/latest/API/API_HeadObject.html

/// Optional parameters for `head_object`.
#[derive(Debug, Clone, Default)]
pub struct HeadObjectInput {
    /// HTTP query: `partNumber`
    pub part_number: Option<i32>,
    /// HTTP query: `versionId`
    pub version_id: Option<String>,
    /// HTTP query: `response-cache-control`
    pub response_cache_control: Option<String>,
    /// HTTP query: `response-content-disposition`
    pub response_content_disposition: Option<String>,
    /// HTTP query: `response-content-encoding`
    pub response_content_encoding: Option<String>,
    /// HTTP query: `response-content-language`
    pub response_content_language: Option<String>,
    /// HTTP query: `response-content-type`
    pub response_content_type: Option<String>,
    /// HTTP query: `response-expires`
    pub response_expires: Option<String>,
    /// HTTP header: `If-Match`
    pub if_match: Option<String>,
    /// HTTP header: `If-Modified-Since`
    pub if_modified_since: Option<String>,
    /// HTTP header: `If-None-Match`
    pub if_none_match: Option<String>,
    /// HTTP header: `If-Unmodified-Since`
    pub if_unmodified_since: Option<String>,
    /// HTTP header: `Range`
    pub range: Option<String>,
    /// HTTP header: `x-amz-checksum-mode`
    pub checksum_mode: Option<String>,
    /// HTTP header: `x-amz-expected-bucket-owner`
    pub expected_bucket_owner: Option<String>,
    /// HTTP header: `x-amz-request-payer`
    pub request_payer: Option<String>,
    /// HTTP header: `x-amz-server-side-encryption-customer-algorithm`
    pub sse_customer_algorithm: Option<String>,
    /// HTTP header: `x-amz-server-side-encryption-customer-key`
    pub sse_customer_key: Option<String>,
    /// HTTP header: `x-amz-server-side-encryption-customer-key-MD5`
    pub sse_customer_key_md5: Option<String>,
}

/// Result of `head_object`, decoded from response headers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeadObjectResult {
    pub delete_marker: bool,
    pub accept_ranges: String,
    pub expiration: String,
    pub restore: String,
    pub archive_status: String,
    pub last_modified: String,
    pub content_length: i64,
    pub checksum_crc32: String,
    pub checksum_crc32c: String,
    pub checksum_crc64nvme: String,
    pub checksum_sha1: String,
    pub checksum_sha256: String,
    pub checksum_type: String,
    pub etag: String,
    pub missing_meta: i32,
    pub version_id: String,
    pub cache_control: String,
    pub content_disposition: String,
    pub content_encoding: String,
    pub content_language: String,
    pub content_type: String,
    pub content_range: String,
    pub expires: String,
    pub website_redirect_location: String,
    pub server_side_encryption: String,
    pub sse_customer_algorithm: String,
    pub sse_customer_key_md5: String,
    pub sse_kms_key_id: String,
    pub bucket_key_enabled: bool,
    pub storage_class: String,
    pub request_charged: String,
    pub replication_status: String,
    pub parts_count: i32,
    pub tag_count: i32,
    pub object_lock_mode: String,
    pub object_lock_retain_until_date: String,
    pub object_lock_legal_hold_status: String,
}

// ListBuckets
// https://docs.aws.amazon.com/AmazonS3/latest/API/API_ListBuckets.html

/// One bucket of a `ListAllMyBucketsResult`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BucketSummary {
    pub name: String,
    pub creation_date: String,
    pub bucket_region: String,
}

/// Decoded `ListAllMyBucketsResult`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListBucketsResult {
    pub owner: Owner,
    pub buckets: Vec<BucketSummary>,
    pub prefix: String,
    pub continuation_token: String,
}
