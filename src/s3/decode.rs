//! Response decoders
//!
//! Two families: XML-body decoders consume the parser's flat leaf sequence
//! and rebuild typed results, and header-based decoders dispatch on
//! response header names.
//!
//! Repeated XML containers (`Contents`, `CommonPrefixes`, `Buckets.Bucket`)
//! arrive as runs of identical dotted paths. The decoder keeps a set of
//! paths already assigned into the current element; seeing a path again
//! means the server started the next repetition, so a fresh element is
//! appended and the set cleared. This relies on the server emitting all
//! fields of one repetition before beginning the next, which S3 does.

use crate::error::{ErrorResponse, S3Error};
use crate::http::Headers;
use crate::s3::types::{
    BucketSummary, CommonPrefix, CreateBucketResult, DeleteObjectResult, HeadBucketResult,
    HeadObjectResult, ListBucketsResult, ListObjectsResult, Object, PutObjectResult,
};
use crate::s3::xml::{parse_bool, parse_int, XmlNode};

/// Decode a `ListBucketResult` leaf sequence.
///
/// Unknown tags under `ListBucketResult.*` are a hard error, except that a
/// path starting `Error.` aborts into the error decoder (a server-side
/// error detected late, after the HTTP status already said 2xx).
pub fn decode_list_objects(nodes: &[XmlNode]) -> Result<ListObjectsResult, S3Error> {
    let mut result = ListObjectsResult::default();
    result.contents.push(Object::default());
    result.common_prefixes.push(CommonPrefix::default());

    let mut contents_idx = 0usize;
    let mut prefixes_idx = 0usize;
    let mut seen_contents: Vec<&str> = Vec::new();
    let mut seen_prefixes: Vec<&str> = Vec::new();

    for node in nodes {
        let path = node.path.as_str();

        if path.starts_with("ListBucketResult.Contents.") {
            if seen_contents.contains(&path) {
                result.contents.push(Object::default());
                seen_contents.clear();
                contents_idx += 1;
            }
        } else if path.starts_with("ListBucketResult.CommonPrefixes.") {
            if seen_prefixes.contains(&path) {
                result.common_prefixes.push(CommonPrefix::default());
                seen_prefixes.clear();
                prefixes_idx += 1;
            }
        }

        let value = node.value.clone();
        match path {
            "ListBucketResult.IsTruncated" => result.is_truncated = parse_bool(&value)?,
            "ListBucketResult.Marker" => result.marker = value,
            "ListBucketResult.NextMarker" => result.next_marker = value,
            "ListBucketResult.Name" => result.name = value,
            "ListBucketResult.Prefix" => result.prefix = value,
            "ListBucketResult.Delimiter" => result.delimiter = value,
            "ListBucketResult.MaxKeys" => result.max_keys = parse_int(&value)?,
            "ListBucketResult.EncodingType" => result.encoding_type = value,
            "ListBucketResult.KeyCount" => result.key_count = parse_int(&value)?,
            "ListBucketResult.ContinuationToken" => result.continuation_token = value,
            "ListBucketResult.NextContinuationToken" => result.next_continuation_token = value,
            "ListBucketResult.StartAfter" => result.start_after = value,
            "ListBucketResult.Contents.ChecksumAlgorithm" => {
                result.contents[contents_idx].checksum_algorithm = value
            }
            "ListBucketResult.Contents.ChecksumType" => {
                result.contents[contents_idx].checksum_type = value
            }
            "ListBucketResult.Contents.ETag" => result.contents[contents_idx].etag = value,
            "ListBucketResult.Contents.Key" => result.contents[contents_idx].key = value,
            "ListBucketResult.Contents.LastModified" => {
                result.contents[contents_idx].last_modified = value
            }
            "ListBucketResult.Contents.Owner.DisplayName" => {
                result.contents[contents_idx].owner.display_name = value
            }
            "ListBucketResult.Contents.Owner.ID" => result.contents[contents_idx].owner.id = value,
            "ListBucketResult.Contents.RestoreStatus.IsRestoreInProgress" => {
                result.contents[contents_idx]
                    .restore_status
                    .is_restore_in_progress = parse_bool(&value)?
            }
            "ListBucketResult.Contents.RestoreStatus.RestoreExpiryDate" => {
                result.contents[contents_idx]
                    .restore_status
                    .restore_expiry_date = value
            }
            "ListBucketResult.Contents.Size" => {
                result.contents[contents_idx].size = parse_int(&value)?
            }
            "ListBucketResult.Contents.StorageClass" => {
                result.contents[contents_idx].storage_class = value
            }
            "ListBucketResult.CommonPrefixes.Prefix" => {
                result.common_prefixes[prefixes_idx].prefix = value
            }
            _ if path.starts_with("Error.") => {
                return Err(S3Error::Server(decode_error(nodes)));
            }
            other => {
                return Err(S3Error::Decode(format!(
                    "no case for ListBucketResult tag: {other}"
                )));
            }
        }

        if path.starts_with("ListBucketResult.Contents.") {
            seen_contents.push(path);
        } else if path.starts_with("ListBucketResult.CommonPrefixes.") {
            seen_prefixes.push(path);
        }
    }

    // Drop the pre-allocated first element when no repetition filled it
    if result.contents.first().is_some_and(|o| o.key.is_empty()) {
        result.contents.remove(0);
    }
    if result
        .common_prefixes
        .first()
        .is_some_and(|p| p.prefix.is_empty())
    {
        result.common_prefixes.remove(0);
    }

    Ok(result)
}

/// Decode a `ListAllMyBucketsResult` leaf sequence.
pub fn decode_list_buckets(nodes: &[XmlNode]) -> Result<ListBucketsResult, S3Error> {
    let mut result = ListBucketsResult::default();
    result.buckets.push(BucketSummary::default());

    let mut bucket_idx = 0usize;
    let mut seen_buckets: Vec<&str> = Vec::new();

    for node in nodes {
        let path = node.path.as_str();

        if path.starts_with("ListAllMyBucketsResult.Buckets.Bucket.")
            && seen_buckets.contains(&path)
        {
            result.buckets.push(BucketSummary::default());
            seen_buckets.clear();
            bucket_idx += 1;
        }

        let value = node.value.clone();
        match path {
            "ListAllMyBucketsResult.Owner.ID" => result.owner.id = value,
            "ListAllMyBucketsResult.Owner.DisplayName" => result.owner.display_name = value,
            "ListAllMyBucketsResult.Prefix" => result.prefix = value,
            "ListAllMyBucketsResult.ContinuationToken" => result.continuation_token = value,
            "ListAllMyBucketsResult.Buckets.Bucket.Name" => result.buckets[bucket_idx].name = value,
            "ListAllMyBucketsResult.Buckets.Bucket.CreationDate" => {
                result.buckets[bucket_idx].creation_date = value
            }
            "ListAllMyBucketsResult.Buckets.Bucket.BucketRegion" => {
                result.buckets[bucket_idx].bucket_region = value
            }
            _ if path.starts_with("Error.") => {
                return Err(S3Error::Server(decode_error(nodes)));
            }
            other => {
                return Err(S3Error::Decode(format!(
                    "no case for ListAllMyBucketsResult tag: {other}"
                )));
            }
        }

        if path.starts_with("ListAllMyBucketsResult.Buckets.Bucket.") {
            seen_buckets.push(path);
        }
    }

    if result.buckets.first().is_some_and(|b| b.name.is_empty()) {
        result.buckets.remove(0);
    }

    Ok(result)
}

/// Decode a generic `Error` document. Unknown `Error.*` tags are ignored
/// for forward compatibility.
pub fn decode_error(nodes: &[XmlNode]) -> ErrorResponse {
    let mut error = ErrorResponse::default();

    for node in nodes {
        let value = node.value.clone();
        match node.path.as_str() {
            "Error.Code" => error.code = value,
            "Error.Message" => error.message = value,
            "Error.Resource" => error.resource = value,
            "Error.RequestId" => error.request_id = value,
            "Error.BucketName" => error.bucket_name = value,
            "Error.HostId" => error.host_id = value,
            _ => continue,
        }
    }

    error
}

/// Decode `put_object` response headers. Unrecognized headers are ignored.
pub fn decode_put_object(headers: &Headers) -> Result<PutObjectResult, S3Error> {
    let mut result = PutObjectResult::default();

    for (name, value) in headers.iter() {
        let value = value.to_string();
        match name.to_ascii_lowercase().as_str() {
            "etag" => result.etag = value,
            "x-amz-expiration" => result.expiration = value,
            "x-amz-checksum-crc32" => result.checksum_crc32 = value,
            "x-amz-checksum-crc32c" => result.checksum_crc32c = value,
            "x-amz-checksum-crc64nvme" => result.checksum_crc64nvme = value,
            "x-amz-checksum-sha1" => result.checksum_sha1 = value,
            "x-amz-checksum-sha256" => result.checksum_sha256 = value,
            "x-amz-checksum-type" => result.checksum_type = value,
            "x-amz-server-side-encryption" => result.server_side_encryption = value,
            "x-amz-version-id" => result.version_id = value,
            "x-amz-server-side-encryption-customer-algorithm" => {
                result.sse_customer_algorithm = value
            }
            "x-amz-server-side-encryption-customer-key-md5" => result.sse_customer_key_md5 = value,
            "x-amz-server-side-encryption-aws-kms-key-id" => result.sse_kms_key_id = value,
            "x-amz-server-side-encryption-context" => result.sse_kms_encryption_context = value,
            "x-amz-server-side-encryption-bucket-key-enabled" => {
                result.bucket_key_enabled = parse_bool(&value)?
            }
            "x-amz-object-size" => result.size = parse_int(&value)?,
            "x-amz-request-charged" => result.request_charged = value,
            _ => continue,
        }
    }

    Ok(result)
}

/// Decode `delete_object` response headers.
pub fn decode_delete_object(headers: &Headers) -> Result<DeleteObjectResult, S3Error> {
    let mut result = DeleteObjectResult::default();

    for (name, value) in headers.iter() {
        let value = value.to_string();
        match name.to_ascii_lowercase().as_str() {
            "x-amz-version-id" => result.version_id = value,
            "x-amz-delete-marker" => result.delete_marker = parse_bool(&value)?,
            "x-amz-request-charged" => result.request_charged = value,
            _ => continue,
        }
    }

    Ok(result)
}

/// Decode `create_bucket` response headers.
pub fn decode_create_bucket(headers: &Headers) -> CreateBucketResult {
    let mut result = CreateBucketResult::default();

    for (name, value) in headers.iter() {
        let value = value.to_string();
        match name.to_ascii_lowercase().as_str() {
            "location" => result.location = value,
            "x-amz-bucket-arn" => result.bucket_arn = value,
            _ => continue,
        }
    }

    result
}

/// Decode `head_bucket` response headers.
pub fn decode_head_bucket(headers: &Headers) -> HeadBucketResult {
    let mut result = HeadBucketResult::default();

    for (name, value) in headers.iter() {
        let value = value.to_string();
        match name.to_ascii_lowercase().as_str() {
            "x-amz-bucket-arn" => result.bucket_arn = value,
            "x-amz-bucket-location-type" => result.bucket_location_type = value,
            "x-amz-bucket-location-name" => result.bucket_location_name = value,
            "x-amz-bucket-region" => result.bucket_region = value,
            "x-amz-access-point-alias" => result.access_point_alias = value,
            _ => continue,
        }
    }

    result
}

/// Decode `head_object` response headers.
pub fn decode_head_object(headers: &Headers) -> Result<HeadObjectResult, S3Error> {
    let mut result = HeadObjectResult::default();

    for (name, value) in headers.iter() {
        let value = value.to_string();
        match name.to_ascii_lowercase().as_str() {
            "x-amz-delete-marker" => result.delete_marker = parse_bool(&value)?,
            "accept-ranges" => result.accept_ranges = value,
            "x-amz-expiration" => result.expiration = value,
            "x-amz-restore" => result.restore = value,
            "x-amz-archive-status" => result.archive_status = value,
            "last-modified" => result.last_modified = value,
            "content-length" => result.content_length = parse_int(&value)?,
            "x-amz-checksum-crc32" => result.checksum_crc32 = value,
            "x-amz-checksum-crc32c" => result.checksum_crc32c = value,
            "x-amz-checksum-crc64nvme" => result.checksum_crc64nvme = value,
            "x-amz-checksum-sha1" => result.checksum_sha1 = value,
            "x-amz-checksum-sha256" => result.checksum_sha256 = value,
            "x-amz-checksum-type" => result.checksum_type = value,
            "etag" => result.etag = value,
            "x-amz-missing-meta" => result.missing_meta = parse_int(&value)?,
            "x-amz-version-id" => result.version_id = value,
            "cache-control" => result.cache_control = value,
            "content-disposition" => result.content_disposition = value,
            "content-encoding" => result.content_encoding = value,
            "content-language" => result.content_language = value,
            "content-type" => result.content_type = value,
            "content-range" => result.content_range = value,
            "expires" => result.expires = value,
            "x-amz-website-redirect-location" => result.website_redirect_location = value,
            "x-amz-server-side-encryption" => result.server_side_encryption = value,
            "x-amz-server-side-encryption-customer-algorithm" => {
                result.sse_customer_algorithm = value
            }
            "x-amz-server-side-encryption-customer-key-md5" => result.sse_customer_key_md5 = value,
            "x-amz-server-side-encryption-aws-kms-key-id" => result.sse_kms_key_id = value,
            "x-amz-server-side-encryption-bucket-key-enabled" => {
                result.bucket_key_enabled = parse_bool(&value)?
            }
            "x-amz-storage-class" => result.storage_class = value,
            "x-amz-request-charged" => result.request_charged = value,
            "x-amz-replication-status" => result.replication_status = value,
            "x-amz-mp-parts-count" => result.parts_count = parse_int(&value)?,
            "x-amz-tagging-count" => result.tag_count = parse_int(&value)?,
            "x-amz-object-lock-mode" => result.object_lock_mode = value,
            "x-amz-object-lock-retain-until-date" => result.object_lock_retain_until_date = value,
            "x-amz-object-lock-legal-hold" => result.object_lock_legal_hold_status = value,
            _ => continue,
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::s3::xml;

    #[test]
    fn test_decode_error_ignores_unknown_tags() {
        let nodes = xml::parse(
            "<Error><Code>NoSuchKey</Code><Message>The specified key does not exist.</Message>\
             <Key>photo.jpg</Key><RequestId>4442587FB7D0A2F9</RequestId></Error>",
        )
        .unwrap();
        let error = decode_error(&nodes);

        assert_eq!(error.code, "NoSuchKey");
        assert_eq!(error.message, "The specified key does not exist.");
        assert_eq!(error.request_id, "4442587FB7D0A2F9");
        assert!(error.resource.is_empty());
    }

    #[test]
    fn test_decode_list_objects_unknown_tag_is_hard_error() {
        let nodes = vec![XmlNode {
            path: "ListBucketResult.Bogus".to_string(),
            value: "x".to_string(),
        }];
        assert!(matches!(
            decode_list_objects(&nodes),
            Err(S3Error::Decode(_))
        ));
    }

    #[test]
    fn test_decode_list_objects_error_fallback() {
        let nodes = vec![
            XmlNode {
                path: "Error.Code".to_string(),
                value: "NoSuchBucket".to_string(),
            },
            XmlNode {
                path: "Error.Message".to_string(),
                value: "The specified bucket does not exist".to_string(),
            },
        ];
        match decode_list_objects(&nodes) {
            Err(S3Error::Server(error)) => assert_eq!(error.code, "NoSuchBucket"),
            other => panic!("expected server error, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_put_object_headers() {
        let mut headers = Headers::new();
        headers.insert("ETag", "\"9b2cf535f27731c974343645a3985328\"");
        headers.insert("x-amz-version-id", "3HL4kqtJlcpXroDTDmjVBH40Nrjfkd");
        headers.insert("X-Amz-Server-Side-Encryption", "AES256");
        headers.insert("Date", "Thu, 01 Jan 2026 00:00:00 GMT");

        let result = decode_put_object(&headers).unwrap();
        assert_eq!(result.etag, "\"9b2cf535f27731c974343645a3985328\"");
        assert_eq!(result.version_id, "3HL4kqtJlcpXroDTDmjVBH40Nrjfkd");
        assert_eq!(result.server_side_encryption, "AES256");
    }

    #[test]
    fn test_decode_head_object_numeric_headers() {
        let mut headers = Headers::new();
        headers.insert("Content-Length", "3191");
        headers.insert("Content-Type", "image/jpeg");
        headers.insert("x-amz-mp-parts-count", "4");

        let result = decode_head_object(&headers).unwrap();
        assert_eq!(result.content_length, 3191);
        assert_eq!(result.content_type, "image/jpeg");
        assert_eq!(result.parts_count, 4);
    }

    #[test]
    fn test_decode_head_object_bad_number() {
        let mut headers = Headers::new();
        headers.insert("Content-Length", "not-a-number");
        assert!(decode_head_object(&headers).is_err());
    }
}
