use s3lite::s3::decode::{decode_error, decode_list_buckets, decode_list_objects};
use s3lite::s3::xml::parse;
use s3lite::S3Error;
use std::fmt::Write as _;

#[test]
fn test_decode_list_objects_full_page() {
    let body = "<ListBucketResult>\
        <Name>my-bucket</Name>\
        <Prefix>photos/</Prefix>\
        <KeyCount>2</KeyCount>\
        <MaxKeys>1000</MaxKeys>\
        <Delimiter>/</Delimiter>\
        <IsTruncated>false</IsTruncated>\
        <Contents>\
            <Key>photos/2026/january.jpg</Key>\
            <LastModified>2026-01-31T09:12:00.000Z</LastModified>\
            <ETag>&#34;70ee1738b6b21e2c8a43f3a5ab0eee71&#34;</ETag>\
            <Size>414075</Size>\
            <StorageClass>STANDARD</StorageClass>\
        </Contents>\
        <Contents>\
            <Key>photos/2026/march.jpg</Key>\
            <LastModified>2026-03-02T11:45:21.000Z</LastModified>\
            <ETag>&#34;9c8af9a76df052144598c115ef33b45c&#34;</ETag>\
            <Size>502</Size>\
            <StorageClass>STANDARD</StorageClass>\
        </Contents>\
        <CommonPrefixes><Prefix>photos/2026/</Prefix></CommonPrefixes>\
        <CommonPrefixes><Prefix>photos/2027/</Prefix></CommonPrefixes>\
        </ListBucketResult>";

    let result = decode_list_objects(&parse(body).unwrap()).unwrap();

    assert_eq!(result.name, "my-bucket");
    assert_eq!(result.prefix, "photos/");
    assert_eq!(result.delimiter, "/");
    assert_eq!(result.key_count, 2);
    assert_eq!(result.max_keys, 1000);
    assert!(!result.is_truncated);

    assert_eq!(result.contents.len(), 2);
    assert_eq!(result.contents[0].key, "photos/2026/january.jpg");
    assert_eq!(result.contents[0].size, 414075);
    assert_eq!(result.contents[0].etag, "\"70ee1738b6b21e2c8a43f3a5ab0eee71\"");
    assert_eq!(result.contents[1].key, "photos/2026/march.jpg");
    assert_eq!(result.contents[1].size, 502);

    assert_eq!(result.common_prefixes.len(), 2);
    assert_eq!(result.common_prefixes[0].prefix, "photos/2026/");
    assert_eq!(result.common_prefixes[1].prefix, "photos/2027/");
}

#[test]
fn test_decode_list_objects_with_owner() {
    let body = "<ListBucketResult>\
        <Name>b</Name>\
        <KeyCount>1</KeyCount>\
        <Contents>\
            <Key>a.txt</Key>\
            <Size>10</Size>\
            <Owner><ID>02d6176db174dc93</ID><DisplayName>minio</DisplayName></Owner>\
        </Contents>\
        </ListBucketResult>";

    let result = decode_list_objects(&parse(body).unwrap()).unwrap();
    assert_eq!(result.contents.len(), 1);
    assert_eq!(result.contents[0].owner.id, "02d6176db174dc93");
    assert_eq!(result.contents[0].owner.display_name, "minio");
}

/// Empty listing: the pre-allocated placeholder is removed
#[test]
fn test_decode_list_objects_empty_page() {
    let body = "<ListBucketResult>\
        <Name>empty-bucket</Name>\
        <KeyCount>0</KeyCount>\
        <MaxKeys>1000</MaxKeys>\
        <IsTruncated>false</IsTruncated>\
        </ListBucketResult>";

    let result = decode_list_objects(&parse(body).unwrap()).unwrap();
    assert!(result.contents.is_empty());
    assert!(result.common_prefixes.is_empty());
    assert_eq!(result.key_count, 0);
}

#[test]
fn test_decode_truncated_page_carries_token() {
    let body = "<ListBucketResult>\
        <Name>b</Name>\
        <KeyCount>1</KeyCount>\
        <IsTruncated>true</IsTruncated>\
        <NextContinuationToken>1ueGcxLPRx1Tr</NextContinuationToken>\
        <Contents><Key>a.txt</Key><Size>1</Size></Contents>\
        </ListBucketResult>";

    let result = decode_list_objects(&parse(body).unwrap()).unwrap();
    assert!(result.is_truncated);
    assert_eq!(result.next_continuation_token, "1ueGcxLPRx1Tr");
}

/// A 2xx body that is actually an <Error> document is promoted to a
/// server error
#[test]
fn test_decode_error_body_in_list_context() {
    let body = "<Error>\
        <Code>NoSuchBucket</Code>\
        <Message>The specified bucket does not exist</Message>\
        <BucketName>missing</BucketName>\
        <Resource>/missing</Resource>\
        <RequestId>186A9D4BDD51B186</RequestId>\
        </Error>";

    match decode_list_objects(&parse(body).unwrap()) {
        Err(S3Error::Server(error)) => {
            assert_eq!(error.code, "NoSuchBucket");
            assert_eq!(error.message, "The specified bucket does not exist");
            assert_eq!(error.bucket_name, "missing");
            assert_eq!(error.resource, "/missing");
            assert_eq!(error.request_id, "186A9D4BDD51B186");
        }
        other => panic!("expected server error, got {other:?}"),
    }
}

#[test]
fn test_decode_error_with_host_id() {
    let body = "<Error>\
        <Code>InvalidBucketName</Code>\
        <Message>The specified bucket is not valid.</Message>\
        <HostId>host-12</HostId>\
        <ExtraTag>ignored</ExtraTag>\
        </Error>";

    let error = decode_error(&parse(body).unwrap());
    assert_eq!(error.code, "InvalidBucketName");
    assert_eq!(error.host_id, "host-12");
}

#[test]
fn test_decode_list_buckets() {
    let body = "<ListAllMyBucketsResult>\
        <Owner><ID>02d6176db174dc93</ID><DisplayName>minio</DisplayName></Owner>\
        <Buckets>\
            <Bucket><Name>alpha</Name><CreationDate>2026-01-01T00:00:00.000Z</CreationDate></Bucket>\
            <Bucket><Name>beta</Name><CreationDate>2026-02-01T00:00:00.000Z</CreationDate></Bucket>\
        </Buckets>\
        </ListAllMyBucketsResult>";

    let result = decode_list_buckets(&parse(body).unwrap()).unwrap();
    assert_eq!(result.owner.display_name, "minio");
    assert_eq!(result.buckets.len(), 2);
    assert_eq!(result.buckets[0].name, "alpha");
    assert_eq!(result.buckets[1].name, "beta");
}

#[test]
fn test_decode_list_buckets_empty() {
    let body = "<ListAllMyBucketsResult>\
        <Owner><ID>02d6176db174dc93</ID><DisplayName>minio</DisplayName></Owner>\
        <Buckets></Buckets>\
        </ListAllMyBucketsResult>";

    let result = decode_list_buckets(&parse(body).unwrap()).unwrap();
    assert!(result.buckets.is_empty());
}

/// Build one synthetic ListObjectsV2 page.
fn page_xml(keys: &[String], truncated: bool, next_token: &str) -> String {
    let mut body = String::new();
    body.push_str("<ListBucketResult><Name>big-bucket</Name>");
    let _ = write!(body, "<KeyCount>{}</KeyCount>", keys.len());
    let _ = write!(body, "<IsTruncated>{truncated}</IsTruncated>");
    if !next_token.is_empty() {
        let _ = write!(
            body,
            "<NextContinuationToken>{next_token}</NextContinuationToken>"
        );
    }
    for key in keys {
        let _ = write!(body, "<Contents><Key>{key}</Key><Size>1</Size></Contents>");
    }
    body.push_str("</ListBucketResult>");
    body
}

/// Pagination over a 1001-object bucket at 100 keys per page: 11 pages,
/// every key visited exactly once, in order, and the loop terminates.
#[test]
fn test_pagination_termination_over_synthetic_pages() {
    let all_keys: Vec<String> = (0..1001).map(|i| format!("objects/{i:04}")).collect();
    let page_size = 100;

    let mut visited: Vec<String> = Vec::new();
    let mut pages = 0usize;
    let mut has_more = true;
    let mut token = String::new();

    while has_more {
        // The continuation token stands in for an offset cursor
        let start: usize = if token.is_empty() {
            0
        } else {
            token.parse().unwrap()
        };
        let end = (start + page_size).min(all_keys.len());
        let truncated = end < all_keys.len();
        let next_token = if truncated { end.to_string() } else { String::new() };

        let body = page_xml(&all_keys[start..end], truncated, &next_token);
        let page = decode_list_objects(&parse(&body).unwrap()).unwrap();

        assert_eq!(page.key_count as usize, page.contents.len());
        assert_eq!(page.is_truncated, !page.next_continuation_token.is_empty());

        visited.extend(page.contents.iter().map(|o| o.key.clone()));
        pages += 1;
        has_more = page.is_truncated;
        token = page.next_continuation_token;

        assert!(pages <= 11, "paginator failed to terminate");
    }

    assert_eq!(pages, 11);
    assert_eq!(visited.len(), 1001);
    assert_eq!(visited, all_keys);
}
