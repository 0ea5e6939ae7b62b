//! End-to-end client tests against a canned local HTTP server

use s3lite::s3::signer::sha256_hex;
use s3lite::s3::types::{
    DeleteBucketInput, DeleteObjectInput, GetObjectInput, HeadObjectInput, ListObjectsInput,
    PutObjectInput,
};
use s3lite::{AddressingStyle, Credentials, S3Client, S3Error};
use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::mpsc;

/// Serve exactly one connection with a canned response; the received
/// request text comes back over the channel.
fn spawn_server(response: String) -> (SocketAddr, mpsc::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::channel();

    std::thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let request = read_request(&mut stream);
        let _ = tx.send(request);
        let _ = stream.write_all(response.as_bytes());
        let _ = stream.flush();
    });

    (addr, rx)
}

/// Read one HTTP request: headers, then Content-Length body bytes if any.
fn read_request(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];

    loop {
        let n = stream.read(&mut chunk).unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        if let Some(pos) = find_subsequence(&buf, b"\r\n\r\n") {
            let header_text = String::from_utf8_lossy(&buf[..pos]).to_string();
            let content_length = header_text
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    if name.eq_ignore_ascii_case("content-length") {
                        value.trim().parse::<usize>().ok()
                    } else {
                        None
                    }
                })
                .unwrap_or(0);

            let mut have = buf.len() - (pos + 4);
            while have < content_length {
                let n = stream.read(&mut chunk).unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
                have += n;
            }
            break;
        }
    }

    String::from_utf8_lossy(&buf).to_string()
}

fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

fn http_response(status: &str, headers: &[(&str, &str)], body: &str) -> String {
    let mut response = format!("HTTP/1.1 {status}\r\n");
    for (name, value) in headers {
        response.push_str(name);
        response.push_str(": ");
        response.push_str(value);
        response.push_str("\r\n");
    }
    response.push_str(&format!(
        "content-length: {}\r\nconnection: close\r\n\r\n{body}",
        body.len()
    ));
    response
}

fn client_for(addr: SocketAddr) -> S3Client {
    S3Client::with_endpoint(
        Credentials::new("minio_access", "minio_secret"),
        addr.to_string(),
        AddressingStyle::PathStyle,
    )
}

#[tokio::test]
async fn test_list_objects_end_to_end() {
    let body = "<ListBucketResult>\
        <Name>my-bucket</Name>\
        <Prefix>photos/</Prefix>\
        <KeyCount>1</KeyCount>\
        <MaxKeys>100</MaxKeys>\
        <IsTruncated>false</IsTruncated>\
        <Contents><Key>photos/cat.jpg</Key><Size>1024</Size></Contents>\
        </ListBucketResult>";
    let (addr, rx) = spawn_server(http_response(
        "200 OK",
        &[("content-type", "application/xml")],
        body,
    ));

    let client = client_for(addr);
    let input = ListObjectsInput {
        prefix: Some("photos/".to_string()),
        max_keys: Some(100),
        ..Default::default()
    };
    let result = client.list_objects("my-bucket", &input).await.unwrap();

    assert_eq!(result.name, "my-bucket");
    assert_eq!(result.contents.len(), 1);
    assert_eq!(result.contents[0].key, "photos/cat.jpg");
    assert_eq!(result.contents[0].size, 1024);
    assert!(!result.is_truncated);

    let request = rx.recv().unwrap();
    assert!(
        request.starts_with("GET /my-bucket/?list-type=2&prefix=photos%2F&max-keys=100 HTTP/1.1"),
        "unexpected request line: {}",
        request.lines().next().unwrap_or("")
    );
    assert!(request.contains("authorization: AWS4-HMAC-SHA256 Credential=minio_access/"));
    assert!(request.contains("/us-east-1/s3/aws4_request"));
    assert!(request.contains("SignedHeaders=host;x-amz-content-sha256;x-amz-date"));
    assert!(request.contains(&format!("host: {addr}")));
}

#[tokio::test]
async fn test_get_object_returns_raw_body() {
    let (addr, rx) = spawn_server(http_response(
        "200 OK",
        &[("content-type", "text/plain")],
        "hello from storage",
    ));

    let client = client_for(addr);
    let body = client
        .get_object("my-bucket", "greeting.txt", &GetObjectInput::default())
        .await
        .unwrap();

    assert_eq!(&body[..], b"hello from storage");

    let request = rx.recv().unwrap();
    assert!(request.starts_with("GET /my-bucket/greeting.txt HTTP/1.1"));
}

#[tokio::test]
async fn test_get_object_range_header() {
    let (addr, rx) = spawn_server(http_response("206 Partial Content", &[], "hello"));

    let client = client_for(addr);
    let input = GetObjectInput {
        range: Some("bytes=0-4".to_string()),
        ..Default::default()
    };
    let body = client
        .get_object("my-bucket", "greeting.txt", &input)
        .await
        .unwrap();
    assert_eq!(&body[..], b"hello");

    let request = rx.recv().unwrap();
    assert!(request.contains("range: bytes=0-4"));
}

#[tokio::test]
async fn test_get_object_missing_key_error() {
    let body = "<Error>\
        <Code>NoSuchKey</Code>\
        <Message>The specified key does not exist.</Message>\
        <Resource>/my-bucket/missing.txt</Resource>\
        <RequestId>4442587FB7D0A2F9</RequestId>\
        </Error>";
    let (addr, _rx) = spawn_server(http_response("404 Not Found", &[], body));

    let client = client_for(addr);
    let result = client
        .get_object("my-bucket", "missing.txt", &GetObjectInput::default())
        .await;

    match result {
        Err(S3Error::Server(error)) => {
            assert_eq!(error.code, "NoSuchKey");
            assert_eq!(error.resource, "/my-bucket/missing.txt");
        }
        other => panic!("expected server error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_put_object_signs_payload_and_decodes_headers() {
    let (addr, rx) = spawn_server(http_response(
        "200 OK",
        &[("ETag", "\"9b2cf535f27731c974343645a3985328\"")],
        "",
    ));

    let client = client_for(addr);
    let input = PutObjectInput {
        content_type: Some("text/plain".to_string()),
        ..Default::default()
    };
    let result = client
        .put_object("my-bucket", "notes/today.txt", &b"payload"[..], &input)
        .await
        .unwrap();

    assert_eq!(result.etag, "\"9b2cf535f27731c974343645a3985328\"");

    let request = rx.recv().unwrap();
    assert!(request.starts_with("PUT /my-bucket/notes/today.txt HTTP/1.1"));
    assert!(request.contains("content-type: text/plain"));
    assert!(request.contains(&format!(
        "x-amz-content-sha256: {}",
        sha256_hex(b"payload")
    )));
    assert!(request.ends_with("payload"));
}

#[tokio::test]
async fn test_delete_object_uses_delete_verb() {
    let (addr, rx) = spawn_server(http_response(
        "204 No Content",
        &[("x-amz-version-id", "v123")],
        "",
    ));

    let client = client_for(addr);
    let result = client
        .delete_object("my-bucket", "notes/today.txt", &DeleteObjectInput::default())
        .await
        .unwrap();

    assert_eq!(result.version_id, "v123");

    let request = rx.recv().unwrap();
    assert!(request.starts_with("DELETE /my-bucket/notes/today.txt HTTP/1.1"));
}

#[tokio::test]
async fn test_delete_bucket_requires_204() {
    let (addr, _rx) = spawn_server("HTTP/1.1 204 No Content\r\nconnection: close\r\n\r\n".to_string());

    let client = client_for(addr);
    client
        .delete_bucket("my-bucket", &DeleteBucketInput::default())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_delete_bucket_not_empty() {
    let body = "<Error>\
        <Code>BucketNotEmpty</Code>\
        <Message>The bucket you tried to delete is not empty</Message>\
        </Error>";
    let (addr, _rx) = spawn_server(http_response("409 Conflict", &[], body));

    let client = client_for(addr);
    let result = client
        .delete_bucket("my-bucket", &DeleteBucketInput::default())
        .await;

    match result {
        Err(S3Error::Server(error)) => {
            assert_eq!(error.error_code(), s3lite::ErrorCode::BucketNotEmpty)
        }
        other => panic!("expected server error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_head_object_error_synthesized_from_headers() {
    let (addr, rx) = spawn_server(http_response(
        "404 Not Found",
        &[
            ("X-Minio-Error-Code", "NoSuchKey"),
            ("X-Minio-Error-Desc", "The specified key does not exist."),
        ],
        "",
    ));

    let client = client_for(addr);
    let result = client
        .head_object("my-bucket", "missing.txt", &HeadObjectInput::default())
        .await;

    match result {
        Err(S3Error::Head(error)) => {
            assert_eq!(error.code, "NoSuchKey");
            assert_eq!(error.message, "The specified key does not exist.");
        }
        other => panic!("expected head error, got {other:?}"),
    }

    let request = rx.recv().unwrap();
    assert!(request.starts_with("HEAD /my-bucket/missing.txt HTTP/1.1"));
}

#[tokio::test]
async fn test_head_object_decodes_metadata() {
    let (addr, _rx) = spawn_server(http_response(
        "200 OK",
        &[
            ("Content-Length", "3191"),
            ("Content-Type", "image/jpeg"),
            ("ETag", "\"6805f2cfc46c0f04559748bb039d69ae\""),
            ("Last-Modified", "Thu, 15 Jan 2026 21:26:38 GMT"),
        ],
        "",
    ));

    let client = client_for(addr);
    let result = client
        .head_object("my-bucket", "photo.jpg", &HeadObjectInput::default())
        .await
        .unwrap();

    assert_eq!(result.content_length, 3191);
    assert_eq!(result.content_type, "image/jpeg");
    assert_eq!(result.etag, "\"6805f2cfc46c0f04559748bb039d69ae\"");
    assert_eq!(result.last_modified, "Thu, 15 Jan 2026 21:26:38 GMT");
}

#[tokio::test]
async fn test_list_buckets_end_to_end() {
    let body = "<ListAllMyBucketsResult>\
        <Owner><ID>02d6176db174dc93</ID><DisplayName>minio</DisplayName></Owner>\
        <Buckets><Bucket><Name>alpha</Name><CreationDate>2026-01-01T00:00:00.000Z</CreationDate></Bucket></Buckets>\
        </ListAllMyBucketsResult>";
    let (addr, rx) = spawn_server(http_response("200 OK", &[], body));

    let client = client_for(addr);
    let result = client.list_buckets().await.unwrap();

    assert_eq!(result.buckets.len(), 1);
    assert_eq!(result.buckets[0].name, "alpha");

    let request = rx.recv().unwrap();
    assert!(request.starts_with("GET / HTTP/1.1"));
}
