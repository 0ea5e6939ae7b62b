//! Command handlers for the CLI front end

use crate::cli::args::parse_s3_path;
use crate::s3::types::{
    CreateBucketConfiguration, CreateBucketInput, DeleteBucketInput, DeleteObjectInput,
    GetObjectInput, HeadObjectInput, PutObjectInput,
};
use crate::s3::{ListObjectsPaginator, S3Client};
use anyhow::Result;
use std::io::Write;

/// List objects under a prefix, one page at a time.
pub async fn cmd_ls(client: &S3Client, path: &str, page_size: i32, max_items: usize) -> Result<()> {
    let (bucket, prefix) = parse_s3_path(path)?;

    let mut paginator =
        ListObjectsPaginator::new(client, bucket.as_str(), prefix.unwrap_or_default())
            .with_max_keys(page_size);

    let mut shown = 0usize;
    while paginator.has_more_pages() {
        let page = paginator.next_page().await?;
        for prefix in &page.common_prefixes {
            println!("{:>26} {:>12} {}", "", "DIR", prefix.prefix);
        }
        for object in &page.contents {
            println!("{:>26} {:>12} {}", object.last_modified, object.size, object.key);
            shown += 1;
            if max_items > 0 && shown >= max_items {
                return Ok(());
            }
        }
    }
    Ok(())
}

/// Print an object body to stdout.
pub async fn cmd_cat(client: &S3Client, path: &str) -> Result<()> {
    let (bucket, key) = parse_s3_path(path)?;
    let key = key.ok_or_else(|| anyhow::anyhow!("Object key is required"))?;

    let body = client
        .get_object(&bucket, &key, &GetObjectInput::default())
        .await?;
    std::io::stdout().write_all(&body)?;
    Ok(())
}

/// Upload a local file.
pub async fn cmd_put(
    client: &S3Client,
    source: &std::path::Path,
    dest: &str,
    content_type: Option<&str>,
) -> Result<()> {
    let (bucket, key) = parse_s3_path(dest)?;
    let key = key.ok_or_else(|| anyhow::anyhow!("Destination key is required"))?;

    let data = std::fs::read(source)?;
    let size = data.len();
    let input = PutObjectInput {
        content_type: content_type.map(str::to_string),
        ..Default::default()
    };
    let result = client.put_object(&bucket, &key, data, &input).await?;

    println!("Uploaded {} ({} bytes, etag {})", key, size, result.etag);
    Ok(())
}

/// Delete one object (or object version).
pub async fn cmd_rm(client: &S3Client, path: &str, version_id: Option<&str>) -> Result<()> {
    let (bucket, key) = parse_s3_path(path)?;
    let key = key.ok_or_else(|| anyhow::anyhow!("Object key is required"))?;

    let input = DeleteObjectInput {
        version_id: version_id.map(str::to_string),
        ..Default::default()
    };
    let result = client.delete_object(&bucket, &key, &input).await?;

    if result.delete_marker {
        println!("Removed {key} (delete marker created)");
    } else {
        println!("Removed {key}");
    }
    Ok(())
}

/// Show object metadata.
pub async fn cmd_stat(client: &S3Client, path: &str) -> Result<()> {
    let (bucket, key) = parse_s3_path(path)?;
    let key = key.ok_or_else(|| anyhow::anyhow!("Object key is required"))?;

    let result = client
        .head_object(&bucket, &key, &HeadObjectInput::default())
        .await?;

    println!("Key          : {key}");
    println!("Size         : {}", result.content_length);
    println!("ETag         : {}", result.etag);
    if !result.content_type.is_empty() {
        println!("Content-Type : {}", result.content_type);
    }
    if !result.last_modified.is_empty() {
        println!("Modified     : {}", result.last_modified);
    }
    if !result.storage_class.is_empty() {
        println!("Storage class: {}", result.storage_class);
    }
    if !result.version_id.is_empty() {
        println!("Version      : {}", result.version_id);
    }
    Ok(())
}

/// Create a bucket.
pub async fn cmd_mb(client: &S3Client, bucket: &str, location: Option<&str>) -> Result<()> {
    let (bucket, _) = parse_s3_path(bucket)?;

    let configuration = CreateBucketConfiguration {
        location_constraint: location.unwrap_or_default().to_string(),
        ..Default::default()
    };
    let result = client
        .create_bucket(&bucket, &configuration, &CreateBucketInput::default())
        .await?;

    if result.location.is_empty() {
        println!("Created bucket {bucket}");
    } else {
        println!("Created bucket {bucket} at {}", result.location);
    }
    Ok(())
}

/// Delete a bucket.
pub async fn cmd_rb(client: &S3Client, bucket: &str) -> Result<()> {
    let (bucket, _) = parse_s3_path(bucket)?;

    client
        .delete_bucket(&bucket, &DeleteBucketInput::default())
        .await?;
    println!("Removed bucket {bucket}");
    Ok(())
}

/// List all buckets.
pub async fn cmd_buckets(client: &S3Client) -> Result<()> {
    let result = client.list_buckets().await?;
    for bucket in &result.buckets {
        println!("{:>26} {}", bucket.creation_date, bucket.name);
    }
    Ok(())
}

/// Sum object sizes under a prefix.
pub async fn cmd_du(client: &S3Client, path: &str) -> Result<()> {
    let (bucket, prefix) = parse_s3_path(path)?;

    let mut paginator = ListObjectsPaginator::new(client, bucket.as_str(), prefix.unwrap_or_default());

    let mut total_bytes: i64 = 0;
    let mut total_objects = 0usize;
    while paginator.has_more_pages() {
        let page = paginator.next_page().await?;
        total_objects += page.contents.len();
        total_bytes += page.contents.iter().map(|o| o.size).sum::<i64>();
    }

    println!("{total_bytes} bytes in {total_objects} objects");
    Ok(())
}
