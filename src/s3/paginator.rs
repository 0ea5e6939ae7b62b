//! Pagination over ListObjectsV2 continuation tokens

use crate::error::Result;
use crate::s3::client::S3Client;
use crate::s3::types::{ListObjectsInput, ListObjectsResult};

/// Iterator-style pagination over a bucket listing.
///
/// Each `next_page` issues one `list_objects` call with the accumulated
/// continuation token. Termination is guaranteed: the final page reports
/// `IsTruncated=false` and an empty `NextContinuationToken`.
///
/// ```no_run
/// # async fn demo(client: &s3lite::S3Client) -> s3lite::Result<()> {
/// let mut paginator = s3lite::ListObjectsPaginator::new(client, "my-bucket", "path/to/")
///     .with_max_keys(100);
/// while paginator.has_more_pages() {
///     let page = paginator.next_page().await?;
///     for object in &page.contents {
///         println!("{}", object.key);
///     }
/// }
/// # Ok(())
/// # }
/// ```
pub struct ListObjectsPaginator<'a> {
    client: &'a S3Client,
    bucket: String,
    prefix: String,
    max_keys: Option<i32>,
    continuation_token: String,
    has_more: bool,
}

impl<'a> ListObjectsPaginator<'a> {
    pub fn new(client: &'a S3Client, bucket: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            prefix: prefix.into(),
            max_keys: None,
            continuation_token: String::new(),
            has_more: true,
        }
    }

    /// Override the page size (default 1000).
    pub fn with_max_keys(mut self, max_keys: i32) -> Self {
        self.max_keys = Some(max_keys);
        self
    }

    /// True until a page reports `IsTruncated=false`.
    pub fn has_more_pages(&self) -> bool {
        self.has_more
    }

    /// Fetch the next page. On error the pagination state is left
    /// untouched, so the caller may retry or stop.
    pub async fn next_page(&mut self) -> Result<ListObjectsResult> {
        let input = ListObjectsInput {
            prefix: if self.prefix.is_empty() {
                None
            } else {
                Some(self.prefix.clone())
            },
            max_keys: self.max_keys,
            continuation_token: if self.continuation_token.is_empty() {
                None
            } else {
                Some(self.continuation_token.clone())
            },
            ..Default::default()
        };

        let page = self.client.list_objects(&self.bucket, &input).await?;
        self.has_more = page.is_truncated;
        self.continuation_token = page.next_continuation_token.clone();
        Ok(page)
    }
}
