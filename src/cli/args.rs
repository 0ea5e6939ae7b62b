use clap::{Parser, Subcommand};

/// s3lite - small S3-compatible object storage client
#[derive(Parser, Debug)]
#[command(name = "s3lite")]
#[command(version, about = "Small S3-compatible object storage client", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file path (falls back to environment variables)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Profile to use from config
    #[arg(long, global = true)]
    pub profile: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List objects under a prefix
    Ls {
        /// S3 path (s3://bucket/prefix/)
        path: String,

        /// Objects requested per page
        #[arg(long, default_value = "1000")]
        page_size: i32,

        /// Stop after this many objects (0 = unlimited)
        #[arg(long, default_value = "0")]
        max_items: usize,
    },

    /// Print an object to stdout
    Cat {
        /// S3 path (s3://bucket/key)
        path: String,
    },

    /// Upload a local file
    Put {
        /// Local source file
        source: std::path::PathBuf,

        /// S3 destination (s3://bucket/key)
        dest: String,

        /// Content type of the uploaded object
        #[arg(long)]
        content_type: Option<String>,
    },

    /// Delete an object
    Rm {
        /// S3 path (s3://bucket/key)
        path: String,

        /// Delete a specific object version
        #[arg(long)]
        version_id: Option<String>,
    },

    /// Show object metadata
    Stat {
        /// S3 path (s3://bucket/key)
        path: String,
    },

    /// Create a bucket
    Mb {
        /// Bucket name (s3://bucket)
        bucket: String,

        /// Region constraint for the new bucket
        #[arg(long)]
        location: Option<String>,
    },

    /// Delete a bucket
    Rb {
        /// Bucket name (s3://bucket)
        bucket: String,
    },

    /// List all buckets
    Buckets,

    /// Total size of all objects under a prefix
    Du {
        /// S3 path (s3://bucket/prefix/)
        path: String,
    },
}

/// Parse an S3 path into bucket and optional key.
///
/// Accepts `s3://bucket/key` and bare `bucket/key`.
pub fn parse_s3_path(path: &str) -> anyhow::Result<(String, Option<String>)> {
    let stripped = path.trim().strip_prefix("s3://").unwrap_or(path.trim());

    let (bucket, key) = match stripped.split_once('/') {
        Some((bucket, key)) => (bucket, key),
        None => (stripped, ""),
    };

    if bucket.is_empty() {
        anyhow::bail!("Bucket name cannot be empty");
    }

    let key = if key.is_empty() {
        None
    } else {
        Some(key.to_string())
    };

    Ok((bucket.to_string(), key))
}
