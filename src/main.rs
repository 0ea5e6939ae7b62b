use anyhow::Result;
use clap::Parser;
use s3lite::cli::args::{Cli, Commands};
use s3lite::cli::commands;
use s3lite::config;
use s3lite::S3Client;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| cli.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Sequential I/O only; a single-threaded runtime is enough
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(run(cli))
}

async fn run(cli: Cli) -> Result<()> {
    let config = config::load_config(cli.config.as_deref(), cli.profile.as_deref())?;
    let profile = config
        .get_profile(cli.profile.as_deref())
        .ok_or_else(|| anyhow::anyhow!("No matching profile in configuration"))?;
    let client = S3Client::from_profile(profile);

    match &cli.command {
        Commands::Ls {
            path,
            page_size,
            max_items,
        } => commands::cmd_ls(&client, path, *page_size, *max_items).await?,
        Commands::Cat { path } => commands::cmd_cat(&client, path).await?,
        Commands::Put {
            source,
            dest,
            content_type,
        } => commands::cmd_put(&client, source, dest, content_type.as_deref()).await?,
        Commands::Rm { path, version_id } => {
            commands::cmd_rm(&client, path, version_id.as_deref()).await?
        }
        Commands::Stat { path } => commands::cmd_stat(&client, path).await?,
        Commands::Mb { bucket, location } => {
            commands::cmd_mb(&client, bucket, location.as_deref()).await?
        }
        Commands::Rb { bucket } => commands::cmd_rb(&client, bucket).await?,
        Commands::Buckets => commands::cmd_buckets(&client).await?,
        Commands::Du { path } => commands::cmd_du(&client, path).await?,
    }

    Ok(())
}
