//! vkbackup-rs: back up VK photos into a Yandex Disk folder.
//!
//! Resolves a VK account, lists its most recent photos, and re-uploads each
//! photo's preferred size variant to Yandex Disk under a name built from its
//! likes count. One photo at a time; the first error ends the run.

#![warn(clippy::all)]

mod backup;
mod cli;
mod config;
mod source;
mod storage;
mod types;

use std::io::Write;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use backup::BackupOptions;
use source::{AccountRef, VkClient};
use storage::StorageUploader;

/// Ask for the account on stdin when `--user` wasn't given.
fn prompt_account() -> anyhow::Result<String> {
    print!("VK user id or screen name: ");
    std::io::stdout().flush()?;

    let mut input = String::new();
    std::io::stdin()
        .read_line(&mut input)
        .context("Failed to read VK user from stdin")?;
    let input = input.trim();
    if input.is_empty() {
        anyhow::bail!("No VK user id or screen name given");
    }
    Ok(input.to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    let filter = cli.log_level.as_filter().to_string();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .init();

    let config = config::Config::from_cli(cli)?;
    tracing::debug!(?config, "Loaded configuration");

    let account = match &config.account {
        Some(account) => account.clone(),
        None => prompt_account()?,
    };

    let source = VkClient::new(config.vk_token.as_str(), config.vk_api_version.as_str())
        .with_base_url(config.vk_api_url.as_str());
    let uploader = StorageUploader::new(config.ya_token.as_str(), config.size_tag.as_str())
        .with_base_url(config.disk_api_url.as_str())
        .with_staging_dir(config.staging_dir.clone());

    let options = BackupOptions {
        account: AccountRef::from(account.as_str()),
        album: config.album,
        count: config.count,
        folder: config.folder.clone(),
        dry_run: config.dry_run,
        no_progress_bar: config.no_progress_bar,
    };

    tracing::info!(
        account = %options.account,
        folder = %options.folder,
        count = options.count,
        "Starting backup"
    );
    let report = backup::run_backup(&source, &uploader, &options).await?;

    println!();
    if report.dry_run {
        println!("Dry run complete (nothing was uploaded):");
    } else {
        println!("Backup complete:");
    }
    println!("  VK owner id:     {}", report.owner);
    println!("  Photos listed:   {}", report.listed);
    println!("  Photos uploaded: {}", report.summary.uploaded.len());
    println!("  Photos skipped:  {}", report.summary.skipped);
    for target in &report.summary.uploaded {
        println!("    {}", target.remote_path());
    }

    Ok(())
}
