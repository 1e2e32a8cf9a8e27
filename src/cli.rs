use clap::Parser;

use crate::types::*;

#[derive(Parser, Debug)]
#[command(
    name = "vkbackup-rs",
    about = "Back up VK photos into a Yandex Disk folder"
)]
pub struct Cli {
    /// Key-value file holding VK_TOKEN and YA_TOKEN
    #[arg(short = 'c', long, default_value = "config.env")]
    pub config: String,

    /// VK user id or screen name (if not provided, will prompt)
    #[arg(short = 'u', long)]
    pub user: Option<String>,

    /// Number of most recent photos to back up
    #[arg(
        short = 'n',
        long,
        default_value_t = 5,
        value_parser = clap::value_parser!(u32).range(1..=1000)
    )]
    pub count: u32,

    /// Album to back up
    #[arg(short = 'a', long, value_enum, default_value = "profile")]
    pub album: Album,

    /// Destination folder on Yandex Disk
    #[arg(short = 'f', long, default_value = "UsersImages")]
    pub folder: String,

    /// VK size tag to upload (z is the largest standard size)
    #[arg(long, default_value = "z")]
    pub size: String,

    /// Write each photo to this local directory before uploading it
    #[arg(long)]
    pub staging_dir: Option<String>,

    /// List photos and planned file names without touching Yandex Disk
    #[arg(long)]
    pub dry_run: bool,

    /// Disable progress bar
    #[arg(long)]
    pub no_progress_bar: bool,

    /// Log level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}
