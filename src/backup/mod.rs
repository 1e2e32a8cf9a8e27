//! Backup run. The linear pipeline from an account reference to files on
//! Yandex Disk: resolve, list, create the folder, then upload photo by photo.

pub mod error;

pub use error::BackupError;

use std::io::IsTerminal;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use crate::source::{AccountRef, OwnerId, PhotoSource};
use crate::storage::{StorageUploader, UploadSummary};
use crate::types::Album;

/// Subset of application config consumed by a backup run.
#[derive(Debug)]
pub struct BackupOptions {
    pub(crate) account: AccountRef,
    pub(crate) album: Album,
    pub(crate) count: u32,
    pub(crate) folder: String,
    pub(crate) dry_run: bool,
    pub(crate) no_progress_bar: bool,
}

#[derive(Debug)]
pub struct BackupReport {
    pub owner: OwnerId,
    pub listed: usize,
    pub summary: UploadSummary,
    pub dry_run: bool,
}

/// Create a progress bar with a consistent template.
///
/// Hidden when the user passed `--no-progress-bar` or stdout is not a TTY.
fn create_progress_bar(no_progress_bar: bool, total: u64) -> ProgressBar {
    if no_progress_bar || !std::io::stdout().is_terminal() {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(total);
    if let Ok(style) = ProgressStyle::with_template(
        "[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
    ) {
        pb.set_style(style.progress_chars("=> "));
    }
    pb
}

/// Run one backup from start to finish.
///
/// The folder is created before the first photo is fetched, so a folder
/// failure aborts the run without uploading anything.
pub async fn run_backup(
    source: &dyn PhotoSource,
    uploader: &StorageUploader,
    options: &BackupOptions,
) -> Result<BackupReport, BackupError> {
    let owner = source.resolve(&options.account).await?;
    info!(account = %options.account, %owner, "Resolved account");

    let photos = source
        .list_photos(owner, options.album, options.count)
        .await?;
    info!(
        count = photos.len(),
        album = options.album.as_str(),
        "Fetched photo list"
    );

    if options.dry_run {
        let summary = uploader.plan(&photos, &options.folder);
        for target in &summary.uploaded {
            info!("[DRY RUN] Would upload {}", target.remote_path());
        }
        return Ok(BackupReport {
            owner,
            listed: photos.len(),
            summary,
            dry_run: true,
        });
    }

    uploader.ensure_folder(&options.folder).await?;

    let pb = create_progress_bar(options.no_progress_bar, photos.len() as u64);
    let result = uploader.upload_all(&photos, &options.folder, &pb).await;
    pb.finish_and_clear();

    Ok(BackupReport {
        owner,
        listed: photos.len(),
        summary: result?,
        dry_run: false,
    })
}
