//! Yandex Disk uploader. Creates the destination folder, then moves each
//! photo's preferred size variant into it under a likes-based file name.

pub mod error;
pub mod fetch;
pub mod naming;
pub mod responses;

pub use error::{StorageError, TransferError, UploadError};
pub use naming::{FileNamer, UploadTarget};

use std::path::PathBuf;

use chrono::Local;
use indicatif::ProgressBar;
use reqwest::{Client, Method, Response, StatusCode};
use tracing::{debug, info, warn};

use self::responses::{ErrorBody, Link};
use crate::source::{PhotoRecord, PhotoVariant};

/// Base URL of the Yandex Disk resources API.
pub const DISK_API_URL: &str = "https://cloud-api.yandex.net/v1/disk/resources";

/// Error code Yandex Disk answers with when the folder is already there.
const FOLDER_EXISTS: &str = "DiskPathPointsToExistentDirectoryError";

/// What a batch upload did.
#[derive(Debug, Default)]
pub struct UploadSummary {
    /// Targets in the order they were uploaded (or would be, for a plan).
    pub uploaded: Vec<UploadTarget>,
    /// Photos without the preferred size variant.
    pub skipped: usize,
}

pub struct StorageUploader {
    client: Client,
    base_url: String,
    token: String,
    preferred_tag: String,
    staging_dir: Option<PathBuf>,
}

impl std::fmt::Debug for StorageUploader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageUploader")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .field("preferred_tag", &self.preferred_tag)
            .field("staging_dir", &self.staging_dir)
            .finish_non_exhaustive()
    }
}

impl StorageUploader {
    pub fn new(token: impl Into<String>, preferred_tag: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: DISK_API_URL.to_string(),
            token: token.into(),
            preferred_tag: preferred_tag.into(),
            staging_dir: None,
        }
    }

    /// Point the uploader at a different API root.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Write each photo to `dir` before uploading it.
    pub fn with_staging_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.staging_dir = dir;
        self
    }

    fn auth_header(&self) -> String {
        format!("OAuth {}", self.token)
    }

    /// Create `folder`, treating "already exists" as success.
    pub async fn ensure_folder(&self, folder: &str) -> Result<(), StorageError> {
        let response = self
            .client
            .put(&self.base_url)
            .header(reqwest::header::AUTHORIZATION, self.auth_header())
            .query(&[("path", folder)])
            .send()
            .await
            .map_err(|source| StorageError::Http {
                path: folder.to_string(),
                source,
            })?;

        let status = response.status();
        if status.is_success() {
            info!(folder, "Created folder on Yandex Disk");
            return Ok(());
        }

        let body = error_body(response).await;
        if status == StatusCode::CONFLICT && body.error == FOLDER_EXISTS {
            debug!(folder, "Folder already exists");
            return Ok(());
        }
        Err(api_error(folder, status, body))
    }

    /// Ask Yandex Disk where to PUT the bytes for `target`, overwriting any
    /// file already at that path.
    async fn upload_link(&self, target: &UploadTarget) -> Result<Link, StorageError> {
        let path = target.remote_path();
        let response = self
            .client
            .get(format!("{}/upload", self.base_url))
            .header(reqwest::header::AUTHORIZATION, self.auth_header())
            .query(&[("path", path.as_str()), ("overwrite", "true")])
            .send()
            .await
            .map_err(|source| StorageError::Http {
                path: path.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(api_error(&path, status, error_body(response).await));
        }

        let text = response.text().await.map_err(|source| StorageError::Http {
            path: path.clone(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| StorageError::Malformed { path, source })
    }

    async fn transfer(
        &self,
        link: &Link,
        target: &UploadTarget,
        bytes: Vec<u8>,
    ) -> Result<(), TransferError> {
        let path = target.remote_path();
        if link.templated {
            warn!(%path, "Upload link is templated; using it verbatim");
        }
        let method = Method::from_bytes(link.method.as_bytes()).map_err(|_| {
            TransferError::Method {
                path: path.clone(),
                method: link.method.clone(),
            }
        })?;

        let size = bytes.len();
        let response = self
            .client
            .request(method, &link.href)
            .body(bytes)
            .send()
            .await
            .map_err(|source| TransferError::Http {
                path: path.clone(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(TransferError::HttpStatus {
                path,
                status: response.status().as_u16(),
            });
        }
        debug!(%path, size, status = response.status().as_u16(), "Transferred bytes");
        Ok(())
    }

    fn select<'a>(&self, photo: &'a PhotoRecord) -> Option<&'a PhotoVariant> {
        let variant = photo.variant(&self.preferred_tag);
        if variant.is_none() {
            warn!(
                photo_id = photo.id,
                tag = %self.preferred_tag,
                "Photo has no matching size, skipping"
            );
        }
        variant
    }

    /// Compute the targets `upload_all` would produce, without any I/O.
    pub fn plan(&self, photos: &[PhotoRecord], folder: &str) -> UploadSummary {
        let mut namer = FileNamer::new();
        let mut summary = UploadSummary::default();
        for photo in photos {
            if self.select(photo).is_none() {
                summary.skipped += 1;
                continue;
            }
            summary.uploaded.push(target_for(&mut namer, photo, folder));
        }
        summary
    }

    /// Upload every photo into `folder`, one at a time, in input order.
    ///
    /// Photos lacking the preferred size are skipped. The first fetch,
    /// storage or transfer failure aborts the rest of the batch; photos
    /// already uploaded stay where they are.
    pub async fn upload_all(
        &self,
        photos: &[PhotoRecord],
        folder: &str,
        progress: &ProgressBar,
    ) -> Result<UploadSummary, UploadError> {
        let mut namer = FileNamer::new();
        let mut summary = UploadSummary::default();

        for photo in photos {
            let variant = match progress.suspend(|| self.select(photo)) {
                Some(v) => v,
                None => {
                    summary.skipped += 1;
                    progress.inc(1);
                    continue;
                }
            };

            let mut bytes = fetch::fetch_bytes(&self.client, &variant.url).await?;
            let target = target_for(&mut namer, photo, folder);
            progress.set_message(target.file_name.clone());

            if let Some(dir) = &self.staging_dir {
                bytes = fetch::stage(dir, &target.file_name, bytes).await?;
            }

            let link = self.upload_link(&target).await?;
            self.transfer(&link, &target, bytes).await?;
            progress.suspend(|| {
                info!(
                    photo_id = photo.id,
                    path = %target.remote_path(),
                    "Uploaded photo"
                )
            });

            summary.uploaded.push(target);
            progress.inc(1);
        }

        Ok(summary)
    }
}

fn target_for(namer: &mut FileNamer, photo: &PhotoRecord, folder: &str) -> UploadTarget {
    let captured_on = photo.captured_at.with_timezone(&Local).date_naive();
    UploadTarget {
        remote_folder: folder.to_string(),
        file_name: namer.name_for(photo.likes_count, captured_on),
    }
}

async fn error_body(response: Response) -> ErrorBody {
    let text = match response.text().await {
        Ok(text) => text,
        Err(e) => {
            debug!(error = %e, "Failed to read error response body");
            String::new()
        }
    };
    ErrorBody::parse(&text)
}

fn api_error(path: &str, status: StatusCode, body: ErrorBody) -> StorageError {
    StorageError::Api {
        path: path.to_string(),
        status: status.as_u16(),
        message: body.message().to_string(),
        code: body.error,
    }
}
