use thiserror::Error;

use crate::source::{FetchError, ResolutionError};
use crate::storage::{StorageError, UploadError};

/// Why a backup run stopped. Every variant is fatal.
#[derive(Debug, Error)]
pub enum BackupError {
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error(transparent)]
    Listing(#[from] FetchError),

    #[error(transparent)]
    Folder(#[from] StorageError),

    #[error(transparent)]
    Upload(#[from] UploadError),
}
