use std::path::PathBuf;

use thiserror::Error;

use crate::source::FetchError;

/// Folder creation or upload-link request rejected by Yandex Disk.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("HTTP error calling Yandex Disk for {path}: {source}")]
    Http {
        path: String,
        source: reqwest::Error,
    },

    #[error("Yandex Disk returned HTTP {status} for {path}: {code}: {message}")]
    Api {
        path: String,
        status: u16,
        code: String,
        message: String,
    },

    #[error("Malformed upload link for {path}: {source}")]
    Malformed {
        path: String,
        source: serde_json::Error,
    },
}

/// Moving the photo bytes to the upload link failed.
#[derive(Debug, Error)]
pub enum TransferError {
    #[error("HTTP error uploading {path}: {source}")]
    Http {
        path: String,
        source: reqwest::Error,
    },

    #[error("HTTP error {status} uploading {path}")]
    HttpStatus { path: String, status: u16 },

    #[error("Upload link for {path} asks for unsupported method '{method}'")]
    Method { path: String, method: String },

    #[error("Failed to stage {path}: {source}")]
    Staging {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Anything that stops a batch upload.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Transfer(#[from] TransferError),
}
