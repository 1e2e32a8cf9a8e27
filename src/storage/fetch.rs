use std::path::Path;

use reqwest::Client;
use tokio::fs;

use super::error::TransferError;
use crate::source::FetchError;

/// Download a photo variant into memory.
pub async fn fetch_bytes(client: &Client, url: &str) -> Result<Vec<u8>, FetchError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|source| FetchError::Http {
            url: url.to_string(),
            source,
        })?;

    if !response.status().is_success() {
        return Err(FetchError::HttpStatus {
            status: response.status().as_u16(),
            url: url.to_string(),
        });
    }

    let bytes = response.bytes().await.map_err(|source| FetchError::Http {
        url: url.to_string(),
        source,
    })?;
    Ok(bytes.to_vec())
}

fn staging_error(path: &Path) -> impl FnOnce(std::io::Error) -> TransferError {
    let path = path.to_path_buf();
    move |source| TransferError::Staging { path, source }
}

/// Write `bytes` to `dir/file_name` through a `.part` file, then read the
/// finished file back so the upload sends what landed on disk.
pub async fn stage(dir: &Path, file_name: &str, bytes: Vec<u8>) -> Result<Vec<u8>, TransferError> {
    let final_path = dir.join(file_name);
    let part_path = dir.join(format!("{file_name}.part"));

    fs::create_dir_all(dir).await.map_err(staging_error(dir))?;
    fs::write(&part_path, &bytes)
        .await
        .map_err(staging_error(&part_path))?;
    fs::rename(&part_path, &final_path)
        .await
        .map_err(staging_error(&final_path))?;
    tracing::debug!(path = %final_path.display(), size = bytes.len(), "Staged photo");

    fs::read(&final_path)
        .await
        .map_err(staging_error(&final_path))
}
