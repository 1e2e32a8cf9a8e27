use thiserror::Error;

/// Failure of a single VK API method call.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP error calling {method}: {source}")]
    Http {
        method: &'static str,
        source: reqwest::Error,
    },

    #[error("HTTP error {status} calling {method}")]
    HttpStatus { method: &'static str, status: u16 },

    /// VK reports most failures as HTTP 200 with an `error` object.
    #[error("{method} failed with VK error {code}: {message}")]
    Vk {
        method: &'static str,
        code: i64,
        message: String,
    },

    #[error("Malformed {method} response: {source}")]
    Malformed {
        method: &'static str,
        source: serde_json::Error,
    },
}

/// The account reference couldn't be turned into an owner id.
#[derive(Debug, Error)]
pub enum ResolutionError {
    #[error("Screen name '{0}' does not exist")]
    NotFound(String),

    #[error("'{name}' is a VK {kind}, which has no photo albums")]
    Unsupported { name: String, kind: String },

    #[error("Numeric id '{0}' is out of range")]
    InvalidId(String),

    #[error("Failed to resolve '{name}': {source}")]
    Api { name: String, source: ApiError },
}

/// Listing photos or downloading their bytes failed.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to list photos: {0}")]
    Listing(#[from] ApiError),

    #[error("Photo {photo_id} has an out-of-range date {date}")]
    InvalidDate { photo_id: i64, date: i64 },

    #[error("HTTP error {status} fetching {url}")]
    HttpStatus { status: u16, url: String },

    #[error("HTTP error fetching {url}: {source}")]
    Http { url: String, source: reqwest::Error },
}
