use serde::Deserialize;

/// A one-shot link returned by `GET /resources/upload`.
#[derive(Debug, Deserialize)]
pub struct Link {
    pub href: String,
    #[serde(default = "default_method")]
    pub method: String,
    #[serde(default)]
    pub templated: bool,
}

fn default_method() -> String {
    "PUT".to_string()
}

/// Error body shared by every Yandex Disk endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub description: String,
}

impl ErrorBody {
    /// Parse an error body, falling back to the raw text when it isn't JSON.
    pub fn parse(text: &str) -> Self {
        serde_json::from_str(text).unwrap_or_else(|_| ErrorBody {
            message: text.trim().to_string(),
            ..Default::default()
        })
    }

    /// The most useful human-readable part of the body.
    pub fn message(&self) -> &str {
        if !self.message.is_empty() {
            &self.message
        } else {
            &self.description
        }
    }
}
