use chrono::{DateTime, Utc};

/// A VK owner id. Positive for users, negative for communities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OwnerId(pub i64);

impl std::fmt::Display for OwnerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What the operator typed to identify the account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountRef {
    /// Digits only; used as the owner id without a lookup. The digits are
    /// parsed as a number, so leading zeros are dropped (`007` is owner `7`).
    Id(String),
    /// A screen name such as `durov` that needs resolving.
    Alias(String),
}

impl From<&str> for AccountRef {
    fn from(s: &str) -> Self {
        let s = s.trim();
        if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
            AccountRef::Id(s.to_string())
        } else {
            AccountRef::Alias(s.to_string())
        }
    }
}

impl std::fmt::Display for AccountRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccountRef::Id(id) => f.write_str(id),
            AccountRef::Alias(alias) => f.write_str(alias),
        }
    }
}

/// One of the renditions VK offers for a photo, keyed by its size letter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoVariant {
    pub tag: String,
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct PhotoRecord {
    pub id: i64,
    pub likes_count: u64,
    pub captured_at: DateTime<Utc>,
    pub variants: Vec<PhotoVariant>,
}

impl PhotoRecord {
    /// The first variant carrying `tag`, if VK offered one.
    pub fn variant(&self, tag: &str) -> Option<&PhotoVariant> {
        self.variants.iter().find(|v| v.tag == tag)
    }
}

impl std::fmt::Display for PhotoRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<PhotoRecord: id={} likes={}>", self.id, self.likes_count)
    }
}
