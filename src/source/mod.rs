//! VK photo source. Turns an account reference into an owner id and lists
//! that owner's photos with their likes, dates and size variants.

pub mod error;
pub mod responses;
pub mod types;

pub use error::{ApiError, FetchError, ResolutionError};
pub use types::{AccountRef, OwnerId, PhotoRecord, PhotoVariant};

use chrono::{TimeZone, Utc};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

use self::responses::{Envelope, PhotosPage, ScreenNameKind, ScreenNameLookup};
use crate::types::Album;

/// Base URL of the VK method API.
pub const VK_API_URL: &str = "https://api.vk.com/method";

/// Read-only access to a photo-hosting account.
#[async_trait::async_trait]
pub trait PhotoSource: Send + Sync {
    /// Resolve `account` to a numeric owner id. Digit-only references are
    /// returned as-is without a network call.
    async fn resolve(&self, account: &AccountRef) -> Result<OwnerId, ResolutionError>;

    /// The `count` most recent photos of `album`, in the order the API
    /// returns them.
    async fn list_photos(
        &self,
        owner: OwnerId,
        album: Album,
        count: u32,
    ) -> Result<Vec<PhotoRecord>, FetchError>;
}

pub struct VkClient {
    client: Client,
    base_url: String,
    token: String,
    api_version: String,
}

impl std::fmt::Debug for VkClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VkClient")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .field("api_version", &self.api_version)
            .finish_non_exhaustive()
    }
}

impl VkClient {
    pub fn new(token: impl Into<String>, api_version: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: VK_API_URL.to_string(),
            token: token.into(),
            api_version: api_version.into(),
        }
    }

    /// Point the client at a different API root.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Call a VK method and unwrap its `response` envelope.
    async fn call<T: DeserializeOwned>(
        &self,
        method: &'static str,
        params: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = format!("{}/{}", self.base_url, method);
        debug!(method, "Calling VK API");
        let response = self
            .client
            .get(&url)
            .query(params)
            .query(&[
                ("access_token", self.token.as_str()),
                ("v", self.api_version.as_str()),
            ])
            .send()
            .await
            .map_err(|source| ApiError::Http { method, source })?;

        if !response.status().is_success() {
            return Err(ApiError::HttpStatus {
                method,
                status: response.status().as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|source| ApiError::Http { method, source })?;
        let envelope: Envelope<T> = serde_json::from_str(&body)
            .map_err(|source| ApiError::Malformed { method, source })?;
        match envelope {
            Envelope::Response { response } => Ok(response),
            Envelope::Error { error } => Err(ApiError::Vk {
                method,
                code: error.error_code,
                message: error.error_msg,
            }),
        }
    }
}

#[async_trait::async_trait]
impl PhotoSource for VkClient {
    async fn resolve(&self, account: &AccountRef) -> Result<OwnerId, ResolutionError> {
        let name = match account {
            AccountRef::Id(id) => {
                return id
                    .parse::<i64>()
                    .map(OwnerId)
                    .map_err(|_| ResolutionError::InvalidId(id.clone()));
            }
            AccountRef::Alias(name) => name,
        };

        let lookup: ScreenNameLookup = self
            .call("utils.resolveScreenName", &[("screen_name", name.clone())])
            .await
            .map_err(|source| ResolutionError::Api {
                name: name.clone(),
                source,
            })?;

        let found = match lookup {
            ScreenNameLookup::Found(found) => found,
            ScreenNameLookup::NotFound(_) => return Err(ResolutionError::NotFound(name.clone())),
        };

        // Community albums are addressed with a negative owner id.
        let owner = match found.kind {
            ScreenNameKind::User => OwnerId(found.object_id),
            ScreenNameKind::Group | ScreenNameKind::Page | ScreenNameKind::Event => {
                OwnerId(-found.object_id)
            }
            kind => {
                return Err(ResolutionError::Unsupported {
                    name: name.clone(),
                    kind: kind.as_str().to_string(),
                })
            }
        };
        debug!(%name, %owner, "Resolved screen name");
        Ok(owner)
    }

    async fn list_photos(
        &self,
        owner: OwnerId,
        album: Album,
        count: u32,
    ) -> Result<Vec<PhotoRecord>, FetchError> {
        let page: PhotosPage = self
            .call(
                "photos.get",
                &[
                    ("owner_id", owner.to_string()),
                    ("album_id", album.as_str().to_string()),
                    ("count", count.to_string()),
                    ("rev", "1".to_string()),
                    ("extended", "1".to_string()),
                ],
            )
            .await?;
        debug!(
            %owner,
            total = page.count,
            returned = page.items.len(),
            "Listed photos"
        );

        page.items
            .into_iter()
            .map(|photo| -> Result<PhotoRecord, FetchError> {
                let captured_at = Utc.timestamp_opt(photo.date, 0).single().ok_or(
                    FetchError::InvalidDate {
                        photo_id: photo.id,
                        date: photo.date,
                    },
                )?;
                Ok(PhotoRecord {
                    id: photo.id,
                    likes_count: photo.likes.count,
                    captured_at,
                    variants: photo
                        .sizes
                        .into_iter()
                        .map(|s| PhotoVariant {
                            tag: s.tag,
                            url: s.url,
                        })
                        .collect(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn client(server: &mockito::ServerGuard) -> VkClient {
        VkClient::new("vk-token", "5.199").with_base_url(server.url())
    }

    #[tokio::test]
    async fn test_resolve_numeric_skips_network() {
        let mut server = mockito::Server::new_async().await;
        let any = server
            .mock("GET", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let owner = client(&server)
            .resolve(&AccountRef::from("240651878"))
            .await
            .unwrap();
        assert_eq!(owner, OwnerId(240651878));
        any.assert_async().await;
    }

    #[tokio::test]
    async fn test_resolve_numeric_drops_leading_zeros() {
        let server = mockito::Server::new_async().await;
        let owner = client(&server)
            .resolve(&AccountRef::from("007"))
            .await
            .unwrap();
        assert_eq!(owner, OwnerId(7));
    }

    #[tokio::test]
    async fn test_resolve_numeric_overflow() {
        let server = mockito::Server::new_async().await;
        let err = client(&server)
            .resolve(&AccountRef::from("99999999999999999999"))
            .await
            .unwrap_err();
        assert!(matches!(err, ResolutionError::InvalidId(_)));
    }

    #[tokio::test]
    async fn test_resolve_alias_user() {
        let mut server = mockito::Server::new_async().await;
        let m = server
            .mock("GET", "/utils.resolveScreenName")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("screen_name".into(), "durov".into()),
                Matcher::UrlEncoded("access_token".into(), "vk-token".into()),
                Matcher::UrlEncoded("v".into(), "5.199".into()),
            ]))
            .with_header("content-type", "application/json")
            .with_body(r#"{"response": {"object_id": 1, "type": "user"}}"#)
            .create_async()
            .await;

        let owner = client(&server)
            .resolve(&AccountRef::from("durov"))
            .await
            .unwrap();
        assert_eq!(owner, OwnerId(1));
        m.assert_async().await;
    }

    #[tokio::test]
    async fn test_resolve_alias_group_is_negative() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/utils.resolveScreenName")
            .match_query(Matcher::Any)
            .with_body(r#"{"response": {"object_id": 22822305, "type": "group"}}"#)
            .create_async()
            .await;

        let owner = client(&server)
            .resolve(&AccountRef::from("vkteam"))
            .await
            .unwrap();
        assert_eq!(owner, OwnerId(-22822305));
    }

    #[tokio::test]
    async fn test_resolve_alias_not_found() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/utils.resolveScreenName")
            .match_query(Matcher::Any)
            .with_body(r#"{"response": []}"#)
            .create_async()
            .await;

        let err = client(&server)
            .resolve(&AccountRef::from("no_such_person"))
            .await
            .unwrap_err();
        assert!(matches!(err, ResolutionError::NotFound(name) if name == "no_such_person"));
    }

    #[tokio::test]
    async fn test_resolve_application_unsupported() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/utils.resolveScreenName")
            .match_query(Matcher::Any)
            .with_body(r#"{"response": {"object_id": 5, "type": "application"}}"#)
            .create_async()
            .await;

        let err = client(&server)
            .resolve(&AccountRef::from("someapp"))
            .await
            .unwrap_err();
        assert!(matches!(err, ResolutionError::Unsupported { kind, .. } if kind == "application"));
    }

    #[tokio::test]
    async fn test_resolve_api_error_payload() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/utils.resolveScreenName")
            .match_query(Matcher::Any)
            .with_body(r#"{"error": {"error_code": 5, "error_msg": "User authorization failed"}}"#)
            .create_async()
            .await;

        let err = client(&server)
            .resolve(&AccountRef::from("durov"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ResolutionError::Api {
                source: ApiError::Vk { code: 5, .. },
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_list_photos() {
        let mut server = mockito::Server::new_async().await;
        let m = server
            .mock("GET", "/photos.get")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("owner_id".into(), "1".into()),
                Matcher::UrlEncoded("album_id".into(), "profile".into()),
                Matcher::UrlEncoded("count".into(), "2".into()),
                Matcher::UrlEncoded("rev".into(), "1".into()),
                Matcher::UrlEncoded("extended".into(), "1".into()),
            ]))
            .with_body(
                r#"{"response": {"count": 40, "items": [
                    {"id": 2, "date": 1683028800, "likes": {"count": 4},
                     "sizes": [{"type": "z", "url": "https://cdn/2z.jpg"}]},
                    {"id": 1, "date": 1682942400, "likes": {"count": 10},
                     "sizes": [{"type": "s", "url": "https://cdn/1s.jpg"},
                               {"type": "z", "url": "https://cdn/1z.jpg"}]}
                ]}}"#,
            )
            .create_async()
            .await;

        let photos = client(&server)
            .list_photos(OwnerId(1), Album::Profile, 2)
            .await
            .unwrap();
        m.assert_async().await;

        assert_eq!(photos.len(), 2);
        // API order is kept, not re-sorted.
        assert_eq!(photos[0].id, 2);
        assert_eq!(photos[0].likes_count, 4);
        assert_eq!(photos[1].id, 1);
        assert_eq!(photos[1].variants.len(), 2);
        assert_eq!(photos[1].variant("z").unwrap().url, "https://cdn/1z.jpg");
        assert_eq!(
            photos[1].captured_at.format("%Y-%m-%d").to_string(),
            "2023-05-01"
        );
    }

    #[tokio::test]
    async fn test_list_photos_http_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/photos.get")
            .match_query(Matcher::Any)
            .with_status(502)
            .create_async()
            .await;

        let err = client(&server)
            .list_photos(OwnerId(1), Album::Profile, 5)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            FetchError::Listing(ApiError::HttpStatus { status: 502, .. })
        ));
    }

    #[tokio::test]
    async fn test_list_photos_malformed() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/photos.get")
            .match_query(Matcher::Any)
            .with_body(r#"{"response": {"count": 1, "items": [{"id": 1, "sizes": []}]}}"#)
            .create_async()
            .await;

        let err = client(&server)
            .list_photos(OwnerId(1), Album::Profile, 5)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            FetchError::Listing(ApiError::Malformed { method: "photos.get", .. })
        ));
    }

    #[tokio::test]
    async fn test_list_photos_private_profile() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/photos.get")
            .match_query(Matcher::Any)
            .with_body(r#"{"error": {"error_code": 30, "error_msg": "This profile is private"}}"#)
            .create_async()
            .await;

        let err = client(&server)
            .list_photos(OwnerId(1), Album::Profile, 5)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            FetchError::Listing(ApiError::Vk { code: 30, .. })
        ));
        assert!(err.to_string().contains("This profile is private"));
    }

    #[test]
    fn test_debug_redacts_token() {
        let client = VkClient::new("secret-token", "5.199");
        assert!(!format!("{:?}", client).contains("secret-token"));
    }
}
