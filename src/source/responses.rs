use serde::Deserialize;
use serde_json::Value;

/// Every VK method answers with either `{"response": ...}` or `{"error": ...}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Envelope<T> {
    Response { response: T },
    Error { error: VkError },
}

#[derive(Debug, Deserialize)]
pub struct VkError {
    pub error_code: i64,
    #[serde(default)]
    pub error_msg: String,
}

/// Response of `utils.resolveScreenName`. Unknown names come back as an
/// empty array instead of an object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ScreenNameLookup {
    Found(ResolvedScreenName),
    NotFound(Vec<Value>),
}

#[derive(Debug, Deserialize)]
pub struct ResolvedScreenName {
    #[serde(rename = "type")]
    pub kind: ScreenNameKind,
    pub object_id: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScreenNameKind {
    User,
    Group,
    Page,
    Event,
    Application,
    #[serde(other)]
    Other,
}

impl ScreenNameKind {
    pub fn as_str(&self) -> &str {
        match self {
            ScreenNameKind::User => "user",
            ScreenNameKind::Group => "group",
            ScreenNameKind::Page => "page",
            ScreenNameKind::Event => "event",
            ScreenNameKind::Application => "application",
            ScreenNameKind::Other => "object",
        }
    }
}

/// Response of `photos.get` with `extended=1`.
#[derive(Debug, Deserialize)]
pub struct PhotosPage {
    #[serde(default)]
    pub count: u64,
    pub items: Vec<Photo>,
}

#[derive(Debug, Deserialize)]
pub struct Photo {
    pub id: i64,
    /// Unix seconds.
    pub date: i64,
    pub likes: Likes,
    pub sizes: Vec<PhotoSize>,
}

#[derive(Debug, Deserialize)]
pub struct Likes {
    pub count: u64,
}

#[derive(Debug, Deserialize)]
pub struct PhotoSize {
    #[serde(rename = "type")]
    pub tag: String,
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_error() {
        let json = r#"{"error": {"error_code": 5, "error_msg": "User authorization failed", "request_params": []}}"#;
        let env: Envelope<PhotosPage> = serde_json::from_str(json).unwrap();
        match env {
            Envelope::Error { error } => {
                assert_eq!(error.error_code, 5);
                assert_eq!(error.error_msg, "User authorization failed");
            }
            Envelope::Response { .. } => panic!("expected error envelope"),
        }
    }

    #[test]
    fn test_screen_name_found() {
        let json = r#"{"response": {"object_id": 1, "type": "user"}}"#;
        let env: Envelope<ScreenNameLookup> = serde_json::from_str(json).unwrap();
        match env {
            Envelope::Response {
                response: ScreenNameLookup::Found(found),
            } => {
                assert_eq!(found.object_id, 1);
                assert_eq!(found.kind, ScreenNameKind::User);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_screen_name_unknown_kind() {
        let json = r#"{"response": {"object_id": 9, "type": "vk_app"}}"#;
        let env: Envelope<ScreenNameLookup> = serde_json::from_str(json).unwrap();
        assert!(matches!(
            env,
            Envelope::Response {
                response: ScreenNameLookup::Found(ResolvedScreenName {
                    kind: ScreenNameKind::Other,
                    ..
                })
            }
        ));
    }

    #[test]
    fn test_screen_name_not_found() {
        let json = r#"{"response": []}"#;
        let env: Envelope<ScreenNameLookup> = serde_json::from_str(json).unwrap();
        assert!(matches!(
            env,
            Envelope::Response {
                response: ScreenNameLookup::NotFound(_)
            }
        ));
    }

    #[test]
    fn test_photos_page() {
        let json = r#"{"response": {"count": 1, "items": [{
            "id": 457239017,
            "owner_id": 1,
            "album_id": -6,
            "date": 1682942400,
            "likes": {"count": 10, "user_likes": 0},
            "sizes": [
                {"type": "s", "url": "https://sun9.userapi.com/s.jpg", "width": 75, "height": 50},
                {"type": "z", "url": "https://sun9.userapi.com/z.jpg", "width": 1080, "height": 720}
            ]
        }]}}"#;
        let env: Envelope<PhotosPage> = serde_json::from_str(json).unwrap();
        let Envelope::Response { response: page } = env else {
            panic!("expected response envelope");
        };
        assert_eq!(page.count, 1);
        let photo = &page.items[0];
        assert_eq!(photo.likes.count, 10);
        assert_eq!(photo.sizes[1].tag, "z");
        assert_eq!(photo.sizes[1].url, "https://sun9.userapi.com/z.jpg");
    }

    #[test]
    fn test_photo_missing_likes_rejected() {
        let json = r#"{"response": {"count": 1, "items": [{
            "id": 1, "date": 1682942400, "sizes": []
        }]}}"#;
        assert!(serde_json::from_str::<Envelope<PhotosPage>>(json).is_err());
    }
}
