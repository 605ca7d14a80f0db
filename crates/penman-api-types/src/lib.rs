//! Wire types shared by the penman client and its tests.
//!
//! Shapes follow the blog Post-API (`/posts/...`) and the profile login
//! endpoint (`/profiles/login`). Server timestamps are zone-less local
//! date-times (`2024-03-01T09:30:00`, optionally with fractional seconds).

use serde::{Deserialize, Serialize};
use time::PrimitiveDateTime;
use uuid::Uuid;

/// Content kind of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PostType {
    #[default]
    Post,
    Page,
}

/// A post as reported by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostRecord {
    pub id: Uuid,
    #[serde(default)]
    pub profile_id: Option<Uuid>,
    #[serde(rename = "type", default)]
    pub kind: PostType,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, with = "local_datetime::option")]
    pub created_at: Option<PrimitiveDateTime>,
    #[serde(default, with = "local_datetime::option")]
    pub updated_at: Option<PrimitiveDateTime>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, alias = "isPublished")]
    pub published: bool,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub view_count: u64,
}

/// Body of `POST /posts` and `PUT /posts/{id}`.
///
/// Optional fields are omitted from the JSON entirely when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostPayload {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(rename = "type")]
    pub kind: PostType,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    pub published: bool,
}

/// Response envelope used by every post endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
    #[serde(default)]
    pub pagination: Option<PaginationMeta>,
}

/// Page metadata reported alongside list responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationMeta {
    pub current_page: u32,
    #[serde(default)]
    pub per_page: Option<u32>,
    pub total_pages: u32,
    pub total_items: u64,
    #[serde(default)]
    pub next_page: Option<u32>,
    #[serde(default)]
    pub prev_page: Option<u32>,
}

/// Body of `POST /profiles/login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Successful login exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub profile: ProfileRecord,
}

/// Profile fields returned by the login exchange. All optional on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

/// Error body shape; servers put the human-readable reason in `message`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorBody {
    pub fn into_message(self) -> Option<String> {
        self.message
            .or(self.error)
            .filter(|message| !message.trim().is_empty())
    }
}

/// Serde adapter for zone-less `yyyy-mm-ddThh:mm:ss[.fff]` timestamps.
pub mod local_datetime {
    use serde::Serializer;
    use time::PrimitiveDateTime;
    use time::format_description::FormatItem;
    use time::macros::format_description;

    const PARSE_FORMAT: &[FormatItem<'static>] = format_description!(
        "[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]]"
    );
    const RENDER_FORMAT: &[FormatItem<'static>] =
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");

    fn serialize<S>(value: &PrimitiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let text = value
            .format(RENDER_FORMAT)
            .map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&text)
    }

    pub mod option {
        use serde::{Deserialize, Deserializer, Serializer};
        use time::PrimitiveDateTime;

        pub fn serialize<S>(
            value: &Option<PrimitiveDateTime>,
            serializer: S,
        ) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match value {
                Some(value) => super::serialize(value, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<PrimitiveDateTime>, D::Error>
        where
            D: Deserializer<'de>,
        {
            let text: Option<String> = Option::deserialize(deserializer)?;
            text.map(|text| {
                PrimitiveDateTime::parse(&text, super::PARSE_FORMAT)
                    .map_err(serde::de::Error::custom)
            })
            .transpose()
        }
    }
}
