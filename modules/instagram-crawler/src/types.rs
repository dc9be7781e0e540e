use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::hashtags::extract_hashtags;

/// A hashtag, without the leading `#`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tag {
    pub name: String,
    /// Media count when known (tag info, search results); 0 otherwise.
    pub count: u64,
}

impl Tag {
    pub fn new(name: impl Into<String>, count: u64) -> Self {
        Self {
            name: name.into(),
            count,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Location {
    pub id: u64,
    pub name: String,
    pub slug: String,
    pub coordinate: Option<Coordinate>,
}

impl Location {
    /// A coordinate is attached only when both ordinates are present and
    /// non-zero; it is never partially populated. A 0.0 ordinate reads as
    /// absent, so points exactly on the equator or prime meridian lose
    /// their coordinate (see DESIGN.md).
    pub fn create(
        id: u64,
        name: impl Into<String>,
        slug: impl Into<String>,
        latitude: Option<f64>,
        longitude: Option<f64>,
    ) -> Self {
        let coordinate = match (latitude, longitude) {
            (Some(lat), Some(lng)) if lat != 0.0 && lng != 0.0 => Some(Coordinate {
                latitude: lat,
                longitude: lng,
            }),
            _ => None,
        };

        Self {
            id,
            name: name.into(),
            slug: slug.into(),
            coordinate,
        }
    }
}

/// A user. The basic field set is present on every payload shape; the
/// extended fields are populated only by direct profile lookups (and
/// `follower_count` additionally by search results).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct User {
    pub id: u64,
    pub username: String,
    pub profile_pic_url: String,
    pub full_name: String,
    pub is_private: bool,
    pub is_verified: bool,
    pub biography: Option<String>,
    pub external_url: Option<String>,
    pub follower_count: Option<u64>,
    pub following_count: Option<u64>,
    pub post_count: Option<u64>,
}

impl User {
    /// A user with only the basic fields; extended fields stay absent.
    pub fn new(
        id: u64,
        username: impl Into<String>,
        profile_pic_url: impl Into<String>,
        full_name: impl Into<String>,
        is_private: bool,
    ) -> Self {
        Self {
            id,
            username: username.into(),
            profile_pic_url: profile_pic_url.into(),
            full_name: full_name.into(),
            is_private,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Dimension {
    pub width: u32,
    pub height: u32,
}

/// Photo/video split. The enum makes "exactly one of the two" structural.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum MediaKind {
    Photo,
    Video {
        thumbnail_url: String,
        view_count: u64,
    },
}

/// One published post, photo or video.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Media {
    pub id: u64,
    pub code: String,
    pub url: String,
    pub dimension: Dimension,
    pub taken_at: DateTime<Utc>,
    pub owner: User,
    /// Derived solely from `caption`; empty when the caption is absent.
    pub tags: Vec<Tag>,
    pub likes_count: u64,
    pub comments_count: u64,
    pub is_ad: bool,
    pub caption: Option<String>,
    pub location: Option<Location>,
    pub kind: MediaKind,
}

/// The field set shared by both media kinds, as handed to the constructors.
#[derive(Debug, Clone)]
pub struct MediaFields {
    pub id: u64,
    pub code: String,
    /// Display image URL for photos, video URL for videos.
    pub url: String,
    pub dimension: Dimension,
    /// Unix epoch seconds.
    pub taken_at: i64,
    pub owner: User,
    pub likes_count: u64,
    pub comments_count: u64,
    pub is_ad: bool,
    pub caption: Option<String>,
    pub location: Option<Location>,
}

impl Media {
    pub fn photo(fields: MediaFields) -> Self {
        Self::assemble(MediaKind::Photo, fields)
    }

    pub fn video(fields: MediaFields, thumbnail_url: String, view_count: u64) -> Self {
        Self::assemble(
            MediaKind::Video {
                thumbnail_url,
                view_count,
            },
            fields,
        )
    }

    pub fn is_video(&self) -> bool {
        matches!(self.kind, MediaKind::Video { .. })
    }

    pub fn thumbnail_url(&self) -> Option<&str> {
        match &self.kind {
            MediaKind::Video { thumbnail_url, .. } => Some(thumbnail_url),
            MediaKind::Photo => None,
        }
    }

    fn assemble(kind: MediaKind, fields: MediaFields) -> Self {
        let tags = fields
            .caption
            .as_deref()
            .map(extract_hashtags)
            .unwrap_or_default();

        Self {
            id: fields.id,
            code: fields.code,
            url: fields.url,
            dimension: fields.dimension,
            taken_at: DateTime::from_timestamp(fields.taken_at, 0).unwrap_or(DateTime::UNIX_EPOCH),
            owner: fields.owner,
            tags,
            likes_count: fields.likes_count,
            comments_count: fields.comments_count,
            is_ad: fields.is_ad,
            caption: fields.caption,
            location: fields.location,
            kind,
        }
    }
}

/// Mixed result of a free-text search.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchResult {
    pub tags: Vec<Tag>,
    pub locations: Vec<Location>,
    pub users: Vec<User>,
}
