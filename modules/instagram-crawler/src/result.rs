use serde::Serialize;

use crate::types::{Media, MediaKind};

/// One batch of normalized media from a listing fetch. Owns its rows; the
/// projections are read-only views over them.
#[derive(Debug, Clone)]
pub struct MediaSet {
    media: Vec<Media>,
    base_uri: String,
}

/// Flat, serialization-friendly row for one media entry. `id` and
/// `username` describe the owner; `url` is the post permalink rebuilt from
/// the base origin and the short code, never taken verbatim from upstream.
#[derive(Debug, Clone, Serialize)]
pub struct SimpleMedia {
    pub id: u64,
    pub username: String,
    pub image_url: String,
    pub url: String,
    pub comments: u64,
    pub likes: u64,
    pub tags: Vec<String>,
    #[serde(rename = "type")]
    pub media_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumb: Option<String>,
}

impl MediaSet {
    pub(crate) fn new(media: Vec<Media>, base_uri: impl Into<String>) -> Self {
        Self {
            media,
            base_uri: base_uri.into(),
        }
    }

    /// Full projection: the typed entities, unchanged.
    pub fn full(&self) -> &[Media] {
        &self.media
    }

    pub fn into_full(self) -> Vec<Media> {
        self.media
    }

    pub fn len(&self) -> usize {
        self.media.len()
    }

    pub fn is_empty(&self) -> bool {
        self.media.is_empty()
    }

    /// Simple projection: one flat row per media, `thumb` only for videos.
    pub fn simple(&self) -> Vec<SimpleMedia> {
        self.media
            .iter()
            .map(|m| {
                let (media_type, thumb) = match &m.kind {
                    MediaKind::Photo => ("photo", None),
                    MediaKind::Video { thumbnail_url, .. } => {
                        ("video", Some(thumbnail_url.clone()))
                    }
                };

                SimpleMedia {
                    id: m.owner.id,
                    username: m.owner.username.clone(),
                    image_url: m.url.clone(),
                    url: format!("{}/p/{}", self.base_uri, m.code),
                    comments: m.comments_count,
                    likes: m.likes_count,
                    tags: m.tags.iter().map(|t| t.name.clone()).collect(),
                    media_type: media_type.to_string(),
                    thumb,
                }
            })
            .collect()
    }
}
