use std::sync::Arc;

use async_trait::async_trait;
use instaweb_client::{InstawebClient, InstawebError, BASE_URI};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::CrawlerConfig;
use crate::error::Result;
use crate::normalize::{self, array_at, media_from_node, required, str_at};
use crate::result::MediaSet;
use crate::types::{Location, Media, SearchResult, Tag, User};

const SEARCH_CONTEXT: &str = "blended";

/// Transport seam: GET a page in web-JSON mode and decode the body.
/// Implemented by [`InstawebClient`] for the live endpoints and by mocks
/// in tests.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn get_json(
        &self,
        path: &str,
        extra_query: &[(&str, &str)],
    ) -> std::result::Result<Value, InstawebError>;
}

#[async_trait]
impl PageFetcher for InstawebClient {
    async fn get_json(
        &self,
        path: &str,
        extra_query: &[(&str, &str)],
    ) -> std::result::Result<Value, InstawebError> {
        InstawebClient::get_json(self, path, extra_query).await
    }
}

/// Fetch orchestrator. Every listing operation returns an owned
/// [`MediaSet`] value; there is no state held between calls.
pub struct Crawler {
    fetcher: Arc<dyn PageFetcher>,
    config: CrawlerConfig,
    base_uri: String,
}

impl Crawler {
    pub fn new(fetcher: Arc<dyn PageFetcher>, config: CrawlerConfig) -> Self {
        Self {
            fetcher,
            config,
            base_uri: BASE_URI.to_string(),
        }
    }

    /// Crawler against the live endpoints, config from the environment.
    pub fn from_env() -> Self {
        Self::new(Arc::new(InstawebClient::new()), CrawlerConfig::from_env())
    }

    /// Override the origin used for permalink reconstruction in the simple
    /// projection.
    pub fn with_base_uri(mut self, base_uri: impl Into<String>) -> Self {
        self.base_uri = base_uri.into();
        self
    }

    /// Recently tagged media for a hashtag.
    pub async fn media_by_tag(&self, name: &str) -> Result<MediaSet> {
        info!(tag = name, "fetching media by tag");
        let body = self
            .fetcher
            .get_json(&format!("/explore/tags/{name}"), &[])
            .await?;
        let edges = array_at(&body, "/graphql/hashtag/edge_hashtag_to_media/edges")?;

        if self.config.async_fetch {
            self.media_batch(listing_codes(edges, "/node/shortcode")?)
                .await
        } else {
            self.listing_set(edges)
        }
    }

    /// Recent media published from a location.
    pub async fn media_by_location(&self, id: u64) -> Result<MediaSet> {
        info!(location = id, "fetching media by location");
        let body = self
            .fetcher
            .get_json(&format!("/explore/locations/{id}"), &[])
            .await?;

        // The async path reads the older wrapper, whose node identifier is
        // `code` rather than `shortcode`.
        if self.config.async_fetch {
            let nodes = array_at(&body, "/location/media/nodes")?;
            self.media_batch(listing_codes(nodes, "/code")?).await
        } else {
            let edges = array_at(&body, "/graphql/location/edge_location_to_media/edges")?;
            self.listing_set(edges)
        }
    }

    /// The most recent media published by a user.
    pub async fn media_by_user(&self, username: &str) -> Result<MediaSet> {
        info!(username, "fetching media by user");
        let body = self.fetcher.get_json(&format!("/{username}"), &[]).await?;
        let edges = array_at(&body, "/graphql/user/edge_owner_to_timeline_media/edges")?;

        if self.config.async_fetch {
            self.media_batch(listing_codes(edges, "/node/shortcode")?)
                .await
        } else {
            self.listing_set(edges)
        }
    }

    /// One media post by its short code.
    pub async fn media(&self, code: &str) -> Result<Media> {
        // debug, not info: the batch path resolves one of these per code.
        debug!(code, "fetching media");
        let body = self.fetcher.get_json(&format!("/p/{code}"), &[]).await?;
        media_from_node(required(&body, "/graphql/shortcode_media")?)
    }

    /// A user profile with the extended fields populated.
    pub async fn user_profile(&self, username: &str) -> Result<User> {
        info!(username, "fetching user profile");
        let body = self.fetcher.get_json(&format!("/{username}"), &[]).await?;
        normalize::user_from_profile(required(&body, "/graphql/user")?)
    }

    /// Location details, coordinate included when upstream carries one.
    pub async fn location_info(&self, id: u64) -> Result<Location> {
        info!(location = id, "fetching location info");
        let body = self
            .fetcher
            .get_json(&format!("/explore/locations/{id}"), &[])
            .await?;
        normalize::location_from_info(required(&body, "/location")?)
    }

    /// Tag details with its media count.
    pub async fn tag_info(&self, name: &str) -> Result<Tag> {
        info!(tag = name, "fetching tag info");
        let body = self
            .fetcher
            .get_json(&format!("/explore/tags/{name}"), &[])
            .await?;
        normalize::tag_from_info(required(&body, "/graphql/hashtag")?)
    }

    /// Free-text search over hashtags, places, and users.
    pub async fn search(&self, query: &str) -> Result<SearchResult> {
        info!(query, "searching");
        let body = self
            .fetcher
            .get_json(
                "/web/search/topsearch",
                &[("query", query), ("context", SEARCH_CONTEXT)],
            )
            .await?;
        normalize::search_from_response(&body)
    }

    fn listing_set(&self, edges: &[Value]) -> Result<MediaSet> {
        let media = edges
            .iter()
            .map(|edge| required(edge, "/node").and_then(media_from_node))
            .collect::<Result<Vec<_>>>()?;
        Ok(MediaSet::new(media, self.base_uri.clone()))
    }

    /// Resolve a listing through one concurrent detail fetch per code.
    /// Best-effort: all requests are issued at once and every one settles;
    /// failed or malformed items are dropped from the batch, never
    /// surfaced as an error.
    async fn media_batch(&self, codes: Vec<String>) -> Result<MediaSet> {
        info!(count = codes.len(), "resolving listing via concurrent detail fetches");

        let fetches = codes.iter().map(|code| async move {
            match self.media(code).await {
                Ok(media) => Some(media),
                Err(e) => {
                    warn!(code = code.as_str(), error = %e, "detail fetch failed, dropping from batch");
                    None
                }
            }
        });

        let settled = futures::future::join_all(fetches).await;
        Ok(MediaSet::new(
            settled.into_iter().flatten().collect(),
            self.base_uri.clone(),
        ))
    }
}

fn listing_codes(entries: &[Value], code_ptr: &str) -> Result<Vec<String>> {
    entries
        .iter()
        .map(|entry| str_at(entry, code_ptr))
        .collect()
}
