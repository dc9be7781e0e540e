//! Orchestrator tests: mock transport, canned payloads, no network.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use instagram_crawler::{Crawler, CrawlerConfig, MediaKind, PageFetcher};
use instaweb_client::InstawebError;
use serde_json::{json, Value};

// ---------------------------------------------------------------------------
// Mock transport
// ---------------------------------------------------------------------------

#[derive(Default)]
struct MockFetcher {
    responses: HashMap<String, Value>,
    failures: HashSet<String>,
    calls: Mutex<Vec<String>>,
}

impl MockFetcher {
    fn new() -> Self {
        Self::default()
    }

    fn on(mut self, path: &str, body: Value) -> Self {
        self.responses.insert(path.to_string(), body);
        self
    }

    fn fail(mut self, path: &str) -> Self {
        self.failures.insert(path.to_string());
        self
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageFetcher for MockFetcher {
    async fn get_json(
        &self,
        path: &str,
        _extra_query: &[(&str, &str)],
    ) -> Result<Value, InstawebError> {
        self.calls.lock().unwrap().push(path.to_string());

        if self.failures.contains(path) {
            return Err(InstawebError::Api {
                status: 500,
                message: "injected failure".to_string(),
            });
        }

        self.responses.get(path).cloned().ok_or(InstawebError::Api {
            status: 404,
            message: format!("no fixture for {path}"),
        })
    }
}

fn crawler(fetcher: &Arc<MockFetcher>, async_fetch: bool) -> Crawler {
    Crawler::new(fetcher.clone(), CrawlerConfig { async_fetch })
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

fn photo_node(code: &str, username: &str, caption: &str) -> Value {
    json!({
        "id": "111",
        "shortcode": code,
        "is_video": false,
        "display_url": format!("https://cdn.example/{code}.jpg"),
        "dimensions": {"width": 1080, "height": 1080},
        "taken_at_timestamp": 1_700_000_000,
        "owner": {
            "id": "42",
            "username": username,
            "profile_pic_url": "https://cdn.example/pic.jpg",
            "full_name": "Some One",
            "is_private": false
        },
        "edge_media_preview_like": {"count": 10},
        "edge_media_to_comment": {"count": 3},
        "edge_media_to_caption": {
            "edges": [{"node": {"text": caption}}]
        }
    })
}

fn video_node(code: &str, username: &str) -> Value {
    let mut node = photo_node(code, username, "#reel");
    node["is_video"] = json!(true);
    node["video_url"] = json!(format!("https://cdn.example/{code}.mp4"));
    node["video_view_count"] = json!(777);
    node
}

fn tag_listing(nodes: Vec<Value>) -> Value {
    json!({
        "graphql": {
            "hashtag": {
                "name": "sunset",
                "edge_hashtag_to_media": {
                    "count": 12345,
                    "edges": nodes.into_iter().map(|n| json!({"node": n})).collect::<Vec<_>>()
                }
            }
        }
    })
}

fn detail_page(node: Value) -> Value {
    json!({"graphql": {"shortcode_media": node}})
}

// ---------------------------------------------------------------------------
// Listing fetches, synchronous path
// ---------------------------------------------------------------------------

#[tokio::test]
async fn tag_listing_normalizes_nodes_in_place() {
    let fetcher = Arc::new(MockFetcher::new().on(
        "/explore/tags/sunset",
        tag_listing(vec![
            photo_node("aaa", "alice", "#sunset over the bay"),
            video_node("bbb", "bob"),
        ]),
    ));

    let set = crawler(&fetcher, false).media_by_tag("sunset").await.unwrap();

    assert_eq!(set.len(), 2);
    assert_eq!(set.full()[0].code, "aaa");
    assert!(set.full()[1].is_video());
    // One listing request, no per-post fetches.
    assert_eq!(fetcher.calls(), vec!["/explore/tags/sunset"]);
}

#[tokio::test]
async fn location_listing_normalizes_nodes_in_place() {
    let fetcher = Arc::new(MockFetcher::new().on(
        "/explore/locations/123",
        json!({
            "graphql": {
                "location": {
                    "edge_location_to_media": {
                        "edges": [{"node": photo_node("ccc", "carol", "")}]
                    }
                }
            }
        }),
    ));

    let set = crawler(&fetcher, false)
        .media_by_location(123)
        .await
        .unwrap();

    assert_eq!(set.len(), 1);
    assert_eq!(set.full()[0].owner.username, "carol");
}

#[tokio::test]
async fn user_listing_normalizes_nodes_in_place() {
    let fetcher = Arc::new(MockFetcher::new().on(
        "/alice",
        json!({
            "graphql": {
                "user": {
                    "edge_owner_to_timeline_media": {
                        "edges": [{"node": photo_node("ddd", "alice", "#morning")}]
                    }
                }
            }
        }),
    ));

    let set = crawler(&fetcher, false).media_by_user("alice").await.unwrap();

    assert_eq!(set.len(), 1);
    assert_eq!(set.full()[0].tags[0].name, "morning");
}

#[tokio::test]
async fn listing_fetch_failure_propagates() {
    let fetcher = Arc::new(MockFetcher::new().fail("/explore/tags/sunset"));
    let err = crawler(&fetcher, false).media_by_tag("sunset").await;
    assert!(err.is_err());
}

#[tokio::test]
async fn malformed_listing_shape_is_an_error() {
    let fetcher = Arc::new(MockFetcher::new().on("/explore/tags/sunset", json!({"graphql": {}})));
    let err = crawler(&fetcher, false).media_by_tag("sunset").await;
    assert!(err.is_err());
}

// ---------------------------------------------------------------------------
// Listing fetches, concurrent batch path
// ---------------------------------------------------------------------------

#[tokio::test]
async fn async_tag_listing_refetches_each_code() {
    let fetcher = Arc::new(
        MockFetcher::new()
            .on(
                "/explore/tags/sunset",
                tag_listing(vec![
                    photo_node("aaa", "alice", ""),
                    photo_node("bbb", "bob", ""),
                ]),
            )
            .on("/p/aaa", detail_page(photo_node("aaa", "alice", "#detail")))
            .on("/p/bbb", detail_page(video_node("bbb", "bob"))),
    );

    let set = crawler(&fetcher, true).media_by_tag("sunset").await.unwrap();

    assert_eq!(set.len(), 2);
    // Detail nodes win over listing nodes.
    assert_eq!(set.full()[0].tags[0].name, "detail");

    let calls = fetcher.calls();
    assert!(calls.contains(&"/p/aaa".to_string()));
    assert!(calls.contains(&"/p/bbb".to_string()));
}

#[tokio::test]
async fn batch_drops_failed_codes_and_keeps_the_rest() {
    let fetcher = Arc::new(
        MockFetcher::new()
            .on(
                "/explore/tags/sunset",
                tag_listing(vec![
                    photo_node("a", "alice", ""),
                    photo_node("b", "bob", ""),
                    photo_node("c", "carol", ""),
                ]),
            )
            .on("/p/a", detail_page(photo_node("a", "alice", "")))
            .fail("/p/b")
            .on("/p/c", detail_page(photo_node("c", "carol", ""))),
    );

    let set = crawler(&fetcher, true).media_by_tag("sunset").await.unwrap();

    let codes: Vec<&str> = set.full().iter().map(|m| m.code.as_str()).collect();
    assert_eq!(codes.len(), 2);
    assert!(codes.contains(&"a"));
    assert!(codes.contains(&"c"));
    assert!(!codes.contains(&"b"));
}

#[tokio::test]
async fn batch_drops_malformed_detail_payloads() {
    let fetcher = Arc::new(
        MockFetcher::new()
            .on(
                "/explore/tags/sunset",
                tag_listing(vec![
                    photo_node("a", "alice", ""),
                    photo_node("b", "bob", ""),
                ]),
            )
            .on("/p/a", detail_page(photo_node("a", "alice", "")))
            .on("/p/b", json!({"graphql": {}})),
    );

    let set = crawler(&fetcher, true).media_by_tag("sunset").await.unwrap();

    assert_eq!(set.len(), 1);
    assert_eq!(set.full()[0].code, "a");
}

#[tokio::test]
async fn async_location_listing_reads_code_nodes() {
    let fetcher = Arc::new(
        MockFetcher::new()
            .on(
                "/explore/locations/123",
                json!({
                    "location": {
                        "media": {
                            "nodes": [{"code": "xyz"}]
                        }
                    }
                }),
            )
            .on("/p/xyz", detail_page(photo_node("xyz", "dave", ""))),
    );

    let set = crawler(&fetcher, true).media_by_location(123).await.unwrap();

    assert_eq!(set.len(), 1);
    assert_eq!(set.full()[0].code, "xyz");
    assert!(fetcher.calls().contains(&"/p/xyz".to_string()));
}

// ---------------------------------------------------------------------------
// Single-entity fetches
// ---------------------------------------------------------------------------

#[tokio::test]
async fn single_media_is_returned_directly() {
    let fetcher = Arc::new(
        MockFetcher::new().on("/p/abc", detail_page(video_node("abc", "erin"))),
    );

    let media = crawler(&fetcher, false).media("abc").await.unwrap();

    assert!(media.is_video());
    assert_eq!(media.url, "https://cdn.example/abc.mp4");
    match media.kind {
        MediaKind::Video { view_count, .. } => assert_eq!(view_count, 777),
        MediaKind::Photo => panic!("expected a video"),
    }
}

#[tokio::test]
async fn user_profile_populates_extended_fields() {
    let fetcher = Arc::new(MockFetcher::new().on(
        "/alice",
        json!({
            "graphql": {
                "user": {
                    "id": "42",
                    "username": "alice",
                    "profile_pic_url": "https://cdn.example/pic.jpg",
                    "full_name": "Alice A",
                    "is_private": false,
                    "is_verified": true,
                    "biography": "hello",
                    "external_url": "https://alice.example",
                    "edge_followed_by": {"count": 1000},
                    "edge_follow": {"count": 50},
                    "edge_owner_to_timeline_media": {"count": 12}
                }
            }
        }),
    ));

    let user = crawler(&fetcher, false).user_profile("alice").await.unwrap();

    assert_eq!(user.id, 42);
    assert!(user.is_verified);
    assert_eq!(user.follower_count, Some(1000));
    assert_eq!(user.following_count, Some(50));
    assert_eq!(user.post_count, Some(12));
}

#[tokio::test]
async fn location_info_carries_the_coordinate() {
    let fetcher = Arc::new(MockFetcher::new().on(
        "/explore/locations/123",
        json!({
            "location": {
                "id": "123",
                "name": "Harbor",
                "slug": "harbor",
                "lat": 59.91,
                "lng": 10.75
            }
        }),
    ));

    let location = crawler(&fetcher, false).location_info(123).await.unwrap();

    assert_eq!(location.name, "Harbor");
    let coord = location.coordinate.expect("coordinate should be present");
    assert_eq!(coord.latitude, 59.91);
    assert_eq!(coord.longitude, 10.75);
}

#[tokio::test]
async fn tag_info_carries_the_media_count() {
    let fetcher = Arc::new(MockFetcher::new().on(
        "/explore/tags/sunset",
        tag_listing(vec![photo_node("aaa", "alice", "")]),
    ));

    let tag = crawler(&fetcher, false).tag_info("sunset").await.unwrap();

    assert_eq!(tag.name, "sunset");
    assert_eq!(tag.count, 12345);
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

#[tokio::test]
async fn search_returns_the_three_sequences() {
    let fetcher = Arc::new(MockFetcher::new().on(
        "/web/search/topsearch",
        json!({
            "hashtags": [
                {"hashtag": {"name": "sunset", "media_count": 999}}
            ],
            "places": [
                {"place": {
                    "title": "Harbor",
                    "slug": "harbor",
                    "location": {"pk": "321", "lat": 59.91, "lng": 10.75}
                }}
            ],
            "users": [
                {"user": {
                    "pk": "42",
                    "username": "alice",
                    "profile_pic_url": "",
                    "full_name": "Alice A",
                    "is_private": false,
                    "is_verified": false,
                    "follower_count": 1000
                }}
            ]
        }),
    ));

    let result = crawler(&fetcher, false).search("sunset").await.unwrap();

    assert_eq!(result.tags.len(), 1);
    assert_eq!(result.tags[0].count, 999);

    assert_eq!(result.locations.len(), 1);
    assert!(result.locations[0].coordinate.is_some());

    assert_eq!(result.users.len(), 1);
    assert_eq!(result.users[0].follower_count, Some(1000));
    assert!(result.users[0].biography.is_none());
}

// ---------------------------------------------------------------------------
// Projections over a fetched set
// ---------------------------------------------------------------------------

#[tokio::test]
async fn simple_projection_rebuilds_permalinks() {
    let fetcher = Arc::new(MockFetcher::new().on(
        "/explore/tags/sunset",
        tag_listing(vec![
            photo_node("aaa", "alice", "#sunset"),
            video_node("bbb", "bob"),
        ]),
    ));

    let set = crawler(&fetcher, false).media_by_tag("sunset").await.unwrap();
    let rows = set.simple();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].url, "https://www.instagram.com/p/aaa");
    assert_eq!(rows[0].media_type, "photo");
    assert!(rows[0].thumb.is_none());
    assert_eq!(rows[1].media_type, "video");
    assert_eq!(rows[1].thumb.as_deref(), Some("https://cdn.example/bbb.jpg"));
}
