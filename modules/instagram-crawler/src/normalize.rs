//! Shape-agnostic normalization of decoded upstream JSON.
//!
//! Listing endpoints (tag, location, user timeline) and the single-post
//! detail endpoint all converge on one node structure once the orchestrator
//! has descended past the endpoint-specific wrapper. `media_from_node` is
//! the single mapping from that node to a [`Media`]; the other functions
//! here cover the profile, location-info, tag-info, and search payloads.

use serde_json::Value;

use crate::error::{CrawlerError, Result};
use crate::types::{Dimension, Location, Media, MediaFields, SearchResult, Tag, User};

/// Normalize one post node into a [`Media`].
///
/// Required fields (`id`, `shortcode`, `display_url`, `dimensions`,
/// `taken_at_timestamp`, like count, and `video_view_count` for videos)
/// raise [`CrawlerError::Shape`]; everything else defaults.
pub fn media_from_node(node: &Value) -> Result<Media> {
    let location = match node.get("location") {
        Some(loc) if !loc.is_null() => Some(Location::create(
            u64_at(loc, "/id")?,
            opt_str(loc, "/name").unwrap_or_default(),
            opt_str(loc, "/slug").unwrap_or_default(),
            None,
            None,
        )),
        _ => None,
    };

    let owner = required(node, "/owner")?;
    let owner = User::new(
        u64_at(owner, "/id")?,
        opt_str(owner, "/username").unwrap_or_default(),
        opt_str(owner, "/profile_pic_url").unwrap_or_default(),
        opt_str(owner, "/full_name").unwrap_or_default(),
        bool_or(owner, "/is_private", false),
    );

    let fields = MediaFields {
        id: u64_at(node, "/id")?,
        code: str_at(node, "/shortcode")?,
        url: String::new(), // filled per kind below
        dimension: Dimension {
            width: u32_at(node, "/dimensions/width")?,
            height: u32_at(node, "/dimensions/height")?,
        },
        taken_at: i64_at(node, "/taken_at_timestamp")?,
        owner,
        likes_count: u64_at(node, "/edge_media_preview_like/count")?,
        comments_count: u64_or(node, "/edge_media_to_comment/count", 0),
        is_ad: bool_or(node, "/is_ad", false),
        caption: opt_str(node, "/edge_media_to_caption/edges/0/node/text"),
        location,
    };

    if bool_or(node, "/is_video", false) {
        let thumbnail_url = str_at(node, "/display_url")?;
        let view_count = u64_at(node, "/video_view_count")?;
        let fields = MediaFields {
            url: opt_str(node, "/video_url").unwrap_or_default(),
            ..fields
        };
        Ok(Media::video(fields, thumbnail_url, view_count))
    } else {
        let fields = MediaFields {
            url: str_at(node, "/display_url")?,
            ..fields
        };
        Ok(Media::photo(fields))
    }
}

/// Normalize the `graphql.user` object of a profile page, extended fields
/// included.
pub fn user_from_profile(user: &Value) -> Result<User> {
    Ok(User {
        is_verified: bool_or(user, "/is_verified", false),
        biography: opt_str(user, "/biography"),
        external_url: opt_str(user, "/external_url"),
        follower_count: Some(u64_at(user, "/edge_followed_by/count")?),
        following_count: Some(u64_at(user, "/edge_follow/count")?),
        post_count: Some(u64_at(user, "/edge_owner_to_timeline_media/count")?),
        ..User::new(
            u64_at(user, "/id")?,
            str_at(user, "/username")?,
            opt_str(user, "/profile_pic_url").unwrap_or_default(),
            opt_str(user, "/full_name").unwrap_or_default(),
            bool_or(user, "/is_private", false),
        )
    })
}

/// Normalize the `location` object of a location info page.
pub fn location_from_info(location: &Value) -> Result<Location> {
    Ok(Location::create(
        u64_at(location, "/id")?,
        opt_str(location, "/name").unwrap_or_default(),
        opt_str(location, "/slug").unwrap_or_default(),
        opt_f64(location, "/lat"),
        opt_f64(location, "/lng"),
    ))
}

/// Normalize the `graphql.hashtag` object of a tag page.
pub fn tag_from_info(tag: &Value) -> Result<Tag> {
    Ok(Tag::new(
        str_at(tag, "/name")?,
        u64_at(tag, "/edge_hashtag_to_media/count")?,
    ))
}

/// Normalize a topsearch response into the three result sequences.
/// Search users carry `follower_count` (and the verified flag) but none of
/// the other extended profile fields.
pub fn search_from_response(body: &Value) -> Result<SearchResult> {
    let mut result = SearchResult::default();

    for entry in array_at(body, "/hashtags")? {
        let tag = required(entry, "/hashtag")?;
        result
            .tags
            .push(Tag::new(str_at(tag, "/name")?, u64_or(tag, "/media_count", 0)));
    }

    for entry in array_at(body, "/places")? {
        let place = required(entry, "/place")?;
        result.locations.push(Location::create(
            u64_at(place, "/location/pk")?,
            opt_str(place, "/title").unwrap_or_default(),
            opt_str(place, "/slug").unwrap_or_default(),
            opt_f64(place, "/location/lat"),
            opt_f64(place, "/location/lng"),
        ));
    }

    for entry in array_at(body, "/users")? {
        let user = required(entry, "/user")?;
        result.users.push(User {
            is_verified: bool_or(user, "/is_verified", false),
            follower_count: opt_u64(user, "/follower_count"),
            ..User::new(
                u64_at(user, "/pk")?,
                str_at(user, "/username")?,
                opt_str(user, "/profile_pic_url").unwrap_or_default(),
                opt_str(user, "/full_name").unwrap_or_default(),
                bool_or(user, "/is_private", false),
            )
        });
    }

    Ok(result)
}

// --- Typed accessors over serde_json::Value ---
//
// Upstream serves numeric ids as either JSON numbers or numeric strings
// depending on the endpoint, so the integer accessors take both. All paths
// are JSON pointers; `null` counts as missing.

pub(crate) fn required<'a>(value: &'a Value, ptr: &str) -> Result<&'a Value> {
    value
        .pointer(ptr)
        .filter(|v| !v.is_null())
        .ok_or_else(|| CrawlerError::Shape(format!("missing field {ptr}")))
}

pub(crate) fn array_at<'a>(value: &'a Value, ptr: &str) -> Result<&'a Vec<Value>> {
    required(value, ptr)?
        .as_array()
        .ok_or_else(|| CrawlerError::Shape(format!("expected array at {ptr}")))
}

pub(crate) fn str_at(value: &Value, ptr: &str) -> Result<String> {
    required(value, ptr)?
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| CrawlerError::Shape(format!("expected string at {ptr}")))
}

pub(crate) fn u64_at(value: &Value, ptr: &str) -> Result<u64> {
    match required(value, ptr)? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
    .ok_or_else(|| CrawlerError::Shape(format!("expected integer at {ptr}")))
}

pub(crate) fn i64_at(value: &Value, ptr: &str) -> Result<i64> {
    match required(value, ptr)? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
    .ok_or_else(|| CrawlerError::Shape(format!("expected integer at {ptr}")))
}

pub(crate) fn u32_at(value: &Value, ptr: &str) -> Result<u32> {
    u64_at(value, ptr)?
        .try_into()
        .map_err(|_| CrawlerError::Shape(format!("integer out of range at {ptr}")))
}

pub(crate) fn opt_str(value: &Value, ptr: &str) -> Option<String> {
    value.pointer(ptr).and_then(Value::as_str).map(str::to_string)
}

pub(crate) fn opt_f64(value: &Value, ptr: &str) -> Option<f64> {
    value.pointer(ptr).and_then(Value::as_f64)
}

pub(crate) fn opt_u64(value: &Value, ptr: &str) -> Option<u64> {
    value.pointer(ptr).and_then(Value::as_u64)
}

pub(crate) fn bool_or(value: &Value, ptr: &str, default: bool) -> bool {
    value.pointer(ptr).and_then(Value::as_bool).unwrap_or(default)
}

pub(crate) fn u64_or(value: &Value, ptr: &str, default: u64) -> u64 {
    value.pointer(ptr).and_then(Value::as_u64).unwrap_or(default)
}
