use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::types::Tag;

// The leading `\S*` lets a `#` embedded mid-word match without carrying the
// prefix into the captured name; the bracket alternative accepts
// `#[multi word]` tags.
static HASHTAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S*#((?:\[[^\]]+\]|\S+))").unwrap());

/// Pull hashtags out of a caption, preserving first-occurrence order and
/// collapsing exact duplicates. Captured text is kept as-is: no case
/// folding, no punctuation stripping.
pub fn extract_hashtags(caption: &str) -> Vec<Tag> {
    let mut seen = HashSet::new();
    let mut tags = Vec::new();
    for captures in HASHTAG_RE.captures_iter(caption) {
        let name = &captures[1];
        if seen.insert(name.to_string()) {
            tags.push(Tag::new(name, 0));
        }
    }
    tags
}
