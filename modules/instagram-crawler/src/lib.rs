pub mod config;
pub mod crawler;
pub mod error;
pub mod hashtags;
pub mod normalize;
pub mod result;
pub mod types;

pub use config::CrawlerConfig;
pub use crawler::{Crawler, PageFetcher};
pub use error::{CrawlerError, Result};
pub use hashtags::extract_hashtags;
pub use result::{MediaSet, SimpleMedia};
pub use types::{
    Coordinate, Dimension, Location, Media, MediaFields, MediaKind, SearchResult, Tag, User,
};
