use std::env;

/// Crawler configuration loaded from environment variables.
#[derive(Debug, Clone, Copy, Default)]
pub struct CrawlerConfig {
    /// When set, listing fetches resolve every listed post with one
    /// concurrent detail request per short code instead of normalizing
    /// the listing nodes in place.
    pub async_fetch: bool,
}

impl CrawlerConfig {
    /// Load configuration from environment variables. Everything is
    /// optional; the default is one synchronous request per operation.
    pub fn from_env() -> Self {
        Self {
            async_fetch: env::var("INSTAGRAM_ASYNC_FETCH")
                .map(|v| truthy(&v))
                .unwrap_or(false),
        }
    }
}

fn truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
