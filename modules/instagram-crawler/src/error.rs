/// Result type alias for crawler operations.
pub type Result<T> = std::result::Result<T, CrawlerError>;

#[derive(Debug, thiserror::Error)]
pub enum CrawlerError {
    #[error("Unexpected response shape: {0}")]
    Shape(String),

    #[error("Transport error: {0}")]
    Transport(#[from] instaweb_client::InstawebError),
}
