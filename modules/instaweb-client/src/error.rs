use thiserror::Error;

pub type Result<T> = std::result::Result<T, InstawebError>;

#[derive(Debug, Error)]
pub enum InstawebError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

impl From<reqwest::Error> for InstawebError {
    fn from(err: reqwest::Error) -> Self {
        InstawebError::Network(err.to_string())
    }
}
