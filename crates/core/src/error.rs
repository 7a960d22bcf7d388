use serde::Serialize;

/// Coarse failure category reported to the list view when a search run fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    Network,
    Parse,
}

/// Failure of one search pipeline run. Terminal for that run, never retried.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
}

impl SearchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SearchError::Network(_) => ErrorKind::Network,
            SearchError::Parse(_) => ErrorKind::Parse,
        }
    }
}

impl From<reqwest::Error> for SearchError {
    fn from(e: reqwest::Error) -> Self {
        SearchError::Network(e.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Malformed catalog response: {0}")]
    Malformed(String),
}

/// Cover fetch failure. Never leaves the fetcher: it is logged and the row
/// renders without a cover.
#[derive(Debug, thiserror::Error)]
pub enum ThumbnailError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Image decode failed: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Decode worker failed: {0}")]
    Worker(String),
}

impl From<reqwest::Error> for ThumbnailError {
    fn from(e: reqwest::Error) -> Self {
        ThumbnailError::Network(e.to_string())
    }
}

/// A search request refused before the pipeline was started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SearchRejected {
    #[error("No search term entered")]
    EmptyTerm,

    #[error("No network connection")]
    Offline,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid search URL {url}: {detail}")]
    InvalidUrl { url: String, detail: String },

    #[error("HTTP client setup failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Config encode error: {0}")]
    TomlEncode(#[from] toml::ser::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
