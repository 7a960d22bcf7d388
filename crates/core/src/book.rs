//! Search result records and the per-row thumbnail types.

use serde::Serialize;

use crate::error::SearchError;

/// Author shown when the catalog lists none.
pub const UNKNOWN_AUTHOR: &str = "Unknown";

/// One search hit. Built once by the parser, never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Book {
    title: String,
    author: String,
    thumbnail_url: String,
    detail_url: String,
}

impl Book {
    /// `author` falls back to [`UNKNOWN_AUTHOR`] when `None`; a missing
    /// thumbnail becomes the empty string.
    pub fn new(
        title: impl Into<String>,
        author: Option<String>,
        thumbnail_url: Option<String>,
        detail_url: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.unwrap_or_else(|| UNKNOWN_AUTHOR.to_string()),
            thumbnail_url: thumbnail_url.unwrap_or_default(),
            detail_url: detail_url.into(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    /// Empty when the book has no cover.
    pub fn thumbnail_url(&self) -> &str {
        &self.thumbnail_url
    }

    pub fn detail_url(&self) -> &str {
        &self.detail_url
    }
}

/// Outcome of one search pipeline run.
pub type SearchResult = Result<Vec<Book>, SearchError>;

/// Identity of an on-screen row. Rows are recycled as the list scrolls, so a
/// slot shows different books over its lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SlotId(pub usize);

impl std::fmt::Display for SlotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "row#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThumbnailRequest {
    pub url: String,
    pub slot: SlotId,
}

/// A decoded cover image.
#[derive(Debug, Clone)]
pub struct Thumbnail {
    pub url: String,
    pub image: image::DynamicImage,
}

impl Thumbnail {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}
