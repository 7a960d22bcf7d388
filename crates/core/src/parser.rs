//! Volume search response parsing.
//!
//! The catalog answers with a JSON object holding the hits under `items`.
//! Individual entries are allowed to be incomplete: an entry that can't be
//! rendered as a usable row is skipped, while a response whose top-level
//! shape is wrong is rejected as a whole.

use serde_json::Value;

use crate::book::Book;
use crate::error::ParseError;

/// Parse a raw volume search response into books, preserving relevance order.
pub fn parse_volumes(raw: &[u8]) -> Result<Vec<Book>, ParseError> {
    let v: Value = serde_json::from_slice(raw).map_err(|e| ParseError::Malformed(e.to_string()))?;
    let root = v
        .as_object()
        .ok_or_else(|| ParseError::Malformed("response is not a JSON object".to_string()))?;

    let items = match root.get("items") {
        Some(Value::Array(items)) => items,
        Some(_) => return Err(ParseError::Malformed("`items` is not an array".to_string())),
        // The catalog drops `items` altogether when nothing matched.
        None if root.get("totalItems").and_then(Value::as_u64) == Some(0) => return Ok(Vec::new()),
        None => return Err(ParseError::Malformed("missing `items`".to_string())),
    };

    let mut books = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        match parse_item(item) {
            Some(book) => books.push(book),
            None => tracing::debug!(index, "skipping catalog entry without title or detail link"),
        }
    }
    Ok(books)
}

fn parse_item(item: &Value) -> Option<Book> {
    let info = item.get("volumeInfo")?;

    let title = non_blank(info.get("title"))?;
    let detail_url = non_blank(info.get("infoLink")).or_else(|| non_blank(info.get("canonicalVolumeLink")))?;

    let authors: Vec<&str> = info
        .get("authors")
        .and_then(|a| a.as_array())
        .map(|a| a.iter().filter_map(|v| v.as_str()).map(str::trim).filter(|s| !s.is_empty()).collect())
        .unwrap_or_default();
    let author = if authors.is_empty() { None } else { Some(authors.join(", ")) };

    let thumbnail_url = info.get("imageLinks").and_then(|links| {
        non_blank(links.get("thumbnail")).or_else(|| non_blank(links.get("smallThumbnail")))
    });

    Some(Book::new(title, author, thumbnail_url, detail_url))
}

fn non_blank(v: Option<&Value>) -> Option<String> {
    v.and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}
