//! Search term validation and request URL construction.

pub use reqwest::Url;

/// Hard cap on the number of results requested per search.
pub const MAX_RESULTS: u32 = 10;

/// A trimmed, non-empty search term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerm(String);

impl SearchTerm {
    /// Returns `None` for empty or whitespace-only input.
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SearchTerm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// `<base>?q=<term>&maxResults=<n>`, keeping any query pairs already on `base`.
/// `max_results` is clamped to [`MAX_RESULTS`].
pub fn build_search_url(base: &Url, term: &SearchTerm, max_results: u32) -> Url {
    let mut url = base.clone();
    let kept: Vec<(String, String)> = base
        .query_pairs()
        .filter(|(k, _)| k != "q" && k != "maxResults")
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    url.set_query(None);
    {
        let mut pairs = url.query_pairs_mut();
        for (k, v) in &kept {
            pairs.append_pair(k, v);
        }
        pairs
            .append_pair("q", term.as_str())
            .append_pair("maxResults", &max_results.clamp(1, MAX_RESULTS).to_string());
    }
    url
}
