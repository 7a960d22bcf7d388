//! One search run: term → request URL → GET → parsed books.

use std::time::Duration;

use reqwest::Url;

use crate::book::SearchResult;
use crate::config::SearchConfig;
use crate::error::{ConfigError, SearchError};
use crate::parser::parse_volumes;
use crate::query::{build_search_url, SearchTerm};

/// Stateless search runner. Ordering between concurrent runs is the caller's
/// concern (see [`crate::list::BookList`]).
#[derive(Debug, Clone)]
pub struct SearchPipeline {
    http: reqwest::Client,
    base_url: Url,
    max_results: u32,
}

impl SearchPipeline {
    pub fn new(config: &SearchConfig) -> Result<Self, ConfigError> {
        let base_url = Url::parse(&config.base_url).map_err(|e| ConfigError::InvalidUrl {
            url: config.base_url.clone(),
            detail: e.to_string(),
        })?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()?;
        Ok(Self {
            http,
            base_url,
            max_results: config.max_results,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn request_url(&self, term: &SearchTerm) -> Url {
        build_search_url(&self.base_url, term, self.max_results)
    }

    /// Fetch and parse one page of results. Transport problems and non-2xx
    /// statuses are `Network`; an unintelligible body is `Parse`.
    pub async fn run(&self, term: &SearchTerm) -> SearchResult {
        let url = self.request_url(term);
        tracing::debug!(%url, "requesting volumes");

        let response = self.http.get(url).send().await?.error_for_status()?;
        let body = response.bytes().await?;
        let books = parse_volumes(&body).map_err(SearchError::from)?;

        tracing::debug!(term = %term, count = books.len(), "search parsed");
        Ok(books)
    }
}
