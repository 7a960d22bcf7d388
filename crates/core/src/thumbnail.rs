//! Cover image fetching for result rows.
//!
//! A fetch never fails outward: network errors, error statuses and bodies
//! that don't decode as an image all collapse to "no cover" and are logged.
//! Nothing is retried.

use std::sync::Arc;
use std::time::Duration;

use image::DynamicImage;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

use crate::book::{Thumbnail, ThumbnailRequest};
use crate::config::ThumbnailConfig;
use crate::error::{ConfigError, ThumbnailError};
use crate::list::Event;

#[derive(Debug, Clone)]
pub struct ThumbnailFetcher {
    http: reqwest::Client,
    max_dimension: u32,
}

impl ThumbnailFetcher {
    pub fn new(config: &ThumbnailConfig) -> Result<Self, ConfigError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            max_dimension: config.max_dimension,
        })
    }

    /// Fetch and decode the cover at `url`. An empty url returns `None`
    /// without touching the network.
    pub async fn fetch(&self, url: &str) -> Option<Thumbnail> {
        if url.is_empty() {
            return None;
        }
        match self.try_fetch(url).await {
            Ok(thumbnail) => Some(thumbnail),
            Err(e) => {
                tracing::warn!(url, "cover unavailable: {e}");
                None
            }
        }
    }

    async fn try_fetch(&self, url: &str) -> Result<Thumbnail, ThumbnailError> {
        let body = self.http.get(url).send().await?.error_for_status()?.bytes().await?;
        let max = self.max_dimension;
        let image = tokio::task::spawn_blocking(move || decode_cover(&body, max))
            .await
            .map_err(|e| ThumbnailError::Worker(e.to_string()))??;
        Ok(Thumbnail {
            url: url.to_string(),
            image,
        })
    }

    /// Run the fetch on a background task and post the outcome, tagged with
    /// the slot's request `token`, to the foreground event channel.
    pub fn dispatch(
        self: &Arc<Self>,
        request: ThumbnailRequest,
        token: u64,
        events: UnboundedSender<Event>,
    ) -> JoinHandle<()> {
        let fetcher = Arc::clone(self);
        tokio::spawn(async move {
            let image = fetcher.fetch(&request.url).await;
            // The receiver is gone once the list is dropped; nothing to deliver to.
            let _ = events.send(Event::Thumbnail {
                slot: request.slot,
                token,
                url: request.url,
                image,
            });
        })
    }
}

/// Decode an image body, downscaling it to fit `max_dimension` (0 disables).
pub fn decode_cover(bytes: &[u8], max_dimension: u32) -> Result<DynamicImage, image::ImageError> {
    let image = image::load_from_memory(bytes)?;
    if max_dimension > 0 && (image.width() > max_dimension || image.height() > max_dimension) {
        Ok(image.thumbnail(max_dimension, max_dimension))
    } else {
        Ok(image)
    }
}
