#![allow(dead_code)]

use std::io::Cursor;

use booklistings_core::config::{SearchConfig, ThumbnailConfig};
use booklistings_core::prelude::*;
use booklistings_core::pipeline::SearchPipeline;
use booklistings_core::thumbnail::ThumbnailFetcher;
use serde_json::{json, Value};

pub const VOLUMES_PATH: &str = "/books/v1/volumes";

/// List view that records every callback.
#[derive(Default)]
pub struct Recorder {
    pub started: usize,
    pub succeeded: Vec<Vec<Book>>,
    pub failed: Vec<ErrorKind>,
    pub covers: Vec<(SlotId, Option<(u32, u32)>)>,
}

impl Recorder {
    pub fn completions(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    pub fn covers_for(&self, slot: SlotId) -> Vec<Option<(u32, u32)>> {
        self.covers.iter().filter(|(s, _)| *s == slot).map(|(_, c)| *c).collect()
    }
}

impl ListView for Recorder {
    fn on_search_started(&mut self) {
        self.started += 1;
    }

    fn on_search_succeeded(&mut self, books: &[Book]) {
        self.succeeded.push(books.to_vec());
    }

    fn on_search_failed(&mut self, kind: ErrorKind) {
        self.failed.push(kind);
    }

    fn on_thumbnail_ready(&mut self, slot: SlotId, thumbnail: Option<&Thumbnail>) {
        self.covers.push((slot, thumbnail.map(|t| (t.width(), t.height()))));
    }
}

pub fn search_config(server_uri: &str) -> SearchConfig {
    SearchConfig {
        base_url: format!("{server_uri}{VOLUMES_PATH}"),
        timeout_secs: 5,
        ..SearchConfig::default()
    }
}

pub fn pipeline(server_uri: &str) -> SearchPipeline {
    SearchPipeline::new(&search_config(server_uri)).unwrap()
}

pub fn fetcher() -> ThumbnailFetcher {
    ThumbnailFetcher::new(&ThumbnailConfig::default()).unwrap()
}

pub fn book_list(server_uri: &str) -> BookList<Recorder> {
    BookList::new(Recorder::default(), pipeline(server_uri), fetcher())
}

pub fn volume(title: &str, author: &str, thumbnail: &str, link: &str) -> Value {
    json!({
        "kind": "books#volume",
        "volumeInfo": {
            "title": title,
            "authors": [author],
            "imageLinks": { "smallThumbnail": thumbnail, "thumbnail": thumbnail },
            "infoLink": link
        }
    })
}

pub fn volumes(items: Vec<Value>) -> Value {
    json!({ "kind": "books#volumes", "totalItems": items.len(), "items": items })
}

pub fn png(width: u32, height: u32) -> Vec<u8> {
    let img = image::DynamicImage::new_rgb8(width, height);
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}
