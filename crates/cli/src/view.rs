//! Terminal rendering of the result list and the host-side collaborators.

use std::collections::BTreeMap;
use std::time::Duration;

use booklistings_core::prelude::*;
use booklistings_core::query::Url;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

/// Renders search results to stdout. In live mode every callback prints as
/// it happens; otherwise output is deferred to [`TerminalView::render`].
pub struct TerminalView {
    live: bool,
    spinner: Option<ProgressBar>,
    books: Vec<Book>,
    covers: BTreeMap<usize, Option<(u32, u32)>>,
}

#[derive(Serialize)]
struct Row<'a> {
    #[serde(flatten)]
    book: &'a Book,
    cover: Option<(u32, u32)>,
}

impl TerminalView {
    pub fn new(live: bool) -> Self {
        Self {
            live,
            spinner: None,
            books: Vec::new(),
            covers: BTreeMap::new(),
        }
    }

    fn stop_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }

    fn print_rows(&self, with_covers: bool) {
        for (i, book) in self.books.iter().enumerate() {
            println!("{:>2}. {}", i + 1, book.title());
            println!("    by {}", book.author());
            if with_covers {
                match self.covers.get(&i) {
                    Some(Some((w, h))) => println!("    cover {w}x{h}"),
                    _ => println!("    no cover"),
                }
            }
            println!("    {}", book.detail_url());
        }
    }

    /// Print the final list (or its empty-state message) for a one-shot search.
    pub fn render(&self, state: ListState, with_covers: bool, json: bool) -> Result<(), serde_json::Error> {
        if json {
            let rows: Vec<Row> = self
                .books
                .iter()
                .enumerate()
                .map(|(i, book)| Row {
                    book,
                    cover: self.covers.get(&i).copied().flatten(),
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&rows)?);
            return Ok(());
        }
        match state.empty_message() {
            Some(message) => println!("{message}"),
            None => self.print_rows(with_covers),
        }
        Ok(())
    }
}

impl ListView for TerminalView {
    fn on_search_started(&mut self) {
        let spinner = self.spinner.get_or_insert_with(|| {
            let pb = ProgressBar::new_spinner();
            pb.set_style(ProgressStyle::with_template("{spinner} {msg}").unwrap_or_else(|_| ProgressStyle::default_spinner()));
            pb.enable_steady_tick(Duration::from_millis(100));
            pb
        });
        spinner.set_message("Searching...");
        self.books.clear();
        self.covers.clear();
    }

    fn on_search_succeeded(&mut self, books: &[Book]) {
        self.stop_spinner();
        self.books = books.to_vec();
        self.covers.clear();
        if self.live {
            if books.is_empty() {
                println!("{}", ListState::Empty.empty_message().unwrap_or_default());
            } else {
                self.print_rows(false);
            }
        }
    }

    fn on_search_failed(&mut self, kind: ErrorKind) {
        self.stop_spinner();
        self.books.clear();
        self.covers.clear();
        if self.live {
            if let Some(message) = ListState::Failed(kind).empty_message() {
                eprintln!("{message}");
            }
        }
    }

    fn on_thumbnail_ready(&mut self, slot: SlotId, thumbnail: Option<&Thumbnail>) {
        let dims = thumbnail.map(|t| (t.width(), t.height()));
        self.covers.insert(slot.0, dims);
        if self.live {
            match dims {
                Some((w, h)) => println!("    #{} cover {w}x{h}", slot.0 + 1),
                None => println!("    #{} no cover", slot.0 + 1),
            }
        }
    }
}

/// Connectivity check: can the catalog host be resolved?
pub struct HostProbe {
    host: Option<String>,
    port: u16,
}

impl HostProbe {
    pub fn for_url(url: &Url) -> Self {
        Self {
            host: url.host_str().map(String::from),
            port: url.port_or_known_default().unwrap_or(443),
        }
    }

    /// Resolve the host on the runtime's resolver, so a slow lookup never
    /// stalls the foreground loop.
    pub async fn is_reachable(&self) -> bool {
        let Some(host) = &self.host else {
            return false;
        };
        match tokio::net::lookup_host((host.as_str(), self.port)).await {
            Ok(mut addrs) => addrs.next().is_some(),
            Err(e) => {
                tracing::debug!(host, "catalog host did not resolve: {e}");
                false
            }
        }
    }
}

/// Prints detail URLs instead of launching a browser.
pub struct PrintNavigator;

impl Navigator for PrintNavigator {
    fn open(&self, url: &str) {
        println!("Open in your browser: {url}");
    }
}
