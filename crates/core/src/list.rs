//! The foreground list model.
//!
//! `BookList` is the only owner of the result books and row bindings. Search
//! runs and cover fetches execute on background tasks and hand their results
//! back as [`Event`]s; `process_next` applies them here, on the caller's
//! context, after checking they are still wanted:
//!
//! * a search result is applied only if its generation is the latest started;
//! * a cover is applied only if its slot still holds the same token and url.

use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

use crate::book::{Book, SearchResult, SlotId, Thumbnail, ThumbnailRequest};
use crate::error::{ErrorKind, SearchRejected};
use crate::host::{Connectivity, ListView, Navigator};
use crate::pipeline::SearchPipeline;
use crate::query::SearchTerm;
use crate::slots::SlotTable;
use crate::thumbnail::ThumbnailFetcher;

/// A completed background operation, posted to the foreground.
#[derive(Debug)]
pub enum Event {
    Search {
        generation: u64,
        result: SearchResult,
    },
    Thumbnail {
        slot: SlotId,
        token: u64,
        url: String,
        image: Option<Thumbnail>,
    },
}

/// What the list area should currently display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListState {
    /// No search applied yet.
    Idle,
    Searching,
    Loaded,
    Empty,
    Failed(ErrorKind),
}

impl ListState {
    /// Text for the empty-state view, if the list has nothing to show.
    ///
    /// `Searching` has none: the previous rows stay listed until the new run
    /// applies, and progress is signalled through
    /// [`ListView::on_search_started`] instead.
    pub fn empty_message(&self) -> Option<&'static str> {
        match self {
            ListState::Idle | ListState::Searching | ListState::Loaded => None,
            ListState::Empty => Some("No books found."),
            ListState::Failed(ErrorKind::Network) => Some("Couldn't reach the book catalog. Check your connection."),
            ListState::Failed(ErrorKind::Parse) => Some("The book catalog sent a response that couldn't be read."),
        }
    }
}

/// Outcome of processing one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Search { generation: u64, applied: bool },
    Thumbnail { slot: SlotId, applied: bool },
}

pub struct BookList<V: ListView> {
    view: V,
    pipeline: Arc<SearchPipeline>,
    fetcher: Arc<ThumbnailFetcher>,
    books: Vec<Book>,
    state: ListState,
    generation: u64,
    search_task: Option<JoinHandle<()>>,
    slots: SlotTable,
    events_tx: UnboundedSender<Event>,
    events_rx: UnboundedReceiver<Event>,
}

impl<V: ListView> BookList<V> {
    pub fn new(view: V, pipeline: SearchPipeline, fetcher: ThumbnailFetcher) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            view,
            pipeline: Arc::new(pipeline),
            fetcher: Arc::new(fetcher),
            books: Vec::new(),
            state: ListState::Idle,
            generation: 0,
            search_task: None,
            slots: SlotTable::new(),
            events_tx,
            events_rx,
        }
    }

    /// Start a search, superseding any run still in flight. Must be called
    /// from within a Tokio runtime.
    ///
    /// Blank terms and an unavailable network are rejected without starting
    /// anything. On success returns the run's generation.
    pub fn search(&mut self, raw_term: &str, network: &dyn Connectivity) -> Result<u64, SearchRejected> {
        let term = SearchTerm::new(raw_term).ok_or(SearchRejected::EmptyTerm)?;
        if !network.is_network_available() {
            return Err(SearchRejected::Offline);
        }

        self.generation += 1;
        let generation = self.generation;
        if let Some(previous) = self.search_task.take() {
            previous.abort();
        }

        tracing::info!(generation, term = %term, "search started");
        self.state = ListState::Searching;
        self.view.on_search_started();

        let pipeline = Arc::clone(&self.pipeline);
        let events = self.events_tx.clone();
        self.search_task = Some(tokio::spawn(async move {
            let result = pipeline.run(&term).await;
            let _ = events.send(Event::Search { generation, result });
        }));
        Ok(generation)
    }

    /// Row `slot` now renders `books[index]`: start loading its cover. Any
    /// fetch still running for the row's previous book is superseded.
    /// Returns false (and releases the row) when `index` is out of range.
    pub fn bind_row(&mut self, slot: SlotId, index: usize) -> bool {
        let Some(book) = self.books.get(index) else {
            self.slots.release(slot);
            return false;
        };
        let url = book.thumbnail_url().to_string();
        let token = self.slots.bind(slot, &url);

        if url.is_empty() {
            self.slots.complete(slot, token, &url);
            self.view.on_thumbnail_ready(slot, None);
            return true;
        }

        let task = self
            .fetcher
            .dispatch(ThumbnailRequest { url, slot }, token, self.events_tx.clone());
        self.slots.attach(slot, token, task);
        true
    }

    /// Row `slot` scrolled out of view; late covers for it are dropped.
    pub fn release_row(&mut self, slot: SlotId) {
        self.slots.release(slot);
    }

    /// Wait for the next background completion and apply it if it is still
    /// current. Only returns `None` if the event channel closed, which can't
    /// happen while `self` is alive; callers should check [`is_idle`](Self::is_idle)
    /// before waiting.
    pub async fn process_next(&mut self) -> Option<Applied> {
        let event = self.events_rx.recv().await?;
        Some(self.apply(event))
    }

    /// Apply completions until no current search or cover fetch is outstanding.
    pub async fn settle(&mut self) {
        while !self.is_idle() {
            if self.process_next().await.is_none() {
                break;
            }
        }
    }

    pub fn is_idle(&self) -> bool {
        self.search_task.is_none() && self.slots.pending() == 0
    }

    fn apply(&mut self, event: Event) -> Applied {
        match event {
            Event::Search { generation, result } => {
                if generation != self.generation {
                    tracing::debug!(generation, current = self.generation, "dropping superseded search result");
                    return Applied::Search { generation, applied: false };
                }
                self.search_task = None;
                self.slots.clear();
                match result {
                    Ok(books) => {
                        tracing::info!(generation, count = books.len(), "search applied");
                        self.state = if books.is_empty() { ListState::Empty } else { ListState::Loaded };
                        self.books = books;
                        self.view.on_search_succeeded(&self.books);
                    }
                    Err(e) => {
                        tracing::warn!(generation, "search failed: {e}");
                        self.books.clear();
                        self.state = ListState::Failed(e.kind());
                        self.view.on_search_failed(e.kind());
                    }
                }
                Applied::Search { generation, applied: true }
            }
            Event::Thumbnail { slot, token, url, image } => {
                if !self.slots.complete(slot, token, &url) {
                    tracing::debug!(%slot, %url, "dropping stale cover");
                    return Applied::Thumbnail { slot, applied: false };
                }
                self.view.on_thumbnail_ready(slot, image.as_ref());
                Applied::Thumbnail { slot, applied: true }
            }
        }
    }

    /// Open the detail page of the book at `index`.
    pub fn open_detail(&self, index: usize, navigator: &dyn Navigator) -> bool {
        match self.books.get(index) {
            Some(book) => {
                navigator.open(book.detail_url());
                true
            }
            None => false,
        }
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn state(&self) -> ListState {
        self.state
    }

    /// Generation of the most recently started search (0 before any).
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }
}
