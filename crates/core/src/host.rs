//! Interfaces to the collaborators the host environment supplies: the list
//! renderer, the connectivity check and the external detail-page viewer.

use crate::book::{Book, SlotId, Thumbnail};
use crate::error::ErrorKind;

/// The list renderer. Called only from the foreground context.
///
/// `on_search_succeeded` / `on_search_failed` double as the "search finished"
/// signal: exactly one of them follows each applied run.
pub trait ListView {
    fn on_search_started(&mut self);
    fn on_search_succeeded(&mut self, books: &[Book]);
    fn on_search_failed(&mut self, kind: ErrorKind);
    fn on_thumbnail_ready(&mut self, slot: SlotId, thumbnail: Option<&Thumbnail>);
}

pub trait Connectivity {
    fn is_network_available(&self) -> bool;
}

/// Opens a detail page outside the app. Fire and forget.
pub trait Navigator {
    fn open(&self, url: &str);
}

/// A fixed answer, for hosts that already know their connectivity.
impl Connectivity for bool {
    fn is_network_available(&self) -> bool {
        *self
    }
}
