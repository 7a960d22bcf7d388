//! Per-row request bookkeeping for recycled list rows.
//!
//! Each slot carries a token that is bumped every time the row is rebound to
//! a book. A cover fetch is tagged with the token current at dispatch; on
//! completion it is only applied if the slot still holds that token and url.

use std::collections::HashMap;

use tokio::task::JoinHandle;

use crate::book::SlotId;

#[derive(Debug)]
struct RowBinding {
    token: u64,
    url: String,
    pending: bool,
    task: Option<JoinHandle<()>>,
}

#[derive(Debug, Default)]
pub struct SlotTable {
    rows: HashMap<SlotId, RowBinding>,
    next_token: u64,
}

impl SlotTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebind `slot` to `url`, superseding whatever it was fetching before.
    /// Returns the token the new fetch must carry.
    pub fn bind(&mut self, slot: SlotId, url: &str) -> u64 {
        self.next_token += 1;
        let token = self.next_token;
        if let Some(old) = self.rows.insert(
            slot,
            RowBinding {
                token,
                url: url.to_string(),
                pending: true,
                task: None,
            },
        ) {
            abort(old);
        }
        token
    }

    /// Remember the background task serving the slot's current binding.
    pub fn attach(&mut self, slot: SlotId, token: u64, task: JoinHandle<()>) {
        match self.rows.get_mut(&slot) {
            Some(row) if row.token == token => row.task = Some(task),
            _ => task.abort(),
        }
    }

    /// Whether a completion for `(slot, token, url)` still matches the row.
    pub fn is_current(&self, slot: SlotId, token: u64, url: &str) -> bool {
        self.rows
            .get(&slot)
            .map_or(false, |row| row.token == token && row.url == url)
    }

    /// Mark the slot's current fetch as delivered. Returns false when the
    /// completion is stale.
    pub fn complete(&mut self, slot: SlotId, token: u64, url: &str) -> bool {
        if !self.is_current(slot, token, url) {
            return false;
        }
        if let Some(row) = self.rows.get_mut(&slot) {
            row.pending = false;
            row.task = None;
        }
        true
    }

    pub fn release(&mut self, slot: SlotId) {
        if let Some(old) = self.rows.remove(&slot) {
            abort(old);
        }
    }

    pub fn clear(&mut self) {
        for (_, old) in self.rows.drain() {
            abort(old);
        }
    }

    /// Number of rows still waiting for their current fetch.
    pub fn pending(&self) -> usize {
        self.rows.values().filter(|r| r.pending).count()
    }

    pub fn token(&self, slot: SlotId) -> Option<u64> {
        self.rows.get(&slot).map(|r| r.token)
    }
}

fn abort(binding: RowBinding) {
    if let Some(task) = binding.task {
        task.abort();
    }
}
