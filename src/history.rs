// history.rs

use std::num::NonZeroUsize;
use std::path::Path;

use crate::calculation::Calculation;
use crate::error::PersistenceError;
use crate::memento::{Snapshot, UndoRedoManager};
use crate::persistence;

/// Bounded log of calculations, oldest first, with snapshot-based undo/redo.
///
/// Every state change (append, clear, load) checkpoints the post-change
/// entries, so once anything has happened the manager's current snapshot
/// equals `entries`. A fresh store has no checkpoint: its first append is
/// the first state and cannot be undone.
#[derive(Debug)]
pub struct HistoryStore {
    entries: Vec<Calculation>,
    capacity: NonZeroUsize,
    manager: UndoRedoManager,
}

impl HistoryStore {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity.get().min(1024)),
            capacity,
            manager: UndoRedoManager::new(),
        }
    }

    fn checkpoint(&mut self) {
        self.manager.checkpoint(Snapshot::capture(&self.entries));
    }

    /// Add `record` as the newest entry, evicting the oldest one when full.
    pub fn append(&mut self, record: Calculation) {
        if self.entries.len() >= self.capacity.get() {
            let evicted = self.entries.remove(0);
            tracing::debug!(operation = evicted.operation(), "evicted oldest history entry");
        }
        self.entries.push(record);
        self.checkpoint();
    }

    pub fn entries(&self) -> &[Calculation] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    /// Empty the log and forget all undo/redo states; the empty log becomes
    /// the single baseline state.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.manager.clear();
        self.checkpoint();
    }

    pub fn undo(&mut self) -> bool {
        match self.manager.undo() {
            Some(snapshot) => {
                self.entries = snapshot.entries().to_vec();
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        match self.manager.redo() {
            Some(snapshot) => {
                self.entries = snapshot.entries().to_vec();
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.manager.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.manager.can_redo()
    }

    /// Replace the whole log with `entries` as a fresh baseline with no
    /// undo/redo history. Only the newest `capacity` entries are kept.
    pub fn replace(&mut self, mut entries: Vec<Calculation>) {
        let cap = self.capacity.get();
        if entries.len() > cap {
            let dropped = entries.len() - cap;
            tracing::warn!(dropped, capacity = cap, "loaded history exceeds capacity, keeping newest entries");
            entries = entries.split_off(dropped);
        }
        self.entries = entries;
        self.manager.clear();
        self.checkpoint();
    }

    pub fn save_to(&self, path: &Path) -> Result<(), PersistenceError> {
        persistence::save(path, &self.entries)
    }

    /// Load `path` and make it the new baseline. On any error the current
    /// entries and undo/redo state are left untouched.
    pub fn load_from(&mut self, path: &Path) -> Result<usize, PersistenceError> {
        let loaded = persistence::load(path)?;
        self.replace(loaded);
        Ok(self.entries.len())
    }
}
