// memento.rs

use crate::calculation::Calculation;

/// Frozen copy of the history sequence at one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    entries: Vec<Calculation>,
}

impl Snapshot {
    pub fn capture(entries: &[Calculation]) -> Self {
        Self {
            entries: entries.to_vec(),
        }
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
}

/// Two stacks of snapshots. The top of `undo_stack` is always the state the
/// history currently shows; undo and redo move snapshots between the stacks.
#[derive(Debug, Default, Clone)]
pub struct UndoRedoManager {
    undo_stack: Vec<Snapshot>,
    redo_stack: Vec<Snapshot>,
}

impl UndoRedoManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new current state. Any undone future is discarded.
    pub fn checkpoint(&mut self, snapshot: Snapshot) {
        self.undo_stack.push(snapshot);
        self.redo_stack.clear();
    }

    /// Step back one state, returning the state to restore.
    pub fn undo(&mut self) -> Option<&Snapshot> {
        if !self.can_undo() {
            return None;
        }
        let current = self.undo_stack.pop()?;
        self.redo_stack.push(current);
        self.undo_stack.last()
    }

    pub fn redo(&mut self) -> Option<&Snapshot> {
        let next = self.redo_stack.pop()?;
        self.undo_stack.push(next);
        self.undo_stack.last()
    }

    pub fn can_undo(&self) -> bool {
        self.undo_stack.len() >= 2
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Number of states on the undo stack, current state included.
    pub fn depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
