//! Snapshot-based undo/redo.

use std::collections::VecDeque;

/// Maximum number of undo states to keep.
pub const MAX_UNDO_HISTORY: usize = 50;

/// Undo/redo stacks of whole-state snapshots.
///
/// The owner pushes the state as it was *before* a change. Undo hands back
/// the previous state in exchange for the current one, which goes onto the
/// redo stack.
#[derive(Debug, Clone)]
pub struct History<S> {
    undo_stack: VecDeque<S>,
    redo_stack: Vec<S>,
    limit: usize,
}

impl<S> Default for History<S> {
    fn default() -> Self {
        Self::new(MAX_UNDO_HISTORY)
    }
}

impl<S> History<S> {
    /// Create an empty history keeping at most `limit` undo states
    /// (at least one).
    pub fn new(limit: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            limit: limit.max(1),
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Record the state before a change. Clears the redo stack.
    pub fn push(&mut self, before: S) {
        self.undo_stack.push_back(before);
        self.redo_stack.clear();

        // Drop the oldest states past the limit
        while self.undo_stack.len() > self.limit {
            self.undo_stack.pop_front();
        }
    }

    /// Undo the last change.
    /// Returns the state to restore, or `None` if there is nothing to undo.
    pub fn undo(&mut self, current: S) -> Option<S> {
        let previous = self.undo_stack.pop_back()?;
        self.redo_stack.push(current);
        Some(previous)
    }

    /// Redo the last undone change.
    /// Returns the state to restore, or `None` if there is nothing to redo.
    pub fn redo(&mut self, current: S) -> Option<S> {
        let next = self.redo_stack.pop()?;
        self.undo_stack.push_back(current);
        Some(next)
    }

    /// Check if undo is available.
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available.
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
