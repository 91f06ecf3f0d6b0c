//! Per-page undo/redo stacks of document snapshots.

use crate::document::PageDocument;
use std::time::SystemTime;

/// Maximum number of undo snapshots kept per page.
const MAX_UNDO_DEPTH: usize = 50;

/// A deep copy of a document together with a human-readable action label.
///
/// Entries are owned by the stacks and cloned on every transfer; they are
/// never aliased with the live document.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub snapshot: PageDocument,
    pub label: String,
    pub timestamp: SystemTime,
}

/// Linear undo/redo history for one page.
#[derive(Debug, Clone, Default)]
pub struct History {
    undo: Vec<HistoryEntry>,
    redo: Vec<HistoryEntry>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the pre-mutation state. Call immediately before applying a
    /// structural mutation, never after. Any new entry invalidates the redo
    /// stack.
    pub fn push(&mut self, current: &PageDocument, label: &str) {
        self.push_snapshot(current.clone(), label);
    }

    /// Push an explicitly captured snapshot. Used by text-editing sessions,
    /// where the pre-state is taken at focus time and committed at blur.
    pub fn push_snapshot(&mut self, snapshot: PageDocument, label: &str) {
        self.undo.push(HistoryEntry {
            snapshot,
            label: label.to_string(),
            timestamp: SystemTime::now(),
        });
        self.redo.clear();
        if self.undo.len() > MAX_UNDO_DEPTH {
            self.undo.remove(0);
        }
    }

    /// Restore the most recent undo snapshot into `live`. The replaced state
    /// moves to the redo stack under the popped entry's label and timestamp.
    /// Returns false when there is nothing to undo.
    pub fn undo(&mut self, live: &mut PageDocument) -> bool {
        let Some(entry) = self.undo.pop() else {
            return false;
        };
        self.redo.push(HistoryEntry {
            snapshot: live.clone(),
            label: entry.label,
            timestamp: entry.timestamp,
        });
        *live = entry.snapshot;
        true
    }

    /// Inverse of [`History::undo`].
    pub fn redo(&mut self, live: &mut PageDocument) -> bool {
        let Some(entry) = self.redo.pop() else {
            return false;
        };
        self.undo.push(HistoryEntry {
            snapshot: live.clone(),
            label: entry.label,
            timestamp: entry.timestamp,
        });
        *live = entry.snapshot;
        true
    }

    /// Drop both stacks. The live document is untouched.
    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Label of the action that would be undone next.
    pub fn undo_label(&self) -> Option<&str> {
        self.undo.last().map(|e| e.label.as_str())
    }

    /// Label of the action that would be redone next.
    pub fn redo_label(&self) -> Option<&str> {
        self.redo.last().map(|e| e.label.as_str())
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{BubbleItem, ItemId};
    use crate::geometry::BBox;

    fn doc_with_items(count: usize) -> PageDocument {
        let mut doc = PageDocument::new(100, 100);
        for i in 0..count {
            doc.items.push(BubbleItem::new(
                ItemId::Number(i as i64 + 1),
                BBox::new(0.0, 0.0, 10.0, 10.0),
            ));
        }
        doc
    }

    #[test]
    fn test_undo_redo_roundtrip() {
        let mut history = History::new();
        let mut live = doc_with_items(1);

        history.push(&live, "Add bubble");
        live = doc_with_items(2);
        let before_undo = live.clone();

        assert!(history.undo(&mut live));
        assert_eq!(live.items.len(), 1);

        assert!(history.redo(&mut live));
        assert_eq!(live, before_undo);
    }

    #[test]
    fn test_undo_past_exhaustion_is_noop() {
        let mut history = History::new();
        let mut live = doc_with_items(2);

        history.push(&live, "Resize bubble");
        assert!(history.undo(&mut live));
        assert!(!history.undo(&mut live));
        assert!(!history.undo(&mut live));
        assert_eq!(live.items.len(), 2);
    }

    #[test]
    fn test_push_clears_redo() {
        let mut history = History::new();
        let mut live = doc_with_items(1);

        history.push(&live, "Add bubble");
        live = doc_with_items(2);
        assert!(history.undo(&mut live));
        assert!(history.can_redo());

        history.push(&live, "Remove bubble");
        assert!(!history.can_redo());
    }

    #[test]
    fn test_undo_moves_label_to_redo() {
        let mut history = History::new();
        let mut live = doc_with_items(1);

        history.push(&live, "Change bubble type");
        assert_eq!(history.undo_label(), Some("Change bubble type"));

        history.undo(&mut live);
        assert_eq!(history.undo_label(), None);
        assert_eq!(history.redo_label(), Some("Change bubble type"));
    }

    #[test]
    fn test_snapshots_are_not_aliased() {
        let mut history = History::new();
        let mut live = doc_with_items(1);

        history.push(&live, "Edit text");
        // mutating the live document must not change the stored snapshot
        live.items[0].text = Some("changed".to_string());
        assert!(history.undo(&mut live));
        assert_eq!(live.items[0].text, Some(String::new()));
    }

    #[test]
    fn test_undo_depth_is_capped() {
        let mut history = History::new();
        let live = doc_with_items(1);
        for _ in 0..80 {
            history.push(&live, "Resize bubble");
        }
        assert_eq!(history.undo_depth(), 50);
    }

    #[test]
    fn test_clear() {
        let mut history = History::new();
        let mut live = doc_with_items(1);
        history.push(&live, "Add bubble");
        history.undo(&mut live);
        history.push(&live, "Add bubble");

        history.clear();
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }
}
