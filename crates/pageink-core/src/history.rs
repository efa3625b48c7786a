//! Undo/redo over stroke store mutations.
//!
//! Each entry is the inverse bookkeeping for one user mutation and carries a
//! full copy of the stroke, so later store changes never invalidate it.

use crate::store::StrokeStore;
use crate::stroke::{Stroke, StrokeStyle};

/// A recorded store mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum UndoAction {
    /// `stroke` was appended at `index`.
    Add {
        stroke: Stroke,
        style: StrokeStyle,
        index: usize,
    },
    /// `stroke` was removed from `index`.
    Remove {
        stroke: Stroke,
        style: StrokeStyle,
        index: usize,
    },
}

impl UndoAction {
    pub fn index(&self) -> usize {
        match self {
            UndoAction::Add { index, .. } | UndoAction::Remove { index, .. } => *index,
        }
    }

    /// Revert the mutation on `store`. Returns false if the store no longer
    /// has the recorded slot.
    fn revert(&self, store: &mut StrokeStore) -> bool {
        match self {
            UndoAction::Add { index, .. } => store.remove(*index).is_some(),
            UndoAction::Remove {
                stroke,
                style,
                index,
            } => {
                store.insert(*index, stroke.clone(), *style);
                true
            }
        }
    }

    /// Re-apply the mutation on `store`.
    fn apply(&self, store: &mut StrokeStore) -> bool {
        match self {
            UndoAction::Add {
                stroke,
                style,
                index,
            } => {
                store.insert(*index, stroke.clone(), *style);
                true
            }
            UndoAction::Remove { index, .. } => store.remove(*index).is_some(),
        }
    }
}

/// Undo and redo stacks for one page.
#[derive(Debug, Clone, Default)]
pub struct UndoEngine {
    undo_stack: Vec<UndoAction>,
    redo_stack: Vec<UndoAction>,
}

impl UndoEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a mutation that has already been applied to the store.
    /// Clears the redo stack.
    pub fn record(&mut self, action: UndoAction) {
        self.undo_stack.push(action);
        self.redo_stack.clear();
    }

    /// Undo the last mutation.
    /// Returns true if undo was performed, false if nothing to undo.
    pub fn undo(&mut self, store: &mut StrokeStore) -> bool {
        let Some(action) = self.undo_stack.pop() else {
            return false;
        };
        if !action.revert(store) {
            log::warn!(
                "Dropping undo entry for index {} (store has {} strokes)",
                action.index(),
                store.len()
            );
            return false;
        }
        self.redo_stack.push(action);
        true
    }

    /// Redo the last undone mutation.
    /// Returns true if redo was performed, false if nothing to redo.
    pub fn redo(&mut self, store: &mut StrokeStore) -> bool {
        let Some(action) = self.redo_stack.pop() else {
            return false;
        };
        if !action.apply(store) {
            log::warn!(
                "Dropping redo entry for index {} (store has {} strokes)",
                action.index(),
                store.len()
            );
            return false;
        }
        self.undo_stack.push(action);
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    /// Forget all history.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

/// Append a stroke to `store` and record it.
pub fn add_stroke(
    store: &mut StrokeStore,
    history: &mut UndoEngine,
    stroke: Stroke,
    style: StrokeStyle,
) -> usize {
    let index = store.push(stroke.clone(), style);
    history.record(UndoAction::Add {
        stroke,
        style,
        index,
    });
    index
}

/// Remove the stroke at `index` from `store` and record it.
pub fn remove_stroke(store: &mut StrokeStore, history: &mut UndoEngine, index: usize) -> bool {
    match store.remove(index) {
        Some((stroke, style)) => {
            history.record(UndoAction::Remove {
                stroke,
                style,
                index,
            });
            true
        }
        None => false,
    }
}

/// Remove every stroke, recording one `Remove` per stroke from the highest
/// index down. Undoing them one by one restores the original order.
pub fn clear_strokes(store: &mut StrokeStore, history: &mut UndoEngine) -> usize {
    let count = store.len();
    for index in (0..count).rev() {
        remove_stroke(store, history, index);
    }
    count
}
