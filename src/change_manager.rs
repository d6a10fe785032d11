//! Bounded undo and redo stacks over [`Change`] entries.

use std::collections::VecDeque;

use crate::change::{Change, CombineResult, UndoReport};
use crate::raster::RunRaster;

/// How many undo steps are kept. The oldest step is dropped silently when a
/// new one would exceed the bound.
pub const MAX_UNDO_LEVELS: usize = 25;

/// Owns the undo and redo stacks and runs changes against the raster.
///
/// Entries move between the stacks by being applied: popping a change, running
/// it, and pushing the produced inverse onto the opposite stack. Any fresh
/// push clears the redo stack.
#[derive(Debug)]
pub struct ChangeManager {
    undos: VecDeque<Change>,
    redos: VecDeque<Change>,
    limit: usize,
}

impl Default for ChangeManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeManager {
    pub fn new() -> Self {
        Self::with_limit(MAX_UNDO_LEVELS)
    }

    /// Manager with a custom depth bound. Must be at least one.
    pub fn with_limit(limit: usize) -> Self {
        debug_assert!(limit >= 1);
        Self {
            undos: VecDeque::new(),
            redos: VecDeque::new(),
            limit,
        }
    }

    /// Push a new change through the merge policy: the stack top may absorb
    /// it, cancel against it, or let it become its own entry.
    pub fn add_undo(&mut self, change: Change) {
        self.redos.clear();
        if let Some(top) = self.undos.back_mut() {
            match top.combine(&change) {
                CombineResult::Combine => return,
                CombineResult::Nullify => {
                    self.undos.pop_back();
                    return;
                }
                CombineResult::Fail => {}
            }
        }
        self.undos.push_back(change);
        self.evict();
    }

    /// Push an already-applied inverse without offering it to the merge
    /// policy, so every structural operation stays its own undo step.
    pub fn push_direct(&mut self, change: Change) {
        self.redos.clear();
        self.undos.push_back(change);
        self.evict();
    }

    fn evict(&mut self) {
        if self.undos.len() > self.limit {
            self.undos.pop_front();
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undos.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redos.is_empty()
    }

    /// Revert the most recent change. A no-op on an empty stack.
    pub fn undo(&mut self, raster: &mut RunRaster) -> UndoReport {
        match self.undos.pop_back() {
            Some(change) => {
                let report = change.report();
                self.redos.push_back(change.apply(raster));
                report
            }
            None => UndoReport::default(),
        }
    }

    /// Reapply the most recently undone change. A no-op on an empty stack.
    pub fn redo(&mut self, raster: &mut RunRaster) -> UndoReport {
        match self.redos.pop_back() {
            Some(change) => {
                let report = change.report();
                self.undos.push_back(change.apply(raster));
                report
            }
            None => UndoReport::default(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
