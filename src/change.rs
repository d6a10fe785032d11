//! The closed set of reversible canvas operations.
//!
//! Every edit that reaches the undo system is one of these variants. Applying
//! a change mutates the raster and yields the change that would undo it, so
//! undo and redo are the same mechanism run in opposite directions.

use std::collections::BTreeMap;

use crate::raster::{RunArray, RunRaster};

// ============================================================================
// CombineResult — merge decision between adjacent undo entries
// ============================================================================

/// Outcome of offering a new change to the change already on top of the
/// undo stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombineResult {
    /// Independent changes; the new one gets its own stack entry.
    Fail,
    /// The changes cancel; the top entry comes off the stack.
    Nullify,
    /// The top entry absorbed the new change's parameters.
    Combine,
}

// ============================================================================
// UndoReport — what kind of change an undo/redo just applied
// ============================================================================

/// Flip information reported to the caller after undo/redo, so a viewport
/// can mirror its scroll position. All other change kinds report nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UndoReport {
    pub flipped_horizontally: bool,
    pub flipped_vertically: bool,
}

// ============================================================================
// Mark — per-stroke row snapshot
// ============================================================================

/// Sparse snapshot of the rows a stroke touched, as they were before the
/// stroke began.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mark {
    rows: BTreeMap<u32, RunArray>,
}

impl Mark {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no row has been captured.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Record row `y` ahead of its first modification in this stroke. Later
    /// offers of the same row keep the first snapshot; rows outside the
    /// raster are ignored.
    pub fn capture(&mut self, y: u32, raster: &RunRaster) {
        if y >= raster.height() {
            return;
        }
        self.rows.entry(y).or_insert_with(|| raster.row(y).to_vec());
    }

    /// Swap the captured rows back into `raster`. Afterward this mark holds
    /// the rows as they were just before the call, which is exactly the
    /// snapshot the opposite direction needs.
    fn apply(mut self, raster: &mut RunRaster) -> Mark {
        for (&y, row) in self.rows.iter_mut() {
            raster.swap_row(y, row);
        }
        self
    }
}

// ============================================================================
// Change
// ============================================================================

/// One reversible canvas operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Change {
    /// A committed stroke, holding the pre-stroke rows it painted over.
    Mark(Mark),
    FlipHorizontal,
    FlipVertical,
    /// Circular shift, positive toward higher column/row indices.
    Shift { right: i32, down: i32 },
    /// Blank border growth, per side.
    Add { left: u32, right: u32, up: u32, down: u32 },
    /// Blank border removal, per side.
    Remove { left: u32, right: u32, up: u32, down: u32 },
    /// Nearest-neighbor upscale of both axes.
    Enlarge { factor: u32 },
    /// Nearest-neighbor downscale of both axes.
    Shrink { factor: u32 },
}

impl Change {
    /// Apply this change to `raster`, consuming it and returning its inverse.
    ///
    /// `Remove` returns another `Remove` with the same margins rather than
    /// an `Add`; removal only ever enters the stacks as the generated
    /// inverse of `Add`, so its own forward direction stays self-inverse.
    pub fn apply(self, raster: &mut RunRaster) -> Change {
        match self {
            Change::Mark(mark) => Change::Mark(mark.apply(raster)),
            Change::FlipHorizontal => {
                raster.flip_horizontally();
                Change::FlipHorizontal
            }
            Change::FlipVertical => {
                raster.flip_vertically();
                Change::FlipVertical
            }
            Change::Shift { right, down } => {
                raster.shift_horizontally(right);
                raster.shift_vertically(down);
                Change::Shift {
                    right: -right,
                    down: -down,
                }
            }
            Change::Add {
                left,
                right,
                up,
                down,
            } => {
                raster.add(left, right, up, down);
                Change::Remove {
                    left,
                    right,
                    up,
                    down,
                }
            }
            Change::Remove {
                left,
                right,
                up,
                down,
            } => {
                raster.remove(left, right, up, down);
                Change::Remove {
                    left,
                    right,
                    up,
                    down,
                }
            }
            Change::Enlarge { factor } => {
                raster.enlarge(factor);
                Change::Shrink { factor }
            }
            Change::Shrink { factor } => {
                raster.shrink(factor);
                Change::Enlarge { factor }
            }
        }
    }

    /// Try to merge an incoming change into this one, assuming `self` is the
    /// current top of the undo stack and `other` arrived just after it.
    pub fn combine(&mut self, other: &Change) -> CombineResult {
        match (self, other) {
            // Every stroke is its own undo step.
            (Change::Mark(_), _) => CombineResult::Fail,
            (Change::FlipHorizontal, Change::FlipHorizontal) => CombineResult::Nullify,
            (Change::FlipVertical, Change::FlipVertical) => CombineResult::Nullify,
            (
                Change::Shift { right, down },
                Change::Shift {
                    right: other_right,
                    down: other_down,
                },
            ) => {
                *right += other_right;
                *down += other_down;
                CombineResult::Combine
            }
            (
                Change::Add {
                    left,
                    right,
                    up,
                    down,
                },
                Change::Add {
                    left: other_left,
                    right: other_right,
                    up: other_up,
                    down: other_down,
                },
            ) => {
                *left += other_left;
                *right += other_right;
                *up += other_up;
                *down += other_down;
                CombineResult::Combine
            }
            (
                Change::Remove {
                    left,
                    right,
                    up,
                    down,
                },
                Change::Remove {
                    left: other_left,
                    right: other_right,
                    up: other_up,
                    down: other_down,
                },
            ) => {
                *left += other_left;
                *right += other_right;
                *up += other_up;
                *down += other_down;
                CombineResult::Combine
            }
            (
                Change::Enlarge { factor },
                Change::Enlarge {
                    factor: other_factor,
                },
            ) => {
                *factor *= other_factor;
                CombineResult::Combine
            }
            (
                Change::Shrink { factor },
                Change::Shrink {
                    factor: other_factor,
                },
            ) => {
                *factor *= other_factor;
                CombineResult::Combine
            }
            _ => CombineResult::Fail,
        }
    }

    /// What applying this change means for the viewport.
    pub fn report(&self) -> UndoReport {
        UndoReport {
            flipped_horizontally: matches!(self, Change::FlipHorizontal),
            flipped_vertically: matches!(self, Change::FlipVertical),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
