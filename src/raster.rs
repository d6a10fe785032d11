//! Run-length raster storage and the scanline primitives that operate on it.
//!
//! A raster is a list of rows, each stored as run lengths of alternating
//! color. Runs at even indices are white, runs at odd indices are black, and
//! every row begins with a white run so a row starting in black carries a
//! zero-length white run at index 0. Stored rows are always canonical: they
//! sum to the canvas width and contain no zero-length run past index 0.

use crate::basics::{run_is_black, Run};

/// A row of run lengths.
pub type RunArray = Vec<Run>;

// ============================================================================
// RowBuilder — merge-on-append run assembly
// ============================================================================

/// Builds a canonical row from arbitrary (color, length) pieces.
///
/// Zero-length pieces are dropped, adjacent pieces of equal color are merged,
/// and a zero-length white run is prepended when the first piece is black.
pub(crate) struct RowBuilder {
    runs: RunArray,
}

impl RowBuilder {
    pub(crate) fn new() -> Self {
        Self::with_capacity(0)
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            runs: RunArray::with_capacity(capacity),
        }
    }

    /// Append `length` pixels of the given color.
    pub(crate) fn push(&mut self, black: bool, length: Run) {
        if length == 0 {
            return;
        }
        if self.runs.is_empty() {
            if black {
                self.runs.push(0);
            }
            self.runs.push(length);
            return;
        }
        if run_is_black(self.runs.len() - 1) == black {
            let last = self.runs.len() - 1;
            self.runs[last] += length;
        } else {
            self.runs.push(length);
        }
    }

    /// Finished row. A builder that received no pixels yields `[0]`, the
    /// canonical row of a zero-width canvas.
    pub(crate) fn finish(self) -> RunArray {
        if self.runs.is_empty() {
            vec![0]
        } else {
            self.runs
        }
    }
}

/// Append the pixel range `[from, to)` of `row` to `out`, run by run.
fn emit_run_range(row: &[Run], from: u32, to: u32, out: &mut RowBuilder) {
    let mut left = 0u32;
    for (index, &length) in row.iter().enumerate() {
        let right = left + length;
        if right > from && left < to {
            out.push(run_is_black(index), right.min(to) - left.max(from));
        }
        left = right;
        if left >= to {
            break;
        }
    }
}

/// Canonical: non-empty, no zero-length run past index 0, sums to `width`.
pub(crate) fn row_is_canonical(width: u32, row: &[Run]) -> bool {
    !row.is_empty()
        && row[1..].iter().all(|&length| length > 0)
        && row.iter().sum::<Run>() == width
}

// ============================================================================
// Splice support — old-row walker and new-row accumulator for line()
// ============================================================================

/// Cursor over the runs of an existing row. Always rests on a run; `right` is
/// that run's exclusive right edge in pixels.
struct RunWalker<'a> {
    runs: &'a [Run],
    index: usize,
    right: u32,
}

impl<'a> RunWalker<'a> {
    fn new(runs: &'a [Run]) -> Self {
        debug_assert!(!runs.is_empty());
        Self {
            runs,
            index: 0,
            right: runs[0],
        }
    }

    fn right(&self) -> u32 {
        self.right
    }

    fn length(&self) -> Run {
        self.runs[self.index]
    }

    fn is_black(&self) -> bool {
        run_is_black(self.index)
    }

    fn advance(&mut self) {
        self.index += 1;
        self.right += self.runs[self.index];
    }
}

/// Accumulates the spliced row. At most two runs are added relative to the
/// old row, so the backing buffer never reallocates.
struct SpliceOutput {
    runs: RunArray,
    right: u32,
}

impl SpliceOutput {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            runs: RunArray::with_capacity(capacity),
            right: 0,
        }
    }

    fn create(&mut self, length: Run) {
        // Only the leading white run may be zero length.
        debug_assert!(self.runs.is_empty() || length > 0);
        self.runs.push(length);
        self.right += length;
    }

    fn right(&self) -> u32 {
        self.right
    }

    fn into_runs(self) -> RunArray {
        self.runs
    }
}

// ============================================================================
// RunRaster — the run-length image
// ============================================================================

/// Monochrome raster held as run-length rows.
#[derive(Debug, Clone, PartialEq)]
pub struct RunRaster {
    rows: Vec<RunArray>,
    width: u32,
}

impl RunRaster {
    /// All-white raster of the given dimensions.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            rows: vec![vec![width]; height as usize],
            width,
        }
    }

    /// Raster over pre-built rows. Every row must be canonical for `width`.
    pub fn from_rows(width: u32, rows: Vec<RunArray>) -> Self {
        debug_assert!(rows.iter().all(|row| row_is_canonical(width, row)));
        Self { rows, width }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.rows.len() as u32
    }

    /// Runs of row `y`.
    pub fn row(&self, y: u32) -> &[Run] {
        &self.rows[y as usize]
    }

    pub fn rows(&self) -> &[RunArray] {
        &self.rows
    }

    /// Exchange row `y` with `row`. The incoming row must be canonical.
    pub fn swap_row(&mut self, y: u32, row: &mut RunArray) {
        debug_assert!(row_is_canonical(self.width, row));
        std::mem::swap(&mut self.rows[y as usize], row);
    }

    // ------------------------------------------------------------------------
    // line
    // ------------------------------------------------------------------------

    /// Repaint the half-open pixel interval `[left, right)` of row `y`.
    ///
    /// `right` is clamped to `[0, width]` and `left` to `[0, right]`; an
    /// empty interval or an out-of-range `y` is a no-op. The row is rebuilt
    /// in a single left-to-right pass over its runs.
    pub fn line(&mut self, left: i32, right: i32, y: i32, black: bool) {
        if y < 0 || y as usize >= self.rows.len() {
            return;
        }
        let right = (right.max(0) as u32).min(self.width);
        let left = (left.max(0) as u32).min(right);
        if left == right {
            return;
        }

        let old = std::mem::take(&mut self.rows[y as usize]);
        let mut new = SpliceOutput::with_capacity(old.len() + 2);
        let mut walker = RunWalker::new(&old);

        // Copy runs that end before the repainted interval starts.
        while walker.right() < left {
            new.create(walker.length());
            walker.advance();
        }

        // The walker now rests on the run within or immediately after which
        // the interval starts. A run of matching color is extended backward
        // over the interval; otherwise it is cut short at `left`.
        let extended_left = if walker.is_black() == black {
            new.right()
        } else {
            new.create(left - new.right());
            left
        };

        // Pass runs that fall entirely inside the repainted interval.
        while walker.right() < self.width && walker.right() <= right {
            walker.advance();
        }

        // A matching run on the right is absorbed whole; otherwise the
        // interval closes at `right` and the straddled run keeps its far part.
        if walker.is_black() == black {
            new.create(walker.right() - extended_left);
        } else {
            new.create(right - extended_left);
            if right < walker.right() {
                new.create(walker.right() - right);
            }
        }

        // Copy the remaining runs verbatim.
        if walker.right() < self.width {
            walker.advance();
            loop {
                new.create(walker.length());
                if walker.right() == self.width {
                    break;
                }
                walker.advance();
            }
        }

        debug_assert_eq!(new.right(), self.width);
        self.rows[y as usize] = new.into_runs();
    }

    // ------------------------------------------------------------------------
    // combine
    // ------------------------------------------------------------------------

    /// Accumulate black-pixel counts for a downsampled view.
    ///
    /// Destination column `i` of `buffer` covers the `scale` source columns
    /// starting at `(x + i) * scale`; the source rows are the `scale` rows
    /// starting at `y * scale`. Each overlap adds the exact number of black
    /// source pixels, so a fully black block contributes `scale * scale`.
    /// The buffer is not cleared first; callers zero it between uses.
    pub fn combine(&self, buffer: &mut [u32], x: u32, y: u32, scale: u32) {
        debug_assert!(scale >= 1);
        if buffer.is_empty() {
            return;
        }

        let row_start = (y * scale) as usize;
        let row_stop = ((y * scale + scale) as usize).min(self.rows.len());
        let buffer_left = x * scale;
        let buffer_right = (buffer_left + buffer.len() as u32 * scale).min(self.width);

        for source_row in self.rows.iter().take(row_stop).skip(row_start) {
            let mut column = 0usize;
            let mut column_left = buffer_left;
            let mut column_right = column_left + scale;
            let mut run_right = 0u32;

            'row: for (index, &length) in source_row.iter().enumerate() {
                let run_left = run_right;
                run_right += length;
                if run_left >= buffer_right {
                    break;
                }
                if !run_is_black(index) {
                    continue;
                }
                // Pass columns that end at or before this run starts.
                while column_right <= run_left {
                    column += 1;
                    if column >= buffer.len() {
                        break 'row;
                    }
                    column_left += scale;
                    column_right += scale;
                }
                // Shade every column the run overlaps. The cursor stays on a
                // column that extends past the run so a later run in the same
                // column still contributes to it.
                while column_left < run_right {
                    buffer[column] += run_right.min(column_right) - run_left.max(column_left);
                    if column_right > run_right {
                        break;
                    }
                    column += 1;
                    if column >= buffer.len() {
                        break 'row;
                    }
                    column_left += scale;
                    column_right += scale;
                }
            }
        }
    }

    // ------------------------------------------------------------------------
    // flips
    // ------------------------------------------------------------------------

    /// Reverse the row order.
    pub fn flip_vertically(&mut self) {
        self.rows.reverse();
    }

    /// Reverse the runs of every row, keeping the starts-with-white parity.
    ///
    /// A row that ends in black gains a zero-length leading white run; a row
    /// that started with one loses it (reversed, it would trail).
    pub fn flip_horizontally(&mut self) {
        for row in &mut self.rows {
            if row.len() == 1 {
                // A single white run is symmetric.
                continue;
            }
            let old = std::mem::take(row);
            let ends_black = run_is_black(old.len() - 1);
            let skip = (old[0] == 0) as usize;
            let mut flipped = RunArray::with_capacity(old.len() + ends_black as usize - skip);
            if ends_black {
                flipped.push(0);
            }
            flipped.extend(old[skip..].iter().rev());
            *row = flipped;
        }
    }

    // ------------------------------------------------------------------------
    // shifts
    // ------------------------------------------------------------------------

    /// Circular shift of every row by `columns` pixels, positive toward
    /// higher column indices.
    pub fn shift_horizontally(&mut self, columns: i32) {
        if self.width == 0 {
            return;
        }
        let split = (-columns).rem_euclid(self.width as i32) as u32;
        if split == 0 {
            return;
        }
        let width = self.width;
        for row in &mut self.rows {
            let old = std::mem::take(row);
            let mut builder = RowBuilder::with_capacity(old.len() + 2);
            emit_run_range(&old, split, width, &mut builder);
            emit_run_range(&old, 0, split, &mut builder);
            *row = builder.finish();
        }
    }

    /// Circular shift of the row list by `rows` positions, positive toward
    /// higher row indices. Three subrange reversals rotate in place.
    pub fn shift_vertically(&mut self, rows: i32) {
        if self.rows.is_empty() {
            return;
        }
        let split = (-rows).rem_euclid(self.rows.len() as i32) as usize;
        self.rows[..split].reverse();
        self.rows[split..].reverse();
        self.rows.reverse();
    }

    // ------------------------------------------------------------------------
    // resize
    // ------------------------------------------------------------------------

    /// Grow the canvas by a white border of the given per-side widths.
    ///
    /// Existing rows extend their leading white run by `left`; on the right a
    /// trailing white run is extended, or appended when the row ends black.
    pub fn add(&mut self, left: u32, right: u32, up: u32, down: u32) {
        self.width += left + right;
        for row in &mut self.rows {
            row[0] += left;
            if right > 0 {
                let last = row.len() - 1;
                if run_is_black(last) {
                    row.push(right);
                } else {
                    row[last] += right;
                }
            }
        }
        let width = self.width;
        self.rows.splice(
            0..0,
            std::iter::repeat_with(|| vec![width]).take(up as usize),
        );
        for _ in 0..down {
            self.rows.push(vec![width]);
        }
    }

    /// Strip a border of the given per-side widths. The stripped border must
    /// be blank; content there violates the caller's contract.
    pub fn remove(&mut self, left: u32, right: u32, up: u32, down: u32) {
        debug_assert!((up + down) as usize <= self.rows.len());
        debug_assert!(left + right <= self.width);
        self.rows.drain(..up as usize);
        self.rows.truncate(self.rows.len() - down as usize);
        self.width -= left + right;
        for row in &mut self.rows {
            debug_assert!(row[0] >= left, "stripped border must be blank");
            row[0] -= left;
            if right > 0 {
                let last = row.len() - 1;
                debug_assert!(
                    !run_is_black(last) && row[last] >= right,
                    "stripped border must be blank"
                );
                row[last] -= right;
                if row[last] == 0 && last > 0 {
                    row.pop();
                }
            }
        }
    }

    /// Nearest-neighbor upscale: run lengths multiply by `factor` and every
    /// row is replicated `factor` times.
    pub fn enlarge(&mut self, factor: u32) {
        debug_assert!(factor >= 1);
        self.width *= factor;
        let mut enlarged = Vec::with_capacity(self.rows.len() * factor as usize);
        for row in &self.rows {
            let scaled: RunArray = row.iter().map(|&length| length * factor).collect();
            for _ in 1..factor {
                enlarged.push(scaled.clone());
            }
            enlarged.push(scaled);
        }
        self.rows = enlarged;
    }

    /// Nearest-neighbor downscale by `factor`, which must divide both the
    /// width and the row count. Keeps the first row of each band; destination
    /// column `i` samples source column `i * factor`.
    pub fn shrink(&mut self, factor: u32) {
        debug_assert!(factor >= 1);
        debug_assert_eq!(self.width % factor, 0);
        debug_assert_eq!(self.rows.len() % factor as usize, 0);
        let mut shrunk = Vec::with_capacity(self.rows.len() / factor as usize);
        for row in self.rows.iter().step_by(factor as usize) {
            let mut builder = RowBuilder::with_capacity(row.len());
            let mut left = 0u32;
            for (index, &length) in row.iter().enumerate() {
                let right = left + length;
                // Destination pixels whose sample column falls in the run.
                let dest_left = (left + factor - 1) / factor;
                let dest_right = (right + factor - 1) / factor;
                builder.push(run_is_black(index), dest_right - dest_left);
                left = right;
            }
            shrunk.push(builder.finish());
        }
        self.rows = shrunk;
        self.width /= factor;
    }
}

// ============================================================================
// Tests
// ============================================================================
