//! Capsule geometry for brush strokes.
//!
//! A stroke segment covers a capsule: circles at the two cursor samples
//! joined by their tangent lines. The capsule is walked row by row, yielding
//! one `[left, right)` span per row for the raster to paint. All coordinates
//! here are image space.

use crate::basics::{iceil, ifloor, PointF};

// ============================================================================
// CursorState
// ============================================================================

/// One pointer sample: where the brush is and how wide it paints. Positions
/// are display space; the facade scales them into image space before
/// building a capsule. Radii are image space. The ink/paper choice travels
/// with the mark call rather than the sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CursorState {
    pub position: PointF,
    pub radius: f32,
}

impl CursorState {
    pub fn new(position: PointF, radius: f32) -> Self {
        Self { position, radius }
    }
}

// ============================================================================
// Capsule internals
// ============================================================================

/// One tangent edge of the capsule body. Scanned top row to bottom row;
/// `position` is the edge's x at the current row and advances by
/// `movement_per_row` each time a contained row is constrained.
struct EdgeLine {
    min_y: f32,
    max_y: f32,
    is_horizontal: bool,
    position: f32,
    movement_per_row: f32,
    faces_left: bool,
}

impl EdgeLine {
    fn new(start: PointF, end: PointF, is_right_hand: bool) -> Self {
        let min_y = start.y.min(end.y);
        let max_y = start.y.max(end.y);
        let start_is_upper = start.y < end.y;
        let top_x = if start_is_upper { start.x } else { end.x };
        let bottom_x = if start_is_upper { end.x } else { start.x };
        let length = max_y - min_y;
        Self {
            min_y,
            max_y,
            is_horizontal: length < 1.0,
            position: top_x,
            // Unused (and possibly non-finite) when the edge is horizontal.
            movement_per_row: (bottom_x - top_x) / length,
            faces_left: start_is_upper != is_right_hand,
        }
    }

    fn constrain(&mut self, left: &mut i32, right: &mut i32, row: i32) {
        if self.is_horizontal {
            return;
        }
        let row = row as f32;
        if row < self.min_y || row > self.max_y {
            return;
        }
        if self.faces_left {
            *left = (*left).max(ifloor(self.position));
        } else {
            *right = (*right).min(iceil(self.position));
        }
        self.position += self.movement_per_row;
    }
}

/// One end circle of the capsule.
struct Cap {
    center: PointF,
    radius: f32,
    bottom: i32,
    top: i32,
}

impl Cap {
    fn new(center: PointF, radius: f32) -> Self {
        let reach = radius.floor() as i32;
        Self {
            center,
            radius,
            bottom: -reach,
            top: reach,
        }
    }

    fn expand(&self, left: &mut i32, right: &mut i32, row: i32) {
        let relative = row as f32 - self.center.y;
        if relative >= self.bottom as f32 && relative <= self.top as f32 {
            let half_width = (self.radius * self.radius - relative * relative).sqrt();
            *left = (*left).min(ifloor(self.center.x - half_width));
            *right = (*right).max(iceil(self.center.x + half_width));
        }
    }
}

// ============================================================================
// Capsule
// ============================================================================

/// Row-scannable capsule between two stroke samples.
pub struct Capsule {
    line1: EdgeLine,
    line2: EdgeLine,
    from_cap: Cap,
    to_cap: Cap,
    /// Row band where the tangent edges constrain the span.
    first_line_row: i32,
    end_line_row: i32,
    line_left: i32,
    line_right: i32,
    /// Full row extent of the capsule, caps included.
    first_row: i32,
    end_row: i32,
    cap_left: i32,
    cap_right: i32,
}

impl Capsule {
    pub fn new(from: PointF, from_radius: f32, to: PointF, to_radius: f32) -> Self {
        let difference = to - from;
        // Segments under a pixel get an arbitrary tangent direction; the
        // caps dominate the shape anyway.
        let offset = if difference.squared_length() > 1.0 {
            difference.normalized().quarter_right()
        } else {
            PointF::new(1.0, 0.0)
        };

        let line1 = EdgeLine::new(
            from + offset * from_radius,
            to + offset * to_radius,
            true,
        );
        let line2 = EdgeLine::new(
            from - offset * from_radius,
            to - offset * to_radius,
            false,
        );

        let from_cap = Cap::new(from, from_radius);
        let to_cap = Cap::new(to, to_radius);

        let reach = offset.x.abs();
        let first_line_row = 1 + line1.min_y.min(line2.min_y) as i32;
        let end_line_row = line1.max_y.max(line2.max_y) as i32;
        let line_left = (from.x - reach * from_radius).min(to.x - reach * to_radius) as i32;
        let line_right = (from.x + reach * from_radius).max(to.x + reach * to_radius) as i32;

        let first_row = (from_cap.center.y + from_cap.bottom as f32)
            .min(to_cap.center.y + to_cap.bottom as f32) as i32;
        let end_row = (from_cap.center.y + from_cap.top as f32)
            .max(to_cap.center.y + to_cap.top as f32) as i32;
        let cap_left =
            (from_cap.center.x - from_cap.radius).min(to_cap.center.x - to_cap.radius) as i32;
        let cap_right =
            (from_cap.center.x + from_cap.radius).max(to_cap.center.x + to_cap.radius) as i32;

        Self {
            line1,
            line2,
            from_cap,
            to_cap,
            first_line_row,
            end_line_row,
            line_left,
            line_right,
            first_row,
            end_row,
            cap_left,
            cap_right,
        }
    }

    /// Visit each row of the capsule with its `[left, right)` span, in
    /// increasing row order.
    ///
    /// Spans may be empty or inverted where the geometry collapses, and a
    /// degenerate segment can visit one row twice; row painting clamps both
    /// away. Rows may fall outside the canvas, which callers filter or let
    /// the raster ignore.
    pub fn for_each_span(mut self, mut emit: impl FnMut(i32, i32, i32)) {
        // Above the body only the caps contribute. Bounds start inverted so
        // the first expansion sets them.
        for row in self.first_row..self.first_line_row {
            let mut left = self.cap_right;
            let mut right = self.cap_left;
            self.from_cap.expand(&mut left, &mut right, row);
            self.to_cap.expand(&mut left, &mut right, row);
            emit(left, right, row);
        }

        // Body rows: the tangent edges narrow the full horizontal extent,
        // then the caps widen it back where they overhang.
        for row in self.first_line_row..self.end_line_row {
            let mut left = self.line_left;
            let mut right = self.line_right;
            self.line1.constrain(&mut left, &mut right, row);
            self.line2.constrain(&mut left, &mut right, row);
            self.from_cap.expand(&mut left, &mut right, row);
            self.to_cap.expand(&mut left, &mut right, row);
            debug_assert!(left <= right);
            emit(left, right, row);
        }

        // Below the body, caps again.
        for row in self.end_line_row..self.end_row {
            let mut left = self.cap_right;
            let mut right = self.cap_left;
            self.from_cap.expand(&mut left, &mut right, row);
            self.to_cap.expand(&mut left, &mut right, row);
            emit(left, right, row);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
