//! Property-based invariant tests for the run-length raster.
//!
//! These verify the structural contract of `RunRaster` under arbitrary
//! operation sequences:
//!
//! 1. Rows stay canonical: they sum to the width and hold no zero-length
//!    run past index 0
//! 2. `line` paints exactly the clamped span and nothing else
//! 3. Painting spans and then erasing them restores the blank canvas
//! 4. Repainting a span in its current color changes nothing
//! 5. Both flips are involutions
//! 6. Circular shifts cancel and are periodic in the canvas size
//! 7. Adding a border and removing it round-trips exactly
//! 8. Enlarging and shrinking by the same factor round-trips exactly
//! 9. `combine` counts black source pixels exactly, bounded by scale squared

use inscribble::basics::{run_is_black, Run};
use inscribble::raster::RunRaster;
use proptest::prelude::*;

// ============================================================================
// Strategies and helpers
// ============================================================================

/// Operations closed over arbitrary canvas content.
#[derive(Debug, Clone)]
enum Op {
    Line { left: i32, right: i32, y: i32, black: bool },
    FlipH,
    FlipV,
    ShiftH(i32),
    ShiftV(i32),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (-8i32..72, -8i32..72, -4i32..36, any::<bool>())
            .prop_map(|(left, right, y, black)| Op::Line { left, right, y, black }),
        Just(Op::FlipH),
        Just(Op::FlipV),
        (-70i32..70).prop_map(Op::ShiftH),
        (-40i32..40).prop_map(Op::ShiftV),
    ]
}

fn apply_ops(raster: &mut RunRaster, ops: &[Op]) {
    for op in ops {
        match *op {
            Op::Line { left, right, y, black } => raster.line(left, right, y, black),
            Op::FlipH => raster.flip_horizontally(),
            Op::FlipV => raster.flip_vertically(),
            Op::ShiftH(columns) => raster.shift_horizontally(columns),
            Op::ShiftV(rows) => raster.shift_vertically(rows),
        }
    }
}

/// Index of the first non-canonical row, if any.
fn canonical_violation(raster: &RunRaster) -> Option<u32> {
    (0..raster.height()).find(|&y| {
        let row = raster.row(y);
        row.is_empty()
            || row[1..].iter().any(|&length| length == 0)
            || row.iter().sum::<Run>() != raster.width()
    })
}

/// Black pixels of `row` inside the column span `[from, to)`.
fn black_in_span(row: &[Run], from: u32, to: u32) -> u32 {
    let mut left = 0u32;
    let mut total = 0u32;
    for (index, &length) in row.iter().enumerate() {
        let right = left + length;
        if run_is_black(index) {
            total += right.min(to).saturating_sub(left.max(from));
        }
        left = right;
    }
    total
}

fn black_pixels(row: &[Run]) -> u32 {
    black_in_span(row, 0, u32::MAX)
}

// ============================================================================
// 1. Rows stay canonical under arbitrary operations
// ============================================================================

proptest! {
    #[test]
    fn rows_stay_canonical(
        width in 1u32..64,
        height in 1u32..32,
        ops in prop::collection::vec(op_strategy(), 0..200),
    ) {
        let mut raster = RunRaster::new(width, height);
        apply_ops(&mut raster, &ops);
        prop_assert_eq!(raster.width(), width, "width must survive every op");
        prop_assert_eq!(raster.height(), height, "height must survive every op");
        prop_assert_eq!(
            canonical_violation(&raster),
            None,
            "non-canonical row after {} ops",
            ops.len()
        );
    }
}

// ============================================================================
// 2. line paints exactly the clamped span
// ============================================================================

proptest! {
    #[test]
    fn line_paints_exactly_the_clamped_span(
        width in 1u32..64,
        height in 1u32..16,
        left in -8i32..72,
        right in -8i32..72,
        y in -4i32..20,
    ) {
        let mut raster = RunRaster::new(width, height);
        raster.line(left, right, y, true);

        let clamped_right = right.clamp(0, width as i32) as u32;
        let clamped_left = left.clamp(0, clamped_right as i32) as u32;
        let span = clamped_right - clamped_left;

        for row_index in 0..height {
            let row = raster.row(row_index);
            if row_index as i32 == y {
                prop_assert_eq!(black_pixels(row), span, "wrong pixel count on painted row");
                prop_assert_eq!(
                    black_in_span(row, clamped_left, clamped_right),
                    span,
                    "painted pixels landed outside [{}, {})",
                    clamped_left,
                    clamped_right
                );
            } else {
                prop_assert_eq!(black_pixels(row), 0, "row {} must stay blank", row_index);
            }
        }
    }
}

// ============================================================================
// 3. Painting then erasing restores the blank canvas
// ============================================================================

proptest! {
    #[test]
    fn paint_then_erase_restores_blank(
        width in 1u32..64,
        height in 1u32..16,
        spans in prop::collection::vec((0i32..64, 0i32..64, 0i32..16), 1..24),
    ) {
        let mut raster = RunRaster::new(width, height);
        let blank = raster.clone();
        for &(a, b, y) in &spans {
            raster.line(a.min(b), a.max(b), y, true);
        }
        for &(a, b, y) in &spans {
            raster.line(a.min(b), a.max(b), y, false);
        }
        prop_assert_eq!(raster, blank, "erasing every painted span must blank the canvas");
    }
}

// ============================================================================
// 4. Repainting a span in its current color changes nothing
// ============================================================================

proptest! {
    #[test]
    fn repaint_same_color_is_idempotent(
        width in 1u32..64,
        height in 1u32..16,
        ops in prop::collection::vec(op_strategy(), 0..60),
        left in 0i32..64,
        length in 0i32..32,
        y in 0i32..16,
        black in any::<bool>(),
    ) {
        let mut raster = RunRaster::new(width, height);
        apply_ops(&mut raster, &ops);
        raster.line(left, left + length, y, black);
        let once = raster.clone();
        raster.line(left, left + length, y, black);
        prop_assert_eq!(raster, once);
    }
}

// ============================================================================
// 5. Flips are involutions
// ============================================================================

proptest! {
    #[test]
    fn flips_are_involutions(
        width in 1u32..64,
        height in 1u32..32,
        ops in prop::collection::vec(op_strategy(), 0..100),
    ) {
        let mut raster = RunRaster::new(width, height);
        apply_ops(&mut raster, &ops);
        let reference = raster.clone();

        raster.flip_horizontally();
        raster.flip_horizontally();
        prop_assert_eq!(&raster, &reference, "horizontal flip twice must be identity");

        raster.flip_vertically();
        raster.flip_vertically();
        prop_assert_eq!(&raster, &reference, "vertical flip twice must be identity");
    }
}

// ============================================================================
// 6. Shifts cancel and are periodic
// ============================================================================

proptest! {
    #[test]
    fn opposite_shifts_cancel(
        width in 1u32..64,
        height in 1u32..32,
        ops in prop::collection::vec(op_strategy(), 0..100),
        columns in -70i32..70,
        rows in -40i32..40,
    ) {
        let mut raster = RunRaster::new(width, height);
        apply_ops(&mut raster, &ops);
        let reference = raster.clone();

        raster.shift_horizontally(columns);
        raster.shift_horizontally(-columns);
        prop_assert_eq!(&raster, &reference, "opposite horizontal shifts must cancel");

        raster.shift_vertically(rows);
        raster.shift_vertically(-rows);
        prop_assert_eq!(&raster, &reference, "opposite vertical shifts must cancel");
    }

    #[test]
    fn full_period_shift_is_identity(
        width in 1u32..64,
        height in 1u32..32,
        ops in prop::collection::vec(op_strategy(), 0..100),
    ) {
        let mut raster = RunRaster::new(width, height);
        apply_ops(&mut raster, &ops);
        let reference = raster.clone();

        raster.shift_horizontally(width as i32);
        prop_assert_eq!(&raster, &reference, "shifting by the width must be identity");

        raster.shift_vertically(height as i32);
        prop_assert_eq!(&raster, &reference, "shifting by the height must be identity");
    }
}

// ============================================================================
// 7. Border add then remove round-trips
// ============================================================================

proptest! {
    #[test]
    fn add_then_remove_is_identity(
        width in 1u32..48,
        height in 1u32..24,
        ops in prop::collection::vec(op_strategy(), 0..100),
        left in 0u32..8,
        right in 0u32..8,
        up in 0u32..8,
        down in 0u32..8,
    ) {
        let mut raster = RunRaster::new(width, height);
        apply_ops(&mut raster, &ops);
        let reference = raster.clone();

        raster.add(left, right, up, down);
        prop_assert_eq!(raster.width(), width + left + right);
        prop_assert_eq!(raster.height(), height + up + down);
        prop_assert_eq!(
            canonical_violation(&raster),
            None,
            "add produced a non-canonical row"
        );

        raster.remove(left, right, up, down);
        prop_assert_eq!(raster, reference, "removing the added border must round-trip");
    }
}

// ============================================================================
// 8. Enlarge then shrink round-trips
// ============================================================================

proptest! {
    #[test]
    fn enlarge_then_shrink_is_identity(
        width in 1u32..32,
        height in 1u32..16,
        ops in prop::collection::vec(op_strategy(), 0..60),
        factor in 1u32..5,
    ) {
        let mut raster = RunRaster::new(width, height);
        apply_ops(&mut raster, &ops);
        let reference = raster.clone();

        raster.enlarge(factor);
        prop_assert_eq!(raster.width(), width * factor);
        prop_assert_eq!(raster.height(), height * factor);
        prop_assert_eq!(
            canonical_violation(&raster),
            None,
            "enlarge produced a non-canonical row"
        );

        raster.shrink(factor);
        prop_assert_eq!(raster, reference, "shrinking by the same factor must round-trip");
    }
}

// ============================================================================
// 9. combine counts black pixels exactly
// ============================================================================

proptest! {
    #[test]
    fn combine_counts_are_exact(
        width_squares in 1u32..12,
        height_squares in 1u32..8,
        scale in 1u32..6,
        ops in prop::collection::vec(op_strategy(), 0..100),
        display_y_seed in 0u32..64,
        x_seed in 0u32..64,
        buffer_len in 1usize..16,
    ) {
        let mut raster = RunRaster::new(width_squares * scale, height_squares * scale);
        apply_ops(&mut raster, &ops);

        let display_y = display_y_seed % height_squares;
        let x = x_seed % width_squares;
        let mut buffer = vec![0u32; buffer_len];
        raster.combine(&mut buffer, x, display_y, scale);

        let row_start = (display_y * scale) as usize;
        let row_stop = row_start + scale as usize;
        for (i, &count) in buffer.iter().enumerate() {
            let from = (x + i as u32) * scale;
            let to = from + scale;
            let expected: u32 = raster.rows()[row_start..row_stop]
                .iter()
                .map(|row| black_in_span(row, from, to))
                .sum();
            prop_assert_eq!(count, expected, "column {} miscounted", i);
            prop_assert!(
                count <= scale * scale,
                "column {} count {} exceeds {}",
                i,
                count,
                scale * scale
            );
        }
    }
}
