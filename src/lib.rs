//! # inscribble
//!
//! Scanline raster engine for a monochrome sketching surface. The canvas is
//! an arbitrarily large single-bit image held as per-row run lengths, cheap
//! to mutate under freehand stroke input and cheap to downsample for
//! zoomed-out display.
//!
//! The engine provides:
//!
//! - Run-length row storage with single-pass span splicing
//! - Capsule rasterization of brush strokes between cursor samples
//! - Whole-canvas flips, wraparound shifts, border resizing, and integer
//!   scaling
//! - Bounded undo/redo with per-operation merge and cancel rules
//! - Downsampled shading into ARGB pixel buffers and PNG export
//! - A versioned, compressed canvas file format
//!
//! ## Architecture
//!
//! Everything routes through the [`image::Image`] facade:
//!
//! 1. **Stroke input** — cursor sample pairs become row spans via
//!    [`stroke::Capsule`]
//! 2. **Raster mutation** — spans and structural edits splice
//!    [`raster::RunRaster`] rows in place
//! 3. **History** — every operation lands on [`change_manager::ChangeManager`]
//!    as an invertible [`change::Change`]
//! 4. **Output** — [`raster::RunRaster::combine`] accumulates coverage that
//!    shade tables turn into pixels, for the screen or a PNG

// Foundation types
pub mod basics;
pub mod color;

// Canvas storage and mutation
pub mod raster;
pub mod stroke;

// Undo/redo history
pub mod change;
pub mod change_manager;

// Output and persistence
pub mod file_format;
pub mod image;
pub mod pixel_buffer;
