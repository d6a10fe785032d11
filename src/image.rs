//! Canvas facade: composes the raster, undo history, stroke geometry,
//! rendering, and persistence behind the surface a UI layer drives.
//!
//! The facade owns the split between image space (raster pixels) and display
//! space (image space divided by the `pixels_below` zoom factor). Cursor
//! positions arrive in display space and every region handed back for screen
//! invalidation is display space; the engine underneath only ever sees
//! image-space integers.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

use thiserror::Error;

use crate::basics::{PointF, RectF, RectI};
use crate::change::{Change, Mark, UndoReport};
use crate::change_manager::ChangeManager;
use crate::color::{argb_to_rgba8, shade_table, Rgba};
use crate::file_format::{self, CanvasColors, FileError};
use crate::pixel_buffer::PixelBuffer;
use crate::raster::RunRaster;
use crate::stroke::{Capsule, CursorState};

/// Default canvas edge length in image pixels.
pub const SIZE_DEFAULT: u32 = 20000;

// ============================================================================
// Settings
// ============================================================================

/// Canvas creation parameters and the colors rendering uses.
///
/// A loaded file overwrites the size and color fields with its own records.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageSettings {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub display_scale: u32,
    pub export_scale: u32,
    pub display_paper: Rgba,
    pub display_ink: Rgba,
    pub export_paper: Rgba,
    pub export_ink: Rgba,
}

impl Default for ImageSettings {
    fn default() -> Self {
        let scale = (SIZE_DEFAULT / 2000).max(1);
        Self {
            canvas_width: SIZE_DEFAULT,
            canvas_height: SIZE_DEFAULT,
            display_scale: scale,
            export_scale: scale,
            display_paper: Rgba::new(0.5, 0.5, 0.5, 1.0),
            display_ink: Rgba::new(0.0, 0.0, 0.0, 1.0),
            export_paper: Rgba::new(0.0, 0.0, 0.0, 0.0),
            export_ink: Rgba::new(0.0, 0.0, 0.0, 1.0),
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("i/o failure: {0}")]
    Io(#[from] io::Error),
    #[error("png encoding failed: {0}")]
    Png(#[from] png::EncodingError),
}

// ============================================================================
// Image
// ============================================================================

/// A drawable, undoable, persistable canvas.
pub struct Image {
    settings: ImageSettings,
    raster: RunRaster,
    changes: ChangeManager,
    current_mark: Option<Mark>,
    /// Image pixels per display pixel along each axis.
    pixels_below: u32,
    modified_since_save: bool,
}

impl Image {
    /// Blank canvas of the configured size.
    pub fn new(settings: ImageSettings) -> Self {
        let raster = RunRaster::new(settings.canvas_width, settings.canvas_height);
        let pixels_below = settings.display_scale.max(1);
        Self {
            settings,
            raster,
            changes: ChangeManager::new(),
            current_mark: None,
            pixels_below,
            modified_since_save: false,
        }
    }

    /// Open a canvas file. A missing file yields a blank canvas of the
    /// configured size; an unreadable or malformed one does the same after
    /// reporting, so opening never fails outright.
    pub fn load<P: AsRef<Path>>(mut settings: ImageSettings, path: P) -> Self {
        let path = path.as_ref();
        let file = match File::open(path) {
            Ok(file) => file,
            Err(error) => {
                if error.kind() != io::ErrorKind::NotFound {
                    log::warn!("could not open {}: {error}", path.display());
                }
                return Self::new(settings);
            }
        };
        match file_format::load(BufReader::new(file)) {
            Ok(contents) => {
                if let Some(colors) = contents.colors {
                    settings.display_paper = colors.display_paper;
                    settings.display_ink = colors.display_ink;
                    settings.export_paper = colors.export_paper;
                    settings.export_ink = colors.export_ink;
                }
                settings.canvas_width = contents.raster.width();
                settings.canvas_height = contents.raster.height();
                let pixels_below = settings.display_scale.max(1);
                Self {
                    settings,
                    raster: contents.raster,
                    changes: ChangeManager::new(),
                    current_mark: None,
                    pixels_below,
                    modified_since_save: false,
                }
            }
            Err(error) => {
                log::warn!("could not load {}: {error}", path.display());
                Self::new(settings)
            }
        }
    }

    /// Write the canvas to `path`. Clears the modified flag on success.
    pub fn save<P: AsRef<Path>>(&mut self, path: P) -> Result<(), FileError> {
        let mut writer = BufWriter::new(File::create(path)?);
        file_format::save(&mut writer, &self.colors(), &self.raster)?;
        writer.flush()?;
        self.modified_since_save = false;
        Ok(())
    }

    /// Render the whole canvas at the export scale with the export colors
    /// and write it to `path` as an RGBA PNG.
    pub fn export<P: AsRef<Path>>(&self, path: P) -> Result<(), ExportError> {
        let scale = self.settings.export_scale.max(1);
        let width = self.raster.width() / scale;
        let height = self.raster.height() / scale;

        let mut surface = PixelBuffer::new(width as usize, height as usize);
        self.render_region(
            &mut surface,
            0,
            0,
            width,
            height,
            scale,
            &self.settings.export_ink,
            &self.settings.export_paper,
        );

        let mut bytes = Vec::with_capacity(surface.pixels().len() * 4);
        for &pixel in surface.pixels() {
            bytes.extend_from_slice(&argb_to_rgba8(pixel));
        }

        let file = BufWriter::new(File::create(path)?);
        let mut encoder = png::Encoder::new(file, width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut png_writer = encoder.write_header()?;
        png_writer.write_image_data(&bytes)?;
        png_writer.finish()?;
        Ok(())
    }

    // ------------------------------------------------------------------------
    // strokes
    // ------------------------------------------------------------------------

    /// Paint one stroke segment between two cursor samples, in ink when
    /// `black` or paper otherwise, and return the display-space region it
    /// may have touched.
    ///
    /// The first segment of a stroke opens a fresh undo entry; each touched
    /// row is snapshotted before its first repaint so the whole stroke
    /// undoes as one step.
    pub fn mark(&mut self, start: &CursorState, end: &CursorState, black: bool) -> RectF {
        let scale = self.pixels_below as f32;
        let from = start.position * scale;
        let to = end.position * scale;

        let capsule = Capsule::new(from, start.radius, to, end.radius);
        let mark = self.current_mark.get_or_insert_with(Mark::new);
        let raster = &mut self.raster;
        capsule.for_each_span(|left, right, row| {
            if row >= 0 {
                mark.capture(row as u32, raster);
            }
            raster.line(left, right, row, black);
        });

        self.modified_since_save = true;

        let x1 = (from.x - start.radius).min(to.x - end.radius);
        let y1 = (from.y - start.radius).min(to.y - end.radius);
        let width = (to.x - from.x).abs() + start.radius + end.radius;
        let height = (to.y - from.y).abs() + start.radius + end.radius;
        RectF::new(
            x1 / scale,
            y1 / scale,
            (x1 + width) / scale,
            (y1 + height) / scale,
        )
    }

    /// Commit the in-progress stroke as one undo step. A no-op outside a
    /// stroke.
    pub fn finish_mark(&mut self) {
        if let Some(mark) = self.current_mark.take() {
            self.changes.add_undo(Change::Mark(mark));
        }
    }

    // ------------------------------------------------------------------------
    // structural operations
    // ------------------------------------------------------------------------

    /// Mirror the canvas left to right.
    pub fn flip_horizontally(&mut self) {
        self.apply_structural(Change::FlipHorizontal);
    }

    /// Mirror the canvas top to bottom.
    pub fn flip_vertically(&mut self) {
        self.apply_structural(Change::FlipVertical);
    }

    /// Scroll the canvas with wraparound by whole display pixels. `large`
    /// makes every display pixel count tenfold.
    pub fn shift(&mut self, large: bool, right: i32, down: i32) {
        let step = self.pixels_below as i32 * if large { 10 } else { 1 };
        self.apply_structural(Change::Shift {
            right: right * step,
            down: down * step,
        });
    }

    /// Scale every pixel up by `factor` along both axes.
    pub fn scale(&mut self, factor: u32) {
        self.apply_structural(Change::Enlarge { factor });
    }

    /// Grow the canvas by white borders of the given image-pixel widths.
    pub fn add(&mut self, left: u32, right: u32, up: u32, down: u32) {
        self.apply_structural(Change::Add {
            left,
            right,
            up,
            down,
        });
    }

    /// Structural operations close the open stroke, apply immediately, and
    /// land their pre-applied inverse on the undo stack unmerged.
    fn apply_structural(&mut self, change: Change) {
        self.finish_mark();
        let inverse = change.apply(&mut self.raster);
        self.changes.push_direct(inverse);
        self.modified_since_save = true;
    }

    // ------------------------------------------------------------------------
    // undo/redo
    // ------------------------------------------------------------------------

    /// Revert the most recent undo step. An open stroke is committed first
    /// so it is the step reverted. A no-op when there is nothing to undo.
    pub fn undo(&mut self) -> UndoReport {
        self.finish_mark();
        self.changes.undo(&mut self.raster)
    }

    /// Reapply the most recently undone step. Calling this mid-stroke is a
    /// caller error. A no-op when there is nothing to redo.
    pub fn redo(&mut self) -> UndoReport {
        debug_assert!(self.current_mark.is_none());
        self.changes.redo(&mut self.raster)
    }

    pub fn can_undo(&self) -> bool {
        self.changes.can_undo() || self.current_mark.is_some()
    }

    pub fn can_redo(&self) -> bool {
        self.changes.can_redo()
    }

    /// Whether there is anything worth prompting to save: an undo step
    /// exists and the canvas changed since the last save.
    pub fn has_changes(&self) -> bool {
        self.can_undo() && self.modified_since_save
    }

    // ------------------------------------------------------------------------
    // view
    // ------------------------------------------------------------------------

    /// Zoom out (positive) or in (negative) by whole downsample steps. The
    /// factor never drops below one. Returns the new factor.
    pub fn zoom(&mut self, amount: i32) -> u32 {
        debug_assert!(amount >= 0 || amount.unsigned_abs() <= self.pixels_below);
        self.pixels_below = (i64::from(self.pixels_below) + i64::from(amount)).max(1) as u32;
        self.pixels_below
    }

    /// Canvas size in image pixels.
    pub fn size(&self) -> (u32, u32) {
        (self.raster.width(), self.raster.height())
    }

    /// Canvas extent in display pixels. Fractional when the size does not
    /// divide by the zoom factor.
    pub fn display_size(&self) -> PointF {
        PointF::new(
            self.raster.width() as f32 / self.pixels_below as f32,
            self.raster.height() as f32 / self.pixels_below as f32,
        )
    }

    // ------------------------------------------------------------------------
    // rendering
    // ------------------------------------------------------------------------

    /// Render the display-space region `invalid` into `target`, a buffer
    /// spanning the whole display surface (its dimensions cover
    /// [`Image::display_size`], rounded up). Returns the integer region
    /// actually rendered, or `None` when the request misses the canvas.
    ///
    /// The clipped region is expanded outward to pixel boundaries, so a
    /// fractional invalidation never leaves stale pixels inside it.
    pub fn render(&self, invalid: &RectF, target: &mut PixelBuffer) -> Option<RectI> {
        let display = self.display_size();
        let mut region = *invalid;
        if !region.clip(&RectF::new(0.0, 0.0, display.x, display.y)) {
            return None;
        }

        let left = region.x1 as u32;
        let top = region.y1 as u32;
        let right = region.x2.ceil() as u32;
        let bottom = region.y2.ceil() as u32;
        if left >= right || top >= bottom {
            return None;
        }

        self.render_region(
            target,
            left,
            top,
            right - left,
            bottom - top,
            self.pixels_below,
            &self.settings.display_ink,
            &self.settings.display_paper,
        );
        Some(RectI::new(
            left as i32,
            top as i32,
            right as i32,
            bottom as i32,
        ))
    }

    /// Downsample-and-shade loop shared by display rendering and export:
    /// for each target row, accumulate black coverage per column, then map
    /// the counts through the background-to-foreground shade table.
    #[allow(clippy::too_many_arguments)]
    fn render_region(
        &self,
        target: &mut PixelBuffer,
        left: u32,
        top: u32,
        width: u32,
        height: u32,
        scale: u32,
        foreground: &Rgba,
        background: &Rgba,
    ) {
        let shades = shade_table(background, foreground, scale);
        let mut row_shades = vec![0u32; width as usize];
        for row in 0..height {
            row_shades.fill(0);
            self.raster.combine(&mut row_shades, left, top + row, scale);
            let pixels = &mut target.row_mut((top + row) as usize)
                [left as usize..(left + width) as usize];
            for (pixel, &shade) in pixels.iter_mut().zip(&row_shades) {
                *pixel = shades[shade as usize];
            }
        }
    }

    fn colors(&self) -> CanvasColors {
        CanvasColors {
            display_paper: self.settings.display_paper,
            display_ink: self.settings.display_ink,
            export_paper: self.settings.export_paper,
            export_ink: self.settings.export_ink,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
