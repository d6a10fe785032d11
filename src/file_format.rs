//! Versioned canvas file codec.
//!
//! A canvas file is a 32-byte NUL-padded ASCII identifier followed by a
//! gzip-compressed body: four RGBA color records (absent in v00), the row
//! count and canvas width, then per row a run count and that many run
//! values. Three generations of the layout exist and each gets its own
//! decode function; saving always writes the newest. The two older
//! generations were written native-endian and may carry redundant
//! zero-length runs, so every decoded row is rebuilt into canonical form
//! and checked against the declared width before it is accepted.

use std::io::{self, Read, Write};

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use thiserror::Error;

use crate::basics::{run_is_black, Run};
use crate::color::Rgba;
use crate::raster::{RowBuilder, RunRaster};

/// File extension for saved canvases.
pub const EXTENSION: &str = ".inscribble";

const IDENTIFIER_LEN: usize = 32;
const IDENTIFIER_V00: &str = "inscribble v00\n";
const IDENTIFIER_V01: &str = "inscribble v01\n";
const IDENTIFIER_V02: &str = "inscribble v02\n";

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Error)]
pub enum FileError {
    #[error("i/o failure: {0}")]
    Io(#[from] io::Error),
    #[error("unrecognized file identifier")]
    UnknownIdentifier,
    #[error("row {row} sums to {sum}, expected the declared width {width}")]
    RowWidthMismatch { row: u32, sum: u64, width: u32 },
}

// ============================================================================
// File contents
// ============================================================================

/// The four colors stored alongside the image data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasColors {
    pub display_paper: Rgba,
    pub display_ink: Rgba,
    pub export_paper: Rgba,
    pub export_ink: Rgba,
}

/// Everything a canvas file holds. `colors` is `None` for v00 files, which
/// predate color records.
#[derive(Debug)]
pub struct CanvasFile {
    pub colors: Option<CanvasColors>,
    pub raster: RunRaster,
}

// ============================================================================
// Save (always the newest version)
// ============================================================================

/// Write `raster` and `colors` in the v02 layout: identifier uncompressed,
/// everything after it gzip-compressed and little-endian.
pub fn save<W: Write>(
    mut writer: W,
    colors: &CanvasColors,
    raster: &RunRaster,
) -> Result<(), FileError> {
    writer.write_all(&padded_identifier(IDENTIFIER_V02))?;
    let mut body = GzEncoder::new(writer, Compression::default());
    write_color(&mut body, &colors.display_paper)?;
    write_color(&mut body, &colors.display_ink)?;
    write_color(&mut body, &colors.export_paper)?;
    write_color(&mut body, &colors.export_ink)?;
    write_u32(&mut body, raster.height())?;
    write_u32(&mut body, raster.width())?;
    for row in raster.rows() {
        write_u32(&mut body, row.len() as u32)?;
        for &run in row {
            write_u32(&mut body, run)?;
        }
    }
    body.finish()?;
    Ok(())
}

fn write_u32<W: Write>(writer: &mut W, value: u32) -> Result<(), FileError> {
    writer.write_all(&value.to_le_bytes())?;
    Ok(())
}

fn write_color<W: Write>(writer: &mut W, color: &Rgba) -> Result<(), FileError> {
    for component in [color.r, color.g, color.b, color.a] {
        writer.write_all(&component.to_le_bytes())?;
    }
    Ok(())
}

// ============================================================================
// Load (one decode path per version)
// ============================================================================

/// Read a canvas file of any supported version.
pub fn load<R: Read>(mut reader: R) -> Result<CanvasFile, FileError> {
    let mut identifier = [0u8; IDENTIFIER_LEN];
    reader.read_exact(&mut identifier)?;
    if identifier == padded_identifier(IDENTIFIER_V02) {
        decode_v02(GzDecoder::new(reader))
    } else if identifier == padded_identifier(IDENTIFIER_V01) {
        decode_v01(GzDecoder::new(reader))
    } else if identifier == padded_identifier(IDENTIFIER_V00) {
        decode_v00(GzDecoder::new(reader))
    } else {
        Err(FileError::UnknownIdentifier)
    }
}

/// Current layout: colors, then flat runs, all little-endian.
fn decode_v02<R: Read>(mut body: R) -> Result<CanvasFile, FileError> {
    let colors = read_colors(&mut body, f32::from_le_bytes)?;
    let raster = read_flat_rows(&mut body, u32::from_le_bytes)?;
    Ok(CanvasFile {
        colors: Some(colors),
        raster,
    })
}

/// v01 matched the current layout but was written native-endian.
fn decode_v01<R: Read>(mut body: R) -> Result<CanvasFile, FileError> {
    let colors = read_colors(&mut body, f32::from_ne_bytes)?;
    let raster = read_flat_rows(&mut body, u32::from_ne_bytes)?;
    Ok(CanvasFile {
        colors: Some(colors),
        raster,
    })
}

/// v00 had no color records and stored each row as (white, black) length
/// pairs rather than flat alternating runs.
fn decode_v00<R: Read>(mut body: R) -> Result<CanvasFile, FileError> {
    let raster = read_pair_rows(&mut body, u32::from_ne_bytes)?;
    Ok(CanvasFile {
        colors: None,
        raster,
    })
}

// ============================================================================
// Record readers
// ============================================================================

fn padded_identifier(text: &str) -> [u8; IDENTIFIER_LEN] {
    let mut padded = [0u8; IDENTIFIER_LEN];
    padded[..text.len()].copy_from_slice(text.as_bytes());
    padded
}

fn read_bytes<R: Read>(reader: &mut R) -> Result<[u8; 4], FileError> {
    let mut bytes = [0u8; 4];
    reader.read_exact(&mut bytes)?;
    Ok(bytes)
}

fn read_color<R: Read>(reader: &mut R, decode: fn([u8; 4]) -> f32) -> Result<Rgba, FileError> {
    Ok(Rgba::new(
        decode(read_bytes(reader)?),
        decode(read_bytes(reader)?),
        decode(read_bytes(reader)?),
        decode(read_bytes(reader)?),
    ))
}

fn read_colors<R: Read>(
    reader: &mut R,
    decode: fn([u8; 4]) -> f32,
) -> Result<CanvasColors, FileError> {
    Ok(CanvasColors {
        display_paper: read_color(reader, decode)?,
        display_ink: read_color(reader, decode)?,
        export_paper: read_color(reader, decode)?,
        export_ink: read_color(reader, decode)?,
    })
}

/// Rows stored as a run count followed by that many alternating run lengths.
///
/// Counts come from the file and cannot be trusted, so nothing here reserves
/// memory ahead of the bytes actually read. A truncated stream surfaces as an
/// i/o error from `read_bytes` before any row is accepted.
fn read_flat_rows<R: Read>(
    reader: &mut R,
    decode: fn([u8; 4]) -> u32,
) -> Result<RunRaster, FileError> {
    let row_count = decode(read_bytes(reader)?);
    let width = decode(read_bytes(reader)?);
    let mut rows = Vec::new();
    for row_index in 0..row_count {
        let run_count = decode(read_bytes(reader)?);
        let mut builder = RowBuilder::new();
        for run_index in 0..run_count {
            let length = decode(read_bytes(reader)?);
            builder.push(run_is_black(run_index as usize), length);
        }
        rows.push(checked_row(row_index, builder.finish(), width)?);
    }
    Ok(RunRaster::from_rows(width, rows))
}

/// Rows stored as a pair count followed by that many (white, black) pairs.
fn read_pair_rows<R: Read>(
    reader: &mut R,
    decode: fn([u8; 4]) -> u32,
) -> Result<RunRaster, FileError> {
    let row_count = decode(read_bytes(reader)?);
    let width = decode(read_bytes(reader)?);
    let mut rows = Vec::new();
    for row_index in 0..row_count {
        let pair_count = decode(read_bytes(reader)?);
        let mut builder = RowBuilder::new();
        for _ in 0..pair_count {
            let white = decode(read_bytes(reader)?);
            let black = decode(read_bytes(reader)?);
            builder.push(false, white);
            builder.push(true, black);
        }
        rows.push(checked_row(row_index, builder.finish(), width)?);
    }
    Ok(RunRaster::from_rows(width, rows))
}

fn checked_row(row_index: u32, row: Vec<Run>, width: u32) -> Result<Vec<Run>, FileError> {
    let sum: u64 = row.iter().map(|&run| u64::from(run)).sum();
    if sum != u64::from(width) {
        return Err(FileError::RowWidthMismatch {
            row: row_index,
            sum,
            width,
        });
    }
    Ok(row)
}

// ============================================================================
// Tests
// ============================================================================
