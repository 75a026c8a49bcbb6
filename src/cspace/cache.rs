//! Persisted configuration-space cache.
//!
//! Building obstacle distances for a large map is the slowest step of a
//! planner restart. The cache stores the static distance layer together with
//! the grid geometry and a hash of the occupancy it was built from.
//!
//! Format:
//! - Header (40 bytes):
//!   - Magic: "CSPACE" (6 bytes)
//!   - Version: u8 (1 byte)
//!   - Reserved: u8 (1 byte)
//!   - Size X: u32 (4 bytes, little-endian)
//!   - Size Y: u32 (4 bytes, little-endian)
//!   - Origin X: f32 (4 bytes, little-endian)
//!   - Origin Y: f32 (4 bytes, little-endian)
//!   - Scale: f32 (4 bytes, little-endian)
//!   - Max radius: f32 (4 bytes, little-endian)
//!   - Occupancy hash: u64 (8 bytes, little-endian)
//! - Distance data: size_x * size_y f32 values, row-major

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use thiserror::Error;

use crate::grid::PlanGrid;

/// Magic bytes for cache files
const MAGIC: &[u8; 6] = b"CSPACE";

/// Current format version
const VERSION: u8 = 1;

/// Header size in bytes
const HEADER_SIZE: usize = 40;

/// Tolerance when comparing stored geometry against the live grid
const METADATA_TOLERANCE: f32 = 1e-3;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Cache read/write failure. Always recoverable by recomputing.
#[derive(Error, Debug)]
pub enum CacheError {
    /// File I/O error
    #[error("cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Not a cache file, or corrupt contents
    #[error("invalid cache format: {0}")]
    InvalidFormat(String),

    /// Written by an incompatible format version
    #[error("cache version mismatch: expected {expected}, found {found}")]
    VersionMismatch {
        /// Expected format version
        expected: u8,
        /// Found format version
        found: u8,
    },

    /// Geometry or occupancy differs from the live grid
    #[error("cache does not match grid: {0}")]
    Mismatch(String),
}

/// FNV-1a hash over the grid dimensions and static occupancy.
///
/// Detects a changed map, not tampering: the hash is not cryptographic.
/// Origin, scale and `max_radius` are checked as separate header fields.
pub fn occupancy_hash(grid: &PlanGrid) -> u64 {
    let mut hash = FNV_OFFSET;
    let mut feed = |byte: u8| {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
    };

    for byte in (grid.size_x() as u32)
        .to_le_bytes()
        .into_iter()
        .chain((grid.size_y() as u32).to_le_bytes())
    {
        feed(byte);
    }
    for cell in grid.cells() {
        feed(cell.occ_state as u8);
    }

    hash
}

/// Save the static distance layer to a file.
pub fn save_cspace(grid: &PlanGrid, max_radius: f32, path: &Path) -> Result<(), CacheError> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_cspace(grid, max_radius, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Write the static distance layer in cache format.
pub fn write_cspace<W: Write>(
    grid: &PlanGrid,
    max_radius: f32,
    writer: &mut W,
) -> Result<(), CacheError> {
    let mut header = [0u8; HEADER_SIZE];

    header[0..6].copy_from_slice(MAGIC);
    header[6] = VERSION;
    // header[7] reserved

    header[8..12].copy_from_slice(&(grid.size_x() as u32).to_le_bytes());
    header[12..16].copy_from_slice(&(grid.size_y() as u32).to_le_bytes());

    let origin = grid.origin();
    header[16..20].copy_from_slice(&origin.x.to_le_bytes());
    header[20..24].copy_from_slice(&origin.y.to_le_bytes());
    header[24..28].copy_from_slice(&grid.scale().to_le_bytes());
    header[28..32].copy_from_slice(&max_radius.to_le_bytes());
    header[32..40].copy_from_slice(&occupancy_hash(grid).to_le_bytes());

    writer.write_all(&header)?;

    let mut data = Vec::with_capacity(grid.cell_count() * 4);
    for cell in grid.cells() {
        data.extend_from_slice(&cell.occ_dist.to_le_bytes());
    }
    writer.write_all(&data)?;

    Ok(())
}

/// Load a cache file into the grid's static distance layer.
///
/// On any error the grid is left untouched.
pub fn load_cspace(grid: &mut PlanGrid, max_radius: f32, path: &Path) -> Result<(), CacheError> {
    let mut reader = BufReader::new(File::open(path)?);
    read_cspace(grid, max_radius, &mut reader)
}

/// Read a cache into the grid's static distance layer.
///
/// Rejects the data unless magic, version, dimensions, origin, scale,
/// `max_radius` and occupancy hash all match the live grid. The dynamic
/// layer is reset to the loaded static distances.
pub fn read_cspace<R: Read>(
    grid: &mut PlanGrid,
    max_radius: f32,
    reader: &mut R,
) -> Result<(), CacheError> {
    let mut header = [0u8; HEADER_SIZE];
    reader.read_exact(&mut header)?;

    if &header[0..6] != MAGIC {
        return Err(CacheError::InvalidFormat("invalid magic bytes".to_string()));
    }

    let version = header[6];
    if version != VERSION {
        return Err(CacheError::VersionMismatch {
            expected: VERSION,
            found: version,
        });
    }

    let size_x = read_u32(&header, 8) as usize;
    let size_y = read_u32(&header, 12) as usize;
    if size_x != grid.size_x() || size_y != grid.size_y() {
        return Err(CacheError::Mismatch(format!(
            "dimensions {}x{} != {}x{}",
            size_x,
            size_y,
            grid.size_x(),
            grid.size_y()
        )));
    }

    let origin = grid.origin();
    check_field("origin_x", read_f32(&header, 16), origin.x)?;
    check_field("origin_y", read_f32(&header, 20), origin.y)?;
    check_field("scale", read_f32(&header, 24), grid.scale())?;
    check_field("max_radius", read_f32(&header, 28), max_radius)?;

    let hash = u64::from_le_bytes([
        header[32], header[33], header[34], header[35], header[36], header[37], header[38],
        header[39],
    ]);
    if hash != occupancy_hash(grid) {
        return Err(CacheError::Mismatch("occupancy hash differs".to_string()));
    }

    let mut data = vec![0u8; grid.cell_count() * 4];
    reader.read_exact(&mut data)?;

    let distances: Vec<f32> = data
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect();

    if let Some(bad) = distances
        .iter()
        .position(|d| !(d.is_finite() && *d >= 0.0 && *d <= max_radius + METADATA_TOLERANCE))
    {
        return Err(CacheError::InvalidFormat(format!(
            "distance {} at cell {} outside [0, {}]",
            distances[bad], bad, max_radius
        )));
    }

    for (cell, d) in grid.cells_mut().iter_mut().zip(distances) {
        let d = d.min(max_radius);
        cell.occ_dist = d;
        cell.occ_dist_dyn = d;
        cell.occ_state_dyn = cell.occ_state;
    }

    Ok(())
}

fn read_u32(buf: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([buf[at], buf[at + 1], buf[at + 2], buf[at + 3]])
}

fn read_f32(buf: &[u8], at: usize) -> f32 {
    f32::from_le_bytes([buf[at], buf[at + 1], buf[at + 2], buf[at + 3]])
}

fn check_field(name: &str, stored: f32, live: f32) -> Result<(), CacheError> {
    if (stored - live).abs() > METADATA_TOLERANCE {
        return Err(CacheError::Mismatch(format!(
            "{} {} != {}",
            name, stored, live
        )));
    }
    Ok(())
}
