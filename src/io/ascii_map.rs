//! Plain-text occupancy maps.
//!
//! One character per cell: `.` free, `#` occupied, `?` unknown. The first
//! line is the top row (maximum y). Blank lines are skipped; every remaining
//! line must have the same width.
//!
//! ```text
//! ##########
//! #........#
//! #..##....#
//! #........#
//! ##########
//! ```

use std::path::Path;

use crate::core::{GridCoord, WorldPoint};
use crate::error::{MargaError, Result};
use crate::grid::{Occupancy, PlanGrid};

/// Parse an ASCII map into a grid with the given scale and origin.
pub fn parse_ascii_map(text: &str, scale: f32, origin: WorldPoint) -> Result<PlanGrid> {
    let rows: Vec<&str> = text
        .lines()
        .map(str::trim_end)
        .filter(|l| !l.is_empty())
        .collect();

    let size_y = rows.len();
    let size_x = rows.first().map(|r| r.chars().count()).unwrap_or(0);
    let mut grid = PlanGrid::new(size_x, size_y, scale, origin)?;

    for (row, line) in rows.iter().enumerate() {
        let width = line.chars().count();
        if width != size_x {
            return Err(MargaError::Map(format!(
                "row {} has width {}, expected {}",
                row + 1,
                width,
                size_x
            )));
        }

        let y = (size_y - 1 - row) as i32;
        for (x, c) in line.chars().enumerate() {
            let occupancy = Occupancy::from_char(c).ok_or_else(|| {
                MargaError::Map(format!(
                    "unexpected character {:?} at row {}, column {}",
                    c,
                    row + 1,
                    x + 1
                ))
            })?;
            grid.set_occupancy(GridCoord::new(x as i32, y), occupancy);
        }
    }

    Ok(grid)
}

/// Load an ASCII map file.
pub fn load_ascii_map(path: &Path, scale: f32, origin: WorldPoint) -> Result<PlanGrid> {
    let text = std::fs::read_to_string(path)?;
    let grid = parse_ascii_map(&text, scale, origin)?;
    tracing::info!(
        "Loaded {}x{} map from {}",
        grid.size_x(),
        grid.size_y(),
        path.display()
    );
    Ok(grid)
}

/// Render static occupancy back to text, top row first.
pub fn render_ascii_map(grid: &PlanGrid) -> String {
    let mut out = String::with_capacity((grid.size_x() + 1) * grid.size_y());
    for y in (0..grid.size_y() as i32).rev() {
        for x in 0..grid.size_x() as i32 {
            out.push(grid.occupancy(GridCoord::new(x, y)).as_char());
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROOM: &str = "\
#####
#..?#
#...#
#####
";

    #[test]
    fn test_parse_orientation() {
        let grid = parse_ascii_map(ROOM, 0.1, WorldPoint::ZERO).unwrap();
        assert_eq!(grid.size_x(), 5);
        assert_eq!(grid.size_y(), 4);
        // First text row is the top
        assert_eq!(grid.occupancy(GridCoord::new(3, 2)), Occupancy::Unknown);
        assert_eq!(grid.occupancy(GridCoord::new(3, 1)), Occupancy::Free);
        assert_eq!(grid.occupancy(GridCoord::new(0, 0)), Occupancy::Occupied);
    }

    #[test]
    fn test_render_matches_source() {
        let grid = parse_ascii_map(ROOM, 0.1, WorldPoint::ZERO).unwrap();
        assert_eq!(render_ascii_map(&grid), ROOM);
    }

    #[test]
    fn test_rejects_ragged_and_unknown_chars() {
        assert!(matches!(
            parse_ascii_map("###\n##\n", 1.0, WorldPoint::ZERO),
            Err(MargaError::Map(_))
        ));
        assert!(matches!(
            parse_ascii_map("#x#\n", 1.0, WorldPoint::ZERO),
            Err(MargaError::Map(_))
        ));
        assert!(parse_ascii_map("\n\n", 1.0, WorldPoint::ZERO).is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_ascii_map(&dir.path().join("none.txt"), 0.05, WorldPoint::ZERO);
        assert!(matches!(result, Err(MargaError::Io(_))));
    }
}
