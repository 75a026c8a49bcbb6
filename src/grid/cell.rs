//! Cell types for the planning grid.

use serde::{Deserialize, Serialize};

use crate::core::GridCoord;

/// Sentinel cost for cells the wavefront has not reached.
pub const UNREACHED_COST: f32 = f32::INFINITY;

/// Occupancy state of a cell.
///
/// Anything that is not `Free` is treated as an obstacle source when the
/// configuration space is built.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Occupancy {
    /// Known traversable floor
    Free = 0,

    /// Never observed
    #[default]
    Unknown = 1,

    /// Known obstacle
    Occupied = 2,
}

impl Occupancy {
    /// Is this cell known free?
    #[inline]
    pub fn is_free(self) -> bool {
        self == Occupancy::Free
    }

    /// Convert from u8 (unrecognized values decode as `Unknown`)
    #[inline]
    pub fn from_u8(value: u8) -> Self {
        match value {
            0 => Occupancy::Free,
            2 => Occupancy::Occupied,
            _ => Occupancy::Unknown,
        }
    }

    /// Single character representation (`.` free, `?` unknown, `#` occupied)
    pub fn as_char(self) -> char {
        match self {
            Occupancy::Free => '.',
            Occupancy::Unknown => '?',
            Occupancy::Occupied => '#',
        }
    }

    /// Parse the character representation produced by [`Occupancy::as_char`].
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '.' => Some(Occupancy::Free),
            '?' => Some(Occupancy::Unknown),
            '#' => Some(Occupancy::Occupied),
            _ => None,
        }
    }
}

/// One grid square.
///
/// Static fields (`occ_state`, `occ_dist`) come from the map. Dynamic fields
/// are reset to the static baseline on every obstacle update. The planning
/// fields (`plan_cost`, `plan_next`, `mark`) belong to the most recent
/// wavefront search and are reset when the next one is seeded.
#[derive(Clone, Debug, PartialEq)]
pub struct Cell {
    /// Cell index in the grid `(ci, cj)`
    pub coord: GridCoord,
    /// Static occupancy from the map
    pub occ_state: Occupancy,
    /// Static occupancy plus dynamic obstacles
    pub occ_state_dyn: Occupancy,
    /// Distance to the nearest static obstacle, in `[0, max_radius]`
    pub occ_dist: f32,
    /// Distance to the nearest static or dynamic obstacle
    pub occ_dist_dyn: f32,
    /// Cost to the goal of the current search
    pub plan_cost: f32,
    /// Index of the next cell toward the goal
    pub plan_next: Option<usize>,
    /// Settled by the current search
    pub(crate) mark: bool,
    /// On the previous local path (hysteresis)
    pub(crate) lpath_mark: bool,
}

impl Cell {
    /// Create an unknown cell at the given coordinate.
    pub fn new(coord: GridCoord) -> Self {
        Self {
            coord,
            occ_state: Occupancy::Unknown,
            occ_state_dyn: Occupancy::Unknown,
            occ_dist: 0.0,
            occ_dist_dyn: 0.0,
            plan_cost: UNREACHED_COST,
            plan_next: None,
            mark: false,
            lpath_mark: false,
        }
    }

    /// Has the current search assigned a finite cost to this cell?
    #[inline]
    pub fn is_reached(&self) -> bool {
        self.plan_cost.is_finite()
    }

    /// Is this cell on the previous local path?
    #[inline]
    pub fn on_local_path(&self) -> bool {
        self.lpath_mark
    }

    /// Clear the fields owned by a wavefront search.
    #[inline]
    pub(crate) fn reset_plan(&mut self) {
        self.plan_cost = UNREACHED_COST;
        self.plan_next = None;
        self.mark = false;
    }
}
