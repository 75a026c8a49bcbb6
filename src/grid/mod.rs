//! Planning grid model.
//!
//! - [`PlanGrid`]: flat row-major cell array with world/grid mapping
//! - [`Cell`]: occupancy, obstacle distance and search state per square
//! - [`GridBounds`]: restrictable search rectangle
//! - [`BresenhamLine`]: cell traversal for straight-segment checks

mod bounds;
mod cell;
mod line;
mod storage;

pub use bounds::GridBounds;
pub use cell::{Cell, Occupancy, UNREACHED_COST};
pub use line::BresenhamLine;
pub use storage::PlanGrid;
