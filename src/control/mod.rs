//! Path-to-steering reduction.
//!
//! - [`find_carrot`]: lookahead target on the live cost field
//! - [`DriveController`]: differential-drive velocity commands

mod carrot;
mod drive;

pub use carrot::{Carrot, find_carrot};
pub use drive::{DriveCommand, DriveController, DriveStatus, command_toward};
