//! Map loading.

mod ascii_map;

pub use ascii_map::{load_ascii_map, parse_ascii_map, render_ascii_map};
