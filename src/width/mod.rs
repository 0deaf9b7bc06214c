//! Terminal text measurement.

mod utils;

pub use utils::{display_width, text_extent};
