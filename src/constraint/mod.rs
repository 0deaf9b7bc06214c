//! Per-child cell constraints.
//!
//! A `CellConstraint` is what the host declares for each child: where it sits
//! in the grid, how many tracks it spans, and how it behaves inside its cell.

mod core;

pub use self::core::{CellConstraint, Fill, Gravity, GridPosition};
