//! Layout module orchestrator.
//!
//! Placement resolution, track sizing, slack distribution and per-cell
//! geometry live in their own files; the container in `crate::gridbox`
//! strings them together.

mod core;
pub mod grid;
pub mod placement;
pub mod slack;

pub use self::core::{CellGeometry, TrackOrigins, cell_size, resolve_cell};
pub use grid::{AxisTracks, GridState, TrackDemand, distribute_excess};
pub use placement::{CellSpan, PlacementResolver, resolve_placements};
pub use slack::{SlackRounding, distribute_slack};
