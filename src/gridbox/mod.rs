//! The grid container.
//!
//! `Gridbox` owns the placement, sizing and negotiation state for its
//! children and drives the layout modules against an `ElementHost`.

mod config;
mod core;
mod negotiation;
#[cfg(test)]
mod testing;

pub use self::config::GridboxConfig;
pub use self::core::{GridChild, Gridbox, LAYOUT_TARGET, METRICS_TARGET, NEGOTIATION_TARGET};
pub use self::negotiation::ChildNegotiator;
