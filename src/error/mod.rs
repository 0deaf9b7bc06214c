//! Error module orchestrator.
//!
//! Negotiation outcomes are ordinary values (`GeometryReply`); only genuine
//! faults surface through these types.

mod types;

pub use types::{GridboxError, ParseConstraintError, Result};
