//! Capabilities the layout engine borrows from its environment.
//!
//! The engine never owns elements. It asks an `ElementHost` what a child
//! wants and tells it where to go, and it bargains for its own size with a
//! `NegotiationParticipant` ancestor.

mod core;
pub mod label;

pub use self::core::{
    ChildId, ClampTo, DenyAll, ElementGeometry, ElementHost, GeometryReply, GeometryRequest,
    GrantAll, NegotiationParticipant, PreferredGeometry,
};
pub use label::{Label, LabelHost};
