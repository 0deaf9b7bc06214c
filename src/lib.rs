//! Gridbox: a constraint-based grid layout engine.
//!
//! Children are placed into rows and columns, each track is sized to its
//! widest occupant, and spare or missing space is shared out by weight. The
//! container negotiates its own size with an ancestor and answers resize
//! requests from its children, rolling back every speculative change when a
//! request is refused or only probing.
//!
//! The engine owns no elements. Hosts plug in through
//! [`host::ElementHost`] and [`host::NegotiationParticipant`].

pub mod audit;
pub mod constraint;
pub mod error;
pub mod geometry;
pub mod gridbox;
pub mod host;
pub mod layout;
pub mod logging;
pub mod metrics;
pub mod width;

pub use audit::{
    BufferedAudit, NegotiationAudit, NegotiationAuditEvent, NegotiationAuditEventBuilder,
    NegotiationStage, NullAudit,
};
pub use constraint::{CellConstraint, Fill, Gravity, GridPosition};
pub use error::{GridboxError, ParseConstraintError, Result};
pub use geometry::{Rect, Size};
pub use gridbox::{ChildNegotiator, GridChild, Gridbox, GridboxConfig};
pub use host::{
    ChildId, ClampTo, DenyAll, ElementGeometry, ElementHost, GeometryReply, GeometryRequest,
    GrantAll, Label, LabelHost, NegotiationParticipant, PreferredGeometry,
};
pub use layout::{CellSpan, GridState, SlackRounding};
pub use logging::{
    FileSink, LogEvent, LogFields, LogLevel, LogSink, Logger, LoggingError, LoggingResult,
    MemorySink,
};
pub use metrics::{LayoutMetrics, MetricSnapshot};
pub use width::display_width;
