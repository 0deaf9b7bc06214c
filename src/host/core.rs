use serde::Serialize;

use crate::geometry::{Rect, Size};

/// Identifier for a child element, assigned by the host.
pub type ChildId = String;

/// Intrinsic size an element would like, plus its border.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PreferredGeometry {
    pub width: u16,
    pub height: u16,
    pub border_width: u16,
}

impl PreferredGeometry {
    pub const fn new(width: u16, height: u16, border_width: u16) -> Self {
        Self {
            width,
            height,
            border_width,
        }
    }
}

/// Box an element currently occupies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ElementGeometry {
    pub rect: Rect,
    pub border_width: u16,
}

/// Element-side capabilities supplied by the host toolkit.
pub trait ElementHost {
    /// Preferred size of `child`. Must be idempotent and side-effect free.
    fn query_preferred(&self, child: &str) -> PreferredGeometry;

    /// Box `child` currently occupies.
    fn current_geometry(&self, child: &str) -> ElementGeometry;

    /// Command `child` to occupy `rect`.
    fn set_bounds(&mut self, child: &str, rect: Rect, border_width: u16);
}

/// A request to change an element's geometry. `None` fields stay unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GeometryRequest {
    pub width: Option<u16>,
    pub height: Option<u16>,
    pub x: Option<u16>,
    pub y: Option<u16>,
    pub border_width: Option<u16>,
    pub query_only: bool,
}

impl GeometryRequest {
    pub fn resize(width: u16, height: u16) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            ..Self::default()
        }
    }

    pub fn with_position(mut self, x: u16, y: u16) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self
    }

    pub fn with_border_width(mut self, border_width: u16) -> Self {
        self.border_width = Some(border_width);
        self
    }

    pub fn query_only(mut self, query_only: bool) -> Self {
        self.query_only = query_only;
        self
    }

    /// Requested size with missing axes taken from `current`.
    pub fn size_or(&self, current: Size) -> Size {
        Size::new(
            self.width.unwrap_or(current.width),
            self.height.unwrap_or(current.height),
        )
    }
}

/// Outcome of a geometry negotiation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum GeometryReply {
    /// The requested size was (or, for a query, would be) applied.
    Granted(Size),
    /// Nothing changes.
    Denied,
    /// A different size the responder promises to grant if resubmitted.
    Compromise(Size),
}

impl GeometryReply {
    /// Size a requester ends up with, given the size it had before asking.
    pub fn resulting_size(&self, old: Size) -> Size {
        match *self {
            Self::Granted(size) | Self::Compromise(size) => size,
            Self::Denied => old,
        }
    }

    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Granted(_))
    }

    pub(crate) fn label(&self) -> &'static str {
        match self {
            Self::Granted(_) => "granted",
            Self::Denied => "denied",
            Self::Compromise(_) => "compromise",
        }
    }
}

/// Anything that answers geometry requests: the container's ancestor, or the
/// container itself as seen by one of its children.
pub trait NegotiationParticipant {
    fn negotiate(&mut self, request: &GeometryRequest) -> GeometryReply;
}

/// Top-level ancestor that accepts every size.
#[derive(Debug, Default, Clone)]
pub struct GrantAll {
    size: Size,
}

impl GrantAll {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last committed size.
    pub fn size(&self) -> Size {
        self.size
    }
}

impl NegotiationParticipant for GrantAll {
    fn negotiate(&mut self, request: &GeometryRequest) -> GeometryReply {
        let size = request.size_or(self.size);
        if !request.query_only {
            self.size = size;
        }
        GeometryReply::Granted(size)
    }
}

/// Ancestor that refuses every change.
#[derive(Debug, Default, Clone, Copy)]
pub struct DenyAll;

impl NegotiationParticipant for DenyAll {
    fn negotiate(&mut self, _request: &GeometryRequest) -> GeometryReply {
        GeometryReply::Denied
    }
}

/// Ancestor with a hard size ceiling.
///
/// Requests within `max` are granted; larger requests get the clamped size as
/// a compromise, which is granted verbatim when resubmitted.
#[derive(Debug, Clone)]
pub struct ClampTo {
    max: Size,
    size: Size,
    requests: usize,
}

impl ClampTo {
    pub fn new(max: Size) -> Self {
        Self {
            max,
            size: Size::default(),
            requests: 0,
        }
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /// Number of requests answered so far.
    pub fn requests(&self) -> usize {
        self.requests
    }
}

impl NegotiationParticipant for ClampTo {
    fn negotiate(&mut self, request: &GeometryRequest) -> GeometryReply {
        self.requests += 1;
        let wanted = request.size_or(self.size);
        let clamped = Size::new(
            wanted.width.min(self.max.width),
            wanted.height.min(self.max.height),
        );

        if clamped != wanted {
            return GeometryReply::Compromise(clamped);
        }

        if !request.query_only {
            self.size = wanted;
        }
        GeometryReply::Granted(wanted)
    }
}
