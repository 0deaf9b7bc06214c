//! Child-initiated geometry negotiation.
//!
//! A child asking for a new size is evaluated speculatively: its cached
//! preference is overwritten, tracks are re-measured, and the container's own
//! ancestor is consulted with a query. Everything the evaluation touches is
//! captured in a [`Checkpoint`] first, so query-only requests and refusals
//! leave the container exactly as they found it.

use serde_json::json;

use crate::audit::{NegotiationAuditEventBuilder, NegotiationStage};
use crate::error::Result;
use crate::geometry::Size;
use crate::host::{ElementHost, GeometryReply, GeometryRequest, NegotiationParticipant};
use crate::layout::{CellSpan, GridState, TrackOrigins};
use crate::logging::{LogLevel, json_kv, json_str};

use super::core::{Gridbox, NEGOTIATION_TARGET};

/// Exactly the state a negotiation may mutate before it decides.
struct Checkpoint {
    child: usize,
    preferred: Size,
    border_width: u16,
    grid: Option<GridState>,
    /// Every child's resolved cell and cached preference, captured only when
    /// the evaluation has to collect preferred sizes from scratch.
    children: Option<Vec<(CellSpan, Size, u16)>>,
}

impl Checkpoint {
    fn capture(gridbox: &Gridbox, child: usize) -> Self {
        let children = gridbox.grid.is_none().then(|| {
            gridbox
                .children
                .iter()
                .map(|c| (c.cell, c.preferred, c.border_width))
                .collect()
        });
        Self {
            child,
            preferred: gridbox.children[child].preferred,
            border_width: gridbox.children[child].border_width,
            grid: gridbox.grid.clone(),
            children,
        }
    }

    fn restore(self, gridbox: &mut Gridbox) {
        if let Some(saved) = self.children {
            for (child, (cell, preferred, border_width)) in gridbox.children.iter_mut().zip(saved) {
                child.cell = cell;
                child.preferred = preferred;
                child.border_width = border_width;
            }
        }
        let child = &mut gridbox.children[self.child];
        child.preferred = self.preferred;
        child.border_width = self.border_width;
        gridbox.grid = self.grid;
    }
}

/// A managed child's size request with missing fields filled in.
#[derive(Debug, Clone, Copy)]
struct ChildRequest {
    index: usize,
    old: Size,
    requested: Size,
    border_width: u16,
    query_only: bool,
}

/// What the speculative evaluation concluded.
struct Evaluation {
    reply: GeometryReply,
    /// Container size the decision was computed against.
    provisional: Size,
}

impl Gridbox {
    /// Negotiation Controller: decide a managed child's request to change size.
    ///
    /// Position changes are always denied. A request the container cannot
    /// satisfy exactly is denied rather than answered with a compromise.
    ///
    /// `Granted` carries the requested size. For a child with `allow_resize`
    /// off the request is granted whenever it fits the committed cell, and the
    /// relayout still hands it the box its fill and gravity produce, which
    /// may be larger than the request.
    pub fn request_child_geometry(
        &mut self,
        child: &str,
        request: &GeometryRequest,
        host: &mut dyn ElementHost,
        parent: &mut dyn NegotiationParticipant,
    ) -> Result<GeometryReply> {
        let index = self.index_of(child)?;
        let current = host.current_geometry(child);
        let old = current.rect.size();
        let requested = request.size_or(old);

        if !self.children[index].managed {
            return Ok(GeometryReply::Granted(requested));
        }

        self.audit(NegotiationStage::Probing, child, |event| {
            event
                .detail("requested", json!(requested))
                .detail("query_only", json!(request.query_only));
        });

        let moves = request.x.is_some_and(|x| x != current.rect.x)
            || request.y.is_some_and(|y| y != current.rect.y);
        if moves {
            return Ok(self.conclude(child, requested, GeometryReply::Denied, request.query_only));
        }

        #[cfg(debug_assertions)]
        let before = self.fingerprint();

        let pending = ChildRequest {
            index,
            old,
            requested,
            border_width: request.border_width.unwrap_or(current.border_width),
            query_only: request.query_only,
        };
        let checkpoint = Checkpoint::capture(self, index);
        let evaluation = match self.evaluate(pending, &*host, parent) {
            Ok(evaluation) => evaluation,
            Err(err) => {
                checkpoint.restore(self);
                return Err(err);
            }
        };

        if request.query_only || !evaluation.reply.is_granted() {
            checkpoint.restore(self);
            #[cfg(debug_assertions)]
            debug_assert_eq!(before, self.fingerprint(), "negotiation rollback left state behind");
        } else {
            if self.children[index].constraint.allow_resize {
                self.request_own_size(parent, evaluation.provisional, false);
            }
            self.layout_children(host)?;
        }

        Ok(self.conclude(child, requested, evaluation.reply, request.query_only))
    }

    /// Speculative part of a negotiation. Mutates the child's cached
    /// preference and the track caches; the caller owns the rollback.
    fn evaluate(
        &mut self,
        pending: ChildRequest,
        host: &dyn ElementHost,
        parent: &mut dyn NegotiationParticipant,
    ) -> Result<Evaluation> {
        let ChildRequest {
            index,
            old,
            requested,
            border_width,
            query_only,
        } = pending;
        let was_dirty = self.dirty;
        if self.grid.is_none() {
            self.collect_preferred(host)?;
            self.recompute_tracks()?;
            self.distribute(self.size);
        }

        let inset = self
            .margin_of(index)
            .saturating_add(border_width)
            .saturating_mul(2);
        let child = &mut self.children[index];
        child.border_width = border_width;
        child.preferred = requested.inflate(inset);

        if !child.constraint.allow_resize {
            let wanted = child.preferred;
            let cell = self.child_cell_size(index);
            let reply = if cell.width >= wanted.width && cell.height >= wanted.height {
                GeometryReply::Granted(requested)
            } else {
                GeometryReply::Denied
            };
            return Ok(Evaluation {
                reply,
                provisional: self.size,
            });
        }

        if was_dirty {
            self.recompute_tracks()?;
        } else {
            self.refresh_track_maxima()?;
        }

        let wanted = self.tracks_preferred_size();
        let (ancestor, provisional) = self.request_own_size(parent, wanted, true);
        let id = self.children[index].id.clone();
        self.audit(NegotiationStage::AncestorConsulted, &id, |event| {
            event
                .detail("wanted", json!(wanted))
                .detail("reply", json!(ancestor.label()))
                .detail("provisional", json!(provisional));
        });

        self.distribute(provisional);
        let achieved = match self.grid.as_ref() {
            Some(grid) => self.resolve_child(index, grid, &TrackOrigins::of(grid)).size(),
            None => old,
        };

        // Anything short of the exact request, including no change, is a refusal.
        let reply = if achieved != old && achieved == requested {
            GeometryReply::Granted(requested)
        } else {
            GeometryReply::Denied
        };

        self.log(
            LogLevel::Trace,
            NEGOTIATION_TARGET,
            "child_evaluated",
            [
                json_str("child", id.as_str()),
                json_kv("achieved", json!(achieved)),
                json_kv("provisional", json!(provisional)),
                json_kv("query_only", json!(query_only)),
            ],
        );

        Ok(Evaluation { reply, provisional })
    }

    fn conclude(
        &mut self,
        child: &str,
        requested: Size,
        reply: GeometryReply,
        query_only: bool,
    ) -> GeometryReply {
        let stage = if query_only {
            self.metrics.record_query_only();
            NegotiationStage::QueryOnly
        } else if reply.is_granted() {
            self.metrics.record_granted();
            NegotiationStage::Granted
        } else {
            self.metrics.record_denied();
            NegotiationStage::Denied
        };

        self.audit(stage, child, |event| {
            event.detail("reply", json!(reply.label()));
        });
        self.log(
            LogLevel::Debug,
            NEGOTIATION_TARGET,
            "child_negotiated",
            [
                json_str("child", child),
                json_kv("requested", json!(requested)),
                json_kv("reply", json!(reply.label())),
                json_kv("query_only", json!(query_only)),
            ],
        );
        reply
    }

    fn audit(
        &self,
        stage: NegotiationStage,
        child: &str,
        fill: impl FnOnce(&mut NegotiationAuditEventBuilder),
    ) {
        let mut builder = NegotiationAuditEventBuilder::new(stage, child);
        fill(&mut builder);
        self.config.audit.record(builder.finish());
    }

    /// View the container as the ancestor of `child`.
    pub fn child_negotiator<'a>(
        &'a mut self,
        child: impl Into<String>,
        host: &'a mut dyn ElementHost,
        parent: &'a mut dyn NegotiationParticipant,
    ) -> ChildNegotiator<'a> {
        ChildNegotiator {
            gridbox: self,
            child: child.into(),
            host,
            parent,
        }
    }
}

/// The container in its ancestor role, bound to one child.
pub struct ChildNegotiator<'a> {
    gridbox: &'a mut Gridbox,
    child: String,
    host: &'a mut dyn ElementHost,
    parent: &'a mut dyn NegotiationParticipant,
}

impl NegotiationParticipant for ChildNegotiator<'_> {
    fn negotiate(&mut self, request: &GeometryRequest) -> GeometryReply {
        match self
            .gridbox
            .request_child_geometry(&self.child, request, &mut *self.host, &mut *self.parent)
        {
            Ok(reply) => reply,
            Err(err) => {
                self.gridbox.log(
                    LogLevel::Warn,
                    NEGOTIATION_TARGET,
                    "child_negotiation_failed",
                    [
                        json_str("child", self.child.as_str()),
                        json_str("error", err.to_string()),
                    ],
                );
                GeometryReply::Denied
            }
        }
    }
}
