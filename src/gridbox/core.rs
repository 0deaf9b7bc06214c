use serde_json::json;

use crate::constraint::CellConstraint;
use crate::error::{GridboxError, Result};
use crate::geometry::{Rect, Size};
use crate::host::{
    ChildId, ElementHost, GeometryReply, GeometryRequest, NegotiationParticipant,
};
use crate::layout::{
    CellGeometry, CellSpan, GridState, TrackDemand, TrackOrigins, cell_size, resolve_cell,
    resolve_placements,
};
use crate::logging::{LogLevel, event_with_fields, json_kv};
use crate::metrics::{LayoutMetrics, MetricSnapshot};

use super::config::GridboxConfig;

pub const LAYOUT_TARGET: &str = "gridbox::layout";
pub const NEGOTIATION_TARGET: &str = "gridbox::negotiation";
pub const METRICS_TARGET: &str = "gridbox::metrics";

/// A child as the container tracks it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridChild {
    pub(super) id: ChildId,
    pub(super) constraint: CellConstraint,
    pub(super) managed: bool,
    pub(super) cell: CellSpan,
    pub(super) preferred: Size,
    pub(super) border_width: u16,
}

impl GridChild {
    fn new(id: ChildId, constraint: CellConstraint) -> Self {
        Self {
            id,
            constraint,
            managed: true,
            cell: CellSpan::default(),
            preferred: Size::default(),
            border_width: 0,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn constraint(&self) -> &CellConstraint {
        &self.constraint
    }

    pub fn is_managed(&self) -> bool {
        self.managed
    }

    /// Resolved cell, valid once preferred sizes have been collected.
    pub fn cell(&self) -> CellSpan {
        self.cell
    }

    /// Cached preferred cell size, margin and border included.
    pub fn preferred(&self) -> Size {
        self.preferred
    }
}

/// Grid container: arranges managed children into weighted rows and columns.
pub struct Gridbox {
    pub(super) config: GridboxConfig,
    pub(super) children: Vec<GridChild>,
    /// Track caches; `None` while stale.
    pub(super) grid: Option<GridState>,
    pub(super) size: Size,
    pub(super) dirty: bool,
    pub(super) metrics: LayoutMetrics,
}

impl Gridbox {
    pub fn new(config: GridboxConfig) -> Self {
        Self {
            config,
            children: Vec::new(),
            grid: None,
            size: Size::default(),
            dirty: true,
            metrics: LayoutMetrics::new(),
        }
    }

    pub fn with_default() -> Self {
        Self::new(GridboxConfig::default())
    }

    pub fn config(&self) -> &GridboxConfig {
        &self.config
    }

    /// Size the container was last committed to.
    pub fn size(&self) -> Size {
        self.size
    }

    /// True until the next full layout pass runs.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Current track caches, if fresh.
    pub fn grid(&self) -> Option<&GridState> {
        self.grid.as_ref()
    }

    pub fn children(&self) -> &[GridChild] {
        &self.children
    }

    pub fn child(&self, id: &str) -> Option<&GridChild> {
        self.children.iter().find(|child| child.id == id)
    }

    pub fn metrics(&self) -> &LayoutMetrics {
        &self.metrics
    }

    /// Emit a metrics snapshot through the configured logger.
    pub fn log_metrics(&self) -> MetricSnapshot {
        let snapshot = self.metrics.snapshot();
        if let Some(logger) = self.config.logger.as_ref() {
            let _ = logger.log_event(snapshot.to_log_event(METRICS_TARGET));
        }
        snapshot
    }

    /// Add a child (managed) or replace the constraint of an existing one.
    pub fn insert_child(&mut self, id: impl Into<ChildId>, constraint: CellConstraint) {
        let id = id.into();
        match self.children.iter_mut().find(|child| child.id == id) {
            Some(child) => {
                child.constraint = constraint;
                child.managed = true;
            }
            None => self.children.push(GridChild::new(id, constraint)),
        }
        self.invalidate();
    }

    pub fn remove_child(&mut self, id: &str) -> Result<()> {
        let index = self.index_of(id)?;
        self.children.remove(index);
        self.invalidate();
        Ok(())
    }

    /// Show or hide a child. Unmanaged children take no part in placement,
    /// sizing or layout.
    pub fn set_managed(&mut self, id: &str, managed: bool) -> Result<()> {
        let index = self.index_of(id)?;
        if self.children[index].managed != managed {
            self.children[index].managed = managed;
            self.invalidate();
        }
        Ok(())
    }

    /// Reconfigure a child.
    ///
    /// Changes to position, span, weight, margin or resize policy drop the
    /// track caches; fill or gravity changes only require a new layout pass.
    pub fn set_constraint(&mut self, id: &str, constraint: CellConstraint) -> Result<()> {
        let index = self.index_of(id)?;
        let previous = std::mem::replace(&mut self.children[index].constraint, constraint);
        let current = &self.children[index].constraint;

        if previous.placement_differs(current) || previous.sizing_differs(current) {
            self.invalidate();
        } else if previous.fill != current.fill || previous.gravity != current.gravity {
            self.dirty = true;
        }
        Ok(())
    }

    /// Drop every sizing cache; the next pass recomputes from scratch.
    pub fn invalidate(&mut self) {
        self.grid = None;
        self.dirty = true;
    }

    /// The container's own preferred size: the sum of preferred track sizes.
    pub fn preferred_size(&mut self, host: &dyn ElementHost) -> Result<Size> {
        self.ensure_tracks(host)?;
        Ok(self
            .grid
            .as_ref()
            .map(GridState::preferred_size)
            .unwrap_or_default())
    }

    /// Answer an ancestor asking what size the container would like.
    ///
    /// The preferred size is always offered as a compromise, unless the
    /// proposal is the size the container already has.
    pub fn query_geometry(
        &mut self,
        host: &dyn ElementHost,
        proposed: Option<Size>,
    ) -> Result<GeometryReply> {
        let preferred = self.preferred_size(host)?;
        if proposed == Some(self.size) {
            return Ok(GeometryReply::Denied);
        }
        Ok(GeometryReply::Compromise(preferred))
    }

    /// React to the set of managed children changing: re-measure, ask the
    /// ancestor for the new preferred size (accepting any compromise), then
    /// lay everything out.
    pub fn change_managed(
        &mut self,
        host: &mut dyn ElementHost,
        parent: &mut dyn NegotiationParticipant,
    ) -> Result<Size> {
        self.grid = None;
        self.collect_preferred(&*host)?;
        self.recompute_tracks()?;

        let wanted = self.tracks_preferred_size();
        let (reply, _) = self.request_own_size(parent, wanted, false);
        if let GeometryReply::Compromise(offer) = reply {
            self.request_own_size(parent, offer, false);
        }

        self.layout_children(host)?;
        Ok(self.size)
    }

    /// Container Resize Driver: adopt `size` and lay out every managed child.
    pub fn resize(&mut self, size: Size, host: &mut dyn ElementHost) -> Result<()> {
        self.size = size;
        self.layout_children(host)
    }

    /// Run a layout pass only if one is pending.
    pub fn layout_if_needed(&mut self, host: &mut dyn ElementHost) -> Result<()> {
        if self.dirty {
            self.layout_children(host)?;
        }
        Ok(())
    }

    /// Current box of a managed child's cell, margins and gravity applied.
    pub fn child_bounds(&self, id: &str) -> Option<Rect> {
        let index = self.index_of(id).ok()?;
        let grid = self.grid.as_ref()?;
        if !self.children[index].managed || grid.is_empty() {
            return None;
        }
        Some(self.resolve_child(index, grid, &TrackOrigins::of(grid)))
    }

    /// Digest of everything a layout pass reads or writes.
    pub fn fingerprint(&self) -> blake3::Hash {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.size.width.to_le_bytes());
        hasher.update(&self.size.height.to_le_bytes());
        hasher.update(&[self.dirty as u8]);
        for child in &self.children {
            hasher.update(child.id.as_bytes());
            hasher.update(&[child.managed as u8]);
            for value in [
                child.cell.column,
                child.cell.row,
                child.cell.column_span,
                child.cell.row_span,
                child.preferred.width,
                child.preferred.height,
                child.border_width,
            ] {
                hasher.update(&value.to_le_bytes());
            }
        }
        match self.grid.as_ref() {
            Some(grid) => {
                hasher.update(&[1]);
                grid.columns.hash_into(&mut hasher);
                grid.rows.hash_into(&mut hasher);
            }
            None => {
                hasher.update(&[0]);
            }
        }
        hasher.finalize()
    }

    pub(super) fn index_of(&self, id: &str) -> Result<usize> {
        self.children
            .iter()
            .position(|child| child.id == id)
            .ok_or_else(|| GridboxError::ChildNotFound(id.to_string()))
    }

    pub(super) fn margin_of(&self, index: usize) -> u16 {
        self.children[index]
            .constraint
            .margin
            .unwrap_or(self.config.default_spacing)
    }

    /// Resolve placements and cache every managed child's preferred cell size.
    pub(super) fn collect_preferred(&mut self, host: &dyn ElementHost) -> Result<()> {
        let managed: Vec<usize> = (0..self.children.len())
            .filter(|&index| self.children[index].managed)
            .collect();
        let children = &self.children;
        let cells = resolve_placements(managed.iter().map(move |&index| {
            let child = &children[index];
            (child.id.as_str(), &child.constraint)
        }))?;

        for (index, cell) in managed.into_iter().zip(cells) {
            let margin = self.margin_of(index);
            let child = &mut self.children[index];
            child.cell = cell;

            let (width, height, border_width) = if child.constraint.allow_resize {
                let preferred = host.query_preferred(&child.id);
                (preferred.width, preferred.height, preferred.border_width)
            } else {
                let current = host.current_geometry(&child.id);
                (current.rect.width, current.rect.height, current.border_width)
            };
            child.border_width = border_width;
            child.preferred = Size::new(width, height)
                .inflate(margin.saturating_add(border_width).saturating_mul(2));
        }
        Ok(())
    }

    fn demands(&self) -> (Vec<TrackDemand>, Vec<TrackDemand>) {
        self.children
            .iter()
            .filter(|child| child.managed)
            .map(|child| {
                (
                    TrackDemand {
                        start: child.cell.column as usize,
                        span: child.cell.column_span as usize,
                        preferred: child.preferred.width,
                        weight: child.constraint.weight_x,
                    },
                    TrackDemand {
                        start: child.cell.row as usize,
                        span: child.cell.row_span as usize,
                        preferred: child.preferred.height,
                        weight: child.constraint.weight_y,
                    },
                )
            })
            .unzip()
    }

    /// Full Track Sizer run: size the grid from the resolved cells, then measure.
    pub(super) fn recompute_tracks(&mut self) -> Result<()> {
        let spans: Vec<CellSpan> = self
            .children
            .iter()
            .filter(|child| child.managed)
            .map(|child| child.cell)
            .collect();
        let mut grid = GridState::allocate(&spans)?;
        let (columns, rows) = self.demands();
        grid.columns.measure(&columns);
        grid.rows.measure(&rows);

        self.metrics.record_track_recompute();
        self.log(
            LogLevel::Debug,
            LAYOUT_TARGET,
            "tracks_recomputed",
            [
                json_kv("columns", json!(grid.columns.len())),
                json_kv("rows", json!(grid.rows.len())),
                json_kv("preferred_width", json!(grid.columns.total_preferred())),
                json_kv("preferred_height", json!(grid.rows.total_preferred())),
            ],
        );
        self.grid = Some(grid);
        Ok(())
    }

    /// Cheaper re-measure that keeps the current grid dimensions.
    pub(super) fn refresh_track_maxima(&mut self) -> Result<()> {
        if self.grid.is_none() {
            return self.recompute_tracks();
        }
        let (columns, rows) = self.demands();
        if let Some(grid) = self.grid.as_mut() {
            grid.columns.measure(&columns);
            grid.rows.measure(&rows);
        }
        self.metrics.record_max_update();
        Ok(())
    }

    pub(super) fn ensure_tracks(&mut self, host: &dyn ElementHost) -> Result<()> {
        if self.grid.is_none() {
            self.collect_preferred(host)?;
            self.recompute_tracks()?;
        }
        Ok(())
    }

    pub(super) fn tracks_preferred_size(&self) -> Size {
        self.grid
            .as_ref()
            .map(GridState::preferred_size)
            .unwrap_or_default()
    }

    /// Slack Distributor over both axes for a container of `size`.
    pub(super) fn distribute(&mut self, size: Size) {
        let min_track = self.config.min_track();
        let rounding = self.config.slack_rounding;
        if let Some(grid) = self.grid.as_mut() {
            grid.columns.distribute(size.width, min_track, rounding);
            grid.rows.distribute(size.height, min_track, rounding);
        }
    }

    pub(super) fn cell_geometry(&self, index: usize) -> CellGeometry {
        let child = &self.children[index];
        CellGeometry {
            span: child.cell,
            fill: child.constraint.fill,
            gravity: child.constraint.gravity,
            preferred: child.preferred,
            margin: self.margin_of(index),
            border_width: child.border_width,
        }
    }

    pub(super) fn resolve_child(
        &self,
        index: usize,
        grid: &GridState,
        origins: &TrackOrigins,
    ) -> Rect {
        resolve_cell(&self.cell_geometry(index), grid, origins)
    }

    /// Actual size of the tracks a child's cell covers.
    pub(super) fn child_cell_size(&self, index: usize) -> Size {
        self.grid
            .as_ref()
            .map(|grid| cell_size(grid, &self.children[index].cell))
            .unwrap_or_default()
    }

    /// Ask the ancestor for a new container size. Returns the reply and the
    /// size the container ends up with (or would, for a query).
    pub(super) fn request_own_size(
        &mut self,
        parent: &mut dyn NegotiationParticipant,
        wanted: Size,
        query_only: bool,
    ) -> (GeometryReply, Size) {
        if wanted == self.size {
            return (GeometryReply::Denied, self.size);
        }

        self.metrics.record_ancestor_request();
        let reply = parent.negotiate(
            &GeometryRequest::resize(wanted.width, wanted.height).query_only(query_only),
        );
        let resulting = reply.resulting_size(self.size);
        if !query_only && reply.is_granted() {
            self.size = wanted;
        }

        self.log(
            LogLevel::Debug,
            LAYOUT_TARGET,
            "ancestor_replied",
            [
                json_kv("wanted", json!(wanted)),
                json_kv("reply", json!(reply.label())),
                json_kv("resulting", json!(resulting)),
                json_kv("query_only", json!(query_only)),
            ],
        );
        (reply, resulting)
    }

    /// Slack distribution, track origins and `set_bounds` for every managed
    /// child at the committed size.
    pub(super) fn layout_children(&mut self, host: &mut dyn ElementHost) -> Result<()> {
        self.ensure_tracks(&*host)?;
        if self.grid.as_ref().is_none_or(GridState::is_empty) {
            return Ok(());
        }

        self.distribute(self.size);
        let Some(grid) = self.grid.as_ref() else {
            return Ok(());
        };
        let origins = TrackOrigins::of(grid);

        let mut placed = 0usize;
        for (index, child) in self.children.iter().enumerate() {
            if !child.managed {
                continue;
            }
            let rect = self.resolve_child(index, grid, &origins);
            host.set_bounds(&child.id, rect, child.border_width);
            placed += 1;
        }

        self.dirty = false;
        self.metrics.record_layout_pass();
        self.log(
            LogLevel::Debug,
            LAYOUT_TARGET,
            "layout_completed",
            [
                json_kv("width", json!(self.size.width)),
                json_kv("height", json!(self.size.height)),
                json_kv("children", json!(placed)),
            ],
        );
        Ok(())
    }

    pub(super) fn log<I>(&self, level: LogLevel, target: &str, message: &str, fields: I)
    where
        I: IntoIterator<Item = (String, serde_json::Value)>,
    {
        if let Some(logger) = self.config.logger.as_ref().filter(|l| l.enabled(level)) {
            let event = event_with_fields(level, target, message, fields);
            let _ = logger.log_event(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::{Fill, GridPosition, Gravity};
    use crate::gridbox::testing::{StaticHost, scenario_grid};
    use crate::host::{ClampTo, DenyAll, GrantAll, Label, LabelHost};
    use crate::layout::SlackRounding;
    use crate::logging::{Logger, MemorySink};
    use std::sync::Arc;

    #[test]
    fn scenario_a_preferred_total_needs_no_slack() {
        let (mut gridbox, mut host) = scenario_grid(GridboxConfig::default().with_default_spacing(0), [0, 0]);
        let size = gridbox.change_managed(&mut host, &mut GrantAll::new()).unwrap();
        assert_eq!(size, Size::new(120, 70));

        let grid = gridbox.grid().unwrap();
        assert_eq!(grid.columns.actual(), &[50, 70]);
        assert_eq!(grid.rows.actual(), &[30, 40]);
        assert_eq!(grid.columns.actual(), grid.columns.preferred());
        assert_eq!(host.bounds("d"), Some(Rect::new(50, 30, 70, 40)));
        assert!(!gridbox.is_dirty());
    }

    #[test]
    fn scenario_b_weighted_slack_is_proportional() {
        let (mut gridbox, mut host) = scenario_grid(GridboxConfig::default().with_default_spacing(0), [1, 3]);
        gridbox.change_managed(&mut host, &mut GrantAll::new()).unwrap();
        gridbox.resize(Size::new(160, 70), &mut host).unwrap();

        let grid = gridbox.grid().unwrap();
        assert_eq!(grid.columns.actual(), &[60, 100]);
        assert_eq!(host.bounds("b"), Some(Rect::new(60, 0, 100, 30)));
    }

    #[test]
    fn scenario_c_odd_unit_goes_to_lowest_index() {
        let config = GridboxConfig::default()
            .with_default_spacing(0)
            .with_slack_rounding(SlackRounding::Exact);
        let (mut gridbox, mut host) = scenario_grid(config, [1, 1]);
        gridbox.change_managed(&mut host, &mut GrantAll::new()).unwrap();
        gridbox.resize(Size::new(121, 70), &mut host).unwrap();
        assert_eq!(gridbox.grid().unwrap().columns.actual(), &[51, 70]);
    }

    #[test]
    fn scenario_c_truncating_drops_odd_unit() {
        let (mut gridbox, mut host) = scenario_grid(GridboxConfig::default().with_default_spacing(0), [1, 1]);
        gridbox.change_managed(&mut host, &mut GrantAll::new()).unwrap();
        gridbox.resize(Size::new(121, 70), &mut host).unwrap();
        assert_eq!(gridbox.grid().unwrap().columns.actual(), &[50, 70]);
    }

    #[test]
    fn track_sum_invariant_for_single_spans() {
        let (mut gridbox, host) = scenario_grid(GridboxConfig::default().with_default_spacing(0), [0, 0]);
        let preferred = gridbox.preferred_size(&host).unwrap();
        assert_eq!(preferred.width, 50 + 70);
        assert_eq!(preferred.height, 30 + 40);
    }

    #[test]
    fn floor_holds_for_weighted_tracks_under_pressure() {
        let (mut gridbox, mut host) = scenario_grid(GridboxConfig::default(), [1, 2]);
        gridbox.change_managed(&mut host, &mut GrantAll::new()).unwrap();
        for width in [0u16, 5, 20, 60] {
            gridbox.resize(Size::new(width, 10), &mut host).unwrap();
            let grid = gridbox.grid().unwrap();
            assert!(grid.columns.actual().iter().all(|&w| w >= 9), "{width}");
        }
    }

    #[test]
    fn margins_and_borders_fold_into_preferred_size() {
        let mut host = StaticHost::new();
        host.add("a", 10, 5, 1);
        let mut gridbox = Gridbox::new(GridboxConfig::default().with_default_spacing(2));
        gridbox.insert_child("a", CellConstraint::at(0, 0));
        gridbox.change_managed(&mut host, &mut GrantAll::new()).unwrap();

        assert_eq!(gridbox.child("a").unwrap().preferred(), Size::new(16, 11));
        assert_eq!(gridbox.size(), Size::new(16, 11));
        assert_eq!(host.bounds("a"), Some(Rect::new(2, 2, 10, 5)));
    }

    #[test]
    fn fixed_children_use_current_size() {
        let mut host = StaticHost::new();
        host.add("fixed", 10, 5, 0);
        host.place("fixed", Rect::new(0, 0, 30, 7));
        let mut gridbox = Gridbox::new(GridboxConfig::default().with_default_spacing(0));
        gridbox.insert_child("fixed", CellConstraint::at(0, 0).with_allow_resize(false));
        let preferred = gridbox.preferred_size(&host).unwrap();
        assert_eq!(preferred, Size::new(30, 7));
    }

    #[test]
    fn unmanaged_children_are_skipped_everywhere() {
        let mut host = StaticHost::new();
        host.add("a", 10, 10, 0);
        host.add("hidden", 99, 99, 0);
        host.add("c", 20, 10, 0);
        let next = CellConstraint::default().with_position(GridPosition::Next, GridPosition::Same);
        let mut gridbox = Gridbox::new(GridboxConfig::default().with_default_spacing(0));
        gridbox.insert_child("a", CellConstraint::at(0, 0));
        gridbox.insert_child("hidden", next.clone());
        gridbox.insert_child("c", next);
        gridbox.set_managed("hidden", false).unwrap();

        gridbox.change_managed(&mut host, &mut GrantAll::new()).unwrap();
        assert_eq!(gridbox.child("c").unwrap().cell().column, 1);
        assert_eq!(gridbox.size(), Size::new(30, 10));
        assert_eq!(host.configured("hidden"), 0);
        assert!(gridbox.child_bounds("hidden").is_none());
    }

    #[test]
    fn empty_container_layout_is_a_no_op() {
        let mut host = StaticHost::new();
        let mut gridbox = Gridbox::with_default();
        let size = gridbox.change_managed(&mut host, &mut GrantAll::new()).unwrap();
        assert_eq!(size, Size::default());
        assert!(gridbox.grid().unwrap().is_empty());
        assert_eq!(gridbox.metrics().snapshot().layout_passes, 0);
    }

    #[test]
    fn change_managed_accepts_parent_compromise() {
        let (mut gridbox, mut host) = scenario_grid(GridboxConfig::default().with_default_spacing(0), [1, 1]);
        let mut parent = ClampTo::new(Size::new(100, 60));
        let size = gridbox.change_managed(&mut host, &mut parent).unwrap();
        assert_eq!(size, Size::new(100, 60));
        assert_eq!(parent.size(), Size::new(100, 60));
        assert_eq!(parent.requests(), 2);
        assert_eq!(gridbox.grid().unwrap().columns.actual(), &[40, 60]);
    }

    #[test]
    fn change_managed_with_denying_parent_keeps_size() {
        let (mut gridbox, mut host) = scenario_grid(GridboxConfig::default().with_default_spacing(0), [0, 0]);
        gridbox.resize(Size::new(80, 50), &mut host).unwrap();
        let size = gridbox.change_managed(&mut host, &mut DenyAll).unwrap();
        assert_eq!(size, Size::new(80, 50));
    }

    #[test]
    fn query_geometry_offers_preferred_size() {
        let (mut gridbox, mut host) = scenario_grid(GridboxConfig::default().with_default_spacing(0), [0, 0]);
        gridbox.change_managed(&mut host, &mut GrantAll::new()).unwrap();
        assert_eq!(
            gridbox.query_geometry(&host, Some(Size::new(120, 70))).unwrap(),
            GeometryReply::Denied
        );
        assert_eq!(
            gridbox.query_geometry(&host, Some(Size::new(10, 10))).unwrap(),
            GeometryReply::Compromise(Size::new(120, 70))
        );
        assert_eq!(
            gridbox.query_geometry(&host, None).unwrap(),
            GeometryReply::Compromise(Size::new(120, 70))
        );
    }

    #[test]
    fn fill_change_only_marks_dirty() {
        let (mut gridbox, mut host) = scenario_grid(GridboxConfig::default().with_default_spacing(0), [0, 0]);
        gridbox.change_managed(&mut host, &mut GrantAll::new()).unwrap();
        let recomputes = gridbox.metrics().snapshot().track_recomputes;

        let updated = gridbox
            .child("a")
            .unwrap()
            .constraint()
            .clone()
            .with_fill(Fill::None)
            .with_gravity(Gravity::SouthEast);
        gridbox.set_constraint("a", updated).unwrap();
        assert!(gridbox.is_dirty());
        assert!(gridbox.grid().is_some());

        gridbox.layout_if_needed(&mut host).unwrap();
        assert!(!gridbox.is_dirty());
        assert_eq!(gridbox.metrics().snapshot().track_recomputes, recomputes);
    }

    #[test]
    fn span_change_recomputes_grid() {
        let (mut gridbox, mut host) = scenario_grid(GridboxConfig::default().with_default_spacing(0), [0, 0]);
        gridbox.change_managed(&mut host, &mut GrantAll::new()).unwrap();

        gridbox
            .set_constraint("d", CellConstraint::at(1, 1).with_span(2, 1))
            .unwrap();
        assert!(gridbox.grid().is_none());

        gridbox.layout_if_needed(&mut host).unwrap();
        assert_eq!(gridbox.grid().unwrap().columns.len(), 3);
    }

    #[test]
    fn weight_change_redistributes_slack() {
        let (mut gridbox, mut host) = scenario_grid(GridboxConfig::default().with_default_spacing(0), [0, 0]);
        gridbox.change_managed(&mut host, &mut GrantAll::new()).unwrap();
        gridbox.resize(Size::new(160, 70), &mut host).unwrap();
        assert_eq!(gridbox.grid().unwrap().columns.actual(), &[50, 70]);

        gridbox
            .set_constraint("b", CellConstraint::at(1, 0).with_weights(1, 0))
            .unwrap();
        assert!(gridbox.grid().is_none());
        assert!(gridbox.is_dirty());

        gridbox.layout_if_needed(&mut host).unwrap();
        assert_eq!(gridbox.grid().unwrap().columns.actual(), &[50, 110]);
        assert_eq!(host.bounds("b"), Some(Rect::new(50, 0, 110, 30)));
    }

    #[test]
    fn margin_change_remeasures_tracks() {
        let (mut gridbox, mut host) = scenario_grid(GridboxConfig::default().with_default_spacing(0), [0, 0]);
        gridbox.change_managed(&mut host, &mut GrantAll::new()).unwrap();

        gridbox
            .set_constraint("a", CellConstraint::at(0, 0).with_margin(5))
            .unwrap();
        assert!(gridbox.grid().is_none());

        gridbox.layout_if_needed(&mut host).unwrap();
        let grid = gridbox.grid().unwrap();
        assert_eq!(grid.columns.actual(), &[60, 70]);
        assert_eq!(grid.rows.actual(), &[40, 40]);
        assert_eq!(host.bounds("a"), Some(Rect::new(5, 5, 50, 30)));
        assert_eq!(host.bounds("c"), Some(Rect::new(0, 40, 60, 40)));
        assert!(!gridbox.is_dirty());
    }

    #[test]
    fn layout_if_needed_skips_clean_container() {
        let (mut gridbox, mut host) = scenario_grid(GridboxConfig::default().with_default_spacing(0), [0, 0]);
        gridbox.change_managed(&mut host, &mut GrantAll::new()).unwrap();
        let passes = gridbox.metrics().snapshot().layout_passes;
        gridbox.layout_if_needed(&mut host).unwrap();
        assert_eq!(gridbox.metrics().snapshot().layout_passes, passes);
    }

    #[test]
    fn missing_child_is_reported() {
        let mut gridbox = Gridbox::with_default();
        assert!(matches!(
            gridbox.set_managed("ghost", false),
            Err(GridboxError::ChildNotFound(id)) if id == "ghost"
        ));
        assert!(gridbox.remove_child("ghost").is_err());
    }

    #[test]
    fn remove_child_shrinks_grid() {
        let (mut gridbox, mut host) = scenario_grid(GridboxConfig::default().with_default_spacing(0), [0, 0]);
        gridbox.change_managed(&mut host, &mut GrantAll::new()).unwrap();
        gridbox.remove_child("b").unwrap();
        gridbox.remove_child("d").unwrap();
        let size = gridbox.change_managed(&mut host, &mut GrantAll::new()).unwrap();
        assert_eq!(size, Size::new(50, 70));
        assert_eq!(gridbox.grid().unwrap().columns.len(), 1);
    }

    #[test]
    fn label_host_drives_layout() {
        let mut host = LabelHost::new()
            .with_label("name", Label::new("Name:"))
            .with_label("value", Label::new("\x1b[1mgridbox\x1b[0m"))
            .with_label("footer", Label::new("ready"));
        let next = CellConstraint::default().with_position(GridPosition::Next, GridPosition::Same);
        let mut gridbox = Gridbox::new(GridboxConfig::default().with_default_spacing(1));
        gridbox.insert_child("name", CellConstraint::at(0, 0));
        gridbox.insert_child("value", next.with_weights(1, 0));
        gridbox.insert_child(
            "footer",
            CellConstraint::at(0, 1).with_span(2, 1).with_fill(Fill::None),
        );

        let size = gridbox.change_managed(&mut host, &mut GrantAll::new()).unwrap();
        assert_eq!(size, Size::new(16, 6));
        assert_eq!(host.bounds("name"), Some(Rect::new(1, 1, 5, 1)));
        assert_eq!(host.bounds("value"), Some(Rect::new(8, 1, 7, 1)));
        assert_eq!(host.bounds("footer"), Some(Rect::new(5, 4, 5, 1)));

        gridbox.resize(Size::new(26, 6), &mut host).unwrap();
        assert_eq!(host.bounds("value"), Some(Rect::new(8, 1, 17, 1)));
    }

    #[test]
    fn layout_passes_are_logged() {
        let sink = MemorySink::new();
        let config = GridboxConfig::default()
            .with_default_spacing(0)
            .with_logger(Logger::new(Arc::clone(&sink)));
        let (mut gridbox, mut host) = scenario_grid(config, [0, 0]);
        gridbox.change_managed(&mut host, &mut GrantAll::new()).unwrap();
        gridbox.log_metrics();

        let messages = sink.messages(LAYOUT_TARGET);
        assert!(messages.contains(&"tracks_recomputed".to_string()));
        assert!(messages.contains(&"layout_completed".to_string()));
        assert_eq!(
            sink.messages(METRICS_TARGET),
            vec!["layout_metrics".to_string()]
        );
    }

    #[test]
    fn fingerprint_tracks_state_changes() {
        let (mut gridbox, mut host) = scenario_grid(GridboxConfig::default().with_default_spacing(0), [1, 1]);
        gridbox.change_managed(&mut host, &mut GrantAll::new()).unwrap();
        let before = gridbox.fingerprint();
        assert_eq!(before, gridbox.fingerprint());
        gridbox.resize(Size::new(140, 70), &mut host).unwrap();
        assert_ne!(before, gridbox.fingerprint());
    }
}
