//! Track sizing: preferred sizes and weights for every column and row.
//!
//! Children are folded in span-ascending passes. Single-track children set
//! the baseline first, then each wider child only adds what the tracks it
//! covers still lack, spread across them by weight. The result is greedy and
//! pass-ordered, not a global optimum: two misaligned multi-track children
//! can leave tracks larger than strictly necessary. The pass order is kept
//! exactly so results stay reproducible.

use serde::Serialize;

use crate::error::Result;
use crate::geometry::Size;

use super::placement::CellSpan;
use super::slack::{SlackRounding, distribute_slack};

/// One child's demand on a run of tracks along a single axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackDemand {
    pub start: usize,
    pub span: usize,
    pub preferred: u16,
    pub weight: u32,
}

/// Preferred, weighted and actual sizes of the tracks along one axis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AxisTracks {
    preferred: Vec<u16>,
    weights: Vec<u32>,
    actual: Vec<u16>,
    max_span: usize,
    total_preferred: u32,
    total_weight: u32,
}

impl AxisTracks {
    /// Reserve zeroed buffers for `count` tracks.
    pub fn allocate(count: usize, max_span: usize) -> Result<Self> {
        let mut preferred = Vec::new();
        let mut weights = Vec::new();
        let mut actual = Vec::new();
        preferred.try_reserve_exact(count)?;
        weights.try_reserve_exact(count)?;
        actual.try_reserve_exact(count)?;
        preferred.resize(count, 0);
        weights.resize(count, 0);
        actual.resize(count, 0);

        Ok(Self {
            preferred,
            weights,
            actual,
            max_span,
            total_preferred: 0,
            total_weight: 0,
        })
    }

    pub fn len(&self) -> usize {
        self.preferred.len()
    }

    pub fn is_empty(&self) -> bool {
        self.preferred.is_empty()
    }

    pub fn preferred(&self) -> &[u16] {
        &self.preferred
    }

    pub fn weights(&self) -> &[u32] {
        &self.weights
    }

    /// Sizes from the most recent slack distribution.
    pub fn actual(&self) -> &[u16] {
        &self.actual
    }

    pub fn max_span(&self) -> usize {
        self.max_span
    }

    pub fn total_preferred(&self) -> u32 {
        self.total_preferred
    }

    pub fn total_weight(&self) -> u32 {
        self.total_weight
    }

    /// Recompute preferred sizes and weights from scratch.
    pub fn measure(&mut self, demands: &[TrackDemand]) {
        self.preferred.fill(0);
        self.weights.fill(0);

        for span in 1..=self.max_span {
            for demand in demands.iter().filter(|d| d.span == span) {
                self.apply_demand(demand);
            }
        }

        self.total_preferred = self.preferred.iter().map(|&p| p as u32).sum();
        self.total_weight = self.weights.iter().sum();
    }

    fn apply_demand(&mut self, demand: &TrackDemand) {
        let end = (demand.start + demand.span).min(self.preferred.len());
        if demand.start >= end {
            debug_assert!(false, "demand outside allocated tracks: {demand:?}");
            return;
        }
        let range = demand.start..end;

        for weight in &mut self.weights[range.clone()] {
            *weight = (*weight).max(demand.weight);
        }

        let current: u32 = self.preferred[range.clone()]
            .iter()
            .map(|&p| p as u32)
            .sum();
        let wanted = demand.preferred as u32;
        if current >= wanted {
            return;
        }

        if range.len() == 1 {
            self.preferred[demand.start] = demand.preferred;
            return;
        }

        distribute_excess(
            &mut self.preferred[range.clone()],
            &self.weights[range],
            wanted - current,
        );
    }

    /// Distribute `target - total_preferred` across weighted tracks.
    pub fn distribute(&mut self, target: u16, min_track: u16, rounding: SlackRounding) {
        let mut actual = std::mem::take(&mut self.actual);
        distribute_slack(self, target, min_track, rounding, &mut actual);
        self.actual = actual;
    }

    /// Sum of actual sizes over `span` tracks starting at `start`.
    pub fn extent(&self, start: usize, span: usize) -> u16 {
        let end = (start + span).min(self.actual.len());
        let total: u32 = self
            .actual
            .get(start..end)
            .unwrap_or_default()
            .iter()
            .map(|&a| a as u32)
            .sum();
        total.min(u16::MAX as u32) as u16
    }

    /// Offset of every track: prefix sums of the actual sizes.
    pub fn origins(&self) -> Vec<u16> {
        let mut cursor: u16 = 0;
        self.actual
            .iter()
            .map(|&size| {
                let origin = cursor;
                cursor = cursor.saturating_add(size);
                origin
            })
            .collect()
    }

    pub(crate) fn hash_into(&self, hasher: &mut blake3::Hasher) {
        hasher.update(&(self.len() as u64).to_le_bytes());
        hasher.update(&(self.max_span as u64).to_le_bytes());
        for value in self.preferred.iter().chain(self.actual.iter()) {
            hasher.update(&value.to_le_bytes());
        }
        for weight in &self.weights {
            hasher.update(&weight.to_le_bytes());
        }
        hasher.update(&self.total_preferred.to_le_bytes());
        hasher.update(&self.total_weight.to_le_bytes());
    }
}

/// Grow `cells` by exactly `excess` in total.
///
/// With all weights zero every cell gets `excess / n` and the remainder is
/// walked out one unit at a time by a cyclic accumulator, so no cell gains
/// more than one unit over another. Otherwise each cell gets its weight share
/// and the truncation remainder is walked out over the weighted cells only.
pub fn distribute_excess(cells: &mut [u16], weights: &[u32], excess: u32) {
    let n = cells.len();
    if n == 0 || excess == 0 {
        return;
    }

    let total_weight: u64 = weights.iter().map(|&w| w as u64).sum();
    let mut granted: u64 = 0;

    if total_weight == 0 {
        let share = (excess as u64 / n as u64) as u16;
        for cell in cells.iter_mut() {
            *cell = cell.saturating_add(share);
            granted += share as u64;
        }
        let receivers: Vec<usize> = (0..n).collect();
        spread_remainder(cells, &receivers, excess as u64 - granted);
        return;
    }

    for (cell, &weight) in cells.iter_mut().zip(weights) {
        let share = excess as u64 * weight as u64 / total_weight;
        *cell = cell.saturating_add(share as u16);
        granted += share;
    }

    let receivers: Vec<usize> = weights
        .iter()
        .enumerate()
        .filter(|(_, w)| **w > 0)
        .map(|(idx, _)| idx)
        .collect();
    spread_remainder(cells, &receivers, excess as u64 - granted);
}

fn spread_remainder(cells: &mut [u16], receivers: &[usize], remainder: u64) {
    for idx in remainder_slots(receivers.len(), remainder as usize) {
        let cell = &mut cells[receivers[idx]];
        *cell = cell.saturating_add(1);
    }
}

/// Positions among `n` slots that receive one extra unit when `remainder`
/// units are spread with a Bresenham-style accumulator. Yields exactly
/// `remainder` indexes (for `remainder < n`), lowest first.
pub(crate) fn remainder_slots(n: usize, remainder: usize) -> impl Iterator<Item = usize> {
    let n = n as i64;
    let rem = (remainder as i64).min(n);
    let mut count = (n - rem) / 2;
    (0..n as usize).filter(move |_| {
        count -= rem;
        if count < 0 {
            count += n;
            true
        } else {
            false
        }
    })
}

/// Column and row tracks for a whole grid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GridState {
    pub columns: AxisTracks,
    pub rows: AxisTracks,
}

impl GridState {
    /// Size the buffers from the cells children occupy.
    pub fn allocate(spans: &[CellSpan]) -> Result<Self> {
        let columns = spans.iter().map(CellSpan::column_end).max().unwrap_or(0);
        let rows = spans.iter().map(CellSpan::row_end).max().unwrap_or(0);
        let max_column_span = spans
            .iter()
            .map(|s| s.column_span as usize)
            .max()
            .unwrap_or(0);
        let max_row_span = spans
            .iter()
            .map(|s| s.row_span as usize)
            .max()
            .unwrap_or(0);

        Ok(Self {
            columns: AxisTracks::allocate(columns, max_column_span)?,
            rows: AxisTracks::allocate(rows, max_row_span)?,
        })
    }

    /// True when either axis has no tracks; layout is a no-op then.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() || self.rows.is_empty()
    }

    pub fn preferred_size(&self) -> Size {
        Size::new(
            self.columns.total_preferred().min(u16::MAX as u32) as u16,
            self.rows.total_preferred().min(u16::MAX as u32) as u16,
        )
    }
}
