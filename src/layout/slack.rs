//! Slack distribution: actual track sizes for a given container extent.

use serde::{Deserialize, Serialize};

use crate::geometry::clamp_dimension;

use super::grid::{AxisTracks, remainder_slots};

/// How the per-track share of slack is rounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlackRounding {
    /// Each weighted track gets `excess * weight / total_weight`, truncated.
    /// Up to one unit per weighted track may go unassigned.
    #[default]
    Truncate,
    /// Like `Truncate`, then the leftover is walked out one unit at a time
    /// over the weighted tracks, lowest index first.
    Exact,
}

/// Fill `actual` with each track's preferred size plus its share of slack.
///
/// `target - total_preferred` may be negative. Weighted tracks never drop
/// below `min_track`; unweighted tracks keep their preferred size.
pub fn distribute_slack(
    tracks: &AxisTracks,
    target: u16,
    min_track: u16,
    rounding: SlackRounding,
    actual: &mut Vec<u16>,
) {
    let preferred = tracks.preferred();
    let weights = tracks.weights();
    actual.clear();
    actual.extend_from_slice(preferred);

    let total_weight = tracks.total_weight();
    if total_weight == 0 {
        return;
    }

    let excess = target as i64 - tracks.total_preferred() as i64;
    let mut sizes: Vec<i64> = preferred.iter().map(|&p| p as i64).collect();
    let mut assigned: i64 = 0;

    for (size, &weight) in sizes.iter_mut().zip(weights) {
        if weight == 0 {
            continue;
        }
        let share = excess * weight as i64 / total_weight as i64;
        *size += share;
        assigned += share;
    }

    if rounding == SlackRounding::Exact {
        let leftover = excess - assigned;
        let weighted: Vec<usize> = weights
            .iter()
            .enumerate()
            .filter(|(_, w)| **w > 0)
            .map(|(idx, _)| idx)
            .collect();
        let step = leftover.signum();
        for slot in remainder_slots(weighted.len(), leftover.unsigned_abs() as usize) {
            sizes[weighted[slot]] += step;
        }
    }

    for ((slot, size), &weight) in actual.iter_mut().zip(sizes).zip(weights) {
        if weight > 0 {
            *slot = clamp_dimension(size.max(min_track as i64));
        }
    }
}
