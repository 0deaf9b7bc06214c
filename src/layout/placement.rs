//! Cell placement: turns declared positions (explicit, "next", "same") into
//! concrete track coordinates before any sizing code runs.

use serde::Serialize;

use crate::constraint::{CellConstraint, GridPosition};
use crate::error::{GridboxError, Result};

/// Concrete cell coordinates of one child.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct CellSpan {
    pub column: u16,
    pub row: u16,
    pub column_span: u16,
    pub row_span: u16,
}

impl CellSpan {
    pub fn column_end(&self) -> usize {
        self.column as usize + self.column_span as usize
    }

    pub fn row_end(&self) -> usize {
        self.row as usize + self.row_span as usize
    }
}

/// Resolves auto-placement markers against the directly preceding child.
///
/// Only the immediately previous resolved child is consulted; there is no
/// look-back beyond it.
#[derive(Debug, Default)]
pub struct PlacementResolver {
    previous: Option<CellSpan>,
}

impl PlacementResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolve(&mut self, child: &str, constraint: &CellConstraint) -> Result<CellSpan> {
        let column_span = constraint.column_span();
        let row_span = constraint.row_span();

        let column = self.axis(child, constraint.column, |prev| {
            (prev.column, prev.column_span)
        })?;
        let row = self.axis(child, constraint.row, |prev| (prev.row, prev.row_span))?;

        if column.checked_add(column_span).is_none() || row.checked_add(row_span).is_none() {
            return Err(GridboxError::InvalidConstraint {
                child: child.to_string(),
                reason: format!(
                    "cell ({column}, {row}) spanning {column_span}x{row_span} exceeds the grid range"
                ),
            });
        }

        let span = CellSpan {
            column,
            row,
            column_span,
            row_span,
        };
        self.previous = Some(span);
        Ok(span)
    }

    fn axis(
        &self,
        child: &str,
        position: GridPosition,
        pick: impl Fn(&CellSpan) -> (u16, u16),
    ) -> Result<u16> {
        match (position, self.previous.as_ref()) {
            (GridPosition::Explicit(index), _) => Ok(index),
            (GridPosition::Next | GridPosition::Same, None) => Ok(0),
            (GridPosition::Same, Some(prev)) => Ok(pick(prev).0),
            (GridPosition::Next, Some(prev)) => {
                let (start, span) = pick(prev);
                start
                    .checked_add(span)
                    .ok_or_else(|| GridboxError::InvalidConstraint {
                        child: child.to_string(),
                        reason: "auto-placed position overflows the grid range".to_string(),
                    })
            }
        }
    }
}

/// Resolve a whole sequence of children in traversal order.
pub fn resolve_placements<'a, I>(children: I) -> Result<Vec<CellSpan>>
where
    I: IntoIterator<Item = (&'a str, &'a CellConstraint)>,
{
    let mut resolver = PlacementResolver::new();
    children
        .into_iter()
        .map(|(child, constraint)| resolver.resolve(child, constraint))
        .collect()
}
