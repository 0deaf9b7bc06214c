use std::collections::HashMap;

use crate::constraint::CellConstraint;
use crate::geometry::Rect;
use crate::host::{ChildId, ElementGeometry, ElementHost, PreferredGeometry};

use super::{Gridbox, GridboxConfig};

#[derive(Debug, Default)]
struct Element {
    preferred: PreferredGeometry,
    rect: Rect,
    configured: usize,
}

/// Host whose elements report fixed preferred sizes.
#[derive(Debug, Default)]
pub(crate) struct StaticHost {
    elements: HashMap<ChildId, Element>,
}

impl StaticHost {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add(&mut self, id: &str, width: u16, height: u16, border_width: u16) {
        self.elements.insert(
            id.to_string(),
            Element {
                preferred: PreferredGeometry::new(width, height, border_width),
                ..Element::default()
            },
        );
    }

    pub(crate) fn place(&mut self, id: &str, rect: Rect) {
        if let Some(element) = self.elements.get_mut(id) {
            element.rect = rect;
        }
    }

    pub(crate) fn bounds(&self, id: &str) -> Option<Rect> {
        self.elements.get(id).map(|element| element.rect)
    }

    pub(crate) fn configured(&self, id: &str) -> usize {
        self.elements
            .get(id)
            .map(|element| element.configured)
            .unwrap_or(0)
    }
}

impl ElementHost for StaticHost {
    fn query_preferred(&self, child: &str) -> PreferredGeometry {
        self.elements
            .get(child)
            .map(|element| element.preferred)
            .unwrap_or_default()
    }

    fn current_geometry(&self, child: &str) -> ElementGeometry {
        self.elements
            .get(child)
            .map(|element| ElementGeometry {
                rect: element.rect,
                border_width: element.preferred.border_width,
            })
            .unwrap_or_default()
    }

    fn set_bounds(&mut self, child: &str, rect: Rect, _border_width: u16) {
        if let Some(element) = self.elements.get_mut(child) {
            element.rect = rect;
            element.configured += 1;
        }
    }
}

/// 2x2 grid with children sized 50x30, 70x30, 50x40 and 70x40, column
/// weights applied to the children of each column.
pub(crate) fn scenario_grid(config: GridboxConfig, column_weights: [u32; 2]) -> (Gridbox, StaticHost) {
    let mut host = StaticHost::new();
    host.add("a", 50, 30, 0);
    host.add("b", 70, 30, 0);
    host.add("c", 50, 40, 0);
    host.add("d", 70, 40, 0);

    let mut gridbox = Gridbox::new(config);
    for (id, column, row) in [("a", 0, 0), ("b", 1, 0), ("c", 0, 1), ("d", 1, 1)] {
        let weight = column_weights[column as usize];
        gridbox.insert_child(id, CellConstraint::at(column, row).with_weights(weight, 0));
    }
    (gridbox, host)
}
