//! In-memory element host for terminal text labels.
//!
//! Each label measures itself from its text: the widest line's display width
//! by the number of lines, plus padding on every side. The host records the
//! bounds the layout engine assigns, so it doubles as a test double and as a
//! starting point for real terminal front ends.

use std::collections::HashMap;

use crate::geometry::{Rect, Size};
use crate::width::text_extent;

use super::core::{ChildId, ElementGeometry, ElementHost, PreferredGeometry};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Label {
    pub text: String,
    pub padding: u16,
    pub border_width: u16,
    pub bounds: Rect,
    /// Number of `set_bounds` calls received.
    pub configured: usize,
}

impl Label {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn with_padding(mut self, padding: u16) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_border(mut self, border_width: u16) -> Self {
        self.border_width = border_width;
        self
    }

    /// Size the text wants, padding included.
    pub fn measure(&self) -> Size {
        let (width, height) = text_extent(&self.text);
        let clamp = |value: usize| value.min(u16::MAX as usize) as u16;
        Size::new(clamp(width), clamp(height)).inflate(self.padding.saturating_mul(2))
    }
}

#[derive(Debug, Default, Clone)]
pub struct LabelHost {
    labels: HashMap<ChildId, Label>,
}

impl LabelHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<ChildId>, label: Label) {
        self.labels.insert(id.into(), label);
    }

    pub fn with_label(mut self, id: impl Into<ChildId>, label: Label) -> Self {
        self.insert(id, label);
        self
    }

    pub fn label(&self, id: &str) -> Option<&Label> {
        self.labels.get(id)
    }

    pub fn bounds(&self, id: &str) -> Option<Rect> {
        self.labels.get(id).map(|label| label.bounds)
    }

    /// Replace a label's text, returning the size it now prefers.
    pub fn set_text(&mut self, id: &str, text: impl Into<String>) -> Option<Size> {
        let label = self.labels.get_mut(id)?;
        label.text = text.into();
        Some(label.measure())
    }

    /// Pretend the element was configured at `rect` without going through layout.
    pub fn place(&mut self, id: &str, rect: Rect) {
        if let Some(label) = self.labels.get_mut(id) {
            label.bounds = rect;
        }
    }
}

impl ElementHost for LabelHost {
    fn query_preferred(&self, child: &str) -> PreferredGeometry {
        self.labels
            .get(child)
            .map(|label| {
                let size = label.measure();
                PreferredGeometry::new(size.width, size.height, label.border_width)
            })
            .unwrap_or_default()
    }

    fn current_geometry(&self, child: &str) -> ElementGeometry {
        self.labels
            .get(child)
            .map(|label| ElementGeometry {
                rect: label.bounds,
                border_width: label.border_width,
            })
            .unwrap_or_default()
    }

    fn set_bounds(&mut self, child: &str, rect: Rect, border_width: u16) {
        if let Some(label) = self.labels.get_mut(child) {
            label.bounds = rect;
            label.border_width = border_width;
            label.configured += 1;
        }
    }
}
