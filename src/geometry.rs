use serde::{Deserialize, Serialize};

/// Integer size measured in layout cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    pub width: u16,
    pub height: u16,
}

impl Size {
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    /// Grow both axes by `amount`, saturating at `u16::MAX`.
    pub fn inflate(self, amount: u16) -> Self {
        Self {
            width: self.width.saturating_add(amount),
            height: self.height.saturating_add(amount),
        }
    }
}

/// Rectangle anchored within the container's coordinate space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// Clamp a wide intermediate value back into the `u16` dimension range.
pub(crate) fn clamp_dimension(value: i64) -> u16 {
    value.clamp(0, u16::MAX as i64) as u16
}
