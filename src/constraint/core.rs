use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseConstraintError;

/// Declared position of a child along one grid axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GridPosition {
    /// A fixed track index.
    Explicit(u16),
    /// Directly after the previous child: its position plus its span.
    Next,
    /// The previous child's position.
    Same,
}

impl Default for GridPosition {
    fn default() -> Self {
        Self::Explicit(0)
    }
}

impl FromStr for GridPosition {
    type Err = ParseConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "next" | "gridnext" | "gridboxnext" => Ok(Self::Next),
            "same" | "gridsame" | "gridboxsame" => Ok(Self::Same),
            other => other
                .parse::<u16>()
                .map(Self::Explicit)
                .map_err(|_| ParseConstraintError::Position(s.to_string())),
        }
    }
}

/// Which axes a child stretches to fill its cell on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Fill {
    None,
    Width,
    Height,
    #[default]
    Both,
}

impl Fill {
    pub fn fills_width(self) -> bool {
        matches!(self, Self::Width | Self::Both)
    }

    pub fn fills_height(self) -> bool {
        matches!(self, Self::Height | Self::Both)
    }
}

impl FromStr for Fill {
    type Err = ParseConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "fillnone" => Ok(Self::None),
            "width" | "fillwidth" | "horizontal" | "x" => Ok(Self::Width),
            "height" | "fillheight" | "vertical" | "y" => Ok(Self::Height),
            "both" | "fillboth" | "all" | "xy" => Ok(Self::Both),
            _ => Err(ParseConstraintError::Fill(s.to_string())),
        }
    }
}

/// Nine-way alignment of a child inside a cell larger than it wants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gravity {
    NorthWest,
    North,
    NorthEast,
    West,
    #[default]
    Center,
    East,
    SouthWest,
    South,
    SouthEast,
}

impl Gravity {
    /// Horizontal shift for `excess` spare cells.
    pub fn horizontal_offset(self, excess: u16) -> u16 {
        match self {
            Self::North | Self::Center | Self::South => excess / 2,
            Self::NorthEast | Self::East | Self::SouthEast => excess,
            Self::NorthWest | Self::West | Self::SouthWest => 0,
        }
    }

    /// Vertical shift for `excess` spare cells.
    pub fn vertical_offset(self, excess: u16) -> u16 {
        match self {
            Self::West | Self::Center | Self::East => excess / 2,
            Self::SouthWest | Self::South | Self::SouthEast => excess,
            Self::NorthWest | Self::North | Self::NorthEast => 0,
        }
    }
}

impl FromStr for Gravity {
    type Err = ParseConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "northwest" => Ok(Self::NorthWest),
            "north" => Ok(Self::North),
            "northeast" => Ok(Self::NorthEast),
            "west" => Ok(Self::West),
            "center" => Ok(Self::Center),
            "east" => Ok(Self::East),
            "southwest" => Ok(Self::SouthWest),
            "south" => Ok(Self::South),
            "southeast" => Ok(Self::SouthEast),
            _ => Err(ParseConstraintError::Gravity(s.to_string())),
        }
    }
}

/// Layout preferences a host declares for one child.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CellConstraint {
    pub column: GridPosition,
    pub row: GridPosition,
    pub column_span: u16,
    pub row_span: u16,
    pub fill: Fill,
    pub gravity: Gravity,
    pub weight_x: u32,
    pub weight_y: u32,
    /// Margin around the child; `None` uses the container's default spacing.
    pub margin: Option<u16>,
    pub allow_resize: bool,
}

impl Default for CellConstraint {
    fn default() -> Self {
        Self {
            column: GridPosition::default(),
            row: GridPosition::default(),
            column_span: 1,
            row_span: 1,
            fill: Fill::default(),
            gravity: Gravity::default(),
            weight_x: 0,
            weight_y: 0,
            margin: None,
            allow_resize: true,
        }
    }
}

impl CellConstraint {
    /// A 1x1 cell at an explicit column and row.
    pub fn at(column: u16, row: u16) -> Self {
        Self {
            column: GridPosition::Explicit(column),
            row: GridPosition::Explicit(row),
            ..Self::default()
        }
    }

    pub fn with_position(mut self, column: GridPosition, row: GridPosition) -> Self {
        self.column = column;
        self.row = row;
        self
    }

    pub fn with_span(mut self, columns: u16, rows: u16) -> Self {
        self.column_span = columns;
        self.row_span = rows;
        self
    }

    pub fn with_fill(mut self, fill: Fill) -> Self {
        self.fill = fill;
        self
    }

    pub fn with_gravity(mut self, gravity: Gravity) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_weights(mut self, weight_x: u32, weight_y: u32) -> Self {
        self.weight_x = weight_x;
        self.weight_y = weight_y;
        self
    }

    pub fn with_margin(mut self, margin: u16) -> Self {
        self.margin = Some(margin);
        self
    }

    pub fn with_allow_resize(mut self, allow: bool) -> Self {
        self.allow_resize = allow;
        self
    }

    /// Column span clamped to at least one track.
    pub fn column_span(&self) -> u16 {
        self.column_span.max(1)
    }

    /// Row span clamped to at least one track.
    pub fn row_span(&self) -> u16 {
        self.row_span.max(1)
    }

    /// True when position or span differ, which invalidates the whole grid.
    pub(crate) fn placement_differs(&self, other: &Self) -> bool {
        self.column != other.column
            || self.row != other.row
            || self.column_span() != other.column_span()
            || self.row_span() != other.row_span()
    }

    /// True when an input of the track sizer differs.
    pub(crate) fn sizing_differs(&self, other: &Self) -> bool {
        self.weight_x != other.weight_x
            || self.weight_y != other.weight_y
            || self.margin != other.margin
            || self.allow_resize != other.allow_resize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_container_conventions() {
        let constraint = CellConstraint::default();
        assert_eq!(constraint.column, GridPosition::Explicit(0));
        assert_eq!(constraint.column_span(), 1);
        assert_eq!(constraint.fill, Fill::Both);
        assert_eq!(constraint.gravity, Gravity::Center);
        assert!(constraint.allow_resize);
        assert!(constraint.margin.is_none());
    }

    #[test]
    fn zero_span_clamps_to_one() {
        let constraint = CellConstraint::at(0, 0).with_span(0, 0);
        assert_eq!(constraint.column_span(), 1);
        assert_eq!(constraint.row_span(), 1);
    }

    #[test]
    fn parse_fill_aliases() {
        assert_eq!("FillNone".parse::<Fill>().unwrap(), Fill::None);
        assert_eq!("horizontal".parse::<Fill>().unwrap(), Fill::Width);
        assert_eq!("y".parse::<Fill>().unwrap(), Fill::Height);
        assert_eq!("xy".parse::<Fill>().unwrap(), Fill::Both);
        assert!(matches!(
            "diagonal".parse::<Fill>(),
            Err(ParseConstraintError::Fill(_))
        ));
    }

    #[test]
    fn parse_grid_position() {
        assert_eq!("GridboxNext".parse::<GridPosition>().unwrap(), GridPosition::Next);
        assert_eq!("same".parse::<GridPosition>().unwrap(), GridPosition::Same);
        assert_eq!(
            " 7 ".parse::<GridPosition>().unwrap(),
            GridPosition::Explicit(7)
        );
        assert!("-1".parse::<GridPosition>().is_err());
    }

    #[test]
    fn parse_gravity_variants() {
        assert_eq!("NorthEast".parse::<Gravity>().unwrap(), Gravity::NorthEast);
        assert_eq!("south_west".parse::<Gravity>().unwrap(), Gravity::SouthWest);
        assert!("up".parse::<Gravity>().is_err());
    }

    #[test]
    fn gravity_offsets() {
        assert_eq!(Gravity::Center.horizontal_offset(10), 5);
        assert_eq!(Gravity::East.horizontal_offset(10), 10);
        assert_eq!(Gravity::NorthWest.horizontal_offset(10), 0);
        assert_eq!(Gravity::South.vertical_offset(9), 9);
        assert_eq!(Gravity::East.vertical_offset(9), 4);
        assert_eq!(Gravity::North.vertical_offset(9), 0);
    }

    #[test]
    fn deserializes_partial_json() {
        let json = r#"{"column":"next","row":{"explicit":2},"weight_x":3,"fill":"width"}"#;
        let constraint: CellConstraint = serde_json::from_str(json).unwrap();
        assert_eq!(constraint.column, GridPosition::Next);
        assert_eq!(constraint.row, GridPosition::Explicit(2));
        assert_eq!(constraint.weight_x, 3);
        assert_eq!(constraint.fill, Fill::Width);
        assert_eq!(constraint.column_span, 1);
        assert!(constraint.allow_resize);
    }
}
