use serde::{Deserialize, Serialize};

use crate::sys::geometry::{Point, Rect};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    Horizontal,
    Vertical,
}

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum_macros::EnumString,
    strum_macros::Display,
    strum_macros::VariantNames
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub const ALL: [Direction; 4] =
        [Direction::Left, Direction::Right, Direction::Up, Direction::Down];

    pub fn orientation(self) -> Orientation {
        match self {
            Direction::Left | Direction::Right => Orientation::Horizontal,
            Direction::Up | Direction::Down => Orientation::Vertical,
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }

    /// Whether `to` lies strictly on this side of `from`.
    pub fn points_toward(self, from: Point, to: Point) -> bool {
        match self {
            Direction::Left => to.x < from.x,
            Direction::Right => to.x > from.x,
            Direction::Up => to.y < from.y,
            Direction::Down => to.y > from.y,
        }
    }

    /// Overlap of `a` and `b` along the axis perpendicular to travel.
    pub fn orthogonal_overlap(self, a: &Rect, b: &Rect) -> f64 {
        match self.orientation() {
            Orientation::Horizontal => a.vertical_overlap(b),
            Orientation::Vertical => a.horizontal_overlap(b),
        }
    }
}
