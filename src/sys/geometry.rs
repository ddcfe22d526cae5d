//! Plain geometry types shared by navigation and rendering.
//!
//! Coordinates are display pixels with the origin at the top-left of the
//! global display space; `y` grows downward.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self { Point { x, y } }

    pub fn distance_to(&self, other: Point) -> f64 { (other.x - self.x).hypot(other.y - self.y) }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self { Size { width, height } }
}

/// Axis-aligned rectangle. Zero-sized rectangles are legal and are treated as
/// empty by every operation that cares.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Rect { x, y, width, height }
    }

    pub fn from_edges(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Rect::new(left, top, right - left, bottom - top)
    }

    pub fn left(&self) -> f64 { self.x }

    pub fn top(&self) -> f64 { self.y }

    pub fn right(&self) -> f64 { self.x + self.width }

    pub fn bottom(&self) -> f64 { self.y + self.height }

    pub fn min(&self) -> Point { Point::new(self.left(), self.top()) }

    pub fn max(&self) -> Point { Point::new(self.right(), self.bottom()) }

    pub fn size(&self) -> Size { Size::new(self.width, self.height) }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn area(&self) -> f64 { self.width * self.height }

    pub fn is_empty(&self) -> bool { !(self.width > 0.0 && self.height > 0.0) }

    /// The shared region of both rectangles. Disjoint inputs yield a
    /// zero-sized rectangle rather than a negative one.
    pub fn intersection(&self, other: &Self) -> Self {
        let min_x = f64::max(self.left(), other.left());
        let max_x = f64::min(self.right(), other.right());
        let min_y = f64::max(self.top(), other.top());
        let max_y = f64::min(self.bottom(), other.bottom());
        Rect::new(
            min_x,
            min_y,
            f64::max(max_x - min_x, 0.),
            f64::max(max_y - min_y, 0.),
        )
    }

    /// Like [`Rect::intersection`] but `None` when nothing of positive area is shared.
    pub fn intersect(&self, other: &Self) -> Option<Self> {
        let shared = self.intersection(other);
        (!shared.is_empty()).then_some(shared)
    }

    /// Bounding union of both rectangles.
    pub fn union(&self, other: &Self) -> Self {
        Rect::from_edges(
            f64::min(self.left(), other.left()),
            f64::min(self.top(), other.top()),
            f64::max(self.right(), other.right()),
            f64::max(self.bottom(), other.bottom()),
        )
    }

    /// True when the interiors intersect. Touching edges do not count.
    pub fn overlaps(&self, other: &Self) -> bool {
        !(self.right() <= other.left()
            || other.right() <= self.left()
            || self.bottom() <= other.top()
            || other.bottom() <= self.top())
    }

    pub fn contains(&self, point: Point) -> bool {
        (self.left()..=self.right()).contains(&point.x)
            && (self.top()..=self.bottom()).contains(&point.y)
    }

    pub fn contains_rect(&self, other: Self) -> bool {
        self.left() <= other.left()
            && self.top() <= other.top()
            && self.right() >= other.right()
            && self.bottom() >= other.bottom()
    }

    /// Length shared by the two rectangles' projections onto the x axis.
    pub fn horizontal_overlap(&self, other: &Self) -> f64 {
        f64::max(0., f64::min(self.right(), other.right()) - f64::max(self.left(), other.left()))
    }

    /// Length shared by the two rectangles' projections onto the y axis.
    pub fn vertical_overlap(&self, other: &Self) -> f64 {
        f64::max(0., f64::min(self.bottom(), other.bottom()) - f64::max(self.top(), other.top()))
    }

    /// Shrinks the rectangle by `margin` on every side; a negative margin grows it.
    pub fn inset_by(&self, margin: f64) -> Self {
        Rect::new(
            self.x + margin,
            self.y + margin,
            self.width - margin * 2.0,
            self.height - margin * 2.0,
        )
    }

    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Rect::new(self.x + dx, self.y + dy, self.width, self.height)
    }
}

pub trait Round {
    fn round(&self) -> Self;
}

impl Round for Rect {
    fn round(&self) -> Self {
        let min_rounded = self.min().round();
        let max_rounded = self.max().round();
        Rect::from_edges(min_rounded.x, min_rounded.y, max_rounded.x, max_rounded.y)
    }
}

impl Round for Point {
    fn round(&self) -> Self { Point::new(self.x.round(), self.y.round()) }
}

impl Round for Size {
    fn round(&self) -> Self { Size::new(self.width.round(), self.height.round()) }
}

pub trait IsWithin {
    fn is_within(&self, how_much: f64, other: Self) -> bool;
}

impl IsWithin for Rect {
    fn is_within(&self, how_much: f64, other: Self) -> bool {
        self.min().is_within(how_much, other.min()) && self.size().is_within(how_much, other.size())
    }
}

impl IsWithin for Point {
    fn is_within(&self, how_much: f64, other: Self) -> bool {
        self.x.is_within(how_much, other.x) && self.y.is_within(how_much, other.y)
    }
}

impl IsWithin for Size {
    fn is_within(&self, how_much: f64, other: Self) -> bool {
        self.width.is_within(how_much, other.width) && self.height.is_within(how_much, other.height)
    }
}

impl IsWithin for f64 {
    fn is_within(&self, how_much: f64, other: Self) -> bool { (self - other).abs() < how_much }
}

pub trait SameAs: IsWithin + Sized {
    fn same_as(&self, other: Self) -> bool { self.is_within(0.1, other) }
}

impl SameAs for Rect {}
impl SameAs for Point {}
impl SameAs for Size {}
