//! Outline of a rectangle with another rectangle cut out of it.
//!
//! The area is sliced into the grid induced by both rectangles' edges. Cells
//! outside the cut-out are kept and their edges emitted; an edge shared by two
//! kept cells is emitted twice and cancels, so only the true boundary
//! survives. The surviving edges are then chained into closed loops.
//!
//! Points are compared through [`PointKey`], which rounds coordinates to a
//! fixed precision, never by raw float equality.

use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::common::collections::hash_map::Entry;
use crate::common::collections::{HashMap, HashSet};
use crate::sys::geometry::{Point, Rect};

const COORD_PRECISION: f64 = 1e6;
const MIN_EDGE_LENGTH: f64 = 1e-7;

/// Which way a polygon turns, by the sign of its shoelace area. With the
/// y-down display coordinates used here a `CounterClockwise` polygon appears
/// clockwise on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Winding {
    Clockwise,
    CounterClockwise,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Polygon(Vec<Point>);

impl Polygon {
    pub fn new(points: Vec<Point>) -> Self { Polygon(points) }

    pub fn empty() -> Self { Polygon(Vec::new()) }

    pub fn from_rect(rect: &Rect) -> Self {
        Polygon(vec![
            Point::new(rect.left(), rect.top()),
            Point::new(rect.right(), rect.top()),
            Point::new(rect.right(), rect.bottom()),
            Point::new(rect.left(), rect.bottom()),
        ])
    }

    pub fn points(&self) -> &[Point] { &self.0 }

    pub fn into_points(self) -> Vec<Point> { self.0 }

    pub fn len(&self) -> usize { self.0.len() }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    pub fn signed_area(&self) -> f64 { polygon_area(&self.0) }

    pub fn area(&self) -> f64 { self.signed_area().abs() }

    /// `None` for degenerate polygons with no area.
    pub fn winding(&self) -> Option<Winding> {
        let area = self.signed_area();
        if area > 0.0 {
            Some(Winding::CounterClockwise)
        } else if area < 0.0 {
            Some(Winding::Clockwise)
        } else {
            None
        }
    }

    pub fn reversed(mut self) -> Self {
        self.0.reverse();
        self
    }

    /// Reorders the points, if needed, so the polygon turns `winding`.
    pub fn with_winding(self, winding: Winding) -> Self {
        match self.winding() {
            Some(w) if w != winding => self.reversed(),
            _ => self,
        }
    }

    /// Axis-aligned bounding box of the points.
    pub fn bounds(&self) -> Option<Rect> {
        let first = self.0.first()?;
        let (mut left, mut top, mut right, mut bottom) = (first.x, first.y, first.x, first.y);
        for p in &self.0[1..] {
            left = left.min(p.x);
            top = top.min(p.y);
            right = right.max(p.x);
            bottom = bottom.max(p.y);
        }
        Some(Rect::from_edges(left, top, right, bottom))
    }
}

/// Signed shoelace area. Fewer than three points have no area.
pub fn polygon_area(points: &[Point]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let sum: f64 = points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(a, b)| a.x * b.y - b.x * a.y)
        .sum();
    sum * 0.5
}

fn quantize(value: f64) -> i64 { (value * COORD_PRECISION).round() as i64 }

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
struct PointKey(i64, i64);

impl From<Point> for PointKey {
    fn from(p: Point) -> Self { PointKey(quantize(p.x), quantize(p.y)) }
}

#[derive(Debug, Clone, Copy)]
struct Edge {
    start: Point,
    end: Point,
}

impl Edge {
    fn start_key(&self) -> PointKey { self.start.into() }

    fn end_key(&self) -> PointKey { self.end.into() }

    fn oriented_key(&self) -> (PointKey, PointKey) { (self.start_key(), self.end_key()) }

    /// Same for both directions of the segment.
    fn undirected_key(&self) -> (PointKey, PointKey) {
        let (a, b) = self.oriented_key();
        (
            PointKey(a.0.min(b.0), a.1.min(b.1)),
            PointKey(a.0.max(b.0), a.1.max(b.1)),
        )
    }
}

/// Edges in insertion order, with shared edges cancelled.
#[derive(Default)]
struct EdgeSet {
    slots: Vec<Option<Edge>>,
    index: HashMap<(PointKey, PointKey), usize>,
}

impl EdgeSet {
    fn toggle(&mut self, start: Point, end: Point) {
        if (start.x - end.x).abs() < MIN_EDGE_LENGTH && (start.y - end.y).abs() < MIN_EDGE_LENGTH {
            return;
        }
        let edge = Edge { start, end };
        match self.index.entry(edge.undirected_key()) {
            Entry::Occupied(entry) => {
                let slot = entry.remove();
                self.slots[slot] = None;
            }
            Entry::Vacant(entry) => {
                entry.insert(self.slots.len());
                self.slots.push(Some(edge));
            }
        }
    }

    fn into_edges(self) -> Vec<Edge> { self.slots.into_iter().flatten().collect() }
}

fn unique_sorted(values: [f64; 4]) -> Vec<f64> {
    let mut seen = HashSet::default();
    let mut unique: Vec<f64> =
        values.into_iter().filter(|v| v.is_finite() && seen.insert(quantize(*v))).collect();
    unique.sort_by(f64::total_cmp);
    unique
}

/// The part of `rect` left once `excluded` is cut out, as a closed polygon.
///
/// Returns `rect`'s corners (top-left, top-right, bottom-right, bottom-left)
/// when nothing is cut out, and an empty polygon when `rect` has no area or
/// is covered entirely. When the cut-out leaves several loops (a hole, or two
/// separate pieces), only the loop enclosing the largest area is returned.
pub fn extract_boundary(rect: &Rect, excluded: Option<&Rect>) -> Polygon {
    if rect.is_empty() {
        return Polygon::empty();
    }
    let Some(cut) = excluded.and_then(|e| rect.intersect(e)) else {
        return Polygon::from_rect(rect);
    };

    let xs = unique_sorted([rect.left(), rect.right(), cut.left(), cut.right()]);
    let ys = unique_sorted([rect.top(), rect.bottom(), cut.top(), cut.bottom()]);

    let mut edges = EdgeSet::default();
    let mut kept = 0;
    for x in xs.windows(2) {
        let (x0, x1) = (x[0], x[1]);
        if x1 <= x0 {
            continue;
        }
        for y in ys.windows(2) {
            let (y0, y1) = (y[0], y[1]);
            if y1 <= y0 {
                continue;
            }
            let centroid = Point::new((x0 + x1) / 2.0, (y0 + y1) / 2.0);
            if !rect.contains(centroid) || cut.contains(centroid) {
                continue;
            }
            kept += 1;
            edges.toggle(Point::new(x0, y0), Point::new(x1, y0));
            edges.toggle(Point::new(x1, y0), Point::new(x1, y1));
            edges.toggle(Point::new(x1, y1), Point::new(x0, y1));
            edges.toggle(Point::new(x0, y1), Point::new(x0, y0));
        }
    }
    trace!(kept, "grid cells kept");
    if kept == 0 {
        return Polygon::empty();
    }

    largest_loop(&edges.into_edges()).map(Polygon::new).unwrap_or_default()
}

/// Chains directed edges into closed loops and returns the one with the
/// largest absolute area. Chains that dead-end are dropped.
fn largest_loop(edges: &[Edge]) -> Option<Vec<Point>> {
    let mut by_start: HashMap<PointKey, Vec<&Edge>> = HashMap::default();
    for edge in edges {
        by_start.entry(edge.start_key()).or_default().push(edge);
    }

    let mut visited = HashSet::default();
    let mut best: Option<(Vec<Point>, f64)> = None;

    for first in edges {
        if visited.contains(&first.oriented_key()) {
            continue;
        }
        let loop_start = first.start_key();
        let mut points = Vec::new();
        let mut current = first;
        let closed = loop {
            if !visited.insert(current.oriented_key()) {
                // Ran into an edge of a loop walked earlier.
                break true;
            }
            points.push(current.start);
            let next_key = current.end_key();
            if next_key == loop_start {
                break true;
            }
            let next = by_start
                .get(&next_key)
                .and_then(|c| c.iter().copied().find(|e| !visited.contains(&e.oriented_key())));
            match next {
                Some(next) => current = next,
                None => break false,
            }
        };
        if !closed {
            warn!(start = ?first.start, "dropping open boundary chain");
            continue;
        }
        let area = polygon_area(&points).abs();
        if best.as_ref().is_none_or(|(_, best_area)| area > *best_area) {
            best = Some((points, area));
        }
    }

    best.map(|(points, _)| points)
}
