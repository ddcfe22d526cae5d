//! Vector path for a polygon with rounded corners.

use serde::Serialize;

use crate::sys::geometry::Point;
use crate::ui::boundary::{Polygon, Winding};

const EPSILON: f64 = 1e-6;

/// Sweep of an arc. `Increasing` runs from the start angle toward larger
/// angles, which on a y-down surface is clockwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Sweep {
    Increasing,
    Decreasing,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PathSegment {
    MoveTo(Point),
    LineTo(Point),
    Arc {
        center: Point,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        sweep: Sweep,
    },
    Close,
}

fn unit(from: Point, to: Point) -> Option<(Point, f64)> {
    let (dx, dy) = (to.x - from.x, to.y - from.y);
    let len = dx.hypot(dy);
    (len > 0.0).then(|| (Point::new(dx / len, dy / len), len))
}

/// Traces `polygon` as straight runs joined by circular arcs.
///
/// Each corner's radius is `radius` clamped to half the length of both
/// adjacent edges, so neighbouring arcs never overlap. Straight-through and
/// zero-radius corners stay sharp. The polygon is traced with positive
/// signed area whatever its input order.
pub fn rounded_outline(polygon: &Polygon, radius: f64) -> Vec<PathSegment> {
    if polygon.len() < 3 {
        return Vec::new();
    }
    let polygon = polygon.clone().with_winding(Winding::CounterClockwise);
    let points = polygon.points();
    let n = points.len();
    let radius = radius.max(0.0);

    let mut path = Vec::with_capacity(n * 2 + 1);
    for i in 0..n {
        let prev = points[(i + n - 1) % n];
        let current = points[i];
        let next = points[(i + 1) % n];
        let (Some((dir_in, len_in)), Some((dir_out, len_out))) =
            (unit(prev, current), unit(current, next))
        else {
            continue;
        };

        let r = radius.min(len_in / 2.0).min(len_out / 2.0);
        let start = Point::new(current.x - dir_in.x * r, current.y - dir_in.y * r);
        let end = Point::new(current.x + dir_out.x * r, current.y + dir_out.y * r);

        path.push(if path.is_empty() {
            PathSegment::MoveTo(start)
        } else {
            PathSegment::LineTo(start)
        });

        let turn = dir_in.x * dir_out.y - dir_in.y * dir_out.x;
        if r > EPSILON && turn.abs() > EPSILON {
            let center = Point::new(
                current.x - dir_in.x * r + dir_out.x * r,
                current.y - dir_in.y * r + dir_out.y * r,
            );
            path.push(PathSegment::Arc {
                center,
                radius: r,
                start_angle: (start.y - center.y).atan2(start.x - center.x),
                end_angle: (end.y - center.y).atan2(end.x - center.x),
                sweep: if turn > 0.0 { Sweep::Increasing } else { Sweep::Decreasing },
            });
        } else {
            path.push(PathSegment::LineTo(end));
        }
    }
    if !path.is_empty() {
        path.push(PathSegment::Close);
    }
    path
}

#[cfg(test)]
mod tests {
    use std::f64::consts::{FRAC_PI_2, PI};

    use super::*;
    use crate::sys::geometry::{IsWithin, Rect};
    use crate::ui::boundary::extract_boundary;

    fn arcs(path: &[PathSegment]) -> Vec<(Point, f64, Sweep)> {
        path.iter()
            .filter_map(|s| match *s {
                PathSegment::Arc { center, radius, sweep, .. } => Some((center, radius, sweep)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn square_gets_four_arcs() {
        let square = Polygon::from_rect(&Rect::new(0.0, 0.0, 100.0, 100.0));
        let path = rounded_outline(&square, 10.0);
        assert_eq!(path.len(), 9);
        assert_eq!(path[0], PathSegment::MoveTo(Point::new(0.0, 10.0)));
        assert_eq!(path[8], PathSegment::Close);

        let PathSegment::Arc { center, radius, start_angle, end_angle, sweep } = path[1] else {
            panic!("expected an arc, got {:?}", path[1]);
        };
        assert_eq!(center, Point::new(10.0, 10.0));
        assert_eq!(radius, 10.0);
        assert!(start_angle.is_within(1e-9, PI));
        assert!(end_angle.is_within(1e-9, -FRAC_PI_2));
        assert_eq!(sweep, Sweep::Increasing);
        assert!(arcs(&path).iter().all(|&(_, r, s)| r == 10.0 && s == Sweep::Increasing));
    }

    #[test]
    fn radius_is_clamped_to_half_the_shorter_edge() {
        let bar = Polygon::from_rect(&Rect::new(0.0, 0.0, 200.0, 12.0));
        let path = rounded_outline(&bar, 50.0);
        assert!(arcs(&path).iter().all(|&(_, r, _)| r == 6.0));
    }

    #[test]
    fn input_order_does_not_change_the_trace() {
        let square = Polygon::from_rect(&Rect::new(0.0, 0.0, 40.0, 40.0));
        assert_eq!(rounded_outline(&square.clone().reversed(), 5.0), rounded_outline(&square, 5.0));
    }

    #[test]
    fn concave_corner_turns_the_other_way() {
        let l_shape = extract_boundary(
            &Rect::new(0.0, 0.0, 100.0, 100.0),
            Some(&Rect::new(50.0, 50.0, 100.0, 100.0)),
        );
        let path = rounded_outline(&l_shape, 10.0);
        let arcs = arcs(&path);
        assert_eq!(arcs.len(), 6);
        let concave: Vec<_> = arcs.iter().filter(|a| a.2 == Sweep::Decreasing).collect();
        assert_eq!(concave.len(), 1);
        assert_eq!(concave[0].0, Point::new(60.0, 60.0));
    }

    #[test]
    fn zero_radius_is_all_straight() {
        let square = Polygon::from_rect(&Rect::new(0.0, 0.0, 10.0, 10.0));
        let path = rounded_outline(&square, 0.0);
        assert!(arcs(&path).is_empty());
        assert_eq!(path.len(), 9);
    }

    #[test]
    fn too_few_points_draw_nothing() {
        assert!(rounded_outline(&Polygon::empty(), 10.0).is_empty());
        let line = Polygon::new(vec![Point::new(0.0, 0.0), Point::new(5.0, 0.0)]);
        assert!(rounded_outline(&line, 10.0).is_empty());
    }
}
