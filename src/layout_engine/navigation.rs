//! Directional selection of the neighbouring tile.
//!
//! Candidates must have their center strictly on the requested side. Among
//! those, the tile sharing the most extent with the origin along the
//! perpendicular axis wins, and center distance breaks the remaining ties.
//! This favours the tile that is "in line" with the origin over one that is
//! merely closer.

use tracing::trace;

use super::Direction;
use super::leaves::Leaf;
use super::scoring::{OVERLAP_WEIGHT, Score, best_by};
use crate::sys::geometry::Rect;

fn score_against(origin: &Rect, leaf: &Leaf, direction: Direction) -> Option<Score> {
    let from = origin.center();
    let to = leaf.rect.center();
    if !direction.points_toward(from, to) {
        return None;
    }
    let overlap = direction.orthogonal_overlap(origin, &leaf.rect);
    let score = Score::new(-overlap * OVERLAP_WEIGHT, from.distance_to(to));
    trace!(node = ?leaf.node, overlap, distance = score.secondary, "candidate");
    Some(score)
}

/// Best leaf next to `current` in `direction`, if any.
///
/// `current` is normally the rectangle of the leaf the window sits in; a leaf
/// with exactly that rectangle is never its own neighbour.
pub fn choose_adjacent<'a>(
    leaves: &'a [Leaf],
    current: &Rect,
    direction: Direction,
) -> Option<&'a Leaf> {
    best_by(leaves.iter().filter(|leaf| leaf.rect != *current), |leaf| {
        score_against(current, leaf, direction)
    })
}

/// Best leaf to grow `span` with in `direction`. Leaves already inside the
/// span are never candidates, so repeated calls only ever grow outward.
pub fn choose_adjacent_to_span<'a>(
    leaves: &'a [Leaf],
    span: &Rect,
    direction: Direction,
) -> Option<&'a Leaf> {
    best_by(leaves.iter().filter(|leaf| !span.contains_rect(leaf.rect)), |leaf| {
        score_against(span, leaf, direction)
    })
}
