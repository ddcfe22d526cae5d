//! Flattening a computed layout tree into the tiles navigation works on.

use crate::layout_engine::scoring::{Score, best_by};
use crate::model::tree::{LayoutTree, NodeId};
use crate::sys::geometry::{Point, Rect};

/// A terminal region with a concrete rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Leaf {
    pub node: NodeId,
    pub rect: Rect,
}

/// Regular leaves of `tree` in preorder. Leaves without a computed rectangle
/// are skipped.
pub fn collect_leaves(tree: &LayoutTree) -> Vec<Leaf> {
    let mut leaves = Vec::new();
    tree.for_self_and_descendants(tree.root(), |node, data| {
        if let (true, Some(rect)) = (data.is_leaf(), data.rect) {
            leaves.push(Leaf { node, rect });
        }
    });
    leaves
}

/// First leaf whose rectangle contains `point`, edges included.
pub fn find_leaf_for_point(leaves: &[Leaf], point: Point) -> Option<&Leaf> {
    leaves.iter().find(|leaf| leaf.rect.contains(point))
}

/// Leaf whose center is closest to `point`.
pub fn nearest_leaf(leaves: &[Leaf], point: Point) -> Option<&Leaf> {
    best_by(leaves, |leaf| Some(Score::distance(leaf.rect.center().distance_to(point))))
}

pub fn leaves_overlapping<'a>(leaves: &'a [Leaf], rect: &Rect) -> Vec<&'a Leaf> {
    leaves.iter().filter(|leaf| leaf.rect.overlaps(rect)).collect()
}

/// Bounding union of every leaf overlapping `frame`, or `None` when the frame
/// touches no leaf at all.
pub fn span_of(leaves: &[Leaf], frame: &Rect) -> Option<Rect> {
    leaves_overlapping(leaves, frame).into_iter().map(|leaf| leaf.rect).reduce(|a, b| a.union(&b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::layout::LayoutDef;

    fn grid_leaves() -> Vec<Leaf> {
        let mut tree = LayoutTree::from_def(&LayoutDef::grid(2, 2)).unwrap();
        tree.calculate_rects(0.0, 0.0, 1000.0, 1000.0);
        collect_leaves(&tree)
    }

    #[test]
    fn collects_leaves_with_rects() {
        let leaves = grid_leaves();
        assert_eq!(leaves.len(), 4);
        assert_eq!(leaves[3].rect, Rect::new(500.0, 500.0, 500.0, 500.0));
    }

    #[test]
    fn uncalculated_tree_has_no_leaves() {
        let tree = LayoutTree::from_def(&LayoutDef::grid(2, 2)).unwrap();
        assert!(collect_leaves(&tree).is_empty());
    }

    #[test]
    fn point_lookup_prefers_first_containing_leaf() {
        let leaves = grid_leaves();
        let hit = find_leaf_for_point(&leaves, Point::new(700.0, 200.0)).unwrap();
        assert_eq!(hit.rect, Rect::new(500.0, 0.0, 500.0, 500.0));
        // a shared edge belongs to whichever leaf comes first
        let edge = find_leaf_for_point(&leaves, Point::new(500.0, 200.0)).unwrap();
        assert_eq!(edge.rect, Rect::new(0.0, 0.0, 500.0, 500.0));
        assert!(find_leaf_for_point(&leaves, Point::new(1500.0, 200.0)).is_none());
    }

    #[test]
    fn nearest_leaf_by_center_distance() {
        let leaves = grid_leaves();
        let near = nearest_leaf(&leaves, Point::new(1400.0, 900.0)).unwrap();
        assert_eq!(near.rect, Rect::new(500.0, 500.0, 500.0, 500.0));
        assert!(nearest_leaf(&[], Point::new(0.0, 0.0)).is_none());
    }

    #[test]
    fn span_unions_overlapped_leaves() {
        let leaves = grid_leaves();
        let frame = Rect::new(100.0, 100.0, 600.0, 200.0);
        assert_eq!(span_of(&leaves, &frame), Some(Rect::new(0.0, 0.0, 1000.0, 500.0)));
        let exact = Rect::new(0.0, 0.0, 500.0, 500.0);
        assert_eq!(span_of(&leaves, &exact), Some(exact));
        assert_eq!(span_of(&leaves, &Rect::new(2000.0, 0.0, 10.0, 10.0)), None);
    }
}
