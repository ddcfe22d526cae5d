//! Shapes to draw for a display's layout, in display-local coordinates.
//!
//! The plan is surface agnostic: each [`OverlayShape`] carries the outline
//! path and colours, and a renderer fills then strokes it.

use serde::Serialize;

use crate::common::config::{Color, OverlaySettings};
use crate::model::tree::{LayoutTree, NodeId};
use crate::sys::geometry::Rect;
use crate::ui::boundary::{Polygon, extract_boundary};
use crate::ui::outline::{PathSegment, rounded_outline};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlayShape {
    pub node: NodeId,
    /// The leaf's rectangle after its margin, before any cut-out.
    pub region: Rect,
    pub polygon: Polygon,
    pub path: Vec<PathSegment>,
    pub fill: Color,
    pub stroke: Color,
}

/// Walks `tree` and returns one shape per drawable leaf, in paint order.
///
/// Rectangles are shifted so `display` starts at the origin and shrunk by each
/// node's margin. A node with an inset cuts the inset's area, grown by the
/// inset's margin, out of every leaf beneath it; the inset's own leaves are
/// painted after all of those.
pub fn render_plan(tree: &LayoutTree, display: &Rect, style: &OverlaySettings) -> Vec<OverlayShape> {
    let mut shapes = Vec::new();
    collect(tree, tree.root(), display, style, None, &mut shapes);
    shapes
}

fn to_local(rect: Rect, display: &Rect) -> Rect { rect.translate(-display.x, -display.y) }

fn collect(
    tree: &LayoutTree,
    id: NodeId,
    display: &Rect,
    style: &OverlaySettings,
    mut cutout: Option<Rect>,
    out: &mut Vec<OverlayShape>,
) {
    let node = &tree[id];
    let Some(rect) = node.rect else { return };

    if cutout.is_none()
        && let Some(inset) = node.inset
        && let Some(inset_rect) = tree.rect(inset.root)
    {
        cutout = Some(to_local(inset_rect, display).inset_by(-tree[inset.root].margin));
    }

    if node.is_leaf() {
        let fill = if node.highlighted { style.highlight } else { style.background };
        let region = to_local(rect, display).inset_by(node.margin);
        let polygon = extract_boundary(&region, cutout.as_ref());
        if polygon.len() >= 3 {
            out.push(OverlayShape {
                node: id,
                region,
                path: rounded_outline(&polygon, style.corner_radius),
                polygon,
                fill,
                stroke: style.border,
            });
        }
    }

    for &child in tree.children(id) {
        collect(tree, child, display, style, cutout, out);
    }

    if let Some(inset) = node.inset {
        collect(tree, inset.root, display, style, None, out);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::layout::LayoutDef;

    fn computed(def: &LayoutDef, area: Rect) -> LayoutTree {
        let mut tree = LayoutTree::from_def(def).unwrap();
        tree.calculate_rects(area.x, area.y, area.width, area.height);
        tree
    }

    #[test]
    fn grid_leaves_are_local_and_margined() {
        let display = Rect::new(1920.0, 0.0, 1000.0, 1000.0);
        let def = LayoutDef::split(crate::layout_engine::Orientation::Horizontal, 0.5, vec![
            LayoutDef::leaf().with_margin(10.0),
            LayoutDef::leaf(),
        ]);
        let tree = computed(&def, display);
        let shapes = render_plan(&tree, &display, &OverlaySettings::default());
        assert_eq!(shapes.len(), 2);
        assert_eq!(shapes[0].region, Rect::new(10.0, 10.0, 480.0, 980.0));
        assert_eq!(shapes[1].region, Rect::new(500.0, 0.0, 500.0, 1000.0));
        assert_eq!(shapes[0].polygon, Polygon::from_rect(&shapes[0].region));
        assert!(matches!(shapes[0].path[0], PathSegment::MoveTo(_)));
    }

    #[test]
    fn highlighted_leaf_uses_highlight_colour() {
        let display = Rect::new(0.0, 0.0, 800.0, 600.0);
        let mut tree = computed(&LayoutDef::grid(2, 1), display);
        let second = tree.children(tree.root())[1];
        tree.set_highlighted(Some(second));
        let style = OverlaySettings::default();
        let shapes = render_plan(&tree, &display, &style);
        assert_eq!(shapes[0].fill, style.background);
        assert_eq!(shapes[1].fill, style.highlight);
        assert!(shapes.iter().all(|s| s.stroke == style.border));
    }

    #[test]
    fn inset_is_cut_out_and_drawn_last() {
        let display = Rect::new(0.0, 0.0, 1000.0, 1000.0);
        let def = LayoutDef::grid(2, 2)
            .with_inset(Rect::new(0.25, 0.25, 0.5, 0.5), LayoutDef::leaf().with_margin(5.0));
        let tree = computed(&def, display);
        let shapes = render_plan(&tree, &display, &OverlaySettings::default());
        assert_eq!(shapes.len(), 5);

        // Each quadrant loses the corner the grown inset (245..755) covers.
        let quadrant = 500.0 * 500.0;
        let notch = 255.0 * 255.0;
        for shape in &shapes[..4] {
            assert_eq!(shape.polygon.area(), quadrant - notch);
        }

        let inset = tree.inset(tree.root()).unwrap();
        assert_eq!(shapes[4].node, inset.root);
        assert_eq!(shapes[4].region, Rect::new(255.0, 255.0, 490.0, 490.0));
        assert_eq!(shapes[4].polygon, Polygon::from_rect(&shapes[4].region));
    }

    #[test]
    fn leaf_swallowed_by_inset_is_skipped() {
        let display = Rect::new(0.0, 0.0, 100.0, 100.0);
        let def = LayoutDef::grid(1, 1).with_inset(Rect::new(0.0, 0.0, 1.0, 1.0), LayoutDef::leaf());
        let tree = computed(&def, display);
        let shapes = render_plan(&tree, &display, &OverlaySettings::default());
        assert_eq!(shapes.len(), 1);
        assert_eq!(tree.inset(tree.root()).map(|i| i.root), Some(shapes[0].node));
    }

    #[test]
    fn uncalculated_tree_draws_nothing() {
        let tree = LayoutTree::from_def(&LayoutDef::grid(2, 2)).unwrap();
        let shapes = render_plan(&tree, &Rect::new(0.0, 0.0, 10.0, 10.0), &OverlaySettings::default());
        assert!(shapes.is_empty());
    }
}
