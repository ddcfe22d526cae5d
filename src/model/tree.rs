use std::ops::Index;

use serde::{Deserialize, Serialize};
use slotmap::SlotMap;

use crate::layout_engine::Orientation;
use crate::model::layout::{LayoutDef, LayoutError};
use crate::sys::geometry::Rect;

slotmap::new_key_type! {
    /// Represents a node somewhere in a layout tree.
    pub struct NodeId;
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    Leaf,
    Split { orientation: Orientation, ratio: f64 },
}

/// A sub-layout carved out of its host's area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Inset {
    /// Position within the host rectangle, in fractions of its size.
    pub frame: Rect,
    pub root: NodeId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    pub kind: NodeKind,
    pub margin: f64,
    pub inset: Option<Inset>,
    /// Pixel rectangle from the last [`LayoutTree::calculate_rects`]; `None`
    /// before the first calculation or when the node collapsed to nothing.
    pub rect: Option<Rect>,
    pub highlighted: bool,
}

impl Node {
    fn new(kind: NodeKind, margin: f64, parent: Option<NodeId>) -> Self {
        Node {
            parent,
            children: Vec::new(),
            kind,
            margin,
            inset: None,
            rect: None,
            highlighted: false,
        }
    }

    pub fn is_leaf(&self) -> bool { matches!(self.kind, NodeKind::Leaf) }
}

/// Arena holding one display's layout. Regular nodes hang off `root`; each
/// inset subtree hangs off its own root referenced from the host node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutTree {
    map: SlotMap<NodeId, Node>,
    root: NodeId,
}

impl Index<NodeId> for LayoutTree {
    type Output = Node;

    fn index(&self, index: NodeId) -> &Self::Output { &self.map[index] }
}

impl LayoutTree {
    pub fn from_def(def: &LayoutDef) -> Result<Self, LayoutError> {
        def.validate()?;
        let mut map = SlotMap::with_key();
        let root = Self::build(&mut map, def, None);
        Ok(LayoutTree { map, root })
    }

    fn build(map: &mut SlotMap<NodeId, Node>, def: &LayoutDef, parent: Option<NodeId>) -> NodeId {
        let kind = match &def.split {
            Some(split) => NodeKind::Split {
                orientation: split.orientation,
                ratio: split.ratio,
            },
            None => NodeKind::Leaf,
        };
        let id = map.insert(Node::new(kind, def.margin, parent));
        if let Some(split) = &def.split {
            let children: Vec<_> =
                split.children.iter().map(|child| Self::build(map, child, Some(id))).collect();
            map[id].children = children;
        }
        if let Some(inset) = &def.inset {
            let inset_root = Self::build(map, &inset.layout, None);
            map[id].inset = Some(Inset { frame: inset.frame, root: inset_root });
        }
        id
    }

    pub fn root(&self) -> NodeId { self.root }

    pub fn len(&self) -> usize { self.map.len() }

    pub fn is_empty(&self) -> bool { self.map.is_empty() }

    pub fn contains(&self, id: NodeId) -> bool { self.map.contains_key(id) }

    pub fn get(&self, id: NodeId) -> Option<&Node> { self.map.get(id) }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> { self.map.get(id).and_then(|n| n.parent) }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.map.get(id).map(|n| n.children.as_slice()).unwrap_or_default()
    }

    pub fn inset(&self, id: NodeId) -> Option<Inset> { self.map.get(id).and_then(|n| n.inset) }

    pub fn is_leaf(&self, id: NodeId) -> bool { self.map.get(id).is_some_and(Node::is_leaf) }

    pub fn rect(&self, id: NodeId) -> Option<Rect> { self.map.get(id).and_then(|n| n.rect) }

    /// Preorder walk of `id` and its regular descendants. Inset subtrees are
    /// not entered.
    pub fn traverse_preorder(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        PreorderTraversal { tree: self, stack: vec![id] }
    }

    pub fn for_self_and_descendants(&self, id: NodeId, mut visit: impl FnMut(NodeId, &Node)) {
        for node in self.traverse_preorder(id) {
            visit(node, &self.map[node]);
        }
    }

    /// Assigns pixel rectangles to every node, inset subtrees included,
    /// starting from the given area for the root.
    pub fn calculate_rects(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.assign(self.root, Some(Rect::new(x, y, width, height)));
    }

    fn assign(&mut self, id: NodeId, rect: Option<Rect>) {
        let rect = rect.filter(|r| !r.is_empty());
        let node = &mut self.map[id];
        node.rect = rect;
        let kind = node.kind;
        let children = node.children.clone();
        let inset = node.inset;

        let child_rects = match (kind, rect) {
            (NodeKind::Split { orientation, ratio }, Some(rect)) => {
                split_rect(rect, orientation, ratio, children.len())
                    .into_iter()
                    .map(Some)
                    .collect()
            }
            _ => vec![None; children.len()],
        };
        for (child, child_rect) in children.into_iter().zip(child_rects) {
            self.assign(child, child_rect);
        }

        if let Some(inset) = inset {
            let inset_rect = rect.map(|host| {
                Rect::new(
                    host.x + inset.frame.x * host.width,
                    host.y + inset.frame.y * host.height,
                    inset.frame.width * host.width,
                    inset.frame.height * host.height,
                )
            });
            self.assign(inset.root, inset_rect);
        }
    }

    /// Marks `id` as the only highlighted node; `None` clears every flag.
    pub fn set_highlighted(&mut self, id: Option<NodeId>) {
        for (node_id, node) in self.map.iter_mut() {
            node.highlighted = Some(node_id) == id;
        }
    }

    pub fn highlighted(&self) -> Option<NodeId> {
        self.map.iter().find(|(_, node)| node.highlighted).map(|(id, _)| id)
    }

    pub fn draw_tree(&self) -> String {
        let tree = self.get_ascii_tree(self.root);
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = ascii_tree::write_tree(&mut out, &tree);
        out
    }

    fn get_ascii_tree(&self, id: NodeId) -> ascii_tree::Tree {
        let node = &self.map[id];
        let status = if node.highlighted { "☒ " } else { "☐ " };
        let kind = match node.kind {
            NodeKind::Leaf => "leaf".to_string(),
            NodeKind::Split { orientation, ratio } => format!("{orientation:?} split {ratio:.3}"),
        };
        let rect = match node.rect {
            Some(r) => format!("@ {},{} {}x{}", r.x, r.y, r.width, r.height),
            None => "(no rect)".to_string(),
        };
        let desc = format!("{status}{id:?} {kind} {rect}");
        let mut children: Vec<_> = node.children.iter().map(|&c| self.get_ascii_tree(c)).collect();
        if let Some(inset) = node.inset {
            match self.get_ascii_tree(inset.root) {
                ascii_tree::Tree::Node(desc, sub) => {
                    children.push(ascii_tree::Tree::Node(format!("inset {desc}"), sub))
                }
                ascii_tree::Tree::Leaf(lines) => children.push(ascii_tree::Tree::Leaf(
                    lines.into_iter().map(|l| format!("inset {l}")).collect(),
                )),
            }
        }
        if children.is_empty() {
            ascii_tree::Tree::Leaf(vec![desc])
        } else {
            ascii_tree::Tree::Node(desc, children)
        }
    }
}

/// Splits `rect` along `orientation`: the first child gets `ratio` of the
/// extent and the rest share the remainder evenly.
fn split_rect(rect: Rect, orientation: Orientation, ratio: f64, count: usize) -> Vec<Rect> {
    if count == 0 {
        return Vec::new();
    }
    if count == 1 {
        return vec![rect];
    }
    let extent = match orientation {
        Orientation::Horizontal => rect.width,
        Orientation::Vertical => rect.height,
    };
    let first = extent * ratio;
    let rest = (extent - first) / (count - 1) as f64;
    let mut offset = 0.0;
    (0..count)
        .map(|i| {
            let len = if i == 0 { first } else { rest };
            // The last child absorbs rounding so the children tile exactly.
            let len = if i == count - 1 { extent - offset } else { len };
            let child = match orientation {
                Orientation::Horizontal => Rect::new(rect.x + offset, rect.y, len, rect.height),
                Orientation::Vertical => Rect::new(rect.x, rect.y + offset, rect.width, len),
            };
            offset += len;
            child
        })
        .collect()
}

struct PreorderTraversal<'a> {
    tree: &'a LayoutTree,
    stack: Vec<NodeId>,
}

impl Iterator for PreorderTraversal<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        if let Some(node) = self.tree.map.get(id) {
            self.stack.extend(node.children.iter().rev().copied());
        }
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn two_by_two() -> LayoutTree {
        let mut tree = LayoutTree::from_def(&LayoutDef::grid(2, 2)).unwrap();
        tree.calculate_rects(0.0, 0.0, 1000.0, 1000.0);
        tree
    }

    fn leaf_rects(tree: &LayoutTree) -> Vec<Rect> {
        let mut rects = Vec::new();
        tree.for_self_and_descendants(tree.root(), |_, node| {
            if node.is_leaf() {
                rects.extend(node.rect);
            }
        });
        rects
    }

    #[test]
    fn calculates_grid_rects_in_preorder() {
        let tree = two_by_two();
        assert_eq!(tree.len(), 7);
        assert_eq!(leaf_rects(&tree), vec![
            Rect::new(0.0, 0.0, 500.0, 500.0),
            Rect::new(500.0, 0.0, 500.0, 500.0),
            Rect::new(0.0, 500.0, 500.0, 500.0),
            Rect::new(500.0, 500.0, 500.0, 500.0),
        ]);
    }

    #[test]
    fn uneven_ratio_gives_remainder_to_later_children() {
        let def = LayoutDef::split(Orientation::Horizontal, 0.5, vec![
            LayoutDef::leaf(),
            LayoutDef::leaf(),
            LayoutDef::leaf(),
        ]);
        let mut tree = LayoutTree::from_def(&def).unwrap();
        tree.calculate_rects(100.0, 50.0, 800.0, 600.0);
        assert_eq!(leaf_rects(&tree), vec![
            Rect::new(100.0, 50.0, 400.0, 600.0),
            Rect::new(500.0, 50.0, 200.0, 600.0),
            Rect::new(700.0, 50.0, 200.0, 600.0),
        ]);
    }

    #[test]
    fn collapsed_area_leaves_rects_unset() {
        let mut tree = LayoutTree::from_def(&LayoutDef::grid(2, 1)).unwrap();
        tree.calculate_rects(0.0, 0.0, 0.0, 500.0);
        assert!(leaf_rects(&tree).is_empty());
        assert_eq!(tree.rect(tree.root()), None);
    }

    #[test]
    fn inset_subtree_is_positioned_but_not_traversed() {
        let def = LayoutDef::grid(2, 1)
            .with_inset(Rect::new(0.25, 0.25, 0.5, 0.5), LayoutDef::leaf().with_margin(8.0));
        let mut tree = LayoutTree::from_def(&def).unwrap();
        tree.calculate_rects(0.0, 0.0, 1000.0, 800.0);

        let inset = tree.inset(tree.root()).unwrap();
        assert_eq!(tree.rect(inset.root), Some(Rect::new(250.0, 200.0, 500.0, 400.0)));
        assert_eq!(tree[inset.root].margin, 8.0);
        assert_eq!(tree.parent(inset.root), None);

        let visited: Vec<_> = tree.traverse_preorder(tree.root()).collect();
        assert_eq!(visited.len(), 3);
        assert!(!visited.contains(&inset.root));
    }

    #[test]
    fn highlight_is_exclusive() {
        let mut tree = two_by_two();
        let leaves: Vec<_> =
            tree.traverse_preorder(tree.root()).filter(|&n| tree.is_leaf(n)).collect();
        tree.set_highlighted(Some(leaves[0]));
        tree.set_highlighted(Some(leaves[2]));
        assert_eq!(tree.highlighted(), Some(leaves[2]));
        assert!(!tree[leaves[0]].highlighted);
        tree.set_highlighted(None);
        assert_eq!(tree.highlighted(), None);
    }

    #[test]
    fn draw_tree_lists_every_node() {
        let mut tree = two_by_two();
        let first_leaf = tree.traverse_preorder(tree.root()).find(|&n| tree.is_leaf(n)).unwrap();
        tree.set_highlighted(Some(first_leaf));
        let drawn = tree.draw_tree();
        assert_eq!(drawn.matches("leaf").count(), 4);
        assert_eq!(drawn.matches("☒").count(), 1);
        assert!(drawn.contains("Vertical split"));
    }

    #[test]
    fn invalid_definition_is_rejected() {
        let def = LayoutDef::split(Orientation::Vertical, 0.0, vec![LayoutDef::leaf()]);
        assert!(LayoutTree::from_def(&def).is_err());
    }
}
