//! Tidy layout over the visible subset of the tree.
//!
//! Vertical position is a strict function of depth; horizontal positions
//! come from a leaf-slot pass: visible leaves take contiguous slots across
//! the inner width in document order, and every visible internal node is
//! centered over its first and last child. Sibling subtrees occupy disjoint
//! slot intervals, so nodes at the same depth never cross.

use std::collections::HashSet;

use crate::{LayoutNode, NodeId, Visibility};

/// Vertical spacing per tree level, in layout units.
pub const LEVEL_SPACING: f64 = 120.0;

/// Space reserved around the diagram inside the viewport.
#[derive(Debug, Clone, Copy)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Margin {
    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }
}

pub const MARGIN: Margin = Margin {
    top: 60.0,
    right: 40.0,
    bottom: 40.0,
    left: 40.0,
};

/// Assign `(x, y)` to every node in `visible` (document order). Positions of
/// hidden nodes are left untouched.
pub fn tidy_layout(nodes: &mut [LayoutNode<'_>], visible: &[NodeId], inner_width: f64) {
    let visible_set: HashSet<NodeId> = visible.iter().copied().collect();

    // A visible node renders as a leaf when it shows no children.
    let is_slot_leaf = |node: &LayoutNode<'_>| {
        node.visibility == Visibility::Collapsed || node.children.is_empty()
    };

    let leaf_count = visible
        .iter()
        .filter(|&&id| is_slot_leaf(&nodes[id]))
        .count()
        .max(1);
    let step = inner_width / leaf_count as f64;

    let mut slot = 0usize;
    for &id in visible {
        nodes[id].y = nodes[id].depth as f64 * LEVEL_SPACING;
        if is_slot_leaf(&nodes[id]) {
            nodes[id].x = (slot as f64 + 0.5) * step;
            slot += 1;
        }
    }

    // Children precede parents in reverse document order, so one backward
    // pass centers every internal node over its already-placed children.
    for &id in visible.iter().rev() {
        if is_slot_leaf(&nodes[id]) {
            continue;
        }
        let kids: Vec<NodeId> = nodes[id]
            .children
            .iter()
            .copied()
            .filter(|c| visible_set.contains(c))
            .collect();
        if let (Some(&first), Some(&last)) = (kids.first(), kids.last()) {
            nodes[id].x = (nodes[first].x + nodes[last].x) / 2.0;
        }
    }
}
