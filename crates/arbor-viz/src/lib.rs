//! Interactive tree view over a static taxonomy.
//!
//! [`TreeView`] decorates a [`TaxonomyNode`] tree with an arena of layout
//! nodes carrying explicit [`Visibility`] tags, screen positions, and the
//! previous positions needed for position-preserving transitions. Clicks
//! drive the expand/collapse state machine (with accordion sibling
//! collapsing); every transition recomputes a tidy layout over exactly the
//! currently visible subset.
//!
//! # Invariants
//!
//! 1. The root is always visible; a node is visible iff every ancestor is
//!    `Expanded`.
//! 2. Among the children of any node, at most one is `Expanded` at a time.
//! 3. Collapsing hides a whole subtree but preserves its internal tags, so
//!    re-expanding restores the exact prior visible membership.
//! 4. Clicks on nodes outside the visible set are ignored, never a panic.

pub mod layout;
pub mod scene;
pub mod tween;
pub mod viewport;

use std::collections::HashSet;

use arbor_core::TaxonomyNode;

use crate::viewport::Viewport;

/// Stable identity of a layout node: its preorder index in the full
/// taxonomy. Never changes across expand/collapse, so transitions can match
/// old instances to new ones.
pub type NodeId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Children are part of the visible layout.
    Expanded,
    /// Children are suppressed but retained for restoration.
    Collapsed,
}

/// Runtime decoration of one taxonomy node. `(x, y)` is the current layout
/// position (the animation end point); `(x0, y0)` is where the node should
/// animate in from.
#[derive(Debug, Clone)]
pub struct LayoutNode<'a> {
    pub id: NodeId,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub depth: usize,
    pub data: &'a TaxonomyNode,
    pub visibility: Visibility,
    pub x: f64,
    pub y: f64,
    pub x0: f64,
    pub y0: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Expanded,
    Collapsed,
    /// Leaf click: selection only, no visibility change.
    None,
}

/// What a click did. Returned as `None` when the click hit a node that is
/// not currently visible (stale event).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClickOutcome {
    pub selected: NodeId,
    pub toggle: Toggle,
}

/// A node that just left the visible set: animates from `(x0, y0)` toward
/// `(x, y)` (its parent's new position) and is then discarded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExitingNode {
    pub id: NodeId,
    pub x0: f64,
    pub y0: f64,
    pub x: f64,
    pub y: f64,
}

const DEFAULT_WIDTH: f64 = 800.0;
const DEFAULT_HEIGHT: f64 = 600.0;

pub struct TreeView<'a> {
    nodes: Vec<LayoutNode<'a>>,
    width: f64,
    height: f64,
    pub viewport: Viewport,
    exits: Vec<ExitingNode>,
}

impl<'a> TreeView<'a> {
    /// Build the arena over `root` and lay out the initial view: root
    /// expanded, everything deeper collapsed, so only the root and its
    /// immediate children are visible.
    pub fn new(root: &'a TaxonomyNode, width: f64, height: f64) -> Self {
        let mut nodes = Vec::new();
        build_arena(root, None, 0, &mut nodes);

        let mut view = TreeView {
            nodes,
            width: if width > 0.0 { width } else { DEFAULT_WIDTH },
            height: if height > 0.0 { height } else { DEFAULT_HEIGHT },
            viewport: Viewport::default(),
            exits: Vec::new(),
        };
        // Seed the root at top center so the first layout animates children
        // out from there.
        let cx = view.inner_width() / 2.0;
        view.nodes[0].x = cx;
        view.nodes[0].y = 0.0;
        view.nodes[0].x0 = cx;
        view.nodes[0].y0 = 0.0;
        view.relayout(0, &[]);
        view
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> Option<&LayoutNode<'a>> {
        self.nodes.get(id)
    }

    /// The taxonomy node behind an arena id.
    pub fn data(&self, id: NodeId) -> Option<&'a TaxonomyNode> {
        self.nodes.get(id).map(|n| n.data)
    }

    /// Nodes that just animated out of view (refreshed on every relayout).
    pub fn exits(&self) -> &[ExitingNode] {
        &self.exits
    }

    /// A node is visible iff every ancestor is expanded.
    pub fn is_visible(&self, id: NodeId) -> bool {
        if id >= self.nodes.len() {
            return false;
        }
        let mut current = id;
        while let Some(parent) = self.nodes[current].parent {
            if self.nodes[parent].visibility != Visibility::Expanded {
                return false;
            }
            current = parent;
        }
        true
    }

    /// Visible node ids in document order.
    pub fn visible_ids(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_visible(0, &mut out);
        out
    }

    fn collect_visible(&self, id: NodeId, out: &mut Vec<NodeId>) {
        out.push(id);
        if self.nodes[id].visibility == Visibility::Expanded {
            for &child in &self.nodes[id].children {
                self.collect_visible(child, out);
            }
        }
    }

    /// Apply a click. Expands a collapsed branch (collapsing any expanded
    /// sibling first), collapses an expanded one, or just selects a leaf.
    /// Clicks on hidden or out-of-range ids are ignored.
    pub fn click(&mut self, id: NodeId) -> Option<ClickOutcome> {
        if !self.is_visible(id) {
            return None;
        }

        let prev_visible = self.visible_ids();
        let toggle = if self.nodes[id].children.is_empty() {
            Toggle::None
        } else if self.nodes[id].visibility == Visibility::Expanded {
            self.nodes[id].visibility = Visibility::Collapsed;
            Toggle::Collapsed
        } else {
            // Accordion rule: at most one expanded branch per parent.
            if let Some(parent) = self.nodes[id].parent {
                let siblings = self.nodes[parent].children.clone();
                for sibling in siblings {
                    if sibling != id && self.nodes[sibling].visibility == Visibility::Expanded {
                        self.nodes[sibling].visibility = Visibility::Collapsed;
                    }
                }
            }
            self.nodes[id].visibility = Visibility::Expanded;
            Toggle::Expanded
        };

        if toggle != Toggle::None {
            self.relayout(id, &prev_visible);
        }
        Some(ClickOutcome { selected: id, toggle })
    }

    /// Accept a new viewport size. Non-positive dimensions skip the
    /// recompute entirely; visibility state is never affected.
    pub fn resize(&mut self, width: f64, height: f64) {
        if width <= 0.0 || height <= 0.0 {
            return;
        }
        self.width = width;
        self.height = height;
        let visible = self.visible_ids();
        self.relayout(0, &visible);
    }

    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn inner_width(&self) -> f64 {
        (self.width - layout::MARGIN.horizontal()).max(1.0)
    }

    /// Recompute positions over the visible set. `source` is the node whose
    /// previous position newly appearing nodes animate in from; nodes that
    /// dropped out of `prev_visible` are recorded as exits heading toward
    /// their parent's new position.
    fn relayout(&mut self, source: NodeId, prev_visible: &[NodeId]) {
        let (sx, sy) = (self.nodes[source].x, self.nodes[source].y);
        let visible = self.visible_ids();
        let prev_set: HashSet<NodeId> = prev_visible.iter().copied().collect();

        for &id in &visible {
            let node = &mut self.nodes[id];
            if prev_set.contains(&id) {
                node.x0 = node.x;
                node.y0 = node.y;
            } else {
                node.x0 = sx;
                node.y0 = sy;
            }
        }

        let inner_width = self.inner_width();
        layout::tidy_layout(&mut self.nodes, &visible, inner_width);

        let visible_set: HashSet<NodeId> = visible.iter().copied().collect();
        self.exits = prev_visible
            .iter()
            .filter(|id| !visible_set.contains(id))
            .map(|&id| {
                let from = (self.nodes[id].x, self.nodes[id].y);
                let to = match self.nodes[id].parent {
                    Some(p) => (self.nodes[p].x, self.nodes[p].y),
                    None => (sx, sy),
                };
                ExitingNode {
                    id,
                    x0: from.0,
                    y0: from.1,
                    x: to.0,
                    y: to.1,
                }
            })
            .collect();
    }
}

fn build_arena<'a>(
    data: &'a TaxonomyNode,
    parent: Option<NodeId>,
    depth: usize,
    nodes: &mut Vec<LayoutNode<'a>>,
) -> NodeId {
    let id = nodes.len();
    nodes.push(LayoutNode {
        id,
        parent,
        children: Vec::new(),
        depth,
        data,
        // Depth > 0 starts collapsed: the initial view is one level deep.
        visibility: if depth == 0 {
            Visibility::Expanded
        } else {
            Visibility::Collapsed
        },
        x: 0.0,
        y: 0.0,
        x0: 0.0,
        y0: 0.0,
    });
    let child_ids: Vec<NodeId> = data
        .children
        .iter()
        .map(|child| build_arena(child, Some(id), depth + 1, nodes))
        .collect();
    nodes[id].children = child_ids;
    id
}
