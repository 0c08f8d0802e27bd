//! Serializable projection of the current view for the frontend.

use serde::Serialize;

use crate::tween::TRANSITION_MS;
use crate::viewport::Viewport;
use crate::{NodeId, TreeView, Visibility};

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SceneNode {
    pub id: NodeId,
    pub name: String,
    pub depth: usize,
    pub x: f64,
    pub y: f64,
    pub x0: f64,
    pub y0: f64,
    pub is_leaf: bool,
    /// Collapsed with children: drawn highlighted as "more inside".
    pub has_hidden_children: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SceneLink {
    pub source: NodeId,
    pub target: NodeId,
    pub path: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SceneExit {
    pub id: NodeId,
    pub x0: f64,
    pub y0: f64,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    pub nodes: Vec<SceneNode>,
    pub links: Vec<SceneLink>,
    pub exits: Vec<SceneExit>,
    pub transform: Viewport,
    pub duration_ms: u64,
}

/// Smooth cubic curve between a parent and child position, with control
/// points at the vertical midpoint.
pub fn link_path(sx: f64, sy: f64, tx: f64, ty: f64) -> String {
    let my = (sy + ty) / 2.0;
    format!("M {sx} {sy} C {sx} {my}, {tx} {my}, {tx} {ty}")
}

impl<'a> TreeView<'a> {
    pub fn scene(&self) -> Scene {
        let visible = self.visible_ids();
        let mut nodes = Vec::with_capacity(visible.len());
        let mut links = Vec::new();

        for &id in &visible {
            let n = self.node(id).expect("visible id is in the arena");
            nodes.push(SceneNode {
                id,
                name: n.data.name.clone(),
                depth: n.depth,
                x: n.x,
                y: n.y,
                x0: n.x0,
                y0: n.y0,
                is_leaf: n.children.is_empty(),
                has_hidden_children: !n.children.is_empty()
                    && n.visibility == Visibility::Collapsed,
                color: n.data.color.clone(),
            });
            if n.visibility == Visibility::Expanded {
                for &child in &n.children {
                    let c = self.node(child).expect("child id is in the arena");
                    links.push(SceneLink {
                        source: id,
                        target: child,
                        path: link_path(n.x, n.y, c.x, c.y),
                    });
                }
            }
        }

        Scene {
            nodes,
            links,
            exits: self
                .exits()
                .iter()
                .map(|e| SceneExit {
                    id: e.id,
                    x0: e.x0,
                    y0: e.y0,
                    x: e.x,
                    y: e.y,
                })
                .collect(),
            transform: self.viewport,
            duration_ms: TRANSITION_MS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbor_core::TaxonomyNode;

    fn leaf(name: &str) -> TaxonomyNode {
        TaxonomyNode {
            name: name.to_string(),
            description: None,
            category: None,
            color: None,
            use_cases: vec![],
            url: None,
            children: vec![],
        }
    }

    fn branch(name: &str, children: Vec<TaxonomyNode>) -> TaxonomyNode {
        TaxonomyNode {
            children,
            ..leaf(name)
        }
    }

    #[test]
    fn scene_links_connect_only_visible_parent_child_pairs() {
        let tree = branch("r", vec![branch("a", vec![leaf("a1")]), leaf("b")]);
        let view = TreeView::new(&tree, 800.0, 600.0);
        let scene = view.scene();
        assert_eq!(scene.nodes.len(), 3);
        assert_eq!(scene.links.len(), 2);
        for link in &scene.links {
            assert_eq!(link.source, 0);
            assert!(link.path.starts_with("M "));
        }
    }

    #[test]
    fn collapsed_branch_is_marked_as_hiding_children() {
        let tree = branch("r", vec![branch("a", vec![leaf("a1")]), leaf("b")]);
        let view = TreeView::new(&tree, 800.0, 600.0);
        let scene = view.scene();
        let a = scene.nodes.iter().find(|n| n.name == "a").unwrap();
        assert!(a.has_hidden_children);
        assert!(!a.is_leaf);
        let b = scene.nodes.iter().find(|n| n.name == "b").unwrap();
        assert!(b.is_leaf);
        assert!(!b.has_hidden_children);
    }

    #[test]
    fn link_path_midpoint_is_between_levels() {
        let path = link_path(10.0, 0.0, 50.0, 120.0);
        assert_eq!(path, "M 10 0 C 10 60, 50 60, 50 120");
    }

    #[test]
    fn scene_serializes_camel_case() {
        let tree = branch("r", vec![leaf("a")]);
        let view = TreeView::new(&tree, 800.0, 600.0);
        let json = serde_json::to_value(view.scene()).unwrap();
        assert!(json["nodes"][0]["isLeaf"].is_boolean());
        assert!(json["durationMs"].is_u64());
        assert!(json["transform"]["scale"].is_f64());
    }
}
