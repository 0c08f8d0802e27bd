//! Read-only projection of a taxonomy node into display form.

use serde::Serialize;

use crate::TaxonomyNode;

/// Everything the detail panel shows for one node. Pure view data — no
/// back-references into the tree, safe to serialize across the frontend
/// boundary.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NodeDetail {
    pub name: String,
    /// "Category" for grouping nodes, otherwise the node's own category
    /// label, falling back to "Service".
    pub kind_label: String,
    pub description: String,
    pub is_category: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub use_cases: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub child_names: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

pub fn detail_for(node: &TaxonomyNode) -> NodeDetail {
    let is_category = node.is_category();
    let kind_label = if is_category {
        "Category".to_string()
    } else {
        node.category
            .clone()
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| "Service".to_string())
    };
    NodeDetail {
        name: node.name.clone(),
        kind_label,
        description: node
            .description
            .clone()
            .unwrap_or_else(|| "No description available.".to_string()),
        is_category,
        // Use cases only make sense on leaves; the child list only on categories.
        use_cases: if is_category { vec![] } else { node.use_cases.clone() },
        child_names: node.children.iter().map(|c| c.name.clone()).collect(),
        url: node.url.clone(),
    }
}
