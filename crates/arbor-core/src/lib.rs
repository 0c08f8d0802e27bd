pub mod detail;

use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

// --- Types ---

/// A node in the taxonomy. Authored once, never mutated at runtime; shared
/// read-only by the renderer and the recommender for the process lifetime.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaxonomyNode {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Display hint, opaque to all logic.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub use_cases: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TaxonomyNode>,
}

impl TaxonomyNode {
    /// A category groups children; a leaf is a concrete recommendable item.
    pub fn is_category(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// One leaf of the taxonomy, as visited by [`flatten_leaves`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeafEntry<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub category: Option<&'a str>,
}

/// Collect every leaf in document order (depth-first, children in array
/// order). Category nodes are traversed but not emitted.
pub fn flatten_leaves(root: &TaxonomyNode) -> Vec<LeafEntry<'_>> {
    let mut out = Vec::new();
    collect_leaves(root, &mut out);
    out
}

fn collect_leaves<'a>(node: &'a TaxonomyNode, out: &mut Vec<LeafEntry<'a>>) {
    if node.is_leaf() {
        out.push(LeafEntry {
            name: &node.name,
            description: node.description.as_deref(),
            category: node.category.as_deref(),
        });
    } else {
        for child in &node.children {
            collect_leaves(child, out);
        }
    }
}

// --- Built-in dataset ---

static BUILTIN: OnceLock<TaxonomyNode> = OnceLock::new();

/// The compiled-in taxonomy: the "Choose" decision tree of chemical
/// messengers and the activities that trigger them.
pub fn builtin_taxonomy() -> &'static TaxonomyNode {
    BUILTIN.get_or_init(|| {
        serde_json::from_str(include_str!("taxonomy.json"))
            .expect("built-in taxonomy is valid JSON")
    })
}

// --- AI Settings ---

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AiSettings {
    pub provider: String,
    pub api_key: String,
    pub model: String,
}

impl AiSettings {
    /// Build settings from the environment. Provider and model have Gemini
    /// defaults; the credential comes from `API_KEY` (or `GEMINI_API_KEY`)
    /// and may be absent — callers check [`ai_configured`] before any
    /// network attempt.
    pub fn from_env() -> Self {
        AiSettings {
            provider: std::env::var("ARBOR_PROVIDER").unwrap_or_else(|_| "google".to_string()),
            model: std::env::var("ARBOR_MODEL").unwrap_or_else(|_| "gemini-2.5-flash".to_string()),
            api_key: std::env::var("API_KEY")
                .or_else(|_| std::env::var("GEMINI_API_KEY"))
                .unwrap_or_default(),
        }
    }
}

pub fn ai_configured(settings: &AiSettings) -> bool {
    !settings.provider.is_empty()
        && !settings.model.is_empty()
        && (settings.provider == "ollama" || !settings.api_key.is_empty())
}
