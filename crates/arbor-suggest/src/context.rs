//! Grounding context for the recommender prompt.

use arbor_core::{flatten_leaves, TaxonomyNode};

/// Newline-joined manifest of every leaf, in document order:
/// `"<name>: <description> (Category: <category>)"`, absent fields rendered
/// empty. Ordering and formatting are part of the contract — the same
/// taxonomy always yields byte-identical text.
pub fn leaf_manifest(root: &TaxonomyNode) -> String {
    flatten_leaves(root)
        .iter()
        .map(|leaf| {
            format!(
                "{}: {} (Category: {})",
                leaf.name,
                leaf.description.unwrap_or(""),
                leaf.category.unwrap_or("")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// The fixed instruction preamble with the manifest embedded. Built once per
/// assistant; the service itself is memoryless per call.
pub fn system_prompt(root: &TaxonomyNode) -> String {
    format!(
        "You are an intelligent assistant. \n\
Your goal is to help users select the right option from the provided list based on their needs.\n\
You have access to the following list:\n\n\
{}\n\n\
When a user describes their situation or feeling:\n\
1. Analyze their input.\n\
2. Recommend the best 1-3 options from the list.\n\
3. Briefly explain WHY each option is a good fit.\n\
4. Keep answers concise and helpful.",
        leaf_manifest(root)
    )
}
