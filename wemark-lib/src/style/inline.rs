//! Inline-style merging and rule application.

use crate::dom::dom_tree::{Document, Handle, Node};
use crate::style::css_matcher::{self, ComplexSelector};
use crate::style::rules::StyleRule;
use indexmap::IndexMap;

/// Merge two declaration-block strings at property granularity.
///
/// Both inputs are split on `;`, each pair on its first `:`, with property
/// names lowercased and both sides trimmed. Pairs from `added` overwrite
/// pairs from `current` with the same property name; first-occurrence
/// position is kept, so non-conflicting properties stay in order. Serialized
/// as `"prop: value; prop2: value2;"` with a trailing semicolon iff
/// non-empty. Values are kept verbatim, `!important` markers included.
pub fn merge_style_text(current: &str, added: &str) -> String {
    let mut styles: IndexMap<String, String> = IndexMap::new();

    for source in [current, added] {
        for pair in source.split(';') {
            if let Some((prop, value)) = pair.split_once(':') {
                let prop = prop.trim().to_ascii_lowercase();
                let value = value.trim();
                if !prop.is_empty() && !value.is_empty() {
                    styles.insert(prop, value.to_string());
                }
            }
        }
    }

    if styles.is_empty() {
        return String::new();
    }
    let body = styles
        .iter()
        .map(|(prop, value)| format!("{}: {}", prop, value))
        .collect::<Vec<_>>()
        .join("; ");
    format!("{};", body)
}

/// Apply extracted rules to the document in source order. Selectors outside
/// the supported subset are skipped; the remaining rules still apply.
pub fn apply_rules(document: &Document, rules: &[StyleRule]) {
    for rule in rules {
        let Some(selector) = css_matcher::parse_selector(&rule.selector) else {
            log::debug!("skipping unsupported selector: {}", rule.selector);
            continue;
        };
        // Materialize the match list before touching any element.
        let matched = collect_matches(document, &selector);
        for handle in &matched {
            merge_into_element(handle, &rule.declarations);
        }
    }
}

/// Merge a declaration block into one element's `style` attribute.
pub fn merge_into_element(handle: &Handle, declarations: &str) {
    if let Node::Element(elem) = &mut *handle.borrow_mut() {
        let current = elem.attributes.get("style").cloned().unwrap_or_default();
        let merged = merge_style_text(&current, declarations);
        if !merged.is_empty() {
            elem.attributes.insert("style".to_string(), merged);
        }
    }
}

/// Collect every element the selector matches, in document order.
pub fn collect_matches(document: &Document, selector: &ComplexSelector) -> Vec<Handle> {
    let mut matched = Vec::new();
    let mut path = Vec::new();
    collect_into(&document.root, selector, &mut path, &mut matched);
    matched
}

fn collect_into(
    handle: &Handle,
    selector: &ComplexSelector,
    path: &mut Vec<Handle>,
    matched: &mut Vec<Handle>,
) {
    let (children, is_element) = {
        let node = handle.borrow();
        match &*node {
            Node::DocumentRoot(root) => (root.children.clone(), false),
            Node::Element(elem) => (elem.children.clone(), true),
            Node::Text(_) => return,
        }
    };

    if is_element {
        path.push(handle.clone());
        if css_matcher::matches_path(path, selector) {
            matched.push(handle.clone());
        }
    }
    for child in &children {
        collect_into(child, selector, path, matched);
    }
    if is_element {
        path.pop();
    }
}
