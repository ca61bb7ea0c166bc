//! Structural fixups for the target renderer's quirks.
//!
//! These are hard-coded DOM rewrites, not CSS-driven: the WeChat editor
//! splits list items at inline bold runs, collapses literal newlines inside
//! `<pre><code>`, and materializes whitespace-only list children as empty
//! bullets. Each pass collects its target nodes before mutating any of them.

use crate::dom::dom_tree::{self, Document, ElementNode, Handle, Node};
use crate::style::inline;

/// Text color forced on list-item spans so reconstructed items keep the body
/// color inside the outer `<strong>` wrapper.
const LIST_TEXT_COLOR: &str = "rgb(51, 51, 51)";

const P_DEFAULTS: &str = "margin-top: 0px; margin-bottom: 1em; line-height: 1.8; word-break: break-word; font-variant-numeric: tabular-nums;";
const IMG_DEFAULTS: &str =
    "max-width: 100% !important; height: auto !important; display: block; margin: 20px auto;";
const PRE_DEFAULTS: &str = "white-space: pre-wrap; word-break: break-all;";
const CODE_DEFAULTS: &str = "word-break: break-all;";

/// Rebuild every `<li>` so the editor renders it as a single bullet.
///
/// An item containing bold runs becomes one outer `<strong>` holding a
/// `<span>` per original child, toggling `font-weight` to preserve the
/// visual contrast. Items without bold still get a single normal-weight span
/// so bullet and text styling stay independent.
pub fn fix_list_items(document: &Document) {
    for li in collect_by_tag(document, &["li"]) {
        let children = match &*li.borrow() {
            Node::Element(elem) => elem.children.clone(),
            _ => continue,
        };

        let has_bold = children.iter().any(contains_bold);
        let new_children = if has_bold {
            let wrapper = dom_tree::new_element("strong");
            if let Node::Element(wrapper_el) = &mut *wrapper.borrow_mut() {
                for child in children {
                    wrapper_el.children.push(rebuild_as_span(&child));
                }
            }
            vec![wrapper]
        } else {
            let span = dom_tree::new_element("span");
            if let Node::Element(span_el) = &mut *span.borrow_mut() {
                span_el.children = children;
                span_el.attributes.insert(
                    "style".to_string(),
                    format!("font-weight: normal; color: {};", LIST_TEXT_COLOR),
                );
            }
            vec![span]
        };

        if let Node::Element(li_el) = &mut *li.borrow_mut() {
            li_el.children = new_children;
        }
    }
}

fn rebuild_as_span(child: &Handle) -> Handle {
    let span = dom_tree::new_element("span");
    let bold_children = match &*child.borrow() {
        Node::Element(elem) if is_bold_tag(&elem.tag) => Some(elem.children.clone()),
        _ => None,
    };
    if let Node::Element(span_el) = &mut *span.borrow_mut() {
        match bold_children {
            Some(inner) => {
                // Unwrap the bold element; the span carries the weight.
                span_el.children = inner;
                span_el.attributes.insert(
                    "style".to_string(),
                    format!("font-weight: bold; color: {};", LIST_TEXT_COLOR),
                );
            }
            None => {
                span_el.children = vec![child.clone()];
                span_el.attributes.insert(
                    "style".to_string(),
                    format!("font-weight: normal; color: {};", LIST_TEXT_COLOR),
                );
            }
        }
    }
    span
}

fn is_bold_tag(tag: &str) -> bool {
    tag == "strong" || tag == "b"
}

fn contains_bold(handle: &Handle) -> bool {
    match &*handle.borrow() {
        Node::Element(elem) => {
            is_bold_tag(&elem.tag) || elem.children.iter().any(contains_bold)
        }
        _ => false,
    }
}

/// Replace literal newlines inside `<pre><code>` text with `<br>` elements,
/// keeping the surrounding text exactly as written.
pub fn fix_code_blocks(document: &Document) {
    for pre in collect_by_tag(document, &["pre"]) {
        let mut codes = Vec::new();
        let children = match &*pre.borrow() {
            Node::Element(elem) => elem.children.clone(),
            _ => continue,
        };
        for child in &children {
            dom_tree::collect_elements(child, &|elem| elem.tag == "code", &mut codes);
        }
        for code in codes {
            rewrite_newlines(&code);
        }
    }
}

fn rewrite_newlines(handle: &Handle) {
    let children = match &*handle.borrow() {
        Node::Element(elem) => elem.children.clone(),
        _ => return,
    };

    let mut rebuilt: Vec<Handle> = Vec::new();
    for child in children {
        let split = match &*child.borrow() {
            Node::Text(text) if text.contains('\n') => {
                let mut parts = Vec::new();
                for (i, line) in text.split('\n').enumerate() {
                    if i > 0 {
                        parts.push(dom_tree::new_element("br"));
                    }
                    if !line.is_empty() {
                        parts.push(dom_tree::new_text(line));
                    }
                }
                Some(parts)
            }
            _ => None,
        };
        match split {
            Some(parts) => rebuilt.extend(parts),
            None => {
                rewrite_newlines(&child);
                rebuilt.push(child);
            }
        }
    }

    if let Node::Element(elem) = &mut *handle.borrow_mut() {
        elem.children = rebuilt;
    }
}

/// Merge the forced platform defaults into `p`, `img`, `pre` and `code`
/// elements. Runs after author CSS, so on a property-name collision the
/// platform default wins.
pub fn apply_platform_defaults(document: &Document) {
    for (tag, defaults) in [
        ("p", P_DEFAULTS),
        ("img", IMG_DEFAULTS),
        ("pre", PRE_DEFAULTS),
        ("code", CODE_DEFAULTS),
    ] {
        for handle in collect_by_tag(document, &[tag]) {
            inline::merge_into_element(&handle, defaults);
        }
    }
}

/// Drop whitespace-only direct text children of `<ul>`/`<ol>`. The Markdown
/// renderer emits indentation between items and the editor turns it into
/// empty bullets.
pub fn clean_list_whitespace(document: &Document) {
    for list in collect_by_tag(document, &["ul", "ol"]) {
        if let Node::Element(elem) = &mut *list.borrow_mut() {
            elem.children.retain(|child| match &*child.borrow() {
                Node::Text(text) => !text.trim().is_empty(),
                _ => true,
            });
        }
    }
}

fn collect_by_tag(document: &Document, tags: &[&str]) -> Vec<Handle> {
    let mut out = Vec::new();
    dom_tree::collect_elements(
        &document.root,
        &|elem: &ElementNode| tags.contains(&elem.tag.as_str()),
        &mut out,
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::dom_tree::outer_html;
    use crate::parser::html::create_dom_tree;
    use pretty_assertions::assert_eq;

    fn first_by_tag(document: &Document, tag: &str) -> Handle {
        collect_by_tag(document, &[tag]).into_iter().next().unwrap()
    }

    #[test]
    fn bold_list_item_becomes_weight_toggling_spans() {
        let document = create_dom_tree("<ul><li><strong>Bold</strong> rest</li></ul>");
        fix_list_items(&document);
        let li = first_by_tag(&document, "li");
        assert_eq!(
            outer_html(&li),
            "<li><strong>\
             <span style=\"font-weight: bold; color: rgb(51, 51, 51);\">Bold</span>\
             <span style=\"font-weight: normal; color: rgb(51, 51, 51);\"> rest</span>\
             </strong></li>"
        );
    }

    #[test]
    fn plain_list_item_gets_a_single_normal_span() {
        let document = create_dom_tree("<ul><li>plain</li></ul>");
        fix_list_items(&document);
        let li = first_by_tag(&document, "li");
        assert_eq!(
            outer_html(&li),
            "<li><span style=\"font-weight: normal; color: rgb(51, 51, 51);\">plain</span></li>"
        );
    }

    #[test]
    fn nested_bold_still_triggers_the_wrapper() {
        let document = create_dom_tree("<ul><li><em><b>deep</b></em> tail</li></ul>");
        fix_list_items(&document);
        let li = first_by_tag(&document, "li");
        let html = outer_html(&li);
        assert!(html.starts_with("<li><strong>"));
        // The <em> is not itself bold, so it stays wrapped as-is.
        assert!(html.contains("font-weight: normal"));
    }

    #[test]
    fn code_newlines_become_br_elements() {
        let document = create_dom_tree("<pre><code>line1\nline2\nline3</code></pre>");
        fix_code_blocks(&document);
        let code = first_by_tag(&document, "code");
        assert_eq!(
            outer_html(&code),
            "<code>line1<br>line2<br>line3</code>"
        );
    }

    #[test]
    fn code_outside_pre_is_left_alone() {
        let document = create_dom_tree("<p><code>a\nb</code></p>");
        fix_code_blocks(&document);
        let code = first_by_tag(&document, "code");
        assert_eq!(outer_html(&code), "<code>a\nb</code>");
    }

    #[test]
    fn whitespace_only_list_children_are_removed() {
        let document = create_dom_tree("<ul>\n  <li>a</li>\n  <li>b</li>\n</ul>");
        clean_list_whitespace(&document);
        let ul = first_by_tag(&document, "ul");
        assert_eq!(outer_html(&ul), "<ul><li>a</li><li>b</li></ul>");
    }

    #[test]
    fn platform_defaults_override_author_values() {
        let document = create_dom_tree("<p style=\"margin-bottom: 4em;\">x</p>");
        apply_platform_defaults(&document);
        let p = first_by_tag(&document, "p");
        let html = outer_html(&p);
        assert!(html.contains("margin-bottom: 1em"));
        assert!(!html.contains("4em"));
    }
}
