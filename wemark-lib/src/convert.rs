//! The conversion pipeline: bake CSS into inline styles on an HTML fragment.
//!
//! The WeChat editor strips `<style>` blocks and ignores most selectors, so
//! the only styling that survives is `style="..."` attributes. `convert`
//! wraps the fragment in a container element (giving root selectors a real
//! target), applies the structural fixups, resolves every extracted rule
//! against the DOM, merges the platform defaults, and serializes the
//! container back out. Each call builds its own DOM; nothing is cached.

use crate::dom::dom_tree::{self, Document, Handle};
use crate::parser::html;
use crate::style::{fixups, inline, rules};

/// Convert an HTML fragment plus author/theme CSS into inline-styled HTML.
///
/// Infallible by design: malformed CSS blocks and unsupported selectors are
/// dropped rule-by-rule, and html5ever error-recovers on odd markup. Returns
/// the outer HTML of the wrapping container.
pub fn convert(html_fragment: &str, css: &str) -> String {
    let wrapped = format!(
        "<div class=\"{}\">{}</div>",
        rules::CONTAINER_CLASS,
        html_fragment
    );
    let document = html::create_dom_tree(&wrapped);

    fixups::fix_list_items(&document);
    fixups::fix_code_blocks(&document);

    let sheet = rules::parse_css(css);
    inline::apply_rules(&document, &sheet);

    fixups::apply_platform_defaults(&document);
    fixups::clean_list_whitespace(&document);

    match find_container(&document) {
        Some(container) => dom_tree::outer_html(&container),
        None => body_inner_html(&document),
    }
}

fn find_container(document: &Document) -> Option<Handle> {
    dom_tree::find_element(&document.root, &|elem| {
        elem.has_class(rules::CONTAINER_CLASS)
    })
}

/// Fallback for the (unexpected) case where the parser reshuffled the
/// wrapper away: serialize whatever ended up in the body.
fn body_inner_html(document: &Document) -> String {
    dom_tree::find_element(&document.root, &|elem| elem.tag == "body")
        .map(|body| dom_tree::inner_html(&body))
        .unwrap_or_default()
}
