//! Markdown rendering and embedded-image handling.
//!
//! Rendering goes through comrak. Hard breaks are enabled so a single
//! newline survives as `<br>` in the published article, and raw HTML passes
//! through since notes routinely embed it. Image references come in two
//! syntaxes: standard `![alt](path)` and wiki-link `![[path]]` (optionally
//! `![[path|size]]`).

use comrak::nodes::NodeValue;
use comrak::{format_html, markdown_to_html, parse_document, Arena, Options};
use regex::{NoExpand, Regex};
use std::collections::HashMap;
use std::sync::LazyLock;

static MD_IMAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[[^\]]*\]\(([^)]*)\)").unwrap());
static WIKI_IMAGE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"!\[\[([^\]]+)\]\]").unwrap());

fn options() -> Options<'static> {
    let mut options = Options::default();
    options.extension.strikethrough = true;
    options.extension.table = true;
    options.extension.autolink = true;
    options.extension.tasklist = true;
    options.render.hardbreaks = true;
    options.render.r#unsafe = true; // Allow raw HTML
    options
}

/// Render Markdown to an HTML fragment.
pub fn render(markdown: &str) -> String {
    markdown_to_html(markdown, &options())
}

/// Extract every embedded image reference, deduplicated, in source order.
pub fn extract_images(markdown: &str) -> Vec<String> {
    let mut images: Vec<String> = Vec::new();
    let mut push_unique = |path: &str| {
        let path = path.trim();
        if !path.is_empty() && !images.iter().any(|p| p == path) {
            images.push(path.to_string());
        }
    };

    for caps in MD_IMAGE_RE.captures_iter(markdown) {
        push_unique(&caps[1]);
    }
    for caps in WIKI_IMAGE_RE.captures_iter(markdown) {
        // `![[image.png|100]]` carries a display size after the pipe.
        if let Some(path) = caps[1].split('|').next() {
            push_unique(path);
        }
    }
    images
}

/// Render Markdown with local image paths swapped for their uploaded URLs.
///
/// Standard images are rewritten on the comrak AST before rendering.
/// Wiki-link images render as literal text (comrak has no Obsidian embed
/// syntax), so those are replaced in the HTML output afterwards.
pub fn render_with_replacements(markdown: &str, url_map: &HashMap<String, String>) -> String {
    let options = options();
    let arena = Arena::new();
    let root = parse_document(&arena, markdown, &options);

    for node in root.descendants() {
        if let NodeValue::Image(link) = &mut node.data.borrow_mut().value {
            if let Some(remote) = url_map.get(&link.url) {
                link.url = remote.clone();
            }
        }
    }

    let mut html = String::new();
    format_html(root, &options, &mut html).expect("writing HTML to a String cannot fail");

    for (local, remote) in url_map {
        let pattern = format!(r"!\[\[{}(\|[^\]]*)?\]\]", regex::escape(local));
        if let Ok(re) = Regex::new(&pattern) {
            let replacement = format!("<img src=\"{}\">", remote);
            html = re.replace_all(&html, NoExpand(&replacement)).into_owned();
        }
    }
    html
}
