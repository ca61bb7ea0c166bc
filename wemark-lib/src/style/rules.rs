//! CSS rule extraction.
//!
//! Scans a flat stylesheet into `(selector, declarations)` pairs, keeping
//! declaration blocks as raw text so value strings (including `!important`)
//! survive untouched until merge time. Selectors that desktop Markdown
//! editors conventionally aim at the document root (`body`, `#write`) are
//! remapped to the wrapping container's class so exported themes transfer.

use regex::Regex;
use std::sync::LazyLock;

/// Class carried by the synthetic wrapper element.
pub const CONTAINER_CLASS: &str = "wechat-container";
/// Selector form of [`CONTAINER_CLASS`].
pub const CONTAINER_SELECTOR: &str = ".wechat-container";

/// One simple selector (already split out of any comma list) paired with the
/// raw declaration block it carries. Rules apply in source order;
/// last-applied-wins per property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleRule {
    pub selector: String,
    pub declarations: String,
}

static COMMENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)/\*.*?\*/").unwrap());
static BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([^{}]+)\{([^}]+)\}").unwrap());

/// Extract style rules from a CSS string.
///
/// Nested blocks are not supported: an `@media` body is consumed up to its
/// first closing brace and the enclosing "selector" is rejected later at
/// match time, but scanning resumes cleanly for the rules that follow.
/// Malformed blocks are dropped silently.
pub fn parse_css(css: &str) -> Vec<StyleRule> {
    let clean = COMMENT_RE.replace_all(css, "");
    let mut rules = Vec::new();

    for caps in BLOCK_RE.captures_iter(&clean) {
        let selector_part = caps[1].trim().to_string();
        let declarations = caps[2].trim().to_string();
        if selector_part.is_empty() || declarations.is_empty() {
            continue;
        }
        for selector in selector_part.split(',') {
            let selector = remap_root_selector(selector.trim());
            if !selector.is_empty() {
                rules.push(StyleRule {
                    selector,
                    declarations: declarations.clone(),
                });
            }
        }
    }

    rules
}

/// Map `body`/`#write` root selectors onto the container class. Only the
/// leading occurrence is rewritten; the remainder of a descendant selector is
/// kept verbatim.
fn remap_root_selector(selector: &str) -> String {
    if selector == "body" || selector == "#write" {
        CONTAINER_SELECTOR.to_string()
    } else if let Some(rest) = selector.strip_prefix("body ") {
        format!("{} {}", CONTAINER_SELECTOR, rest)
    } else if let Some(rest) = selector.strip_prefix("#write ") {
        format!("{} {}", CONTAINER_SELECTOR, rest)
    } else {
        selector.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn extracts_rules_in_source_order() {
        let rules = parse_css("h1 { color: red; } h1 { font-weight: bold; }");
        assert_eq!(
            rules,
            vec![
                StyleRule {
                    selector: "h1".to_string(),
                    declarations: "color: red;".to_string(),
                },
                StyleRule {
                    selector: "h1".to_string(),
                    declarations: "font-weight: bold;".to_string(),
                },
            ]
        );
    }

    #[test]
    fn splits_comma_lists_and_drops_empty_entries() {
        let rules = parse_css("h1, h2, { margin: 0; }");
        let selectors: Vec<&str> = rules.iter().map(|r| r.selector.as_str()).collect();
        assert_eq!(selectors, vec!["h1", "h2"]);
        assert!(rules.iter().all(|r| r.declarations == "margin: 0;"));
    }

    #[test]
    fn strips_comments_including_multiline() {
        let rules = parse_css("/* a {\n fake: rule; } */ p { color: blue; } /* tail */");
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].selector, "p");
        assert_eq!(rules[0].declarations, "color: blue;");
    }

    #[test]
    fn remaps_root_selectors_to_container() {
        assert_eq!(
            parse_css("body { color: red; }")[0].selector,
            CONTAINER_SELECTOR
        );
        assert_eq!(
            parse_css("#write { max-width: 800px; }")[0].selector,
            CONTAINER_SELECTOR
        );
        assert_eq!(
            parse_css("body h1 { color: red; }")[0].selector,
            ".wechat-container h1"
        );
        assert_eq!(
            parse_css("#write h1 strong { color: red; }")[0].selector,
            ".wechat-container h1 strong"
        );
        // Non-root selectors pass through untouched.
        assert_eq!(parse_css("html { margin: 0; }")[0].selector, "html");
        assert_eq!(parse_css(".body { margin: 0; }")[0].selector, ".body");
    }

    #[test]
    fn skips_blocks_with_empty_selector_or_declarations() {
        assert!(parse_css("{ color: red; }").is_empty());
        assert!(parse_css("h1 {   }").is_empty());
        assert!(parse_css("").is_empty());
        assert!(parse_css("/* only a comment */").is_empty());
    }

    #[test]
    fn tolerates_font_face_blocks_without_corrupting_later_rules() {
        let rules = parse_css(
            "@font-face { font-family: 'X'; src: url(x.woff); } h1 { color: red; }",
        );
        let selectors: Vec<&str> = rules.iter().map(|r| r.selector.as_str()).collect();
        assert!(selectors.contains(&"@font-face"));
        assert!(selectors.contains(&"h1"));
    }

    #[test]
    fn recovers_after_media_query_blocks() {
        let rules =
            parse_css("@media screen { h1 { color: red; } } h2 { color: blue; }");
        let h2 = rules.iter().find(|r| r.selector == "h2").unwrap();
        assert_eq!(h2.declarations, "color: blue;");
    }
}
