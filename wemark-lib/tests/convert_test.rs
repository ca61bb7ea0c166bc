use pretty_assertions::assert_eq;
use wemark_lib::convert;

#[test]
fn applies_class_selector_styles_inline() {
    let result = convert("<div class=\"test\">Content</div>", ".test { margin: 10px; }");
    assert!(
        result.contains("<div class=\"test\" style=\"margin: 10px;\">Content</div>"),
        "got: {}",
        result
    );
}

#[test]
fn remaps_write_root_selector_onto_the_container() {
    let result = convert("<p>Hi</p>", "#write { max-width: 800px; }");
    assert!(
        result.starts_with("<div class=\"wechat-container\" style=\"max-width: 800px;\">"),
        "got: {}",
        result
    );
    // The inner paragraph must not pick up the root rule.
    let p_style = result
        .split("<p style=\"")
        .nth(1)
        .and_then(|rest| rest.split('"').next())
        .unwrap();
    assert!(!p_style.contains("max-width"));
}

#[test]
fn body_and_container_selectors_style_identically() {
    let html = "<p>Hello</p>";
    let via_body = convert(html, "body { color: red; }");
    let via_container = convert(html, ".wechat-container { color: red; }");
    assert_eq!(via_body, via_container);
}

#[test]
fn rules_for_the_same_element_merge_in_order() {
    let result = convert(
        "<h1>Hello</h1>",
        "h1 { color: red; } h1 { font-weight: bold; }",
    );
    assert!(
        result.contains("<h1 style=\"color: red; font-weight: bold;\">Hello</h1>"),
        "got: {}",
        result
    );
}

#[test]
fn later_rule_overwrites_property_without_duplicates() {
    let result = convert("<p>x</p>", "p { color: red; } p { color: blue; }");
    assert!(result.contains("color: blue"));
    assert!(!result.contains("color: red"));
    assert_eq!(result.matches("color:").count(), 1);
}

#[test]
fn descendant_root_selector_reaches_nested_elements() {
    let result = convert(
        "<h1><strong>T</strong></h1>",
        "#write h1 strong { color: navy; }",
    );
    assert!(result.contains("<strong style=\"color: navy;\">T</strong>"));
}

#[test]
fn bold_list_items_are_rebuilt_into_weight_toggling_spans() {
    let result = convert("<ul><li><strong>Bold</strong> rest</li></ul>", "");
    assert!(
        result.contains(
            "<li><strong>\
             <span style=\"font-weight: bold; color: rgb(51, 51, 51);\">Bold</span>\
             <span style=\"font-weight: normal; color: rgb(51, 51, 51);\"> rest</span>\
             </strong></li>"
        ),
        "got: {}",
        result
    );
}

#[test]
fn code_block_newlines_become_br_elements() {
    let result = convert("<pre><code>line1\nline2</code></pre>", "");
    assert!(result.contains("line1<br>line2"), "got: {}", result);
}

#[test]
fn whitespace_between_list_items_is_removed() {
    let result = convert("<ul>\n<li>first</li>\n   \n<li>second</li>\n</ul>", "");
    assert!(result.contains("</li><li"), "got: {}", result);
    let first = result.find("first").unwrap();
    let second = result.find("second").unwrap();
    assert!(first < second);
}

#[test]
fn invalid_selector_does_not_lose_later_rules() {
    let result = convert(
        "<h2>ok</h2>",
        "h1::: { color: red; } h2 { color: blue; }",
    );
    assert!(result.contains("<h2 style=\"color: blue;\">ok</h2>"));
}

#[test]
fn at_rules_do_not_derail_styling() {
    let result = convert(
        "<h1>T</h1>",
        "@font-face { font-family: 'X'; src: url(x.woff); } h1 { color: red; }",
    );
    assert!(result.contains("color: red"));
}

#[test]
fn empty_css_wraps_content_unstyled() {
    let result = convert("<p>Hello</p>", "");
    assert!(result.starts_with("<div class=\"wechat-container\">"));
    assert!(result.ends_with("</div>"));
    assert!(result.contains("Hello"));
}

#[test]
fn paragraphs_get_platform_default_spacing() {
    let result = convert("<p>a</p>", "");
    assert!(result.contains("margin-top: 0px"));
    assert!(result.contains("margin-bottom: 1em"));
    assert!(result.contains("line-height: 1.8"));
    assert!(result.contains("word-break: break-word"));
    assert!(result.contains("font-variant-numeric: tabular-nums"));
}

#[test]
fn platform_paragraph_margin_wins_over_author_css() {
    let result = convert("<p>a</p>", "p { margin-bottom: 4em; }");
    assert!(result.contains("margin-bottom: 1em"));
    assert!(!result.contains("4em"));
}

#[test]
fn images_are_forced_responsive_and_centered() {
    let result = convert("<img src=\"a.png\">", "");
    assert!(result.contains("max-width: 100% !important"));
    assert!(result.contains("height: auto !important"));
    assert!(result.contains("display: block"));
    assert!(result.contains("margin: 20px auto"));
}

#[test]
fn code_blocks_are_forced_to_wrap() {
    let result = convert("<pre><code>const a = 1;</code></pre>", "");
    assert!(result.contains("white-space: pre-wrap"));
    assert!(result.contains("word-break: break-all"));
}

#[test]
fn author_css_merges_with_existing_inline_styles() {
    let result = convert(
        "<div class=\"x\" style=\"padding: 4px\">c</div>",
        ".x { color: green; }",
    );
    assert!(
        result.contains("style=\"padding: 4px; color: green;\""),
        "got: {}",
        result
    );
}

#[test]
fn conversion_is_deterministic_across_calls() {
    let html = "<ul><li><b>a</b> b</li></ul><pre><code>x\ny</code></pre>";
    let css = "#write { color: #333; } li { font-size: 15px; }";
    assert_eq!(convert(html, css), convert(html, css));
}
