//! Selector parsing and element matching.
//!
//! Supports compound selectors (tag, `#id`, `.class`, attribute conditions)
//! combined with descendant (space) and child (`>`) combinators. Anything
//! else — pseudo-classes/elements, sibling combinators, at-rule "selectors" —
//! fails to parse, and the caller skips the rule: styling is best-effort and
//! an unsupported selector must never abort a conversion.

use crate::dom::dom_tree::{ElementNode, Handle, Node};
use std::collections::HashSet;
use std::iter::Peekable;
use std::str::Chars;

/// Supported attribute selector operators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeOperator {
    /// `[attr="value"]`
    Exact,
    /// `[attr~="value"]`
    Includes,
    /// `[attr^="value"]`
    Prefix,
    /// `[attr$="value"]`
    Suffix,
    /// `[attr*="value"]`
    Substring,
}

/// One attribute condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeSelector {
    pub name: String,
    /// `None` means bare existence check.
    pub operator: Option<AttributeOperator>,
    pub value: Option<String>,
}

/// A compound selector: optional tag, optional id, classes, and attribute
/// conditions. An empty compound (from `*`) matches every element.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompoundSelector {
    pub tag: Option<String>,
    pub id: Option<String>,
    pub classes: HashSet<String>,
    pub attributes: Vec<AttributeSelector>,
}

impl CompoundSelector {
    fn has_constraints(&self) -> bool {
        self.tag.is_some()
            || self.id.is_some()
            || !self.classes.is_empty()
            || !self.attributes.is_empty()
    }
}

/// Supported combinators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Combinator {
    /// Descendant combinator (a space).
    Descendant,
    /// Child combinator (`>`).
    Child,
}

/// A complex selector: the rightmost (key) compound plus its ancestor parts,
/// stored in right-to-left order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplexSelector {
    pub key: CompoundSelector,
    pub ancestors: Vec<(Combinator, CompoundSelector)>,
}

/// Parse a full selector string. Returns `None` for anything outside the
/// supported subset.
pub fn parse_selector(selector: &str) -> Option<ComplexSelector> {
    // Tolerate unspaced child combinators ("div>p").
    let normalized = selector.replace('>', " > ");
    let tokens: Vec<&str> = normalized.split_whitespace().collect();
    if tokens.is_empty() {
        return None;
    }

    let mut iter = tokens.into_iter();
    let mut key = parse_compound_selector(iter.next()?)?;
    let mut ancestors = Vec::new();

    while let Some(token) = iter.next() {
        let (combinator, compound_token) = match token {
            ">" => (Combinator::Child, iter.next()?),
            "+" | "~" => return None,
            _ => (Combinator::Descendant, token),
        };
        ancestors.push((combinator, key));
        key = parse_compound_selector(compound_token)?;
    }
    ancestors.reverse();

    Some(ComplexSelector { key, ancestors })
}

fn is_name_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '-' || ch == '_'
}

/// Parse one compound selector token, e.g. `pre.highlight#main[data-lang="rs"]`.
pub fn parse_compound_selector(selector: &str) -> Option<CompoundSelector> {
    if selector == "*" {
        return Some(CompoundSelector::default());
    }

    let mut compound = CompoundSelector::default();
    let mut chars = selector.chars().peekable();

    // Leading run of name characters is the tag.
    if let Some(&ch) = chars.peek() {
        if ch.is_ascii_alphabetic() {
            let mut buffer = String::new();
            while let Some(&ch) = chars.peek() {
                if ch == '#' || ch == '.' || ch == '[' {
                    break;
                }
                if !is_name_char(ch) {
                    return None;
                }
                buffer.push(ch);
                chars.next();
            }
            compound.tag = Some(buffer.to_ascii_lowercase());
        }
    }

    while let Some(ch) = chars.next() {
        match ch {
            '#' => compound.id = Some(read_name(&mut chars)?),
            '.' => {
                let class = read_name(&mut chars)?;
                compound.classes.insert(class);
            }
            '[' => compound.attributes.push(parse_attribute_selector(&mut chars)?),
            _ => return None,
        }
    }

    if compound.has_constraints() {
        Some(compound)
    } else {
        None
    }
}

fn read_name(chars: &mut Peekable<Chars>) -> Option<String> {
    let mut name = String::new();
    while let Some(&ch) = chars.peek() {
        if ch == '#' || ch == '.' || ch == '[' {
            break;
        }
        if !is_name_char(ch) {
            return None;
        }
        name.push(ch);
        chars.next();
    }
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

/// Parse the inside of `[...]`; the opening bracket is already consumed.
fn parse_attribute_selector(chars: &mut Peekable<Chars>) -> Option<AttributeSelector> {
    skip_whitespace(chars);

    let mut name = String::new();
    while let Some(&ch) = chars.peek() {
        if matches!(ch, '=' | ']' | '~' | '^' | '$' | '*') || ch.is_whitespace() {
            break;
        }
        if !is_name_char(ch) {
            return None;
        }
        name.push(ch);
        chars.next();
    }
    if name.is_empty() {
        return None;
    }
    skip_whitespace(chars);

    let mut operator = None;
    let mut value = None;
    if let Some(&ch) = chars.peek() {
        if ch == '=' || ch == '~' || ch == '^' || ch == '$' || ch == '*' {
            let mut op_str = String::new();
            op_str.push(ch);
            chars.next();
            if let Some(&'=') = chars.peek() {
                op_str.push('=');
                chars.next();
            }
            operator = match op_str.as_str() {
                "=" => Some(AttributeOperator::Exact),
                "~=" => Some(AttributeOperator::Includes),
                "^=" => Some(AttributeOperator::Prefix),
                "$=" => Some(AttributeOperator::Suffix),
                "*=" => Some(AttributeOperator::Substring),
                _ => return None,
            };
            skip_whitespace(chars);
            value = Some(read_attribute_value(chars)?);
            skip_whitespace(chars);
        }
    }

    // The condition must close.
    match chars.next() {
        Some(']') => Some(AttributeSelector {
            name,
            operator,
            value,
        }),
        _ => None,
    }
}

fn read_attribute_value(chars: &mut Peekable<Chars>) -> Option<String> {
    let mut value = String::new();
    match chars.peek() {
        Some(&quote) if quote == '"' || quote == '\'' => {
            chars.next();
            loop {
                let ch = chars.next()?;
                if ch == quote {
                    break;
                }
                value.push(ch);
            }
        }
        _ => {
            while let Some(&ch) = chars.peek() {
                if ch.is_whitespace() || ch == ']' {
                    break;
                }
                value.push(ch);
                chars.next();
            }
        }
    }
    Some(value)
}

fn skip_whitespace(chars: &mut Peekable<Chars>) {
    while let Some(&ch) = chars.peek() {
        if !ch.is_whitespace() {
            break;
        }
        chars.next();
    }
}

/// True if the element satisfies every condition of the compound selector.
pub fn matches_compound(elem: &ElementNode, compound: &CompoundSelector) -> bool {
    if let Some(tag) = &compound.tag {
        if !elem.tag.eq_ignore_ascii_case(tag) {
            return false;
        }
    }
    if let Some(id) = &compound.id {
        if elem.attributes.get("id") != Some(id) {
            return false;
        }
    }
    if !compound.classes.is_empty() {
        match elem.attributes.get("class") {
            Some(class_attr) => {
                let elem_classes: HashSet<&str> = class_attr.split_whitespace().collect();
                if !compound
                    .classes
                    .iter()
                    .all(|c| elem_classes.contains(c.as_str()))
                {
                    return false;
                }
            }
            None => return false,
        }
    }
    for attr_sel in &compound.attributes {
        let Some(actual) = elem.attributes.get(&attr_sel.name) else {
            return false;
        };
        if let Some(expected) = &attr_sel.value {
            let ok = match attr_sel.operator {
                Some(AttributeOperator::Exact) => actual == expected,
                Some(AttributeOperator::Includes) => {
                    actual.split_whitespace().any(|word| word == expected)
                }
                Some(AttributeOperator::Prefix) => actual.starts_with(expected.as_str()),
                Some(AttributeOperator::Suffix) => actual.ends_with(expected.as_str()),
                Some(AttributeOperator::Substring) => actual.contains(expected.as_str()),
                None => true,
            };
            if !ok {
                return false;
            }
        }
    }
    true
}

/// Match a complex selector against an element given its ancestor chain.
///
/// `path` runs from the fragment root down to the candidate, candidate last.
/// Matching proceeds right-to-left over the ancestor parts, walking up the
/// path.
pub fn matches_path(path: &[Handle], complex: &ComplexSelector) -> bool {
    let Some((candidate, ancestors)) = path.split_last() else {
        return false;
    };
    if !element_matches(candidate, &complex.key) {
        return false;
    }

    matches_ancestors(ancestors, &complex.ancestors, ancestors.len())
}

/// Match the remaining ancestor parts against the path below index `upper`.
///
/// Descendant parts may bind to any ancestor, so when the nearest binding
/// leaves the rest of the selector unsatisfiable the next one up is tried.
fn matches_ancestors(
    ancestors: &[Handle],
    parts: &[(Combinator, CompoundSelector)],
    upper: usize,
) -> bool {
    let Some(((combinator, compound), rest)) = parts.split_first() else {
        return true;
    };
    match combinator {
        Combinator::Child => {
            upper > 0
                && element_matches(&ancestors[upper - 1], compound)
                && matches_ancestors(ancestors, rest, upper - 1)
        }
        Combinator::Descendant => {
            let mut idx = upper;
            while idx > 0 {
                idx -= 1;
                if element_matches(&ancestors[idx], compound)
                    && matches_ancestors(ancestors, rest, idx)
                {
                    return true;
                }
            }
            false
        }
    }
}

fn element_matches(handle: &Handle, compound: &CompoundSelector) -> bool {
    match &*handle.borrow() {
        Node::Element(elem) => matches_compound(elem, compound),
        _ => false,
    }
}
