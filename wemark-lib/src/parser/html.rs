//! HTML parsing into the crate's DOM tree.
//!
//! Uses html5ever as the parser and builds the tree defined in
//! `crate::dom::dom_tree` through a custom `TreeSink`.

use crate::dom::dom_tree;
use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::{
    interface::{ElemName, NodeOrText, QuirksMode, TreeSink},
    LocalName, Namespace, QualName,
};
use indexmap::IndexMap;
use std::cell::RefCell;
use std::rc::Rc;

/// Parse an HTML string into a DOM tree. html5ever error-recovers on
/// malformed markup, so this never fails.
pub fn create_dom_tree(html_content: &str) -> dom_tree::Document {
    let tree_sink = WemarkTreeSink::new();
    html5ever::parse_document(tree_sink, Default::default()).one(html_content.to_string())
}

/// TreeSink that accumulates parsed nodes into a `dom_tree::Document`.
pub struct WemarkTreeSink {
    document: dom_tree::Document,
    quirks_mode: RefCell<QuirksMode>,
}

impl WemarkTreeSink {
    pub fn new() -> Self {
        Self {
            document: dom_tree::new_document(),
            quirks_mode: RefCell::new(QuirksMode::NoQuirks),
        }
    }
}

impl Default for WemarkTreeSink {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
pub struct SinkElemName {
    ns: Namespace,
    local: LocalName,
}

impl ElemName for SinkElemName {
    fn local_name(&self) -> &LocalName {
        &self.local
    }

    fn ns(&self) -> &Namespace {
        &self.ns
    }
}

impl TreeSink for WemarkTreeSink {
    type Handle = dom_tree::Handle;
    type Output = dom_tree::Document;
    type ElemName<'a>
        = SinkElemName
    where
        Self: 'a;

    fn finish(self) -> Self::Output {
        self.document
    }

    fn parse_error(&self, msg: std::borrow::Cow<'static, str>) {
        log::debug!("html parse error: {}", msg);
    }

    fn get_document(&self) -> Self::Handle {
        self.document.root.clone()
    }

    fn elem_name<'a>(&'a self, target: &'a Self::Handle) -> Self::ElemName<'a> {
        match &*target.borrow() {
            dom_tree::Node::Element(elem) => SinkElemName {
                ns: elem.qual_name.ns.clone(),
                local: elem.qual_name.local.clone(),
            },
            _ => panic!("elem_name called on non-element node"),
        }
    }

    fn create_element(
        &self,
        name: QualName,
        attrs: Vec<html5ever::Attribute>,
        _flags: html5ever::interface::ElementFlags,
    ) -> Self::Handle {
        let attributes: IndexMap<String, String> = attrs
            .into_iter()
            .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
            .collect();
        let element_node = dom_tree::ElementNode {
            tag: name.local.to_string(),
            qual_name: name,
            attributes,
            children: Vec::new(),
        };
        Rc::new(RefCell::new(dom_tree::Node::Element(element_node)))
    }

    /// Comments are irrelevant to the output; store them as empty text.
    fn create_comment(&self, _text: StrTendril) -> Self::Handle {
        Rc::new(RefCell::new(dom_tree::Node::Text(String::new())))
    }

    fn create_pi(&self, target: StrTendril, data: StrTendril) -> Self::Handle {
        let combined = format!("{} {}", target, data);
        Rc::new(RefCell::new(dom_tree::Node::Text(combined)))
    }

    fn append(&self, parent: &Self::Handle, child: NodeOrText<Self::Handle>) {
        let child_node = match child {
            NodeOrText::AppendNode(node) => node,
            NodeOrText::AppendText(text) => {
                // Merge with a trailing text sibling so text nodes stay whole.
                let mut parent_borrow = parent.borrow_mut();
                let children = match &mut *parent_borrow {
                    dom_tree::Node::DocumentRoot(root) => &mut root.children,
                    dom_tree::Node::Element(elem) => &mut elem.children,
                    dom_tree::Node::Text(_) => return,
                };
                if let Some(last) = children.last() {
                    if let dom_tree::Node::Text(existing) = &mut *last.borrow_mut() {
                        existing.push_str(&text);
                        return;
                    }
                }
                children.push(Rc::new(RefCell::new(dom_tree::Node::Text(text.to_string()))));
                return;
            }
        };

        let mut parent_borrow = parent.borrow_mut();
        match &mut *parent_borrow {
            dom_tree::Node::DocumentRoot(root) => root.children.push(child_node),
            dom_tree::Node::Element(elem) => elem.children.push(child_node),
            dom_tree::Node::Text(_) => {}
        }
    }

    /// Not needed for renderer-produced fragments.
    fn append_based_on_parent_node(
        &self,
        _element: &Self::Handle,
        _prev_element: &Self::Handle,
        _child: NodeOrText<Self::Handle>,
    ) {
    }

    fn append_doctype_to_document(
        &self,
        name: StrTendril,
        public_id: StrTendril,
        system_id: StrTendril,
    ) {
        *self.document.doctype.borrow_mut() = Some(dom_tree::Doctype {
            name: name.to_string(),
            public_id: public_id.to_string(),
            system_id: system_id.to_string(),
        });
    }

    fn mark_script_already_started(&self, _node: &Self::Handle) {}

    fn get_template_contents(&self, target: &Self::Handle) -> Self::Handle {
        target.clone()
    }

    fn same_node(&self, x: &Self::Handle, y: &Self::Handle) -> bool {
        Rc::ptr_eq(x, y)
    }

    fn set_quirks_mode(&self, mode: QuirksMode) {
        *self.quirks_mode.borrow_mut() = mode;
    }

    /// Not needed for renderer-produced fragments.
    fn append_before_sibling(&self, _sibling: &Self::Handle, _child: NodeOrText<Self::Handle>) {}

    fn add_attrs_if_missing(&self, target: &Self::Handle, attrs: Vec<html5ever::Attribute>) {
        if let dom_tree::Node::Element(elem_node) = &mut *target.borrow_mut() {
            for attr in attrs {
                let key = attr.name.local.to_string();
                if !elem_node.attributes.contains_key(&key) {
                    elem_node.attributes.insert(key, attr.value.to_string());
                }
            }
        }
    }

    fn remove_from_parent(&self, _target: &Self::Handle) {}

    fn reparent_children(&self, _node: &Self::Handle, _new_parent: &Self::Handle) {}
}
