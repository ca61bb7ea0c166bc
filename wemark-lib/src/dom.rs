use html5ever::{namespace_url, ns, LocalName, QualName};
use std::cell::RefCell;
use std::rc::Rc;

pub mod dom_tree {
    use super::*;
    use indexmap::IndexMap;

    /// A shared, mutable handle to a DOM node.
    pub type Handle = Rc<RefCell<Node>>;

    #[derive(Debug, Clone)]
    pub enum Node {
        DocumentRoot(DocumentRootNode),
        Element(ElementNode),
        Text(String),
    }

    #[derive(Debug, Clone)]
    pub struct DocumentRootNode {
        pub children: Vec<Handle>,
    }

    #[derive(Debug, Clone)]
    pub struct ElementNode {
        pub tag: String,
        pub qual_name: QualName,
        /// Insertion-ordered so serialized attribute order is deterministic.
        pub attributes: IndexMap<String, String>,
        pub children: Vec<Handle>,
    }

    #[derive(Debug)]
    pub struct Document {
        pub root: Handle,
        pub doctype: RefCell<Option<Doctype>>,
    }

    #[derive(Debug)]
    pub struct Doctype {
        pub name: String,
        pub public_id: String,
        pub system_id: String,
    }

    /// Elements serialized without a closing tag.
    pub const VOID_ELEMENTS: &[&str] = &[
        "meta", "img", "br", "hr", "input", "link", "area", "base", "col", "embed", "param",
        "source", "track", "wbr",
    ];

    impl DocumentRootNode {
        pub fn new() -> Self {
            DocumentRootNode {
                children: Vec::new(),
            }
        }
    }

    impl Default for DocumentRootNode {
        fn default() -> Self {
            Self::new()
        }
    }

    impl ElementNode {
        pub fn new(tag: &str) -> Self {
            ElementNode {
                tag: tag.to_string(),
                qual_name: QualName::new(None, ns!(html), LocalName::from(tag)),
                attributes: IndexMap::new(),
                children: Vec::new(),
            }
        }

        pub fn has_class(&self, class: &str) -> bool {
            self.attributes
                .get("class")
                .map(|attr| attr.split_whitespace().any(|c| c == class))
                .unwrap_or(false)
        }
    }

    pub fn new_document() -> Document {
        Document {
            root: Rc::new(RefCell::new(Node::DocumentRoot(DocumentRootNode::new()))),
            doctype: RefCell::new(None),
        }
    }

    pub fn new_element(tag: &str) -> Handle {
        Rc::new(RefCell::new(Node::Element(ElementNode::new(tag))))
    }

    pub fn new_text(text: impl Into<String>) -> Handle {
        Rc::new(RefCell::new(Node::Text(text.into())))
    }

    /// Collect every element in the subtree (root included) that satisfies
    /// `pred`, in document order. The returned handles are safe to mutate
    /// afterwards since the traversal has already finished.
    pub fn collect_elements<F>(handle: &Handle, pred: &F, out: &mut Vec<Handle>)
    where
        F: Fn(&ElementNode) -> bool,
    {
        let children = {
            let node = handle.borrow();
            match &*node {
                Node::DocumentRoot(root) => root.children.clone(),
                Node::Element(elem) => {
                    if pred(elem) {
                        out.push(handle.clone());
                    }
                    elem.children.clone()
                }
                Node::Text(_) => return,
            }
        };
        for child in &children {
            collect_elements(child, pred, out);
        }
    }

    /// Depth-first search for the first element satisfying `pred`.
    pub fn find_element<F>(handle: &Handle, pred: &F) -> Option<Handle>
    where
        F: Fn(&ElementNode) -> bool,
    {
        let children = {
            let node = handle.borrow();
            match &*node {
                Node::DocumentRoot(root) => root.children.clone(),
                Node::Element(elem) => {
                    if pred(elem) {
                        return Some(handle.clone());
                    }
                    elem.children.clone()
                }
                Node::Text(_) => return None,
            }
        };
        children.iter().find_map(|child| find_element(child, pred))
    }

    /// Serialize a node to its outer HTML.
    pub fn outer_html(handle: &Handle) -> String {
        let mut out = String::new();
        write_node(handle, &mut out);
        out
    }

    /// Serialize only a node's children.
    pub fn inner_html(handle: &Handle) -> String {
        let mut out = String::new();
        let children = {
            let node = handle.borrow();
            match &*node {
                Node::DocumentRoot(root) => root.children.clone(),
                Node::Element(elem) => elem.children.clone(),
                Node::Text(text) => {
                    out.push_str(&escape_text(text));
                    return out;
                }
            }
        };
        for child in &children {
            write_node(child, &mut out);
        }
        out
    }

    fn write_node(handle: &Handle, out: &mut String) {
        let node = handle.borrow();
        match &*node {
            Node::DocumentRoot(root) => {
                for child in &root.children {
                    write_node(child, out);
                }
            }
            Node::Text(text) => out.push_str(&escape_text(text)),
            Node::Element(elem) => {
                out.push('<');
                out.push_str(&elem.tag);
                for (key, value) in &elem.attributes {
                    out.push(' ');
                    out.push_str(key);
                    out.push_str("=\"");
                    out.push_str(&escape_attr(value));
                    out.push('"');
                }
                out.push('>');
                if !VOID_ELEMENTS.contains(&elem.tag.as_str()) {
                    for child in &elem.children {
                        write_node(child, out);
                    }
                    out.push_str("</");
                    out.push_str(&elem.tag);
                    out.push('>');
                }
            }
        }
    }

    fn escape_text(text: &str) -> String {
        text.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
    }

    fn escape_attr(value: &str) -> String {
        value.replace('&', "&amp;").replace('"', "&quot;")
    }
}

#[cfg(test)]
mod tests {
    use super::dom_tree::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn serializes_elements_with_attributes_in_insertion_order() {
        let div = new_element("div");
        if let Node::Element(elem) = &mut *div.borrow_mut() {
            elem.attributes
                .insert("class".to_string(), "test".to_string());
            elem.attributes
                .insert("style".to_string(), "margin: 10px;".to_string());
            elem.children.push(new_text("Content"));
        }
        assert_eq!(
            outer_html(&div),
            "<div class=\"test\" style=\"margin: 10px;\">Content</div>"
        );
    }

    #[test]
    fn serializes_void_elements_without_closing_tag() {
        let img = new_element("img");
        if let Node::Element(elem) = &mut *img.borrow_mut() {
            elem.attributes
                .insert("src".to_string(), "a.png".to_string());
        }
        assert_eq!(outer_html(&img), "<img src=\"a.png\">");
    }

    #[test]
    fn escapes_text_and_attribute_values() {
        let p = new_element("p");
        if let Node::Element(elem) = &mut *p.borrow_mut() {
            elem.attributes
                .insert("title".to_string(), "a \"b\" & c".to_string());
            elem.children.push(new_text("1 < 2 & 3 > 2"));
        }
        assert_eq!(
            outer_html(&p),
            "<p title=\"a &quot;b&quot; &amp; c\">1 &lt; 2 &amp; 3 &gt; 2</p>"
        );
    }
}
