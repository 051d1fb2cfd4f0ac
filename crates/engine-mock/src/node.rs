use std::fmt::Write as _;
use std::sync::Arc;

use quick_xml::escape::escape;

/// One element of a parsed mock document. Shared via `Arc`; never mutated
/// after parsing.
#[derive(Debug)]
pub struct Element {
    pub(crate) name: String,
    pub(crate) attributes: Vec<(String, String)>,
    pub(crate) children: Vec<Content>,
}

impl Element {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug)]
pub(crate) enum Content {
    Element(Arc<Element>),
    Text(Arc<str>),
}

/// Immutable parsed mock document; clones share the same tree.
#[derive(Debug, Clone)]
pub struct MockDocument {
    pub(crate) root: Arc<Element>,
}

impl MockDocument {
    pub fn root(&self) -> &Arc<Element> {
        &self.root
    }
}

/// A query match: an element, an attribute, or a text node.
#[derive(Debug, Clone)]
pub enum MockNode {
    Element(Arc<Element>),
    Attribute { name: String, value: String },
    Text(Arc<str>),
}

impl MockNode {
    /// Elements serialize to their XML form; attribute and text nodes yield
    /// their literal value.
    pub fn text_form(&self) -> String {
        match self {
            MockNode::Element(element) => {
                let mut out = String::new();
                write_element(element, &mut out);
                out
            }
            MockNode::Attribute { value, .. } => value.clone(),
            MockNode::Text(text) => text.to_string(),
        }
    }
}

fn write_element(element: &Element, out: &mut String) {
    out.push('<');
    out.push_str(&element.name);
    for (name, value) in &element.attributes {
        let _ = write!(out, " {name}=\"{}\"", escape(value.as_str()));
    }
    if element.children.is_empty() {
        out.push_str("/>");
        return;
    }
    out.push('>');
    for child in &element.children {
        match child {
            Content::Element(child) => write_element(child, out),
            Content::Text(text) => out.push_str(&escape(&**text)),
        }
    }
    let _ = write!(out, "</{}>", element.name);
}
