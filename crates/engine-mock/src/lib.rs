//! Mock XML engine for renderpath testing and development.
//!
//! Implements the [`XmlEngine`] seam over an owned in-memory tree: payloads
//! are parsed with quick-xml, and queries use a deliberately small XPath
//! subset — child paths (`/a/b`), descendant searches (`//name`), attribute
//! steps (`@name`), `text()` steps and the `*` wildcard. Anything outside the
//! subset is rejected as an invalid expression. Parse and query calls are
//! counted so caching tests can observe what actually ran.

mod node;
mod parse;
mod query;

pub use node::{Element, MockDocument, MockNode};

use std::sync::atomic::{AtomicUsize, Ordering};

use renderpath::{ParseError, QueryError, XmlEngine};

#[derive(Debug, Default)]
pub struct MockXmlEngine {
    parse_calls: AtomicUsize,
    query_calls: AtomicUsize,
}

impl MockXmlEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of payloads actually parsed (cache hits do not count).
    pub fn parse_calls(&self) -> usize {
        self.parse_calls.load(Ordering::Relaxed)
    }

    /// Number of expressions actually evaluated (cache hits do not count).
    pub fn query_calls(&self) -> usize {
        self.query_calls.load(Ordering::Relaxed)
    }
}

impl XmlEngine for MockXmlEngine {
    type Document = MockDocument;
    type Node = MockNode;

    fn parse(&self, raw_xml: &str) -> Result<MockDocument, ParseError> {
        self.parse_calls.fetch_add(1, Ordering::Relaxed);
        parse::parse_document(raw_xml)
    }

    fn find_nodes(
        &self,
        expression: &str,
        document: &MockDocument,
    ) -> Result<Vec<MockNode>, QueryError> {
        self.query_calls.fetch_add(1, Ordering::Relaxed);
        query::find_nodes(expression, document)
    }

    fn node_text(&self, node: &MockNode) -> String {
        node.text_form()
    }
}
