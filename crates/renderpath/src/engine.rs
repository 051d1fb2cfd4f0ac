use thiserror::Error;

/// Reported by the parsing collaborator when the input is not well-formed XML.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ParseError {
    message: String,
}

impl ParseError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Reported by the query collaborator for a syntactically invalid XPath
/// expression. A valid expression that matches nothing is not an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct QueryError {
    message: String,
}

impl QueryError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Capability seam for the XML collaborators: parsing, XPath evaluation and
/// node formatting. The helper consumes this; it never parses or evaluates
/// anything itself.
///
/// `Document` and `Node` are expected to be handles (`Arc`-backed or similar):
/// the render cache clones them when handing out cached results. A node must
/// not be used past the lifetime of the render pass that produced its
/// document.
pub trait XmlEngine {
    type Document: Clone;
    type Node: Clone;

    /// Parses one raw XML payload into an immutable document.
    fn parse(&self, raw_xml: &str) -> Result<Self::Document, ParseError>;

    /// Evaluates `expression` against `document`, returning matches in
    /// document order. An empty vector means "no match", not failure.
    fn find_nodes(
        &self,
        expression: &str,
        document: &Self::Document,
    ) -> Result<Vec<Self::Node>, QueryError>;

    /// Deterministic text form of a node: elements serialize to their XML
    /// form, text and attribute nodes to their literal value.
    fn node_text(&self, node: &Self::Node) -> String;
}
