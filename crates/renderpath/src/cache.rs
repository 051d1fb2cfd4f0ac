use std::collections::HashMap;

use crate::engine::XmlEngine;

/// Identity of one parsed document within a render pass. Assigned by
/// [`RenderCache::store_document`] and used as the document component of query
/// keys, so identical expressions against different documents never collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentId(u64);

/// Memoizes parse and query results for the lifetime of one render pass.
///
/// Created by the caller at the start of a render, dropped at its end; the
/// scope itself is the only bound — no eviction, no TTL, no cross-render
/// sharing. Concurrent render passes must each own their own instance.
///
/// The two result kinds live in separate maps, keyed so that lookups borrow
/// the caller's strings; owned keys are built only when storing.
pub struct RenderCache<E: XmlEngine> {
    documents: HashMap<String, (DocumentId, E::Document)>,
    queries: HashMap<DocumentId, HashMap<String, Option<E::Node>>>,
    next_document: u64,
}

impl<E: XmlEngine> RenderCache<E> {
    pub fn new() -> Self {
        Self { documents: HashMap::new(), queries: HashMap::new(), next_document: 0 }
    }

    /// Looks up the parsed document for a raw XML payload.
    pub fn document(&self, raw_xml: &str) -> Option<(DocumentId, E::Document)> {
        self.documents.get(raw_xml).map(|(id, document)| (*id, document.clone()))
    }

    /// Stores a freshly parsed document and assigns its per-pass identity.
    pub fn store_document(&mut self, raw_xml: &str, document: E::Document) -> DocumentId {
        let id = DocumentId(self.next_document);
        self.next_document += 1;
        self.documents.insert(raw_xml.to_owned(), (id, document));
        id
    }

    /// Looks up a query outcome. The outer `Option` is hit/miss; the inner one
    /// is the cached outcome, where `None` is an explicit no-match marker.
    pub fn query_result(&self, document: DocumentId, expression: &str) -> Option<Option<E::Node>> {
        self.queries.get(&document).and_then(|entries| entries.get(expression).cloned())
    }

    /// Stores a query outcome, including the no-match case.
    pub fn store_query_result(
        &mut self,
        document: DocumentId,
        expression: &str,
        node: Option<E::Node>,
    ) {
        self.queries.entry(document).or_default().insert(expression.to_owned(), node);
    }

    /// Number of cached entries, over both entry kinds.
    pub fn entry_count(&self) -> usize {
        self.documents.len() + self.queries.values().map(HashMap::len).sum::<usize>()
    }
}

impl<E: XmlEngine> Default for RenderCache<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{ParseError, QueryError};
    use rstest::rstest;
    use std::sync::Arc;

    /// Engine whose documents and nodes are just shared strings; parsing and
    /// querying are never exercised here.
    struct StringEngine;

    impl XmlEngine for StringEngine {
        type Document = Arc<str>;
        type Node = Arc<str>;

        fn parse(&self, raw_xml: &str) -> Result<Arc<str>, ParseError> {
            Ok(Arc::from(raw_xml))
        }

        fn find_nodes(&self, _: &str, _: &Arc<str>) -> Result<Vec<Arc<str>>, QueryError> {
            Ok(Vec::new())
        }

        fn node_text(&self, node: &Arc<str>) -> String {
            node.to_string()
        }
    }

    #[rstest]
    fn distinct_xml_payloads_get_distinct_entries() {
        let mut cache = RenderCache::<StringEngine>::new();
        let first = cache.store_document("<a/>", Arc::from("<a/>"));
        let second = cache.store_document("<b/>", Arc::from("<b/>"));

        assert_ne!(first, second);
        assert_eq!(cache.document("<a/>").unwrap().0, first);
        assert_eq!(cache.document("<b/>").unwrap().0, second);
        assert!(cache.document("<c/>").is_none());
    }

    #[rstest]
    fn query_keys_distinguish_expression_and_document() {
        let mut cache = RenderCache::<StringEngine>::new();
        let first = cache.store_document("<a/>", Arc::from("<a/>"));
        let second = cache.store_document("<b/>", Arc::from("<b/>"));

        cache.store_query_result(first, "//x", Some(Arc::from("from-a")));
        cache.store_query_result(second, "//x", Some(Arc::from("from-b")));
        cache.store_query_result(first, "//y", None);

        assert_eq!(cache.query_result(first, "//x").unwrap().as_deref(), Some("from-a"));
        assert_eq!(cache.query_result(second, "//x").unwrap().as_deref(), Some("from-b"));
        // Cached no-match is a hit, not a miss.
        assert_eq!(cache.query_result(first, "//y"), Some(None));
        assert_eq!(cache.query_result(second, "//y"), None);
    }

    #[rstest]
    fn re_storing_a_document_replaces_the_entry() {
        let mut cache = RenderCache::<StringEngine>::new();
        cache.store_document("<a/>", Arc::from("<a/>"));
        let replacement = cache.store_document("<a/>", Arc::from("<a/>"));

        assert_eq!(cache.entry_count(), 1);
        assert_eq!(cache.document("<a/>").unwrap().0, replacement);
    }

    #[rstest]
    fn entry_count_spans_both_kinds() {
        let mut cache = RenderCache::<StringEngine>::new();
        let id = cache.store_document("<a/>", Arc::from("<a/>"));
        cache.store_query_result(id, "//x", None);
        cache.store_query_result(id, "//y", Some(Arc::from("y")));

        assert_eq!(cache.entry_count(), 3);
    }
}
