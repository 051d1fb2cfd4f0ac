use crate::cache::{DocumentId, RenderCache};
use crate::engine::XmlEngine;
use crate::error::HelperError;
use crate::sink::{ErrorSink, InlineErrorSink};

/// Resolves one template placeholder: evaluates an XPath expression against a
/// raw XML payload and yields the first matching node's text form.
///
/// Stateless across invocations; all memoization lives in the
/// [`RenderCache`] the caller passes in, one instance per render pass.
pub struct XPathHelper<E: XmlEngine> {
    engine: E,
    prefix: String,
    sink: Box<dyn ErrorSink>,
}

impl<E: XmlEngine> XPathHelper<E> {
    pub fn new(engine: E) -> Self {
        Self { engine, prefix: String::new(), sink: Box::new(InlineErrorSink) }
    }

    /// Fixed prefix prepended to every expression before evaluation, e.g. a
    /// namespace or root restriction. Reported errors echo the original,
    /// un-prefixed expression.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Replaces the default inline error sink.
    pub fn with_error_sink(mut self, sink: impl ErrorSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Resolves one placeholder. Always yields some string: missing input and
    /// no-match become `""`, failures go through the error sink.
    pub fn evaluate(
        &self,
        input_xml: Option<&str>,
        expression: Option<&str>,
        cache: &mut RenderCache<E>,
    ) -> String {
        match self.try_evaluate(input_xml, expression, cache) {
            Ok(Some(text)) => text,
            Ok(None) => String::new(),
            Err(error) => {
                tracing::warn!(%error, "xpath placeholder failed");
                self.sink.render(&error)
            }
        }
    }

    /// Result-typed core of [`evaluate`](Self::evaluate): `Ok(Some(_))` on a
    /// match, `Ok(None)` for missing input or no match, `Err(_)` for the
    /// named failure kinds.
    pub fn try_evaluate(
        &self,
        input_xml: Option<&str>,
        expression: Option<&str>,
        cache: &mut RenderCache<E>,
    ) -> Result<Option<String>, HelperError> {
        let Some(input_xml) = input_xml else {
            return Ok(None);
        };

        let expression = match expression {
            Some(expression) if !expression.is_empty() => expression,
            _ => return Err(HelperError::EmptyExpression),
        };

        let (document_id, document) = self.document(input_xml, cache)?;

        let effective = format!("{}{}", self.prefix, expression);
        let node = self.first_node(&effective, expression, document_id, &document, cache)?;

        Ok(node.map(|node| self.engine.node_text(&node)))
    }

    /// Parse-or-reuse. Parse failures are never cached: the next identical
    /// lookup in this pass re-parses and re-fails deterministically.
    fn document(
        &self,
        raw_xml: &str,
        cache: &mut RenderCache<E>,
    ) -> Result<(DocumentId, E::Document), HelperError> {
        if let Some(hit) = cache.document(raw_xml) {
            return Ok(hit);
        }

        tracing::debug!("document cache miss, parsing payload");
        let document = self
            .engine
            .parse(raw_xml)
            .map_err(|_| HelperError::InvalidXml { input: raw_xml.to_owned() })?;
        let id = cache.store_document(raw_xml, document.clone());
        Ok((id, document))
    }

    /// Query-or-reuse, with "first or none" applied here rather than by the
    /// evaluator. The no-match outcome is cached as an explicit empty marker;
    /// query failures are not cached at all.
    fn first_node(
        &self,
        effective: &str,
        original: &str,
        document_id: DocumentId,
        document: &E::Document,
        cache: &mut RenderCache<E>,
    ) -> Result<Option<E::Node>, HelperError> {
        if let Some(cached) = cache.query_result(document_id, effective) {
            return Ok(cached);
        }

        tracing::debug!(expression = effective, "query cache miss, evaluating");
        let nodes = self.engine.find_nodes(effective, document).map_err(|source| {
            HelperError::InvalidXPath { expression: original.to_owned(), source }
        })?;
        let node = nodes.into_iter().next();
        cache.store_query_result(document_id, effective, node.clone());
        Ok(node)
    }
}
