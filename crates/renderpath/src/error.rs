use thiserror::Error;

use crate::engine::QueryError;

/// Failure kinds the helper reports through the error sink.
///
/// Missing input and a non-matching expression are not failures; they resolve
/// to the empty string without touching this type. Failed parse and query
/// attempts are never cached, so an identical lookup later in the same pass is
/// re-rejected deterministically.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HelperError {
    /// No XPath expression was supplied to the placeholder. A configuration
    /// error, detected before any parsing attempt.
    #[error("The XPath expression cannot be empty")]
    EmptyExpression,

    /// The parsing collaborator rejected the input; the message names the
    /// offending payload verbatim.
    #[error("{input} is not valid XML")]
    InvalidXml { input: String },

    /// The query collaborator rejected the expression. `expression` is the
    /// original, un-prefixed form; the collaborator failure rides along as the
    /// source for diagnostics.
    #[error("{expression} is not a valid XPath expression")]
    InvalidXPath {
        expression: String,
        #[source]
        source: QueryError,
    },
}
