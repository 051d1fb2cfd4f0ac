//! Render-scoped XPath lookup for response templating.
//!
//! A templating engine invokes [`XPathHelper`] once per placeholder to pull a
//! value out of an XML payload. Parsing the payload and evaluating the XPath
//! expression are delegated to an [`XmlEngine`] implementation; this crate
//! owns the caching discipline around them: within one render pass the same
//! raw XML is parsed at most once and the same expression is evaluated against
//! the same document at most once, tracked by a [`RenderCache`] the caller
//! creates per pass and drops when the pass ends.
//!
//! The helper never fails the surrounding render. Missing input and non-matching
//! expressions resolve to the empty string; malformed XML or XPath resolve to an
//! inline diagnostic produced by an [`ErrorSink`].

pub mod cache;
pub mod engine;
pub mod error;
pub mod helper;
pub mod sink;

pub use cache::{DocumentId, RenderCache};
pub use engine::{ParseError, QueryError, XmlEngine};
pub use error::HelperError;
pub use helper::XPathHelper;
pub use sink::{ErrorSink, InlineErrorSink};
