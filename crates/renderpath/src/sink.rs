use crate::error::HelperError;

/// Boundary to the surrounding framework's diagnostic policy: turns a helper
/// failure into the text substituted for the placeholder. The helper never
/// raises a fault past this point.
pub trait ErrorSink: Send + Sync {
    fn render(&self, error: &HelperError) -> String;
}

/// Default sink, rendering failures inline in the produced output.
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineErrorSink;

impl ErrorSink for InlineErrorSink {
    fn render(&self, error: &HelperError) -> String {
        format!("[ERROR: {error}]")
    }
}
