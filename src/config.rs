//! Settings for rendering parse diagnostics.

/// How failure messages present the offending input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticConfig {
    /// Characters of the failing line shown on each side of the failure
    /// position; the rest is elided with `...`.
    pub context: usize,
    /// Marker printed under the failure position.
    pub caret: char,
    /// Indentation of the excerpt and explanation lines.
    pub indent: usize,
}

impl DiagnosticConfig {
    pub const DEFAULT_CONTEXT: usize = 32;

    pub fn with_context(mut self, context: usize) -> Self {
        self.context = context;
        self
    }

    pub fn with_caret(mut self, caret: char) -> Self {
        self.caret = caret;
        self
    }

    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }
}

impl Default for DiagnosticConfig {
    fn default() -> Self {
        Self {
            context: Self::DEFAULT_CONTEXT,
            caret: '^',
            indent: 2,
        }
    }
}
