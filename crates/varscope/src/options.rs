//! Preprocessing options

/// Configuration for one preprocessing run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreprocessOptions {
    /// Separator placed between output lines
    pub line_separator: String,

    /// Reject `def` entries without a `:type`
    pub require_types: bool,

    /// Hide variables that no plain line references from generators
    pub elide_unused: bool,
}

impl Default for PreprocessOptions {
    fn default() -> Self {
        Self {
            line_separator: "\n".to_string(),
            require_types: false,
            elide_unused: true,
        }
    }
}

impl PreprocessOptions {
    /// Create options with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different output line separator.
    pub fn with_line_separator(mut self, separator: impl Into<String>) -> Self {
        self.line_separator = separator.into();
        self
    }

    /// Require every declaration to carry a type.
    pub fn with_required_types(mut self, require: bool) -> Self {
        self.require_types = require;
        self
    }

    /// Control unused-variable elision.
    pub fn with_elide_unused(mut self, elide: bool) -> Self {
        self.elide_unused = elide;
        self
    }
}
