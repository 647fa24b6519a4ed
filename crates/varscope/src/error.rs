//! Error types for varscope preprocessing

use thiserror::Error;

/// Failure raised by a [`Scope`](crate::Scope) operation.
///
/// Scope errors carry no location; the preprocessor attaches the line
/// number and text when it turns them into a [`PreprocessError`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScopeError {
    /// `undef` of a name with no live binding
    #[error("{name} is free")]
    UnboundName {
        /// The name that was released
        name: String,
    },
}

/// Main error type for preprocessing.
///
/// Every variant except `InputType` points at the 0-based line that
/// triggered it, together with the raw line text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PreprocessError {
    /// Input is not text, or the language selector is not recognized
    #[error("Input type error: {reason}")]
    InputType {
        /// What was wrong with the input
        reason: String,
    },

    /// Malformed `def`/`undef` argument list
    #[error("Invalid {directive} directive (symbol \"{symbol}\") at line {line} \"{text}\"")]
    DirectiveSyntax {
        /// Directive being parsed (`def` or `undef`)
        directive: &'static str,
        /// The offending symbol (empty when the list itself is empty)
        symbol: String,
        /// 0-based line number
        line: usize,
        /// Raw line text
        text: String,
    },

    /// `undef` of a name that has no live binding in the current scope
    #[error("{name} is free at line {line} \"{text}\"")]
    UnboundName {
        /// The name that was released
        name: String,
        /// 0-based line number
        line: usize,
        /// Raw line text
        text: String,
    },

    /// `begin`/`end` nesting is broken
    #[error("Unbalanced scope: {reason} at line {line} \"{text}\"")]
    UnbalancedScope {
        /// What went wrong
        reason: String,
        /// 0-based line number
        line: usize,
        /// Raw line text
        text: String,
    },

    /// A `def` without `:type` while types are required
    #[error("Missing type for {name} at line {line} \"{text}\"")]
    MissingType {
        /// The declared name
        name: String,
        /// 0-based line number
        line: usize,
        /// Raw line text
        text: String,
    },
}

impl PreprocessError {
    /// Create an input type error.
    pub fn input_type(reason: impl Into<String>) -> Self {
        Self::InputType {
            reason: reason.into(),
        }
    }

    /// Attach a location to a scope error.
    pub fn from_scope(err: ScopeError, line: usize, text: &str) -> Self {
        match err {
            ScopeError::UnboundName { name } => Self::UnboundName {
                name,
                line,
                text: text.to_string(),
            },
        }
    }

    /// The 0-based line number this error points at, if any.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::InputType { .. } => None,
            Self::DirectiveSyntax { line, .. }
            | Self::UnboundName { line, .. }
            | Self::UnbalancedScope { line, .. }
            | Self::MissingType { line, .. } => Some(*line),
        }
    }

    /// The raw text of the offending line, if any.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::InputType { .. } => None,
            Self::DirectiveSyntax { text, .. }
            | Self::UnboundName { text, .. }
            | Self::UnbalancedScope { text, .. }
            | Self::MissingType { text, .. } => Some(text),
        }
    }
}

/// Result type alias for preprocessing operations
pub type Result<T> = std::result::Result<T, PreprocessError>;
