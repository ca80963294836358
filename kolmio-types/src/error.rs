//! Error type used by the crate.

use thiserror::Error;

/// Error returned when geometry text cannot be decoded.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WktError {
    /// The geometry type tag of the text is not the one the caller asked for.
    #[error("unexpected geometry type: expected {expected}, found '{found}'")]
    TypeMismatch {
        /// Tag the parser expected.
        expected: &'static str,
        /// Tag found in the text.
        found: String,
    },
    /// Parentheses are missing or unbalanced.
    #[error("malformed geometry text '{0}'")]
    Syntax(String),
    /// A coordinate does not have the number of fields the geometry type requires.
    #[error("coordinate '{coordinate}' has {found} fields, expected {expected}")]
    Arity {
        /// Offending coordinate text.
        coordinate: String,
        /// Required number of fields.
        expected: usize,
        /// Number of fields found.
        found: usize,
    },
    /// A coordinate field is not a finite decimal number.
    #[error("invalid coordinate value '{0}'")]
    Number(String),
}
