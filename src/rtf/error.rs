//! Error types for RTF parsing.
//!
//! Every variant carries the character offset at which the parser gave up.
//! Parsing is all-or-nothing: when any of these is returned no tree is
//! produced.

use thiserror::Error;

/// Result type for RTF operations.
pub type RtfResult<T> = Result<T, RtfError>;

/// RTF parsing errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RtfError {
    /// A closing brace with no matching opening brace
    #[error("Unbalanced group: closing brace at offset {position} has no matching open")]
    UnbalancedGroup { position: usize },

    /// Input ended inside an incomplete construct
    #[error("Truncated input at offset {position}: {context}")]
    TruncatedInput {
        position: usize,
        context: &'static str,
    },

    /// A `\'` escape not followed by two hex digits
    #[error("Malformed hex escape at offset {position}: {found:?}")]
    MalformedEscape { position: usize, found: String },

    /// Content found where the document structure does not allow it
    #[error("Invalid RTF structure at offset {position}: {reason}")]
    Structural {
        position: usize,
        reason: &'static str,
    },
}

impl RtfError {
    /// Character offset at which the error was detected.
    pub fn position(&self) -> usize {
        match self {
            RtfError::UnbalancedGroup { position }
            | RtfError::TruncatedInput { position, .. }
            | RtfError::MalformedEscape { position, .. }
            | RtfError::Structural { position, .. } => *position,
        }
    }
}
