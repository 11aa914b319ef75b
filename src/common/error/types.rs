//! Unified error types for the converter.
use crate::rtf::RtfError;
use thiserror::Error;

/// Main error type for file-oriented conversions.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error while reading the source document
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The source document could not be parsed
    #[error("RTF error: {0}")]
    Rtf(#[from] RtfError),
}

/// Result type for file-oriented conversions.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rtf_error_conversion() {
        let err: Error = RtfError::UnbalancedGroup { position: 3 }.into();
        assert!(matches!(err, Error::Rtf(RtfError::UnbalancedGroup { position: 3 })));
        assert!(err.to_string().starts_with("RTF error:"));
    }
}
