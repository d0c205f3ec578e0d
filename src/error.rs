//! Unified error type for the bookdict library.
//!
//! Only failures that abort a whole compiler run are modeled here. Record
//! level problems (malformed JSONL lines, invalid or blank records) are
//! recovered locally by the loader and surface as counters in
//! [`crate::LoadStats`] instead. Library code returns [`DictError`]; the CLI
//! binary uses `anyhow::Result` for convenience.
//!
//! # Error Categories
//!
//! - **Config**: no usable input streams, output directory not creatable
//! - **Io**: file system operations (write, rename) with path context
//! - **EncodingOverflow**: an entry payload or data offset does not fit
//!   the 32-bit fields of the index record

use std::fmt;
use std::path::PathBuf;

/// Unified error type for the bookdict library.
#[derive(Debug)]
pub enum DictError {
    /// Configuration problem that prevents a run from starting.
    Config(String),

    /// I/O error with path context.
    Io {
        path: PathBuf,
        operation: &'static str,
        source: std::io::Error,
    },

    /// An entry payload or running data offset does not fit in the
    /// unsigned 32-bit fields of the index record.
    EncodingOverflow { headword: String, actual: usize },
}

impl fmt::Display for DictError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DictError::Config(msg) => write!(f, "Configuration error: {}", msg),
            DictError::Io {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "I/O error during {} on '{}': {}",
                    operation,
                    path.display(),
                    source
                )
            }
            DictError::EncodingOverflow { headword, actual } => {
                write!(
                    f,
                    "Entry '{}' exceeds the 32-bit limit of the index format: {} bytes (max {})",
                    headword,
                    actual,
                    u32::MAX
                )
            }
        }
    }
}

impl std::error::Error for DictError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DictError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for Results using DictError.
pub type Result<T> = std::result::Result<T, DictError>;

// ============================================================================
// Helper constructors
// ============================================================================

impl DictError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        DictError::Config(msg.into())
    }

    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, operation: &'static str, source: std::io::Error) -> Self {
        DictError::Io {
            path: path.into(),
            operation,
            source,
        }
    }

    /// Create an encoding overflow error.
    pub fn overflow(headword: impl Into<String>, actual: usize) -> Self {
        DictError::EncodingOverflow {
            headword: headword.into(),
            actual,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = DictError::config("no input data");
        assert!(err.to_string().contains("no input data"));
        assert!(err.to_string().contains("Configuration"));
    }

    #[test]
    fn test_io_error_display() {
        let err = DictError::io(
            "/out/eng-hun.idx",
            "rename",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied"),
        );
        let msg = err.to_string();
        assert!(msg.contains("/out/eng-hun.idx"));
        assert!(msg.contains("rename"));
        assert!(msg.contains("access denied"));
    }

    #[test]
    fn test_overflow_error_display() {
        let err = DictError::overflow("pig", 5_000_000_000);
        let msg = err.to_string();
        assert!(msg.contains("pig"));
        assert!(msg.contains("5000000000"));
    }

    #[test]
    fn test_error_source_chain() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "not found");
        let err = DictError::io("/out", "write", io_err);
        assert!(std::error::Error::source(&err).is_some());

        let err = DictError::config("bad");
        assert!(std::error::Error::source(&err).is_none());
    }
}
