//! Optional post-compression of the data file.
//!
//! Compression is an injected capability, not part of the compiler core:
//! the driver hands the finished data file to a [`Compressor`] and records
//! the outcome. No outcome is ever fatal; the uncompressed artifacts stay
//! valid whatever happens here.

use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::constants::{DICTZIP_PROGRAM, DICT_DZ_SUFFIX};

/// Result of one compression attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompressionOutcome {
    /// The data file was replaced by the companion file at this path.
    Compressed(PathBuf),
    /// The compression tool is not installed on this host.
    Unavailable,
    /// The tool ran and failed; the uncompressed data file is untouched.
    Failed(String),
}

/// A post-processing step that compresses the finished data file in place.
pub trait Compressor {
    fn compress(&self, dict_path: &Path) -> CompressionOutcome;
}

/// Compresses via the external `dictzip` tool.
///
/// `dictzip -f` replaces `{base}.dict` with `{base}.dict.dz`; readers of
/// the format accept either form of the data file.
#[derive(Debug, Clone)]
pub struct Dictzip {
    program: String,
}

impl Dictzip {
    pub fn new() -> Self {
        Self {
            program: DICTZIP_PROGRAM.to_string(),
        }
    }

    /// Use a different executable, e.g. an absolute path to dictzip.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for Dictzip {
    fn default() -> Self {
        Self::new()
    }
}

impl Compressor for Dictzip {
    fn compress(&self, dict_path: &Path) -> CompressionOutcome {
        match Command::new(&self.program).arg("-f").arg(dict_path).status() {
            Ok(status) if status.success() => {
                let mut compressed = dict_path.as_os_str().to_os_string();
                compressed.push(DICT_DZ_SUFFIX);
                CompressionOutcome::Compressed(PathBuf::from(compressed))
            }
            Ok(status) => CompressionOutcome::Failed(format!(
                "{} exited with {}",
                self.program, status
            )),
            Err(e) if e.kind() == io::ErrorKind::NotFound => CompressionOutcome::Unavailable,
            Err(e) => CompressionOutcome::Failed(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_tool_reports_unavailable() {
        let compressor = Dictzip::with_program("definitely-not-a-real-binary-9f2a");
        assert_eq!(
            compressor.compress(Path::new("/tmp/x.dict")),
            CompressionOutcome::Unavailable
        );
    }

    #[test]
    fn test_nonzero_exit_reports_failed() {
        let compressor = Dictzip::with_program("false");
        match compressor.compress(Path::new("/tmp/x.dict")) {
            CompressionOutcome::Failed(msg) => assert!(msg.contains("false")),
            other => panic!("expected Failed, got {:?}", other),
        }
    }

    #[test]
    fn test_success_names_companion_file() {
        let compressor = Dictzip::with_program("true");
        assert_eq!(
            compressor.compress(Path::new("/out/eng-hun.dict")),
            CompressionOutcome::Compressed(PathBuf::from("/out/eng-hun.dict.dz"))
        );
    }
}
