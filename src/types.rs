//! Cross-module result types for the compile pipeline.

use crate::compress::CompressionOutcome;

/// Counters accumulated while loading sense-record streams.
///
/// Returned alongside the loaded records so callers can report what was
/// dropped; there is no process-wide counter state anywhere in the crate.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LoadStats {
    /// Streams that were opened and read.
    pub streams_loaded: usize,
    /// Streams whose file could not be opened.
    pub streams_missing: usize,
    /// Non-empty lines seen across all readable streams.
    pub lines_read: usize,
    /// Lines that could not be interpreted as a sense record.
    pub malformed: usize,
    /// Records carrying `valid: false`.
    pub invalid: usize,
    /// Records with neither a word nor a lemma.
    pub blank: usize,
    /// Records that passed every filter.
    pub loaded: usize,
}

/// Summary of one compiler run.
#[derive(Debug, Clone)]
pub struct CompileSummary {
    pub stats: LoadStats,
    /// Headwords in the finished dictionary.
    pub entries: usize,
    /// Size of the index file in bytes.
    pub idx_bytes: usize,
    /// Size of the uncompressed data file in bytes.
    pub dict_bytes: usize,
    /// Outcome of the post-compression step, if one was configured.
    pub compression: Option<CompressionOutcome>,
}
