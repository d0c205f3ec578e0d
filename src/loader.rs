//! Sense-record streams: the JSONL input to the dictionary compiler.
//!
//! Each input stream is a newline-delimited sequence of JSON objects, one
//! per (word, part-of-speech) judgement, tagged with a source label naming
//! the model that produced it. The loader reads every configured stream in
//! order, drops records that are invalid or unusable, and reports what it
//! dropped through [`LoadStats`] counters.
//!
//! Filtering rules:
//! - lines that do not parse as a sense record are counted and skipped
//! - records with `valid: false` are counted and skipped
//! - records with neither a word nor a lemma are counted and skipped
//! - a headword containing an embedded NUL byte cannot be represented in
//!   the NUL-terminated index record and is treated as malformed
//!
//! A stream whose file cannot be opened is logged and counted, and the run
//! continues with the remaining streams; zero readable streams is fatal.

use serde::Deserialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

use crate::error::{DictError, Result};
use crate::types::LoadStats;

/// One model's judgement about one (word, part-of-speech) pairing.
///
/// Field aliases accept the key names emitted by the upstream definition
/// generator, so its JSONL output is consumed without a conversion step.
#[derive(Debug, Clone, Deserialize)]
pub struct SenseRecord {
    /// Surface form, lowercase.
    #[serde(default)]
    pub word: String,

    /// Base form; may equal `word`.
    #[serde(default)]
    pub lemma: String,

    /// Short part-of-speech code chosen by the model, if any.
    #[serde(default, alias = "pos_ai")]
    pub part_of_speech: Option<String>,

    /// Human-readable part-of-speech name in the target language.
    #[serde(default, alias = "pos_ai_hu")]
    pub pos_label: Option<String>,

    /// Target-language gloss text.
    #[serde(default, alias = "meaning_hu")]
    pub meaning: String,

    /// Example sentence using the surface form.
    #[serde(default, alias = "example_surface_en")]
    pub example_surface: String,

    /// Example sentence using the lemma form.
    #[serde(default, alias = "example_lemma_en")]
    pub example_lemma: String,

    /// Whether this record should be used at all. Missing means valid.
    #[serde(default = "default_valid", alias = "ok")]
    pub valid: bool,
}

fn default_valid() -> bool {
    true
}

impl Default for SenseRecord {
    fn default() -> Self {
        Self {
            word: String::new(),
            lemma: String::new(),
            part_of_speech: None,
            pos_label: None,
            meaning: String::new(),
            example_surface: String::new(),
            example_lemma: String::new(),
            valid: true,
        }
    }
}

impl SenseRecord {
    /// Display headword: the surface form, falling back to the lemma.
    pub fn headword(&self) -> &str {
        let word = self.word.trim();
        if !word.is_empty() {
            word
        } else {
            self.lemma.trim()
        }
    }
}

/// A labelled sequence of sense records.
///
/// The label identifies the upstream producer and is used both for merge
/// priority and for display inside rendered meaning lines.
#[derive(Debug, Clone)]
pub struct SourceStream {
    pub label: String,
    pub path: PathBuf,
}

impl SourceStream {
    pub fn new(label: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            label: label.into(),
            path: path.into(),
        }
    }
}

/// Load every usable record from the given streams, in stream order.
///
/// Returns `(record, stream index)` pairs together with the accumulated
/// counters. The stream index refers back into `streams`, preserving the
/// label association without cloning it onto every record.
///
/// # Errors
/// Returns a configuration error if none of the streams could be opened,
/// or an I/O error if a stream fails mid-read.
pub fn load_records(streams: &[SourceStream]) -> Result<(Vec<(SenseRecord, usize)>, LoadStats)> {
    let mut stats = LoadStats::default();
    let mut records = Vec::new();

    for (stream_idx, stream) in streams.iter().enumerate() {
        let file = match File::open(&stream.path) {
            Ok(f) => f,
            Err(e) => {
                log::error!(
                    "Cannot open source '{}' ({}): {}",
                    stream.label,
                    stream.path.display(),
                    e
                );
                stats.streams_missing += 1;
                continue;
            }
        };
        stats.streams_loaded += 1;
        log::info!("Reading source '{}': {}", stream.label, stream.path.display());

        for line in BufReader::new(file).lines() {
            let line = line.map_err(|e| DictError::io(&stream.path, "read", e))?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            stats.lines_read += 1;

            let record: SenseRecord = match serde_json::from_str(line) {
                Ok(r) => r,
                Err(e) => {
                    stats.malformed += 1;
                    log::warn!("Skipping malformed record in '{}': {}", stream.label, e);
                    continue;
                }
            };

            if !record.valid {
                stats.invalid += 1;
                continue;
            }
            if record.headword().is_empty() {
                stats.blank += 1;
                continue;
            }
            if record.headword().contains('\0') {
                stats.malformed += 1;
                log::warn!(
                    "Skipping record with NUL byte in headword in '{}'",
                    stream.label
                );
                continue;
            }

            stats.loaded += 1;
            records.push((record, stream_idx));
        }
    }

    if stats.streams_loaded == 0 {
        return Err(DictError::config(
            "no input data: none of the configured source streams could be read",
        ));
    }
    Ok((records, stats))
}
