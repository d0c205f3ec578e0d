//! Serializes collated entries into the index/data/metadata artifact set.
//!
//! The data file is the concatenation of one payload per entry, each
//! payload being `<k>{headword}</k>\n{definition}` in UTF-8. The index
//! file holds one record per entry in collation order:
//! `{headword bytes}{0x00}{u32 BE offset}{u32 BE length}`. Entries are
//! serialized strictly in collation order, so offsets are monotonic and
//! contiguous by construction; any payload or offset that does not fit in
//! 32 bits aborts the run before a byte reaches disk.
//!
//! All three artifacts are built in memory, written to temporary files in
//! the output directory, and renamed into place, so a run either yields a
//! complete consistent artifact set or leaves nothing new behind.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::aggregate::{aggregate, DictionaryEntry};
use crate::collate;
use crate::compress::{CompressionOutcome, Compressor};
use crate::constants::{KEY_CLOSE_TAG, KEY_OPEN_TAG};
use crate::error::{DictError, Result};
use crate::loader::{load_records, SourceStream};
use crate::metadata::{render_ifo, IfoFields};
use crate::types::CompileSummary;

/// Everything the compiler needs for one run.
#[derive(Debug, Clone)]
pub struct CompileConfig {
    /// Input streams in reading order.
    pub sources: Vec<SourceStream>,
    /// Source labels in priority order; unlisted labels rank last.
    pub priority: Vec<String>,
    pub output_dir: PathBuf,
    /// Base filename: artifacts are `{basename}.idx/.dict/.ifo`.
    pub basename: String,
    pub title: String,
    pub description: String,
    /// Language-pair code for the descriptor, e.g. `en-hu`.
    pub lang: String,
}

/// The packed index and data blobs for one collated entry sequence.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CompiledArtifacts {
    pub idx: Vec<u8>,
    pub dict: Vec<u8>,
    pub entry_count: usize,
}

fn checked_u32(value: usize, headword: &str) -> Result<u32> {
    u32::try_from(value).map_err(|_| DictError::overflow(headword, value))
}

/// Serialize collation-ordered entries into the index and data blobs.
///
/// # Errors
/// Returns [`DictError::EncodingOverflow`] if an entry payload, or the
/// running data offset, exceeds `u32::MAX`. Truncating either would corrupt
/// the offsets of every following entry.
pub fn compile_entries(entries: &[DictionaryEntry]) -> Result<CompiledArtifacts> {
    let mut idx = Vec::new();
    let mut dict = Vec::new();

    for entry in entries {
        let definition = entry.definition_text();
        let mut payload =
            Vec::with_capacity(entry.headword.len() + definition.len() + KEY_OPEN_TAG.len() + KEY_CLOSE_TAG.len() + 1);
        payload.extend_from_slice(KEY_OPEN_TAG.as_bytes());
        payload.extend_from_slice(entry.headword.as_bytes());
        payload.extend_from_slice(KEY_CLOSE_TAG.as_bytes());
        payload.push(b'\n');
        payload.extend_from_slice(definition.as_bytes());

        let offset = checked_u32(dict.len(), &entry.headword)?;
        let length = checked_u32(payload.len(), &entry.headword)?;

        idx.extend_from_slice(entry.headword.as_bytes());
        idx.push(0);
        idx.extend_from_slice(&offset.to_be_bytes());
        idx.extend_from_slice(&length.to_be_bytes());

        dict.extend_from_slice(&payload);
    }

    Ok(CompiledArtifacts {
        idx,
        dict,
        entry_count: entries.len(),
    })
}

/// Write `bytes` to `dir/name` via a temporary file and an atomic rename.
fn write_atomic(dir: &Path, name: &str, bytes: &[u8]) -> Result<PathBuf> {
    let mut tmp = tempfile::NamedTempFile::new_in(dir)
        .map_err(|e| DictError::io(dir, "create temporary file", e))?;
    tmp.write_all(bytes)
        .map_err(|e| DictError::io(tmp.path(), "write", e))?;
    let target = dir.join(name);
    tmp.persist(&target)
        .map_err(|e| DictError::io(&target, "rename", e.error))?;
    Ok(target)
}

/// Run the whole pipeline: load, aggregate, collate, serialize, describe,
/// and optionally compress.
///
/// `date` is the generation date stamped into the descriptor; the CLI
/// passes today, tests pin a fixed value. Pass `None` for `compressor` to
/// skip post-compression entirely.
pub fn compile(
    config: &CompileConfig,
    compressor: Option<&dyn Compressor>,
    date: NaiveDate,
) -> Result<CompileSummary> {
    fs::create_dir_all(&config.output_dir).map_err(|e| {
        DictError::config(format!(
            "cannot create output directory {}: {}",
            config.output_dir.display(),
            e
        ))
    })?;

    let (records, stats) = load_records(&config.sources)?;
    log::info!(
        "Loaded {} records from {} stream(s) ({} malformed, {} invalid, {} blank)",
        stats.loaded,
        stats.streams_loaded,
        stats.malformed,
        stats.invalid,
        stats.blank
    );

    let labels: Vec<String> = config.sources.iter().map(|s| s.label.clone()).collect();
    let mut entries = aggregate(&records, &labels, &config.priority);
    entries.sort_by(|a, b| collate::compare(&a.headword, &b.headword));
    log::info!("Aggregated {} headwords", entries.len());

    let artifacts = compile_entries(&entries)?;
    let ifo = render_ifo(&IfoFields {
        wordcount: artifacts.entry_count,
        idxfilesize: artifacts.idx.len(),
        bookname: &config.title,
        description: &config.description,
        lang: &config.lang,
        date,
    });

    let dict_path = write_atomic(
        &config.output_dir,
        &format!("{}.dict", config.basename),
        &artifacts.dict,
    )?;
    write_atomic(
        &config.output_dir,
        &format!("{}.idx", config.basename),
        &artifacts.idx,
    )?;
    write_atomic(
        &config.output_dir,
        &format!("{}.ifo", config.basename),
        ifo.as_bytes(),
    )?;
    log::info!("Wrote artifact set to {}", config.output_dir.display());

    let compression = compressor.map(|c| {
        let outcome = c.compress(&dict_path);
        match &outcome {
            CompressionOutcome::Compressed(path) => {
                log::info!("Compressed data file: {}", path.display());
            }
            CompressionOutcome::Unavailable => {
                log::warn!(
                    "Compression tool not available; {} stays uncompressed",
                    dict_path.display()
                );
            }
            CompressionOutcome::Failed(msg) => {
                log::warn!(
                    "Compression failed ({}); {} stays uncompressed",
                    msg,
                    dict_path.display()
                );
            }
        }
        outcome
    });

    Ok(CompileSummary {
        stats,
        entries: artifacts.entry_count,
        idx_bytes: artifacts.idx.len(),
        dict_bytes: artifacts.dict.len(),
        compression,
    })
}
