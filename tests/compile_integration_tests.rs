//! End-to-end tests for the dictionary compiler.
//!
//! These build real artifact sets in a temp directory from fixture JSONL
//! streams and assert the binary-layout invariants a StarDict reader
//! depends on: contiguous offsets, canonical collation order, and
//! byte-identical rebuilds.

use anyhow::Result;
use chrono::NaiveDate;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use bookdict::{
    collate, compile, CompileConfig, CompileSummary, CompressionOutcome, Compressor, Dictzip,
    SourceStream,
};

fn fixed_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 8, 7).unwrap()
}

fn write_stream(dir: &Path, name: &str, lines: &[&str]) -> PathBuf {
    let path = dir.join(name);
    let mut file = fs::File::create(&path).unwrap();
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }
    path
}

fn test_config(dir: &Path, sources: Vec<SourceStream>, priority: &[&str]) -> CompileConfig {
    CompileConfig {
        sources,
        priority: priority.iter().map(|s| s.to_string()).collect(),
        output_dir: dir.join("dist"),
        basename: "eng-hun".to_string(),
        title: "English-Hungarian dictionary".to_string(),
        description: "Built from the Animal Farm word list.".to_string(),
        lang: "en-hu".to_string(),
    }
}

fn run(config: &CompileConfig) -> Result<CompileSummary> {
    Ok(compile(config, None, fixed_date())?)
}

/// Decode the index file into (headword, offset, length) records.
fn parse_idx(idx: &[u8]) -> Vec<(String, u32, u32)> {
    let mut records = Vec::new();
    let mut pos = 0;
    while pos < idx.len() {
        let nul = idx[pos..]
            .iter()
            .position(|&b| b == 0)
            .expect("index record missing NUL terminator");
        let headword = String::from_utf8(idx[pos..pos + nul].to_vec()).unwrap();
        let rest = &idx[pos + nul + 1..];
        let offset = u32::from_be_bytes(rest[0..4].try_into().unwrap());
        let length = u32::from_be_bytes(rest[4..8].try_into().unwrap());
        records.push((headword, offset, length));
        pos += nul + 1 + 8;
    }
    records
}

#[test]
fn test_end_to_end_two_sources() -> Result<()> {
    let dir = tempfile::tempdir()?;

    // The same judgement from two models; "A" is configured to win.
    let a = write_stream(
        dir.path(),
        "a.jsonl",
        &[r#"{"word":"pig","meaning_hu":"disznó","pos_ai_hu":"főnév","example_surface_en":"The pig ran.","ok":true}"#],
    );
    let b = write_stream(
        dir.path(),
        "b.jsonl",
        &[r#"{"word":"pig","meaning_hu":"disznó","pos_ai_hu":"főnév","example_surface_en":"The pig ran.","ok":true}"#],
    );

    let config = test_config(
        dir.path(),
        vec![SourceStream::new("B", &b), SourceStream::new("A", &a)],
        &["A", "B"],
    );
    let summary = run(&config)?;
    assert_eq!(summary.entries, 1);

    let dict = fs::read(config.output_dir.join("eng-hun.dict"))?;
    let text = String::from_utf8(dict)?;

    // One headword, one occurrence of the shared example sentence.
    assert_eq!(text.matches("<k>pig</k>").count(), 1);
    assert_eq!(text.matches("The pig ran.").count(), 1);

    // The prioritized source's meaning line comes first.
    let a_line = text.find("disznó (főnév) (A)").expect("A block missing");
    let b_line = text.find("disznó (főnév) (B)").expect("B block missing");
    assert!(a_line < b_line);
    // The example stays with the block rendered first in reading order,
    // which is stream order (B was read first).
    assert!(text.contains("disznó (főnév) (B)\nThe pig ran."));

    Ok(())
}

#[test]
fn test_index_offsets_and_collation() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let stream = write_stream(
        dir.path(),
        "senses.jsonl",
        &[
            r#"{"word":"zebra","meaning_hu":"zebra"}"#,
            r#"{"word":"apple","meaning_hu":"alma","example_surface_en":"An apple fell."}"#,
            r#"{"word":"Apple","meaning_hu":"Alma márka"}"#,
            r#"{"word":"ábra","meaning_hu":"figure"}"#,
            r#"{"word":"hen","meaning_hu":"tyúk"}"#,
        ],
    );

    let config = test_config(dir.path(), vec![SourceStream::new("default", &stream)], &[]);
    let summary = run(&config)?;

    let idx = fs::read(config.output_dir.join("eng-hun.idx"))?;
    let dict = fs::read(config.output_dir.join("eng-hun.dict"))?;
    assert_eq!(idx.len(), summary.idx_bytes);
    assert_eq!(dict.len(), summary.dict_bytes);

    let records = parse_idx(&idx);
    assert_eq!(records.len(), 5);

    // Collation: ASCII case-fold first, byte tie-break second, non-ASCII
    // after ASCII by raw byte value.
    let headwords: Vec<&str> = records.iter().map(|(h, _, _)| h.as_str()).collect();
    assert_eq!(headwords, ["Apple", "apple", "hen", "zebra", "ábra"]);
    for pair in records.windows(2) {
        assert_ne!(
            collate::compare(&pair[0].0, &pair[1].0),
            std::cmp::Ordering::Greater
        );
    }

    // Offsets start at zero, are contiguous, and span the data file.
    assert_eq!(records[0].1, 0);
    for pair in records.windows(2) {
        assert_eq!(pair[0].1 + pair[0].2, pair[1].1);
    }
    let total: u32 = records.iter().map(|(_, _, len)| len).sum();
    assert_eq!(total as usize, dict.len());

    // Each indexed range starts with the tagged headword.
    for (headword, offset, length) in &records {
        let payload = &dict[*offset as usize..(*offset + *length) as usize];
        let expected_prefix = format!("<k>{}</k>\n", headword);
        assert!(payload.starts_with(expected_prefix.as_bytes()));
    }

    Ok(())
}

#[test]
fn test_rebuild_is_byte_identical() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let stream = write_stream(
        dir.path(),
        "senses.jsonl",
        &[
            r#"{"word":"pig","meaning_hu":"disznó","example_surface_en":"The pig ran."}"#,
            r#"{"word":"hen","meaning_hu":"tyúk","example_lemma_en":"A hen clucks."}"#,
            r#"{"word":"brick","meaning_hu":"tégla"}"#,
        ],
    );

    let config = test_config(dir.path(), vec![SourceStream::new("default", &stream)], &[]);
    run(&config)?;
    let idx_first = fs::read(config.output_dir.join("eng-hun.idx"))?;
    let dict_first = fs::read(config.output_dir.join("eng-hun.dict"))?;

    // Second run with unchanged inputs fully regenerates the same bytes.
    run(&config)?;
    assert_eq!(fs::read(config.output_dir.join("eng-hun.idx"))?, idx_first);
    assert_eq!(fs::read(config.output_dir.join("eng-hun.dict"))?, dict_first);

    Ok(())
}

#[test]
fn test_example_dedup_across_sources() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let a = write_stream(
        dir.path(),
        "a.jsonl",
        &[r#"{"word":"hen","meaning_hu":"tyúk","example_surface_en":"The hens laid eggs."}"#],
    );
    let b = write_stream(
        dir.path(),
        "b.jsonl",
        &[r#"{"word":"hen","meaning_hu":"tojó","example_surface_en":"The hens laid eggs."}"#],
    );

    let config = test_config(
        dir.path(),
        vec![SourceStream::new("a", &a), SourceStream::new("b", &b)],
        &[],
    );
    run(&config)?;

    let dict = fs::read_to_string(config.output_dir.join("eng-hun.dict"))?;
    assert_eq!(dict.matches("The hens laid eggs.").count(), 1);
    // Both meaning lines survive; only the example was deduplicated.
    assert!(dict.contains("tyúk (a)"));
    assert!(dict.contains("tojó (b)"));

    Ok(())
}

#[test]
fn test_priority_orders_brick_blocks() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let gemma = write_stream(
        dir.path(),
        "gemma.jsonl",
        &[r#"{"word":"brick","meaning_hu":"téglakő"}"#],
    );
    let gpt = write_stream(
        dir.path(),
        "gpt.jsonl",
        &[r#"{"word":"brick","meaning_hu":"tégla"}"#],
    );

    // gemma is read first but ranks second.
    let config = test_config(
        dir.path(),
        vec![
            SourceStream::new("gemma3:27b", &gemma),
            SourceStream::new("GPT-5-mini", &gpt),
        ],
        &["GPT-5-mini", "gemma3:27b"],
    );
    run(&config)?;

    let dict = fs::read_to_string(config.output_dir.join("eng-hun.dict"))?;
    let gpt_pos = dict.find("tégla (GPT-5-mini)").expect("GPT block missing");
    let gemma_pos = dict.find("téglakő (gemma3:27b)").expect("gemma block missing");
    assert!(gpt_pos < gemma_pos);

    Ok(())
}

#[test]
fn test_invalid_records_never_reach_artifacts() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let stream = write_stream(
        dir.path(),
        "senses.jsonl",
        &[
            r#"{"word":"pig","meaning_hu":"disznó"}"#,
            r#"{"word":"ghost","meaning_hu":"szellem","example_surface_en":"A very unique ghost sentence.","ok":false}"#,
        ],
    );

    let config = test_config(dir.path(), vec![SourceStream::new("default", &stream)], &[]);
    let summary = run(&config)?;
    assert_eq!(summary.entries, 1);
    assert_eq!(summary.stats.invalid, 1);

    let dict = fs::read_to_string(config.output_dir.join("eng-hun.dict"))?;
    assert!(!dict.contains("ghost"));
    assert!(!dict.contains("A very unique ghost sentence."));

    let idx = fs::read(config.output_dir.join("eng-hun.idx"))?;
    let headwords: Vec<String> = parse_idx(&idx).into_iter().map(|(h, _, _)| h).collect();
    assert_eq!(headwords, ["pig"]);

    Ok(())
}

#[test]
fn test_missing_stream_tolerated_but_all_missing_fatal() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let present = write_stream(
        dir.path(),
        "present.jsonl",
        &[r#"{"word":"pig","meaning_hu":"disznó"}"#],
    );

    let config = test_config(
        dir.path(),
        vec![
            SourceStream::new("gone", dir.path().join("gone.jsonl")),
            SourceStream::new("here", &present),
        ],
        &[],
    );
    let summary = run(&config)?;
    assert_eq!(summary.entries, 1);
    assert_eq!(summary.stats.streams_missing, 1);

    let config = test_config(
        dir.path(),
        vec![SourceStream::new("gone", dir.path().join("gone.jsonl"))],
        &[],
    );
    let result = run(&config);
    assert!(result.is_err());
    assert!(result
        .unwrap_err()
        .to_string()
        .contains("no input data"));

    Ok(())
}

#[test]
fn test_ifo_descriptor_content() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let stream = write_stream(
        dir.path(),
        "senses.jsonl",
        &[
            r#"{"word":"pig","meaning_hu":"disznó"}"#,
            r#"{"word":"hen","meaning_hu":"tyúk"}"#,
        ],
    );

    let config = test_config(dir.path(), vec![SourceStream::new("default", &stream)], &[]);
    let summary = run(&config)?;

    let ifo = fs::read_to_string(config.output_dir.join("eng-hun.ifo"))?;
    let expected = format!(
        "StarDict's dict ifo file\n\
         version=2.4.2\n\
         wordcount=2\n\
         idxfilesize={}\n\
         bookname=English-Hungarian dictionary\n\
         date=2026.08.07\n\
         sametypesequence=x\n\
         description=Built from the Animal Farm word list.\n\
         encoding=UTF-8\n\
         \n\
         lang=en-hu\n",
        summary.idx_bytes
    );
    assert_eq!(ifo, expected);

    Ok(())
}

// ============================================================================
// Compression collaborator
// ============================================================================

struct RecordingCompressor;

impl Compressor for RecordingCompressor {
    fn compress(&self, dict_path: &Path) -> CompressionOutcome {
        CompressionOutcome::Compressed(dict_path.with_extension("dict.dz"))
    }
}

#[test]
fn test_compression_outcome_is_reported_not_required() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let stream = write_stream(
        dir.path(),
        "senses.jsonl",
        &[r#"{"word":"pig","meaning_hu":"disznó"}"#],
    );

    // An injected compressor sees the finished data file.
    let config = test_config(dir.path(), vec![SourceStream::new("default", &stream)], &[]);
    let summary = compile(&config, Some(&RecordingCompressor), fixed_date())?;
    match summary.compression {
        Some(CompressionOutcome::Compressed(path)) => {
            assert!(path.to_string_lossy().ends_with("eng-hun.dict.dz"));
        }
        other => panic!("expected Compressed outcome, got {:?}", other),
    }

    // A missing tool degrades to Unavailable and the run still succeeds,
    // with the uncompressed data file left in place.
    let missing = Dictzip::with_program("definitely-not-a-real-binary-9f2a");
    let summary = compile(&config, Some(&missing), fixed_date())?;
    assert_eq!(summary.compression, Some(CompressionOutcome::Unavailable));
    assert!(config.output_dir.join("eng-hun.dict").exists());

    Ok(())
}
