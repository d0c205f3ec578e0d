//! TOML build-file parsing and validation.
//!
//! A build file describes one dictionary release: where the source streams
//! live, how to rank them, where the artifacts go, and the descriptor
//! metadata. Relative paths are resolved against the directory containing
//! the build file.

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::compile::CompileConfig;
use crate::constants::DEFAULT_SOURCE_LABEL;
use crate::loader::SourceStream;

#[derive(Debug, Deserialize)]
pub struct BuildFile {
    pub output: OutputSettings,
    #[serde(default)]
    pub metadata: MetadataSettings,
    pub sources: Vec<SourceEntry>,
    /// Source labels in priority order; defaults to declaration order.
    #[serde(default)]
    pub priority: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct OutputSettings {
    pub dir: PathBuf,
    pub basename: String,
}

#[derive(Debug, Deserialize)]
pub struct MetadataSettings {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_lang")]
    pub lang: String,
}

impl Default for MetadataSettings {
    fn default() -> Self {
        Self {
            title: default_title(),
            description: String::new(),
            lang: default_lang(),
        }
    }
}

fn default_title() -> String {
    "Untitled dictionary".to_string()
}

fn default_lang() -> String {
    "en".to_string()
}

#[derive(Debug, Deserialize)]
pub struct SourceEntry {
    #[serde(default = "default_label")]
    pub label: String,
    pub path: PathBuf,
}

fn default_label() -> String {
    DEFAULT_SOURCE_LABEL.to_string()
}

/// Parse and structurally validate a build file.
pub fn parse_build_file(path: &Path) -> Result<BuildFile> {
    let contents = fs::read_to_string(path)
        .context(format!("Failed to read build file: {}", path.display()))?;

    let build: BuildFile = toml::from_str(&contents).context("Failed to parse TOML build file")?;

    if build.sources.is_empty() {
        return Err(anyhow!("Build file must declare at least one [[sources]] entry"));
    }

    for (i, source) in build.sources.iter().enumerate() {
        if build.sources[..i].iter().any(|s| s.label == source.label) {
            return Err(anyhow!("Duplicate source label '{}'", source.label));
        }
    }

    for label in &build.priority {
        if !build.sources.iter().any(|s| &s.label == label) {
            return Err(anyhow!(
                "Priority entry '{}' does not match any declared source label",
                label
            ));
        }
    }

    Ok(build)
}

/// Resolve a possibly relative path against a base directory.
pub fn resolve_path(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

/// Turn a parsed build file into a compile configuration, resolving all
/// paths against `build_dir` (the build file's directory).
pub fn to_compile_config(build: BuildFile, build_dir: &Path) -> CompileConfig {
    let sources = build
        .sources
        .into_iter()
        .map(|s| SourceStream::new(s.label, resolve_path(build_dir, &s.path)))
        .collect();

    CompileConfig {
        sources,
        priority: build.priority,
        output_dir: resolve_path(build_dir, &build.output.dir),
        basename: build.output.basename,
        title: build.metadata.title,
        description: build.metadata.description,
        lang: build.metadata.lang,
    }
}
