use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use bookdict::{
    compile, config, CompileConfig, CompileSummary, CompressionOutcome, Compressor, Dictzip,
    SourceStream, DEFAULT_SOURCE_LABEL,
};

// --- CLI CONFIGURATION ---

#[derive(Parser)]
#[command(name = "bookdict")]
#[command(about = "Compile per-word sense records into a StarDict dictionary")]
#[command(
    long_about = "Bookdict: the final stage of a book-to-dictionary pipeline. Takes one or
more JSONL streams of per-word sense records (word, lemma, part of speech,
gloss, example sentences), merges them per headword, and writes the
.idx/.dict/.ifo artifact triple that StarDict-compatible readers install
directly.

WORKFLOW:
  1. Generate sense records upstream (one JSONL stream per model)
  2. Compile:   bookdict build -i gpt=senses_gpt.jsonl -o dist -b eng-hun

INPUT FORMAT:
  One JSON object per line. Records with \"valid\": false (or \"ok\": false in
  the upstream key set) are dropped; repeated example sentences for the same
  headword are kept once; multiple streams merge in source-priority order.

OUTPUT:
  {basename}.idx   headwords + byte ranges, in canonical collation order
  {basename}.dict  entry payloads, <k>headword</k> + definition text
  {basename}.ifo   textual descriptor (counts, sizes, metadata)
  {basename}.dict.dz  companion file when dictzip is installed"
)]
#[command(after_help = "EXAMPLES:
  # Single source, default label
  bookdict build -i senses.jsonl -o dist -b eng-hun --title \"English-Hungarian\"

  # Two models, GPT output preferred on conflicts
  bookdict build -i GPT-5-mini=gpt.jsonl -i gemma3:27b=gemma.jsonl \\
      --priority GPT-5-mini --priority gemma3:27b -o dist -b eng-hun

  # Everything from a build file
  bookdict build-config release.toml")]
struct Cli {
    /// Enable verbose progress output with timestamps
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build dictionary artifacts from JSONL sense-record streams
    Build {
        /// Input stream as LABEL=PATH; a bare PATH gets the default label.
        /// Can specify multiple times: -i gpt=a.jsonl -i gemma=b.jsonl
        #[arg(short, long = "input", required = true)]
        input: Vec<String>,

        /// Output directory for the artifact set (created if missing)
        #[arg(short, long)]
        output: PathBuf,

        /// Base filename: artifacts are {basename}.idx/.dict/.ifo
        #[arg(short, long)]
        basename: String,

        /// Source labels in priority order, highest first.
        /// Unlisted labels rank after all listed ones, in input order.
        #[arg(short, long)]
        priority: Vec<String>,

        /// Dictionary title for the descriptor
        #[arg(long, default_value = "Untitled dictionary")]
        title: String,

        /// Free-text description for the descriptor
        #[arg(long, default_value = "")]
        description: String,

        /// Language-pair code for the descriptor, e.g. en-hu
        #[arg(long, default_value = "en")]
        lang: String,

        /// Skip the dictzip post-compression step
        #[arg(long)]
        no_compress: bool,
    },

    /// Build from a TOML build file
    BuildConfig {
        /// Path to the build file; relative paths inside it resolve
        /// against its directory
        config: PathBuf,

        /// Skip the dictzip post-compression step
        #[arg(long)]
        no_compress: bool,
    },
}

// --- MAIN EXECUTION ---

fn main() -> Result<()> {
    let cli = Cli::parse();
    bookdict::init_logger(cli.verbose);

    match cli.command {
        Commands::Build {
            input,
            output,
            basename,
            priority,
            title,
            description,
            lang,
            no_compress,
        } => {
            let sources = parse_input_args(&input)?;
            for label in &priority {
                if !sources.iter().any(|s| &s.label == label) {
                    log::warn!("Priority label '{}' matches no input stream", label);
                }
            }
            let config = CompileConfig {
                sources,
                priority,
                output_dir: output,
                basename,
                title,
                description,
                lang,
            };
            run_compile(&config, no_compress)
        }

        Commands::BuildConfig {
            config: path,
            no_compress,
        } => {
            let build = config::parse_build_file(&path)?;
            let build_dir = path.parent().unwrap_or_else(|| std::path::Path::new("."));
            let config = config::to_compile_config(build, build_dir);
            run_compile(&config, no_compress)
        }
    }
}

fn run_compile(config: &CompileConfig, no_compress: bool) -> Result<()> {
    let dictzip = Dictzip::new();
    let compressor: Option<&dyn Compressor> = if no_compress { None } else { Some(&dictzip) };
    let today = chrono::Local::now().date_naive();

    let summary = compile(config, compressor, today)
        .with_context(|| format!("Failed to compile dictionary '{}'", config.basename))?;

    report_summary(config, &summary);
    Ok(())
}

/// Parse `LABEL=PATH` input arguments; a bare path gets the default label.
fn parse_input_args(raw: &[String]) -> Result<Vec<SourceStream>> {
    let mut sources = Vec::with_capacity(raw.len());
    for arg in raw {
        let stream = match arg.split_once('=') {
            Some((label, path)) if !label.is_empty() && !path.is_empty() => {
                SourceStream::new(label, path)
            }
            Some(_) => return Err(anyhow!("Invalid input argument '{}': expected LABEL=PATH", arg)),
            None => SourceStream::new(DEFAULT_SOURCE_LABEL, arg.as_str()),
        };
        if sources.iter().any(|s: &SourceStream| s.label == stream.label) {
            return Err(anyhow!("Duplicate source label '{}'", stream.label));
        }
        sources.push(stream);
    }
    Ok(sources)
}

fn report_summary(config: &CompileConfig, summary: &CompileSummary) {
    println!(
        "Compiled {} entries into {}",
        summary.entries,
        config.output_dir.display()
    );
    println!(
        "  records: {} considered, {} rendered, {} malformed, {} invalid, {} blank",
        summary.stats.lines_read,
        summary.stats.loaded,
        summary.stats.malformed,
        summary.stats.invalid,
        summary.stats.blank
    );
    if summary.stats.streams_missing > 0 {
        println!(
            "  WARNING: {} source stream(s) could not be read",
            summary.stats.streams_missing
        );
    }
    println!(
        "  index: {} bytes, data: {} bytes",
        summary.idx_bytes, summary.dict_bytes
    );

    let base = config.output_dir.join(&config.basename);
    println!("  {}.ifo", base.display());
    println!("  {}.idx", base.display());
    match &summary.compression {
        Some(CompressionOutcome::Compressed(path)) => println!("  {}", path.display()),
        _ => println!("  {}.dict", base.display()),
    }
}

// --- UNIT TESTS ---
