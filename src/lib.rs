//! bookdict: compile per-word bilingual sense records into an installable
//! StarDict dictionary.
//!
//! The crate is the final stage of a book-to-dictionary pipeline: upstream
//! stages extract text, collect word contexts, and ask language models for
//! glosses; this crate takes their JSONL sense-record streams and produces
//! the `.idx`/`.dict`/`.ifo` artifact triple a dictionary reader consumes
//! directly.
//!
//! Pipeline: [`loader`] reads and filters the streams, [`aggregate`] merges
//! records per headword (deduplicating examples and ranking sources),
//! [`collate`] defines the canonical index order, [`compile`] serializes
//! the binary artifacts and [`metadata`] the descriptor, and [`compress`]
//! optionally hands the data file to dictzip. The whole run is sequential
//! and rebuilds every artifact from scratch.

pub mod aggregate;
pub mod collate;
pub mod compile;
pub mod compress;
pub mod config;
pub mod constants;
pub mod error;
pub mod loader;
pub mod logging;
pub mod metadata;
pub mod types;

pub use aggregate::{aggregate, DefinitionBlock, DictionaryEntry};
pub use compile::{compile, compile_entries, CompileConfig, CompiledArtifacts};
pub use compress::{CompressionOutcome, Compressor, Dictzip};
pub use constants::DEFAULT_SOURCE_LABEL;
pub use error::{DictError, Result};
pub use loader::{load_records, SenseRecord, SourceStream};
pub use logging::init_logger;
pub use metadata::{render_ifo, IfoFields};
pub use types::{CompileSummary, LoadStats};
