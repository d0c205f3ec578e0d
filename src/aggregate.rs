//! Aggregates loaded sense records into per-headword dictionary entries.
//!
//! Every record renders to one [`DefinitionBlock`]; blocks for the same
//! headword are collected across all sources, deduplicated at the example
//! sentence level, and ordered by the configured source priority. A single
//! source is simply the one-element case of the same merge.

use std::collections::{HashMap, HashSet};

use crate::constants::{DEFAULT_SOURCE_LABEL, EMPTY_HEADWORD_FALLBACK};
use crate::loader::SenseRecord;

/// A fully rendered, human-readable text block for one sense record.
///
/// One meaning line, followed by zero or more example-sentence lines.
/// Invariant: never empty; when every structured field is blank the block
/// degrades to the bare headword text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionBlock {
    lines: Vec<String>,
}

impl DefinitionBlock {
    /// Render one record into a block.
    ///
    /// The meaning line is `"{meaning} ({pos_label}) ({source_label})"`,
    /// omitting either parenthesized field when absent; the default source
    /// label is never displayed. A blank meaning substitutes the headword.
    ///
    /// `seen_examples` is the per-headword deduplication set: an example is
    /// appended only if it was not rendered before for this headword, in any
    /// source. First occurrence wins; the comparison is case-sensitive on
    /// the literal rendered string.
    pub fn render(
        record: &SenseRecord,
        source_label: &str,
        seen_examples: &mut HashSet<String>,
    ) -> Self {
        let mut lines = Vec::new();
        let headword = record.headword();

        let meaning = record.meaning.trim();
        let meaning = if meaning.is_empty() { headword } else { meaning };
        if !meaning.is_empty() {
            let mut line = meaning.to_string();
            if let Some(pos) = record
                .pos_label
                .as_deref()
                .map(str::trim)
                .filter(|p| !p.is_empty())
            {
                line.push_str(&format!(" ({})", pos));
            }
            if source_label != DEFAULT_SOURCE_LABEL {
                line.push_str(&format!(" ({})", source_label));
            }
            lines.push(line);
        }

        for example in [record.example_surface.trim(), record.example_lemma.trim()] {
            if example.is_empty() {
                continue;
            }
            if seen_examples.insert(example.to_string()) {
                lines.push(example.to_string());
            }
        }

        if lines.is_empty() {
            let fallback = if headword.is_empty() {
                EMPTY_HEADWORD_FALLBACK
            } else {
                headword
            };
            lines.push(fallback.to_string());
        }

        DefinitionBlock { lines }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

/// The unit keyed by headword after aggregation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictionaryEntry {
    pub headword: String,
    /// Blocks in source-priority order, then insertion order.
    pub blocks: Vec<DefinitionBlock>,
}

impl DictionaryEntry {
    /// The multi-block definition text: blocks joined by one blank line.
    pub fn definition_text(&self) -> String {
        self.blocks
            .iter()
            .map(DefinitionBlock::text)
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

#[derive(Default)]
struct EntryState {
    seen_examples: HashSet<String>,
    blocks: Vec<(usize, DefinitionBlock)>,
}

/// Group records by headword and merge them into dictionary entries.
///
/// `labels[i]` is the source label of stream `i` (as produced by the
/// loader); `priority` is the ordered list of labels that decides block
/// order within an entry. Labels not in the list sort after all ranked
/// ones, keeping their encounter order. Entries come back in first
/// encounter order; the caller applies the canonical collation.
pub fn aggregate(
    records: &[(SenseRecord, usize)],
    labels: &[String],
    priority: &[String],
) -> Vec<DictionaryEntry> {
    let rank_of = |label: &str| {
        priority
            .iter()
            .position(|p| p == label)
            .unwrap_or(usize::MAX)
    };

    let mut encounter_order = Vec::new();
    let mut states: HashMap<String, EntryState> = HashMap::new();

    for (record, stream_idx) in records {
        let headword = record.headword();
        if headword.is_empty() {
            continue;
        }
        let label = labels
            .get(*stream_idx)
            .map(String::as_str)
            .unwrap_or(DEFAULT_SOURCE_LABEL);

        if !states.contains_key(headword) {
            encounter_order.push(headword.to_string());
            states.insert(headword.to_string(), EntryState::default());
        }
        let state = states.get_mut(headword).unwrap();
        let block = DefinitionBlock::render(record, label, &mut state.seen_examples);
        state.blocks.push((rank_of(label), block));
    }

    encounter_order
        .into_iter()
        .map(|headword| {
            let mut state = states.remove(&headword).unwrap();
            // Stable sort: equal ranks keep insertion order.
            state.blocks.sort_by_key(|(rank, _)| *rank);
            DictionaryEntry {
                headword,
                blocks: state.blocks.into_iter().map(|(_, b)| b).collect(),
            }
        })
        .collect()
}
