//! Constants for the StarDict output format, the entry grammar, and the
//! external compression tool.
//!
//! Centralizing these keeps the binary layout and the `.ifo` descriptor in
//! one place; downstream readers depend on the exact values.

// ============================================================================
// .ifo Descriptor
// ============================================================================

/// Fixed first line of every `.ifo` descriptor.
pub(crate) const IFO_MAGIC_LINE: &str = "StarDict's dict ifo file";

/// Format version advertised in the descriptor.
pub(crate) const IFO_VERSION: &str = "2.4.2";

/// Entry payload layout flag: `x` means one tagged text block per entry.
pub(crate) const SAME_TYPE_SEQUENCE: &str = "x";

/// Encoding label; all three artifacts are UTF-8.
pub(crate) const IFO_ENCODING: &str = "UTF-8";

// ============================================================================
// Entry Grammar
// ============================================================================

/// Opening tag wrapping the headword inside each data payload.
pub(crate) const KEY_OPEN_TAG: &str = "<k>";

/// Closing tag wrapping the headword inside each data payload.
pub(crate) const KEY_CLOSE_TAG: &str = "</k>";

/// Rendered for an entry whose every structured field is blank.
pub(crate) const EMPTY_HEADWORD_FALLBACK: &str = "<?>";

// ============================================================================
// Source Labels
// ============================================================================

/// Label assigned to a source stream that was not given one.
///
/// The default label participates in priority resolution like any other but
/// is never displayed inside rendered meaning lines.
pub const DEFAULT_SOURCE_LABEL: &str = "default";

// ============================================================================
// Compression
// ============================================================================

/// External tool invoked to compress the data file in place.
pub(crate) const DICTZIP_PROGRAM: &str = "dictzip";

/// Suffix dictzip appends to the data file name.
pub(crate) const DICT_DZ_SUFFIX: &str = ".dz";
