//! Writer for the textual `.ifo` descriptor.
//!
//! The descriptor is regenerated from scratch on every run. Its line layout
//! is fixed by the legacy format, including the blank line separating
//! `encoding=` from `lang=`; dictionary managers key on the first line to
//! recognize the file.

use chrono::NaiveDate;

use crate::constants::{IFO_ENCODING, IFO_MAGIC_LINE, IFO_VERSION, SAME_TYPE_SEQUENCE};

/// Everything that varies between descriptors.
#[derive(Debug, Clone)]
pub struct IfoFields<'a> {
    /// Number of headwords in the index.
    pub wordcount: usize,
    /// Byte size of the index file.
    pub idxfilesize: usize,
    pub bookname: &'a str,
    pub description: &'a str,
    pub lang: &'a str,
    /// Generation date, rendered as `YYYY.MM.DD`.
    pub date: NaiveDate,
}

/// Render the descriptor text.
pub fn render_ifo(fields: &IfoFields) -> String {
    let lines = [
        IFO_MAGIC_LINE.to_string(),
        format!("version={}", IFO_VERSION),
        format!("wordcount={}", fields.wordcount),
        format!("idxfilesize={}", fields.idxfilesize),
        format!("bookname={}", fields.bookname),
        format!("date={}", fields.date.format("%Y.%m.%d")),
        format!("sametypesequence={}", SAME_TYPE_SEQUENCE),
        format!("description={}", fields.description),
        format!("encoding={}", IFO_ENCODING),
        String::new(),
        format!("lang={}", fields.lang),
    ];
    let mut text = lines.join("\n");
    text.push('\n');
    text
}
