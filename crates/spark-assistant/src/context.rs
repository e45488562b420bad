//! Context assembly: course materials packed into a bounded prompt block.
//!
//! Documents for the active mode are extracted in resolution order, each
//! becoming a section headed `--- <file name> ---`. Sections are joined with a
//! blank line until the character budget is reached, at which point the block
//! ends with [`TRUNCATION_MARKER`] and no further documents are read.

use std::path::Path;

use spark_extract::{extract_text, Document};
use tracing::debug;

use crate::materials;
use crate::mode::Mode;

/// Maximum length of a context block, in characters.
pub const MAX_CONTEXT_CHARS: usize = 12_000;

/// A partially fitting section is kept only if more than this many of its
/// characters fit.
pub const MIN_PARTIAL_CHARS: usize = 100;

/// Appended when the block was cut short.
pub const TRUNCATION_MARKER: &str = "\n[...truncated]";

const SECTION_SEPARATOR: &str = "\n\n";

/// Builds the context block for `mode` from the materials under `root`.
///
/// Returns an empty string when no document yields text.
#[must_use]
pub fn assemble(root: &Path, mode: Mode) -> String {
    let documents = materials::resolve(root, mode);
    let count = documents.len();
    let block = join_within_budget(documents.iter().filter_map(section), MAX_CONTEXT_CHARS);

    debug!(mode = %mode, documents = count, chars = block.chars().count(), "Assembled context");
    block
}

/// Wraps the context block for `mode` with guidance for the model.
///
/// With no usable materials the wrapper tells the model so, and asks it to
/// let students know course documents are not available yet.
#[must_use]
pub fn teaching_context(root: &Path, mode: Mode) -> String {
    wrap(mode, &assemble(root, mode))
}

pub(crate) fn wrap(mode: Mode, block: &str) -> String {
    let label = mode.label();
    if block.is_empty() {
        format!(
            "COURSE MATERIALS ({label}):\n\
             No materials loaded. The educator hasn't added documents yet.\n\
             Answer general questions using your training knowledge,\n\
             but let the student know that specific course materials aren't available yet."
        )
    } else {
        format!(
            "COURSE MATERIALS ({label}):\n\
             The following documents have been provided by the educator.\n\
             Use ONLY this information to answer questions. If the answer isn't\n\
             in the materials, say so honestly.\n\n\
             {block}"
        )
    }
}

fn section(document: &Document) -> Option<String> {
    let text = extract_text(document);
    let body = text.trim();
    if body.is_empty() {
        debug!(file = %document.name, "Skipping document with no text");
        return None;
    }
    Some(format!("--- {} ---\n{body}", document.name))
}

/// Joins `sections` with blank lines, keeping the result within `budget`
/// characters.
///
/// The iterator is only advanced until the budget is exhausted.
pub(crate) fn join_within_budget<I>(sections: I, budget: usize) -> String
where
    I: IntoIterator<Item = String>,
{
    let marker_len = TRUNCATION_MARKER.chars().count();
    let separator_len = SECTION_SEPARATOR.chars().count();

    let mut block = String::new();
    let mut len = 0;

    for section in sections {
        let separator = if block.is_empty() { 0 } else { separator_len };
        let section_len = section.chars().count();

        if len + separator + section_len <= budget {
            if separator > 0 {
                block.push_str(SECTION_SEPARATOR);
            }
            block.push_str(&section);
            len += separator + section_len;
            continue;
        }

        let room = budget.saturating_sub(len + separator + marker_len);
        if room > MIN_PARTIAL_CHARS {
            if separator > 0 {
                block.push_str(SECTION_SEPARATOR);
            }
            block.extend(section.chars().take(room));
            len += separator + room;
        } else if len + marker_len > budget {
            len = budget.saturating_sub(marker_len);
            truncate_chars(&mut block, len);
        }

        block.push_str(TRUNCATION_MARKER);
        truncate_chars(&mut block, budget);
        return block;
    }

    block
}

fn truncate_chars(text: &mut String, max_chars: usize) {
    if let Some((byte_index, _)) = text.char_indices().nth(max_chars) {
        text.truncate(byte_index);
    }
}
