//! Spark Voice Text Normalization
//!
//! Turns generated text into voice-safe text: markdown emphasis, links, list
//! and heading markers, stray symbols and file extensions are stripped so the
//! speech synthesizer reads plain sentences.
//!
//! The transformation is an ordered pipeline of pure passes (see [`passes`]).
//! It is stateless and cheap, meant to run once per streamed fragment.
//!
//! # Example
//!
//! ```rust
//! use spark_voice::{normalize, normalize_fragment};
//!
//! assert_eq!(
//!     normalize("**bold** and *italic* and `code`"),
//!     "bold and italic and code"
//! );
//! assert_eq!(normalize("Check syllabus.pdf for details."), "Check syllabus for details.");
//! assert_eq!(normalize_fragment("## "), None);
//! ```

pub mod passes;

use futures::future;
use futures::{Stream, StreamExt};
use tracing::trace;

use crate::passes::PIPELINE;

fn run_pipeline(text: &str) -> String {
    PIPELINE.iter().fold(text.to_string(), |acc, pass| {
        let next = (pass.apply)(&acc);
        if next != acc {
            trace!(pass = pass.name, before = acc.len(), after = next.len(), "Rewrote text");
        }
        next
    })
}

/// Normalizes text for speech synthesis.
///
/// Runs the passes in order, then repeats the whole pipeline until the
/// output stops changing. Every pass only removes characters, so this
/// terminates, and `normalize(normalize(x)) == normalize(x)` for any `x`.
#[must_use]
pub fn normalize(text: &str) -> String {
    let mut current = run_pipeline(text);
    loop {
        let next = run_pipeline(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

/// Normalizes one outbound fragment, dropping it if nothing speakable remains.
#[must_use]
pub fn normalize_fragment(fragment: &str) -> Option<String> {
    let cleaned = normalize(fragment);
    if cleaned.is_empty() {
        trace!(len = fragment.len(), "Dropped fragment with no speakable text");
        None
    } else {
        Some(cleaned)
    }
}

/// Adapts a stream of generated fragments into voice-safe fragments.
///
/// Fragments that normalize to nothing are removed from the stream.
pub fn voice_safe<S>(fragments: S) -> impl Stream<Item = String>
where
    S: Stream<Item = String>,
{
    fragments.filter_map(|fragment| future::ready(normalize_fragment(&fragment)))
}
