//! The individual rewrite passes of the normalization pipeline.
//!
//! Each pass is a pure, total function over its input. Passes only ever
//! delete characters, never insert them, which is what lets [`crate::normalize`]
//! iterate the pipeline to a fixed point.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Extensions stripped from `word.ext` tokens (compared case-insensitively).
pub const KNOWN_EXTENSIONS: [&str; 11] = [
    "txt", "md", "pdf", "docx", "py", "json", "csv", "html", "xml", "yml", "yaml",
];

/// A named stage of the pipeline.
#[derive(Debug, Clone, Copy)]
pub struct Pass {
    /// Short identifier used in trace logs.
    pub name: &'static str,
    /// The rewrite itself.
    pub apply: fn(&str) -> String,
}

/// All passes, in the order they must run.
pub const PIPELINE: [Pass; 6] = [
    Pass {
        name: "emphasis",
        apply: strip_emphasis,
    },
    Pass {
        name: "links",
        apply: unwrap_links,
    },
    Pass {
        name: "line_markers",
        apply: strip_line_markers,
    },
    Pass {
        name: "stray_markers",
        apply: strip_stray_markers,
    },
    Pass {
        name: "file_extensions",
        apply: strip_file_extensions,
    },
    Pass {
        name: "whitespace",
        apply: collapse_whitespace,
    },
];

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .filter_map(|pattern| Regex::new(pattern).ok())
        .collect()
}

// Order matters: doubled delimiters before single ones.
static PAIRED: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"\*\*(.+?)\*\*",
        r"__(.+?)__",
        r"\*(.+?)\*",
        r"_(.+?)_",
        r"`(.+?)`",
    ])
});

static LINK: Lazy<Vec<Regex>> = Lazy::new(|| compile(&[r"\[(.+?)\]\(.+?\)"]));

static LINE_MARKERS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"(?m)^[ \t]*#{1,6}\s+",
        r"(?m)^[ \t]*[-*+]\s+",
        r"(?m)^[ \t]*\d+\.\s+",
    ])
});

static STRAY: Lazy<Vec<Regex>> = Lazy::new(|| compile(&[r"[*#`]"]));

// No look-ahead in `regex`: the trailing delimiter is captured and put back.
static FILENAME: Lazy<Vec<Regex>> =
    Lazy::new(|| compile(&[r"(\w+)\.(\w{1,4})([\s,;:.)\]]|$)"]));

static SPACES: Lazy<Vec<Regex>> = Lazy::new(|| compile(&[r" {2,}"]));

fn replace_each(text: &str, rules: &[Regex], replacement: &str) -> String {
    rules.iter().fold(text.to_string(), |acc, re| {
        re.replace_all(&acc, replacement).into_owned()
    })
}

/// Returns `true` if `ext` is a recognized document extension.
#[must_use]
pub fn is_known_extension(ext: &str) -> bool {
    let ext = ext.to_lowercase();
    KNOWN_EXTENSIONS.contains(&ext.as_str())
}

/// Pass 1: `**x**`, `__x__`, `*x*`, `_x_` and `` `x` `` become `x`.
#[must_use]
pub fn strip_emphasis(text: &str) -> String {
    replace_each(text, &PAIRED, "${1}")
}

/// Pass 2: `[label](target)` becomes `label`.
#[must_use]
pub fn unwrap_links(text: &str) -> String {
    replace_each(text, &LINK, "${1}")
}

/// Pass 3: heading, bullet and numbered-list markers at line starts.
#[must_use]
pub fn strip_line_markers(text: &str) -> String {
    replace_each(text, &LINE_MARKERS, "")
}

/// Pass 4: any `*`, `#` or backtick left anywhere.
#[must_use]
pub fn strip_stray_markers(text: &str) -> String {
    replace_each(text, &STRAY, "")
}

/// Pass 5: `syllabus.pdf` becomes `syllabus` when followed by a delimiter.
///
/// Tokens whose suffix is not a known extension (`3.14`, `e.g`) are kept.
#[must_use]
pub fn strip_file_extensions(text: &str) -> String {
    FILENAME.iter().fold(text.to_string(), |acc, re| {
        re.replace_all(&acc, |caps: &Captures<'_>| {
            let group = |i| caps.get(i).map_or("", |m| m.as_str());
            if is_known_extension(group(2)) {
                format!("{}{}", group(1), group(3))
            } else {
                group(0).to_string()
            }
        })
        .into_owned()
    })
}

/// Pass 6: runs of spaces become one space; the ends are trimmed.
#[must_use]
pub fn collapse_whitespace(text: &str) -> String {
    replace_each(text, &SPACES, " ").trim().to_string()
}
