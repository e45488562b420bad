//! Spark Document Extraction
//!
//! Converts course documents into plain text, dispatched by file format.
//!
//! Every reader is fault-isolated: a document that cannot be read degrades to
//! empty text, and a format whose reader was compiled out (see the `pdf` and
//! `docx` cargo features) yields [`Extraction::Unavailable`], which renders as a
//! visible placeholder so educators know what to enable.
//!
//! # Example
//!
//! ```no_run
//! use spark_extract::{extract_text, Document};
//!
//! if let Some(document) = Document::from_path("course_materials/syllabus.md") {
//!     let text = extract_text(&document);
//!     println!("{text}");
//! }
//! ```

mod docx;
mod pdf;
mod text;

use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// File extensions (lowercase, without the dot) that have a reader.
pub const SUPPORTED_EXTENSIONS: [&str; 4] = ["txt", "md", "pdf", "docx"];

/// Errors raised inside a format reader.
///
/// These never escape [`extract`]; they are logged and the document degrades
/// to empty text.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The file could not be opened or read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The PDF reader rejected the file.
    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    /// The DOCX archive or its XML body could not be parsed.
    #[error("DOCX extraction failed: {0}")]
    Docx(String),

    /// The reader panicked while processing the file.
    #[error("reader aborted while processing the file")]
    ReaderPanicked,
}

/// Document formats Spark knows how to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    /// Plain text (`.txt`).
    PlainText,
    /// Markdown (`.md`).
    Markdown,
    /// Portable Document Format (`.pdf`).
    Pdf,
    /// Word document (`.docx`).
    Word,
}

impl DocumentFormat {
    /// Detects the format from a file extension, case-insensitively.
    ///
    /// Returns `None` for extensions without a reader.
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "txt" => Some(Self::PlainText),
            "md" => Some(Self::Markdown),
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Word),
            _ => None,
        }
    }

    /// Detects the format from a file path.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Short uppercase tag used in placeholder text.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::PlainText => "TXT",
            Self::Markdown => "MD",
            Self::Pdf => "PDF",
            Self::Word => "DOCX",
        }
    }

    /// Cargo feature that provides the reader for this format, if optional.
    #[must_use]
    pub const fn feature(self) -> Option<&'static str> {
        match self {
            Self::PlainText | Self::Markdown => None,
            Self::Pdf => Some("pdf"),
            Self::Word => Some("docx"),
        }
    }
}

impl std::fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PlainText => write!(f, "txt"),
            Self::Markdown => write!(f, "md"),
            Self::Pdf => write!(f, "pdf"),
            Self::Word => write!(f, "docx"),
        }
    }
}

/// A course document discovered on disk.
///
/// Identity is the absolute path. Content is read on demand and never cached.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Document {
    /// Absolute path to the file.
    pub path: PathBuf,
    /// File name including extension, e.g. `syllabus.pdf`.
    pub name: String,
    /// Format detected from the extension.
    pub format: DocumentFormat,
}

impl Document {
    /// Builds a document from a path if its extension is supported.
    ///
    /// The path is made absolute when possible so two references to the same
    /// file compare equal.
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();
        let format = DocumentFormat::from_path(path)?;
        let name = path.file_name()?.to_string_lossy().into_owned();
        let path = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());

        Some(Self { path, name, format })
    }
}

/// Outcome of extracting one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// Text was extracted (possibly empty).
    Text(String),
    /// The reader for this format is not compiled in.
    Unavailable {
        /// Format that could not be read.
        format: DocumentFormat,
    },
    /// The reader failed on this file.
    Failed,
}

impl Extraction {
    /// Renders the outcome as prompt text.
    ///
    /// Unavailable readers produce a placeholder naming the file; failures
    /// produce empty text.
    #[must_use]
    pub fn into_text(self, document: &Document) -> String {
        match self {
            Self::Text(text) => text,
            Self::Unavailable { format } => placeholder(format, &document.name),
            Self::Failed => String::new(),
        }
    }
}

/// Placeholder shown in place of a document whose reader is compiled out.
#[must_use]
pub fn placeholder(format: DocumentFormat, name: &str) -> String {
    format.feature().map_or_else(
        || format!("[{} file: {name} - no reader available]", format.tag()),
        |feature| {
            format!(
                "[{} file: {name} - enable the \"{feature}\" feature to read]",
                format.tag()
            )
        },
    )
}

/// A format reader: path in, text out.
type Reader = fn(&Path) -> Result<String, ExtractError>;

/// Strategy table from format to reader. `None` means compiled out.
fn reader_for(format: DocumentFormat) -> Option<Reader> {
    match format {
        DocumentFormat::PlainText | DocumentFormat::Markdown => Some(text::read as Reader),
        DocumentFormat::Pdf => pdf::READER,
        DocumentFormat::Word => docx::READER,
    }
}

/// Extracts a document, classifying the outcome.
///
/// Never panics and never returns an error: reader failures (including a
/// panic inside a third-party reader) become [`Extraction::Failed`].
pub fn extract(document: &Document) -> Extraction {
    let Some(reader) = reader_for(document.format) else {
        warn!(
            file = %document.name,
            format = %document.format,
            "No reader compiled in for this format, using placeholder"
        );
        return Extraction::Unavailable {
            format: document.format,
        };
    };

    let path = document.path.as_path();
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| reader(path)))
        .unwrap_or(Err(ExtractError::ReaderPanicked));

    match outcome {
        Ok(text) => {
            debug!(file = %document.name, chars = text.chars().count(), "Extracted document");
            Extraction::Text(text)
        }
        Err(e) => {
            warn!(path = %document.path.display(), error = %e, "Failed to read document");
            Extraction::Failed
        }
    }
}

/// Extracts a document straight to prompt text.
///
/// Equivalent to `extract(document).into_text(document)`.
pub fn extract_text(document: &Document) -> String {
    extract(document).into_text(document)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            DocumentFormat::from_extension("txt"),
            Some(DocumentFormat::PlainText)
        );
        assert_eq!(
            DocumentFormat::from_extension("MD"),
            Some(DocumentFormat::Markdown)
        );
        assert_eq!(
            DocumentFormat::from_extension("Pdf"),
            Some(DocumentFormat::Pdf)
        );
        assert_eq!(
            DocumentFormat::from_extension("DOCX"),
            Some(DocumentFormat::Word)
        );
        assert_eq!(DocumentFormat::from_extension("doc"), None);
        assert_eq!(DocumentFormat::from_extension("png"), None);
    }

    #[test]
    fn test_supported_extensions_all_have_formats() {
        for ext in SUPPORTED_EXTENSIONS {
            assert!(DocumentFormat::from_extension(ext).is_some(), "{ext}");
        }
    }

    #[test]
    fn test_document_from_path_rejects_unsupported() {
        assert!(Document::from_path("notes.rtf").is_none());
        assert!(Document::from_path("no_extension").is_none());

        let doc = Document::from_path("missing/Syllabus.PDF").unwrap();
        assert_eq!(doc.name, "Syllabus.PDF");
        assert_eq!(doc.format, DocumentFormat::Pdf);
    }

    #[test]
    fn test_extract_plain_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("policies.txt");
        std::fs::write(&path, "Late work loses 10% per day.").unwrap();

        let doc = Document::from_path(&path).unwrap();
        assert_eq!(
            extract(&doc),
            Extraction::Text("Late work loses 10% per day.".to_string())
        );
    }

    #[test]
    fn test_extract_missing_file_fails_softly() {
        let dir = tempfile::tempdir().unwrap();
        let doc = Document::from_path(dir.path().join("gone.md")).unwrap();

        assert_eq!(extract(&doc), Extraction::Failed);
        assert_eq!(extract_text(&doc), "");
    }

    #[test]
    fn test_placeholder_names_file_and_feature() {
        let text = placeholder(DocumentFormat::Pdf, "syllabus.pdf");
        assert_eq!(
            text,
            "[PDF file: syllabus.pdf - enable the \"pdf\" feature to read]"
        );

        let text = placeholder(DocumentFormat::Word, "rubric.docx");
        assert!(text.contains("rubric.docx"));
        assert!(text.contains("\"docx\""));
    }

    #[test]
    fn test_unavailable_renders_placeholder() {
        let doc = Document {
            path: PathBuf::from("/materials/handout.pdf"),
            name: "handout.pdf".to_string(),
            format: DocumentFormat::Pdf,
        };
        let text = Extraction::Unavailable {
            format: DocumentFormat::Pdf,
        }
        .into_text(&doc);

        assert!(text.starts_with("[PDF file: handout.pdf"));
    }

    #[test]
    fn test_format_serialization() {
        assert_eq!(
            serde_json::to_string(&DocumentFormat::Word).unwrap(),
            "\"word\""
        );
        assert_eq!(DocumentFormat::Word.to_string(), "docx");
    }

    #[cfg(not(feature = "pdf"))]
    #[test]
    fn test_pdf_without_feature_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("slides.pdf");
        std::fs::write(&path, b"%PDF-1.4").unwrap();

        let doc = Document::from_path(&path).unwrap();
        assert_eq!(
            extract(&doc),
            Extraction::Unavailable {
                format: DocumentFormat::Pdf
            }
        );
        assert!(extract_text(&doc).contains("slides.pdf"));
    }

    #[cfg(feature = "pdf")]
    #[test]
    fn test_corrupt_pdf_degrades_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        std::fs::write(&path, b"this is not a pdf at all").unwrap();

        let doc = Document::from_path(&path).unwrap();
        assert_eq!(extract(&doc), Extraction::Failed);
        assert_eq!(extract_text(&doc), "");
    }
}
