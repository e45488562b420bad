//! Course materials discovery.
//!
//! Materials live under one root directory. FAQ mode reads the top-level files
//! only; the other modes read their own subdirectory recursively. Nothing is
//! cached: every call walks the filesystem again, which is what makes reload
//! a no-op beyond re-reading.

use std::path::Path;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use spark_extract::Document;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::mode::Mode;

/// Instructional file kept at the root for educators, never fed to the model.
const RESERVED_README: &str = "readme.md";

/// Lists the documents that belong to `mode`, sorted by file name.
///
/// A missing root or subdirectory yields an empty list.
#[must_use]
pub fn resolve(root: &Path, mode: Mode) -> Vec<Document> {
    if !root.is_dir() {
        warn!(path = %root.display(), "Course materials directory not found");
        return Vec::new();
    }

    let mut documents = match mode.subdirectory() {
        None => top_level_documents(root),
        Some(subdir) => {
            let target = root.join(subdir);
            if !target.is_dir() {
                info!(mode = %mode, path = %target.display(), "Materials subdirectory not found");
                return Vec::new();
            }
            walk(WalkDir::new(&target).min_depth(1))
        }
    };

    documents.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.path.cmp(&b.path)));
    documents
}

fn top_level_documents(root: &Path) -> Vec<Document> {
    walk(WalkDir::new(root).min_depth(1).max_depth(1))
        .into_iter()
        .filter(|doc| !doc.name.eq_ignore_ascii_case(RESERVED_README))
        .collect()
}

fn walk(walker: WalkDir) -> Vec<Document> {
    walker
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                debug!(error = %e, "Skipping unreadable materials entry");
                None
            }
        })
        .filter(|entry| entry.path().is_file())
        .filter_map(|entry| Document::from_path(entry.path()))
        .collect()
}

/// File names of the documents for `mode`, in resolution order.
#[must_use]
pub fn file_names(root: &Path, mode: Mode) -> Vec<String> {
    resolve(root, mode).into_iter().map(|doc| doc.name).collect()
}

/// The files available to one mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeMaterials {
    /// Mode the files belong to.
    pub mode: Mode,
    /// File names in resolution order.
    pub files: Vec<String>,
}

/// Per-mode file listing, in mode display order.
///
/// Serializes as a JSON object keyed by mode, e.g.
/// `{"faq": ["syllabus.md"], "assignment": [], "lecture": []}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaterialsSummary {
    entries: Vec<ModeMaterials>,
}

impl MaterialsSummary {
    /// Files listed for `mode` (empty if none).
    #[must_use]
    pub fn files(&self, mode: Mode) -> &[String] {
        self.entries
            .iter()
            .find(|entry| entry.mode == mode)
            .map(|entry| entry.files.as_slice())
            .unwrap_or_default()
    }

    /// Iterates over the modes in display order.
    pub fn iter(&self) -> impl Iterator<Item = &ModeMaterials> {
        self.entries.iter()
    }

    /// Total number of files across every mode.
    #[must_use]
    pub fn total_files(&self) -> usize {
        self.entries.iter().map(|entry| entry.files.len()).sum()
    }
}

impl Serialize for MaterialsSummary {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(entry.mode.key(), &entry.files)?;
        }
        map.end()
    }
}

/// Re-reads the materials root and lists the files of every mode.
///
/// Logs one line per mode. Calling it twice with no filesystem change gives
/// the same result.
#[must_use]
pub fn summary(root: &Path) -> MaterialsSummary {
    let entries = Mode::ALL
        .into_iter()
        .map(|mode| {
            let files = file_names(root, mode);
            info!(mode = %mode, files = files.len(), names = ?files, "Course materials");
            ModeMaterials { mode, files }
        })
        .collect();

    MaterialsSummary { entries }
}
