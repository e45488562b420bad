//! Plain text and markdown reader.

use std::path::Path;

use crate::ExtractError;

/// Reads the file as UTF-8, replacing undecodable bytes with U+FFFD.
pub(crate) fn read(path: &Path) -> Result<String, ExtractError> {
    let bytes = std::fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_utf8_is_replaced_not_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.md");
        std::fs::write(&path, [b'o', b'k', 0xFF, 0xFE, b'!']).unwrap();

        let text = read(&path).unwrap();
        assert!(text.starts_with("ok"));
        assert!(text.ends_with('!'));
        assert!(text.contains('\u{FFFD}'));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = read(Path::new("/nonexistent/spark/notes.txt"));
        assert!(matches!(result, Err(ExtractError::Io(_))));
    }
}
