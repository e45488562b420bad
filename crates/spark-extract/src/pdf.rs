//! PDF reader, available with the `pdf` feature.

use crate::Reader;

#[cfg(feature = "pdf")]
pub(crate) const READER: Option<Reader> = Some(read as Reader);

#[cfg(not(feature = "pdf"))]
pub(crate) const READER: Option<Reader> = None;

/// Extracts the text of every page, in page order.
#[cfg(feature = "pdf")]
fn read(path: &std::path::Path) -> Result<String, crate::ExtractError> {
    pdf_extract::extract_text(path).map_err(|e| crate::ExtractError::Pdf(e.to_string()))
}
