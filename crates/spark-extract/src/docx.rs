//! Word (`.docx`) reader, available with the `docx` feature.
//!
//! A `.docx` file is a zip archive; the body lives in `word/document.xml`.
//! Paragraph text is the concatenation of its `w:t` runs, and paragraphs are
//! joined with newlines.

use crate::Reader;

#[cfg(feature = "docx")]
pub(crate) const READER: Option<Reader> = Some(read as Reader);

#[cfg(not(feature = "docx"))]
pub(crate) const READER: Option<Reader> = None;

#[cfg(feature = "docx")]
const DOCUMENT_PART: &str = "word/document.xml";

#[cfg(feature = "docx")]
fn read(path: &std::path::Path) -> Result<String, crate::ExtractError> {
    use std::io::Read;

    use crate::ExtractError;

    let file = std::fs::File::open(path)?;
    let mut archive =
        zip::ZipArchive::new(file).map_err(|e| ExtractError::Docx(e.to_string()))?;

    let mut xml = String::new();
    archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| ExtractError::Docx(format!("{DOCUMENT_PART}: {e}")))?
        .read_to_string(&mut xml)?;

    paragraphs_from_xml(&xml)
}

/// Collects paragraph text from a WordprocessingML body.
#[cfg(feature = "docx")]
fn paragraphs_from_xml(xml: &str) -> Result<String, crate::ExtractError> {
    use quick_xml::events::Event;
    use quick_xml::Reader as XmlReader;

    use crate::ExtractError;

    let mut reader = XmlReader::from_str(xml);
    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut in_text = false;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| ExtractError::Docx(e.to_string()))?;

        match event {
            Event::Start(e) if e.local_name().as_ref() == b"t" => in_text = true,
            Event::End(e) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"p" => paragraphs.push(std::mem::take(&mut current)),
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"tab" => current.push('\t'),
                b"br" | b"cr" => current.push('\n'),
                b"p" => paragraphs.push(String::new()),
                _ => {}
            },
            Event::Text(t) if in_text => {
                let text = t.unescape().map_err(|e| ExtractError::Docx(e.to_string()))?;
                current.push_str(&text);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs.join("\n"))
}
