use std::path::Path;

use lopdf::Document;
use tracing::{info, warn};

use crate::error::{ExtractError, Result};

/// Per-page text as produced by a page-text extractor. `None` marks a page
/// whose extraction failed.
pub type PageText = (usize, Option<String>);

/// Open a PDF and return a lazy iterator of `(page_index, text)`.
///
/// Opening the file is fatal; a single page failing to extract is not.
pub fn pdf_pages(path: &Path) -> Result<impl Iterator<Item = PageText>> {
    let doc = Document::load(path).map_err(|source| match source {
        lopdf::Error::IO(source) => ExtractError::InputUnavailable {
            path: path.to_path_buf(),
            source,
        },
        source => ExtractError::Pdf {
            path: path.to_path_buf(),
            source,
        },
    })?;
    let page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();
    info!("Opened {:?} ({} pages)", path, page_numbers.len());

    Ok(page_numbers
        .into_iter()
        .enumerate()
        .map(move |(idx, page_no)| match doc.extract_text(&[page_no]) {
            Ok(text) => (idx, Some(text)),
            Err(e) => {
                warn!("Could not extract text from page {}: {}", idx + 1, e);
                (idx, None)
            }
        }))
}

/// Read an already-extracted text document as a single page.
pub fn text_file(path: &Path) -> Result<Vec<PageText>> {
    let text = std::fs::read_to_string(path).map_err(|source| ExtractError::InputUnavailable {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(vec![(0, Some(text))])
}

/// Pick the page source by file extension.
pub fn open(path: &Path) -> Result<Vec<PageText>> {
    let is_pdf = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"));
    if is_pdf {
        Ok(pdf_pages(path)?.collect())
    } else {
        text_file(path)
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_text_file_is_input_unavailable() {
        let err = open(Path::new("no/such/syllabus.txt")).unwrap_err();
        assert!(matches!(err, ExtractError::InputUnavailable { .. }));
    }

    #[test]
    fn missing_pdf_is_fatal() {
        assert!(open(Path::new("no/such/syllabus.PDF")).is_err());
    }

    #[test]
    fn text_file_is_one_page() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.txt");
        std::fs::write(&path, "SEMESTER S3\nகணிதம்").unwrap();
        let pages = open(&path).unwrap();
        assert_eq!(pages, vec![(0, Some("SEMESTER S3\nகணிதம்".to_string()))]);
    }
}
