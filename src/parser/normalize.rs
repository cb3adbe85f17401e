use crate::source::PageText;

pub const PAGE_SEPARATOR: &str = "\n\n";

/// Join page texts into one document. Pages without text are skipped rather
/// than left as empty placeholders.
pub fn normalize<I>(pages: I) -> String
where
    I: IntoIterator<Item = PageText>,
{
    pages
        .into_iter()
        .filter_map(|(_, text)| text)
        .map(|text| text.replace("\r\n", "\n"))
        .collect::<Vec<_>>()
        .join(PAGE_SEPARATOR)
}

// ── Tests ──
