use std::sync::LazyLock;

use regex::Regex;

static DIGITS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+$").unwrap());
static WS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Text after the first `start` match, up to the first `end` match that
/// follows it. With `end_optional`, a missing end anchor runs to the end of
/// `text`; otherwise the region is `None`.
pub fn region_after<'a>(
    text: &'a str,
    start: &Regex,
    end: &Regex,
    end_optional: bool,
) -> Option<&'a str> {
    let from = start.find(text)?.end();
    let rest = &text[from..];
    match end.find(rest) {
        Some(m) => Some(&rest[..m.start()]),
        None if end_optional => Some(rest),
        None => None,
    }
}

/// Parse a line made only of ASCII digits.
pub fn digit_line(line: &str) -> Option<u32> {
    if DIGITS_RE.is_match(line) {
        line.parse().ok()
    } else {
        None
    }
}

pub fn collapse_whitespace(s: &str) -> String {
    WS_RE.replace_all(s.trim(), " ").into_owned()
}

/// Trimmed, non-empty lines.
pub fn content_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines().map(str::trim).filter(|l| !l.is_empty())
}

// ── Tests ──
