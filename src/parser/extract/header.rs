use std::sync::LazyLock;

use regex::Regex;

use crate::parser::sections::BoundaryMarker;
use crate::record::TeachingHours;

static CODE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)Course Code\s+([A-Z]+\d+)").unwrap());
static CIE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)CIE Marks\s+(\d+)").unwrap());
static ESE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)ESE Marks\s+(\d+)").unwrap());
static CREDITS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)Credits\s+(\d+)").unwrap());
static HOURS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)Teaching Hours/Week.{0,80}?((?:\d+\s*:\s*)+\d+)").unwrap()
});
static EXAM_HOURS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Exam Hours\s+([^\n]+)").unwrap());
static PREREQ_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Prerequisites \(if any\)\s+([^\n]+)").unwrap());
static COURSE_TYPE_LABEL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)Course Type").unwrap());
static COURSE_TYPE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Course Type\s+([^\n]+)").unwrap());
static GROUP_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\(([^)]+)\)$").unwrap());

const MIN_TITLE_CHARS: usize = 6;

/// Header fields found in a section. Anything unmatched keeps its zero value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Header {
    pub course_code: String,
    pub semester: String,
    pub title: String,
    pub group: String,
    pub cie_marks: u32,
    pub ese_marks: u32,
    pub credits: u32,
    pub teaching_hours: TeachingHours,
    pub exam_hours: String,
    pub prerequisites: String,
    pub course_type: String,
}

pub fn extract(section: &str, marker: &BoundaryMarker, scan_lines: usize) -> Header {
    let (title, group) = title_and_group(section, marker, scan_lines);
    Header {
        course_code: capture(&CODE_RE, section).unwrap_or_default(),
        semester: marker.identifier(section).unwrap_or_default().to_string(),
        title: title.unwrap_or_default(),
        group: group.unwrap_or_default(),
        cie_marks: number(&CIE_RE, section),
        ese_marks: number(&ESE_RE, section),
        credits: number(&CREDITS_RE, section),
        teaching_hours: teaching_hours(section),
        exam_hours: capture(&EXAM_HOURS_RE, section).unwrap_or_default(),
        prerequisites: prerequisites(section),
        course_type: capture(&COURSE_TYPE_RE, section).unwrap_or_default(),
    }
}

fn capture(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .map(|c| c[1].trim().to_string())
        .filter(|s| !s.is_empty())
}

fn number(re: &Regex, text: &str) -> u32 {
    re.captures(text)
        .and_then(|c| c[1].parse().ok())
        .unwrap_or(0)
}

/// The first non-empty line after the marker line, within the first
/// `scan_lines` lines. A trailing `(…)` is the group. Titles under six
/// characters are stray lines, not titles.
pub fn title_and_group(
    section: &str,
    marker: &BoundaryMarker,
    scan_lines: usize,
) -> (Option<String>, Option<String>) {
    let lines: Vec<&str> = section.lines().take(scan_lines).collect();
    let Some(marker_idx) = lines.iter().position(|l| marker.is_match(l)) else {
        return (None, None);
    };
    let Some(raw) = lines[marker_idx + 1..]
        .iter()
        .map(|l| l.trim())
        .find(|l| !l.is_empty())
    else {
        return (None, None);
    };

    let group = GROUP_RE.captures(raw).map(|c| c[1].trim().to_string());
    let title = GROUP_RE.replace(raw, "").trim().to_string();
    let title = (title.chars().count() >= MIN_TITLE_CHARS).then_some(title);
    (title, group)
}

/// `L:T:P:R` after the label. Any shape other than four fields is ignored.
pub fn teaching_hours(section: &str) -> TeachingHours {
    let Some(caps) = HOURS_RE.captures(section) else {
        return TeachingHours::default();
    };
    let fields: Vec<u32> = caps[1]
        .split(':')
        .filter_map(|f| f.trim().parse().ok())
        .collect();
    match fields.as_slice() {
        &[lecture, tutorial, practical, research] => TeachingHours {
            lecture,
            tutorial,
            practical,
            research,
        },
        _ => TeachingHours::default(),
    }
}

/// Prerequisites share a line with `Course Type` in most layouts.
fn prerequisites(section: &str) -> String {
    let Some(raw) = capture(&PREREQ_RE, section) else {
        return String::new();
    };
    match COURSE_TYPE_LABEL_RE.find(&raw) {
        Some(m) => raw[..m.start()].trim().to_string(),
        None => raw,
    }
}

// ── Tests ──
