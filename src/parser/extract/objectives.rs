use std::sync::LazyLock;

use regex::Regex;

use crate::parser::text::{content_lines, region_after};

static START_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i:Course Objectives):[ \t]*\r?\n").unwrap());
static END_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"SYLLABUS|Module").unwrap());
static ITEM_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+\.\s*").unwrap());

/// Numbered objectives, with wrapped continuation lines joined back on.
pub fn extract(section: &str) -> Vec<String> {
    let Some(region) = region_after(section, &START_RE, &END_RE, false) else {
        return Vec::new();
    };

    let mut objectives = Vec::new();
    let mut current: Option<String> = None;
    for line in content_lines(region) {
        if let Some(m) = ITEM_RE.find(line) {
            objectives.extend(current.take());
            current = Some(line[m.end()..].to_string());
        } else if let Some(item) = current.as_mut() {
            item.push(' ');
            item.push_str(line);
        }
    }
    objectives.extend(current);
    objectives
        .into_iter()
        .map(|o| o.trim().to_string())
        .filter(|o| !o.is_empty())
        .collect()
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapped_items_rejoined() {
        let text = "Course Objectives:\n\
            1. To introduce sets\n\
            and relations.\n\
            2. To teach logic.\n\
            SYLLABUS\n3. not an objective";
        assert_eq!(
            extract(text),
            vec!["To introduce sets and relations.", "To teach logic."]
        );
    }

    #[test]
    fn text_before_first_item_is_ignored() {
        let text = "Course Objectives:\nThe course aims\n1. Learn graphs\nModule 1";
        assert_eq!(extract(text), vec!["Learn graphs"]);
    }

    #[test]
    fn missing_anchors_yield_nothing() {
        assert!(extract("Course Objectives:\n1. Unterminated").is_empty());
        assert!(extract("1. Lonely\nSYLLABUS").is_empty());
    }

    #[test]
    fn fixture_objectives() {
        let doc = std::fs::read_to_string("tests/fixtures/syllabus.txt").unwrap();
        let dsa = &doc[doc.find("DATA STRUCTURES").unwrap()..];
        let objectives = extract(dsa);
        assert_eq!(objectives.len(), 2);
        assert!(objectives[1].ends_with("complexities ∑ ∈ Θ(n log n)."));
    }
}
