use std::sync::LazyLock;

use regex::Regex;

use crate::parser::text::{collapse_whitespace, region_after};
use crate::record::CourseOutcome;

static START_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)Course Outcomes \(COs\)").unwrap());
static END_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)CO-PO Mapping|Text Books|Note:").unwrap());
static OUTCOME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)(CO\d+)\s+(.*?)\s+(K\d+)").unwrap());
static BLOOM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)Bloom'?s.*?Level.*?\(KL\)").unwrap());

const MIN_DESCRIPTION_CHARS: usize = 10;

/// Outcomes from the `Course Outcomes (COs)` block.
pub fn extract(section: &str) -> Vec<CourseOutcome> {
    region_after(section, &START_RE, &END_RE, true)
        .map(parse_outcomes)
        .unwrap_or_default()
}

/// Every `CO<n> description K<n>` triple in `text`.
pub fn parse_outcomes(text: &str) -> Vec<CourseOutcome> {
    OUTCOME_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let without_header = BLOOM_RE.replace_all(&caps[2], " ");
            let description = collapse_whitespace(&without_header);
            (description.chars().count() >= MIN_DESCRIPTION_CHARS).then(|| CourseOutcome {
                code: caps[1].to_string(),
                description,
                knowledge_level: caps[3].to_string(),
            })
        })
        .collect()
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_outcome() {
        let outcomes = parse_outcomes("CO1 Explain the basics of signal processing K2");
        assert_eq!(
            outcomes,
            vec![CourseOutcome {
                code: "CO1".into(),
                description: "Explain the basics of signal processing".into(),
                knowledge_level: "K2".into(),
            }]
        );
    }

    #[test]
    fn wrapped_descriptions_collapse() {
        let outcomes = parse_outcomes("CO2 Apply propositional logic to verify\n   arguments and proofs\nK3");
        assert_eq!(outcomes[0].description, "Apply propositional logic to verify arguments and proofs");
        assert_eq!(outcomes[0].knowledge_level, "K3");
    }

    #[test]
    fn bloom_header_fragment_removed() {
        let outcomes = parse_outcomes("CO1 Identify data structures Bloom's\nKnowledge Level (KL) for a problem K2");
        assert_eq!(outcomes[0].description, "Identify data structures for a problem");
    }

    #[test]
    fn short_descriptions_discarded() {
        let outcomes = parse_outcomes("CO1 Sort K3 CO2 Design efficient sorting algorithms K4");
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].code, "CO2");
    }

    #[test]
    fn region_stops_at_mapping_table() {
        let text = "Course Outcomes (COs)\nCO1 Design efficient algorithms K3\nCO-PO Mapping\nCO2 3 2 1 K1";
        let outcomes = extract(text);
        assert_eq!(outcomes.len(), 1);
        assert!(extract("CO1 Design efficient algorithms K3").is_empty());
    }
}
