use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::parser::text::region_after;
use crate::record::{Assessment, EseBreakdown};
use crate::settings::EseDefaults;

static CIE_START_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Continuous Internal Evaluation Marks \(CIE\):").unwrap());
static CIE_END_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)End Semester Examination").unwrap());
static ESE_START_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)End Semester Examination Marks \(ESE\)").unwrap());
static ESE_END_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)Course Outcomes").unwrap());
static INT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").unwrap());
static PART_A_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+\s*[xX×]\s*\d+\s*=\s*(\d+)").unwrap());

/// CIE components in the order their marks appear in the flattened table.
pub const CIE_COMPONENTS: [&str; 5] = [
    "attendance",
    "assignment_microproject",
    "internal_exam_1",
    "internal_exam_2",
    "total",
];

pub fn extract(section: &str, ese_defaults: &EseDefaults) -> Assessment {
    Assessment {
        cie_breakdown: cie_breakdown(section),
        ese_breakdown: ese_breakdown(section, ese_defaults),
    }
}

/// Maps the last line of the CIE block carrying at least five integers onto
/// [`CIE_COMPONENTS`]. No such line means no breakdown.
pub fn cie_breakdown(section: &str) -> BTreeMap<String, u32> {
    let Some(region) = region_after(section, &CIE_START_RE, &CIE_END_RE, false) else {
        return BTreeMap::new();
    };
    let Some(values) = region.lines().rev().find_map(|line| {
        let ints: Vec<u32> = INT_RE
            .find_iter(line)
            .filter_map(|m| m.as_str().parse().ok())
            .collect();
        (ints.len() >= CIE_COMPONENTS.len()).then_some(ints)
    }) else {
        return BTreeMap::new();
    };

    CIE_COMPONENTS
        .iter()
        .zip(values)
        .map(|(name, v)| (name.to_string(), v))
        .collect()
}

/// The ESE block as text plus its mark split. Part A comes from an
/// `N x M = total` statement when present; everything else falls back to
/// the configured defaults.
pub fn ese_breakdown(section: &str, defaults: &EseDefaults) -> Option<EseBreakdown> {
    let region = region_after(section, &ESE_START_RE, &ESE_END_RE, true)?;
    let part_a_marks = PART_A_RE
        .captures(region)
        .and_then(|c| c[1].parse().ok())
        .unwrap_or(defaults.part_a_marks);

    Some(EseBreakdown {
        description: region.trim().to_string(),
        part_a_marks,
        part_b_marks: defaults.part_b_marks,
        total: defaults.total,
    })
}

// ── Tests ──
