pub mod assessment;
pub mod header;
pub mod links;
pub mod llm;
pub mod modules;
pub mod objectives;
pub mod outcomes;

use crate::error::Result;
use crate::parser::sections::BoundaryMarker;
use crate::record::CourseRecord;
use crate::settings::{EseDefaults, Settings};

/// Turns one section's text into a record. Implementations must be
/// shareable across worker threads.
pub trait SectionExtractor: Sync {
    fn extract(&self, section: &str) -> Result<CourseRecord>;
}

/// Deterministic pattern-based extraction. Never fails: unmatched fields
/// keep their zero values.
#[derive(Debug, Clone)]
pub struct RuleExtractor {
    marker: BoundaryMarker,
    title_scan_lines: usize,
    ese_defaults: EseDefaults,
}

impl RuleExtractor {
    pub fn new(marker: BoundaryMarker, settings: &Settings) -> Self {
        RuleExtractor {
            marker,
            title_scan_lines: settings.title_scan_lines,
            ese_defaults: settings.ese,
        }
    }

    pub fn extract_record(&self, section: &str) -> CourseRecord {
        let h = header::extract(section, &self.marker, self.title_scan_lines);
        CourseRecord {
            course_code: h.course_code,
            semester: h.semester,
            title: h.title,
            group: h.group,
            cie_marks: h.cie_marks,
            ese_marks: h.ese_marks,
            credits: h.credits,
            teaching_hours: h.teaching_hours,
            exam_hours: h.exam_hours,
            prerequisites: h.prerequisites,
            course_type: h.course_type,
            objectives: objectives::extract(section),
            modules: modules::extract(section),
            assessment: assessment::extract(section, &self.ese_defaults),
            course_outcomes: outcomes::extract(section),
            textbooks: Vec::new(),
            reference_books: Vec::new(),
            video_links: links::extract(section),
        }
    }
}

impl SectionExtractor for RuleExtractor {
    fn extract(&self, section: &str) -> Result<CourseRecord> {
        Ok(self.extract_record(section))
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::sections::split_sections;

    fn fixture_records() -> Vec<CourseRecord> {
        let settings = Settings::default();
        let marker = BoundaryMarker::new(&settings.boundary_pattern).unwrap();
        let doc = std::fs::read_to_string("tests/fixtures/syllabus.txt").unwrap();
        let rules = RuleExtractor::new(marker.clone(), &settings);
        split_sections(&doc, &marker, settings.min_section_chars)
            .sections
            .iter()
            .map(|s| rules.extract_record(s.text))
            .collect()
    }

    #[test]
    fn discrete_mathematics() {
        let records = fixture_records();
        let dm = &records[0];
        assert_eq!(dm.course_code, "PCCST301");
        assert_eq!(dm.semester, "S3");
        assert_eq!(dm.title, "DISCRETE MATHEMATICS");
        assert_eq!(dm.group, "GROUP A");
        assert_eq!(dm.teaching_hours.lecture, 3);
        assert_eq!(dm.objectives.len(), 2);
        assert_eq!(
            dm.objectives[0],
            "To introduce the fundamentals of set theory, relations and functions that are needed in computing."
        );
        assert_eq!(dm.modules.len(), 4);
        assert_eq!(dm.assessment.cie_breakdown["total"], 40);
        assert_eq!(dm.assessment.ese_breakdown.as_ref().unwrap().part_a_marks, 24);
        let codes: Vec<&str> = dm.course_outcomes.iter().map(|c| c.code.as_str()).collect();
        assert_eq!(codes, vec!["CO1", "CO2", "CO3"]);
        assert_eq!(dm.course_outcomes[1].description, "Apply propositional logic to verify arguments and proofs");
        assert_eq!(dm.video_links.len(), 2);
        assert_eq!(dm.video_links[1].url, "https://nptel.ac.in/courses/106106183");
        assert!(dm.textbooks.is_empty());
    }

    #[test]
    fn data_structures() {
        let records = fixture_records();
        let dsa = &records[1];
        assert_eq!(dsa.course_code, "PCCST302");
        assert_eq!(dsa.title, "DATA STRUCTURES AND ALGORITHMS");
        assert!(dsa.group.is_empty());
        assert_eq!(dsa.teaching_hours, Default::default());
        assert_eq!(dsa.prerequisites, "PCCST301");
        assert_eq!(dsa.modules.len(), 3);
        assert_eq!(dsa.assessment.ese_breakdown.as_ref().unwrap().part_a_marks, 32);
        assert_eq!(dsa.course_outcomes.len(), 2);
        assert_eq!(dsa.course_outcomes[0].description, "Identify appropriate data structures for a given problem");
        assert!(dsa.video_links.is_empty());
    }

    #[test]
    fn boilerplate_section_is_unidentifiable() {
        let records = fixture_records();
        assert_eq!(records.len(), 3);
        assert!(!records[2].is_identifiable());
        assert_eq!(records[2].semester, "S4");
    }
}
