pub mod extract;
pub mod normalize;
pub mod sections;
pub mod text;

use indicatif::ProgressBar;
use rayon::prelude::*;
use tracing::{info, warn};

use crate::record::{CourseRecord, DocumentOutput};
use crate::source::PageText;
use extract::SectionExtractor;
use sections::{split_sections, BoundaryMarker, Section};

/// Pages → normalized document → sections → records.
pub struct Pipeline<'a> {
    pub marker: &'a BoundaryMarker,
    pub extractor: &'a dyn SectionExtractor,
    pub min_section_chars: usize,
    pub parallel: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub pages_read: usize,
    pub pages_failed: usize,
    pub markers_found: usize,
    pub sections_dropped_short: usize,
    pub sections_found: usize,
    pub records_kept: usize,
    pub sections_discarded: usize,
    pub section_failures: usize,
    pub total_modules: usize,
    pub total_outcomes: usize,
}

impl RunSummary {
    pub fn print(&self) {
        println!(
            "Pages: {} read, {} without text",
            self.pages_read, self.pages_failed
        );
        println!(
            "Markers: {} found, {} sections too short",
            self.markers_found, self.sections_dropped_short
        );
        println!(
            "Sections: {} found, {} kept, {} discarded, {} failed",
            self.sections_found, self.records_kept, self.sections_discarded, self.section_failures
        );
        println!(
            "Totals: {} modules, {} outcomes",
            self.total_modules, self.total_outcomes
        );
    }
}

pub struct Extraction {
    pub output: DocumentOutput,
    pub summary: RunSummary,
}

#[derive(Debug)]
pub enum SectionOutcome {
    Kept(Box<CourseRecord>),
    Discarded,
    Failed,
}

/// Extract one section and apply the keep rule: a record needs a course
/// code or a title to survive.
pub fn process_section(extractor: &dyn SectionExtractor, index: usize, section: &Section) -> SectionOutcome {
    match extractor.extract(section.text) {
        Ok(record) if record.is_identifiable() => SectionOutcome::Kept(Box::new(record)),
        Ok(_) => {
            warn!("Skipping section {}: no course code or title found", index + 1);
            SectionOutcome::Discarded
        }
        Err(e) => {
            warn!("Error processing section {}: {}", index + 1, e);
            SectionOutcome::Failed
        }
    }
}

impl Pipeline<'_> {
    pub fn run(&self, pages: Vec<PageText>, pb: &ProgressBar) -> Extraction {
        let mut summary = RunSummary::default();
        for (_, text) in &pages {
            match text {
                Some(_) => summary.pages_read += 1,
                None => summary.pages_failed += 1,
            }
        }

        let doc = normalize::normalize(pages);
        info!("Normalized document: {} characters", doc.chars().count());

        let segmentation = split_sections(&doc, self.marker, self.min_section_chars);
        summary.markers_found = segmentation.markers;
        summary.sections_dropped_short = segmentation.dropped_short;
        summary.sections_found = segmentation.sections.len();
        pb.set_length(segmentation.sections.len() as u64);

        let work = |(i, section): (usize, &Section)| {
            let outcome = process_section(self.extractor, i, section);
            pb.inc(1);
            outcome
        };
        let outcomes: Vec<SectionOutcome> = if self.parallel {
            segmentation.sections.par_iter().enumerate().map(work).collect()
        } else {
            segmentation.sections.iter().enumerate().map(work).collect()
        };
        pb.finish_and_clear();

        let mut courses = Vec::with_capacity(outcomes.len());
        for outcome in outcomes {
            match outcome {
                SectionOutcome::Kept(record) => courses.push(*record),
                SectionOutcome::Discarded => summary.sections_discarded += 1,
                SectionOutcome::Failed => summary.section_failures += 1,
            }
        }
        summary.records_kept = courses.len();
        summary.total_modules = courses.iter().map(|c| c.modules.len()).sum();
        summary.total_outcomes = courses.iter().map(|c| c.course_outcomes.len()).sum();

        Extraction {
            output: DocumentOutput {
                courses,
                raw_content: doc,
            },
            summary,
        }
    }
}

// ── Tests ──
