use regex::Regex;
use tracing::{debug, info, warn};

use crate::error::Result;

/// Repeating phrase that opens each course's syllabus entry.
#[derive(Debug, Clone)]
pub struct BoundaryMarker {
    re: Regex,
}

impl BoundaryMarker {
    pub fn new(pattern: &str) -> Result<Self> {
        Ok(BoundaryMarker {
            re: Regex::new(pattern)?,
        })
    }

    pub fn is_match(&self, line: &str) -> bool {
        self.re.is_match(line)
    }

    /// Identifier of the first marker in `text`: capture group 1 when the
    /// pattern has one, otherwise the whole match.
    pub fn identifier<'a>(&self, text: &'a str) -> Option<&'a str> {
        let caps = self.re.captures(text)?;
        caps.get(1).or_else(|| caps.get(0)).map(|m| m.as_str().trim())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Section<'a> {
    /// Byte offset of the section's marker in the document.
    pub start: usize,
    pub text: &'a str,
}

#[derive(Debug, Clone, Default)]
pub struct Segmentation<'a> {
    pub sections: Vec<Section<'a>>,
    pub markers: usize,
    pub dropped_short: usize,
    pub fallback: bool,
}

/// Split `doc` at every marker. Each section runs from its marker to the
/// next one (or the end); sections under `min_chars` are dropped. With no
/// markers at all, the whole document is one section.
pub fn split_sections<'a>(doc: &'a str, marker: &BoundaryMarker, min_chars: usize) -> Segmentation<'a> {
    if doc.trim().is_empty() {
        return Segmentation::default();
    }

    let starts: Vec<usize> = marker.re.find_iter(doc).map(|m| m.start()).collect();
    if starts.is_empty() {
        warn!("No boundary markers found, treating the whole document as one section");
        return Segmentation {
            sections: vec![Section { start: 0, text: doc.trim() }],
            markers: 0,
            dropped_short: 0,
            fallback: true,
        };
    }

    let mut sections = Vec::with_capacity(starts.len());
    let mut dropped_short = 0;
    for (i, &start) in starts.iter().enumerate() {
        let end = starts.get(i + 1).copied().unwrap_or(doc.len());
        let text = doc[start..end].trim_end();
        if text.chars().count() < min_chars {
            debug!("Dropping {}-char section at offset {}", text.chars().count(), start);
            dropped_short += 1;
            continue;
        }
        sections.push(Section { start, text });
    }

    info!(
        "Split document into {} sections ({} markers, {} too short)",
        sections.len(),
        starts.len(),
        dropped_short
    );

    Segmentation {
        sections,
        markers: starts.len(),
        dropped_short,
        fallback: false,
    }
}

// ── Tests ──
