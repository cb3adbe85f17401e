//! Weekly module table recovery.
//!
//! Page-layout extraction flattens the `Module No. | Syllabus Description |
//! Contact Hours` table into a line stream that alternates a module number,
//! one or more description lines, and an hours number. [`ModuleState`] walks
//! that stream as a two-state automaton.

use std::sync::LazyLock;

use regex::Regex;

use crate::parser::text::{content_lines, digit_line, region_after};
use crate::record::ModuleEntry;

static SYLLABUS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)SYLLABUS").unwrap());
static ASSESSMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Course Assessment Method").unwrap());

const HEADER_FRAGMENTS: &[&str] = &["Module", "Syllabus Description", "Contact Hours"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleState {
    AwaitingModule,
    InModuleContent { number: u32, content: Vec<String> },
}

impl ModuleState {
    /// Consume one trimmed, non-empty line. Returns the next state and the
    /// module closed by this line, if any.
    ///
    /// A digit line after content closes the open module as its contact
    /// hours. A digit line before any content replaces the open module
    /// number, since two numbers in a row cannot both be module starts with
    /// a description between them.
    pub fn step(self, line: &str) -> (ModuleState, Option<ModuleEntry>) {
        match (self, digit_line(line)) {
            (ModuleState::AwaitingModule, Some(n)) if n > 0 => (
                ModuleState::InModuleContent {
                    number: n,
                    content: Vec::new(),
                },
                None,
            ),
            (ModuleState::AwaitingModule, _) => (ModuleState::AwaitingModule, None),
            (ModuleState::InModuleContent { number, content }, Some(hours)) if !content.is_empty() => (
                ModuleState::AwaitingModule,
                Some(ModuleEntry {
                    module_number: number,
                    content,
                    contact_hours: Some(hours),
                }),
            ),
            (ModuleState::InModuleContent { number, content }, Some(n)) => {
                let number = if n > 0 { n } else { number };
                (ModuleState::InModuleContent { number, content }, None)
            }
            (ModuleState::InModuleContent { number, mut content }, None) => {
                if !is_header_line(line) {
                    content.push(line.to_string());
                }
                (ModuleState::InModuleContent { number, content }, None)
            }
        }
    }

    /// Close out the stream. An open module with content is kept with its
    /// hours absent.
    pub fn finish(self) -> Option<ModuleEntry> {
        match self {
            ModuleState::InModuleContent { number, content } if !content.is_empty() => Some(ModuleEntry {
                module_number: number,
                content,
                contact_hours: None,
            }),
            _ => None,
        }
    }
}

fn is_header_line(line: &str) -> bool {
    HEADER_FRAGMENTS.iter().any(|h| line.contains(h))
}

/// Run the automaton over a flattened table, in document order.
pub fn parse_module_lines<'a, I>(lines: I) -> Vec<ModuleEntry>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut modules = Vec::new();
    let mut state = ModuleState::AwaitingModule;
    for line in lines {
        let (next, closed) = state.step(line);
        modules.extend(closed);
        state = next;
    }
    modules.extend(state.finish());
    modules
}

/// Modules from the `SYLLABUS … Course Assessment Method` region.
pub fn extract(section: &str) -> Vec<ModuleEntry> {
    match region_after(section, &SYLLABUS_RE, &ASSESSMENT_RE, false) {
        Some(region) => parse_module_lines(content_lines(region)),
        None => Vec::new(),
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn module(n: u32, content: &[&str], hours: Option<u32>) -> ModuleEntry {
        ModuleEntry {
            module_number: n,
            content: content.iter().map(|s| s.to_string()).collect(),
            contact_hours: hours,
        }
    }

    #[test]
    fn number_content_hours_triples() {
        let lines = ["1", "Intro to X", "4", "2", "Advanced Y line1", "Advanced Y line2", "6"];
        assert_eq!(
            parse_module_lines(lines),
            vec![
                module(1, &["Intro to X"], Some(4)),
                module(2, &["Advanced Y line1", "Advanced Y line2"], Some(6)),
            ]
        );
    }

    #[test]
    fn truncated_table_keeps_open_module() {
        let lines = ["1", "Intro", "4", "2", "Unfinished topic"];
        let modules = parse_module_lines(lines);
        assert_eq!(modules.len(), 2);
        assert_eq!(modules[1], module(2, &["Unfinished topic"], None));
    }

    #[test]
    fn back_to_back_digits_before_content() {
        // "7" is a stray number (page number) before module 3's content.
        let lines = ["7", "3", "Trees", "9", "4", "5"];
        let modules = parse_module_lines(lines);
        assert_eq!(modules, vec![module(3, &["Trees"], Some(9))]);
    }

    #[test]
    fn digit_after_hours_opens_next_module() {
        let lines = ["1", "A topic", "8", "8", "Another", "5"];
        assert_eq!(
            parse_module_lines(lines),
            vec![module(1, &["A topic"], Some(8)), module(8, &["Another"], Some(5))]
        );
    }

    #[test]
    fn header_lines_are_filtered_and_order_kept() {
        let lines = [
            "Module", "No.", "3", "Module Syllabus Description Contact Hours", "Graphs", "10", "1",
            "Sets", "2",
        ];
        let modules = parse_module_lines(lines);
        assert_eq!(modules, vec![module(3, &["Graphs"], Some(10)), module(1, &["Sets"], Some(2))]);
    }

    #[test]
    fn zero_never_starts_a_module() {
        assert!(parse_module_lines(["0", "text", "4"]).is_empty());
    }

    #[test]
    fn region_needs_both_anchors() {
        assert!(extract("SYLLABUS\n1\nIntro\n4\n").is_empty());
        let modules = extract("SYLLABUS\n1\nIntro\n4\nCourse Assessment Method\n2\nx\n3");
        assert_eq!(modules, vec![module(1, &["Intro"], Some(4))]);
    }

    #[test]
    fn fixture_tables() {
        let doc = std::fs::read_to_string("tests/fixtures/syllabus.txt").unwrap();
        let second = doc.find("DATA STRUCTURES").unwrap();

        let first = extract(&doc[..second]);
        assert_eq!(first.len(), 4);
        assert_eq!(first[0].content.len(), 2);
        assert_eq!(first[0].contact_hours, Some(11));
        assert_eq!(first[3].module_number, 4);
        assert_eq!(first[3].contact_hours, None);

        let dsa = extract(&doc[second..]);
        assert_eq!(dsa.len(), 3);
        assert_eq!(
            dsa[1].content,
            vec!["Stacks and queues; infix to postfix conversion", "Circular queues and deques"]
        );
        assert_eq!(dsa[2].content, vec!["Trees and graphs — traversals"]);
    }
}
