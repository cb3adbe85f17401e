use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One course's structured syllabus entry.
///
/// Every field has a zero value so a partially recovered section still
/// produces a complete record; `#[serde(default)]` lets model-produced JSON
/// omit fields as well.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CourseRecord {
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
    pub objectives: Vec<String>,
    pub modules: Vec<ModuleEntry>,
    pub assessment: Assessment,
    pub course_outcomes: Vec<CourseOutcome>,
    pub textbooks: Vec<Book>,
    pub reference_books: Vec<Book>,
    pub video_links: Vec<VideoLink>,
}

/// Lecture : Tutorial : Practical : Research hours per week.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeachingHours {
    pub lecture: u32,
    pub tutorial: u32,
    pub practical: u32,
    pub research: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModuleEntry {
    pub module_number: u32,
    pub content: Vec<String>,
    pub contact_hours: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Assessment {
    pub cie_breakdown: BTreeMap<String, u32>,
    /// `None` when the section has no ESE block at all. Written as `{}`.
    #[serde(with = "empty_object_as_none")]
    pub ese_breakdown: Option<EseBreakdown>,
}

/// `None` <-> `{}`, so the key is always present as an object.
mod empty_object_as_none {
    use serde::de::Error;
    use serde::ser::SerializeMap;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use serde_json::Value;

    use super::EseBreakdown;

    pub fn serialize<S: Serializer>(value: &Option<EseBreakdown>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(ese) => ese.serialize(s),
            None => s.serialize_map(Some(0))?.end(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<EseBreakdown>, D::Error> {
        match Option::<Value>::deserialize(d)? {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Object(map)) if map.is_empty() => Ok(None),
            Some(v) => serde_json::from_value(v).map(Some).map_err(D::Error::custom),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EseBreakdown {
    pub description: String,
    pub part_a_marks: u32,
    pub part_b_marks: u32,
    pub total: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CourseOutcome {
    pub code: String,
    pub description: String,
    pub knowledge_level: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoLink {
    pub module: u32,
    pub url: String,
}

/// Textbook or reference book. Only the model-assisted path fills these.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Book {
    pub title: String,
    pub author: String,
    pub publisher: String,
    pub edition: String,
    pub year: Option<u32>,
}

/// The written artifact: surviving records plus the normalized text they
/// were recovered from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentOutput {
    pub courses: Vec<CourseRecord>,
    pub raw_content: String,
}

impl CourseRecord {
    /// A record with neither a code nor a title came from a spurious
    /// boundary match or an unparseable section.
    pub fn is_identifiable(&self) -> bool {
        !self.course_code.is_empty() || !self.title.is_empty()
    }
}

// ── Tests ──
