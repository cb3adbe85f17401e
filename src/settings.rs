use std::path::Path;

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::Result;

pub const ENV_PREFIX: &str = "SYLLABUS";
pub const DEFAULT_CONFIG_FILE: &str = "syllabus.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExtractorKind {
    Rules,
    Llm,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Regex delimiting course sections. Capture group 1, if any, is the
    /// semester identifier.
    pub boundary_pattern: String,
    pub min_section_chars: usize,
    pub title_scan_lines: usize,
    pub extractor: ExtractorKind,
    pub ese: EseDefaults,
    pub llm: LlmSettings,
}

/// Fallback ESE split used when the section states no `N x M = total`.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct EseDefaults {
    pub part_a_marks: u32,
    pub part_b_marks: u32,
    pub total: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    pub endpoint: String,
    pub model: String,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
    pub min_interval_ms: u64,
    pub max_retries: u32,
    pub timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            boundary_pattern: r"(?i)SEMESTER\s+([A-Z]?\d+)".to_string(),
            min_section_chars: 200,
            title_scan_lines: 10,
            extractor: ExtractorKind::Rules,
            ese: EseDefaults::default(),
            llm: LlmSettings::default(),
        }
    }
}

impl Default for EseDefaults {
    fn default() -> Self {
        EseDefaults {
            part_a_marks: 24,
            part_b_marks: 36,
            total: 60,
        }
    }
}

impl Default for LlmSettings {
    fn default() -> Self {
        LlmSettings {
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-1.5-flash".to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            min_interval_ms: 4000,
            max_retries: 3,
            timeout_secs: 120,
        }
    }
}

impl Settings {
    /// Defaults, then the TOML file (if present), then `SYLLABUS_*` env vars.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let file = file.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
        let settings = Config::builder()
            .add_source(File::from(file).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let s = Settings::load(Some(Path::new("does/not/exist.toml"))).unwrap();
        assert_eq!(s.min_section_chars, 200);
        assert_eq!(s.ese.part_a_marks, 24);
        assert_eq!(s.extractor, ExtractorKind::Rules);
    }

    #[test]
    fn file_overrides_nested_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("syllabus.toml");
        std::fs::write(
            &path,
            "min_section_chars = 50\nextractor = \"llm\"\n[ese]\npart_a_marks = 30\n",
        )
        .unwrap();
        let s = Settings::load(Some(&path)).unwrap();
        assert_eq!(s.min_section_chars, 50);
        assert_eq!(s.extractor, ExtractorKind::Llm);
        assert_eq!(s.ese.part_a_marks, 30);
        assert_eq!(s.ese.part_b_marks, 36);
        assert_eq!(s.title_scan_lines, 10);
    }

    #[test]
    fn env_overrides_nested_keys() {
        std::env::set_var("SYLLABUS_LLM__MODEL", "gemini-env-model");
        let s = Settings::load(Some(Path::new("does/not/exist.toml"))).unwrap();
        std::env::remove_var("SYLLABUS_LLM__MODEL");
        assert_eq!(s.llm.model, "gemini-env-model");
        assert_eq!(s.llm.max_retries, 3);
    }
}
