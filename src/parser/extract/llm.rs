//! Model-assisted extraction: the section text goes to a generative model
//! together with the record schema, and the reply is parsed back into a
//! [`CourseRecord`].

use std::sync::Mutex;
use std::time::{Duration, Instant};

use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::error::{ExtractError, Result};
use crate::parser::extract::SectionExtractor;
use crate::parser::sections::BoundaryMarker;
use crate::record::{
    Assessment, Book, CourseOutcome, CourseRecord, EseBreakdown, ModuleEntry, VideoLink,
};
use crate::settings::LlmSettings;

const BASE_BACKOFF_MS: u64 = 2000;
const MAX_BACKOFF_MS: u64 = 60_000;

/// A blocking text-in, text-out model call.
pub trait LanguageModel: Sync {
    fn complete(&self, prompt: &str) -> Result<String>;
}

pub struct LlmExtractor<M> {
    model: M,
    marker: BoundaryMarker,
}

impl<M: LanguageModel> LlmExtractor<M> {
    pub fn new(model: M, marker: BoundaryMarker) -> Self {
        LlmExtractor { model, marker }
    }
}

impl<M: LanguageModel> SectionExtractor for LlmExtractor<M> {
    fn extract(&self, section: &str) -> Result<CourseRecord> {
        let reply = self.model.complete(&build_prompt(section)?)?;
        let mut record = parse_response(&reply)?;
        if record.semester.is_empty() {
            if let Some(id) = self.marker.identifier(section) {
                record.semester = id.to_string();
            }
        }
        Ok(record)
    }
}

/// A record with one sample element per list, so the model sees every
/// nested shape.
fn schema_template() -> CourseRecord {
    CourseRecord {
        objectives: vec![String::new()],
        modules: vec![ModuleEntry::default()],
        assessment: Assessment {
            ese_breakdown: Some(EseBreakdown::default()),
            ..Default::default()
        },
        course_outcomes: vec![CourseOutcome::default()],
        textbooks: vec![Book::default()],
        reference_books: vec![Book::default()],
        video_links: vec![VideoLink::default()],
        ..Default::default()
    }
}

pub fn build_prompt(section: &str) -> Result<String> {
    let schema = serde_json::to_string_pretty(&schema_template())?;
    Ok(format!(
        "Convert the following course syllabus into a structured JSON object following this schema:\n\
         {schema}\n\n\
         Rules:\n\
         - Clean up formatting, merge broken lines\n\
         - `contact_hours` and book `year` may be null when not stated\n\
         - All numbers must be actual integers, not strings\n\
         - Return ONLY valid JSON, no extra commentary\n\n\
         Syllabus text:\n{section}\n"
    ))
}

/// Parse the reply strictly; failing that, parse the span from the first
/// `{` to the last `}`.
pub fn parse_response(reply: &str) -> Result<CourseRecord> {
    if let Ok(record) = serde_json::from_str(reply.trim()) {
        return Ok(record);
    }
    let (Some(open), Some(close)) = (reply.find('{'), reply.rfind('}')) else {
        return Err(ExtractError::UnparseableResponse);
    };
    if close < open {
        return Err(ExtractError::UnparseableResponse);
    }
    serde_json::from_str(&reply[open..=close]).map_err(|e| {
        debug!("Embedded JSON did not parse: {}", e);
        ExtractError::UnparseableResponse
    })
}

/// Gemini `generateContent` over blocking HTTP, with request pacing and
/// retry on rate limits and server errors.
pub struct GeminiClient {
    http: reqwest::blocking::Client,
    url: String,
    api_key: String,
    min_interval: Duration,
    max_retries: u32,
    last_request: Mutex<Option<Instant>>,
}

impl GeminiClient {
    pub fn from_settings(settings: &LlmSettings) -> Result<Self> {
        let api_key = std::env::var(&settings.api_key_env)
            .map_err(|_| ExtractError::MissingApiKey(settings.api_key_env.clone()))?;
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;
        Ok(GeminiClient {
            http,
            url: format!(
                "{}/models/{}:generateContent",
                settings.endpoint.trim_end_matches('/'),
                settings.model
            ),
            api_key,
            min_interval: Duration::from_millis(settings.min_interval_ms),
            max_retries: settings.max_retries,
            last_request: Mutex::new(None),
        })
    }

    fn send_once(&self, body: &Value) -> Result<String> {
        let response = self
            .http
            .post(&self.url)
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(ExtractError::ModelStatus {
                status: status.as_u16(),
                body: response.text().unwrap_or_default(),
            });
        }
        let value: Value = response.json()?;
        value["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .map(str::to_string)
            .ok_or(ExtractError::EmptyModelResponse)
    }
}

/// Exponential backoff for the given retry attempt, capped at one minute.
fn backoff_for(attempt: u32) -> Duration {
    let ms = 2u64
        .checked_pow(attempt)
        .and_then(|factor| BASE_BACKOFF_MS.checked_mul(factor))
        .map_or(MAX_BACKOFF_MS, |ms| ms.min(MAX_BACKOFF_MS));
    Duration::from_millis(ms)
}

fn is_retryable(err: &ExtractError) -> bool {
    match err {
        ExtractError::ModelStatus { status, .. } => *status == 429 || *status >= 500,
        ExtractError::Http(e) => e.is_timeout() || e.is_connect(),
        _ => false,
    }
}

impl LanguageModel for GeminiClient {
    fn complete(&self, prompt: &str) -> Result<String> {
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": { "responseMimeType": "application/json" },
        });

        // Held for the whole call so concurrent sections are paced one at a time.
        let mut last = self.last_request.lock().unwrap_or_else(|e| e.into_inner());
        let mut attempt = 0;
        loop {
            if let Some(prev) = *last {
                let since = prev.elapsed();
                if since < self.min_interval {
                    std::thread::sleep(self.min_interval - since);
                }
            }
            *last = Some(Instant::now());

            match self.send_once(&body) {
                Err(e) if attempt < self.max_retries && is_retryable(&e) => {
                    let backoff = backoff_for(attempt);
                    warn!(
                        "Model request failed (attempt {}/{}): {}, backing off {:.1}s",
                        attempt + 1,
                        self.max_retries,
                        e,
                        backoff.as_secs_f64()
                    );
                    std::thread::sleep(backoff);
                    attempt += 1;
                }
                result => return result,
            }
        }
    }
}

// ── Tests ──
