use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SkillError;

/// Messages from the provider that describe a condition worth retrying.
const TRANSIENT_KEYWORDS: &[&str] = &[
    "timeout",
    "network",
    "connection",
    "unavailable",
    "overload",
    "rate limit",
    "too many",
];

/// Every draw/video response is wrapped like this; `code == 0` means ok.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub code: i64,
    pub msg: Option<String>,
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    /// Unwraps `data`, turning a non-zero `code` into an error.
    pub fn into_data(self) -> Result<T, SkillError> {
        if self.code != 0 {
            let msg = self
                .msg
                .unwrap_or_else(|| format!("Unknown error from API (code {})", self.code));
            return Err(classify_api_message(msg));
        }
        self.data
            .ok_or_else(|| SkillError::protocol("response has no 'data' field"))
    }
}

pub fn classify_api_message(msg: String) -> SkillError {
    let lower = msg.to_lowercase();
    if TRANSIENT_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
        SkillError::TransientFailure { message: msg }
    } else {
        SkillError::GenerationFailure { message: msg }
    }
}

#[derive(Debug, Deserialize)]
pub struct Submitted {
    pub id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ResultQuery<'a> {
    pub id: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageGenerationBody {
    pub model: &'static str,
    pub prompt: String,
    pub aspect_ratio: &'static str,
    pub image_size: &'static str,
    pub urls: Vec<String>,
    pub web_hook: &'static str,
    pub shut_progress: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoGenerationBody {
    pub model: &'static str,
    pub prompt: String,
    pub duration_seconds: u8,
    pub aspect_ratio: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_frame_url: Option<String>,
    pub web_hook: &'static str,
}

/// `data` of a result poll.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DrawResult {
    pub id: Option<String>,
    pub status: Option<String>,
    pub progress: Option<f64>,
    pub url: Option<String>,
    pub results: Option<Vec<ResultItem>>,
    pub failure_reason: Option<String>,
    pub error: Option<String>,
    pub credits_cost: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ResultItem {
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum JobStatus {
    Running { progress: u8 },
    Succeeded(DrawResult),
    Failed(String),
}

impl DrawResult {
    /// Video results carry `url` at the top level, image results inside
    /// `results`.
    pub fn media_url(&self) -> Option<&str> {
        self.url.as_deref().filter(|u| !u.is_empty()).or_else(|| {
            self.results
                .as_ref()?
                .iter()
                .find_map(|r| r.url.as_deref().filter(|u| !u.is_empty()))
        })
    }

    pub fn credits(&self) -> Option<String> {
        match self.credits_cost.as_ref()? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    pub fn failure_message(&self) -> String {
        let reason = [self.failure_reason.as_deref(), self.error.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");
        let reason = reason.trim();
        if reason.is_empty() {
            "Generation failed with unknown reason".into()
        } else {
            reason.to_string()
        }
    }

    pub fn into_status(self) -> JobStatus {
        match self.status.as_deref() {
            Some("succeeded") => JobStatus::Succeeded(self),
            Some("failed") => JobStatus::Failed(self.failure_message()),
            _ => JobStatus::Running {
                progress: self.progress.unwrap_or(0.0).clamp(0.0, 100.0) as u8,
            },
        }
    }
}
