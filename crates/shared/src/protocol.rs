use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::HeadingLevel;

pub const DEFAULT_RELEVANCE_THRESHOLD: f64 = 0.7;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlineItem {
    pub level: HeadingLevel,
    pub text: String,
    pub page: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutlineMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extraction_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_thresholds: Option<BTreeMap<String, String>>,
}

/// Response of `POST /upload`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlineResult {
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<u32>,
    #[serde(default)]
    pub outline: Vec<OutlineItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<OutlineMetadata>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    pub persona: String,
    pub job: String,
}

impl AnalyzeRequest {
    /// Trims both fields; `None` when either ends up empty.
    pub fn trimmed(persona: &str, job: &str) -> Option<Self> {
        let persona = persona.trim();
        let job = job.trim();
        if persona.is_empty() || job.is_empty() {
            return None;
        }
        Some(Self {
            persona: persona.to_string(),
            job: job.to_string(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisMetadata {
    #[serde(default)]
    pub persona: String,
    #[serde(default)]
    pub job: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis_method: Option<String>,
    #[serde(default)]
    pub documents: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relevance_threshold: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_sections: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_subsections: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_relevance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub section_title: String,
    pub document: String,
    pub page_number: u32,
    pub importance_rank: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_length: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subsection {
    pub document: String,
    pub page_number: u32,
    pub relevance_score: f64,
    pub refined_text: String,
}

/// Response of `POST /analyze`. Sections arrive already ranked by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(default)]
    pub metadata: AnalysisMetadata,
    #[serde(default)]
    pub sections: Vec<Section>,
    #[serde(default)]
    pub subsections: Vec<Subsection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClearResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ClearResponse {
    /// Any JSON counts as a successful clear; only a string `message` is kept.
    pub fn from_value(body: &Value) -> Self {
        Self {
            message: body
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string),
        }
    }
}

/// Response of `GET /health`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub service: String,
    #[serde(default)]
    pub rounds: Vec<String>,
}
