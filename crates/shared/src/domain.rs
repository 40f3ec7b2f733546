use std::{fmt, path::PathBuf};

use serde::{Deserialize, Serialize};

pub const PDF_MIME_TYPE: &str = "application/pdf";

const BYTES_PER_MIB: f64 = 1024.0 * 1024.0;

/// A file picked by the user, before anything is sent to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub path: PathBuf,
    pub mime_type: Option<String>,
    pub size_bytes: u64,
}

impl SelectedFile {
    pub fn is_pdf(&self) -> bool {
        self.mime_type.as_deref() == Some(PDF_MIME_TYPE)
    }

    pub fn size_mib(&self) -> f64 {
        self.size_bytes as f64 / BYTES_PER_MIB
    }
}

/// Splits a selection into `(pdfs, ignored)` while keeping the original order.
pub fn partition_pdfs(files: &[SelectedFile]) -> (Vec<SelectedFile>, Vec<SelectedFile>) {
    files.iter().cloned().partition(SelectedFile::is_pdf)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Success,
    Warning,
    Danger,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Warning => "warning",
            Severity::Danger => "danger",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Heading level reported by the outline extractor. Unknown labels are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
    Other(String),
}

impl HeadingLevel {
    pub fn label(&self) -> &str {
        match self {
            HeadingLevel::H1 => "H1",
            HeadingLevel::H2 => "H2",
            HeadingLevel::H3 => "H3",
            HeadingLevel::Other(label) => label,
        }
    }

    /// Indent units: H1 sits flush, H2 one step in, everything deeper two steps.
    pub fn indent(&self) -> u32 {
        match self {
            HeadingLevel::H1 => 0,
            HeadingLevel::H2 => 1,
            _ => 2,
        }
    }

    pub fn badge_color(&self) -> &'static str {
        match self {
            HeadingLevel::H1 => "danger",
            HeadingLevel::H2 => "warning",
            HeadingLevel::H3 => "info",
            HeadingLevel::Other(_) => "secondary",
        }
    }
}

impl From<String> for HeadingLevel {
    fn from(value: String) -> Self {
        match value.as_str() {
            "H1" => HeadingLevel::H1,
            "H2" => HeadingLevel::H2,
            "H3" => HeadingLevel::H3,
            _ => HeadingLevel::Other(value),
        }
    }
}

impl From<HeadingLevel> for String {
    fn from(value: HeadingLevel) -> Self {
        match value {
            HeadingLevel::Other(label) => label,
            known => known.label().to_string(),
        }
    }
}

impl fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelevanceTier {
    Success,
    Info,
    Warning,
    Secondary,
}

impl RelevanceTier {
    pub fn from_score(score: f64) -> Self {
        if score >= 0.9 {
            RelevanceTier::Success
        } else if score >= 0.8 {
            RelevanceTier::Info
        } else if score >= 0.7 {
            RelevanceTier::Warning
        } else {
            RelevanceTier::Secondary
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            RelevanceTier::Success => "success",
            RelevanceTier::Info => "info",
            RelevanceTier::Warning => "warning",
            RelevanceTier::Secondary => "secondary",
        }
    }
}

/// Score in `[0, 1]` as a rounded whole percentage.
pub fn relevance_percent(score: f64) -> i64 {
    (score * 100.0).round() as i64
}
