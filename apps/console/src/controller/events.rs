//! User intents fed into the controller and the status banner they produce.

use std::fmt;

use shared::domain::{SelectedFile, Severity};

/// Everything the user can trigger. Request-issuing variants are gated by the busy flag.
#[derive(Debug, Clone)]
pub enum UiAction {
    SelectSingleFile(Option<SelectedFile>),
    SelectMultipleFiles(Vec<SelectedFile>),
    UploadSingle,
    UploadBatch,
    SetPersona(String),
    SetJob(String),
    Analyze,
    Clear,
    CheckHealth,
    DismissStatus,
}

impl UiAction {
    pub fn name(&self) -> &'static str {
        match self {
            UiAction::SelectSingleFile(_) => "select_single_file",
            UiAction::SelectMultipleFiles(_) => "select_multiple_files",
            UiAction::UploadSingle => "upload_single",
            UiAction::UploadBatch => "upload_batch",
            UiAction::SetPersona(_) => "set_persona",
            UiAction::SetJob(_) => "set_job",
            UiAction::Analyze => "analyze",
            UiAction::Clear => "clear",
            UiAction::CheckHealth => "check_health",
            UiAction::DismissStatus => "dismiss_status",
        }
    }

    /// Whether this action is disabled while another request is in flight.
    pub fn is_gated(&self) -> bool {
        !matches!(
            self,
            UiAction::SetPersona(_) | UiAction::SetJob(_) | UiAction::DismissStatus
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub message: String,
    pub severity: Severity,
}

impl Status {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Severity::Info, message)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(Severity::Success, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    /// Operation failure, rendered as `Error: <message>`.
    pub fn error(message: impl fmt::Display) -> Self {
        Self::new(Severity::Danger, format!("Error: {message}"))
    }
}

pub const MSG_INVALID_PDF: &str = "Please select a valid PDF file";
pub const MSG_INVALID_PDFS: &str = "Please select valid PDF files";
pub const MSG_NO_FILE: &str = "Please select a PDF file first";
pub const MSG_NO_FILES: &str = "Please select PDF files first";
pub const MSG_MISSING_QUERY: &str = "Please fill in both persona and job fields";
pub const MSG_BUSY: &str = "Please wait for the current request to finish";
pub const MSG_OUTLINE_DONE: &str = "PDF outline extracted successfully!";
pub const MSG_ANALYSIS_DONE: &str = "Document analysis completed!";
pub const MSG_CLEARED: &str = "Files cleared successfully";
pub const CLEAR_CONFIRMATION: &str = "Are you sure you want to clear all uploaded files?";
