use super::*;
use async_trait::async_trait;
use client_core::{ClientError, Endpoint};
use shared::{
    domain::{Severity, PDF_MIME_TYPE},
    protocol::{
        AnalysisMetadata, AnalysisResult, ClearResponse, HealthStatus, OutlineItem,
        OutlineResult, Section,
    },
};
use std::{
    path::PathBuf,
    sync::{Arc, Mutex},
};

#[derive(Clone, Default)]
struct FakeBackend {
    calls: Arc<Mutex<Vec<String>>>,
    fail_upload_of: Option<String>,
    fail_with: Option<String>,
}

impl FakeBackend {
    fn failing_upload_of(name: &str) -> Self {
        Self {
            fail_upload_of: Some(name.to_string()),
            ..Self::default()
        }
    }

    fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            ..Self::default()
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls").clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().expect("calls").push(call);
    }

    fn rejection(&self, endpoint: Endpoint) -> Option<ClientError> {
        self.fail_with.as_ref().map(|message| ClientError::Rejected {
            endpoint,
            status: Some(500),
            message: message.clone(),
        })
    }
}

#[async_trait]
impl AnalysisBackend for FakeBackend {
    async fn upload_pdf(&self, file: &SelectedFile) -> Result<OutlineResult, ClientError> {
        self.record(format!("upload:{}", file.name));
        if let Some(err) = self.rejection(Endpoint::Upload) {
            return Err(err);
        }
        if self.fail_upload_of.as_deref() == Some(file.name.as_str()) {
            return Err(ClientError::Rejected {
                endpoint: Endpoint::Upload,
                status: Some(400),
                message: "disk full".to_string(),
            });
        }
        Ok(OutlineResult {
            title: format!("Title of {}", file.name),
            total_pages: Some(2),
            outline: vec![OutlineItem {
                level: "H1".to_string().into(),
                text: "Introduction".to_string(),
                page: 1,
                font_size: Some(16.0),
            }],
            metadata: None,
        })
    }

    async fn analyze(&self, request: &AnalyzeRequest) -> Result<AnalysisResult, ClientError> {
        self.record(format!("analyze:{}|{}", request.persona, request.job));
        if let Some(err) = self.rejection(Endpoint::Analyze) {
            return Err(err);
        }
        Ok(AnalysisResult {
            metadata: AnalysisMetadata {
                persona: request.persona.clone(),
                job: request.job.clone(),
                total_sections: Some(1),
                ..AnalysisMetadata::default()
            },
            sections: vec![Section {
                section_title: "Budget tips".to_string(),
                document: "guide.pdf".to_string(),
                page_number: 4,
                importance_rank: 0.93,
                text_length: None,
            }],
            subsections: Vec::new(),
        })
    }

    async fn clear(&self) -> Result<ClearResponse, ClientError> {
        self.record("clear".to_string());
        if let Some(err) = self.rejection(Endpoint::Clear) {
            return Err(err);
        }
        Ok(ClearResponse {
            message: Some("Files cleared successfully".to_string()),
        })
    }

    async fn health(&self) -> Result<HealthStatus, ClientError> {
        self.record("health".to_string());
        if let Some(err) = self.rejection(Endpoint::Health) {
            return Err(err);
        }
        Ok(HealthStatus {
            status: "healthy".to_string(),
            service: "PDF Processor".to_string(),
            rounds: Vec::new(),
        })
    }
}

struct Answer(bool);

impl Confirm for Answer {
    fn confirm(&mut self, _question: &str) -> bool {
        self.0
    }
}

#[derive(Clone, Default)]
struct RecordingSurface(Arc<Mutex<Vec<UiState>>>);

impl RecordingSurface {
    fn frames(&self) -> Vec<UiState> {
        self.0.lock().expect("frames").clone()
    }
}

impl Surface for RecordingSurface {
    fn render(&mut self, state: &UiState) -> anyhow::Result<()> {
        self.0.lock().expect("frames").push(state.clone());
        Ok(())
    }
}

fn controller(
    backend: &FakeBackend,
    confirm: bool,
) -> (ClientController<FakeBackend, Answer>, RecordingSurface) {
    let surface = RecordingSurface::default();
    let controller =
        ClientController::new(backend.clone(), Answer(confirm), Box::new(surface.clone()));
    (controller, surface)
}

fn pdf(name: &str, size_bytes: u64) -> SelectedFile {
    SelectedFile {
        name: name.to_string(),
        path: PathBuf::from(name),
        mime_type: Some(PDF_MIME_TYPE.to_string()),
        size_bytes,
    }
}

fn text_file(name: &str) -> SelectedFile {
    SelectedFile {
        name: name.to_string(),
        path: PathBuf::from(name),
        mime_type: Some("text/plain".to_string()),
        size_bytes: 12,
    }
}

fn status(controller: &ClientController<FakeBackend, Answer>) -> Status {
    controller.state().status.clone().expect("status")
}

#[tokio::test]
async fn non_pdf_single_selection_keeps_upload_disabled() {
    let backend = FakeBackend::default();
    let (mut controller, _) = controller(&backend, true);

    controller
        .dispatch(UiAction::SelectSingleFile(Some(text_file("notes.txt"))))
        .await;
    assert!(!controller.state().single_upload_enabled);
    assert_eq!(status(&controller), Status::warning(MSG_INVALID_PDF));

    controller.dispatch(UiAction::UploadSingle).await;

    assert!(backend.calls().is_empty());
    assert!(!controller.state().single_upload_enabled);
}

#[tokio::test]
async fn pdf_single_selection_enables_upload() {
    let backend = FakeBackend::default();
    let (mut controller, _) = controller(&backend, true);

    controller
        .dispatch(UiAction::SelectSingleFile(Some(pdf("paper.pdf", 10))))
        .await;

    assert!(controller.state().single_upload_enabled);
    assert_eq!(status(&controller), Status::info("PDF file selected: paper.pdf"));
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn empty_single_selection_disables_without_status() {
    let backend = FakeBackend::default();
    let (mut controller, _) = controller(&backend, true);

    controller.dispatch(UiAction::SelectSingleFile(None)).await;

    assert!(!controller.state().single_upload_enabled);
    assert!(controller.state().status.is_none());
}

#[tokio::test]
async fn upload_without_selection_warns_locally() {
    let backend = FakeBackend::default();
    let (mut controller, surface) = controller(&backend, true);

    controller.dispatch(UiAction::UploadSingle).await;

    assert!(backend.calls().is_empty());
    assert_eq!(status(&controller), Status::warning(MSG_NO_FILE));
    assert!(surface.frames().iter().all(|frame| !frame.loading));
}

#[tokio::test]
async fn batch_selection_lists_only_pdfs() {
    let backend = FakeBackend::default();
    let (mut controller, _) = controller(&backend, true);

    controller
        .dispatch(UiAction::SelectMultipleFiles(vec![
            pdf("a.pdf", 1_048_576),
            text_file("readme.txt"),
            pdf("b.pdf", 3_670_016),
        ]))
        .await;

    let state = controller.state();
    assert!(state.batch_upload_enabled);
    assert!(state.file_listing.visible);
    assert!(state.file_listing.html.contains("a.pdf (1.00 MB)"));
    assert!(state.file_listing.html.contains("b.pdf (3.50 MB)"));
    assert!(!state.file_listing.html.contains("readme.txt"));
    assert_eq!(state.file_listing.html.matches("<div>").count(), 2);
    assert_eq!(
        status(&controller),
        Status::warning("Note: 1 non-PDF files were ignored")
    );
}

#[tokio::test]
async fn batch_selection_of_only_pdfs_reports_count() {
    let backend = FakeBackend::default();
    let (mut controller, _) = controller(&backend, true);

    controller
        .dispatch(UiAction::SelectMultipleFiles(vec![pdf("a.pdf", 1), pdf("b.pdf", 1)]))
        .await;

    assert_eq!(
        status(&controller),
        Status::info("2 PDF files selected for analysis")
    );
}

#[tokio::test]
async fn batch_selection_without_pdfs_hides_listing() {
    let backend = FakeBackend::default();
    let (mut controller, _) = controller(&backend, true);
    controller
        .dispatch(UiAction::SelectMultipleFiles(vec![pdf("a.pdf", 1)]))
        .await;

    controller
        .dispatch(UiAction::SelectMultipleFiles(vec![text_file("x.txt")]))
        .await;
    assert!(!controller.state().batch_upload_enabled);
    assert!(!controller.state().file_listing.visible);
    assert_eq!(status(&controller), Status::warning(MSG_INVALID_PDFS));

    controller.dispatch(UiAction::DismissStatus).await;
    controller.dispatch(UiAction::SelectMultipleFiles(Vec::new())).await;
    assert!(controller.state().status.is_none());
}

#[tokio::test]
async fn analyze_requires_persona_and_job() {
    let backend = FakeBackend::default();
    let (mut controller, _) = controller(&backend, true);

    for (persona, job) in [("", "x"), ("x", ""), ("   ", "x")] {
        controller.dispatch(UiAction::SetPersona(persona.to_string())).await;
        controller.dispatch(UiAction::SetJob(job.to_string())).await;
        controller.dispatch(UiAction::Analyze).await;
        assert_eq!(status(&controller), Status::warning(MSG_MISSING_QUERY));
    }

    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn batch_upload_stops_at_first_failure() {
    let backend = FakeBackend::failing_upload_of("b.pdf");
    let (mut controller, _) = controller(&backend, true);
    controller
        .dispatch(UiAction::SelectMultipleFiles(vec![
            pdf("a.pdf", 1),
            pdf("b.pdf", 1),
            pdf("c.pdf", 1),
        ]))
        .await;

    controller.dispatch(UiAction::UploadBatch).await;

    assert_eq!(backend.calls(), ["upload:a.pdf", "upload:b.pdf"]);
    let status = status(&controller);
    assert_eq!(status.severity, Severity::Danger);
    assert_eq!(status.message, "Error: Failed to upload b.pdf: disk full");
    assert!(!controller.state().loading);
    assert_eq!(controller.state().focus, None);
}

#[tokio::test]
async fn batch_upload_success_moves_focus_to_persona() {
    let backend = FakeBackend::default();
    let (mut controller, surface) = controller(&backend, true);
    controller
        .dispatch(UiAction::SelectMultipleFiles(vec![
            pdf("a.pdf", 1),
            text_file("skip.txt"),
            pdf("b.pdf", 1),
        ]))
        .await;

    controller.dispatch(UiAction::UploadBatch).await;

    assert_eq!(backend.calls(), ["upload:a.pdf", "upload:b.pdf"]);
    assert_eq!(
        status(&controller),
        Status::success("Successfully uploaded 2 PDF files for analysis!")
    );
    assert_eq!(controller.state().focus, Some(Focus::Persona));
    assert!(!controller.state().loading);
    assert!(surface.frames().iter().any(|frame| frame.loading));
}

#[tokio::test]
async fn batch_upload_without_pdfs_warns() {
    let backend = FakeBackend::default();
    let (mut controller, _) = controller(&backend, true);

    controller.dispatch(UiAction::UploadBatch).await;

    assert!(backend.calls().is_empty());
    assert_eq!(status(&controller), Status::warning(MSG_NO_FILES));
}

#[tokio::test]
async fn single_upload_hides_old_outline_while_loading() {
    let backend = FakeBackend::default();
    let (mut controller, surface) = controller(&backend, true);
    controller
        .dispatch(UiAction::SelectSingleFile(Some(pdf("first.pdf", 1))))
        .await;
    controller.dispatch(UiAction::UploadSingle).await;
    assert!(controller.state().outline_panel.visible);

    controller
        .dispatch(UiAction::SelectSingleFile(Some(pdf("second.pdf", 1))))
        .await;
    controller.dispatch(UiAction::UploadSingle).await;

    let frames = surface.frames();
    let loading_frame = frames.iter().rev().find(|frame| frame.loading).expect("loading frame");
    assert!(!loading_frame.outline_panel.visible);
    let state = controller.state();
    assert!(!state.loading);
    assert!(state.outline_panel.visible);
    assert!(state.outline_panel.html.contains("Title of second.pdf"));
    assert_eq!(status(&controller), Status::success(MSG_OUTLINE_DONE));
}

#[tokio::test]
async fn single_upload_failure_releases_loading() {
    let backend = FakeBackend::failing("File must be a PDF");
    let (mut controller, _) = controller(&backend, true);
    controller
        .dispatch(UiAction::SelectSingleFile(Some(pdf("scan.pdf", 1))))
        .await;

    controller.dispatch(UiAction::UploadSingle).await;

    assert_eq!(backend.calls(), ["upload:scan.pdf"]);
    assert!(!controller.state().loading);
    assert!(!controller.state().outline_panel.visible);
    assert_eq!(
        status(&controller),
        Status::new(Severity::Danger, "Error: File must be a PDF")
    );
}

#[tokio::test]
async fn analyze_sends_trimmed_query_and_renders() {
    let backend = FakeBackend::default();
    let (mut controller, _) = controller(&backend, true);
    controller
        .dispatch(UiAction::SetPersona("  Travel planner ".to_string()))
        .await;
    controller
        .dispatch(UiAction::SetJob("Plan a 4-day trip\n".to_string()))
        .await;

    controller.dispatch(UiAction::Analyze).await;

    assert_eq!(backend.calls(), ["analyze:Travel planner|Plan a 4-day trip"]);
    let state = controller.state();
    assert!(!state.loading);
    assert!(state.analysis_panel.visible);
    assert!(state.analysis_panel.html.contains("Budget tips"));
    assert!(state.analysis_panel.html.contains("bg-success"));
    assert_eq!(status(&controller), Status::success(MSG_ANALYSIS_DONE));
}

#[tokio::test]
async fn analyze_failure_shows_danger_and_releases_loading() {
    let backend = FakeBackend::failing("No PDF files found in input directory");
    let (mut controller, _) = controller(&backend, true);
    controller.dispatch(UiAction::SetPersona("p".to_string())).await;
    controller.dispatch(UiAction::SetJob("j".to_string())).await;

    controller.dispatch(UiAction::Analyze).await;

    assert!(!controller.state().loading);
    assert!(!controller.state().analysis_panel.visible);
    assert_eq!(
        status(&controller),
        Status::new(
            Severity::Danger,
            "Error: No PDF files found in input directory"
        )
    );
}

#[tokio::test]
async fn declined_clear_changes_nothing() {
    let backend = FakeBackend::default();
    let (mut controller, surface) = controller(&backend, false);
    controller
        .dispatch(UiAction::SelectSingleFile(Some(pdf("keep.pdf", 1))))
        .await;
    controller.dispatch(UiAction::UploadSingle).await;
    controller.dispatch(UiAction::SetPersona("Analyst".to_string())).await;
    let before = controller.state().clone();
    let frames_before = surface.frames().len();

    controller.dispatch(UiAction::Clear).await;

    assert_eq!(controller.state(), &before);
    assert_eq!(surface.frames().len(), frames_before);
    assert_eq!(backend.calls(), ["upload:keep.pdf"]);
}

#[tokio::test]
async fn confirmed_clear_resets_inputs_and_panels() {
    let backend = FakeBackend::default();
    let (mut controller, _) = controller(&backend, true);
    controller
        .dispatch(UiAction::SelectSingleFile(Some(pdf("one.pdf", 1))))
        .await;
    controller
        .dispatch(UiAction::SelectMultipleFiles(vec![pdf("two.pdf", 1)]))
        .await;
    controller.dispatch(UiAction::UploadSingle).await;
    controller.dispatch(UiAction::SetPersona("Analyst".to_string())).await;

    controller.dispatch(UiAction::Clear).await;

    let state = controller.state();
    assert!(state.inputs.single_file.is_none());
    assert!(state.inputs.batch_files.is_empty());
    assert_eq!(state.inputs.persona, "Analyst");
    assert!(!state.single_upload_enabled);
    assert!(!state.batch_upload_enabled);
    assert!(!state.file_listing.visible);
    assert!(!state.outline_panel.visible);
    assert!(!state.analysis_panel.visible);
    assert!(!state.loading);
    assert_eq!(status(&controller), Status::success(MSG_CLEARED));
}

#[tokio::test]
async fn failed_clear_keeps_results() {
    let backend = FakeBackend::default();
    let (mut controller, _) = controller(&backend, true);
    controller
        .dispatch(UiAction::SelectSingleFile(Some(pdf("one.pdf", 1))))
        .await;
    controller.dispatch(UiAction::UploadSingle).await;

    let failing = FakeBackend::failing("Failed to clear files: busy");
    controller.backend = failing.clone();
    controller.dispatch(UiAction::Clear).await;

    assert_eq!(failing.calls(), ["clear"]);
    assert!(controller.state().outline_panel.visible);
    assert!(controller.state().single_upload_enabled);
    assert!(!controller.state().loading);
    assert_eq!(
        status(&controller),
        Status::new(Severity::Danger, "Error: Failed to clear files: busy")
    );
}

#[tokio::test]
async fn busy_flag_gates_request_actions_only() {
    let backend = FakeBackend::default();
    let (mut controller, _) = controller(&backend, true);
    controller
        .dispatch(UiAction::SelectMultipleFiles(vec![pdf("a.pdf", 1)]))
        .await;
    controller.state.loading = true;

    controller.dispatch(UiAction::UploadBatch).await;
    controller.dispatch(UiAction::Clear).await;
    assert_eq!(status(&controller), Status::warning(MSG_BUSY));

    controller.dispatch(UiAction::SetJob("still editable".to_string())).await;

    assert!(backend.calls().is_empty());
    assert_eq!(controller.state().inputs.job, "still editable");
    assert!(controller.state().loading);
}

#[tokio::test]
async fn health_check_reports_service_status() {
    let backend = FakeBackend::default();
    let (mut controller, _) = controller(&backend, true);

    controller.dispatch(UiAction::CheckHealth).await;

    assert_eq!(backend.calls(), ["health"]);
    assert_eq!(status(&controller), Status::info("PDF Processor: healthy"));
    assert!(!controller.state().loading);
}
