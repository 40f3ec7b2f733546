//! Controller layer: UI events, reducer-like state transitions, and request orchestration.

pub mod events;
pub mod orchestration;
pub mod reducer;

use client_core::AnalysisBackend;
use shared::{
    domain::{partition_pdfs, SelectedFile},
    protocol::AnalyzeRequest,
};
use tracing::{debug, error, info, warn};

use crate::ui::{
    prompt::Confirm,
    render::{render_analysis, render_file_listing, render_outline},
    view::Surface,
};
use events::{
    Status, UiAction, CLEAR_CONFIRMATION, MSG_ANALYSIS_DONE, MSG_BUSY, MSG_CLEARED,
    MSG_INVALID_PDF, MSG_INVALID_PDFS, MSG_MISSING_QUERY, MSG_NO_FILE, MSG_NO_FILES,
    MSG_OUTLINE_DONE,
};
use orchestration::upload_in_order;
use reducer::{apply_all, Focus, UiState, UiTransition};

/// Turns user actions into service requests and service responses into UI state.
///
/// All actions enter through [`ClientController::dispatch`], which refuses
/// request-issuing actions while `loading` is set. Every operation that sets
/// `loading` clears it again in its final commit, on success and failure alike.
pub struct ClientController<B, C> {
    backend: B,
    confirm: C,
    surface: Box<dyn Surface + Send>,
    state: UiState,
}

impl<B, C> ClientController<B, C>
where
    B: AnalysisBackend,
    C: Confirm,
{
    pub fn new(backend: B, confirm: C, surface: Box<dyn Surface + Send>) -> Self {
        let mut controller = Self {
            backend,
            confirm,
            surface,
            state: UiState::default(),
        };
        controller.commit([]);
        controller
    }

    pub fn state(&self) -> &UiState {
        &self.state
    }

    pub async fn dispatch(&mut self, action: UiAction) {
        if action.is_gated() && self.state.loading {
            warn!(action = action.name(), "action refused while a request is in flight");
            self.commit([UiTransition::ShowStatus(Status::warning(MSG_BUSY))]);
            return;
        }
        debug!(action = action.name(), "dispatching ui action");

        match action {
            UiAction::SelectSingleFile(file) => self.select_single_file(file),
            UiAction::SelectMultipleFiles(files) => self.select_multiple_files(files),
            UiAction::UploadSingle => self.upload_single().await,
            UiAction::UploadBatch => self.upload_batch().await,
            UiAction::SetPersona(persona) => self.commit([UiTransition::SetPersona(persona)]),
            UiAction::SetJob(job) => self.commit([UiTransition::SetJob(job)]),
            UiAction::Analyze => self.analyze().await,
            UiAction::Clear => self.clear().await,
            UiAction::CheckHealth => self.check_health().await,
            UiAction::DismissStatus => self.commit([UiTransition::DismissStatus]),
        }
    }

    /// Applies transitions and redraws once.
    fn commit(&mut self, transitions: impl IntoIterator<Item = UiTransition>) {
        let state = std::mem::take(&mut self.state);
        self.state = apply_all(state, transitions);
        if let Err(err) = self.surface.render(&self.state) {
            warn!(error = %err, "failed to render ui state");
        }
    }

    fn begin_request(&mut self, hide: Option<UiTransition>) {
        self.commit(std::iter::once(UiTransition::SetLoading(true)).chain(hide));
    }

    fn finish_request(&mut self, transitions: Vec<UiTransition>) {
        self.commit(
            transitions
                .into_iter()
                .chain(std::iter::once(UiTransition::SetLoading(false))),
        );
    }

    fn warn_user(&mut self, message: &str) {
        self.commit([UiTransition::ShowStatus(Status::warning(message))]);
    }

    fn select_single_file(&mut self, file: Option<SelectedFile>) {
        let mut transitions = vec![UiTransition::SetSingleFile(file.clone())];
        match file {
            Some(file) if file.is_pdf() => {
                transitions.push(UiTransition::SetSingleUploadEnabled(true));
                transitions.push(UiTransition::ShowStatus(Status::info(format!(
                    "PDF file selected: {}",
                    file.name
                ))));
            }
            Some(file) => {
                debug!(file = %file.name, mime_type = ?file.mime_type, "rejected non-pdf selection");
                transitions.push(UiTransition::SetSingleUploadEnabled(false));
                transitions.push(UiTransition::ShowStatus(Status::warning(MSG_INVALID_PDF)));
            }
            None => transitions.push(UiTransition::SetSingleUploadEnabled(false)),
        }
        self.commit(transitions);
    }

    fn select_multiple_files(&mut self, files: Vec<SelectedFile>) {
        let (pdfs, ignored) = partition_pdfs(&files);
        let selected_any = !files.is_empty();
        let mut transitions = vec![UiTransition::SetBatchFiles(files)];

        if pdfs.is_empty() {
            transitions.push(UiTransition::SetBatchUploadEnabled(false));
            transitions.push(UiTransition::HideFileListing);
            if selected_any {
                transitions.push(UiTransition::ShowStatus(Status::warning(MSG_INVALID_PDFS)));
            }
        } else {
            let selected = format!("{} PDF files selected for analysis", pdfs.len());
            info!(pdfs = pdfs.len(), ignored = ignored.len(), "{selected}");
            transitions.push(UiTransition::SetBatchUploadEnabled(true));
            transitions.push(UiTransition::ShowFileListing(render_file_listing(&pdfs)));
            transitions.push(UiTransition::ShowStatus(Status::info(selected)));
            if !ignored.is_empty() {
                transitions.push(UiTransition::ShowStatus(Status::warning(format!(
                    "Note: {} non-PDF files were ignored",
                    ignored.len()
                ))));
            }
        }
        self.commit(transitions);
    }

    async fn upload_single(&mut self) {
        let Some(file) = self.state.inputs.single_file.clone() else {
            self.warn_user(MSG_NO_FILE);
            return;
        };
        if !file.is_pdf() {
            self.warn_user(MSG_INVALID_PDF);
            return;
        }

        self.begin_request(Some(UiTransition::HideOutline));
        let transitions = match self.backend.upload_pdf(&file).await {
            Ok(outline) => {
                info!(file = %file.name, headings = outline.outline.len(), "outline extracted");
                vec![
                    UiTransition::ShowOutline(render_outline(&outline)),
                    UiTransition::ShowStatus(Status::success(MSG_OUTLINE_DONE)),
                ]
            }
            Err(err) => {
                error!(file = %file.name, error = %err, "upload failed");
                vec![UiTransition::ShowStatus(Status::error(&err))]
            }
        };
        self.finish_request(transitions);
    }

    async fn upload_batch(&mut self) {
        let (pdfs, _) = partition_pdfs(&self.state.inputs.batch_files);
        if pdfs.is_empty() {
            self.warn_user(MSG_NO_FILES);
            return;
        }

        self.begin_request(None);
        let transitions = match upload_in_order(&self.backend, &pdfs).await {
            Ok(uploaded) => {
                info!(uploaded, "batch upload complete");
                vec![
                    UiTransition::ShowStatus(Status::success(format!(
                        "Successfully uploaded {uploaded} PDF files for analysis!"
                    ))),
                    UiTransition::Focus(Focus::Persona),
                ]
            }
            Err(failure) => {
                error!(
                    index = failure.index,
                    file = %failure.file_name,
                    error = %failure.error,
                    "batch upload failed"
                );
                vec![UiTransition::ShowStatus(Status::error(&failure))]
            }
        };
        self.finish_request(transitions);
    }

    async fn analyze(&mut self) {
        let Some(request) =
            AnalyzeRequest::trimmed(&self.state.inputs.persona, &self.state.inputs.job)
        else {
            self.warn_user(MSG_MISSING_QUERY);
            return;
        };

        self.begin_request(Some(UiTransition::HideAnalysis));
        let transitions = match self.backend.analyze(&request).await {
            Ok(result) => {
                info!(
                    sections = result.sections.len(),
                    subsections = result.subsections.len(),
                    "analysis complete"
                );
                vec![
                    UiTransition::ShowAnalysis(render_analysis(&result)),
                    UiTransition::ShowStatus(Status::success(MSG_ANALYSIS_DONE)),
                ]
            }
            Err(err) => {
                error!(error = %err, "analysis failed");
                vec![UiTransition::ShowStatus(Status::error(&err))]
            }
        };
        self.finish_request(transitions);
    }

    async fn clear(&mut self) {
        if !self.confirm.confirm(CLEAR_CONFIRMATION) {
            debug!("clear declined");
            return;
        }

        self.begin_request(None);
        let transitions = match self.backend.clear().await {
            Ok(response) => {
                info!(message = ?response.message, "uploaded files cleared");
                vec![
                    UiTransition::ResetFileInputs,
                    UiTransition::SetSingleUploadEnabled(false),
                    UiTransition::SetBatchUploadEnabled(false),
                    UiTransition::HideFileListing,
                    UiTransition::HideOutline,
                    UiTransition::HideAnalysis,
                    UiTransition::ShowStatus(Status::success(MSG_CLEARED)),
                ]
            }
            Err(err) => {
                error!(error = %err, "clear failed");
                vec![UiTransition::ShowStatus(Status::error(&err))]
            }
        };
        self.finish_request(transitions);
    }

    async fn check_health(&mut self) {
        self.begin_request(None);
        let transitions = match self.backend.health().await {
            Ok(health) => {
                let service = if health.service.is_empty() {
                    "Service"
                } else {
                    health.service.as_str()
                };
                vec![UiTransition::ShowStatus(Status::info(format!(
                    "{service}: {}",
                    health.status
                )))]
            }
            Err(err) => {
                error!(error = %err, "health check failed");
                vec![UiTransition::ShowStatus(Status::error(&err))]
            }
        };
        self.finish_request(transitions);
    }
}

#[cfg(test)]
#[path = "../tests/controller_tests.rs"]
mod tests;
