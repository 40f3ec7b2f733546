//! Single UI state value and the pure transitions that update it.

use shared::domain::SelectedFile;

use crate::controller::events::Status;

/// A display region holding rendered markup; hidden regions keep their last markup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Panel {
    pub visible: bool,
    pub html: String,
}

impl Panel {
    fn show(&mut self, html: String) {
        self.html = html;
        self.visible = true;
    }

    fn hide(&mut self) {
        self.visible = false;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Persona,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inputs {
    pub single_file: Option<SelectedFile>,
    pub batch_files: Vec<SelectedFile>,
    pub persona: String,
    pub job: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UiState {
    /// Loading spinner; doubles as the busy guard for every request-issuing action.
    pub loading: bool,
    pub single_upload_enabled: bool,
    pub batch_upload_enabled: bool,
    pub file_listing: Panel,
    pub outline_panel: Panel,
    pub analysis_panel: Panel,
    pub status: Option<Status>,
    pub inputs: Inputs,
    pub focus: Option<Focus>,
}

#[derive(Debug, Clone)]
pub enum UiTransition {
    SetLoading(bool),
    ShowStatus(Status),
    DismissStatus,
    SetSingleFile(Option<SelectedFile>),
    SetBatchFiles(Vec<SelectedFile>),
    SetSingleUploadEnabled(bool),
    SetBatchUploadEnabled(bool),
    ShowFileListing(String),
    HideFileListing,
    ShowOutline(String),
    HideOutline,
    ShowAnalysis(String),
    HideAnalysis,
    SetPersona(String),
    SetJob(String),
    Focus(Focus),
    ResetFileInputs,
}

pub fn apply(mut state: UiState, transition: UiTransition) -> UiState {
    match transition {
        UiTransition::SetLoading(loading) => state.loading = loading,
        UiTransition::ShowStatus(status) => state.status = Some(status),
        UiTransition::DismissStatus => state.status = None,
        UiTransition::SetSingleFile(file) => state.inputs.single_file = file,
        UiTransition::SetBatchFiles(files) => state.inputs.batch_files = files,
        UiTransition::SetSingleUploadEnabled(enabled) => state.single_upload_enabled = enabled,
        UiTransition::SetBatchUploadEnabled(enabled) => state.batch_upload_enabled = enabled,
        UiTransition::ShowFileListing(html) => state.file_listing.show(html),
        UiTransition::HideFileListing => state.file_listing.hide(),
        UiTransition::ShowOutline(html) => state.outline_panel.show(html),
        UiTransition::HideOutline => state.outline_panel.hide(),
        UiTransition::ShowAnalysis(html) => state.analysis_panel.show(html),
        UiTransition::HideAnalysis => state.analysis_panel.hide(),
        UiTransition::SetPersona(persona) => state.inputs.persona = persona,
        UiTransition::SetJob(job) => state.inputs.job = job,
        UiTransition::Focus(focus) => state.focus = Some(focus),
        UiTransition::ResetFileInputs => {
            state.inputs.single_file = None;
            state.inputs.batch_files.clear();
        }
    }
    state
}

/// Folds a batch of transitions left to right.
pub fn apply_all(state: UiState, transitions: impl IntoIterator<Item = UiTransition>) -> UiState {
    transitions.into_iter().fold(state, apply)
}
