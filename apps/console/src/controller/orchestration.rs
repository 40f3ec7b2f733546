//! Request sequencing shared by controller operations.

use std::fmt;

use client_core::{AnalysisBackend, ClientError};
use shared::domain::SelectedFile;
use tracing::{debug, warn};

#[derive(Debug)]
pub struct BatchFailure {
    /// Zero-based position of the failing file in the batch.
    pub index: usize,
    pub file_name: String,
    pub error: ClientError,
}

impl fmt::Display for BatchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Failed to upload {}: {}", self.file_name, self.error)
    }
}

/// Uploads `files` one at a time, in order, stopping at the first failure.
///
/// Files after the failing one are never sent and earlier uploads stay on the
/// server. Returns the number of files uploaded.
pub async fn upload_in_order<B>(backend: &B, files: &[SelectedFile]) -> Result<usize, BatchFailure>
where
    B: AnalysisBackend + ?Sized,
{
    for (index, file) in files.iter().enumerate() {
        debug!(index, total = files.len(), file = %file.name, "batch upload step");
        if let Err(error) = backend.upload_pdf(file).await {
            warn!(index, file = %file.name, error = %error, "batch upload halted");
            return Err(BatchFailure {
                index,
                file_name: file.name.clone(),
                error,
            });
        }
    }
    Ok(files.len())
}
