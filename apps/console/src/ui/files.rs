//! Resolves paths typed by the user into `SelectedFile` values.

use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use shared::domain::SelectedFile;

/// Reads file metadata and guesses the MIME type from the extension.
pub fn select_file(path: &Path) -> Result<SelectedFile> {
    let metadata = fs::metadata(path)
        .with_context(|| format!("cannot read '{}'", path.display()))?;
    if !metadata.is_file() {
        bail!("'{}' is not a file", path.display());
    }
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let mime_type = mime_guess::from_path(path).first_raw().map(str::to_string);
    Ok(SelectedFile {
        name,
        path: path.to_path_buf(),
        mime_type,
        size_bytes: metadata.len(),
    })
}

pub fn select_files<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<SelectedFile>> {
    paths.iter().map(|path| select_file(path.as_ref())).collect()
}
