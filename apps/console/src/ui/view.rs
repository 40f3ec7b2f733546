//! View binding: named display regions and the surfaces that draw a `UiState`.

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

use crate::{
    controller::reducer::{Focus, Panel, UiState},
    ui::render::{escape, render_status},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Status,
    Loading,
    FileListing,
    OutlineResults,
    AnalysisResults,
}

impl Region {
    pub const ALL: [Region; 5] = [
        Region::Status,
        Region::Loading,
        Region::FileListing,
        Region::OutlineResults,
        Region::AnalysisResults,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Region::Status => "statusMessage",
            Region::Loading => "loadingSpinner",
            Region::FileListing => "uploadedFilesList",
            Region::OutlineResults => "outlineResults",
            Region::AnalysisResults => "analysisResults",
        }
    }

    fn heading(self) -> Option<&'static str> {
        match self {
            Region::FileListing => Some("Selected files"),
            Region::OutlineResults => Some("Document outline"),
            Region::AnalysisResults => Some("Persona analysis"),
            Region::Status | Region::Loading => None,
        }
    }
}

/// Something that can draw the whole UI state in one pass.
pub trait Surface {
    fn render(&mut self, state: &UiState) -> Result<()>;
}

fn region_markup(region: Region, state: &UiState) -> String {
    let (visible, body) = match region {
        Region::Status => match &state.status {
            Some(status) => (true, render_status(status)),
            None => (false, String::new()),
        },
        Region::Loading => (
            state.loading,
            r#"<div class="spinner-border" role="status"><span class="visually-hidden">Loading...</span></div>"#
                .to_string(),
        ),
        Region::FileListing => panel_body(&state.file_listing),
        Region::OutlineResults => panel_body(&state.outline_panel),
        Region::AnalysisResults => panel_body(&state.analysis_panel),
    };
    let hidden = if visible { "" } else { " d-none" };
    let heading = region
        .heading()
        .map(|heading| format!("<h5>{heading}</h5>"))
        .unwrap_or_default();
    format!(
        r#"<section id="{id}" class="region{hidden}">{heading}{body}</section>"#,
        id = region.id()
    )
}

fn panel_body(panel: &Panel) -> (bool, String) {
    (panel.visible, panel.html.clone())
}

/// Composes every region into one standalone HTML document.
pub fn render_page(title: &str, state: &UiState) -> String {
    let regions: String = Region::ALL
        .iter()
        .map(|region| region_markup(*region, state))
        .collect();
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\"><head><meta charset=\"utf-8\"><title>{title}</title>\
         <style>.d-none{{display:none}}</style></head><body><main class=\"container\">{regions}</main></body></html>\n",
        title = escape(title)
    )
}

/// Writes the rendered page to a fixed file, replacing it atomically on each render.
pub struct HtmlPageSurface {
    title: String,
    page_path: PathBuf,
    staging_path: PathBuf,
}

impl HtmlPageSurface {
    pub fn create(output_dir: &Path, title: impl Into<String>) -> Result<Self> {
        fs::create_dir_all(output_dir).with_context(|| {
            format!("failed to create output directory '{}'", output_dir.display())
        })?;
        Ok(Self {
            title: title.into(),
            page_path: output_dir.join("index.html"),
            staging_path: output_dir.join(".index.html.tmp"),
        })
    }

    pub fn page_path(&self) -> &Path {
        &self.page_path
    }
}

impl Surface for HtmlPageSurface {
    fn render(&mut self, state: &UiState) -> Result<()> {
        let page = render_page(&self.title, state);
        fs::write(&self.staging_path, page)
            .with_context(|| format!("failed to write '{}'", self.staging_path.display()))?;
        fs::rename(&self.staging_path, &self.page_path)
            .with_context(|| format!("failed to replace '{}'", self.page_path.display()))?;
        Ok(())
    }
}

/// Echoes status and loading changes as plain terminal lines.
pub struct TerminalSurface<W: Write> {
    out: W,
    last_status: Option<String>,
    last_loading: bool,
    last_focus: Option<Focus>,
}

impl TerminalSurface<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            last_status: None,
            last_loading: false,
            last_focus: None,
        }
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Surface for TerminalSurface<W> {
    fn render(&mut self, state: &UiState) -> Result<()> {
        if state.loading && !self.last_loading {
            writeln!(self.out, "... working")?;
        }
        self.last_loading = state.loading;

        let line = state
            .status
            .as_ref()
            .map(|status| format!("[{}] {}", status.severity, status.message));
        if line != self.last_status {
            if let Some(line) = &line {
                writeln!(self.out, "{line}")?;
            }
            self.last_status = line;
        }

        if state.focus != self.last_focus {
            if let Some(Focus::Persona) = state.focus {
                writeln!(self.out, "Next: describe the reader with `persona <text>`")?;
            }
            self.last_focus = state.focus;
        }
        self.out.flush()?;
        Ok(())
    }
}

/// Fans a render out to several surfaces; stops at the first failure.
pub struct Surfaces(pub Vec<Box<dyn Surface + Send>>);

impl Surface for Surfaces {
    fn render(&mut self, state: &UiState) -> Result<()> {
        for surface in &mut self.0 {
            surface.render(state)?;
        }
        Ok(())
    }
}
