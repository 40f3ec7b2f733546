//! Pure renderers from service responses to HTML fragments.
//!
//! Every string that originates from the user or the service goes through
//! [`escape`]; uploaded PDFs are third-party content.

use std::{borrow::Cow, fmt::Write as _};

use shared::{
    domain::{relevance_percent, RelevanceTier, SelectedFile},
    protocol::{AnalysisResult, OutlineResult, Section, Subsection, DEFAULT_RELEVANCE_THRESHOLD},
};

use crate::controller::events::Status;

pub const MAX_SECTIONS: usize = 10;
pub const MAX_SUBSECTIONS: usize = 5;
/// Pixels per outline indent unit.
pub const INDENT_PX: u32 = 20;

const DEFAULT_EXTRACTION_METHOD: &str = "Font-based heuristics";
const DEFAULT_ANALYSIS_METHOD: &str = "DistilBERT";
const FONT_THRESHOLDS: &str = "H1 (&gt;14pt + bold), H2 (&gt;12pt), H3 (&gt;10pt)";

pub fn escape(text: &str) -> Cow<'_, str> {
    html_escape::encode_safe(text)
}

pub fn render_outline(data: &OutlineResult) -> String {
    let mut html = String::new();
    let total_pages = data
        .total_pages
        .filter(|pages| *pages > 0)
        .map_or_else(|| "Unknown".to_string(), |pages| pages.to_string());
    let _ = write!(
        html,
        r#"<div class="mb-3"><h6><i class="fas fa-file-pdf me-2"></i>Title: {}</h6><small class="text-muted">Total Pages: {}</small></div>"#,
        escape(&data.title),
        total_pages
    );

    if data.outline.is_empty() {
        html.push_str(r#"<div class="alert alert-info">No structured headings found in this PDF.</div>"#);
    } else {
        html.push_str(r#"<div class="outline-tree">"#);
        for item in &data.outline {
            let label = escape(item.level.label());
            let font_size = item
                .font_size
                .filter(|size| *size != 0.0)
                .map(|size| format!(r#"<br><small class="text-muted">{size}pt</small>"#))
                .unwrap_or_default();
            let _ = write!(
                html,
                r#"<div class="outline-item level-{class}" style="margin-left: {indent}px;"><div class="d-flex justify-content-between align-items-start"><div><span class="badge bg-{color} me-2">{label}</span><strong>{text}</strong></div><div class="text-end"><small class="text-muted">Page {page}</small>{font_size}</div></div></div>"#,
                class = label.to_lowercase(),
                indent = item.level.indent() * INDENT_PX,
                color = item.level.badge_color(),
                text = escape(&item.text),
                page = item.page,
            );
        }
        html.push_str("</div>");
    }

    if let Some(metadata) = &data.metadata {
        let method = metadata
            .extraction_method
            .as_deref()
            .filter(|method| !method.is_empty())
            .unwrap_or(DEFAULT_EXTRACTION_METHOD);
        let _ = write!(
            html,
            r#"<div class="mt-3 p-3 bg-body-secondary rounded"><small class="text-muted"><strong>Extraction Method:</strong> {}<br><strong>Font Thresholds:</strong> {FONT_THRESHOLDS}</small></div>"#,
            escape(method)
        );
    }

    html
}

pub fn render_analysis(data: &AnalysisResult) -> String {
    let metadata = &data.metadata;
    let mut html = String::new();

    let method = metadata
        .analysis_method
        .as_deref()
        .filter(|method| !method.is_empty())
        .unwrap_or(DEFAULT_ANALYSIS_METHOD);
    let threshold = metadata
        .relevance_threshold
        .filter(|threshold| *threshold > 0.0)
        .unwrap_or(DEFAULT_RELEVANCE_THRESHOLD);
    let _ = write!(
        html,
        r#"<div class="row mb-4"><div class="col-md-6"><h6><i class="fas fa-user me-2"></i>Persona: {persona}</h6><h6><i class="fas fa-tasks me-2"></i>Job: {job}</h6></div><div class="col-md-6 text-md-end"><small class="text-muted">Analysis Method: {method}<br>Processed: {documents} documents<br>Threshold: {threshold}</small></div></div>"#,
        persona = escape(&metadata.persona),
        job = escape(&metadata.job),
        method = escape(method),
        documents = metadata.documents.len(),
    );

    let _ = write!(
        html,
        r#"<div class="row mb-4">{}{}{}</div>"#,
        counter("primary", &metadata.total_sections.unwrap_or(0).to_string(), "Relevant Sections"),
        counter("success", &metadata.total_subsections.unwrap_or(0).to_string(), "Subsections"),
        counter(
            "info",
            &format!("{:.2}", metadata.avg_relevance.unwrap_or(0.0)),
            "Avg. Relevance"
        ),
    );

    if data.sections.is_empty() {
        let _ = write!(
            html,
            r#"<div class="alert alert-warning">No sections found above the relevance threshold ({DEFAULT_RELEVANCE_THRESHOLD}).</div>"#
        );
    } else {
        html.push_str(r#"<h6><i class="fas fa-star me-2"></i>Most Relevant Sections</h6><div class="list-group mb-4">"#);
        for section in data.sections.iter().take(MAX_SECTIONS) {
            html.push_str(&render_section(section));
        }
        html.push_str("</div>");
    }

    if !data.subsections.is_empty() {
        html.push_str(r#"<h6><i class="fas fa-text-height me-2"></i>Text Excerpts</h6><div class="accordion" id="textAccordion">"#);
        for (index, subsection) in data.subsections.iter().take(MAX_SUBSECTIONS).enumerate() {
            html.push_str(&render_subsection(index, subsection));
        }
        html.push_str("</div>");
    }

    html
}

fn counter(tone: &str, value: &str, label: &str) -> String {
    format!(
        r#"<div class="col-md-4"><div class="text-center p-3 bg-{tone} bg-opacity-10 rounded"><h4 class="text-{tone}">{value}</h4><small>{label}</small></div></div>"#
    )
}

fn render_section(section: &Section) -> String {
    let percent = relevance_percent(section.importance_rank);
    let color = RelevanceTier::from_score(section.importance_rank).color();
    format!(
        r#"<div class="list-group-item"><div class="d-flex justify-content-between align-items-start"><div class="flex-grow-1"><h6 class="mb-1">{title}</h6><p class="mb-1 text-muted"><i class="fas fa-file me-1"></i>{document} (Page {page})</p></div><div class="text-end"><span class="badge bg-{color}">{percent}%</span></div></div><div class="progress mt-2" style="height: 4px;"><div class="progress-bar bg-{color}" style="width: {percent}%"></div></div></div>"#,
        title = escape(&section.section_title),
        document = escape(&section.document),
        page = section.page_number,
    )
}

fn render_subsection(index: usize, subsection: &Subsection) -> String {
    format!(
        r##"<div class="accordion-item"><h2 class="accordion-header"><button class="accordion-button collapsed" type="button" data-bs-toggle="collapse" data-bs-target="#collapse{index}">{document} - Page {page}<span class="badge bg-info ms-2">{percent}%</span></button></h2><div id="collapse{index}" class="accordion-collapse collapse" data-bs-parent="#textAccordion"><div class="accordion-body"><div class="text-muted small">{text}</div></div></div></div>"##,
        document = escape(&subsection.document),
        page = subsection.page_number,
        percent = relevance_percent(subsection.relevance_score),
        text = escape(&subsection.refined_text),
    )
}

/// One line per selected PDF: name and size in MiB.
pub fn render_file_listing(files: &[SelectedFile]) -> String {
    files
        .iter()
        .map(|file| {
            format!(
                r#"<div><i class="fas fa-file-pdf text-danger me-2"></i>{} ({:.2} MB)</div>"#,
                escape(&file.name),
                file.size_mib()
            )
        })
        .collect()
}

pub fn render_status(status: &Status) -> String {
    format!(
        r#"<div class="alert alert-{} alert-dismissible fade show" role="alert">{}<button type="button" class="btn-close" data-bs-dismiss="alert"></button></div>"#,
        status.severity,
        escape(&status.message)
    )
}

#[cfg(test)]
#[path = "../tests/render_tests.rs"]
mod tests;
