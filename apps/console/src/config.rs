use std::{collections::HashMap, fs, path::Path, path::PathBuf};

use serde::Deserialize;

pub const DEFAULT_CONFIG_FILE: &str = "pdf_console.toml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
    /// Any URL on the analysis service; only its origin is used.
    pub server_url: String,
    pub output_dir: PathBuf,
    pub log_filter: String,
    pub page_title: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:5000".into(),
            output_dir: PathBuf::from("./pdf_console_out"),
            log_filter: "info".into(),
            page_title: "PDF Processor".into(),
        }
    }
}

impl Settings {
    /// Command-line flags win over file and environment values.
    pub fn with_overrides(mut self, server_url: Option<String>, output_dir: Option<PathBuf>) -> Self {
        if let Some(v) = server_url {
            self.server_url = v;
        }
        if let Some(v) = output_dir {
            self.output_dir = v;
        }
        self
    }
}

pub fn load_settings(config_path: &Path) -> Settings {
    let raw = fs::read_to_string(config_path).ok();
    settings_from_sources(raw.as_deref(), |key| std::env::var(key).ok())
}

/// Defaults, then the TOML file, then environment variables.
fn settings_from_sources(raw_file: Option<&str>, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Some(raw) = raw_file {
        // A malformed file is skipped whole; env and flags still apply.
        if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(raw) {
            if let Some(v) = file_cfg.get("server_url") {
                settings.server_url = v.clone();
            }
            if let Some(v) = file_cfg.get("output_dir") {
                settings.output_dir = PathBuf::from(v);
            }
            if let Some(v) = file_cfg.get("log_filter") {
                settings.log_filter = v.clone();
            }
            if let Some(v) = file_cfg.get("page_title") {
                settings.page_title = v.clone();
            }
        }
    }

    if let Some(v) = env("PDF_SERVER_URL") {
        settings.server_url = v;
    }
    if let Some(v) = env("APP__SERVER_URL") {
        settings.server_url = v;
    }

    if let Some(v) = env("APP__OUTPUT_DIR") {
        settings.output_dir = PathBuf::from(v);
    }

    if let Some(v) = env("APP__LOG_FILTER") {
        settings.log_filter = v;
    }

    if let Some(v) = env("APP__PAGE_TITLE") {
        settings.page_title = v;
    }

    settings
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
