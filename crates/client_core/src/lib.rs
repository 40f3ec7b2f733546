use std::{fmt, path::PathBuf};

use async_trait::async_trait;
use reqwest::{
    multipart::{Form, Part},
    Client, Response,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::{
    domain::{SelectedFile, PDF_MIME_TYPE},
    error::{ErrorBody, ServiceError},
    protocol::{AnalysisResult, AnalyzeRequest, ClearResponse, HealthStatus, OutlineResult},
};
use thiserror::Error;
use tracing::{debug, info, warn};
use url::Url;

/// Multipart field the upload endpoint reads the document from.
pub const UPLOAD_FIELD: &str = "pdf";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Upload,
    Analyze,
    Clear,
    Health,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Upload => "/upload",
            Endpoint::Analyze => "/analyze",
            Endpoint::Clear => "/clear",
            Endpoint::Health => "/health",
        }
    }

    /// Message shown when the service fails without saying why.
    pub fn fallback_message(self) -> &'static str {
        match self {
            Endpoint::Upload => "Upload failed",
            Endpoint::Analyze => "Analysis failed",
            Endpoint::Clear => "Clear failed",
            Endpoint::Health => "Health check failed",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[derive(Debug, Error)]
pub enum ClientError {
    /// Non-2xx status, or a body carrying an `error` field.
    #[error("{message}")]
    Rejected {
        endpoint: Endpoint,
        status: Option<u16>,
        message: String,
    },
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: Endpoint,
        #[source]
        source: reqwest::Error,
    },
    #[error("invalid response from {endpoint}: {source}")]
    Decode {
        endpoint: Endpoint,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to read {}: {source}", path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The multipart body could not be assembled; nothing was sent.
    #[error("failed to prepare upload of {}: {source}", path.display())]
    BuildUpload {
        path: PathBuf,
        #[source]
        source: reqwest::Error,
    },
    #[error("invalid server url '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("server url '{0}' has no usable origin")]
    OpaqueOrigin(String),
}

impl ClientError {
    pub fn endpoint(&self) -> Option<Endpoint> {
        match self {
            ClientError::Rejected { endpoint, .. }
            | ClientError::Transport { endpoint, .. }
            | ClientError::Decode { endpoint, .. } => Some(*endpoint),
            _ => None,
        }
    }

    fn transport(endpoint: Endpoint) -> impl FnOnce(reqwest::Error) -> Self {
        move |source| ClientError::Transport { endpoint, source }
    }
}

/// Operations the controller needs from the analysis service.
#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    async fn upload_pdf(&self, file: &SelectedFile) -> Result<OutlineResult, ClientError>;
    async fn analyze(&self, request: &AnalyzeRequest) -> Result<AnalysisResult, ClientError>;
    async fn clear(&self) -> Result<ClearResponse, ClientError>;
    async fn health(&self) -> Result<HealthStatus, ClientError>;
}

/// Reduces any server url to its origin (`scheme://host[:port]`).
pub fn origin_of(server_url: &str) -> Result<String, ClientError> {
    let raw = server_url.trim();
    let parsed = Url::parse(raw).map_err(|source| ClientError::InvalidBaseUrl {
        url: raw.to_string(),
        source,
    })?;
    let origin = parsed.origin();
    if !origin.is_tuple() {
        return Err(ClientError::OpaqueOrigin(raw.to_string()));
    }
    Ok(origin.ascii_serialization())
}

pub struct PdfServiceClient {
    http: Client,
    base_url: String,
}

impl PdfServiceClient {
    pub fn new(server_url: &str) -> Result<Self, ClientError> {
        Self::with_http_client(Client::new(), server_url)
    }

    pub fn with_http_client(http: Client, server_url: &str) -> Result<Self, ClientError> {
        let base_url = origin_of(server_url)?;
        debug!(base_url = %base_url, "configured pdf service client");
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path())
    }
}

#[async_trait]
impl AnalysisBackend for PdfServiceClient {
    async fn upload_pdf(&self, file: &SelectedFile) -> Result<OutlineResult, ClientError> {
        let endpoint = Endpoint::Upload;
        let bytes = tokio::fs::read(&file.path)
            .await
            .map_err(|source| ClientError::ReadFile {
                path: file.path.clone(),
                source,
            })?;
        info!(file = %file.name, size_bytes = bytes.len(), "uploading pdf");

        // Declared type first, as a browser form would send it.
        let mime = file.mime_type.as_deref().unwrap_or(PDF_MIME_TYPE);
        let part = Part::bytes(bytes)
            .file_name(file.name.clone())
            .mime_str(mime)
            .map_err(|source| ClientError::BuildUpload {
                path: file.path.clone(),
                source,
            })?;
        let response = self
            .http
            .post(self.url(endpoint))
            .multipart(Form::new().part(UPLOAD_FIELD, part))
            .send()
            .await
            .map_err(ClientError::transport(endpoint))?;
        decode_response(endpoint, response).await
    }

    async fn analyze(&self, request: &AnalyzeRequest) -> Result<AnalysisResult, ClientError> {
        let endpoint = Endpoint::Analyze;
        info!(persona = %request.persona, job = %request.job, "requesting analysis");
        let response = self
            .http
            .post(self.url(endpoint))
            .json(request)
            .send()
            .await
            .map_err(ClientError::transport(endpoint))?;
        decode_response(endpoint, response).await
    }

    async fn clear(&self) -> Result<ClearResponse, ClientError> {
        let endpoint = Endpoint::Clear;
        info!("clearing uploaded files");
        let response = self
            .http
            .post(self.url(endpoint))
            .send()
            .await
            .map_err(ClientError::transport(endpoint))?;
        let body = checked_body(endpoint, response).await?;
        Ok(ClearResponse::from_value(&body))
    }

    async fn health(&self) -> Result<HealthStatus, ClientError> {
        let endpoint = Endpoint::Health;
        let response = self
            .http
            .get(self.url(endpoint))
            .send()
            .await
            .map_err(ClientError::transport(endpoint))?;
        decode_response(endpoint, response).await
    }
}

async fn decode_response<T: DeserializeOwned>(
    endpoint: Endpoint,
    response: Response,
) -> Result<T, ClientError> {
    let body = checked_body(endpoint, response).await?;
    serde_json::from_value(body).map_err(|source| ClientError::Decode { endpoint, source })
}

/// JSON body of a 2xx response that carries no `error` field.
async fn checked_body(endpoint: Endpoint, response: Response) -> Result<Value, ClientError> {
    let status = response.status();
    let bytes = response
        .bytes()
        .await
        .map_err(ClientError::transport(endpoint))?;
    let parsed = serde_json::from_slice::<Value>(&bytes);

    if !status.is_success() {
        let error = ServiceError::from_body(parsed.as_ref().ok(), endpoint.fallback_message());
        warn!(%endpoint, status = status.as_u16(), message = %error.message, "service rejected request");
        return Err(ClientError::Rejected {
            endpoint,
            status: Some(status.as_u16()),
            message: error.message,
        });
    }

    let body = parsed.map_err(|source| ClientError::Decode { endpoint, source })?;
    if let Some(message) = ErrorBody::from_value(&body) {
        warn!(%endpoint, message = %message, "service reported error in success body");
        return Err(ClientError::Rejected {
            endpoint,
            status: Some(status.as_u16()),
            message,
        });
    }

    Ok(body)
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
