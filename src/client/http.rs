//! HTTP implementation of the backend using reqwest.

use super::{
    ensure_pdf, error_message, Backend, ClientOptions, QueryRequest, QueryResponse, ANALYZE_PATH,
    DOCUMENT_FIELD, QUERY_PATH,
};
use crate::error::{Error, Result};
use crate::model::AnalyzedDocument;
use log::{debug, warn};
use reqwest::multipart::{Form, Part};
use reqwest::Response;
use std::path::Path;

/// Backend client speaking the analysis service's JSON API.
///
/// Requests are sent once: no retry and no timeout beyond the transport's
/// own behavior.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    options: ClientOptions,
}

impl HttpBackend {
    /// Create a client with the given options.
    pub fn new(options: ClientOptions) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(options.user_agent.clone())
            .build()?;
        Ok(Self { client, options })
    }

    /// Options this client was built with.
    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Read a PDF from disk and upload it for analysis.
    ///
    /// The file is read with blocking `std::fs::read`, which suits a
    /// one-shot runtime such as the CLI's. Call [`Backend::analyze`] with
    /// the bytes when running on a shared executor.
    pub async fn analyze_file<P: AsRef<Path>>(&self, path: P) -> Result<AnalyzedDocument> {
        let path = path.as_ref();
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| Error::UnsupportedFile(path.display().to_string()))?;
        ensure_pdf(filename)?;
        let data = std::fs::read(path)?;
        self.analyze(filename, data).await
    }

    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let message = error_message(status.as_u16(), status.canonical_reason(), &body);
        warn!("backend returned {}: {}", status.as_u16(), message);
        Err(Error::api(status.as_u16(), message))
    }
}

impl Backend for HttpBackend {
    async fn analyze(&self, filename: &str, data: Vec<u8>) -> Result<AnalyzedDocument> {
        ensure_pdf(filename)?;
        let url = self.options.endpoint(ANALYZE_PATH);
        debug!("uploading {} ({} bytes) to {}", filename, data.len(), url);

        let part = Part::bytes(data)
            .file_name(filename.to_string())
            .mime_str("application/pdf")?;
        let form = Form::new().part(DOCUMENT_FIELD, part);

        let response = self.client.post(&url).multipart(form).send().await?;
        let response = Self::check(response).await?;
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn query(&self, question: &str) -> Result<String> {
        let url = self.options.endpoint(QUERY_PATH);
        debug!("asking {} ({} chars)", url, question.len());

        let request = QueryRequest {
            question: question.to_string(),
        };
        let response = self.client.post(&url).json(&request).send().await?;
        let response = Self::check(response).await?;
        let body = response.bytes().await?;
        let answer: QueryResponse = serde_json::from_slice(&body)?;
        Ok(answer.answer)
    }
}
