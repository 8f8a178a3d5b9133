//! Analysis and question backend.
//!
//! The backend stores an uploaded PDF, extracts its content items, and
//! answers free-text questions about the most recently analyzed document.
//! [`Backend`] is the seam the viewer talks to; [`HttpBackend`] implements
//! it over the backend's JSON API.
//!
//! # Example
//!
//! ```no_run
//! use pdflens::client::{Backend, ClientOptions, HttpBackend};
//!
//! # async fn run() -> pdflens::Result<()> {
//! let backend = HttpBackend::new(ClientOptions::new().with_base_url("http://localhost:3000"))?;
//! let doc = backend.analyze_file("contract.pdf").await?;
//! println!("{} items", doc.items().len());
//!
//! let answer = backend.query("When is payment due?").await?;
//! println!("{}", answer);
//! # Ok(())
//! # }
//! ```

#[cfg(feature = "client")]
mod http;

#[cfg(feature = "client")]
pub use http::HttpBackend;

use crate::error::{Error, Result};
use crate::model::AnalyzedDocument;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default backend address.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Path of the analysis endpoint.
pub const ANALYZE_PATH: &str = "/api/analyze";

/// Path of the question endpoint.
pub const QUERY_PATH: &str = "/api/query";

/// Multipart field carrying the uploaded file.
pub const DOCUMENT_FIELD: &str = "document";

/// Extensions the backend accepts for analysis.
pub const ALLOWED_EXTENSIONS: &[&str] = &["pdf"];

/// A service that analyzes documents and answers questions about them.
#[allow(async_fn_in_trait)]
pub trait Backend {
    /// Upload a document for analysis.
    async fn analyze(&self, filename: &str, data: Vec<u8>) -> Result<AnalyzedDocument>;

    /// Ask a question about the analyzed document.
    async fn query(&self, question: &str) -> Result<String>;
}

/// Options for the HTTP backend client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientOptions {
    /// Backend base URL, without a trailing path
    pub base_url: String,

    /// User-Agent header value
    pub user_agent: String,
}

impl ClientOptions {
    /// Create client options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the backend base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the User-Agent header.
    pub fn with_user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    /// Full URL of an endpoint path.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: concat!("pdflens/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Body of a question request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub question: String,
}

/// Body of a question response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResponse {
    pub answer: String,
}

/// Error body returned with non-success statuses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
}

/// Build the message for a failed response.
///
/// Uses the JSON `error` (and `details`) fields when the body has them,
/// otherwise the status reason.
pub fn error_message(status: u16, reason: Option<&str>, body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            error: Some(error),
            details,
        }) => match details {
            Some(d) if !d.is_empty() => format!("{error}: {d}"),
            _ => error,
        },
        _ => reason
            .map(str::to_string)
            .unwrap_or_else(|| format!("HTTP {status}")),
    }
}

/// Reject files the backend would refuse.
pub fn ensure_pdf(filename: &str) -> Result<()> {
    let allowed = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            ALLOWED_EXTENSIONS
                .iter()
                .any(|a| a.eq_ignore_ascii_case(ext))
        });
    if allowed {
        Ok(())
    } else {
        Err(Error::UnsupportedFile(filename.to_string()))
    }
}
