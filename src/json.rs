//! JSON input and output helpers.

use crate::error::Result;
use crate::model::{AnalyzedDocument, TextFragment};
use serde::Serialize;
use std::path::Path;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Serialize any model value to JSON.
pub fn to_json<T: Serialize + ?Sized>(value: &T, format: JsonFormat) -> Result<String> {
    let json = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(value)?,
        JsonFormat::Compact => serde_json::to_string(value)?,
    };
    Ok(json)
}

/// Load a saved analysis response.
pub fn load_analysis<P: AsRef<Path>>(path: P) -> Result<AnalyzedDocument> {
    let data = std::fs::read(path)?;
    Ok(serde_json::from_slice(&data)?)
}

/// Load the text fragments of one rendered page.
pub fn load_fragments<P: AsRef<Path>>(path: P) -> Result<Vec<TextFragment>> {
    let data = std::fs::read(path)?;
    Ok(serde_json::from_slice(&data)?)
}
