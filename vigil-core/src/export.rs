//! Export port implemented by outer layers
//!
//! The core never serializes crawl results itself; it hands them to
//! whatever collaborator the caller wires in.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::records::CrawlResult;

/// Supported export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Json,
    Csv,
    Markdown,
    Txt,
}

impl ExportFormat {
    /// File extension used for exported files
    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Markdown => "md",
            Self::Txt => "txt",
        }
    }
}

/// Structured-format export collaborator
///
/// Implementations own serialization and error reporting; the crawl
/// orchestrator only invokes them as a side effect and never fails a crawl
/// over an export problem.
pub trait Exporter: Send + Sync {
    /// Write `results` under `path` in `format`; the filename embeds
    /// `producer` and a timestamp.
    fn export(&self, results: &CrawlResult, format: ExportFormat, path: &Path, producer: &str);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extensions() {
        assert_eq!(ExportFormat::Json.extension(), "json");
        assert_eq!(ExportFormat::Markdown.extension(), "md");
    }
}
