//! Export collaborator: serializes crawl results to disk
//!
//! Implements the core's `Exporter` port. Failures are logged, never
//! propagated into the crawl.

use chrono::Utc;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use tracing::{error, info};

use vigil_core::{CrawlResult, ExportFormat, Exporter};

/// File-based exporter writing `{producer}_{timestamp}.{ext}`
pub struct FileExporter;

impl Exporter for FileExporter {
    fn export(&self, results: &CrawlResult, format: ExportFormat, path: &Path, producer: &str) {
        let timestamp = Utc::now().format("%Y-%m-%d_%H-%M-%S");
        let filename = format!("{}_{}.{}", producer, timestamp, format.extension());
        let target = path.join(filename);

        let rendered = match render(results, format) {
            Ok(rendered) => rendered,
            Err(e) => {
                error!(error = %e, "Failed to serialize crawl results");
                return;
            }
        };

        match fs::write(&target, rendered) {
            Ok(()) => info!(path = %target.display(), "Exported crawl results"),
            Err(e) => error!(path = %target.display(), error = %e, "Export failed"),
        }
    }
}

fn render(results: &CrawlResult, format: ExportFormat) -> Result<String, serde_json::Error> {
    Ok(match format {
        ExportFormat::Json => serde_json::to_string_pretty(results)?,
        ExportFormat::Csv => to_csv(results),
        ExportFormat::Markdown => to_markdown(results),
        ExportFormat::Txt => to_txt(results),
    })
}

/// Quote a CSV field, doubling embedded quotes
fn csv_field(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

fn to_csv(results: &CrawlResult) -> String {
    let mut out = String::from("engine,title,url,description,domain,alive\n");
    for (engine, records) in &results.results {
        for record in records {
            let alive = record.alive.map(|a| a.to_string()).unwrap_or_default();
            let _ = writeln!(
                out,
                "{},{},{},{},{},{}",
                csv_field(engine),
                csv_field(&record.title),
                csv_field(&record.url),
                csv_field(&record.description),
                csv_field(record.domain()),
                alive,
            );
        }
    }
    out
}

fn to_markdown(results: &CrawlResult) -> String {
    let mut out = String::new();
    for (engine, records) in &results.results {
        let _ = writeln!(out, "## {engine} ({} results)\n", records.len());
        for record in records {
            let _ = writeln!(out, "- **{}**", record.title);
            let _ = writeln!(out, "  <{}>", record.url);
            let _ = writeln!(out, "  {}", record.description);
            if let Some(alive) = record.alive {
                let _ = writeln!(out, "  alive: {alive}");
            }
            out.push('\n');
        }
    }
    out
}

fn to_txt(results: &CrawlResult) -> String {
    let mut out = String::new();
    for (engine, records) in &results.results {
        let _ = writeln!(out, "[{engine}] {} result(s)", records.len());
        for record in records {
            let _ = writeln!(
                out,
                "  {} | {} | {}",
                record.title,
                record.url,
                record.domain()
            );
        }
    }
    out
}
