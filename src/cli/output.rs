//! Output formatting for rendered manifests

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Serialize;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Multi-document YAML stream
    #[default]
    Yaml,
    /// Pretty-printed JSON array
    Json,
}

/// Render a list of documents in the given format
pub fn render_documents<T: Serialize>(docs: &[T], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(docs).context("Failed to serialize to JSON")?;
            json.push('\n');
            Ok(json)
        }
        OutputFormat::Yaml => {
            let mut out = String::new();
            for doc in docs {
                out.push_str("---\n");
                out.push_str(&serde_yaml::to_string(doc).context("Failed to serialize to YAML")?);
            }
            Ok(out)
        }
    }
}
