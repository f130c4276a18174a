//! Output formatting for `doclingtaxa-testenv` commands.

use anyhow::{Context, Result};
use serde::Serialize;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    Json,
    Yaml,
    #[default]
    Table,
}

/// Render structured data as JSON or YAML.
///
/// Table output is command-specific and is rejected here.
pub fn render<T: Serialize>(data: &T, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(data).context("Failed to serialize to JSON")
        }
        OutputFormat::Yaml => serde_yaml::to_string(data).context("Failed to serialize to YAML"),
        OutputFormat::Table => {
            anyhow::bail!("Table format requires custom implementation per data type")
        }
    }
}

/// Render rows as a left-aligned table with a header and separator
pub fn render_table(columns: &[(&str, usize)], rows: &[Vec<String>]) -> String {
    let mut out = String::new();

    let header: Vec<String> =
        columns.iter().map(|(name, width)| format!("{:<width$}", name, width = width)).collect();
    out.push_str(header.join(" ").trim_end());
    out.push('\n');

    let total_width: usize = columns.iter().map(|(_, w)| w + 1).sum();
    out.push_str(&"-".repeat(total_width.saturating_sub(1)));
    out.push('\n');

    for row in rows {
        let cells: Vec<String> = columns
            .iter()
            .zip(row)
            .map(|((_, width), cell)| format!("{:<width$}", cell, width = width))
            .collect();
        out.push_str(cells.join(" ").trim_end());
        out.push('\n');
    }

    out
}
