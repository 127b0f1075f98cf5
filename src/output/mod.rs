pub mod formatter;
pub mod tables;

pub use formatter::{
    format_number, format_table, format_tsv, should_use_colors, truncate_name, Align, Column,
    Table,
};
pub use tables::*;

use anyhow::{Context, Result};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Tsv,
    Json,
}

/// Render `table` in the chosen format; JSON serialises `data` instead.
pub fn render<T: Serialize + ?Sized>(
    format: OutputFormat,
    table: &Table,
    data: &T,
    empty: &str,
    use_colors: bool,
) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(format_table(table, empty, use_colors)),
        OutputFormat::Tsv => Ok(format_tsv(table)),
        OutputFormat::Json => {
            serde_json::to_string_pretty(data).context("Failed to serialize output")
        }
    }
}
