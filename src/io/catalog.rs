//! Catalog import - reads raw touchpoint records exported from research
//!
//! Supported formats, chosen by file extension:
//! - `.json`: a single array of records
//! - `.jsonl`: one record per line, blank lines skipped

use crate::domain::touchpoint::RawTouchpoint;
use anyhow::{bail, Context};
use std::fs;
use std::path::Path;
use tracing::info;

/// Load raw touchpoint records from a `.json` or `.jsonl` file
pub fn load_raw_records<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<RawTouchpoint>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog {}", path.display()))?;

    let records = match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => parse_json(&content)
            .with_context(|| format!("Failed to parse catalog {}", path.display()))?,
        Some("jsonl") => parse_jsonl(&content)
            .with_context(|| format!("Failed to parse catalog {}", path.display()))?,
        _ => bail!("Unsupported catalog format {} (expected .json or .jsonl)", path.display()),
    };

    info!(path = %path.display(), records = %records.len(), "catalog_loaded");
    Ok(records)
}

/// Parse a JSON array of records
pub fn parse_json(content: &str) -> anyhow::Result<Vec<RawTouchpoint>> {
    serde_json::from_str(content)
        .map_err(|e| anyhow::anyhow!("line {} column {}: {}", e.line(), e.column(), e))
}

/// Parse newline-delimited records
pub fn parse_jsonl(content: &str) -> anyhow::Result<Vec<RawTouchpoint>> {
    let mut records = Vec::new();
    for (i, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let record: RawTouchpoint =
            serde_json::from_str(line).with_context(|| format!("line {}", i + 1))?;
        records.push(record);
    }
    Ok(records)
}
