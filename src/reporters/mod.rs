//! Output reporters for detection results
//!
//! Supports two output formats:
//! - `text` - Terminal output, one line per file
//! - `json` - Machine-readable JSON

mod json;
mod text;

use anyhow::{anyhow, Result};
use indent_detective::models::Decision;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::str::FromStr;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" | "terminal" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(anyhow!("Unknown format '{}'. Valid formats: text, json", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Detection result for one file
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    pub language: Option<String>,
    /// Inferred decision; absent when a manual override was applied
    pub decision: Option<Decision>,
    /// Resulting editor setting, "Tabs" or "<n> Spaces"
    pub status: String,
    pub manual: bool,
    pub evidence_lines: usize,
    pub capped: bool,
    pub votes: BTreeMap<usize, u32>,
}

/// Counts over a whole run
#[derive(Debug, Clone, Default, Serialize)]
pub struct DetectSummary {
    pub files: usize,
    /// Files per space width
    pub spaces: BTreeMap<usize, usize>,
    pub tabs: usize,
    pub undetermined: usize,
    pub manual: usize,
}

impl DetectSummary {
    pub fn from_files(files: &[FileReport]) -> Self {
        let mut summary = DetectSummary {
            files: files.len(),
            ..Default::default()
        };
        for file in files {
            if file.manual {
                summary.manual += 1;
            }
            match file.decision {
                Some(Decision::Spaces(width)) => *summary.spaces.entry(width).or_insert(0) += 1,
                Some(Decision::Tab) => summary.tabs += 1,
                Some(Decision::Undetermined) => summary.undetermined += 1,
                None => {}
            }
        }
        summary
    }

    /// Whether detected files disagree on tabs versus spaces
    pub fn is_mixed(&self) -> bool {
        self.tabs > 0 && !self.spaces.is_empty()
    }
}

/// Full report for a detect run
#[derive(Debug, Clone, Serialize)]
pub struct DetectReport {
    pub root: PathBuf,
    pub whitelist: Vec<usize>,
    pub files: Vec<FileReport>,
    pub summary: DetectSummary,
}

impl DetectReport {
    pub fn new(root: PathBuf, whitelist: Vec<usize>, mut files: Vec<FileReport>) -> Self {
        files.sort_by(|a, b| a.path.cmp(&b.path));
        let summary = DetectSummary::from_files(&files);
        Self {
            root,
            whitelist,
            files,
            summary,
        }
    }
}

/// Render a report using an OutputFormat enum
pub fn report_with_format(report: &DetectReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => text::render(report),
        OutputFormat::Json => json::render(report),
    }
}
