//! `indent-detective detect` - detect indentation for a file or tree

use anyhow::{Context, Result};
use ignore::WalkBuilder;
use indent_detective::buffer::TextBuffer;
use indent_detective::driver::{status_text, BufferEditor, Driver, RunOutcome};
use indent_detective::models::IndentChoice;
use indent_detective::scopes::supported_extensions;
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::ManualOverride;
use crate::reporters::{report_with_format, DetectReport, FileReport, OutputFormat};

/// Run detection and print or write the report
pub fn run(
    path: &Path,
    driver: &Driver,
    format: OutputFormat,
    output: Option<&Path>,
    overrides: &[ManualOverride],
    fail_on_mixed: bool,
    max_files: usize,
) -> Result<()> {
    let report = detect(path, driver, overrides, max_files)?;
    let rendered = report_with_format(&report, format)?;

    match output {
        Some(out) => {
            std::fs::write(out, &rendered)
                .with_context(|| format!("Failed to write {}", out.display()))?;
            info!("Report written to {}", out.display());
        }
        None => print!("{}", rendered),
    }

    if fail_on_mixed && report.summary.is_mixed() {
        eprintln!("Failing due to --fail-on-mixed: tabs and spaces are both in use");
        std::process::exit(1);
    }
    Ok(())
}

/// Detect every source file under `path` (or `path` itself if it is a file)
pub fn detect(
    path: &Path,
    driver: &Driver,
    overrides: &[ManualOverride],
    max_files: usize,
) -> Result<DetectReport> {
    let root = path
        .canonicalize()
        .with_context(|| format!("Path does not exist: {}", path.display()))?;

    let (base, mut files) = if root.is_file() {
        let base = root.parent().map(Path::to_path_buf).unwrap_or_default();
        (base, vec![root.clone()])
    } else {
        (root.clone(), collect_source_files(&root))
    };

    if max_files > 0 && files.len() > max_files {
        files.sort();
        files.truncate(max_files);
    }
    debug!("Detecting indentation in {} files", files.len());

    let forced = resolve_overrides(overrides);

    let reports: Vec<FileReport> = files
        .par_iter()
        .filter_map(|file| match detect_file(driver, file, &base, forced.get(file)) {
            Ok(report) => Some(report),
            Err(e) => {
                warn!("Skipping {}: {:#}", file.display(), e);
                None
            }
        })
        .collect();

    Ok(DetectReport::new(
        root,
        driver.engine().whitelist().iter().collect(),
        reports,
    ))
}

/// Open one file as an editor, run the driver and close it again
pub fn detect_file(
    driver: &Driver,
    file: &Path,
    base: &Path,
    forced: Option<&IndentChoice>,
) -> Result<FileReport> {
    let buffer =
        TextBuffer::open(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let language = buffer.language().map(|l| l.name().to_string());
    let mut editor = BufferEditor::new(buffer);

    let outcome = match forced {
        Some(choice) => driver.set_indent(&mut editor, choice),
        None => driver.run(&mut editor),
    };

    let rel = file.strip_prefix(base).unwrap_or(file).to_path_buf();
    let mut report = FileReport {
        path: rel,
        language,
        decision: None,
        status: status_text(&editor),
        manual: false,
        evidence_lines: 0,
        capped: false,
        votes: BTreeMap::new(),
    };

    match outcome {
        RunOutcome::Inferred(inference) => {
            report.decision = Some(inference.decision);
            report.evidence_lines = inference.evidence_lines;
            report.capped = inference.capped;
            report.votes = inference.votes.to_map();
        }
        RunOutcome::Manual(_) => report.manual = true,
        RunOutcome::Destroyed => {}
    }

    driver.buffer_destroyed(editor.buffer().id());
    Ok(report)
}

/// Map canonical file paths to forced choices; unknown files are reported
fn resolve_overrides(overrides: &[ManualOverride]) -> FxHashMap<PathBuf, IndentChoice> {
    let mut forced = FxHashMap::default();
    for o in overrides {
        match o.file.canonicalize() {
            Ok(path) => {
                forced.insert(path, o.choice.clone());
            }
            Err(_) => warn!("--set: no such file {}", o.file.display()),
        }
    }
    forced
}

/// Collect all supported source files, respecting .gitignore
pub fn collect_source_files(root: &Path) -> Vec<PathBuf> {
    let extensions = supported_extensions();

    let mut builder = WalkBuilder::new(root);
    builder
        .hidden(true)
        .git_ignore(true)
        .git_global(true)
        .git_exclude(true)
        .require_git(false)
        .add_custom_ignore_filename(".indentignore");

    let mut files = Vec::new();
    for entry in builder.build().flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            if extensions.contains(&ext) {
                files.push(path.to_path_buf());
            }
        }
    }
    files
}
