//! Text (terminal) reporter

use super::DetectReport;
use anyhow::Result;
use console::style;
use indent_detective::models::Decision;

/// Render report as formatted terminal output
pub fn render(report: &DetectReport) -> Result<String> {
    let mut out = String::new();

    let width = report
        .files
        .iter()
        .map(|f| f.path.display().to_string().len())
        .max()
        .unwrap_or(0);

    for file in &report.files {
        let path = file.path.display().to_string();
        let setting = if file.manual {
            format!("{} {}", style(&file.status).cyan(), style("(manual)").dim())
        } else {
            match file.decision {
                Some(Decision::Undetermined) | None => style("undetermined").dim().to_string(),
                Some(Decision::Tab) => style("Tabs").yellow().to_string(),
                Some(Decision::Spaces(_)) => style(&file.status).green().to_string(),
            }
        };
        out.push_str(&format!("{:<width$}  {}", path, setting, width = width));
        if file.capped {
            out.push_str(&format!(" {}", style("(first lines only)").dim()));
        }
        out.push('\n');
    }

    let summary = &report.summary;
    let mut parts: Vec<String> = summary
        .spaces
        .iter()
        .map(|(w, n)| format!("{} × {} spaces", n, w))
        .collect();
    if summary.tabs > 0 {
        parts.push(format!("{} × tabs", summary.tabs));
    }
    if summary.undetermined > 0 {
        parts.push(format!("{} undetermined", summary.undetermined));
    }
    if summary.manual > 0 {
        parts.push(format!("{} manual", summary.manual));
    }

    out.push_str(&format!(
        "\n{} {} file{}",
        style("Scanned").bold(),
        summary.files,
        if summary.files == 1 { "" } else { "s" }
    ));
    if !parts.is_empty() {
        out.push_str(&format!(": {}", parts.join(", ")));
    }
    out.push('\n');

    if summary.is_mixed() {
        out.push_str(&format!(
            "{} files mix tabs and spaces\n",
            style("warning:").yellow().bold()
        ));
    }

    Ok(out)
}
