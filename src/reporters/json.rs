//! JSON reporter
//!
//! Outputs the full DetectReport as pretty-printed JSON.

use super::DetectReport;
use anyhow::Result;

/// Render report as JSON
pub fn render(report: &DetectReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporters::tests::test_report;

    #[test]
    fn test_json_render_valid() {
        let report = test_report();
        let json_str = render(&report).expect("render JSON");
        let parsed: serde_json::Value = serde_json::from_str(&json_str).expect("parse JSON");
        assert_eq!(parsed["files"].as_array().expect("files array").len(), 4);
        assert_eq!(parsed["files"][0]["decision"]["kind"], "spaces");
        assert_eq!(parsed["files"][0]["decision"]["width"], 4);
        assert_eq!(parsed["files"][0]["votes"]["4"], 9);
        assert_eq!(parsed["summary"]["tabs"], 1);
    }

    #[test]
    fn test_json_manual_file_has_null_decision() {
        let report = test_report();
        let json_str = render(&report).expect("render JSON");
        let parsed: serde_json::Value = serde_json::from_str(&json_str).expect("parse JSON");
        assert!(parsed["files"][3]["decision"].is_null());
        assert_eq!(parsed["files"][3]["manual"], true);
    }
}
