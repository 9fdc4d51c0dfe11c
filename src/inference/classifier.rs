//! Decides which lines count as indentation evidence

use regex::Regex;
use std::sync::OnceLock;

/// Scope label fragments that mark a line as non-code
const NON_CODE_SCOPES: &[&str] = &["comment", "docstring", "string"];

static BLANK_LINE: OnceLock<Regex> = OnceLock::new();

fn blank_line() -> &'static Regex {
    BLANK_LINE.get_or_init(|| Regex::new(r"^\s*$").expect("valid blank-line regex"))
}

/// Whether `line` should contribute to the vote.
///
/// `scopes` are the host's syntax scope labels at the start of the line.
/// Empty scopes mean the host had nothing to say, and the line counts.
pub fn is_evidence<S: AsRef<str>>(line: &str, scopes: &[S]) -> bool {
    if blank_line().is_match(line) {
        return false;
    }

    !scopes.iter().any(|scope| {
        let scope = scope.as_ref();
        NON_CODE_SCOPES
            .iter()
            .any(|fragment| scope.contains(fragment))
    })
}
