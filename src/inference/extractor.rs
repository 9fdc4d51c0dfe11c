//! Reads the leading indentation of a line

use crate::models::IndentReading;
use regex::Regex;
use std::sync::OnceLock;

static LEADING_TABS: OnceLock<Regex> = OnceLock::new();
static LEADING_SPACES: OnceLock<Regex> = OnceLock::new();

/// Classify the indentation at the start of `line`.
///
/// Any leading tab makes the line tab-indented no matter what follows.
/// Otherwise the reading is the number of leading U+0020 spaces.
pub fn extract(line: &str) -> IndentReading {
    let tabs = LEADING_TABS.get_or_init(|| Regex::new(r"^\t+").expect("valid tab regex"));
    if tabs.is_match(line) {
        return IndentReading::Tab;
    }

    let spaces = LEADING_SPACES.get_or_init(|| Regex::new(r"^ *").expect("valid space regex"));
    match spaces.find(line) {
        Some(m) => IndentReading::Spaces(m.len()),
        None => IndentReading::None,
    }
}
