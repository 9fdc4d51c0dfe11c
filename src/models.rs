//! Core data models for indent-detective
//!
//! These models are shared by the inference core, the driver and the
//! reporters: buffer handles, per-line readings, decisions and the
//! indentation choices offered to a user.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::warn;

/// Opaque handle identifying a host buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BufferId(u64);

static NEXT_BUFFER_ID: AtomicU64 = AtomicU64::new(1);

impl BufferId {
    /// Allocate a fresh, process-unique handle
    pub fn next() -> Self {
        BufferId(NEXT_BUFFER_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl From<u64> for BufferId {
    fn from(raw: u64) -> Self {
        BufferId(raw)
    }
}

impl std::fmt::Display for BufferId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "buffer#{}", self.0)
    }
}

/// Indentation found at the start of a single line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndentReading {
    /// Number of leading space characters (possibly zero)
    Spaces(usize),
    /// Line starts with one or more tabs
    Tab,
    /// Leading whitespace could not be read; not evidence
    None,
}

/// Outcome of one inference run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "width", rename_all = "snake_case")]
pub enum Decision {
    /// Soft tabs of the given width (always a whitelist member)
    Spaces(usize),
    /// Hard tabs
    Tab,
    /// Not enough evidence; callers take no action
    Undetermined,
}

impl Decision {
    pub fn is_determined(&self) -> bool {
        !matches!(self, Decision::Undetermined)
    }

    /// The indentation length this decision asks the host to apply.
    ///
    /// `Undetermined` maps to the automatic sentinel (width 0), which
    /// applies nothing.
    pub fn length(&self) -> IndentLength {
        match self {
            Decision::Spaces(width) => IndentLength::Spaces(*width),
            Decision::Tab => IndentLength::Tab,
            Decision::Undetermined => IndentLength::AUTOMATIC,
        }
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Decision::Spaces(width) => write!(f, "{} Spaces", width),
            Decision::Tab => write!(f, "Tabs"),
            Decision::Undetermined => write!(f, "Undetermined"),
        }
    }
}

/// Indentation length setting: a space width or tabs.
///
/// `Spaces(0)` is the "Automatic" sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndentLength {
    Spaces(usize),
    Tab,
}

impl IndentLength {
    pub const AUTOMATIC: IndentLength = IndentLength::Spaces(0);

    pub fn is_automatic(&self) -> bool {
        *self == Self::AUTOMATIC
    }
}

/// One entry of the indentation picker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndentChoice {
    pub text: String,
    pub length: IndentLength,
}

impl IndentChoice {
    pub const AUTOMATIC_TEXT: &'static str = "Automatic";

    pub fn automatic() -> Self {
        Self {
            text: Self::AUTOMATIC_TEXT.to_string(),
            length: IndentLength::AUTOMATIC,
        }
    }

    pub fn spaces(width: usize) -> Self {
        Self {
            text: format!("{} Spaces", width),
            length: IndentLength::Spaces(width),
        }
    }

    pub fn tabs() -> Self {
        Self {
            text: "Tabs".to_string(),
            length: IndentLength::Tab,
        }
    }

    pub fn is_automatic(&self) -> bool {
        self.text == Self::AUTOMATIC_TEXT
    }

    /// Parse a user-typed choice: "automatic", "tabs", "4" or "4 spaces"
    pub fn parse(input: &str) -> Option<Self> {
        let normalized = input.trim().to_lowercase();
        match normalized.as_str() {
            "automatic" | "auto" => return Some(Self::automatic()),
            "tab" | "tabs" => return Some(Self::tabs()),
            _ => {}
        }

        let number = normalized
            .strip_suffix("spaces")
            .or_else(|| normalized.strip_suffix("space"))
            .unwrap_or(&normalized)
            .trim();
        match number.parse::<usize>() {
            Ok(0) => Some(Self::automatic()),
            Ok(width) => Some(Self::spaces(width)),
            Err(_) => None,
        }
    }
}

impl std::fmt::Display for IndentChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

/// Ordered set of admissible indentation widths
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Whitelist(Vec<usize>);

impl Whitelist {
    pub const DEFAULT: [usize; 5] = [2, 3, 4, 6, 8];

    /// Build from widths, dropping zeros and duplicates but keeping order
    pub fn new(widths: impl IntoIterator<Item = usize>) -> Self {
        let mut kept: Vec<usize> = Vec::new();
        for width in widths {
            if width > 0 && !kept.contains(&width) {
                kept.push(width);
            }
        }
        Whitelist(kept)
    }

    /// Parse string-encoded entries as stored in configuration.
    ///
    /// Entries that are not positive integers are dropped with a warning.
    pub fn parse_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let widths = entries.into_iter().filter_map(|entry| {
            let entry = entry.as_ref();
            match entry.trim().parse::<usize>() {
                Ok(width) if width > 0 => Some(width),
                _ => {
                    warn!("Ignoring invalid indentation width '{}'", entry);
                    None
                }
            }
        });
        Self::new(widths)
    }

    pub fn contains(&self, width: usize) -> bool {
        self.0.contains(&width)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied()
    }

    pub fn min(&self) -> Option<usize> {
        self.0.iter().copied().min()
    }

    pub fn max(&self) -> Option<usize> {
        self.0.iter().copied().max()
    }

    /// Whether `width` lies within the whitelist's min..=max span
    pub fn spans(&self, width: usize) -> bool {
        match (self.min(), self.max()) {
            (Some(lo), Some(hi)) => (lo..=hi).contains(&width),
            _ => false,
        }
    }
}

impl Default for Whitelist {
    fn default() -> Self {
        Self::new(Self::DEFAULT)
    }
}
