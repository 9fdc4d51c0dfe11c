//! Indentation inference
//!
//! Votes on the indentation deltas between consecutive evidence lines and
//! picks the best-supported width from a whitelist:
//!
//! - [`classifier`] drops blank lines and lines inside comments or strings
//! - [`extractor`] reads each line's leading spaces (or tab)
//! - [`votes`] accumulates votes per delta magnitude
//! - [`decider`] picks the winner, smaller widths winning ties
//! - [`engine`] drives the above over a buffer, stopping early on tabs
//!
//! # Example
//!
//! ```
//! use indent_detective::buffer::TextBuffer;
//! use indent_detective::inference::{InferenceConfig, InferenceEngine};
//! use indent_detective::models::Decision;
//!
//! let buffer = TextBuffer::from_text("fn main() {\n    run();\n}\n");
//! let engine = InferenceEngine::new(InferenceConfig::default());
//! assert_eq!(engine.infer(&buffer), Decision::Spaces(4));
//! ```

pub mod classifier;
pub mod decider;
pub mod engine;
pub mod extractor;
pub mod votes;

pub use classifier::is_evidence;
pub use decider::decide;
pub use engine::{Inference, InferenceConfig, InferenceEngine};
pub use extractor::extract;
pub use votes::{VoteAccumulator, VoteTable};

/// Evidence lines examined before scanning stops
pub const SCAN_CAP: usize = 150;

/// Read access to a host buffer
pub trait SourceBuffer {
    /// All lines, in order, without line terminators
    fn lines(&self) -> &[String];

    /// Syntax scope labels at the first character of `row`, outermost first.
    ///
    /// `None` when the host has no scope data for the row.
    fn scopes_at(&self, row: usize) -> Option<Vec<String>>;
}

impl<T: SourceBuffer + ?Sized> SourceBuffer for &T {
    fn lines(&self) -> &[String] {
        (**self).lines()
    }

    fn scopes_at(&self, row: usize) -> Option<Vec<String>> {
        (**self).scopes_at(row)
    }
}
