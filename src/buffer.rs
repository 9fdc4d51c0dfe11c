//! In-memory host buffers
//!
//! [`TextBuffer`] holds a buffer's lines together with wherever its scope
//! data comes from: nothing, a tree-sitter parse, or a table supplied by a
//! host that already tokenized the text.

use crate::inference::SourceBuffer;
use crate::models::BufferId;
use crate::scopes::{language_for_path, SourceLanguage, SyntaxTree};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Where per-row scope labels come from
#[derive(Debug, Default)]
pub enum ScopeSource {
    /// No syntax data; every non-blank line is evidence
    #[default]
    None,
    /// Parsed with a bundled grammar
    Syntax(SyntaxTree),
    /// Scopes provided row by row by the host
    Table(Vec<Vec<String>>),
}

/// A host buffer: text lines plus syntax scopes
#[derive(Debug)]
pub struct TextBuffer {
    id: BufferId,
    path: Option<PathBuf>,
    language: Option<SourceLanguage>,
    lines: Vec<String>,
    scopes: ScopeSource,
}

impl TextBuffer {
    /// Buffer with no syntax information
    pub fn from_text(text: &str) -> Self {
        Self {
            id: BufferId::next(),
            path: None,
            language: None,
            lines: split_lines(text),
            scopes: ScopeSource::None,
        }
    }

    /// Buffer parsed with the grammar for `language`.
    ///
    /// A failed parse leaves the buffer without scopes.
    pub fn with_language(text: &str, language: SourceLanguage) -> Self {
        let mut buffer = Self::from_text(text);
        buffer.language = Some(language);
        buffer.reparse(text);
        buffer
    }

    /// Buffer whose scopes are given per row
    pub fn with_scopes(lines: Vec<String>, scopes: Vec<Vec<String>>) -> Self {
        Self {
            id: BufferId::next(),
            path: None,
            language: None,
            lines,
            scopes: ScopeSource::Table(scopes),
        }
    }

    /// Read a file and parse it with the grammar matching its extension
    pub fn open(path: &Path) -> std::io::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let mut buffer = Self::from_text(&text);
        buffer.path = Some(path.to_path_buf());
        buffer.language = language_for_path(path);
        buffer.reparse(&text);
        Ok(buffer)
    }

    pub fn id(&self) -> BufferId {
        self.id
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn language(&self) -> Option<SourceLanguage> {
        self.language
    }

    pub fn scope_source(&self) -> &ScopeSource {
        &self.scopes
    }

    /// Replace the whole content, re-parsing when a grammar is known
    pub fn set_text(&mut self, text: &str) {
        self.lines = split_lines(text);
        self.reparse(text);
    }

    /// Re-read the backing file
    pub fn reload(&mut self) -> std::io::Result<()> {
        if let Some(path) = self.path.clone() {
            let text = std::fs::read_to_string(&path)?;
            self.set_text(&text);
        }
        Ok(())
    }

    fn reparse(&mut self, text: &str) {
        let Some(language) = self.language else {
            self.scopes = ScopeSource::None;
            return;
        };

        self.scopes = match SyntaxTree::parse(text, language) {
            Ok(tree) => ScopeSource::Syntax(tree),
            Err(e) => {
                debug!("No syntax scopes for {}: {}", self.display_name(), e);
                ScopeSource::None
            }
        };
    }

    /// Path if the buffer has one, else its id
    pub fn display_name(&self) -> String {
        match &self.path {
            Some(path) => path.display().to_string(),
            None => self.id.to_string(),
        }
    }
}

impl SourceBuffer for TextBuffer {
    fn lines(&self) -> &[String] {
        &self.lines
    }

    fn scopes_at(&self, row: usize) -> Option<Vec<String>> {
        match &self.scopes {
            ScopeSource::None => None,
            ScopeSource::Syntax(tree) => {
                let line = self.lines.get(row).map(String::as_str).unwrap_or("");
                Some(tree.scopes_for_line(row, line))
            }
            ScopeSource::Table(table) => table.get(row).cloned(),
        }
    }
}

fn split_lines(text: &str) -> Vec<String> {
    text.lines().map(str::to_string).collect()
}
