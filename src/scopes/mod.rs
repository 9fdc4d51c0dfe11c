//! Syntax scopes from tree-sitter
//!
//! Plays the part of the host grammar: for a row it reports the kinds of the
//! syntax nodes enclosing the row's first character, outermost first. Node
//! kinds such as `line_comment`, `string` or `template_string` are what the
//! line classifier looks for.

mod language;

pub use language::{language_for_extension, language_for_path, supported_extensions, SourceLanguage};

use thiserror::Error;
use tree_sitter::{Parser, Point, Tree};

/// Errors raised while building a syntax tree
#[derive(Error, Debug)]
pub enum ScopeError {
    #[error("No grammar for extension '{0}'")]
    UnsupportedExtension(String),

    #[error("Failed to load {language} grammar: {source}")]
    Language {
        language: SourceLanguage,
        #[source]
        source: tree_sitter::LanguageError,
    },

    #[error("Failed to parse {0} source")]
    ParseFailed(SourceLanguage),
}

pub type ScopeResult<T> = Result<T, ScopeError>;

/// A parsed buffer that answers scope queries by row
pub struct SyntaxTree {
    language: SourceLanguage,
    tree: Tree,
}

impl std::fmt::Debug for SyntaxTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyntaxTree")
            .field("language", &self.language)
            .finish_non_exhaustive()
    }
}

impl SyntaxTree {
    /// Parse `source` with the grammar for `language`
    pub fn parse(source: &str, language: SourceLanguage) -> ScopeResult<Self> {
        let mut parser = Parser::new();
        parser
            .set_language(&language.grammar())
            .map_err(|source| ScopeError::Language { language, source })?;

        let tree = parser
            .parse(source, None)
            .ok_or(ScopeError::ParseFailed(language))?;

        Ok(Self { language, tree })
    }

    /// Parse `source`, picking the grammar from a file extension
    pub fn parse_for_extension(source: &str, ext: &str) -> ScopeResult<Self> {
        let language = language_for_extension(ext)
            .ok_or_else(|| ScopeError::UnsupportedExtension(ext.to_string()))?;
        Self::parse(source, language)
    }

    pub fn language(&self) -> SourceLanguage {
        self.language
    }

    /// Node kinds enclosing column 0 of `row`, outermost first
    pub fn scopes_at(&self, row: usize) -> Vec<String> {
        self.kinds_at(Point::new(row, 0))
    }

    /// Scopes for `row` given its text.
    ///
    /// Leading whitespace of a comment line belongs to the comment, so when
    /// the first non-whitespace character starts a comment its node kinds
    /// are appended to the column 0 scopes.
    pub fn scopes_for_line(&self, row: usize, line: &str) -> Vec<String> {
        let mut scopes = self.scopes_at(row);

        let indent = line.len() - line.trim_start().len();
        if indent == 0 || indent == line.len() {
            return scopes;
        }

        let leading = self.kinds_at(Point::new(row, indent));
        if leading.iter().any(|kind| kind.contains("comment")) {
            for kind in leading {
                if !scopes.contains(&kind) {
                    scopes.push(kind);
                }
            }
        }
        scopes
    }

    fn kinds_at(&self, point: Point) -> Vec<String> {
        let Some(node) = self
            .tree
            .root_node()
            .descendant_for_point_range(point, point)
        else {
            return Vec::new();
        };

        let mut kinds = Vec::new();
        let mut current = Some(node);
        while let Some(n) = current {
            kinds.push(n.kind().to_string());
            current = n.parent();
        }
        kinds.reverse();
        kinds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has_scope(scopes: &[String], fragment: &str) -> bool {
        scopes.iter().any(|s| s.contains(fragment))
    }

    #[test]
    fn test_rust_line_comment_scope() {
        let source = "// header\nfn main() {\n    let x = 1;\n}\n";
        let tree = SyntaxTree::parse(source, SourceLanguage::Rust).unwrap();
        assert!(has_scope(&tree.scopes_at(0), "comment"));
        assert!(!has_scope(&tree.scopes_at(1), "comment"));
        assert_eq!(tree.scopes_at(1).first().map(String::as_str), Some("source_file"));
    }

    #[test]
    fn test_python_docstring_scope() {
        let source = "def f():\n    \"\"\"Doc.\n\nMore doc.\n    \"\"\"\n    return 1\n";
        let tree = SyntaxTree::parse(source, SourceLanguage::Python).unwrap();
        assert!(!has_scope(&tree.scopes_at(0), "string"));
        // row 3 sits inside the docstring
        assert!(has_scope(&tree.scopes_at(3), "string"));
        assert!(!has_scope(&tree.scopes_at(5), "string"));
    }

    #[test]
    fn test_block_comment_continuation_lines() {
        let source = "/*\n * one\n * two\n */\nint x;\n";
        let tree = SyntaxTree::parse(source, SourceLanguage::C).unwrap();
        for row in 0..=3 {
            assert!(has_scope(&tree.scopes_at(row), "comment"), "row {}", row);
        }
        assert!(!has_scope(&tree.scopes_at(4), "comment"));
    }

    #[test]
    fn test_template_string_rows() {
        let source = "const s = `\nline\n`;\nlet y = 2;\n";
        let tree = SyntaxTree::parse(source, SourceLanguage::JavaScript).unwrap();
        assert!(has_scope(&tree.scopes_at(1), "string"));
        assert!(!has_scope(&tree.scopes_at(3), "string"));
    }

    #[test]
    fn test_indented_comment_line_takes_comment_scope() {
        let source = "function f() {\n  if (x) {\n\t// note\n    y();\n  }\n}\n";
        let tree = SyntaxTree::parse(source, SourceLanguage::JavaScript).unwrap();
        assert!(!has_scope(&tree.scopes_at(2), "comment"));
        assert!(has_scope(&tree.scopes_for_line(2, "\t// note"), "comment"));
        assert!(!has_scope(&tree.scopes_for_line(3, "    y();"), "comment"));
    }

    #[test]
    fn test_indented_string_line_keeps_column_zero_scopes() {
        let source = "x = [\n    \"a\",\n]\n";
        let tree = SyntaxTree::parse(source, SourceLanguage::Python).unwrap();
        assert_eq!(tree.scopes_for_line(1, "    \"a\","), tree.scopes_at(1));
    }

    #[test]
    fn test_unsupported_extension() {
        let err = SyntaxTree::parse_for_extension("x", "txt").unwrap_err();
        assert!(matches!(err, ScopeError::UnsupportedExtension(ref e) if e == "txt"));
    }

    #[test]
    fn test_rows_past_end_do_not_panic() {
        let tree = SyntaxTree::parse("x = 1\n", SourceLanguage::Python).unwrap();
        let _ = tree.scopes_at(100);
        let _ = tree.scopes_for_line(100, "    # past the end");
    }
}
