//! `indent-detective watch` - re-detect indentation as files change
//!
//! Each source file is treated as an open editor: it is detected when first
//! seen, re-detected after edits settle, and forgotten (along with any
//! manual override) when it is deleted.

use anyhow::Result;
use console::style;
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use indent_detective::buffer::TextBuffer;
use indent_detective::driver::{status_text, BufferEditor, Driver, Editor};
use indent_detective::models::IndentChoice;
use indent_detective::scopes::language_for_path;
use notify::RecursiveMode;
use notify_debouncer_full::{new_debouncer, DebounceEventResult};
use rustc_hash::FxHashMap;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;
use tracing::{debug, warn};

use super::detect::collect_source_files;
use super::ManualOverride;

pub fn run(path: &Path, driver: &Driver, overrides: &[ManualOverride]) -> Result<()> {
    let root = std::fs::canonicalize(path)?;

    println!(
        "\nWatching {} for changes...\n",
        style(root.display()).cyan()
    );
    println!("  {} Save a file to re-detect its indentation", style("→").dim());
    println!("  {} Press Ctrl+C to stop\n", style("→").dim());

    let ignores = build_ignore_matcher(&root);
    let mut session = WatchSession::new(driver, &root);
    for file in collect_source_files(&root) {
        if let Some(change) = session.opened(&file) {
            print_change(&change);
        }
    }
    for o in overrides {
        match o.file.canonicalize() {
            Ok(file) => {
                if let Some(change) = session.force(&file, &o.choice) {
                    print_change(&change);
                }
            }
            Err(_) => warn!("--set: no such file {}", o.file.display()),
        }
    }

    // Set up file watcher with debouncing
    let (tx, rx) = mpsc::channel();
    let mut debouncer = new_debouncer(
        Duration::from_millis(500),
        None,
        move |result: DebounceEventResult| {
            if let Ok(events) = result {
                let _ = tx.send(events);
            }
        },
    )?;
    debouncer.watch(&root, RecursiveMode::Recursive)?;

    while let Ok(events) = rx.recv() {
        let changed: HashSet<PathBuf> = events
            .iter()
            .flat_map(|event| event.paths.iter())
            .filter(|p| is_watched(p, &root, &ignores))
            .cloned()
            .collect();

        for file in &changed {
            let change = if file.exists() {
                session.changed(file)
            } else {
                session.removed(file)
            };
            if let Some(change) = change {
                print_change(&change);
            }
        }
    }

    driver.shutdown();
    Ok(())
}

/// A status transition worth printing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
    pub path: PathBuf,
    pub before: Option<String>,
    /// `None` when the file went away
    pub after: Option<String>,
    pub manual: bool,
}

/// Open editors for a watched tree
pub struct WatchSession<'a> {
    driver: &'a Driver,
    root: PathBuf,
    editors: FxHashMap<PathBuf, BufferEditor>,
}

impl<'a> WatchSession<'a> {
    pub fn new(driver: &'a Driver, root: &Path) -> Self {
        Self {
            driver,
            root: root.to_path_buf(),
            editors: FxHashMap::default(),
        }
    }

    /// A file was seen for the first time
    pub fn opened(&mut self, file: &Path) -> Option<StatusChange> {
        let buffer = match TextBuffer::open(file) {
            Ok(buffer) => buffer,
            Err(e) => {
                debug!("Cannot open {}: {}", file.display(), e);
                return None;
            }
        };
        let mut editor = BufferEditor::new(buffer);
        self.driver.run(&mut editor);
        let after = status_text(&editor);
        let manual = self.driver.registry().is_manual(editor.id());
        self.editors.insert(file.to_path_buf(), editor);
        Some(self.change(file, None, Some(after), manual))
    }

    /// A file's content settled after edits
    pub fn changed(&mut self, file: &Path) -> Option<StatusChange> {
        let Some(editor) = self.editors.get_mut(file) else {
            return self.opened(file);
        };

        let before = status_text(editor);
        if let Err(e) = editor.buffer_mut().reload() {
            debug!("Cannot reload {}: {}", file.display(), e);
            return None;
        }
        self.driver.run(editor);
        let after = status_text(editor);
        let manual = self.driver.registry().is_manual(editor.id());

        if before == after {
            return None;
        }
        Some(self.change(file, Some(before), Some(after), manual))
    }

    /// A file was deleted: destroy its editor and drop its override
    pub fn removed(&mut self, file: &Path) -> Option<StatusChange> {
        let mut editor = self.editors.remove(file)?;
        let before = status_text(&editor);
        editor.destroy();
        self.driver.buffer_destroyed(editor.id());
        Some(self.change(file, Some(before), None, false))
    }

    /// Apply a user-chosen setting to a file
    pub fn force(
        &mut self,
        file: &Path,
        choice: &IndentChoice,
    ) -> Option<StatusChange> {
        if !self.editors.contains_key(file) {
            self.opened(file)?;
        }
        let editor = self.editors.get_mut(file)?;
        let before = status_text(editor);
        self.driver.set_indent(editor, choice);
        let after = status_text(editor);
        let manual = self.driver.registry().is_manual(editor.id());
        Some(self.change(file, Some(before), Some(after), manual))
    }

    pub fn is_manual(&self, file: &Path) -> bool {
        self.editors
            .get(file)
            .is_some_and(|e| self.driver.registry().is_manual(e.id()))
    }

    fn change(
        &self,
        file: &Path,
        before: Option<String>,
        after: Option<String>,
        manual: bool,
    ) -> StatusChange {
        StatusChange {
            path: file.strip_prefix(&self.root).unwrap_or(file).to_path_buf(),
            before,
            after,
            manual,
        }
    }
}

fn print_change(change: &StatusChange) {
    let path = style(change.path.display()).bold();
    match (&change.before, &change.after) {
        (_, None) => println!("  {} {}", style("✗").dim(), path),
        (None, Some(after)) => println!("  {} {}  {}", style("•").dim(), path, after),
        (Some(before), Some(after)) => println!(
            "  {} {}  {} → {}{}",
            style("↻").cyan(),
            path,
            style(before).dim(),
            style(after).green(),
            if change.manual { " (manual)" } else { "" }
        ),
    }
}

/// Ignore rules from the root's `.gitignore` and `.indentignore`
fn build_ignore_matcher(root: &Path) -> Gitignore {
    let mut builder = GitignoreBuilder::new(root);
    for name in [".gitignore", ".indentignore"] {
        let path = root.join(name);
        if path.exists() {
            if let Some(e) = builder.add(&path) {
                warn!("Bad ignore file {}: {}", path.display(), e);
            }
        }
    }
    builder.build().unwrap_or_else(|e| {
        warn!("Ignoring ignore files under {}: {}", root.display(), e);
        Gitignore::empty()
    })
}

/// Whether a changed path is a source file the initial scan would pick up
fn is_watched(path: &Path, root: &Path, ignores: &Gitignore) -> bool {
    if language_for_path(path).is_none() || is_ignored_path(path, root) {
        return false;
    }
    if !path.starts_with(root) {
        return false;
    }
    !ignores.matched_path_or_any_parents(path, false).is_ignore()
}

/// Check if path should be ignored (build dirs, node_modules, etc.)
fn is_ignored_path(path: &Path, root: &Path) -> bool {
    let rel = path.strip_prefix(root).unwrap_or(path);
    let rel_str = rel.to_string_lossy();

    rel_str.contains("target/")
        || rel_str.contains("node_modules/")
        || rel_str.contains(".git/")
        || rel_str.contains("__pycache__/")
        || rel_str.contains("dist/")
        || rel_str.contains("build/")
        || rel_str.starts_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use indent_detective::inference::{InferenceConfig, InferenceEngine};
    use indent_detective::registry::ManualOverrideRegistry;
    use std::sync::Arc;

    fn driver() -> Driver {
        Driver::new(
            InferenceEngine::new(InferenceConfig::default()),
            Arc::new(ManualOverrideRegistry::new()),
        )
    }

    #[test]
    fn test_session_lifecycle() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().canonicalize().unwrap();
        let file = root.join("a.py");
        std::fs::write(&file, "def f():\n    pass\n").unwrap();

        let driver = driver();
        let mut session = WatchSession::new(&driver, &root);

        let opened = session.opened(&file).unwrap();
        assert_eq!(opened.path, PathBuf::from("a.py"));
        assert_eq!(opened.after.as_deref(), Some("4 Spaces"));

        // unchanged content: nothing to report
        assert!(session.changed(&file).is_none());

        std::fs::write(&file, "def f():\n\tpass\n").unwrap();
        let changed = session.changed(&file).unwrap();
        assert_eq!(changed.before.as_deref(), Some("4 Spaces"));
        assert_eq!(changed.after.as_deref(), Some("Tabs"));

        std::fs::remove_file(&file).unwrap();
        let removed = session.removed(&file).unwrap();
        assert!(removed.after.is_none());
        assert!(session.removed(&file).is_none());
    }

    #[test]
    fn test_forced_setting_survives_edits_until_removed() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().canonicalize().unwrap();
        let file = root.join("main.rs");
        std::fs::write(&file, "fn main() {\n    go();\n}\n").unwrap();

        let driver = driver();
        let mut session = WatchSession::new(&driver, &root);
        let forced = session.force(&file, &IndentChoice::spaces(2)).unwrap();
        assert!(forced.manual);
        assert_eq!(forced.after.as_deref(), Some("2 Spaces"));

        std::fs::write(&file, "fn main() {\n\tgo();\n}\n").unwrap();
        assert!(session.changed(&file).is_none());
        assert!(session.is_manual(&file));

        session.removed(&file);
        assert!(driver.registry().is_empty());
    }

    #[test]
    fn test_watch_filter_follows_ignore_files() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().canonicalize().unwrap();
        std::fs::write(root.join(".gitignore"), "generated/\n").unwrap();
        std::fs::write(root.join(".indentignore"), "skip.rs\n").unwrap();
        std::fs::create_dir(root.join("generated")).unwrap();
        for name in ["a.py", "skip.rs", "generated/out.js"] {
            std::fs::write(root.join(name), "x = 1\n").unwrap();
        }

        let ignores = build_ignore_matcher(&root);
        assert!(is_watched(&root.join("a.py"), &root, &ignores));
        assert!(!is_watched(&root.join("skip.rs"), &root, &ignores));
        assert!(!is_watched(&root.join("generated/out.js"), &root, &ignores));
        assert!(!is_watched(&root.join("notes.txt"), &root, &ignores));

        // the initial scan agrees
        let scanned = collect_source_files(&root);
        assert_eq!(scanned, vec![root.join("a.py")]);
    }

    #[test]
    fn test_ignored_paths() {
        let root = Path::new("/repo");
        assert!(is_ignored_path(Path::new("/repo/target/x.rs"), root));
        assert!(is_ignored_path(Path::new("/repo/.hidden/x.rs"), root));
        assert!(!is_ignored_path(Path::new("/repo/src/x.rs"), root));
    }
}
