//! Editor integration
//!
//! The [`Driver`] connects inference to a host editor: it re-runs detection
//! when a buffer opens or settles after edits, applies the result to the
//! editor's soft-tab settings, and honours manual overrides picked by the
//! user. Hosts implement [`Editor`] for their buffer type and call the
//! driver from their own event loop.

use crate::buffer::TextBuffer;
use crate::inference::{Inference, InferenceEngine, SourceBuffer};
use crate::models::{BufferId, Decision, IndentChoice, IndentLength};
use crate::registry::ManualOverrideRegistry;
use std::sync::Arc;
use tracing::{debug, trace};

/// Tab width a fresh editor starts with
pub const DEFAULT_TAB_LENGTH: usize = 2;

/// A host editor whose indentation settings the driver controls
pub trait Editor: SourceBuffer {
    fn id(&self) -> BufferId;
    fn is_destroyed(&self) -> bool;
    fn soft_tabs(&self) -> bool;
    fn tab_length(&self) -> usize;
    fn set_soft_tabs(&mut self, soft_tabs: bool);
    fn set_tab_length(&mut self, tab_length: usize);
}

/// Status line text for an editor: "Tabs" or "<n> Spaces"
pub fn status_text<E: Editor + ?Sized>(editor: &E) -> String {
    if editor.soft_tabs() {
        format!("{} Spaces", editor.tab_length())
    } else {
        "Tabs".to_string()
    }
}

/// What a driver run did to an editor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Inference ran and its decision was applied
    Inferred(Inference),
    /// A manual override is active; its setting was re-applied
    Manual(IndentLength),
    /// The editor is gone
    Destroyed,
}

impl RunOutcome {
    pub fn decision(&self) -> Option<Decision> {
        match self {
            RunOutcome::Inferred(inference) => Some(inference.decision),
            _ => None,
        }
    }
}

/// Runs inference for editors and applies the results
#[derive(Debug)]
pub struct Driver {
    engine: InferenceEngine,
    registry: Arc<ManualOverrideRegistry>,
    choices: Vec<IndentChoice>,
}

impl Driver {
    pub fn new(engine: InferenceEngine, registry: Arc<ManualOverrideRegistry>) -> Self {
        let choices = build_choices(&engine);
        Self {
            engine,
            registry,
            choices,
        }
    }

    pub fn engine(&self) -> &InferenceEngine {
        &self.engine
    }

    pub fn registry(&self) -> &Arc<ManualOverrideRegistry> {
        &self.registry
    }

    /// Picker entries: Automatic, one per whitelisted width, then Tabs
    pub fn choices(&self) -> &[IndentChoice] {
        &self.choices
    }

    /// Detect and apply indentation unless the editor is under manual override
    pub fn run<E: Editor + ?Sized>(&self, editor: &mut E) -> RunOutcome {
        if editor.is_destroyed() {
            return RunOutcome::Destroyed;
        }

        if let Some(length) = self.registry.manual_setting(editor.id()) {
            trace!("{} is manual, skipping inference", editor.id());
            self.apply(editor, length);
            return RunOutcome::Manual(length);
        }

        let inference = self.engine.analyze(&*editor);
        if self.engine.config().debug {
            debug!("-> decided for {} on {}", inference.decision, editor.id());
        }
        self.apply(editor, inference.decision.length());
        RunOutcome::Inferred(inference)
    }

    /// Apply a user's pick.
    ///
    /// "Automatic" drops the override and detects again; anything else is
    /// applied and pinned.
    pub fn set_indent<E: Editor + ?Sized>(
        &self,
        editor: &mut E,
        choice: &IndentChoice,
    ) -> RunOutcome {
        if choice.is_automatic() {
            self.registry.clear_manual(editor.id());
            return self.run(editor);
        }

        self.apply(editor, choice.length);
        self.registry.set_manual(editor.id(), choice.length);
        RunOutcome::Manual(choice.length)
    }

    /// Forget per-buffer state for a destroyed buffer
    pub fn buffer_destroyed(&self, id: BufferId) {
        self.registry.clear_manual(id);
    }

    /// Drop all overrides
    pub fn shutdown(&self) {
        self.registry.clear();
    }

    /// Push an indentation length into the editor's settings.
    ///
    /// The automatic sentinel changes nothing; space widths outside the
    /// whitelist's range are ignored.
    pub fn apply<E: Editor + ?Sized>(&self, editor: &mut E, length: IndentLength) {
        match length {
            IndentLength::Tab => editor.set_soft_tabs(false),
            IndentLength::Spaces(0) => {}
            IndentLength::Spaces(width) => {
                if self.engine.whitelist().spans(width) {
                    editor.set_soft_tabs(true);
                    editor.set_tab_length(width);
                }
            }
        }
    }
}

fn build_choices(engine: &InferenceEngine) -> Vec<IndentChoice> {
    let whitelist = engine.whitelist();
    let mut choices = Vec::with_capacity(whitelist.len() + 2);
    choices.push(IndentChoice::automatic());
    choices.extend(whitelist.iter().map(IndentChoice::spaces));
    choices.push(IndentChoice::tabs());
    choices
}

/// A [`TextBuffer`] with editor indentation settings attached
#[derive(Debug)]
pub struct BufferEditor {
    buffer: TextBuffer,
    soft_tabs: bool,
    tab_length: usize,
    destroyed: bool,
}

impl BufferEditor {
    pub fn new(buffer: TextBuffer) -> Self {
        Self {
            buffer,
            soft_tabs: true,
            tab_length: DEFAULT_TAB_LENGTH,
            destroyed: false,
        }
    }

    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut TextBuffer {
        &mut self.buffer
    }

    pub fn destroy(&mut self) {
        self.destroyed = true;
    }
}

impl SourceBuffer for BufferEditor {
    fn lines(&self) -> &[String] {
        self.buffer.lines()
    }

    fn scopes_at(&self, row: usize) -> Option<Vec<String>> {
        self.buffer.scopes_at(row)
    }
}

impl Editor for BufferEditor {
    fn id(&self) -> BufferId {
        self.buffer.id()
    }

    fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    fn soft_tabs(&self) -> bool {
        self.soft_tabs
    }

    fn tab_length(&self) -> usize {
        self.tab_length
    }

    fn set_soft_tabs(&mut self, soft_tabs: bool) {
        self.soft_tabs = soft_tabs;
    }

    fn set_tab_length(&mut self, tab_length: usize) {
        self.tab_length = tab_length;
    }
}
