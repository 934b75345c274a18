//! Interactive query prompt for sumoq
//!
//! This module provides the line editor around the completion engine:
//! - Multi-line editing with reedline (Enter submits a complete query)
//! - Columnar completion menu on Tab
//! - File-backed query history with inline hints
//! - Syntax highlighting
//! - Producer status in the right prompt

pub mod completer;
pub mod completion;
pub mod highlighter;
pub mod hinter;
pub mod prompt;
pub mod validator;

use std::sync::Arc;

use reedline::{
    ColumnarMenu, EditCommand, Emacs, FileBackedHistory, History, KeyCode, KeyModifiers,
    MenuBuilder, Reedline, ReedlineEvent, ReedlineMenu, Signal, default_emacs_keybindings,
};
use tracing::debug;

use crate::cache::CandidateCache;
use crate::config::{DisplayConfig, HistoryConfig};
use crate::error::{Result, SumoqError};

pub use completer::QueryCompleter;
pub use completion::CompletionEngine;
pub use highlighter::QueryHighlighter;
pub use hinter::QueryHinter;
pub use prompt::QueryPrompt;
pub use validator::QueryValidator;

/// Name of the completion menu bound to Tab
pub const COMPLETION_MENU: &str = "completion_menu";

/// Line editor for a single query
pub struct ReplEngine {
    /// Reedline editor
    editor: Reedline,
    /// Prompt shown on every line
    prompt: QueryPrompt,
}

impl ReplEngine {
    /// Create a new line editor
    ///
    /// # Arguments
    /// * `completion_engine` - Engine backing Tab completion
    /// * `cache` - Candidate cache, for the producer status display
    /// * `history_config` - History configuration
    /// * `display` - Prompt and highlighting configuration
    ///
    /// # Returns
    /// * `Result<Self>` - New editor or error
    pub fn new(
        completion_engine: CompletionEngine,
        cache: Arc<CandidateCache>,
        history_config: &HistoryConfig,
        display: &DisplayConfig,
    ) -> Result<Self> {
        let completion_menu = ColumnarMenu::default().with_name(COMPLETION_MENU);

        let editor = Reedline::create()
            .with_history(Self::create_history(history_config)?)
            .with_completer(Box::new(QueryCompleter::new(completion_engine)))
            .with_menu(ReedlineMenu::EngineCompleter(Box::new(completion_menu)))
            .with_quick_completions(true)
            .with_partial_completions(true)
            .with_validator(Box::new(QueryValidator::new()))
            .with_hinter(Box::new(QueryHinter::new()))
            .with_highlighter(Box::new(QueryHighlighter::new(
                display.syntax_highlighting,
            )))
            .with_edit_mode(Box::new(Emacs::new(Self::keybindings())));

        let status_source = display.show_status.then_some(cache);
        let prompt = QueryPrompt::new(display.prompt.clone(), status_source);

        Ok(Self { editor, prompt })
    }

    /// Build the history backend
    fn create_history(history_config: &HistoryConfig) -> Result<Box<dyn History>> {
        let history = if history_config.persist {
            if let Some(parent) = history_config.file_path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            FileBackedHistory::with_file(
                history_config.max_size,
                history_config.file_path.clone(),
            )
        } else {
            FileBackedHistory::new(history_config.max_size)
        };

        history
            .map(|h| Box::new(h) as Box<dyn History>)
            .map_err(|e| SumoqError::Generic(format!("Cannot open history: {e}")))
    }

    /// Emacs bindings plus Tab for the menu and Alt+Enter for a newline
    fn keybindings() -> reedline::Keybindings {
        let mut keybindings = default_emacs_keybindings();
        keybindings.add_binding(
            KeyModifiers::NONE,
            KeyCode::Tab,
            ReedlineEvent::UntilFound(vec![
                ReedlineEvent::Menu(COMPLETION_MENU.to_string()),
                ReedlineEvent::MenuNext,
            ]),
        );
        keybindings.add_binding(
            KeyModifiers::ALT,
            KeyCode::Enter,
            ReedlineEvent::Edit(vec![EditCommand::InsertNewline]),
        );
        keybindings
    }

    /// Read one query
    ///
    /// Blank submissions are ignored and the prompt is shown again.
    ///
    /// # Returns
    /// * `Result<Option<String>>` - The query, or None on Ctrl-C / Ctrl-D
    pub fn read_query(&mut self) -> Result<Option<String>> {
        loop {
            match self.editor.read_line(&self.prompt)? {
                Signal::Success(buffer) if buffer.trim().is_empty() => continue,
                Signal::Success(buffer) => return Ok(Some(buffer)),
                other => {
                    debug!("Prompt closed: {:?}", other);
                    return Ok(None);
                }
            }
        }
    }
}
