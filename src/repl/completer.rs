//! Completer for reedline - provides completion suggestions

use reedline::{Completer, Span, Suggestion};

use super::completion::CompletionEngine;

/// Query completer for reedline
pub struct QueryCompleter {
    /// Completion engine for context-sensitive suggestions
    completion_engine: CompletionEngine,
}

impl QueryCompleter {
    /// Create a new query completer
    ///
    /// # Arguments
    /// * `completion_engine` - Engine reading the session's candidate cache
    pub fn new(completion_engine: CompletionEngine) -> Self {
        Self { completion_engine }
    }
}

impl Completer for QueryCompleter {
    /// Complete the input at the given cursor position
    ///
    /// # Arguments
    /// * `line` - The whole buffer
    /// * `pos` - Cursor position (byte index)
    ///
    /// # Returns
    /// * `Vec<Suggestion>` - List of completion suggestions
    fn complete(&mut self, line: &str, pos: usize) -> Vec<Suggestion> {
        let (start, candidates) = self.completion_engine.complete(line, pos);

        candidates
            .into_iter()
            .map(|pair| Suggestion {
                value: pair.replacement,
                description: pair.description,
                span: Span::new(start, pos),
                append_whitespace: false,
                ..Default::default()
            })
            .collect()
    }
}
