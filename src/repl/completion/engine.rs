//! Completion engine - orchestrates the completion flow
//!
//! Ties the classifier, the candidate cache and the renderer together: the
//! word under the cursor is split off, the text before it is classified, the
//! matching candidate set is rendered from the cache as it is right now and
//! the result is fuzzy-filtered by the word.

use std::sync::Arc;

use super::classifier::Classifier;
use super::context::CompletionContext;
use super::fuzzy;
use super::render::render;
use crate::cache::CandidateCache;

/// Completion pair representing a candidate suggestion
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionPair {
    /// Display text for the candidate
    pub display: String,
    /// Replacement text to insert
    pub replacement: String,
    /// Optional description for the candidate
    pub description: Option<String>,
}

/// Main completion engine
pub struct CompletionEngine {
    classifier: Classifier,
    cache: Arc<CandidateCache>,
}

/// Same word characters as the classifier's `\w` field names.
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Byte offset where the word ending at `pos` starts.
fn word_start(line: &str, pos: usize) -> usize {
    line[..pos]
        .char_indices()
        .rev()
        .take_while(|(_, c)| is_word_char(*c))
        .last()
        .map(|(i, _)| i)
        .unwrap_or(pos)
}

fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

impl CompletionEngine {
    /// Create a new completion engine
    ///
    /// # Arguments
    /// * `cache` - Candidate cache shared with the producers
    pub fn new(cache: Arc<CandidateCache>) -> Self {
        Self::with_classifier(Classifier::new(), cache)
    }

    /// Create an engine around an existing classifier
    pub fn with_classifier(classifier: Classifier, cache: Arc<CandidateCache>) -> Self {
        Self { classifier, cache }
    }

    /// Classify the text before the word under the cursor
    pub fn context_at(&self, line: &str, pos: usize) -> CompletionContext {
        let pos = pos.min(line.len());
        let start = word_start(line, pos);
        self.classifier.classify(&normalize_newlines(&line[..start]))
    }

    /// Complete the input at the given cursor position
    ///
    /// # Arguments
    /// * `line` - The whole buffer, possibly spanning several lines
    /// * `pos` - Cursor position (byte index)
    ///
    /// # Returns
    /// * `(usize, Vec<CompletionPair>)` - Completion start position and candidate pairs
    pub fn complete(&self, line: &str, pos: usize) -> (usize, Vec<CompletionPair>) {
        let pos = pos.min(line.len());
        let start = word_start(line, pos);
        let word = &line[start..pos];

        let context = self.classifier.classify(&normalize_newlines(&line[..start]));
        if context.is_none() {
            return (start, Vec::new());
        }

        let mut candidates = fuzzy::filter(word, render(&context, &self.cache));

        // Drop a candidate the user has already typed in full
        if !word.is_empty() {
            candidates.retain(|c| c != word);
        }

        let description = context.label().to_string();
        let pairs = candidates
            .into_iter()
            .map(|c| CompletionPair {
                display: c.clone(),
                replacement: c,
                description: Some(description.clone()),
            })
            .collect();

        (start, pairs)
    }
}
