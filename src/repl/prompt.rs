//! Custom prompt implementation for sumoq

use std::borrow::Cow;
use std::sync::Arc;

use reedline::{Prompt, PromptEditMode, PromptHistorySearch, PromptHistorySearchStatus};

use crate::cache::CandidateCache;

/// Query prompt with an optional producer status line on the right
pub struct QueryPrompt {
    /// Left prompt text
    text: String,
    /// Cache whose producer status is shown, when enabled
    status_source: Option<Arc<CandidateCache>>,
}

impl QueryPrompt {
    /// Create a new query prompt
    ///
    /// # Arguments
    /// * `text` - Left prompt text, e.g. `"Query: "`
    /// * `status_source` - Cache to report producer status for, if any
    ///
    /// # Returns
    /// * `Self` - New prompt
    pub fn new(text: impl Into<String>, status_source: Option<Arc<CandidateCache>>) -> Self {
        Self {
            text: text.into(),
            status_source,
        }
    }

    /// `idx:<status> fields:<status> ns:<status> app:<status>`
    pub fn status_line(cache: &CandidateCache) -> String {
        cache
            .status_summary()
            .into_iter()
            .map(|(category, status)| format!("{}:{}", category.label(), status))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Prompt for QueryPrompt {
    fn render_prompt_left(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.text)
    }

    /// Render the right prompt
    ///
    /// Re-read on every repaint, so producer progress shows up while typing.
    /// Nothing triggers a repaint when a producer finishes, so an idle prompt
    /// keeps showing the previous status until the next keystroke.
    fn render_prompt_right(&self) -> Cow<'_, str> {
        match &self.status_source {
            Some(cache) => Self::status_line(cache).into(),
            None => "".into(),
        }
    }

    fn render_prompt_indicator(&self, _prompt_mode: PromptEditMode) -> Cow<'_, str> {
        "".into()
    }

    fn render_prompt_multiline_indicator(&self) -> Cow<'_, str> {
        "... ".into()
    }

    /// Render the history search prompt
    ///
    /// # Arguments
    /// * `history_search` - History search state
    ///
    /// # Returns
    /// * `Cow<str>` - History search prompt
    fn render_prompt_history_search_indicator(
        &self,
        history_search: PromptHistorySearch,
    ) -> Cow<'_, str> {
        let prefix = match history_search.status {
            PromptHistorySearchStatus::Passing => "",
            PromptHistorySearchStatus::Failing => "failing ",
        };

        format!("({}reverse-search: {}) ", prefix, history_search.term).into()
    }
}
