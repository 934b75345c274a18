//! Hinter for reedline - inline hints from earlier queries

use nu_ansi_term::{Color, Style};
use reedline::{Hinter, History, SearchQuery};

/// Shows the rest of the most recent history entry starting with the input
pub struct QueryHinter {
    /// Style for hints
    style: Style,
    /// Current hint text
    current_hint: String,
}

impl QueryHinter {
    /// Create a new query hinter with default style
    pub fn new() -> Self {
        Self {
            style: Style::new().italic().fg(Color::DarkGray),
            current_hint: String::new(),
        }
    }
}

impl Default for QueryHinter {
    fn default() -> Self {
        Self::new()
    }
}

impl Hinter for QueryHinter {
    /// Provide a hint for the current buffer
    ///
    /// # Arguments
    /// * `line` - The current buffer
    /// * `pos` - Cursor position
    /// * `history` - Query history
    /// * `use_ansi_coloring` - Whether to use ANSI colors
    /// * `_cwd` - Current working directory (unused)
    ///
    /// # Returns
    /// * `String` - Hint text to display after the cursor
    fn handle(
        &mut self,
        line: &str,
        pos: usize,
        history: &dyn History,
        use_ansi_coloring: bool,
        _cwd: &str,
    ) -> String {
        self.current_hint.clear();

        if pos != line.len() || line.trim().is_empty() {
            return String::new();
        }

        let found = history
            .search(SearchQuery::last_with_prefix(line.to_string(), None))
            .ok()
            .and_then(|results| results.into_iter().next());

        let Some(item) = found else {
            return String::new();
        };

        match item.command_line.strip_prefix(line) {
            Some(rest) if !rest.is_empty() => {
                self.current_hint = rest.to_string();
                if use_ansi_coloring {
                    self.style.paint(rest).to_string()
                } else {
                    rest.to_string()
                }
            }
            _ => String::new(),
        }
    }

    /// Accepting a partial hint takes one word at a time
    fn next_hint_token(&self) -> String {
        let leading = self.current_hint.len() - self.current_hint.trim_start().len();
        let word_end = self.current_hint[leading..]
            .find(char::is_whitespace)
            .map(|i| leading + i)
            .unwrap_or(self.current_hint.len());
        self.current_hint[..word_end].to_string()
    }

    fn complete_hint(&self) -> String {
        self.current_hint.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reedline::{FileBackedHistory, HistoryItem};

    fn history_with(entries: &[&str]) -> FileBackedHistory {
        let mut history = FileBackedHistory::new(100).unwrap();
        for entry in entries {
            history
                .save(HistoryItem::from_command_line(*entry))
                .unwrap();
        }
        history
    }

    #[test]
    fn test_empty_line_no_hint() {
        let mut hinter = QueryHinter::new();
        let history = history_with(&["_index=prod | count"]);
        assert_eq!(hinter.handle("", 0, &history, false, "/tmp"), "");
    }

    #[test]
    fn test_cursor_not_at_end_no_hint() {
        let mut hinter = QueryHinter::new();
        let history = history_with(&["_index=prod | count"]);
        assert_eq!(hinter.handle("_index", 2, &history, false, "/tmp"), "");
    }

    #[test]
    fn test_hint_from_history() {
        let mut hinter = QueryHinter::new();
        let history = history_with(&["_index=prod | count by _sourceHost"]);

        let hint = hinter.handle("_index=prod", 11, &history, false, "/tmp");
        assert_eq!(hint, " | count by _sourceHost");
        assert_eq!(hinter.complete_hint(), " | count by _sourceHost");
        assert_eq!(hinter.next_hint_token(), " |");
    }

    #[test]
    fn test_default_has_no_hint() {
        let hinter = QueryHinter::default();
        assert_eq!(hinter.next_hint_token(), "");
        assert_eq!(hinter.complete_hint(), "");
    }
}
