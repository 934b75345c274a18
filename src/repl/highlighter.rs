//! Syntax highlighter for Sumo Logic queries
//!
//! Colours boolean connectors and `where`, pipes, the operator that follows a
//! pipe, quoted strings and the field name on the left of `=`. Everything else
//! is left unstyled. The styled segments always concatenate back to the input.

use nu_ansi_term::{Color, Style};
use reedline::{Highlighter, StyledText};

const KEYWORDS: &[&str] = &["and", "or", "not", "where", "by", "as", "in"];

/// Query syntax highlighter
pub struct QueryHighlighter {
    enabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    Space,
    Pipe,
    Paren,
    Equals,
    Quoted,
    QuotedField,
    Word,
}

impl QueryHighlighter {
    /// Create a new highlighter
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    fn keyword_style() -> Style {
        Color::Blue.bold()
    }

    fn operator_style() -> Style {
        Color::Yellow.bold()
    }

    fn field_style() -> Style {
        Style::new().fg(Color::Cyan)
    }

    fn string_style() -> Style {
        Style::new().fg(Color::Green)
    }

    fn pipe_style() -> Style {
        Color::Magenta.bold()
    }

    /// Split the line into (kind, text) pieces
    fn tokenize(line: &str) -> Vec<(Token, &str)> {
        let mut tokens = Vec::new();
        let mut chars = line.char_indices().peekable();

        while let Some((start, ch)) = chars.next() {
            let kind = match ch {
                c if c.is_whitespace() => {
                    while chars.next_if(|(_, c)| c.is_whitespace()).is_some() {}
                    Token::Space
                }
                '|' => Token::Pipe,
                '(' | ')' => Token::Paren,
                '=' => Token::Equals,
                '"' => {
                    Self::skip_string(&mut chars);
                    Token::Quoted
                }
                '%' if chars.peek().is_some_and(|(_, c)| *c == '"') => {
                    chars.next();
                    Self::skip_string(&mut chars);
                    Token::QuotedField
                }
                _ => {
                    while chars
                        .next_if(|(_, c)| !c.is_whitespace() && !"|()=\"".contains(*c))
                        .is_some()
                    {}
                    Token::Word
                }
            };
            let end = chars.peek().map(|(i, _)| *i).unwrap_or(line.len());
            tokens.push((kind, &line[start..end]));
        }

        tokens
    }

    /// Consume up to and including the closing quote, honouring escapes
    fn skip_string(chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>) {
        let mut escaped = false;
        for (_, c) in chars.by_ref() {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => return,
                _ => {}
            }
        }
    }
}

impl Default for QueryHighlighter {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Highlighter for QueryHighlighter {
    fn highlight(&self, line: &str, _cursor: usize) -> StyledText {
        let mut styled = StyledText::new();
        if !self.enabled {
            styled.push((Style::default(), line.to_string()));
            return styled;
        }

        let tokens = Self::tokenize(line);
        let mut after_pipe = false;

        for (i, (kind, text)) in tokens.iter().enumerate() {
            let next_is_equals = tokens
                .iter()
                .skip(i + 1)
                .find(|(k, _)| *k != Token::Space)
                .is_some_and(|(k, _)| *k == Token::Equals);

            let style = match kind {
                Token::Pipe => {
                    after_pipe = true;
                    Self::pipe_style()
                }
                Token::Quoted => Self::string_style(),
                Token::QuotedField => Self::field_style(),
                Token::Word if after_pipe => {
                    after_pipe = false;
                    Self::operator_style()
                }
                Token::Word if next_is_equals => Self::field_style(),
                Token::Word if KEYWORDS.contains(&text.to_ascii_lowercase().as_str()) => {
                    Self::keyword_style()
                }
                Token::Space => Style::default(),
                _ => {
                    after_pipe = false;
                    Style::default()
                }
            };
            styled.push((style, text.to_string()));
        }

        styled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segments(line: &str) -> Vec<(Style, String)> {
        QueryHighlighter::default().highlight(line, 0).buffer
    }

    fn style_of(line: &str, text: &str) -> Option<Style> {
        segments(line)
            .into_iter()
            .find(|(_, t)| t == text)
            .map(|(s, _)| s)
    }

    #[test]
    fn test_segments_rebuild_input() {
        let line = r#"_index=prod and %"my.field"="a \"b\"" | where x=1"#;
        let joined: String = segments(line).into_iter().map(|(_, t)| t).collect();
        assert_eq!(joined, line);
    }

    #[test]
    fn test_field_and_value() {
        let line = "_sourceCategory=prod/app";
        assert_eq!(
            style_of(line, "_sourceCategory"),
            Some(QueryHighlighter::field_style())
        );
        assert_eq!(style_of(line, "prod/app"), Some(Style::default()));
    }

    #[test]
    fn test_keywords_and_operators() {
        let line = "a=1 AND b=2 | count by host";
        assert_eq!(style_of(line, "AND"), Some(QueryHighlighter::keyword_style()));
        assert_eq!(style_of(line, "|"), Some(QueryHighlighter::pipe_style()));
        assert_eq!(
            style_of(line, "count"),
            Some(QueryHighlighter::operator_style())
        );
        assert_eq!(style_of(line, "by"), Some(QueryHighlighter::keyword_style()));
        assert_eq!(style_of(line, "host"), Some(Style::default()));
    }

    #[test]
    fn test_quoted_strings() {
        let line = r#"_sourceName="New York""#;
        assert_eq!(
            style_of(line, r#""New York""#),
            Some(QueryHighlighter::string_style())
        );
    }

    #[test]
    fn test_unterminated_string_runs_to_end() {
        let line = r#"msg="open"#;
        let segs = segments(line);
        assert_eq!(segs.last().map(|(_, t)| t.as_str()), Some(r#""open"#));
    }

    #[test]
    fn test_disabled() {
        let styled = QueryHighlighter::new(false).highlight("_index=prod", 0);
        assert_eq!(styled.buffer, vec![(Style::default(), "_index=prod".to_string())]);
    }
}
