//! Validator for reedline - decides whether Enter submits the query

use reedline::{ValidationResult, Validator};

/// Query validator for reedline
///
/// A query is complete when its parentheses and double quotes are balanced
/// and it does not end in a pipe waiting for an operator.
pub struct QueryValidator;

impl QueryValidator {
    /// Create a new query validator
    pub fn new() -> Self {
        Self
    }

    /// Check if input has balanced parentheses and closed strings
    fn is_balanced(&self, input: &str) -> bool {
        let mut paren_count: i32 = 0;
        let mut in_string = false;
        let mut escape_next = false;

        for ch in input.chars() {
            if escape_next {
                escape_next = false;
                continue;
            }

            if in_string {
                match ch {
                    '\\' => escape_next = true,
                    '"' => in_string = false,
                    _ => {}
                }
                continue;
            }

            match ch {
                '"' => in_string = true,
                '(' => paren_count += 1,
                ')' => paren_count -= 1,
                _ => {}
            }
        }

        !in_string && paren_count <= 0
    }
}

impl Default for QueryValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator for QueryValidator {
    /// Validate input for completeness
    ///
    /// # Arguments
    /// * `line` - The whole buffer
    ///
    /// # Returns
    /// * `ValidationResult` - Complete, or Incomplete to insert a newline
    fn validate(&self, line: &str) -> ValidationResult {
        let trimmed = line.trim();

        if trimmed.is_empty() {
            return ValidationResult::Complete;
        }

        if !self.is_balanced(trimmed) || trimmed.ends_with('|') {
            return ValidationResult::Incomplete;
        }

        ValidationResult::Complete
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_complete(line: &str) -> bool {
        matches!(QueryValidator::new().validate(line), ValidationResult::Complete)
    }

    fn is_incomplete(line: &str) -> bool {
        matches!(QueryValidator::new().validate(line), ValidationResult::Incomplete)
    }

    #[test]
    fn test_empty_input() {
        assert!(is_complete(""));
        assert!(is_complete("   "));
    }

    #[test]
    fn test_simple_query() {
        assert!(is_complete("_index=prod | count by _sourceHost"));
    }

    #[test]
    fn test_trailing_pipe_continues() {
        assert!(is_incomplete("_index=prod |"));
        assert!(is_incomplete("_index=prod |  \n"));
    }

    #[test]
    fn test_parentheses() {
        assert!(is_incomplete("(a=1 or b=2"));
        assert!(is_complete("(a=1 or b=2) and c=3"));
    }

    #[test]
    fn test_quotes() {
        assert!(is_incomplete(r#"_sourceName="New York"#));
        // Parentheses and pipes inside strings do not count
        assert!(is_complete(r#"msg="(|" "#));
        assert!(is_complete(r#"msg="say \"hi\"""#));
    }
}
