//! Candidate rendering
//!
//! Formatting is a pure function of the raw candidate and the [`RenderMode`].
//! [`render`] pairs a context with the cache snapshot current at the call and
//! yields the formatted candidates lazily.

use std::collections::HashSet;
use std::sync::Arc;

use super::context::{CompletionContext, RenderMode};
use crate::cache::{CandidateCache, CandidateCategory, SuggestionValue};

/// Characters a value may contain and still be emitted unquoted.
const SAFE_VALUE_PUNCTUATION: &str = "_-:/.+@#$%^";

/// Lazily formatted completion strings.
pub type Rendered = Box<dyn Iterator<Item = String> + Send>;

/// True when a field name must be written as `%"name"`.
pub fn is_unsafe_field_name(name: &str) -> bool {
    let starts_badly = name
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_digit() || c == '.');
    starts_badly
        || name.chars().any(|c| !(c.is_alphanumeric() || c == '_'))
        || name.contains("..")
}

/// True when a value can be emitted without quotes.
pub fn is_safe_value(value: &str) -> bool {
    value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || SAFE_VALUE_PUNCTUATION.contains(c))
}

/// Wrap in double quotes, escaping backslashes and quotes.
pub fn quote(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');
    for c in text.chars() {
        if c == '"' || c == '\\' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

/// Field mode: `name=` or `%"name"=`.
pub fn format_field(name: &str) -> String {
    if is_unsafe_field_name(name) {
        format!("%{}=", quote(name))
    } else {
        format!("{name}=")
    }
}

/// Value mode: bare when safe, quoted otherwise.
pub fn format_value(value: &str) -> String {
    if is_safe_value(value) {
        value.to_string()
    } else {
        quote(value)
    }
}

/// Where-value mode: strings and booleans quoted, numbers and `null` bare.
///
/// Numbers are written exactly as they were decoded.
pub fn format_where_value(value: &SuggestionValue) -> String {
    match value {
        SuggestionValue::Text(s) => quote(s),
        SuggestionValue::Bool(b) => quote(&b.to_string()),
        SuggestionValue::Number(_) | SuggestionValue::Null => value.to_string(),
    }
}

/// Strip `%"..."` quoting from a captured field name.
pub fn unquote_field_name(raw: &str) -> &str {
    raw.strip_prefix("%\"")
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(raw)
}

fn names_in_order(cache: &CandidateCache, categories: &[CandidateCategory]) -> Vec<Arc<Vec<String>>> {
    categories.iter().map(|c| cache.names(*c)).collect()
}

/// Formatted candidates for `context`, read from `cache` now.
pub fn render(context: &CompletionContext, cache: &CandidateCache) -> Rendered {
    let Some(mode) = context.render_mode() else {
        return Box::new(std::iter::empty());
    };

    if let CompletionContext::WhereValue { field } = context {
        let values = cache.app_values(unquote_field_name(field));
        return Box::new(values.into_iter().map(|v| format_where_value(&v)));
    }

    let lists = names_in_order(cache, context.categories());
    let mut seen = HashSet::new();
    let names = lists
        .into_iter()
        .flat_map(|list| (0..list.len()).map(move |i| list[i].clone()))
        .filter(move |name| seen.insert(name.clone()));

    match mode {
        RenderMode::Field => Box::new(names.map(|n| format_field(&n))),
        RenderMode::Value => Box::new(names.map(|n| format_value(&n))),
        RenderMode::Bare | RenderMode::WhereValue => Box::new(names),
    }
}
