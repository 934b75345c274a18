//! Context classifier
//!
//! Maps the text before the cursor to a [`CompletionContext`] with a fixed,
//! ordered rule table. Rules are tried top to bottom and the first match wins;
//! nothing is merged across rules. The classifier never rejects input: text no
//! rule accepts classifies as [`CompletionContext::None`].
//!
//! Grammar, with `not`/`and`/`or`/`where` matched case-insensitively:
//!
//! ```text
//! value      := BAREWORD | '"' ANY* '"'
//! fieldname  := IDENT | '%"' ANY+ '"'
//! open       := ('not' WS+ | 'not'? '(' WS*)*
//! clause     := open fieldname '=' value ')'*
//! connector  := ('and' | 'or') WS+
//! fieldexpr  := (clause WS+ connector*)* open
//! whereexpr  := (clause WS+ connector+)* open
//! wherehead  := .* '|' WS* 'where' WS+ whereexpr
//! ```
//!
//! Parentheses are only counted by presence, never balanced.

use std::sync::LazyLock;

use regex::Regex;

use super::context::CompletionContext;

const NOT: &str = r"(?i:not)";
const CONNECTOR: &str = r"(?i:and|or)\s+";
const FIELD_NAME: &str = r#"(?:%"[^"]+"|\w+)"#;
const VALUE: &str = r#"(?:"[^"]*"|[^\s"()|=]+)"#;

/// Tag of a rule; [`RuleKind::WhereValue`] takes its field from the match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    Field,
    Index,
    SourceName,
    LogLevel,
    SumoOperator,
    WhereField,
    WhereValue,
}

/// One (pattern, context) pair of the rule table.
#[derive(Debug)]
pub struct Rule {
    pattern: Regex,
    kind: RuleKind,
}

impl Rule {
    fn new(pattern: &str, kind: RuleKind) -> Self {
        let pattern = Regex::new(pattern)
            .unwrap_or_else(|e| panic!("invalid {kind:?} rule pattern: {e}"));
        Self { pattern, kind }
    }

    pub fn kind(&self) -> RuleKind {
        self.kind
    }

    /// The context this rule yields for `text`, if it matches.
    pub fn apply(&self, text: &str) -> Option<CompletionContext> {
        let captures = self.pattern.captures(text)?;
        let context = match self.kind {
            RuleKind::Field => CompletionContext::Field,
            RuleKind::Index => CompletionContext::Index,
            RuleKind::SourceName => CompletionContext::SourceName,
            RuleKind::LogLevel => CompletionContext::LogLevel,
            RuleKind::SumoOperator => CompletionContext::SumoOperator,
            RuleKind::WhereField => CompletionContext::WhereField,
            RuleKind::WhereValue => {
                CompletionContext::where_value(captures.name("field")?.as_str())
            }
        };
        Some(context)
    }
}

fn open() -> String {
    format!(r"(?:{NOT}\s+|{NOT}?\(\s*)*")
}

fn clause() -> String {
    format!(r"{open}{FIELD_NAME}={VALUE}\)*", open = open())
}

fn field_expr() -> String {
    format!(
        r"(?:{clause}\s+(?:{CONNECTOR})*)*{open}",
        clause = clause(),
        open = open()
    )
}

fn where_head() -> String {
    format!(
        r"(?s:.*)\|\s*(?i:where)\s+(?:{clause}\s+(?:{CONNECTOR})+)*{open}",
        clause = clause(),
        open = open()
    )
}

static RULE_TABLE: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    let fields = field_expr();
    let head = where_head();
    vec![
        Rule::new(&format!("^{fields}$"), RuleKind::Field),
        Rule::new(&format!("^{fields}_index=$"), RuleKind::Index),
        Rule::new(&format!("^{fields}_sourceName=$"), RuleKind::SourceName),
        Rule::new(&format!("^{fields}_loglevel=$"), RuleKind::LogLevel),
        Rule::new(r"^(?s:.*)\|\s*$", RuleKind::SumoOperator),
        Rule::new(&format!("^{head}$"), RuleKind::WhereField),
        Rule::new(
            &format!("^{head}(?P<field>{FIELD_NAME})=$"),
            RuleKind::WhereValue,
        ),
    ]
});

/// Stateless classifier over the shared rule table.
#[derive(Debug, Clone, Copy)]
pub struct Classifier {
    rules: &'static [Rule],
}

impl Classifier {
    pub fn new() -> Self {
        Self {
            rules: RULE_TABLE.as_slice(),
        }
    }

    /// The rule table in evaluation order.
    pub fn rules(&self) -> &[Rule] {
        self.rules
    }

    /// Classify the text before the cursor.
    ///
    /// `prefix` is the whole buffer up to the cursor, newline-normalized.
    pub fn classify(&self, prefix: &str) -> CompletionContext {
        self.rules
            .iter()
            .find_map(|rule| rule.apply(prefix))
            .unwrap_or(CompletionContext::None)
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new()
    }
}
