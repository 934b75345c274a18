//! Completion context definitions
//!
//! A context names the candidate set to offer at the cursor and how each
//! candidate is formatted.

use crate::cache::CandidateCategory;

/// What kind of completion the text before the cursor calls for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionContext {
    /// A new `field=` pair or boolean connector is expected
    Field,

    /// Right after `_index=`
    Index,

    /// Right after `_sourceName=`
    SourceName,

    /// Right after `_loglevel=`
    LogLevel,

    /// Right after a pipe
    SumoOperator,

    /// A field inside a `| where` clause
    WhereField,

    /// A value inside a `| where` clause
    WhereValue {
        /// Field name as typed, possibly still wrapped as `%"..."`
        field: String,
    },

    /// No completion available
    None,
}

/// How raw candidates are turned into insertable text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// `%"..."` for unsafe names, always followed by `=`
    Field,
    /// Double-quoted only when it contains unsafe characters
    Value,
    /// Typed scalars: strings and booleans quoted, numbers bare
    WhereValue,
    /// Emitted as-is
    Bare,
}

impl CompletionContext {
    /// Create a where-value context
    pub fn where_value(field: impl Into<String>) -> Self {
        Self::WhereValue {
            field: field.into(),
        }
    }

    /// Formatting policy for this context
    pub fn render_mode(&self) -> Option<RenderMode> {
        match self {
            Self::Field | Self::WhereField => Some(RenderMode::Field),
            Self::Index | Self::SourceName => Some(RenderMode::Value),
            Self::LogLevel | Self::SumoOperator => Some(RenderMode::Bare),
            Self::WhereValue { .. } => Some(RenderMode::WhereValue),
            Self::None => None,
        }
    }

    /// Cache categories feeding this context, in display order
    pub fn categories(&self) -> &'static [CandidateCategory] {
        use CandidateCategory::*;
        match self {
            Self::Field => &[BuiltInFields, CustomFields],
            Self::Index => &[Indexes],
            Self::SourceName => &[Namespaces],
            Self::LogLevel => &[LogLevels],
            Self::SumoOperator => &[SumoOperators],
            Self::WhereField => &[JsonAppFields, BuiltInFields, CustomFields],
            Self::WhereValue { .. } => &[JsonAppFields],
            Self::None => &[],
        }
    }

    /// Short description shown next to candidates in the menu
    pub fn label(&self) -> &'static str {
        match self {
            Self::Field => "field",
            Self::Index => "index",
            Self::SourceName => "namespace",
            Self::LogLevel => "log level",
            Self::SumoOperator => "operator",
            Self::WhereField => "where field",
            Self::WhereValue { .. } => "where value",
            Self::None => "",
        }
    }

    /// Check if this is a None context
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_modes() {
        assert_eq!(
            CompletionContext::Field.render_mode(),
            Some(RenderMode::Field)
        );
        assert_eq!(
            CompletionContext::Index.render_mode(),
            Some(RenderMode::Value)
        );
        assert_eq!(
            CompletionContext::LogLevel.render_mode(),
            Some(RenderMode::Bare)
        );
        assert_eq!(
            CompletionContext::where_value("status").render_mode(),
            Some(RenderMode::WhereValue)
        );
        assert_eq!(CompletionContext::None.render_mode(), None);
    }

    #[test]
    fn test_categories() {
        assert_eq!(
            CompletionContext::SourceName.categories(),
            &[CandidateCategory::Namespaces]
        );
        assert!(CompletionContext::None.categories().is_empty());
    }

    #[test]
    fn test_none_context() {
        assert!(CompletionContext::None.is_none());
        assert!(!CompletionContext::Field.is_none());
        assert_eq!(CompletionContext::None.label(), "");
    }
}
