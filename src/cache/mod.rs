//! Candidate cache shared by the completion engine and the background producers.
//!
//! Every category lives in its own [`Slot`]: an [`ArcSwap`] holding the current
//! value plus an observable [`ProducerStatus`]. Reads are lock-free loads and
//! never fail; an unpopulated category reads as empty.
//!
//! Writes go through a [`SlotWriter`]. [`CandidateCache::create`] hands out exactly
//! one writer per dynamic category and the writer is consumed by its single
//! `publish`, so a category is replaced wholesale at most once per producer and
//! readers can never observe a partial value. Static categories (built-in
//! fields, log levels, operators) get no writer at all.

pub mod persist;

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

use arc_swap::ArcSwap;
use serde::{Deserialize, Serialize};

use crate::repl::completion::catalog::{BUILT_IN_FIELDS, LOG_LEVELS, SUMO_OPERATORS};

pub use persist::{CacheKey, PersistentCache};

/// Field name -> suggested values, used for `where field=` completion.
pub type AppFieldMap = BTreeMap<String, Vec<SuggestionValue>>;

/// A scalar suggestion value from the app-JSON mapping.
///
/// Decoded untagged so the same shape works in TOML and JSON documents.
/// Numbers keep their literal form, so `1.0` stays `1.0` and integers past
/// `i64::MAX` stay exact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SuggestionValue {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
}

impl fmt::Display for SuggestionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SuggestionValue::Null => f.write_str("null"),
            SuggestionValue::Bool(b) => write!(f, "{b}"),
            SuggestionValue::Number(n) => write!(f, "{n}"),
            SuggestionValue::Text(s) => f.write_str(s),
        }
    }
}

/// The candidate sets the renderer can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CandidateCategory {
    BuiltInFields,
    CustomFields,
    Indexes,
    Namespaces,
    LogLevels,
    SumoOperators,
    JsonAppFields,
}

impl CandidateCategory {
    /// Categories filled by a background producer.
    pub const DYNAMIC: [CandidateCategory; 4] = [
        CandidateCategory::Indexes,
        CandidateCategory::CustomFields,
        CandidateCategory::Namespaces,
        CandidateCategory::JsonAppFields,
    ];

    /// Short label used in the prompt status line.
    pub fn label(&self) -> &'static str {
        match self {
            CandidateCategory::BuiltInFields => "builtin",
            CandidateCategory::CustomFields => "fields",
            CandidateCategory::Indexes => "idx",
            CandidateCategory::Namespaces => "ns",
            CandidateCategory::LogLevels => "levels",
            CandidateCategory::SumoOperators => "ops",
            CandidateCategory::JsonAppFields => "app",
        }
    }

    pub fn is_static(&self) -> bool {
        !Self::DYNAMIC.contains(self)
    }
}

/// Load state of a dynamic category. Purely observational.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ProducerStatus {
    Unloaded = 0,
    Loading = 1,
    Loaded = 2,
    UsingCache = 3,
}

impl ProducerStatus {
    fn from_u8(raw: u8) -> Self {
        match raw {
            1 => ProducerStatus::Loading,
            2 => ProducerStatus::Loaded,
            3 => ProducerStatus::UsingCache,
            _ => ProducerStatus::Unloaded,
        }
    }
}

impl fmt::Display for ProducerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ProducerStatus::Unloaded => "unloaded",
            ProducerStatus::Loading => "loading",
            ProducerStatus::Loaded => "loaded",
            ProducerStatus::UsingCache => "using-cache",
        };
        f.write_str(text)
    }
}

/// One cache category.
pub struct Slot<T> {
    value: ArcSwap<T>,
    status: AtomicU8,
}

impl<T> Slot<T> {
    fn new(value: T, status: ProducerStatus) -> Self {
        Self {
            value: ArcSwap::from_pointee(value),
            status: AtomicU8::new(status as u8),
        }
    }

    /// Current value. The returned `Arc` stays valid after a later replace.
    pub fn get(&self) -> Arc<T> {
        self.value.load_full()
    }

    pub fn status(&self) -> ProducerStatus {
        ProducerStatus::from_u8(self.status.load(Ordering::Acquire))
    }

    fn set_status(&self, status: ProducerStatus) {
        self.status.store(status as u8, Ordering::Release);
    }
}

impl<T: Default> Default for Slot<T> {
    fn default() -> Self {
        Self::new(T::default(), ProducerStatus::Unloaded)
    }
}

/// All candidate categories.
pub struct CandidateCache {
    built_in_fields: Slot<Vec<String>>,
    log_levels: Slot<Vec<String>>,
    sumo_operators: Slot<Vec<String>>,
    custom_fields: Slot<Vec<String>>,
    indexes: Slot<Vec<String>>,
    namespaces: Slot<Vec<String>>,
    json_app: Slot<AppFieldMap>,
}

/// Exclusive write handle for one category.
///
/// Not `Clone`: holding it is what makes a task the category's only producer.
pub struct SlotWriter<T> {
    cache: Arc<CandidateCache>,
    select: fn(&CandidateCache) -> &Slot<T>,
}

impl<T> SlotWriter<T> {
    fn slot(&self) -> &Slot<T> {
        (self.select)(&self.cache)
    }

    /// Update the observable status without touching the value.
    pub fn mark(&self, status: ProducerStatus) {
        self.slot().set_status(status);
    }

    pub fn status(&self) -> ProducerStatus {
        self.slot().status()
    }

    /// Replace the category wholesale and record how the value was obtained.
    pub fn publish(self, value: T, status: ProducerStatus) {
        let slot = self.slot();
        slot.value.store(Arc::new(value));
        slot.set_status(status);
    }
}

/// The writers for the dynamic categories, one each.
pub struct CacheWriters {
    pub indexes: SlotWriter<Vec<String>>,
    pub custom_fields: SlotWriter<Vec<String>>,
    pub namespaces: SlotWriter<Vec<String>>,
    pub json_app: SlotWriter<AppFieldMap>,
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl CandidateCache {
    /// Create an empty cache together with its writers.
    pub fn create() -> (Arc<Self>, CacheWriters) {
        let cache = Arc::new(Self {
            built_in_fields: Slot::new(owned(BUILT_IN_FIELDS), ProducerStatus::Loaded),
            log_levels: Slot::new(owned(LOG_LEVELS), ProducerStatus::Loaded),
            sumo_operators: Slot::new(owned(SUMO_OPERATORS), ProducerStatus::Loaded),
            custom_fields: Slot::default(),
            indexes: Slot::default(),
            namespaces: Slot::default(),
            json_app: Slot::default(),
        });

        let writers = CacheWriters {
            indexes: SlotWriter {
                cache: cache.clone(),
                select: |c| &c.indexes,
            },
            custom_fields: SlotWriter {
                cache: cache.clone(),
                select: |c| &c.custom_fields,
            },
            namespaces: SlotWriter {
                cache: cache.clone(),
                select: |c| &c.namespaces,
            },
            json_app: SlotWriter {
                cache: cache.clone(),
                select: |c| &c.json_app,
            },
        };

        (cache, writers)
    }

    /// Ordered names of a category. Never absent; empty until populated.
    ///
    /// For [`CandidateCategory::JsonAppFields`] these are the mapping's keys.
    pub fn names(&self, category: CandidateCategory) -> Arc<Vec<String>> {
        match category {
            CandidateCategory::BuiltInFields => self.built_in_fields.get(),
            CandidateCategory::CustomFields => self.custom_fields.get(),
            CandidateCategory::Indexes => self.indexes.get(),
            CandidateCategory::Namespaces => self.namespaces.get(),
            CandidateCategory::LogLevels => self.log_levels.get(),
            CandidateCategory::SumoOperators => self.sumo_operators.get(),
            CandidateCategory::JsonAppFields => {
                Arc::new(self.json_app.get().keys().cloned().collect())
            }
        }
    }

    /// The field -> suggestions mapping.
    pub fn app_fields(&self) -> Arc<AppFieldMap> {
        self.json_app.get()
    }

    /// Suggestions for one `where` field, empty when unknown.
    pub fn app_values(&self, field: &str) -> Vec<SuggestionValue> {
        self.json_app.get().get(field).cloned().unwrap_or_default()
    }

    pub fn status(&self, category: CandidateCategory) -> ProducerStatus {
        match category {
            CandidateCategory::BuiltInFields => self.built_in_fields.status(),
            CandidateCategory::CustomFields => self.custom_fields.status(),
            CandidateCategory::Indexes => self.indexes.status(),
            CandidateCategory::Namespaces => self.namespaces.status(),
            CandidateCategory::LogLevels => self.log_levels.status(),
            CandidateCategory::SumoOperators => self.sumo_operators.status(),
            CandidateCategory::JsonAppFields => self.json_app.status(),
        }
    }

    /// Status of every dynamic category, in display order.
    pub fn status_summary(&self) -> Vec<(CandidateCategory, ProducerStatus)> {
        CandidateCategory::DYNAMIC
            .iter()
            .map(|c| (*c, self.status(*c)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dynamic_categories_start_empty() {
        let (cache, _writers) = CandidateCache::create();
        for category in CandidateCategory::DYNAMIC {
            assert!(cache.names(category).is_empty());
            assert_eq!(cache.status(category), ProducerStatus::Unloaded);
        }
        assert!(cache.app_values("status").is_empty());
    }

    #[test]
    fn test_static_categories_are_populated() {
        let (cache, _writers) = CandidateCache::create();
        assert!(
            cache
                .names(CandidateCategory::LogLevels)
                .contains(&"error".to_string())
        );
        assert!(
            cache
                .names(CandidateCategory::BuiltInFields)
                .contains(&"_sourceCategory".to_string())
        );
        assert!(
            cache
                .names(CandidateCategory::SumoOperators)
                .contains(&"where".to_string())
        );
        assert_eq!(
            cache.status(CandidateCategory::LogLevels),
            ProducerStatus::Loaded
        );
        assert!(CandidateCategory::LogLevels.is_static());
        assert!(!CandidateCategory::Indexes.is_static());
    }

    #[test]
    fn test_publish_replaces_wholesale() {
        let (cache, writers) = CandidateCache::create();
        let before = cache.names(CandidateCategory::Indexes);

        writers.indexes.mark(ProducerStatus::Loading);
        assert_eq!(
            cache.status(CandidateCategory::Indexes),
            ProducerStatus::Loading
        );

        writers.indexes.publish(
            vec!["prod".to_string(), "staging".to_string()],
            ProducerStatus::Loaded,
        );

        assert_eq!(
            *cache.names(CandidateCategory::Indexes),
            vec!["prod".to_string(), "staging".to_string()]
        );
        assert_eq!(
            cache.status(CandidateCategory::Indexes),
            ProducerStatus::Loaded
        );
        // A reader holding the old snapshot still sees it intact.
        assert!(before.is_empty());
    }

    #[test]
    fn test_writers_are_independent() {
        let (cache, writers) = CandidateCache::create();
        writers
            .namespaces
            .publish(vec!["kube-system".to_string()], ProducerStatus::UsingCache);

        assert!(cache.names(CandidateCategory::Indexes).is_empty());
        assert_eq!(
            cache.status(CandidateCategory::Namespaces),
            ProducerStatus::UsingCache
        );
    }

    #[test]
    fn test_app_fields_keys_and_values() {
        let (cache, writers) = CandidateCache::create();
        let mut map = AppFieldMap::new();
        map.insert(
            "status".to_string(),
            vec![SuggestionValue::Text("active".to_string())],
        );
        map.insert("code".to_string(), vec![SuggestionValue::Number(42i64.into())]);
        writers.json_app.publish(map, ProducerStatus::Loaded);

        assert_eq!(
            *cache.names(CandidateCategory::JsonAppFields),
            vec!["code".to_string(), "status".to_string()]
        );
        assert_eq!(
            cache.app_values("status"),
            vec![SuggestionValue::Text("active".to_string())]
        );
        assert!(cache.app_values("missing").is_empty());
    }

    #[test]
    fn test_suggestion_value_decoding() {
        let values: Vec<SuggestionValue> =
            serde_json::from_str(r#"[true, 42, 1.5, "active", null]"#).unwrap();
        assert_eq!(
            values,
            vec![
                SuggestionValue::Bool(true),
                SuggestionValue::Number(42i64.into()),
                SuggestionValue::Number(serde_json::Number::from_f64(1.5).unwrap()),
                SuggestionValue::Text("active".to_string()),
                SuggestionValue::Null,
            ]
        );
    }

    #[test]
    fn test_status_summary_covers_dynamic_categories() {
        let (cache, _writers) = CandidateCache::create();
        let summary = cache.status_summary();
        assert_eq!(summary.len(), 4);
        assert_eq!(
            summary[0],
            (CandidateCategory::Indexes, ProducerStatus::Unloaded)
        );
        assert_eq!(
            summary[2],
            (CandidateCategory::Namespaces, ProducerStatus::Unloaded)
        );
    }
}
