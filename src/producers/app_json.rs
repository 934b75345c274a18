//! App-JSON producer
//!
//! Loads the field -> suggested values mapping used for `| where field=`
//! completion, either from the inline `[app_json]` table of the configuration
//! or from a separate JSON document.

use std::path::PathBuf;

use serde_json::Value;

use crate::cache::AppFieldMap;
use crate::error::{ProducerError, Result};

/// Where the mapping comes from
#[derive(Debug, Clone)]
pub enum AppJsonSource {
    /// A JSON document, either the mapping itself or `{"app_json": {...}}`
    File(PathBuf),
    /// Already decoded from the configuration
    Inline(AppFieldMap),
}

fn decode_document(raw: &str) -> serde_json::Result<AppFieldMap> {
    let mut document: Value = serde_json::from_str(raw)?;
    let nested = document
        .get_mut("app_json")
        .filter(|v| v.is_object())
        .map(Value::take);
    serde_json::from_value(nested.unwrap_or(document))
}

/// Load the mapping
pub async fn load_app_json(source: AppJsonSource) -> Result<AppFieldMap> {
    match source {
        AppJsonSource::Inline(map) => Ok(map),
        AppJsonSource::File(path) => {
            let raw = tokio::fs::read_to_string(&path).await?;
            decode_document(&raw).map_err(|e| {
                ProducerError::MalformedPayload(format!("{}: {}", path.display(), e)).into()
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::SuggestionValue;
    use crate::error::SumoqError;

    #[tokio::test]
    async fn test_inline_passes_through() {
        let mut map = AppFieldMap::new();
        map.insert("level".to_string(), vec![SuggestionValue::Number(3i64.into())]);
        assert_eq!(
            load_app_json(AppJsonSource::Inline(map.clone())).await.unwrap(),
            map
        );
    }

    #[tokio::test]
    async fn test_plain_mapping_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.json");
        std::fs::write(&path, r#"{"status": ["active", true, 42]}"#).unwrap();

        let map = load_app_json(AppJsonSource::File(path)).await.unwrap();
        assert_eq!(
            map.get("status"),
            Some(&vec![
                SuggestionValue::Text("active".to_string()),
                SuggestionValue::Bool(true),
                SuggestionValue::Number(42i64.into()),
            ])
        );
    }

    #[tokio::test]
    async fn test_null_entry_keeps_the_mapping() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.json");
        std::fs::write(&path, r#"{"status": ["active", null], "region": ["us"]}"#).unwrap();

        let map = load_app_json(AppJsonSource::File(path)).await.unwrap();
        assert_eq!(
            map.get("status"),
            Some(&vec![
                SuggestionValue::Text("active".to_string()),
                SuggestionValue::Null,
            ])
        );
        assert_eq!(
            map.get("region"),
            Some(&vec![SuggestionValue::Text("us".to_string())])
        );
    }

    #[tokio::test]
    async fn test_nested_app_json_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.json");
        std::fs::write(&path, r#"{"app_json": {"region": ["us-east-1"]}}"#).unwrap();

        let map = load_app_json(AppJsonSource::File(path)).await.unwrap();
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["region"]);
    }

    #[tokio::test]
    async fn test_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.json");
        std::fs::write(&path, r#"{"status": "not-a-list"}"#).unwrap();

        let err = load_app_json(AppJsonSource::File(path)).await.unwrap_err();
        assert!(matches!(
            err,
            SumoqError::Producer(ProducerError::MalformedPayload(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_file() {
        let err = load_app_json(AppJsonSource::File(PathBuf::from("/nonexistent/app.json")))
            .await
            .unwrap_err();
        assert!(matches!(err, SumoqError::Io(_)));
    }
}
