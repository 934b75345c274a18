//! Metadata API producers
//!
//! Index names come from the paginated partitions resource, custom field names
//! from the fields resource. Both speak the same page shape:
//!
//! ```json
//! {"data": [{"name": "prod"}, {"fieldName": "cluster"}], "next": "token-or-null"}
//! ```

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, trace};

use crate::config::{ApiConfig, Credentials};
use crate::error::{ProducerError, Result};

/// Resource listing index (partition) names
pub const PARTITIONS: &str = "v1/partitions";

/// Resource listing custom field names
pub const FIELDS: &str = "v1/fields";

/// One page of a metadata listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MetadataPage {
    #[serde(default)]
    pub data: Vec<MetadataItem>,

    /// Continuation token; absent or null on the last page
    #[serde(default)]
    pub next: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetadataItem {
    #[serde(alias = "fieldName")]
    pub name: String,
}

/// Source of metadata pages
#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// Fetch one page of `resource`, continuing from `token` when given
    async fn fetch_page(&self, resource: &str, token: Option<&str>) -> Result<MetadataPage>;
}

/// HTTP client for the Sumo Logic metadata API
pub struct SumoApiClient {
    http: Client,
    endpoint: String,
    page_size: u32,
    credentials: Credentials,
}

impl SumoApiClient {
    /// Create a client
    ///
    /// # Arguments
    /// * `api` - Endpoint and page size
    /// * `credentials` - Access keys sent as basic auth
    ///
    /// # Returns
    /// * `Result<Self>` - The client, or the error building the HTTP stack
    pub fn new(api: &ApiConfig, credentials: Credentials) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("sumoq/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            endpoint: api.endpoint.trim_end_matches('/').to_string(),
            page_size: api.page_size,
            credentials,
        })
    }

    fn url(&self, resource: &str) -> String {
        format!("{}/{}", self.endpoint, resource)
    }
}

#[async_trait]
impl MetadataSource for SumoApiClient {
    async fn fetch_page(&self, resource: &str, token: Option<&str>) -> Result<MetadataPage> {
        let url = self.url(resource);
        let mut request = self
            .http
            .get(&url)
            .basic_auth(
                &self.credentials.access_id,
                Some(&self.credentials.access_key),
            )
            .query(&[("limit", self.page_size)]);
        if let Some(token) = token {
            request = request.query(&[("token", token)]);
        }

        trace!("GET {} (token: {:?})", url, token);
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProducerError::Status {
                url,
                status: status.as_u16(),
            }
            .into());
        }

        let body = response.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| ProducerError::MalformedPayload(format!("{url}: {e}")).into())
    }
}

/// Collect the names of every page of `resource`.
///
/// Pages are requested one after another until a page carries no continuation
/// token; names keep page order. Nothing is returned unless every page
/// succeeded.
pub async fn fetch_all_names(source: &dyn MetadataSource, resource: &str) -> Result<Vec<String>> {
    let mut names = Vec::new();
    let mut token: Option<String> = None;
    let mut pages = 0usize;

    loop {
        let page = source.fetch_page(resource, token.as_deref()).await?;
        pages += 1;
        names.extend(page.data.into_iter().map(|item| item.name));

        match page.next {
            Some(next) if !next.is_empty() => token = Some(next),
            _ => break,
        }
    }

    debug!("{}: {} names over {} page(s)", resource, names.len(), pages);
    Ok(names)
}

/// Fetch the custom field names; the listing is not paginated.
pub async fn fetch_field_names(source: &dyn MetadataSource) -> Result<Vec<String>> {
    let page = source.fetch_page(FIELDS, None).await?;
    Ok(page.data.into_iter().map(|item| item.name).collect())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    use crate::cache::persist::CacheKey;
    use crate::cache::{CandidateCache, CandidateCategory, ProducerStatus};
    use crate::error::SumoqError;
    use crate::producers::run_producer;

    /// Serves canned pages keyed by (resource, token)
    #[derive(Default)]
    pub(crate) struct FakeMetadata {
        pages: HashMap<(String, Option<String>), MetadataPage>,
        pub(crate) requests: Mutex<Vec<(String, Option<String>)>>,
    }

    impl FakeMetadata {
        pub(crate) fn page(
            mut self,
            resource: &str,
            token: Option<&str>,
            names: &[&str],
            next: Option<&str>,
        ) -> Self {
            let page = MetadataPage {
                data: names
                    .iter()
                    .map(|n| MetadataItem {
                        name: n.to_string(),
                    })
                    .collect(),
                next: next.map(str::to_string),
            };
            self.pages
                .insert((resource.to_string(), token.map(str::to_string)), page);
            self
        }
    }

    #[async_trait]
    impl MetadataSource for FakeMetadata {
        async fn fetch_page(&self, resource: &str, token: Option<&str>) -> Result<MetadataPage> {
            let key = (resource.to_string(), token.map(str::to_string));
            self.requests.lock().unwrap().push(key.clone());
            self.pages.get(&key).cloned().ok_or_else(|| {
                ProducerError::Status {
                    url: resource.to_string(),
                    status: 500,
                }
                .into()
            })
        }
    }

    #[test]
    fn test_page_decoding() {
        let page: MetadataPage = serde_json::from_str(
            r#"{"data": [{"name": "prod", "routingExpression": "x"}], "next": "abc"}"#,
        )
        .unwrap();
        assert_eq!(page.data[0].name, "prod");
        assert_eq!(page.next.as_deref(), Some("abc"));

        let fields: MetadataPage =
            serde_json::from_str(r#"{"data": [{"fieldName": "cluster", "fieldId": "1"}]}"#)
                .unwrap();
        assert_eq!(fields.data[0].name, "cluster");
        assert!(fields.next.is_none());

        let last: MetadataPage = serde_json::from_str(r#"{"data": [], "next": null}"#).unwrap();
        assert!(last.next.is_none());
    }

    #[tokio::test]
    async fn test_pagination_follows_tokens_in_order() {
        let source = FakeMetadata::default()
            .page(PARTITIONS, None, &["a", "b"], Some("t1"))
            .page(PARTITIONS, Some("t1"), &["c"], None);

        let names = fetch_all_names(&source, PARTITIONS).await.unwrap();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert_eq!(
            *source.requests.lock().unwrap(),
            vec![
                (PARTITIONS.to_string(), None),
                (PARTITIONS.to_string(), Some("t1".to_string())),
            ]
        );
    }

    #[tokio::test]
    async fn test_two_pages_make_one_write() {
        let source = FakeMetadata::default()
            .page(PARTITIONS, None, &["prod"], Some("t1"))
            .page(PARTITIONS, Some("t1"), &["staging"], None);
        let (cache, writers) = CandidateCache::create();

        run_producer(
            "indexes",
            writers.indexes,
            CacheKey::Indexes,
            None,
            fetch_all_names(&source, PARTITIONS),
        )
        .await;

        assert_eq!(
            *cache.names(CandidateCategory::Indexes),
            vec!["prod", "staging"]
        );
        assert_eq!(
            cache.status(CandidateCategory::Indexes),
            ProducerStatus::Loaded
        );
    }

    #[tokio::test]
    async fn test_failed_second_page_is_an_error() {
        let source = FakeMetadata::default().page(PARTITIONS, None, &["prod"], Some("t1"));

        let err = fetch_all_names(&source, PARTITIONS).await.unwrap_err();
        assert!(matches!(
            err,
            SumoqError::Producer(ProducerError::Status { status: 500, .. })
        ));
    }

    #[tokio::test]
    async fn test_field_names() {
        let source = FakeMetadata::default().page(FIELDS, None, &["cluster", "namespace"], None);
        assert_eq!(
            fetch_field_names(&source).await.unwrap(),
            vec!["cluster", "namespace"]
        );
    }

    #[test]
    fn test_client_url() {
        let api = ApiConfig {
            endpoint: "https://api.eu.sumologic.com/api/".to_string(),
            page_size: 10,
        };
        let client = SumoApiClient::new(&api, Credentials::new("id", "key")).unwrap();
        assert_eq!(
            client.url(PARTITIONS),
            "https://api.eu.sumologic.com/api/v1/partitions"
        );
    }
}
