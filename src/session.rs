//! Query session
//!
//! The session is the one place that owns the candidate cache, the classifier
//! and the background producers. It is created once per process: every
//! producer is spawned into a single [`JoinSet`] at startup and the prompt is
//! handed the cache immediately, without waiting for any of them.
//!
//! A dynamic category whose producer cannot run (no credentials, no
//! kubeconfig, no app-json source) is seeded from the persisted cache if it
//! holds a value, else from the static lists in the configuration.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tokio::task::JoinSet;
use tracing::{debug, info};

use crate::cache::persist::{CacheKey, PersistentCache};
use crate::cache::{AppFieldMap, CacheWriters, CandidateCache, ProducerStatus, SlotWriter};
use crate::config::{Config, Credentials};
use crate::error::Result;
use crate::producers::app_json::{AppJsonSource, load_app_json};
use crate::producers::metadata::{
    FIELDS, MetadataSource, PARTITIONS, SumoApiClient, fetch_all_names, fetch_field_names,
};
use crate::producers::namespace::{KubectlNamespaces, NamespaceSource, fetch_namespaces};
use crate::producers::{PersistTarget, run_producer};
use crate::repl::completion::{Classifier, CompletionEngine};

/// The external collaborators a session may use
#[derive(Default)]
pub struct SessionSources {
    /// Metadata API; `None` without credentials
    pub metadata: Option<Arc<dyn MetadataSource>>,
    /// Namespace lister; `None` without a kubeconfig
    pub namespaces: Option<Arc<dyn NamespaceSource>>,
    /// Where-value suggestions
    pub app_json: Option<AppJsonSource>,
}

impl SessionSources {
    /// Build the production collaborators from the configuration
    ///
    /// # Arguments
    /// * `config` - Effective configuration
    /// * `credentials` - Access keys, if any were found
    ///
    /// # Returns
    /// * `Result<SessionSources>` - The sources, or the error building the HTTP client
    pub fn from_config(config: &Config, credentials: Option<Credentials>) -> Result<Self> {
        let metadata = match credentials {
            Some(credentials) => {
                let client = SumoApiClient::new(&config.api, credentials)?;
                Some(Arc::new(client) as Arc<dyn MetadataSource>)
            }
            None => None,
        };

        let namespaces = config.kubernetes.kubeconfig.as_ref().map(|kubeconfig| {
            Arc::new(KubectlNamespaces::new(
                config.kubernetes.command.clone(),
                kubeconfig.clone(),
            )) as Arc<dyn NamespaceSource>
        });

        let app_json = match &config.app_json_file {
            Some(path) => Some(AppJsonSource::File(path.clone())),
            None if !config.app_json.is_empty() => {
                Some(AppJsonSource::Inline(config.app_json.clone()))
            }
            None => None,
        };

        Ok(Self {
            metadata,
            namespaces,
            app_json,
        })
    }
}

/// Explicit context object for one interactive session
pub struct Session {
    cache: Arc<CandidateCache>,
    classifier: Classifier,
    store: Arc<PersistentCache>,
    producers: JoinSet<()>,
}

impl Session {
    /// Open the persisted cache and start every producer the configuration allows
    pub async fn start(config: &Config, credentials: Option<Credentials>) -> Result<Self> {
        let sources = SessionSources::from_config(config, credentials)?;
        let store = Arc::new(PersistentCache::open(&config.cache.file_path).await);
        Ok(Self::with_sources(sources, config, store).await)
    }

    /// Start a session over explicit collaborators
    ///
    /// Must run inside a Tokio runtime; producers are spawned, not awaited.
    pub async fn with_sources(
        sources: SessionSources,
        config: &Config,
        store: Arc<PersistentCache>,
    ) -> Self {
        let (cache, writers) = CandidateCache::create();
        let CacheWriters {
            indexes,
            custom_fields,
            namespaces,
            json_app,
        } = writers;
        let persist: PersistTarget = config.cache.persist.then(|| store.clone());
        let mut producers = JoinSet::new();

        match sources.metadata {
            Some(source) => {
                let index_source = source.clone();
                let target = persist.clone();
                producers.spawn(async move {
                    run_producer(
                        "indexes",
                        indexes,
                        CacheKey::Indexes,
                        target,
                        fetch_all_names(index_source.as_ref(), PARTITIONS),
                    )
                    .await
                });

                let target = persist.clone();
                producers.spawn(async move {
                    run_producer(
                        "fields",
                        custom_fields,
                        CacheKey::Fields,
                        target,
                        fetch_field_names(source.as_ref()),
                    )
                    .await
                });
            }
            None => {
                debug!("No credentials, metadata producers not started");
                seed(&store, indexes, CacheKey::Indexes, &config.indexes).await;
                seed(&store, custom_fields, CacheKey::Fields, &config.fields).await;
            }
        }

        match sources.namespaces {
            Some(source) => {
                let target = persist.clone();
                producers.spawn(async move {
                    run_producer(
                        "namespaces",
                        namespaces,
                        CacheKey::Namespaces,
                        target,
                        fetch_namespaces(source.as_ref()),
                    )
                    .await
                });
            }
            None => {
                debug!("No kubeconfig, namespace producer not started");
                seed(
                    &store,
                    namespaces,
                    CacheKey::Namespaces,
                    &config.namespaces,
                )
                .await;
            }
        }

        match sources.app_json {
            Some(source) => {
                let target = persist.clone();
                producers.spawn(async move {
                    run_producer(
                        "app_json",
                        json_app,
                        CacheKey::JsonApp,
                        target,
                        load_app_json(source),
                    )
                    .await
                });
            }
            None => seed(&store, json_app, CacheKey::JsonApp, &AppFieldMap::new()).await,
        }

        info!("Session started with {} producer(s)", producers.len());
        Self {
            cache,
            classifier: Classifier::new(),
            store,
            producers,
        }
    }

    pub fn cache(&self) -> &Arc<CandidateCache> {
        &self.cache
    }

    pub fn store(&self) -> &Arc<PersistentCache> {
        &self.store
    }

    /// A completion engine reading this session's cache
    pub fn completion_engine(&self) -> CompletionEngine {
        CompletionEngine::with_classifier(self.classifier, self.cache.clone())
    }

    /// Number of producers that have not been collected yet
    pub fn pending_producers(&self) -> usize {
        self.producers.len()
    }

    /// Wait until every producer has finished
    pub async fn wait_for_producers(&mut self) {
        while self.producers.join_next().await.is_some() {}
    }

    /// Cancel outstanding producers
    pub fn shutdown(&mut self) {
        if !self.producers.is_empty() {
            debug!("Aborting {} producer(s)", self.producers.len());
        }
        self.producers.abort_all();
    }
}

/// Seed a category whose producer is not running.
///
/// The persisted value wins over the configured list; an empty configured
/// list leaves the category unloaded.
async fn seed<T>(store: &PersistentCache, writer: SlotWriter<T>, key: CacheKey, configured: &T)
where
    T: DeserializeOwned + Clone + IsEmpty,
{
    if let Some(persisted) = store.get::<T>(key).await {
        debug!("Using persisted '{}'", key.as_str());
        writer.publish(persisted, ProducerStatus::UsingCache);
    } else if !configured.is_empty() {
        debug!("Using configured '{}'", key.as_str());
        writer.publish(configured.clone(), ProducerStatus::Loaded);
    }
}

trait IsEmpty {
    fn is_empty(&self) -> bool;
}

impl IsEmpty for Vec<String> {
    fn is_empty(&self) -> bool {
        Vec::is_empty(self)
    }
}

impl IsEmpty for AppFieldMap {
    fn is_empty(&self) -> bool {
        AppFieldMap::is_empty(self)
    }
}
