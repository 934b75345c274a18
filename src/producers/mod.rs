//! Background producers
//!
//! Each producer fills exactly one dynamic cache category from an external
//! source. It owns that category's [`SlotWriter`], marks it `loading`, fetches,
//! and then performs its single wholesale write. Failures are logged here and
//! go no further: the category keeps whatever it held before.

pub mod app_json;
pub mod metadata;
pub mod namespace;

use std::future::Future;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::cache::persist::{CacheKey, PersistentCache};
use crate::cache::{ProducerStatus, SlotWriter};
use crate::error::Result;

pub use app_json::{AppJsonSource, load_app_json};
pub use metadata::{MetadataSource, SumoApiClient, fetch_all_names, fetch_field_names};
pub use namespace::{KubectlNamespaces, NamespaceSource, fetch_namespaces, parse_namespaces};

/// Where a successful producer result is also written, if anywhere
pub type PersistTarget = Option<Arc<PersistentCache>>;

/// Run one producer to completion.
///
/// # Arguments
/// * `name` - Producer name used in log lines
/// * `writer` - The category's only write handle
/// * `key` - Persisted-cache key for the result
/// * `persist` - Persisted cache to update on success
/// * `fetch` - The fetch itself
pub async fn run_producer<T, F>(
    name: &str,
    writer: SlotWriter<T>,
    key: CacheKey,
    persist: PersistTarget,
    fetch: F,
) where
    T: Serialize,
    F: Future<Output = Result<T>>,
{
    writer.mark(ProducerStatus::Loading);
    debug!("Producer '{}' started", name);

    let value = match fetch.await {
        Ok(value) => value,
        Err(e) => {
            warn!("Producer '{}' failed: {}", name, e);
            writer.mark(ProducerStatus::Unloaded);
            return;
        }
    };

    if let Some(store) = &persist
        && let Err(e) = store.set(key, &value).await
    {
        warn!("Producer '{}' could not persist its result: {}", name, e);
    }

    writer.publish(value, ProducerStatus::Loaded);
    info!("Producer '{}' finished", name);
}
