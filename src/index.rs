//! Search index cache.
//!
//! The index is fetched once per session and replaced wholesale on reload;
//! it is never mutated in place.

use crate::config::RetryPolicy;
use crate::constants::INDEX_LOCATION;
use crate::error::Result;
use crate::models::SearchIndex;
use crate::source::{ResourceSource, fetch_json};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::info;

/// Owned holder of the loaded search index
#[derive(Debug, Default)]
pub struct IndexCache {
    state: RwLock<Option<Arc<SearchIndex>>>,
}

impl IndexCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache that starts out already loaded
    pub fn preloaded(index: SearchIndex) -> Self {
        Self {
            state: RwLock::new(Some(Arc::new(index))),
        }
    }

    /// The current index, if one has been loaded
    pub fn get(&self) -> Option<Arc<SearchIndex>> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_loaded(&self) -> bool {
        self.get().is_some()
    }

    /// Fetch the index and replace the cached one.
    ///
    /// On failure the cache keeps whatever it held before. Returns the
    /// number of entries loaded.
    pub async fn load(&self, source: &dyn ResourceSource, retry: &RetryPolicy) -> Result<usize> {
        let index: SearchIndex = fetch_json(source, INDEX_LOCATION, retry).await?;
        let entries = index.len();

        *self.state.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(index));

        info!(
            "Search index loaded from {} ({} entries)",
            source.describe(),
            entries
        );
        Ok(entries)
    }
}
