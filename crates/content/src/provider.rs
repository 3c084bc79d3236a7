//! Content provider contract and the catalog-backed implementation.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use thiserror::Error;
use tracing::{debug, warn};

use crate::catalog::{Catalog, Category};
use crate::types::Item;

/// Errors raised while fetching content.
///
/// Running short of items is not an error: providers return a shorter list.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("content transport failed: {0}")]
    Transport(String),

    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("catalog contains duplicate item id '{0}'")]
    DuplicateId(String),
}

/// Supplier of distinct items used to skin cards.
///
/// Implementations must never return duplicate ids and must return a short
/// list, not an error, when fewer than `count` items exist.
#[async_trait]
pub trait ContentProvider: Send + Sync {
    async fn get_items(&self, count: usize) -> Result<Vec<Item>, ContentError>;
}

#[async_trait]
impl<P: ContentProvider + ?Sized> ContentProvider for Arc<P> {
    async fn get_items(&self, count: usize) -> Result<Vec<Item>, ContentError> {
        (**self).get_items(count).await
    }
}

#[async_trait]
impl<P: ContentProvider + ?Sized> ContentProvider for Box<P> {
    async fn get_items(&self, count: usize) -> Result<Vec<Item>, ContentError> {
        (**self).get_items(count).await
    }
}

/// Serves random distinct items from a [`Catalog`].
#[derive(Debug)]
pub struct CatalogProvider {
    catalog: Catalog,
    category: Category,
    latency: Option<Duration>,
    rng: Mutex<StdRng>,
}

impl CatalogProvider {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            category: Category::All,
            latency: None,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Provider over the built-in hairstyle catalog.
    pub fn builtin() -> Self {
        Self::new(Catalog::builtin())
    }

    /// Only serve items of this category.
    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    /// Delay every response, mimicking a remote store.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Make item selection reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn category(&self) -> Category {
        self.category
    }

    fn pick(&self, count: usize) -> Vec<Item> {
        let pool: Vec<&Item> = self.catalog.in_category(self.category).collect();
        if pool.len() < count {
            warn!(
                requested = count,
                available = pool.len(),
                category = self.category.as_str(),
                "not enough items in catalog"
            );
        }

        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        pool.choose_multiple(&mut *rng, count)
            .map(|item| (*item).clone())
            .collect()
    }
}

#[async_trait]
impl ContentProvider for CatalogProvider {
    async fn get_items(&self, count: usize) -> Result<Vec<Item>, ContentError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        let items = self.pick(count);
        debug!(requested = count, returned = items.len(), "items served");
        Ok(items)
    }
}
