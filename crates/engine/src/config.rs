//! Engine configuration loaded from the environment.

use std::path::PathBuf;

use memory_match_content::{Catalog, CatalogProvider, Category};
use memory_match_core::{DeckRng, SessionTimings};
use tracing::warn;

use crate::EngineError;

/// Host settings shared by every session the engine runs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EngineConfig {
    pub timings: SessionTimings,
    /// Fixed seed for dealing and item selection; entropy when `None`.
    pub seed: Option<u64>,
    /// JSON catalog to serve items from instead of the built-in one.
    pub catalog_path: Option<PathBuf>,
    pub category: Category,
}

impl EngineConfig {
    /// Read `MEMORY_MATCH_*` variables. Invalid values fall back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(ms) = parse(&lookup, "MEMORY_MATCH_MISMATCH_DELAY_MS") {
            config.timings.mismatch_delay_ms = ms;
        }
        if let Some(ms) = parse(&lookup, "MEMORY_MATCH_ROUND_DELAY_MS") {
            config.timings.round_transition_ms = ms;
        }
        config.seed = parse(&lookup, "MEMORY_MATCH_SEED");

        config.catalog_path = lookup("MEMORY_MATCH_CATALOG")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);

        if let Some(raw) = lookup("MEMORY_MATCH_CATEGORY") {
            match Category::from_str(raw.trim()) {
                Some(category) => config.category = category,
                None => warn!(value = %raw, "unknown MEMORY_MATCH_CATEGORY, using all"),
            }
        }

        config
    }

    /// Deck RNG honouring the configured seed.
    pub fn deck_rng(&self) -> DeckRng {
        match self.seed {
            Some(seed) => DeckRng::new(seed),
            None => DeckRng::from_entropy(),
        }
    }

    /// Catalog provider for this configuration, loading the catalog file if one is set.
    pub async fn catalog_provider(&self) -> Result<CatalogProvider, EngineError> {
        let catalog = match &self.catalog_path {
            Some(path) => Catalog::load(path).await?,
            None => Catalog::builtin(),
        };
        let provider = CatalogProvider::new(catalog).with_category(self.category);
        Ok(match self.seed {
            Some(seed) => provider.with_seed(seed),
            None => provider,
        })
    }
}

fn parse<T: std::str::FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "ignoring invalid value");
            None
        }
    }
}
