//! Seed ids a crawl starts from
//!
//! Seeds are read once at startup. The production source is a Redis set named
//! `{spider}:{seed kind}`; a fixed list (from the config file or the command
//! line) can stand in for it.

mod redis_source;

pub use redis_source::RedisSeedSource;

use async_trait::async_trait;
use thiserror::Error;

/// Errors while reading seeds
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("No seed source configured: set [seeds] redis-url or ids, or pass --seed")]
    NotConfigured,
}

/// Result type for seed operations
pub type SeedResult<T> = Result<T, SeedError>;

/// Supplies the seed ids stored under a key
#[async_trait]
pub trait SeedSource: Send + Sync {
    async fn seeds(&self, key: &str) -> SeedResult<Vec<String>>;
}

/// A fixed list of seed ids, independent of the key
#[derive(Debug, Clone, Default)]
pub struct StaticSeeds {
    ids: Vec<String>,
}

impl StaticSeeds {
    pub fn new<I, T>(ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl SeedSource for StaticSeeds {
    async fn seeds(&self, _key: &str) -> SeedResult<Vec<String>> {
        Ok(self.ids.clone())
    }
}

/// Key of the seed set for a crawl
pub fn seed_key(spider: &str, kind: &str) -> String {
    format!("{}:{}", spider, kind)
}

/// True for a non-empty string of ASCII digits
pub fn is_valid_seed(id: &str) -> bool {
    !id.is_empty() && id.chars().all(|c| c.is_ascii_digit())
}

/// Reads the seeds under `key`, cleaned up for crawling
///
/// Whitespace is trimmed, non-numeric ids are skipped with a warning and
/// duplicates removed; the rest keep their order. An empty result is not an
/// error, only a warning.
pub async fn load_seeds(source: &dyn SeedSource, key: &str) -> SeedResult<Vec<String>> {
    let raw = source.seeds(key).await?;

    let mut seen = std::collections::HashSet::new();
    let mut seeds = Vec::with_capacity(raw.len());
    for id in raw {
        let id = id.trim();
        if !is_valid_seed(id) {
            tracing::warn!("Skipping invalid seed id '{}' from {}", id, key);
            continue;
        }
        if seen.insert(id.to_string()) {
            seeds.push(id.to_string());
        }
    }

    if seeds.is_empty() {
        tracing::warn!("No seeds found under {}", key);
    } else {
        tracing::info!("Loaded {} seeds from {}", seeds.len(), key);
    }

    Ok(seeds)
}
