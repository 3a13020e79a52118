use crate::seeds::{SeedResult, SeedSource};
use async_trait::async_trait;
use redis::AsyncCommands;

/// Reads seed sets from Redis with `SMEMBERS`
pub struct RedisSeedSource {
    client: redis::Client,
}

impl RedisSeedSource {
    /// Opens a client for `redis_url`; no connection is made until seeds are read
    ///
    /// # Arguments
    ///
    /// * `redis_url` - `redis://host:port` or `redis://host:port/db`
    pub fn new(redis_url: &str) -> SeedResult<Self> {
        let client = redis::Client::open(redis_url)?;
        Ok(Self { client })
    }
}

#[async_trait]
impl SeedSource for RedisSeedSource {
    async fn seeds(&self, key: &str) -> SeedResult<Vec<String>> {
        let mut conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| {
                tracing::error!("Failed to connect to Redis for seeds: {}", e);
                e
            })?;

        let members: Vec<String> = conn.smembers(key).await?;
        tracing::debug!("SMEMBERS {} returned {} ids", key, members.len());
        Ok(members)
    }
}
