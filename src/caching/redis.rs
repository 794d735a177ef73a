//! # Redis cache client
//!
//! Thin JSON-over-Redis wrapper used as a read-through cache by the
//! repositories. Values are serialized with `serde_json`; every call opens a
//! multiplexed connection from the shared client.
//!
//! Callers treat cache failures as misses: a Redis outage slows requests
//! down but never fails them.

use std::env;

use redis::{AsyncCommands, Client};
use serde::{de::DeserializeOwned, Serialize};

/// Default TTL for cached documents, in seconds
pub const DEFAULT_TTL_SECONDS: u64 = 600;

/// Shared Redis handle
#[derive(Clone)]
pub struct RedisClient {
    client: Client,
}

impl RedisClient {
    /// Connects using `REDIS_URL` (default `redis://localhost:6379`) and
    /// verifies the server with `PING`.
    pub async fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let redis_url = env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string());

        let client = Client::open(redis_url)?;
        let redis = Self { client };
        redis.ping().await?;

        log::info!("✅ Redis connected");
        Ok(redis)
    }

    pub async fn ping(&self) -> Result<(), redis::RedisError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        redis::cmd("PING").query_async::<()>(&mut conn).await
    }

    /// Reads and deserializes `key`; `Ok(None)` on a miss
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, redis::RedisError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let value: Option<String> = conn.get(key).await?;

        match value {
            Some(json) => {
                let decoded = serde_json::from_str(&json).map_err(|e| {
                    redis::RedisError::from((redis::ErrorKind::TypeError, "Deserialization failed", e.to_string()))
                })?;
                log::debug!("cache hit: {}", key);
                Ok(Some(decoded))
            }
            None => Ok(None),
        }
    }

    /// Stores `value` under `key` for `seconds`
    pub async fn set_with_expiry<T: Serialize>(&self, key: &str, value: &T, seconds: usize) -> Result<(), redis::RedisError> {
        let json = encode(value)?;
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.set_ex(key, json, seconds as u64).await
    }

    pub async fn del(&self, key: &str) -> Result<(), redis::RedisError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.del(key).await
    }

    /// Deletes several keys in one round trip; empty input is a no-op
    pub async fn del_multiple(&self, keys: &[String]) -> Result<(), redis::RedisError> {
        if keys.is_empty() {
            return Ok(());
        }
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.del(keys).await
    }

    /// `KEYS pattern`
    ///
    /// Blocking on the server side. Only used for the small, prefixed key
    /// spaces the repositories own (`program:*`, `user:*`).
    pub async fn keys(&self, pattern: &str) -> Result<Vec<String>, redis::RedisError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.keys(pattern).await
    }
}

fn encode<T: Serialize>(value: &T) -> Result<String, redis::RedisError> {
    serde_json::to_string(value)
        .map_err(|e| redis::RedisError::from((redis::ErrorKind::TypeError, "Serialization failed", e.to_string())))
}
