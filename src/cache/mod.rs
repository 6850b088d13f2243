use redis::AsyncCommands;
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use crate::redis_client::RedisClient;

pub mod reports;

pub use reports::ReportSlot;

/// Кеш отчётов по событиям. Ошибки Redis не роняют запрос: только лог.
#[derive(Clone)]
pub struct CacheService {
    redis: RedisClient,
    ttl_seconds: u64,
}

impl CacheService {
    pub fn new(redis: RedisClient, ttl_seconds: u64) -> Self {
        Self { redis, ttl_seconds }
    }

    async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let mut conn = self.redis.conn.clone();
        let data = match conn.get::<_, Option<String>>(key).await {
            Ok(data) => data,
            Err(e) => {
                warn!("cache read failed for {}: {:?}", key, e);
                return None;
            }
        };

        match serde_json::from_str(&data?) {
            Ok(value) => Some(value),
            Err(e) => {
                // битая запись - просто промах
                warn!("cache entry {} is not valid json: {:?}", key, e);
                None
            }
        }
    }

    async fn set_json<T: Serialize>(&self, key: &str, value: &T) {
        let data = match serde_json::to_string(value) {
            Ok(data) => data,
            Err(e) => {
                warn!("failed to serialize cache entry {}: {:?}", key, e);
                return;
            }
        };
        let mut conn = self.redis.conn.clone();
        let result: redis::RedisResult<()> = conn.set_ex(key, data, self.ttl_seconds).await;
        if let Err(e) = result {
            warn!("cache write failed for {}: {:?}", key, e);
        }
    }

    // Отсутствующий счётчик - ноль
    async fn counter(&self, key: &str) -> Option<u64> {
        let mut conn = self.redis.conn.clone();
        match conn.get::<_, Option<u64>>(key).await {
            Ok(value) => Some(value.unwrap_or(0)),
            Err(e) => {
                warn!("counter read failed for {}: {:?}", key, e);
                None
            }
        }
    }

    async fn bump(&self, key: &str) -> Option<u64> {
        let mut conn = self.redis.conn.clone();
        match conn.incr::<_, _, u64>(key, 1u64).await {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("counter increment failed for {}: {:?}", key, e);
                None
            }
        }
    }

    async fn delete(&self, keys: Vec<String>) {
        if keys.is_empty() {
            return;
        }
        let mut conn = self.redis.conn.clone();
        let result: redis::RedisResult<i64> = conn.del(&keys).await;
        match result {
            Ok(removed) => debug!("invalidated {} cache keys", removed),
            Err(e) => warn!("cache invalidation failed for {:?}: {:?}", keys, e),
        }
    }
}
