//! Redis key/value store
//!
//! Pass-through scalar storage over a pooled Redis connection: values are
//! written as strings, JSON payloads via serde_json, and high-precision
//! decimals as their exact string form. Typed fetch methods mirror the
//! write-side dispatch.

use deadpool_redis::{Config as PoolConfig, Connection, Pool, Runtime};
use redis::AsyncCommands;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use mnemosyne_core::{BigFloat, CacheError, PrecisionTimeSeries, Result};

use crate::config::CacheConfig;
use crate::timeseries::RedisTimeSeries;

/// Value types accepted by the key/value store
#[derive(Debug, Clone, PartialEq)]
pub enum CacheValue {
    /// UTF-8 string
    Text(String),
    /// 64-bit signed integer
    Int(i64),
    /// 64-bit floating point
    Float(f64),
    /// High-precision decimal, stored as its exact string form
    Precise(BigFloat),
    /// JSON payload, serialized with serde_json
    Json(serde_json::Value),
}

impl From<&str> for CacheValue {
    fn from(value: &str) -> Self {
        CacheValue::Text(value.to_string())
    }
}

impl From<String> for CacheValue {
    fn from(value: String) -> Self {
        CacheValue::Text(value)
    }
}

impl From<i64> for CacheValue {
    fn from(value: i64) -> Self {
        CacheValue::Int(value)
    }
}

impl From<f64> for CacheValue {
    fn from(value: f64) -> Self {
        CacheValue::Float(value)
    }
}

impl From<BigFloat> for CacheValue {
    fn from(value: BigFloat) -> Self {
        CacheValue::Precise(value)
    }
}

impl From<serde_json::Value> for CacheValue {
    fn from(value: serde_json::Value) -> Self {
        CacheValue::Json(value)
    }
}

/// Redis-backed cache store
///
/// Cloning shares the underlying connection pool; callers that need the
/// same connection process-wide construct one store and pass clones around
/// instead of going through a global holder.
#[derive(Clone)]
pub struct RedisCacheStore {
    config: CacheConfig,
    pool: Pool,
}

impl RedisCacheStore {
    /// Connect to the configured server and verify it responds.
    pub async fn connect(config: CacheConfig) -> Result<Self> {
        let store = Self::connect_lazy(config)?;
        let mut conn = store.conn().await?;
        redis::cmd("PING")
            .query_async::<String>(&mut conn)
            .await
            .map_err(|e| CacheError::Connection(format!("failed to reach server: {}", e)))?;
        Ok(store)
    }

    /// Build the pool without probing the server; the first operation
    /// establishes the connection.
    pub fn connect_lazy(config: CacheConfig) -> Result<Self> {
        info!(
            "connecting to Redis server {}:{} (pool size {})",
            config.host, config.port, config.pool_size
        );
        let pool = PoolConfig::from_url(config.url())
            .builder()
            .map_err(|e| {
                CacheError::Configuration(format!("failed to create pool builder: {}", e))
            })?
            .max_size(config.pool_size)
            .runtime(Runtime::Tokio1)
            .build()
            .map_err(|e| CacheError::Configuration(format!("failed to create pool: {}", e)))?;
        Ok(Self { config, pool })
    }

    /// The configuration this store was built from
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub(crate) async fn conn(&self) -> Result<Connection> {
        self.pool
            .get()
            .await
            .map_err(|e| CacheError::Connection(format!("failed to get connection: {}", e)))
    }

    /// PING probe; false on any failure
    pub async fn can_connect(&self) -> bool {
        match self.conn().await {
            Ok(mut conn) => redis::cmd("PING")
                .query_async::<String>(&mut conn)
                .await
                .is_ok(),
            Err(_) => false,
        }
    }

    /// Store a value under `key`
    pub async fn store(&self, key: &str, value: impl Into<CacheValue>) -> Result<()> {
        debug!("storing value for key:{}", key);
        let payload = match value.into() {
            CacheValue::Text(s) => s,
            CacheValue::Int(i) => i.to_string(),
            CacheValue::Float(f) => f.to_string(),
            CacheValue::Precise(b) => b.to_string(),
            CacheValue::Json(v) => serde_json::to_string(&v)?,
        };
        let mut conn = self.conn().await?;
        conn.set::<_, _, ()>(key, payload)
            .await
            .map_err(|e| CacheError::Backend(format!("failed to set {}: {}", key, e)))
    }

    async fn fetch_raw(&self, key: &str) -> Result<Option<String>> {
        debug!("fetching value for key:{}", key);
        let mut conn = self.conn().await?;
        conn.get(key)
            .await
            .map_err(|e| CacheError::Backend(format!("failed to get {}: {}", key, e)))
    }

    /// Fetch a string value; `None` when the key is absent
    pub async fn fetch_text(&self, key: &str) -> Result<Option<String>> {
        self.fetch_raw(key).await
    }

    /// Fetch an integer value
    pub async fn fetch_int(&self, key: &str) -> Result<Option<i64>> {
        match self.fetch_raw(key).await? {
            Some(raw) => raw
                .parse::<i64>()
                .map(Some)
                .map_err(|e| {
                    CacheError::Deserialization(format!("{} is not an integer: {}", key, e))
                }),
            None => Ok(None),
        }
    }

    /// Fetch a float value
    pub async fn fetch_float(&self, key: &str) -> Result<Option<f64>> {
        match self.fetch_raw(key).await? {
            Some(raw) => raw
                .parse::<f64>()
                .map(Some)
                .map_err(|e| CacheError::Deserialization(format!("{} is not a float: {}", key, e))),
            None => Ok(None),
        }
    }

    /// Fetch a high-precision decimal value
    pub async fn fetch_precise(&self, key: &str) -> Result<Option<BigFloat>> {
        match self.fetch_raw(key).await? {
            Some(raw) => raw.parse::<BigFloat>().map(Some),
            None => Ok(None),
        }
    }

    /// Fetch and deserialize a JSON payload
    pub async fn fetch_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.fetch_raw(key).await? {
            Some(raw) => serde_json::from_str(&raw).map(Some).map_err(|e| {
                CacheError::Deserialization(format!("{} is not valid JSON: {}", key, e))
            }),
            None => Ok(None),
        }
    }

    /// Delete a key; absent keys are not an error
    pub async fn delete(&self, key: &str) -> Result<()> {
        debug!("deleting key:{}", key);
        let mut conn = self.conn().await?;
        conn.del::<_, ()>(key)
            .await
            .map_err(|e| CacheError::Backend(format!("failed to delete {}: {}", key, e)))
    }

    /// List key names matching `pattern` (`*` for all)
    pub async fn keys(&self, pattern: &str) -> Result<Vec<String>> {
        let mut conn = self.conn().await?;
        conn.keys(pattern)
            .await
            .map_err(|e| CacheError::Backend(format!("failed to list keys '{}': {}", pattern, e)))
    }

    /// Time-series adapter sharing this store's pool
    pub fn time_series(&self) -> RedisTimeSeries {
        RedisTimeSeries::new(self.pool.clone())
    }

    /// Precision time-series front end sharing this store's pool
    pub fn precision_time_series(&self) -> PrecisionTimeSeries<RedisTimeSeries> {
        PrecisionTimeSeries::new(self.time_series())
    }
}
