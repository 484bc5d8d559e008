//! Hash-of-values store
//!
//! Field-keyed storage under a single cache key, plus JSON entry
//! collections where each item is serialized under a caller-derived field
//! name. Entry order follows the backend's hash field order.

use redis::AsyncCommands;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use mnemosyne_core::{CacheError, Result};

use crate::provider::RedisCacheStore;
use crate::reply;

impl RedisCacheStore {
    /// Store field/value pairs under `key` (HSET per field)
    pub async fn store_map(&self, key: &str, entries: &[(String, String)]) -> Result<()> {
        debug!("storing values for key:{}", key);
        let mut conn = self.conn().await?;
        for (field, value) in entries {
            conn.hset::<_, _, _, ()>(key, field, value)
                .await
                .map_err(|e| {
                    CacheError::Backend(format!("failed to set {}:{}: {}", key, field, e))
                })?;
        }
        Ok(())
    }

    /// Fetch all field/value pairs under `key`, in backend reply order.
    /// An absent key yields an empty list.
    pub async fn fetch_map(&self, key: &str) -> Result<Vec<(String, String)>> {
        debug!("fetching values for key:{}", key);
        let mut conn = self.conn().await?;
        let value: redis::Value = redis::cmd("HGETALL")
            .arg(key)
            .query_async(&mut conn)
            .await
            .map_err(|e| CacheError::Backend(format!("failed to fetch {}: {}", key, e)))?;
        Ok(reply::string_pairs(value))
    }

    /// Store a collection of JSON entries, each under the field name
    /// `entry_key` derives from it.
    pub async fn store_entries<T, F>(&self, key: &str, items: &[T], entry_key: F) -> Result<()>
    where
        T: Serialize,
        F: Fn(&T) -> String,
    {
        debug!("storing {} entries for key:{}", items.len(), key);
        let mut conn = self.conn().await?;
        for item in items {
            let field = entry_key(item);
            let payload = serde_json::to_string(item)?;
            conn.hset::<_, _, _, ()>(key, &field, payload)
                .await
                .map_err(|e| {
                    CacheError::Backend(format!("failed to set {}:{}: {}", key, field, e))
                })?;
        }
        Ok(())
    }

    /// Fetch all JSON entries under `key`, in backend reply order
    pub async fn fetch_entries<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>> {
        self.fetch_map(key)
            .await?
            .into_iter()
            .map(|(field, payload)| {
                serde_json::from_str(&payload).map_err(|e| {
                    CacheError::Deserialization(format!(
                        "entry {}:{} is not valid JSON: {}",
                        key, field, e
                    ))
                })
            })
            .collect()
    }

    /// Create or replace one JSON entry under `key`
    pub async fn put_entry<T: Serialize>(&self, key: &str, field: &str, item: &T) -> Result<()> {
        let payload = serde_json::to_string(item)?;
        let mut conn = self.conn().await?;
        conn.hset::<_, _, _, ()>(key, field, payload)
            .await
            .map_err(|e| CacheError::Backend(format!("failed to set {}:{}: {}", key, field, e)))
    }

    /// Remove one entry under `key`; absent fields are not an error
    pub async fn remove_entry(&self, key: &str, field: &str) -> Result<()> {
        let mut conn = self.conn().await?;
        conn.hdel::<_, _, ()>(key, field)
            .await
            .map_err(|e| CacheError::Backend(format!("failed to remove {}:{}: {}", key, field, e)))
    }
}
