//! RedisTimeSeries store adapter
//!
//! Implements the [`TimeSeriesStore`] contract over RedisTimeSeries module
//! commands. One adapter instance serves any number of series; the
//! precision layer in `mnemosyne-core` drives it for the three-way split
//! writes.

use async_trait::async_trait;
use deadpool_redis::{Connection, Pool};
use std::time::Duration;
use tracing::debug;

use mnemosyne_core::{CacheError, Result, SampleTime, TimeSeriesStore};

use crate::reply;

/// Time-series store over the RedisTimeSeries module
pub struct RedisTimeSeries {
    pool: Pool,
}

impl RedisTimeSeries {
    /// Wrap a connection pool
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    async fn conn(&self) -> Result<Connection> {
        self.pool
            .get()
            .await
            .map_err(|e| CacheError::Connection(format!("failed to get connection: {}", e)))
    }

    /// TS.INFO reply as field/value pairs; `None` when the series is absent
    async fn info(&self, key: &str) -> Result<Option<Vec<(String, redis::Value)>>> {
        let mut conn = self.conn().await?;
        match redis::cmd("TS.INFO")
            .arg(key)
            .query_async::<redis::Value>(&mut conn)
            .await
        {
            Ok(value) => Ok(Some(reply::pairs(value))),
            Err(e) if e.kind() == redis::ErrorKind::ResponseError => Ok(None),
            Err(e) => Err(CacheError::Connection(format!(
                "failed to inspect {}: {}",
                key, e
            ))),
        }
    }
}

#[async_trait]
impl TimeSeriesStore for RedisTimeSeries {
    async fn create_series(
        &self,
        key: &str,
        field_label: &str,
        retention: Option<Duration>,
    ) -> Result<()> {
        // existing series keeps its configuration
        if self.series_exists(key).await? {
            return Ok(());
        }
        debug!("creating timeseries {} (field: {})", key, field_label);
        let mut cmd = redis::cmd("TS.CREATE");
        cmd.arg(key);
        if let Some(window) = retention {
            cmd.arg("RETENTION").arg(window.as_millis() as u64);
        }
        cmd.arg("LABELS").arg("time").arg(field_label);
        let mut conn = self.conn().await?;
        cmd.query_async::<()>(&mut conn)
            .await
            .map_err(|e| series_error("create", key, e))
    }

    async fn append(&self, key: &str, at: SampleTime, value: f64) -> Result<i64> {
        let mut cmd = redis::cmd("TS.ADD");
        cmd.arg(key);
        match at {
            SampleTime::At(ts) => cmd.arg(ts),
            SampleTime::Auto => cmd.arg("*"),
        };
        cmd.arg(value);
        let mut conn = self.conn().await?;
        // the integer reply is the timestamp the sample was stored under
        cmd.query_async::<i64>(&mut conn)
            .await
            .map_err(|e| series_error("append to", key, e))
    }

    async fn range(
        &self,
        key: &str,
        from: i64,
        to: i64,
        reverse: bool,
    ) -> Result<Vec<(i64, f64)>> {
        let command = if reverse { "TS.REVRANGE" } else { "TS.RANGE" };
        let mut conn = self.conn().await?;
        redis::cmd(command)
            .arg(key)
            .arg(from)
            .arg(to)
            .query_async::<Vec<(i64, f64)>>(&mut conn)
            .await
            .map_err(|e| series_error("query", key, e))
    }

    async fn series_exists(&self, key: &str) -> Result<bool> {
        Ok(self.info(key).await?.is_some())
    }

    async fn retention(&self, key: &str) -> Result<Duration> {
        let pairs = self
            .info(key)
            .await?
            .ok_or_else(|| CacheError::SeriesNotFound(key.to_string()))?;
        for (field, value) in pairs {
            if field == "retentionTime" {
                if let redis::Value::Int(ms) = value {
                    return Ok(Duration::from_millis(ms.max(0) as u64));
                }
            }
        }
        Err(CacheError::Backend(format!(
            "no retention reported for {}",
            key
        )))
    }

    async fn delete_series(&self, key: &str) -> Result<()> {
        debug!("deleting timeseries {}", key);
        let mut conn = self.conn().await?;
        // DEL of an absent key deletes nothing and is not an error
        redis::cmd("DEL")
            .arg(key)
            .query_async::<i64>(&mut conn)
            .await
            .map(|_| ())
            .map_err(|e| series_error("delete", key, e))
    }
}

fn series_error(action: &str, key: &str, err: redis::RedisError) -> CacheError {
    if err.kind() == redis::ErrorKind::ResponseError && err.to_string().contains("does not exist")
    {
        CacheError::SeriesNotFound(key.to_string())
    } else if err.is_io_error() || err.is_connection_refusal() || err.is_connection_dropped() {
        CacheError::Connection(format!("failed to {} {}: {}", action, key, err))
    } else {
        CacheError::Backend(format!("failed to {} {}: {}", action, key, err))
    }
}
