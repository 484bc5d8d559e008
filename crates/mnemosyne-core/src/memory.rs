//! In-memory time-series store (thread-safe, non-distributed)
//!
//! Backend-free [`TimeSeriesStore`] implementation for tests and single
//! process use.

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::error::{CacheError, Result};
use crate::series::{SampleTime, TimeSeriesStore};

#[derive(Debug, Clone)]
struct SeriesData {
    #[allow(dead_code)]
    field_label: String,
    retention: Duration,
    /// Samples kept sorted by timestamp
    samples: Vec<(i64, f64)>,
}

/// In-memory time-series store
pub struct InMemorySeriesStore {
    series: Arc<DashMap<String, SeriesData>>,
    /// Last auto-assigned timestamp; bumped so two `Auto` appends never collide
    last_auto: AtomicI64,
}

impl InMemorySeriesStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            series: Arc::new(DashMap::new()),
            last_auto: AtomicI64::new(0),
        }
    }

    /// Number of series currently held
    pub fn len(&self) -> usize {
        self.series.len()
    }

    /// Check if the store holds no series
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    fn now_millis(&self) -> i64 {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or(Duration::ZERO)
            .as_millis() as i64;
        // monotonic within this store instance
        let mut last = self.last_auto.load(Ordering::SeqCst);
        loop {
            let next = now.max(last + 1);
            match self
                .last_auto
                .compare_exchange(last, next, Ordering::SeqCst, Ordering::SeqCst)
            {
                Ok(_) => return next,
                Err(actual) => last = actual,
            }
        }
    }
}

impl Default for InMemorySeriesStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TimeSeriesStore for InMemorySeriesStore {
    async fn create_series(
        &self,
        key: &str,
        field_label: &str,
        retention: Option<Duration>,
    ) -> Result<()> {
        // existing series keeps its configuration
        self.series
            .entry(key.to_string())
            .or_insert_with(|| SeriesData {
                field_label: field_label.to_string(),
                retention: retention.unwrap_or(Duration::ZERO),
                samples: Vec::new(),
            });
        Ok(())
    }

    async fn append(&self, key: &str, at: SampleTime, value: f64) -> Result<i64> {
        let ts = match at {
            SampleTime::At(ts) => ts,
            SampleTime::Auto => self.now_millis(),
        };
        let mut entry = self
            .series
            .get_mut(key)
            .ok_or_else(|| CacheError::SeriesNotFound(key.to_string()))?;
        match entry.samples.binary_search_by_key(&ts, |(t, _)| *t) {
            Ok(pos) => entry.samples[pos] = (ts, value),
            Err(pos) => entry.samples.insert(pos, (ts, value)),
        }
        Ok(ts)
    }

    async fn range(
        &self,
        key: &str,
        from: i64,
        to: i64,
        reverse: bool,
    ) -> Result<Vec<(i64, f64)>> {
        let entry = self
            .series
            .get(key)
            .ok_or_else(|| CacheError::SeriesNotFound(key.to_string()))?;
        let mut samples: Vec<(i64, f64)> = entry
            .samples
            .iter()
            .filter(|(t, _)| *t >= from && *t <= to)
            .copied()
            .collect();
        if reverse {
            samples.reverse();
        }
        Ok(samples)
    }

    async fn series_exists(&self, key: &str) -> Result<bool> {
        Ok(self.series.contains_key(key))
    }

    async fn retention(&self, key: &str) -> Result<Duration> {
        self.series
            .get(key)
            .map(|entry| entry.retention)
            .ok_or_else(|| CacheError::SeriesNotFound(key.to_string()))
    }

    async fn delete_series(&self, key: &str) -> Result<()> {
        self.series.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_append_and_range() {
        let store = InMemorySeriesStore::new();
        store.create_series("cpu", "usage", None).await.unwrap();
        store.append("cpu", SampleTime::At(1), 10.0).await.unwrap();
        store.append("cpu", SampleTime::At(3), 12.0).await.unwrap();
        store.append("cpu", SampleTime::At(2), 11.0).await.unwrap();

        let samples = store.range("cpu", 1, 3, false).await.unwrap();
        assert_eq!(samples, vec![(1, 10.0), (2, 11.0), (3, 12.0)]);
    }

    #[tokio::test]
    async fn test_range_is_inclusive_and_bounded() {
        let store = InMemorySeriesStore::new();
        store.create_series("cpu", "usage", None).await.unwrap();
        for ts in 1..=5 {
            store
                .append("cpu", SampleTime::At(ts), ts as f64)
                .await
                .unwrap();
        }
        let samples = store.range("cpu", 2, 4, false).await.unwrap();
        assert_eq!(samples, vec![(2, 2.0), (3, 3.0), (4, 4.0)]);
    }

    #[tokio::test]
    async fn test_range_reverse_ordering() {
        let store = InMemorySeriesStore::new();
        store.create_series("cpu", "usage", None).await.unwrap();
        store.append("cpu", SampleTime::At(1), 10.0).await.unwrap();
        store.append("cpu", SampleTime::At(2), 11.0).await.unwrap();

        let samples = store.range("cpu", 1, 2, true).await.unwrap();
        assert_eq!(samples, vec![(2, 11.0), (1, 10.0)]);
    }

    #[tokio::test]
    async fn test_append_to_missing_series_fails() {
        let store = InMemorySeriesStore::new();
        let err = store
            .append("nowhere", SampleTime::At(1), 1.0)
            .await
            .unwrap_err();
        assert!(matches!(err, CacheError::SeriesNotFound(_)));
    }

    #[tokio::test]
    async fn test_create_is_idempotent() {
        let store = InMemorySeriesStore::new();
        store
            .create_series("cpu", "usage", Some(Duration::from_millis(100)))
            .await
            .unwrap();
        // re-creation keeps the original retention
        store.create_series("cpu", "usage", None).await.unwrap();
        assert_eq!(
            store.retention("cpu").await.unwrap(),
            Duration::from_millis(100)
        );
    }

    #[tokio::test]
    async fn test_delete_is_permissive() {
        let store = InMemorySeriesStore::new();
        store.delete_series("never-created").await.unwrap();

        store.create_series("cpu", "usage", None).await.unwrap();
        store.delete_series("cpu").await.unwrap();
        assert!(!store.series_exists("cpu").await.unwrap());
    }

    #[tokio::test]
    async fn test_auto_timestamps_are_monotonic() {
        let store = InMemorySeriesStore::new();
        store.create_series("cpu", "usage", None).await.unwrap();
        let first = store
            .append("cpu", SampleTime::Auto, 1.0)
            .await
            .unwrap();
        let second = store
            .append("cpu", SampleTime::Auto, 2.0)
            .await
            .unwrap();
        assert!(second > first);
    }
}
