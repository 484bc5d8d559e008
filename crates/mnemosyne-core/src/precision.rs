//! Multi-series precision store
//!
//! Presents one logical time series that accepts [`BigFloat`] values by
//! orchestrating three physical series (whole part, fractional digits,
//! fractional leading zeros) through the split/join codec. The three
//! series are created together, written under one shared timestamp, and
//! recombined positionally on read.

use std::time::Duration;
use tracing::{debug, warn};

use crate::bigfloat::BigFloat;
use crate::codec;
use crate::error::{CacheError, Result};
use crate::series::{SampleTime, TimeSeriesStore};

/// Physical key of the fractional-digits series backing `key`
pub fn fraction_key(key: &str) -> String {
    format!("{}:fraction", key)
}

/// Physical key of the fractional-leading-zeros series backing `key`
pub fn fraction_leading_zeros_key(key: &str) -> String {
    format!("{}:fraction:leading-zeros", key)
}

/// A sample value accepted by or returned from a logical series
#[derive(Debug, Clone, PartialEq)]
pub enum SeriesValue {
    /// Plain numeric sample, stored in the base series only
    Plain(f64),
    /// High-precision decimal, split across the three backing series
    Precise(BigFloat),
}

impl From<f64> for SeriesValue {
    fn from(value: f64) -> Self {
        SeriesValue::Plain(value)
    }
}

impl From<BigFloat> for SeriesValue {
    fn from(value: BigFloat) -> Self {
        SeriesValue::Precise(value)
    }
}

/// Precision-aware time-series front end over a [`TimeSeriesStore`].
///
/// Construct it with the store adapter it should drive; callers that share
/// one backend connection pass clones of the same adapter. Backend calls
/// run sequentially per operation, and concurrent writers to the same
/// logical series must be serialized by the caller if the three-way write
/// is to stay atomic.
pub struct PrecisionTimeSeries<S> {
    store: S,
}

impl<S: TimeSeriesStore> PrecisionTimeSeries<S> {
    /// Wrap a store adapter
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Access the underlying adapter, e.g. to query an auxiliary series
    /// directly via [`fraction_key`] / [`fraction_leading_zeros_key`]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Create the logical series.
    ///
    /// The base series is always created; with `precision` the fraction and
    /// leading-zeros series follow, in that fixed order, all sharing
    /// `field_label` and `retention`. Every step treats "already exists" as
    /// success, so re-invocation heals a previously interrupted creation.
    pub async fn create(
        &self,
        key: &str,
        field_label: &str,
        precision: bool,
        retention: Option<Duration>,
    ) -> Result<()> {
        debug!("creating series {} (precision: {})", key, precision);
        self.store.create_series(key, field_label, retention).await?;
        if precision {
            self.store
                .create_series(&fraction_key(key), field_label, retention)
                .await?;
            self.store
                .create_series(&fraction_leading_zeros_key(key), field_label, retention)
                .await?;
        }
        Ok(())
    }

    /// Append one sample and return the timestamp it was stored under.
    ///
    /// A [`SeriesValue::Precise`] value is split by the codec and written to
    /// all three series under the identical timestamp: when `at` is
    /// [`SampleTime::Auto`], the timestamp the backend assigns to the base
    /// write is reused verbatim for the two auxiliary writes.
    pub async fn append(&self, key: &str, at: SampleTime, value: SeriesValue) -> Result<i64> {
        if !self.store.series_exists(key).await? {
            return Err(CacheError::SeriesNotFound(key.to_string()));
        }
        match value {
            SeriesValue::Plain(v) => self.store.append(key, at, v).await,
            SeriesValue::Precise(big) => {
                let (whole, fraction, leading_zeros) = codec::split(&big)?;
                let ts = self.store.append(key, at, whole as f64).await?;
                self.store
                    .append(&fraction_key(key), SampleTime::At(ts), fraction as f64)
                    .await?;
                self.store
                    .append(
                        &fraction_leading_zeros_key(key),
                        SampleTime::At(ts),
                        leading_zeros as f64,
                    )
                    .await?;
                Ok(ts)
            }
        }
    }

    /// Inclusive range query over the logical series.
    ///
    /// In precision mode the three backing series are queried over the same
    /// bounds and ordering, then consumed pairwise by position: a record is
    /// emitted only where all three positional timestamps agree, and any
    /// misaligned position is skipped. This relies on the series always
    /// being written together (it is not a general timestamp join); series
    /// that diverge, e.g. through differing backend eviction, lose the
    /// misaligned samples, and the skips are logged.
    pub async fn range(
        &self,
        key: &str,
        from: i64,
        to: i64,
        precision: bool,
        reverse: bool,
    ) -> Result<Vec<(i64, SeriesValue)>> {
        if !precision {
            let samples = self.store.range(key, from, to, reverse).await?;
            return Ok(samples
                .into_iter()
                .map(|(ts, v)| (ts, SeriesValue::Plain(v)))
                .collect());
        }

        let wholes = self.store.range(key, from, to, reverse).await?;
        let fractions = self
            .store
            .range(&fraction_key(key), from, to, reverse)
            .await?;
        let leading_zeros = self
            .store
            .range(&fraction_leading_zeros_key(key), from, to, reverse)
            .await?;

        let mut records = Vec::with_capacity(wholes.len());
        let mut skipped = 0usize;
        for ((wt, whole), ((ft, fraction), (zt, zeros))) in wholes
            .into_iter()
            .zip(fractions.into_iter().zip(leading_zeros.into_iter()))
        {
            if wt == ft && wt == zt {
                let value = codec::join(whole as i64, fraction as i64, zeros as i64)?;
                records.push((wt, SeriesValue::Precise(value)));
            } else {
                skipped += 1;
            }
        }
        if skipped > 0 {
            warn!(
                "series {}: skipped {} misaligned sample position(s) in [{}, {}]",
                key, skipped, from, to
            );
        }
        Ok(records)
    }

    /// True iff the base series exists
    pub async fn exists(&self, key: &str) -> Result<bool> {
        self.store.series_exists(key).await
    }

    /// Retention window of the base series. Auxiliary series are queried
    /// through [`store`](Self::store) under their own physical keys.
    pub async fn retention(&self, key: &str) -> Result<Duration> {
        self.store.retention(key).await
    }

    /// Delete the logical series: the base series always, and with
    /// `precision` the two auxiliary series as well. Absent series are
    /// not an error.
    pub async fn delete(&self, key: &str, precision: bool) -> Result<()> {
        debug!("deleting series {} (precision: {})", key, precision);
        self.store.delete_series(key).await?;
        if precision {
            self.store.delete_series(&fraction_key(key)).await?;
            self.store
                .delete_series(&fraction_leading_zeros_key(key))
                .await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemorySeriesStore;

    fn big(s: &str) -> BigFloat {
        s.parse().unwrap()
    }

    fn series() -> PrecisionTimeSeries<InMemorySeriesStore> {
        PrecisionTimeSeries::new(InMemorySeriesStore::new())
    }

    #[test]
    fn test_backing_key_names() {
        assert_eq!(fraction_key("price"), "price:fraction");
        assert_eq!(
            fraction_leading_zeros_key("price"),
            "price:fraction:leading-zeros"
        );
    }

    #[tokio::test]
    async fn test_plain_append_and_range() {
        let ts = series();
        ts.create("prices", "price", false, None).await.unwrap();
        ts.append("prices", SampleTime::At(1), 10.0.into())
            .await
            .unwrap();
        ts.append("prices", SampleTime::At(2), 11.0.into())
            .await
            .unwrap();
        ts.append("prices", SampleTime::At(3), 12.0.into())
            .await
            .unwrap();

        let data = ts.range("prices", 1, 3, false, false).await.unwrap();
        assert_eq!(
            data,
            vec![
                (1, SeriesValue::Plain(10.0)),
                (2, SeriesValue::Plain(11.0)),
                (3, SeriesValue::Plain(12.0)),
            ]
        );
    }

    #[tokio::test]
    async fn test_plain_range_in_reverse() {
        let ts = series();
        ts.create("prices", "price", false, None).await.unwrap();
        for t in 1..=3 {
            ts.append("prices", SampleTime::At(t), (t as f64).into())
                .await
                .unwrap();
        }
        let data = ts.range("prices", 1, 3, false, true).await.unwrap();
        assert_eq!(
            data,
            vec![
                (3, SeriesValue::Plain(3.0)),
                (2, SeriesValue::Plain(2.0)),
                (1, SeriesValue::Plain(1.0)),
            ]
        );
    }

    #[tokio::test]
    async fn test_precise_round_trip() {
        let ts = series();
        ts.create("prices", "price", true, None).await.unwrap();
        ts.append(
            "prices",
            SampleTime::At(1),
            big("1000000000.123456789012").into(),
        )
        .await
        .unwrap();
        ts.append(
            "prices",
            SampleTime::At(2),
            big("2000000000.210987654321").into(),
        )
        .await
        .unwrap();

        let data = ts.range("prices", 1, 2, true, false).await.unwrap();
        assert_eq!(
            data,
            vec![
                (1, SeriesValue::Precise(big("1000000000.123456789012"))),
                (2, SeriesValue::Precise(big("2000000000.210987654321"))),
            ]
        );
    }

    #[tokio::test]
    async fn test_precise_round_trip_with_leading_zeros() {
        let ts = series();
        ts.create("prices", "price", true, None).await.unwrap();
        ts.append(
            "prices",
            SampleTime::At(1),
            big("1000000000.000000000012").into(),
        )
        .await
        .unwrap();
        ts.append(
            "prices",
            SampleTime::At(2),
            big("0.010987654321").into(),
        )
        .await
        .unwrap();

        let data = ts.range("prices", 1, 2, true, false).await.unwrap();
        assert_eq!(
            data,
            vec![
                (1, SeriesValue::Precise(big("1000000000.000000000012"))),
                (2, SeriesValue::Precise(big("0.010987654321"))),
            ]
        );
    }

    #[tokio::test]
    async fn test_precise_range_in_reverse() {
        let ts = series();
        ts.create("prices", "price", true, None).await.unwrap();
        ts.append(
            "prices",
            SampleTime::At(1),
            big("1000000000.123456789012").into(),
        )
        .await
        .unwrap();
        ts.append(
            "prices",
            SampleTime::At(2),
            big("2000000000.210987654321").into(),
        )
        .await
        .unwrap();

        let data = ts.range("prices", 1, 2, true, true).await.unwrap();
        assert_eq!(data[0].0, 2);
        assert_eq!(data[1].0, 1);
    }

    #[tokio::test]
    async fn test_auto_timestamp_is_shared_across_backing_series() {
        let ts = series();
        ts.create("prices", "price", true, None).await.unwrap();
        let assigned = ts
            .append("prices", SampleTime::Auto, big("0.000000000012").into())
            .await
            .unwrap();

        let store = ts.store();
        let base = store.range("prices", assigned, assigned, false).await.unwrap();
        let fraction = store
            .range(&fraction_key("prices"), assigned, assigned, false)
            .await
            .unwrap();
        let zeros = store
            .range(
                &fraction_leading_zeros_key("prices"),
                assigned,
                assigned,
                false,
            )
            .await
            .unwrap();
        assert_eq!(base.len(), 1);
        assert_eq!(fraction.len(), 1);
        assert_eq!(zeros.len(), 1);
        assert_eq!(base[0].0, assigned);
        assert_eq!(fraction[0].0, assigned);
        assert_eq!(zeros[0].0, assigned);
    }

    #[tokio::test]
    async fn test_misaligned_positions_are_skipped() {
        let ts = series();
        ts.create("prices", "price", true, None).await.unwrap();

        // base and leading-zeros get 1,2,3 but the fraction series misses
        // timestamp 2; positional zipping then only lines up at position 0
        let store = ts.store();
        for t in [1, 2, 3] {
            store
                .append("prices", SampleTime::At(t), 100.0)
                .await
                .unwrap();
            store
                .append(
                    &fraction_leading_zeros_key("prices"),
                    SampleTime::At(t),
                    0.0,
                )
                .await
                .unwrap();
        }
        store
            .append(&fraction_key("prices"), SampleTime::At(1), 12.0)
            .await
            .unwrap();
        store
            .append(&fraction_key("prices"), SampleTime::At(3), 34.0)
            .await
            .unwrap();

        let data = ts.range("prices", 1, 3, true, false).await.unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data[0], (1, SeriesValue::Precise(big("100.12"))));
    }

    #[tokio::test]
    async fn test_create_is_idempotent_and_keeps_retention() {
        let ts = series();
        ts.create(
            "prices",
            "price",
            true,
            Some(Duration::from_millis(100)),
        )
        .await
        .unwrap();
        ts.create("prices", "price", true, None).await.unwrap();
        ts.create("prices", "price", true, None).await.unwrap();

        assert!(ts.exists("prices").await.unwrap());
        assert_eq!(
            ts.retention("prices").await.unwrap(),
            Duration::from_millis(100)
        );
    }

    #[tokio::test]
    async fn test_retention_propagates_to_all_backing_series() {
        let ts = series();
        let window = Duration::from_millis(100);
        ts.create("prices", "price", true, Some(window))
            .await
            .unwrap();

        let store = ts.store();
        assert_eq!(store.retention("prices").await.unwrap(), window);
        assert_eq!(
            store.retention(&fraction_key("prices")).await.unwrap(),
            window
        );
        assert_eq!(
            store
                .retention(&fraction_leading_zeros_key("prices"))
                .await
                .unwrap(),
            window
        );
    }

    #[tokio::test]
    async fn test_append_before_create_fails() {
        let ts = series();
        let err = ts
            .append("never-created", SampleTime::At(1), 1.0.into())
            .await
            .unwrap_err();
        assert!(matches!(err, CacheError::SeriesNotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_removes_all_backing_series() {
        let ts = series();
        ts.create("prices", "price", true, None).await.unwrap();
        ts.delete("prices", true).await.unwrap();

        let store = ts.store();
        assert!(!store.series_exists("prices").await.unwrap());
        assert!(!store
            .series_exists(&fraction_key("prices"))
            .await
            .unwrap());
        assert!(!store
            .series_exists(&fraction_leading_zeros_key("prices"))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_delete_is_permissive() {
        let ts = series();
        ts.delete("never-created", true).await.unwrap();
    }

    #[tokio::test]
    async fn test_deleted_series_behaves_as_absent() {
        let ts = series();
        ts.create("prices", "price", false, None).await.unwrap();
        ts.delete("prices", false).await.unwrap();

        let err = ts
            .append("prices", SampleTime::At(1), 1.0.into())
            .await
            .unwrap_err();
        assert!(matches!(err, CacheError::SeriesNotFound(_)));
    }
}
