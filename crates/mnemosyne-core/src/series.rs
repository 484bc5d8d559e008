//! Time-series store contract
//!
//! The small capability surface the precision layer needs from a backend:
//! create/append/range/exists/retention/delete against a named numeric
//! series. Any backend offering equivalent primitives can satisfy it.

use async_trait::async_trait;
use std::time::Duration;

use crate::error::Result;

/// Timestamp selector for an append.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleTime {
    /// Explicit timestamp (backend time units, typically epoch milliseconds)
    At(i64),
    /// Let the backend assign the current time
    Auto,
}

impl From<i64> for SampleTime {
    fn from(ts: i64) -> Self {
        SampleTime::At(ts)
    }
}

/// Trait for time-series storage backends
///
/// Calls are issued sequentially per logical operation and surface backend
/// failures unchanged; retry policy belongs to the caller. Appending to or
/// reading a series that was never created fails with
/// [`CacheError::SeriesNotFound`](crate::CacheError::SeriesNotFound).
#[async_trait]
pub trait TimeSeriesStore: Send + Sync + 'static {
    /// Create a series, attaching `field_label` as descriptive metadata and
    /// an optional maximum-age retention window. Idempotent: an existing
    /// series succeeds silently and keeps its configuration.
    async fn create_series(
        &self,
        key: &str,
        field_label: &str,
        retention: Option<Duration>,
    ) -> Result<()>;

    /// Append one sample and return the timestamp actually assigned
    /// (the explicit timestamp echoed back, or the backend-resolved time
    /// for [`SampleTime::Auto`]).
    async fn append(&self, key: &str, at: SampleTime, value: f64) -> Result<i64>;

    /// Inclusive range query, ascending by timestamp unless `reverse`.
    /// A fresh query per call; no cursor state is retained.
    async fn range(&self, key: &str, from: i64, to: i64, reverse: bool)
        -> Result<Vec<(i64, f64)>>;

    /// True iff the series has been created and not deleted
    async fn series_exists(&self, key: &str) -> Result<bool>;

    /// Configured retention window; `Duration::ZERO` means unbounded
    async fn retention(&self, key: &str) -> Result<Duration>;

    /// Remove a series; no-op if it never existed
    async fn delete_series(&self, key: &str) -> Result<()>;
}
