//! mnemosyne-redis: Redis backend for the mnemosyne cache
//!
//! Three access modes over one pooled connection:
//! - [`RedisCacheStore`]: plain key/value storage with typed fetch, plus
//!   hash-of-values storage and JSON entry collections
//! - [`RedisTimeSeries`]: the RedisTimeSeries implementation of the
//!   [`TimeSeriesStore`] contract
//! - [`PrecisionTimeSeries`] (re-exported from `mnemosyne-core`): the
//!   three-series precision front end, obtained via
//!   [`RedisCacheStore::precision_time_series`]
//!
//! # Example
//! ```no_run
//! use mnemosyne_redis::{BigFloat, CacheConfig, RedisCacheStore, SampleTime};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = RedisCacheStore::connect(CacheConfig::default()).await?;
//! let prices = store.precision_time_series();
//!
//! prices.create("btc:gbp", "price", true, None).await?;
//! let value: BigFloat = "1000000000.000000000012".parse()?;
//! prices.append("btc:gbp", SampleTime::Auto, value.into()).await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod hash;
pub mod provider;
mod reply;
pub mod timeseries;

// Re-exports
pub use config::CacheConfig;
pub use provider::{CacheValue, RedisCacheStore};
pub use timeseries::RedisTimeSeries;

pub use mnemosyne_core::{
    fraction_key, fraction_leading_zeros_key, BigFloat, CacheError, PrecisionTimeSeries, Result,
    SampleTime, SeriesValue, TimeSeriesStore,
};
