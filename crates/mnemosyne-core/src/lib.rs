//! mnemosyne-core: precision-preserving cache primitives
//!
//! Backend-agnostic core of the mnemosyne caching layer:
//! - [`BigFloat`]: decimal values with exact string round-trip
//! - [`codec`]: split/join between a decimal and the three integers that
//!   fit ordinary numeric columns
//! - [`TimeSeriesStore`]: the capability contract a backend must offer
//! - [`PrecisionTimeSeries`]: one logical series over three physical ones
//! - [`InMemorySeriesStore`]: thread-safe store for tests and local use
//!
//! Backend implementations (Redis) live in the `mnemosyne-redis` crate.

pub mod bigfloat;
pub mod codec;
pub mod error;
pub mod memory;
pub mod precision;
pub mod series;

// Re-exports
pub use bigfloat::BigFloat;
pub use error::CacheError;
pub use memory::InMemorySeriesStore;
pub use precision::{
    fraction_key, fraction_leading_zeros_key, PrecisionTimeSeries, SeriesValue,
};
pub use series::{SampleTime, TimeSeriesStore};

/// Result type for cache operations
pub type Result<T> = std::result::Result<T, CacheError>;
