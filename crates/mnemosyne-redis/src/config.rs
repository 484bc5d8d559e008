//! Cache connection configuration

use serde::{Deserialize, Serialize};

/// Redis cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Redis server address
    pub host: String,
    /// Redis server port
    pub port: u16,
    /// Connection pool size
    pub pool_size: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 6379,
            pool_size: 10,
        }
    }
}

impl CacheConfig {
    /// Configuration for a server address, with the default pool size
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Self::default()
        }
    }

    /// Connection URL in `redis://host:port` form
    pub fn url(&self) -> String {
        format!("redis://{}:{}", self.host, self.port)
    }
}
