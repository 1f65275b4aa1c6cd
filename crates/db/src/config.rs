//! Store configuration loaded from environment variables.

/// Tunables for [`Store`](crate::Store).
///
/// All fields have defaults suitable for local development; override via
/// environment variables in production.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Service read-cache validity window in seconds (default: `300`).
    pub cache_ttl_secs: u64,
    /// Change-feed broadcast buffer capacity (default: `1024`).
    pub change_capacity: usize,
}

impl StoreConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default |
    /// |--------------------------|---------|
    /// | `SERVICE_CACHE_TTL_SECS` | `300`   |
    /// | `CHANGE_BUS_CAPACITY`    | `1024`  |
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();

        let cache_ttl_secs: u64 = std::env::var("SERVICE_CACHE_TTL_SECS")
            .unwrap_or_else(|_| "300".into())
            .parse()
            .expect("SERVICE_CACHE_TTL_SECS must be a valid u64");

        let change_capacity: usize = std::env::var("CHANGE_BUS_CAPACITY")
            .unwrap_or_else(|_| "1024".into())
            .parse()
            .expect("CHANGE_BUS_CAPACITY must be a valid usize");

        Self {
            cache_ttl_secs,
            change_capacity,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            cache_ttl_secs: 300,
            change_capacity: crate::changes::DEFAULT_CAPACITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = StoreConfig::default();
        assert_eq!(config.cache_ttl_secs, 300);
        assert_eq!(config.change_capacity, 1024);
    }
}
