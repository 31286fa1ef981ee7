//! Configuration types.

use std::path::PathBuf;

use crate::error::ConfigError;

/// Relay server configuration.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Address the HTTP/WebSocket server binds to.
    pub bind_addr: String,
    /// Port for the HTTP/WebSocket server.
    pub port: u16,
    /// Capacity of the live fan-out channel feeding push clients.
    pub broadcast_capacity: usize,
    /// Optional JSON file used to seed the in-memory entity directory.
    pub directory_seed: Option<PathBuf>,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0".to_string(),
            port: 8080,
            broadcast_capacity: 256,
            directory_seed: None,
        }
    }
}

impl RelayConfig {
    /// Build config from `RELAY_*` environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        Ok(Self {
            bind_addr: lookup("RELAY_BIND_ADDR").unwrap_or(defaults.bind_addr),
            port: parse_or(&lookup, "RELAY_PORT", defaults.port)?,
            broadcast_capacity: parse_or(
                &lookup,
                "RELAY_BROADCAST_CAPACITY",
                defaults.broadcast_capacity,
            )?,
            directory_seed: lookup("RELAY_DIRECTORY_SEED").map(PathBuf::from),
        })
    }

    /// `host:port` string for the listener.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("{raw:?}: {e}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = RelayConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.broadcast_capacity, 256);
        assert_eq!(config.listen_addr(), "0.0.0.0:8080");
        assert!(config.directory_seed.is_none());
    }

    #[test]
    fn reads_overrides() {
        let config = RelayConfig::from_lookup(lookup_from(&[
            ("RELAY_PORT", "9001"),
            ("RELAY_BIND_ADDR", "127.0.0.1"),
            ("RELAY_BROADCAST_CAPACITY", " 32 "),
            ("RELAY_DIRECTORY_SEED", "/etc/relay/seed.json"),
        ]))
        .unwrap();
        assert_eq!(
            config.directory_seed.as_deref(),
            Some(std::path::Path::new("/etc/relay/seed.json"))
        );
        assert_eq!(config.listen_addr(), "127.0.0.1:9001");
        assert_eq!(config.broadcast_capacity, 32);
    }

    #[test]
    fn rejects_bad_port() {
        let err = RelayConfig::from_lookup(lookup_from(&[("RELAY_PORT", "eighty")])).unwrap_err();
        match err {
            ConfigError::InvalidValue { key, .. } => assert_eq!(key, "RELAY_PORT"),
        }
    }
}
