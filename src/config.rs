//! Behavior switches and lookup tables shared by parser, builder and normalizer.

use std::collections::BTreeMap;
use std::sync::{Arc, LazyLock, PoisonError, RwLock};

use crate::constants::{DEFAULT_PORTS, HOST_PROTOCOLS};

static GLOBAL: LazyLock<RwLock<Arc<Config>>> =
    LazyLock::new(|| RwLock::new(Arc::new(Config::default())));

/// Configuration a [`Uri`](crate::Uri) is constructed with.
///
/// The three flags are copied into each URI's [`Parts`](crate::Parts) at
/// construction and can then be changed per instance. The tables are read
/// whenever a URI normalizes or validates.
///
/// A process-wide default is available through [`Config::global`]. Replacing
/// it with [`Config::set_global`] only affects URIs constructed afterwards.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use mutable_uri::{Config, Uri};
///
/// let strict = Arc::new(Config {
///     prevent_invalid_hostname: true,
///     ..Config::default()
/// });
/// assert!(Uri::parse_with_config("http://exa mple.com/", strict).is_err());
/// assert!(Uri::parse("http://exa mple.com/").is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Reject hostnames outside `[a-zA-Z0-9.-:_]` (after punycode) and invalid ports while parsing.
    pub prevent_invalid_hostname: bool,
    /// Keep identical `name=value` pairs when serializing a query.
    pub duplicate_query_parameters: bool,
    /// Encode spaces in query strings as `+` and decode `+` as space.
    pub escape_query_space: bool,
    /// Default port per scheme.
    pub default_ports: BTreeMap<String, u16>,
    /// Schemes that may not have an empty hostname.
    pub host_protocols: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prevent_invalid_hostname: false,
            duplicate_query_parameters: false,
            escape_query_space: true,
            default_ports: DEFAULT_PORTS
                .iter()
                .map(|(scheme, port)| ((*scheme).to_string(), *port))
                .collect(),
            host_protocols: HOST_PROTOCOLS.iter().map(|s| (*s).to_string()).collect(),
        }
    }
}

impl Config {
    /// Returns a snapshot of the process-wide default configuration.
    #[must_use]
    pub fn global() -> Arc<Self> {
        GLOBAL
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replaces the process-wide default configuration.
    pub fn set_global(config: Self) {
        *GLOBAL.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(config);
    }

    /// Returns the default port for a scheme, if one is registered.
    #[must_use]
    pub fn default_port(&self, scheme: &str) -> Option<u16> {
        self.default_ports.get(scheme).copied()
    }

    /// Returns true if the scheme requires a hostname.
    #[must_use]
    pub fn requires_host(&self, scheme: &str) -> bool {
        self.host_protocols.iter().any(|p| p == scheme)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert!(!config.prevent_invalid_hostname);
        assert!(!config.duplicate_query_parameters);
        assert!(config.escape_query_space);
        assert_eq!(config.default_port("https"), Some(443));
        assert_eq!(config.default_port("gopher"), Some(70));
        assert_eq!(config.default_port("mailto"), None);
    }

    #[test]
    fn requires_host() {
        let config = Config::default();
        assert!(config.requires_host("http"));
        assert!(!config.requires_host("ftp"));
    }
}
