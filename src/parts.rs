//! Structured representation of a URI.

use crate::config::Config;

/// The components of a URI, plus the per-instance behavior flags.
///
/// Authority fields are held decoded, `path` is held percent-encoded, and
/// `query`/`fragment` are held raw (without their `?`/`#` prefix).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Parts {
    /// Scheme; `None` for scheme-relative and relative references
    pub protocol: Option<String>,
    /// Decoded user name
    pub username: Option<String>,
    /// Decoded password
    pub password: Option<String>,
    /// Hostname, without IPv6 brackets
    pub hostname: Option<String>,
    /// Decimal port
    pub port: Option<String>,
    /// Percent-encoded path, possibly empty
    pub path: String,
    /// Raw query string
    pub query: Option<String>,
    /// Raw fragment
    pub fragment: Option<String>,
    /// True for `scheme:path` references without an authority
    pub urn: bool,
    /// See [`Config::prevent_invalid_hostname`]
    pub prevent_invalid_hostname: bool,
    /// See [`Config::duplicate_query_parameters`]
    pub duplicate_query_parameters: bool,
    /// See [`Config::escape_query_space`]
    pub escape_query_space: bool,
}

impl Parts {
    /// Creates empty parts with flags taken from `config`.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            prevent_invalid_hostname: config.prevent_invalid_hostname,
            duplicate_query_parameters: config.duplicate_query_parameters,
            escape_query_space: config.escape_query_space,
            ..Self::default()
        }
    }

    /// Returns true when the URI has neither authority nor URN form.
    #[must_use]
    pub fn is_relative(&self) -> bool {
        !self.urn && self.hostname.is_none()
    }
}
