//! [`Parts`] to string serialization.
//!
//! Authority fields are held decoded and are encoded here; path, query and
//! fragment are written as stored.

use crate::encoding::encode_component;
use crate::host::is_ipv6;
use crate::parts::Parts;

/// Serializes `parts` into a URI string.
///
/// # Examples
///
/// ```
/// use mutable_uri::{builder, Config, Parts};
///
/// let mut parts = Parts::new(&Config::default());
/// parts.protocol = Some("http".to_string());
/// parts.hostname = Some("example.org".to_string());
/// parts.path = "a/b".to_string();
/// parts.query = Some("q=1".to_string());
/// assert_eq!(builder::build(&parts), "http://example.org/a/b?q=1");
/// ```
#[must_use]
pub fn build(parts: &Parts) -> String {
    let mut out = String::new();

    if let Some(protocol) = &parts.protocol {
        out.push_str(protocol);
        out.push(':');
    }

    if !parts.urn && (parts.protocol.is_some() || parts.hostname.is_some()) {
        out.push_str("//");
    }

    out.push_str(&build_authority(parts));

    if !parts.path.starts_with('/') && parts.hostname.is_some() {
        out.push('/');
    }
    out.push_str(&parts.path);

    if let Some(query) = parts.query.as_deref().filter(|q| !q.is_empty()) {
        out.push('?');
        out.push_str(query);
    }

    if let Some(fragment) = parts.fragment.as_deref().filter(|f| !f.is_empty()) {
        out.push('#');
        out.push_str(fragment);
    }

    out
}

/// Serializes `user:pass@host:port`.
#[must_use]
pub fn build_authority(parts: &Parts) -> String {
    let mut out = build_userinfo(parts);
    out.push_str(&build_host(parts));
    out
}

/// Serializes `host:port`, bracketing IPv6 literals. Empty without a hostname.
///
/// ```
/// use mutable_uri::{builder, Config, Parts};
///
/// let mut parts = Parts::new(&Config::default());
/// parts.hostname = Some("::1".to_string());
/// parts.port = Some("8080".to_string());
/// assert_eq!(builder::build_host(&parts), "[::1]:8080");
/// ```
#[must_use]
pub fn build_host(parts: &Parts) -> String {
    let Some(hostname) = parts.hostname.as_deref().filter(|h| !h.is_empty()) else {
        return String::new();
    };

    let mut out = if is_ipv6(hostname) {
        format!("[{hostname}]")
    } else {
        hostname.to_string()
    };

    if let Some(port) = parts.port.as_deref().filter(|p| !p.is_empty()) {
        out.push(':');
        out.push_str(port);
    }
    out
}

/// Serializes `user:pass@` with both names component-encoded. Empty without either.
#[must_use]
pub fn build_userinfo(parts: &Parts) -> String {
    let mut out = String::new();

    if let Some(username) = parts.username.as_deref().filter(|u| !u.is_empty()) {
        out.push_str(&encode_component(username));
    }

    if let Some(password) = parts.password.as_deref().filter(|p| !p.is_empty()) {
        out.push(':');
        out.push_str(&encode_component(password));
    }

    if !out.is_empty() {
        out.push('@');
    }
    out
}
