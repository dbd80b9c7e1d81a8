//! String to [`Parts`] parsing.
//!
//! The parser is permissive: it never rejects input on structural grounds.
//! A token before the first `:` that is not a valid scheme is left in the
//! path. Hostnames and ports are only validated when
//! [`Parts::prevent_invalid_hostname`] is set.

use crate::config::Config;
use crate::encoding::decode_component;
use crate::error::HostError;
use crate::host::{ensure_valid_hostname, ensure_valid_port};
use crate::parts::Parts;

/// Returns true if `scheme` matches `^[a-z][a-z0-9.+-]*$`, ignoring case.
#[must_use]
pub fn is_valid_scheme(scheme: &str) -> bool {
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '+' | '-'))
}

/// Parses `input` into `parts`.
///
/// Fields not present in `input` are left untouched, so callers pass freshly
/// created parts. The fragment is split off at the first `#`, then the query
/// at the first `?`.
///
/// # Errors
///
/// Returns [`HostError`] only when `parts.prevent_invalid_hostname` is set and
/// the hostname or port is invalid.
///
/// # Examples
///
/// ```
/// use mutable_uri::{parser, Config, Parts};
///
/// let config = Config::default();
/// let mut parts = Parts::new(&config);
/// parser::parse("http://user@example.org:8080/a/b?q=1#top", &mut parts, &config).unwrap();
/// assert_eq!(parts.protocol.as_deref(), Some("http"));
/// assert_eq!(parts.username.as_deref(), Some("user"));
/// assert_eq!(parts.hostname.as_deref(), Some("example.org"));
/// assert_eq!(parts.port.as_deref(), Some("8080"));
/// assert_eq!(parts.path, "/a/b");
/// assert_eq!(parts.query.as_deref(), Some("q=1"));
/// assert_eq!(parts.fragment.as_deref(), Some("top"));
/// ```
pub fn parse(input: &str, parts: &mut Parts, config: &Config) -> Result<(), HostError> {
    let mut rest = input;

    if let Some((before, fragment)) = rest.split_once('#') {
        parts.fragment = non_empty(fragment);
        rest = before;
    }

    if let Some((before, query)) = rest.split_once('?') {
        parts.query = non_empty(query);
        rest = before;
    }

    if let Some(authority) = rest.strip_prefix("//") {
        parts.protocol = None;
        parts.path = parse_authority(authority, parts, config)?;
        return Ok(());
    }

    let Some((scheme, after)) = rest.split_once(':') else {
        parts.path = rest.to_string();
        return Ok(());
    };

    if !scheme.is_empty() && !is_valid_scheme(scheme) {
        tracing::debug!(input = %input, scheme = %scheme, "invalid scheme token kept as path");
        parts.protocol = None;
        parts.path = rest.to_string();
        return Ok(());
    }

    parts.protocol = non_empty(scheme);
    match after.strip_prefix("//") {
        Some(authority) => parts.path = parse_authority(authority, parts, config)?,
        None => {
            parts.urn = true;
            parts.path = after.to_string();
        }
    }
    Ok(())
}

/// Parses `user:pass@host:port` from the start of `input` and returns the rest.
///
/// # Errors
///
/// See [`parse_host`].
pub fn parse_authority(input: &str, parts: &mut Parts, config: &Config) -> Result<String, HostError> {
    let rest = parse_userinfo(input, parts);
    parse_host(rest, parts, config)
}

/// Parses `user:pass@` from the start of `input` and returns the rest.
///
/// The `@` must come before the first `/`; the last `@` before it wins. Both
/// names are percent-decoded. Without an `@`, username and password are cleared.
///
/// ```
/// use mutable_uri::{parser, Config, Parts};
///
/// let mut parts = Parts::new(&Config::default());
/// let rest = parser::parse_userinfo("a%20b:c:d@host/e@f", &mut parts);
/// assert_eq!(rest, "host/e@f");
/// assert_eq!(parts.username.as_deref(), Some("a b"));
/// assert_eq!(parts.password.as_deref(), Some("c:d"));
/// ```
pub fn parse_userinfo<'a>(input: &'a str, parts: &mut Parts) -> &'a str {
    let authority = match input.find('/') {
        Some(slash) => &input[..slash],
        None => input,
    };

    let Some(at) = authority.rfind('@') else {
        parts.username = None;
        parts.password = None;
        return input;
    };

    let userinfo = &input[..at];
    let (username, password) = match userinfo.split_once(':') {
        Some((username, password)) => (username, Some(password)),
        None => (userinfo, None),
    };

    parts.username = non_empty(username).map(|u| decode_component(&u));
    parts.password = password
        .filter(|p| p.split(':').next().is_some_and(|first| !first.is_empty()))
        .map(decode_component);

    &input[at + 1..]
}

/// Parses `host:port` from the start of `input` and returns the rest, which is
/// at least `/`.
///
/// Backslashes are read as slashes. A bracketed host is an IPv6 literal and may
/// be followed by `:port`. An unbracketed host with two colons before the first
/// slash is taken whole, with no port.
///
/// # Errors
///
/// When `parts.prevent_invalid_hostname` is set, returns [`HostError`] for a
/// hostname rejected by [`ensure_valid_hostname`] or a port rejected by
/// [`ensure_valid_port`].
///
/// ```
/// use mutable_uri::{parser, Config, Parts};
///
/// let config = Config::default();
/// let mut parts = Parts::new(&config);
/// let rest = parser::parse_host("[2001:db8::1]:8080/x", &mut parts, &config).unwrap();
/// assert_eq!(rest, "/x");
/// assert_eq!(parts.hostname.as_deref(), Some("2001:db8::1"));
/// assert_eq!(parts.port.as_deref(), Some("8080"));
/// ```
pub fn parse_host(input: &str, parts: &mut Parts, config: &Config) -> Result<String, HostError> {
    let input = input.replace('\\', "/");
    let end = input.find('/').unwrap_or(input.len());
    let authority = &input[..end];

    if authority.starts_with('[') {
        let close = authority.find(']');
        parts.hostname = non_empty(&authority[1..close.unwrap_or(end)]);
        parts.port = close
            .and_then(|close| input.get(close + 2..end))
            .and_then(non_empty);
    } else {
        let mut colons = authority.match_indices(':');
        match (colons.next(), colons.next()) {
            (Some(_), Some(_)) => {
                parts.hostname = non_empty(authority);
                parts.port = None;
            }
            _ => {
                let mut pieces = authority.split(':');
                parts.hostname = pieces.next().and_then(non_empty);
                parts.port = pieces.next().and_then(non_empty);
            }
        }
    }

    if parts.prevent_invalid_hostname {
        ensure_valid_hostname(parts.hostname.as_deref(), parts.protocol.as_deref(), config)?;
        if let Some(port) = &parts.port {
            ensure_valid_port(port)?;
        }
    }

    let rest = &input[end..];
    Ok(if rest.is_empty() { "/".to_string() } else { rest.to_string() })
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}
