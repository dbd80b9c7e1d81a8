//! Hostname and port validation, host classification, and the IDN and IPv6
//! helpers used by normalization.

use std::net::Ipv6Addr;

use crate::config::Config;
use crate::constants::{HOSTNAME_PUNCTUATION, MAX_PORT, MIN_PORT, PUNYCODE_PREFIX};
use crate::error::{HostError, PortError};

/// Checks that a hostname is acceptable for the given scheme.
///
/// An empty hostname is rejected for schemes listed in
/// [`Config::host_protocols`]. A hostname with characters outside
/// `[a-zA-Z0-9.-:_]` is accepted only if its punycode form has none.
///
/// # Errors
///
/// Returns [`HostError::EmptyHostname`] or [`HostError::InvalidCharacters`].
///
/// # Examples
///
/// ```
/// use mutable_uri::{ensure_valid_hostname, Config};
///
/// let config = Config::default();
/// assert!(ensure_valid_hostname(Some("example.org"), Some("http"), &config).is_ok());
/// assert!(ensure_valid_hostname(Some("münchen.de"), Some("http"), &config).is_ok());
/// assert!(ensure_valid_hostname(Some("exa mple.org"), None, &config).is_err());
/// assert!(ensure_valid_hostname(None, Some("https"), &config).is_err());
/// ```
pub fn ensure_valid_hostname(
    hostname: Option<&str>,
    protocol: Option<&str>,
    config: &Config,
) -> Result<(), HostError> {
    let hostname = hostname.filter(|h| !h.is_empty());

    let Some(hostname) = hostname else {
        return match protocol.filter(|p| config.requires_host(p)) {
            Some(protocol) => Err(HostError::EmptyHostname {
                protocol: protocol.to_string(),
            }),
            None => Ok(()),
        };
    };

    if has_valid_hostname_chars(hostname) {
        return Ok(());
    }

    match to_ascii(hostname) {
        Some(ascii) if has_valid_hostname_chars(&ascii) => Ok(()),
        _ => Err(HostError::InvalidCharacters {
            hostname: hostname.to_string(),
        }),
    }
}

/// Checks that a port is an integer in `1..=65535`. An empty port is valid.
///
/// # Errors
///
/// Returns [`PortError`] for anything else.
///
/// # Examples
///
/// ```
/// use mutable_uri::ensure_valid_port;
///
/// assert!(ensure_valid_port("8080").is_ok());
/// assert!(ensure_valid_port("").is_ok());
/// assert!(ensure_valid_port("0").is_err());
/// assert!(ensure_valid_port("65536").is_err());
/// assert!(ensure_valid_port("http").is_err());
/// ```
pub fn ensure_valid_port(port: &str) -> Result<(), PortError> {
    if port.is_empty() {
        return Ok(());
    }

    let valid = port.bytes().all(|b| b.is_ascii_digit())
        && port
            .parse::<u32>()
            .is_ok_and(|p| (MIN_PORT..=MAX_PORT).contains(&p));

    if valid {
        Ok(())
    } else {
        Err(PortError {
            value: port.to_string(),
        })
    }
}

fn has_valid_hostname_chars(hostname: &str) -> bool {
    hostname
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || HOSTNAME_PUNCTUATION.contains(&c))
}

/// Returns true for dotted-quad notation (`\d{1,3}(\.\d{1,3}){3}`).
///
/// Octet ranges are not checked.
#[must_use]
pub fn is_ipv4(host: &str) -> bool {
    let mut count = 0;
    for octet in host.split('.') {
        count += 1;
        if octet.is_empty() || octet.len() > 3 || !octet.bytes().all(|b| b.is_ascii_digit()) {
            return false;
        }
    }
    count == 4
}

/// Returns true for an IPv6 address, optionally followed by a `%zone`.
#[must_use]
pub fn is_ipv6(host: &str) -> bool {
    let host = host.trim();
    let (addr, zone) = split_zone(host);
    zone.is_none_or(|z| !z.is_empty()) && addr.parse::<Ipv6Addr>().is_ok()
}

/// Returns true if the host is an IPv4 or IPv6 literal.
#[must_use]
pub fn is_ip(host: &str) -> bool {
    is_ipv4(host) || is_ipv6(host)
}

/// Returns true if a host name contains characters outside `[a-zA-Z0-9._-]`.
#[must_use]
pub fn is_idn(host: &str) -> bool {
    host.chars()
        .any(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')))
}

/// Returns true if a host name contains a punycode label.
#[must_use]
pub fn is_punycode(host: &str) -> bool {
    host.to_ascii_lowercase().contains(PUNYCODE_PREFIX)
}

/// Converts an internationalized host name to its ASCII (punycode) form.
///
/// Returns `None` if the name cannot be converted.
///
/// ```
/// use mutable_uri::host::to_ascii;
///
/// assert_eq!(to_ascii("bücher.de").as_deref(), Some("xn--bcher-kva.de"));
/// ```
#[must_use]
pub fn to_ascii(host: &str) -> Option<String> {
    idna::domain_to_ascii(host).ok()
}

/// Converts a punycode host name to Unicode, returning it unchanged on failure.
///
/// ```
/// use mutable_uri::host::to_unicode;
///
/// assert_eq!(to_unicode("xn--bcher-kva.de"), "bücher.de");
/// ```
#[must_use]
pub fn to_unicode(host: &str) -> String {
    match idna::domain_to_unicode(host) {
        (unicode, Ok(())) => unicode,
        (_, Err(_)) => host.to_string(),
    }
}

/// Returns the RFC 5952 canonical form of an IPv6 address.
///
/// A `%zone` suffix is kept. Input that is not an IPv6 address is returned unchanged.
///
/// ```
/// use mutable_uri::host::best;
///
/// assert_eq!(best("2001:0DB8:0000:0000:0000:0000:0000:0001"), "2001:db8::1");
/// assert_eq!(best("fe80:0:0:0:0:0:0:1%eth0"), "fe80::1%eth0");
/// ```
#[must_use]
pub fn best(address: &str) -> String {
    let (addr, zone) = split_zone(address.trim());
    match addr.parse::<Ipv6Addr>() {
        Ok(ip) => match zone {
            Some(zone) => format!("{ip}%{zone}"),
            None => ip.to_string(),
        },
        Err(_) => address.to_string(),
    }
}

fn split_zone(host: &str) -> (&str, Option<&str>) {
    match host.split_once('%') {
        Some((addr, zone)) => (addr, Some(zone)),
        None => (host, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ipv4_detection_is_syntactic() {
        assert!(is_ipv4("127.0.0.1"));
        assert!(is_ipv4("333.444.555.666"));
        assert!(!is_ipv4("1.2.3"));
        assert!(!is_ipv4("1.2.3.4.5"));
        assert!(!is_ipv4("example.org"));
    }

    #[test]
    fn ipv6_detection() {
        assert!(is_ipv6("::1"));
        assert!(is_ipv6("fe80::1%en0"));
        assert!(is_ipv6("::ffff:127.0.0.1"));
        assert!(!is_ipv6("fe80::1%"));
        assert!(!is_ipv6("example.org"));
        assert!(!is_ipv6("127.0.0.1"));
    }

    #[test]
    fn idn_and_punycode_detection() {
        assert!(is_idn("bücher.de"));
        assert!(!is_idn("example.org"));
        assert!(is_punycode("xn--bcher-kva.de"));
        assert!(!is_punycode("bücher.de"));
    }

    #[test]
    fn hostname_requires_host_for_http() {
        let config = Config::default();
        assert_eq!(
            ensure_valid_hostname(Some(""), Some("http"), &config),
            Err(HostError::EmptyHostname {
                protocol: "http".to_string()
            })
        );
        assert!(ensure_valid_hostname(None, Some("mailto"), &config).is_ok());
        assert!(ensure_valid_hostname(None, None, &config).is_ok());
    }

    #[test]
    fn hostname_characters() {
        let config = Config::default();
        assert!(ensure_valid_hostname(Some("a_b-c.d:e"), None, &config).is_ok());
        assert!(ensure_valid_hostname(Some("exa$mple"), None, &config).is_err());
    }

    #[test]
    fn port_range() {
        assert!(ensure_valid_port("1").is_ok());
        assert!(ensure_valid_port("65535").is_ok());
        assert!(ensure_valid_port("080").is_ok());
        assert!(ensure_valid_port("-1").is_err());
        assert!(ensure_valid_port("99999999999").is_err());
    }

    #[test]
    fn best_leaves_garbage_alone() {
        assert_eq!(best("not-an-address"), "not-an-address");
        assert_eq!(best("::FFFF:1.2.3.4"), "::ffff:1.2.3.4");
    }
}
