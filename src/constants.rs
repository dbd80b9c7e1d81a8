//! Constants for URI parsing, validation and normalization.

/// Lowest valid port number.
pub const MIN_PORT: u32 = 1;

/// Highest valid port number.
pub const MAX_PORT: u32 = 65535;

/// Default ports per scheme, dropped by [`Uri::normalize_port`](crate::Uri::normalize_port).
pub const DEFAULT_PORTS: &[(&str, u16)] = &[
    ("http", 80),
    ("https", 443),
    ("ftp", 21),
    ("gopher", 70),
    ("ws", 80),
    ("wss", 443),
];

/// Schemes that always require a hostname.
pub const HOST_PROTOCOLS: &[&str] = &["http", "https"];

/// Characters accepted in a hostname besides ASCII letters and digits.
///
/// RFC 3986 allows more (sub-delims, percent-encoding), but none of them
/// are part of DNS.
pub const HOSTNAME_PUNCTUATION: &[char] = &['.', '-', ':', '_'];

/// Prefix marking a punycode-encoded label.
pub const PUNYCODE_PREFIX: &str = "xn--";
