//! Error types for URI parsing, mutation and resolution.

use std::fmt;

/// Errors that can occur when constructing a URI from a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// The input that failed to parse
    pub input: String,
    /// The specific error that occurred
    pub kind: ParseErrorKind,
}

/// Specific construction error types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// Hostname or port rejected while `prevent_invalid_hostname` is set
    InvalidHost(HostError),
    /// Resolution against the supplied base failed
    Resolve(ResolveError),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse URI '{}': ", self.input)?;
        match &self.kind {
            ParseErrorKind::InvalidHost(e) => write!(f, "{e}"),
            ParseErrorKind::Resolve(e) => write!(f, "cannot resolve against base: {e}"),
        }
    }
}

impl std::error::Error for ParseError {}

/// Error for an invalid scheme token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemeError {
    /// The rejected scheme
    pub scheme: String,
}

impl fmt::Display for SchemeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "protocol '{}' contains characters other than [A-Z0-9.+-] or doesn't start with [A-Z]",
            self.scheme
        )
    }
}

impl std::error::Error for SchemeError {}

/// Error for a port outside `1..=65535` or not an integer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortError {
    /// The rejected port
    pub value: String,
}

impl fmt::Display for PortError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "port '{}' is not a valid port", self.value)
    }
}

impl std::error::Error for PortError {}

/// Errors for hostname and host-fraction mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    /// Hostname is empty although the scheme requires one
    EmptyHostname {
        /// The scheme requiring a hostname
        protocol: String,
    },
    /// Hostname contains characters other than `[a-zA-Z0-9.-:_]`, even after punycode
    InvalidCharacters {
        /// The rejected hostname
        hostname: String,
    },
    /// Host input contained more than a host (e.g. a path)
    TrailingInput {
        /// The rejected input
        input: String,
    },
    /// Domain or subdomain contains a colon
    ColonInDomain {
        /// The rejected domain
        domain: String,
    },
    /// Domain set to an empty string
    EmptyDomain,
    /// TLD set to an empty string
    EmptyTld,
    /// TLD contains characters other than `[a-zA-Z0-9-]` and is not a known compound suffix
    InvalidTld {
        /// The rejected TLD
        tld: String,
    },
    /// The URI has no domain name host to modify
    NotADomain,
    /// Port is invalid
    InvalidPort(PortError),
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyHostname { protocol } => {
                write!(f, "hostname cannot be empty if protocol is '{protocol}'")
            }
            Self::InvalidCharacters { hostname } => {
                write!(
                    f,
                    "hostname '{hostname}' contains characters other than [A-Z0-9.-:_]"
                )
            }
            Self::TrailingInput { input } => {
                write!(f, "host '{input}' contains characters other than [A-Z0-9.-]")
            }
            Self::ColonInDomain { domain } => {
                write!(f, "domain '{domain}' cannot contain colons")
            }
            Self::EmptyDomain => write!(f, "cannot set domain empty"),
            Self::EmptyTld => write!(f, "cannot set TLD empty"),
            Self::InvalidTld { tld } => {
                write!(f, "TLD '{tld}' contains characters other than [A-Z0-9]")
            }
            Self::NotADomain => write!(f, "host is not a domain name"),
            Self::InvalidPort(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for HostError {}

impl From<PortError> for HostError {
    fn from(e: PortError) -> Self {
        Self::InvalidPort(e)
    }
}

/// Errors for URI resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveError {
    /// URNs have no generally defined hierarchical components
    Urn,
    /// `relative_to` called on a URI whose path is already relative
    AlreadyRelative,
    /// `relative_to` called with a base whose path is relative
    RelativeBase,
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Urn => write!(
                f,
                "URNs do not have any generally defined hierarchical components"
            ),
            Self::AlreadyRelative => write!(f, "URI is already relative"),
            Self::RelativeBase => write!(
                f,
                "cannot calculate a URI relative to another relative URI"
            ),
        }
    }
}

impl std::error::Error for ResolveError {}

/// Error for a [`UriKind`](crate::UriKind) name that is not recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownKindError {
    /// The rejected name
    pub name: String,
}

impl fmt::Display for UnknownKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown URI kind '{}'", self.name)
    }
}

impl std::error::Error for UnknownKindError {}
