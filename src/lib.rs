//! Mutable RFC 3986 URI values.
//!
//! A [`Uri`] is parsed leniently into its components, which can then be read
//! and rewritten one at a time: scheme, userinfo, host, port, path, query and
//! fragment, plus derived pieces such as the domain, TLD, directory, filename,
//! suffix and individual path segments. The string form is rebuilt lazily.
//!
//! # Quick Start
//!
//! ```rust
//! use mutable_uri::Uri;
//!
//! let mut uri = Uri::parse("http://www.example.co.uk/docs/guide.html?lang=en").unwrap();
//!
//! assert_eq!(uri.domain(), "example.co.uk");
//! assert_eq!(uri.tld(), "co.uk");
//! assert_eq!(uri.filename(), "guide.html");
//!
//! uri.set_subdomain("api").unwrap();
//! uri.set_suffix("json");
//! uri.add_query_param("page", "2");
//! assert_eq!(uri.as_str(), "http://api.example.co.uk/docs/guide.json?lang=en&page=2");
//! ```
//!
//! # Normalization and resolution
//!
//! ```rust
//! use mutable_uri::Uri;
//!
//! let base = Uri::parse("http://example.org/a/b/c").unwrap();
//! let resolved = Uri::parse("../d?x#y").unwrap().absolute_to(&base).unwrap();
//! assert_eq!(resolved.as_str(), "http://example.org/a/d?x#y");
//!
//! let back = resolved.relative_to(&base).unwrap();
//! assert_eq!(back.as_str(), "../d?x#y");
//!
//! let mut messy = Uri::parse("HTTP://Example.ORG:80/a/./b/../c").unwrap();
//! messy.normalize();
//! assert_eq!(messy.as_str(), "http://example.org/a/c");
//! ```
//!
//! # Strict hosts
//!
//! Parsing never fails on structure. Hostname and port validation only
//! happens when [`Config::prevent_invalid_hostname`] is set, either
//! process-wide with [`Config::set_global`] or per instance.
//!
//! ```rust
//! use std::sync::Arc;
//! use mutable_uri::{Config, Uri};
//!
//! let strict = Arc::new(Config { prevent_invalid_hostname: true, ..Config::default() });
//! assert!(Uri::parse_with_config("http://exa mple.org/", strict).is_err());
//! assert!(Uri::parse("http://exa mple.org/").is_ok());
//! ```

#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod builder;
mod config;
mod constants;
pub mod encoding;
mod error;
mod find;
pub mod host;
#[cfg(kani)]
mod kani_impls;
pub mod parser;
mod parts;
pub mod path;
pub mod prelude;
mod query;
mod resolve;
pub mod sld;
mod uri;

pub use config::Config;
pub use constants::{DEFAULT_PORTS, HOST_PROTOCOLS, MAX_PORT, MIN_PORT};
pub use error::{
    HostError, ParseError, ParseErrorKind, PortError, ResolveError, SchemeError, UnknownKindError,
};
pub use find::{FindOptions, within_string};
pub use host::{ensure_valid_hostname, ensure_valid_port};
pub use parts::Parts;
pub use path::common_path;
pub use query::{QueryParams, QueryTest, QueryValue, ValueMatch};
pub use uri::{Uri, UriKind};
