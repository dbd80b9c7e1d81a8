//! Convenient re-exports for glob imports.
//!
//! ```rust
//! use mutable_uri::prelude::*;
//!
//! let mut uri = Uri::parse("http://example.org/?a=1").unwrap();
//! uri.remove_query_value("a", &ValueMatch::Exact("1".into()));
//! assert!(uri.query_map().is_empty());
//! ```

pub use crate::{
    // Core types
    Config, Parts, QueryParams, QueryTest, QueryValue, Uri, UriKind, ValueMatch,
    // Text search
    FindOptions, within_string,
    // Errors
    HostError, ParseError, ParseErrorKind, PortError, ResolveError, SchemeError,
    UnknownKindError,
};
