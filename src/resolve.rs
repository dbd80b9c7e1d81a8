//! Reference resolution, relativization and equivalence.

use crate::error::{ParseError, ResolveError};
use crate::path::common_path;
use crate::uri::Uri;

impl Uri {
    /// Resolves this reference against `base`.
    ///
    /// A reference with a scheme is returned as is; one with an authority
    /// only inherits the scheme. Otherwise the authority comes from `base`
    /// and the path is merged with the base directory and normalized.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::Urn`] if this URI is a URN.
    ///
    /// # Examples
    ///
    /// ```
    /// use mutable_uri::Uri;
    ///
    /// let base = Uri::parse("http://example.org/a/b/c?q").unwrap();
    /// let resolve = |r: &str| Uri::parse(r).unwrap().absolute_to(&base).unwrap().to_string();
    ///
    /// assert_eq!(resolve("../d"), "http://example.org/a/d");
    /// assert_eq!(resolve("/x"), "http://example.org/x");
    /// assert_eq!(resolve("?y"), "http://example.org/a/b/c?y");
    /// assert_eq!(resolve(""), "http://example.org/a/b/c?q");
    /// assert_eq!(resolve("//other.org/z"), "http://other.org/z");
    /// ```
    pub fn absolute_to(&self, base: &Uri) -> Result<Uri, ResolveError> {
        if self.parts().urn {
            return Err(ResolveError::Urn);
        }

        let mut resolved = self.clone();
        if self.parts().protocol.is_some() {
            return Ok(resolved);
        }

        let base_parts = base.parts();
        let parts = resolved.parts_mut();
        parts.protocol.clone_from(&base_parts.protocol);
        if self.parts().hostname.is_some() {
            return Ok(resolved);
        }

        parts.username.clone_from(&base_parts.username);
        parts.password.clone_from(&base_parts.password);
        parts.hostname.clone_from(&base_parts.hostname);
        parts.port.clone_from(&base_parts.port);

        if parts.path.is_empty() {
            parts.path = base.path().to_string();
            if parts.query.is_none() {
                parts.query.clone_from(&base_parts.query);
            }
            return Ok(resolved);
        }

        if parts.path == ".." {
            parts.path.push('/');
        }
        if !parts.path.starts_with('/') {
            let mut directory = base.directory();
            if directory.is_empty() && base.path().starts_with('/') {
                directory.push('/');
            }
            if !directory.is_empty() {
                parts.path = format!("{directory}/{}", parts.path);
            }
            resolved.normalize_path();
        }
        Ok(resolved)
    }

    /// Computes the reference that resolves to this URI against `base`.
    ///
    /// Both URIs are normalized first. The result is the inverse of
    /// [`Uri::absolute_to`]: resolving it against `base` yields this URI
    /// (normalized). When the two differ in authority, the normalized URI is
    /// returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] if this URI is a URN or either path is relative.
    ///
    /// # Examples
    ///
    /// ```
    /// use mutable_uri::Uri;
    ///
    /// let base = Uri::parse("http://example.org/foo/bar/baz.html").unwrap();
    /// let relative = |u: &str| Uri::parse(u).unwrap().relative_to(&base).unwrap().to_string();
    ///
    /// assert_eq!(relative("http://example.org/foo/bar/world.html"), "world.html");
    /// assert_eq!(relative("http://example.org/foo/other/x.html"), "../other/x.html");
    /// assert_eq!(relative("http://example.org/foo/bar/baz.html?q"), "?q");
    /// assert_eq!(relative("https://example.org/foo/"), "https://example.org/foo/");
    /// ```
    pub fn relative_to(&self, base: &Uri) -> Result<Uri, ResolveError> {
        let mut relative = self.clone();
        relative.normalize();
        if relative.parts().urn {
            return Err(ResolveError::Urn);
        }

        let mut base = base.clone();
        base.normalize();

        let relative_path = relative.path().to_string();
        let base_path = base.path().to_string();
        if !relative_path.starts_with('/') {
            return Err(ResolveError::AlreadyRelative);
        }
        if !base_path.starts_with('/') {
            return Err(ResolveError::RelativeBase);
        }

        let base_parts = base.parts();
        if relative.parts().protocol == base_parts.protocol {
            relative.parts_mut().protocol = None;
        }

        let parts = relative.parts();
        let same_userinfo =
            parts.username == base_parts.username && parts.password == base_parts.password;
        let unshared = parts.protocol.is_some() || parts.username.is_some() || parts.password.is_some();
        let same_host = parts.hostname == base_parts.hostname && parts.port == base_parts.port;

        if !same_userinfo || unshared || !same_host {
            tracing::debug!(uri = %relative, base = %base, "authority differs, keeping absolute form");
            relative.build();
            return Ok(relative);
        }

        let parts = relative.parts_mut();
        parts.hostname = None;
        parts.port = None;

        if relative_path == base_path {
            parts.path = String::new();
            relative.build();
            return Ok(relative);
        }

        let common = common_path(&relative_path, &base_path);
        if common.is_empty() {
            relative.build();
            return Ok(relative);
        }

        let base_rest = &base_path[common.len()..];
        let base_dir = &base_rest[..base_rest.rfind('/').map_or(0, |slash| slash + 1)];
        let parents = "../".repeat(base_dir.matches('/').count());

        let path = format!("{parents}{}", &relative_path[common.len()..]);
        parts.path = if path.is_empty() { "./".to_string() } else { path };
        relative.build();
        Ok(relative)
    }

    /// Tests equivalence after normalization.
    ///
    /// Query parameters compare as a map: key order does not matter, but the
    /// order of repeated values for one key does.
    ///
    /// ```
    /// use mutable_uri::Uri;
    ///
    /// let uri = Uri::parse("HTTP://example.org:80/a/../b?x=1&y=2").unwrap();
    /// assert!(uri.equals(&Uri::parse("http://example.org/b?y=2&x=1").unwrap()));
    /// assert!(!uri.equals(&Uri::parse("http://example.org/b?x=2&y=1").unwrap()));
    /// ```
    #[must_use]
    pub fn equals(&self, other: &Uri) -> bool {
        let mut one = self.clone();
        let mut two = other.clone();
        one.normalize();
        two.normalize();
        if one.as_str() == two.as_str() {
            return true;
        }

        let one_query = one.query().unwrap_or_default().to_string();
        let two_query = two.query().unwrap_or_default().to_string();
        one.set_query("");
        two.set_query("");
        if one.as_str() != two.as_str() || one_query.len() != two_query.len() {
            return false;
        }

        let space_as_plus = self.parts().escape_query_space;
        let one_map = crate::query::QueryParams::parse(&one_query, space_as_plus);
        let two_map = crate::query::QueryParams::parse(&two_query, space_as_plus);
        one_map == two_map
    }

    /// Joins the path segments of several URI references into one normalized
    /// path-only URI.
    ///
    /// The result is absolute if the first input's path is empty or starts
    /// with `/`. If no input has a non-empty segment, the result is empty.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if an input fails to parse.
    ///
    /// ```
    /// use mutable_uri::Uri;
    ///
    /// assert_eq!(Uri::join_paths(&["/a/b", "c/", "../d"]).unwrap().as_str(), "/a/b/d");
    /// assert_eq!(Uri::join_paths(&["a", "b/"]).unwrap().as_str(), "a/b/");
    /// assert_eq!(Uri::join_paths(&["", ""]).unwrap().as_str(), "");
    /// ```
    pub fn join_paths(inputs: &[&str]) -> Result<Uri, ParseError> {
        let uris = inputs
            .iter()
            .map(|input| Uri::parse(input))
            .collect::<Result<Vec<_>, _>>()?;

        let segments: Vec<String> = uris.iter().flat_map(Uri::segments).collect();
        let mut joined = Uri::new();
        if segments.iter().all(String::is_empty) {
            return Ok(joined);
        }

        let segments: Vec<&str> = segments.iter().map(String::as_str).collect();
        joined.set_segments(&segments);

        let first = uris.first().map(Uri::path).unwrap_or_default();
        if first.is_empty() || first.starts_with('/') {
            let path = format!("/{}", joined.path());
            joined.set_path(&path);
        }
        joined.normalize();
        Ok(joined)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::Config;

    fn uri(s: &str) -> Uri {
        Uri::parse_with_config(s, Arc::new(Config::default())).unwrap()
    }

    fn resolve(reference: &str, base: &str) -> String {
        uri(reference).absolute_to(&uri(base)).unwrap().to_string()
    }

    #[test]
    fn rfc3986_normal_examples() {
        let base = "http://a/b/c/d;p?q";
        assert_eq!(resolve("g", base), "http://a/b/c/g");
        assert_eq!(resolve("./g", base), "http://a/b/c/g");
        assert_eq!(resolve("g/", base), "http://a/b/c/g/");
        assert_eq!(resolve("/g", base), "http://a/g");
        assert_eq!(resolve("//g", base), "http://g/");
        assert_eq!(resolve("?y", base), "http://a/b/c/d;p?y");
        assert_eq!(resolve("g?y", base), "http://a/b/c/g?y");
        assert_eq!(resolve("#s", base), "http://a/b/c/d;p?q#s");
        assert_eq!(resolve("..", base), "http://a/b/");
        assert_eq!(resolve("../g", base), "http://a/b/g");
        assert_eq!(resolve("../..", base), "http://a/");
        assert_eq!(resolve("../../g", base), "http://a/g");
    }

    #[test]
    fn parents_above_root_are_dropped() {
        assert_eq!(resolve("../../../g", "http://a/b/c/d;p?q"), "http://a/g");
    }

    #[test]
    fn scheme_wins() {
        assert_eq!(resolve("ftp://x/y", "http://a/b"), "ftp://x/y");
    }

    #[test]
    fn base_without_path() {
        assert_eq!(resolve("g", "http://a"), "http://a/g");
    }

    #[test]
    fn urn_cannot_be_resolved() {
        assert_eq!(
            uri("mailto:x@y").absolute_to(&uri("http://a/")),
            Err(ResolveError::Urn)
        );
    }

    #[test]
    fn relative_errors() {
        assert_eq!(
            uri("a/b").relative_to(&uri("http://a/")),
            Err(ResolveError::AlreadyRelative)
        );
        assert_eq!(
            uri("http://a/b").relative_to(&uri("c/d")),
            Err(ResolveError::RelativeBase)
        );
        assert_eq!(
            uri("urn:a:b").relative_to(&uri("http://a/")),
            Err(ResolveError::Urn)
        );
    }

    #[test]
    fn relative_inverts_resolution() {
        let base = uri("http://example.org/a/b/c/d.html");
        for target in [
            "http://example.org/a/b/c/e.html",
            "http://example.org/a/x/y",
            "http://example.org/a/b/c/",
            "http://example.org/z?q=1#f",
        ] {
            let target = uri(target);
            let relative = target.relative_to(&base).unwrap();
            let back = relative.absolute_to(&base).unwrap();
            assert_eq!(back.as_str(), target.as_str(), "via {relative}");
        }
    }

    #[test]
    fn relative_to_self_is_empty() {
        let u = uri("http://example.org/a/b");
        assert_eq!(u.relative_to(&u).unwrap().as_str(), "");
    }

    #[test]
    fn relative_with_other_host_keeps_authority() {
        let rel = uri("http://other.org/a").relative_to(&uri("http://example.org/a")).unwrap();
        assert_eq!(rel.as_str(), "//other.org/a");
    }

    #[test]
    fn relative_with_userinfo_is_absolute() {
        let rel = uri("http://u@h/a").relative_to(&uri("http://u@h/b")).unwrap();
        assert_eq!(rel.as_str(), "//u@h/a");
    }

    #[test]
    fn equality_ignores_key_order_only() {
        assert!(uri("http://h/?a=1&b=2").equals(&uri("http://h/?b=2&a=1")));
        assert!(!uri("http://h/?a=1&a=2").equals(&uri("http://h/?a=2&a=1")));
        assert!(!uri("http://h/?a=1").equals(&uri("http://h/?a=12")));
        assert!(!uri("http://h/x?a=1").equals(&uri("http://h/y?a=1")));
    }

    #[test]
    fn equality_normalizes() {
        assert!(uri("HTTP://H:80/%7e/./a").equals(&uri("http://h/~/a")));
    }

    #[test]
    fn join_paths_edges() {
        assert_eq!(Uri::join_paths(&["/a/", "/b/"]).unwrap().as_str(), "/a/b/");
        assert_eq!(Uri::join_paths(&["", "x"]).unwrap().as_str(), "/x");
        assert_eq!(Uri::join_paths(&[]).unwrap().as_str(), "");
    }
}
