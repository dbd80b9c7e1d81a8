//! Path algebra: dot-segment removal, common prefixes and segment lists.
//!
//! Everything here is a syntactic string rewrite (RFC 3986 §5.2.4); nothing
//! touches a filesystem.

use std::sync::LazyLock;

use regex::Regex;

static SINGLE_DOTS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(/(\./)+)|(/\.$)").expect("single dot regex must compile"));
static SLASH_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/{2,}").expect("slash run regex must compile"));
static LEADING_PARENTS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\.\./)+").expect("leading parents regex must compile"));
static PARENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/\.\.(/|$)").expect("parent segment regex must compile"));

/// Removes `.` and `..` segments and collapses repeated slashes.
///
/// `path` must already be in canonical percent-encoding. A relative path is
/// resolved as if it were rooted; if `keep_relative` is set the synthetic root
/// is removed again and any leading `../` that could not be resolved are put
/// back. A `..` at the root is dropped.
///
/// # Examples
///
/// ```
/// use mutable_uri::path::remove_dot_segments;
///
/// assert_eq!(remove_dot_segments("/a/b/../c", false), "/a/c");
/// assert_eq!(remove_dot_segments("/a/../../b", false), "/b");
/// assert_eq!(remove_dot_segments("../../x", true), "../../x");
/// assert_eq!(remove_dot_segments("a/./b//c/.", true), "a/b/c/");
/// ```
#[must_use]
pub fn remove_dot_segments(path: &str, keep_relative: bool) -> String {
    let was_relative = !path.starts_with('/');
    let mut path = if was_relative {
        format!("/{path}")
    } else {
        path.to_string()
    };

    if path.ends_with("/..") || path.ends_with("/.") {
        path.push('/');
    }

    path = SINGLE_DOTS.replace_all(&path, "/").into_owned();
    path = SLASH_RUNS.replace_all(&path, "/").into_owned();

    let leading_parents = if was_relative {
        LEADING_PARENTS
            .find(&path[1..])
            .map_or_else(String::new, |m| m.as_str().to_string())
    } else {
        String::new()
    };

    while let Some(parent) = PARENT.find(&path) {
        let at = parent.start();
        if at == 0 {
            path = path[3..].to_string();
            continue;
        }
        let cut = path[..at].rfind('/').unwrap_or(at);
        path = format!("{}{}", &path[..cut], &path[at + 3..]);
    }

    if was_relative && keep_relative {
        path = format!("{leading_parents}{}", path.get(1..).unwrap_or_default());
    }
    path
}

/// Returns the longest common directory prefix of two paths, ending in `/`.
///
/// ```
/// use mutable_uri::path::common_path;
///
/// assert_eq!(common_path("/foo/bar/baz.html", "/foo/bar/world.html"), "/foo/bar/");
/// assert_eq!(common_path("/foo/bar", "/foo/baz"), "/foo/");
/// assert_eq!(common_path("/foo", "/bar"), "/");
/// assert_eq!(common_path("foo", "bar"), "");
/// ```
#[must_use]
pub fn common_path(one: &str, two: &str) -> String {
    let (a, b) = (one.as_bytes(), two.as_bytes());
    let len = a.len().min(b.len());

    let pos = match (0..len).find(|&i| a[i] != b[i]) {
        Some(0) => 0,
        Some(i) => i - 1,
        None => len,
    };

    if pos < 1 {
        return if a.first() == Some(&b'/') && b.first() == Some(&b'/') {
            "/".to_string()
        } else {
            String::new()
        };
    }

    let end = if a.get(pos) == Some(&b'/') && b.get(pos) == Some(&b'/') {
        Some(pos)
    } else {
        a[..pos].iter().rposition(|&c| c == b'/')
    };

    end.map_or_else(String::new, |end| one[..=end].to_string())
}

/// Splits a path into segments. The empty segment before a leading `/` is dropped.
#[must_use]
pub fn split_segments(path: &str, separator: char) -> Vec<String> {
    let mut segments: Vec<String> = path.split(separator).map(str::to_string).collect();
    if path.starts_with('/') {
        segments.remove(0);
    }
    segments
}

/// Joins segments, restoring the leading `/` if `absolute`.
#[must_use]
pub fn join_segments(segments: &[String], separator: char, absolute: bool) -> String {
    let joined = segments.join(&separator.to_string());
    if absolute {
        format!("/{joined}")
    } else {
        joined
    }
}

/// Builds a segment list from caller input.
///
/// Empty entries are dropped unless they follow a non-empty one, and an empty
/// entry is replaced by the next non-empty one. Only a trailing empty segment
/// survives, marking a directory.
///
/// ```
/// use mutable_uri::path::collapse_segments;
///
/// assert_eq!(collapse_segments(&["", "a", "", "", "b", ""]), ["a", "b", ""]);
/// assert_eq!(collapse_segments(&["/a/", "b/"]), ["a", "b"]);
/// ```
#[must_use]
pub fn collapse_segments(values: &[&str]) -> Vec<String> {
    let mut segments: Vec<String> = Vec::new();
    for value in values {
        let last_empty = segments.last().is_none_or(String::is_empty);
        if value.is_empty() && last_empty {
            continue;
        }
        if segments.last().is_some_and(String::is_empty) {
            segments.pop();
        }
        segments.push(trim_slashes(value).to_string());
    }
    segments
}

/// Strips leading and trailing slashes.
#[must_use]
pub fn trim_slashes(text: &str) -> &str {
    text.trim_matches('/')
}
