//! Query string codec.
//!
//! A query string is read as `application/x-www-form-urlencoded` pairs into an
//! ordered multimap. Keys keep first-seen order; a repeated key collects its
//! values into a list. A pair without `=` has no value (`None`), which is
//! distinct from an empty value.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use regex::Regex;

use crate::encoding::{decode_query, encode_query};

/// The value(s) stored under one query key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryValue {
    /// A key seen once
    Single(Option<String>),
    /// A key seen more than once, values in order
    List(Vec<Option<String>>),
}

impl QueryValue {
    /// Returns all values as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[Option<String>] {
        match self {
            Self::Single(value) => std::slice::from_ref(value),
            Self::List(values) => values,
        }
    }

    /// Returns the first value, if it has one.
    #[must_use]
    pub fn first(&self) -> Option<&str> {
        self.as_slice().first().and_then(Option::as_deref)
    }

    /// Returns true for a [`QueryValue::List`].
    #[must_use]
    pub const fn is_list(&self) -> bool {
        matches!(self, Self::List(_))
    }

    fn into_vec(self) -> Vec<Option<String>> {
        match self {
            Self::Single(value) => vec![value],
            Self::List(values) => values,
        }
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        Self::Single(Some(value.to_string()))
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        Self::Single(Some(value))
    }
}

impl From<Option<&str>> for QueryValue {
    fn from(value: Option<&str>) -> Self {
        Self::Single(value.map(str::to_string))
    }
}

impl From<Vec<&str>> for QueryValue {
    fn from(values: Vec<&str>) -> Self {
        Self::List(values.into_iter().map(|v| Some(v.to_string())).collect())
    }
}

impl From<Vec<String>> for QueryValue {
    fn from(values: Vec<String>) -> Self {
        Self::List(values.into_iter().map(Some).collect())
    }
}

/// Which values [`QueryParams::remove_value`] removes.
#[derive(Debug, Clone)]
pub enum ValueMatch {
    /// Values equal to this string
    Exact(String),
    /// Values equal to any of these strings
    AnyOf(Vec<String>),
    /// Values matching this pattern
    Pattern(Regex),
}

/// What [`QueryParams::has`] checks about a key's value.
pub enum QueryTest<'a> {
    /// The key is present, with or without a value
    Exists,
    /// Whether the value is non-empty equals the flag
    NonEmpty(bool),
    /// The value equals this string
    Equals(&'a str),
    /// The values equal (or, within arrays, include) these strings
    List(&'a [&'a str]),
    /// The value matches this pattern
    Pattern(&'a Regex),
    /// Caller-supplied test over the key's value
    Predicate(&'a dyn Fn(Option<&QueryValue>) -> bool),
}

impl fmt::Debug for QueryTest<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exists => write!(f, "Exists"),
            Self::NonEmpty(b) => f.debug_tuple("NonEmpty").field(b).finish(),
            Self::Equals(s) => f.debug_tuple("Equals").field(s).finish(),
            Self::List(l) => f.debug_tuple("List").field(l).finish(),
            Self::Pattern(r) => f.debug_tuple("Pattern").field(&r.as_str()).finish(),
            Self::Predicate(_) => write!(f, "Predicate(..)"),
        }
    }
}

/// Decoded query parameters in first-seen key order.
///
/// Equality ignores key order but not the order of a key's values.
///
/// # Examples
///
/// ```
/// use mutable_uri::{QueryParams, QueryValue};
///
/// let mut params = QueryParams::parse("a=1&b&a=2&c=", true);
/// assert_eq!(params.get("a"), Some(&QueryValue::List(vec![Some("1".into()), Some("2".into())])));
/// assert_eq!(params.get("b"), Some(&QueryValue::Single(None)));
/// assert_eq!(params.get("c"), Some(&QueryValue::Single(Some(String::new()))));
///
/// params.add("a", "1");
/// assert_eq!(params.build(false, true), "a=1&a=2&b&c=");
/// assert_eq!(params.build(true, true), "a=1&a=2&a=1&b&c=");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QueryParams {
    params: IndexMap<String, QueryValue>,
}

impl QueryParams {
    /// Creates an empty parameter map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a query string, with or without its leading `?`.
    ///
    /// Runs of `&` collapse; each pair splits on its first `=`. Names and
    /// values are decoded best-effort, with `+` as space if `space_as_plus`.
    #[must_use]
    pub fn parse(input: &str, space_as_plus: bool) -> Self {
        let mut params: IndexMap<String, QueryValue> = IndexMap::new();

        let trimmed = input.trim_start_matches('?');
        for pair in trimmed.split('&').filter(|p| !p.is_empty()) {
            let (name, value) = match pair.split_once('=') {
                Some((name, value)) => (name, Some(decode_query(value, space_as_plus))),
                None => (pair, None),
            };
            let name = decode_query(name, space_as_plus);

            match params.get_mut(&name) {
                Some(existing) => {
                    let mut values =
                        std::mem::replace(existing, QueryValue::List(Vec::new())).into_vec();
                    values.push(value);
                    *existing = QueryValue::List(values);
                }
                None => {
                    params.insert(name, QueryValue::Single(value));
                }
            }
        }

        Self { params }
    }

    /// Serializes to a query string without the leading `?`.
    ///
    /// Empty names are skipped. Within a list, repeated values are written once
    /// unless `duplicates` is set. A `None` value is written without `=`.
    #[must_use]
    pub fn build(&self, duplicates: bool, space_as_plus: bool) -> String {
        let mut pairs = Vec::new();

        for (name, value) in self.params.iter().filter(|(name, _)| !name.is_empty()) {
            match value {
                QueryValue::Single(value) => {
                    pairs.push(build_pair(name, value.as_deref(), space_as_plus));
                }
                QueryValue::List(values) => {
                    let mut seen: Vec<&Option<String>> = Vec::new();
                    for value in values {
                        if !duplicates {
                            if seen.contains(&value) {
                                continue;
                            }
                            seen.push(value);
                        }
                        pairs.push(build_pair(name, value.as_deref(), space_as_plus));
                    }
                }
            }
        }

        pairs.join("&")
    }

    /// Returns the value(s) for a name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&QueryValue> {
        self.params.get(name)
    }

    /// Returns true if there are no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Returns the number of distinct names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Iterates over names and their value(s) in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &QueryValue)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Replaces the value(s) for a name, keeping its position if present.
    pub fn set(&mut self, name: &str, value: impl Into<QueryValue>) {
        self.params.insert(name.to_string(), value.into());
    }

    /// Appends value(s) to a name.
    ///
    /// A name that only had a valueless entry loses it: adding `1` to `a`
    /// (from `?a`) gives `a=1`, not `a&a=1`.
    pub fn add(&mut self, name: &str, value: impl Into<QueryValue>) {
        let value = value.into();
        match self.params.get_mut(name) {
            None => {
                self.params.insert(name.to_string(), value);
            }
            Some(existing) => {
                let mut values = match std::mem::replace(existing, QueryValue::List(Vec::new())) {
                    QueryValue::Single(None) => Vec::new(),
                    other => other.into_vec(),
                };
                values.extend(value.into_vec());
                *existing = QueryValue::List(values);
            }
        }
    }

    /// Removes a name with all its values.
    pub fn remove(&mut self, name: &str) -> Option<QueryValue> {
        self.params.shift_remove(name)
    }

    /// Removes several names.
    pub fn remove_names(&mut self, names: &[&str]) {
        for name in names {
            self.params.shift_remove(*name);
        }
    }

    /// Removes every name matching `pattern`.
    pub fn remove_matching(&mut self, pattern: &Regex) {
        self.params.retain(|name, _| !pattern.is_match(name));
    }

    /// Removes the values of `name` selected by `matcher`.
    ///
    /// A single value that matches removes the name. A list is filtered, and
    /// the name is removed once its list is empty.
    ///
    /// ```
    /// use mutable_uri::{QueryParams, ValueMatch};
    ///
    /// let mut params = QueryParams::parse("a=1&a=2&a=3&b=x", true);
    /// params.remove_value("a", &ValueMatch::AnyOf(vec!["1".into(), "3".into()]));
    /// params.remove_value("b", &ValueMatch::Exact("x".into()));
    /// assert_eq!(params.build(false, true), "a=2");
    /// ```
    pub fn remove_value(&mut self, name: &str, matcher: &ValueMatch) {
        let Some(value) = self.params.get_mut(name) else {
            return;
        };

        let drop = match value {
            QueryValue::Single(single) => match (matcher, single.as_deref()) {
                (_, None) => false,
                (ValueMatch::Exact(expected), Some(v)) => v == expected.as_str(),
                (ValueMatch::AnyOf(expected), Some(v)) => expected.len() == 1 && expected[0] == v,
                (ValueMatch::Pattern(pattern), Some(v)) => pattern.is_match(v),
            },
            QueryValue::List(values) => {
                values.retain(|v| !v.as_deref().is_some_and(|v| value_matches(matcher, v)));
                values.is_empty()
            }
        };

        if drop {
            self.params.shift_remove(name);
        }
    }

    /// Tests the value of `name`.
    ///
    /// `Equals` and `Pattern` only look into a list when `within_array` is set.
    /// `List` compares as a multiset, or checks inclusion when `within_array`
    /// is set.
    ///
    /// ```
    /// use mutable_uri::{QueryParams, QueryTest};
    ///
    /// let params = QueryParams::parse("a=1&a=2&b=&c", true);
    /// assert!(params.has("c", &QueryTest::Exists, false));
    /// assert!(params.has("b", &QueryTest::NonEmpty(false), false));
    /// assert!(params.has("a", &QueryTest::List(&["2", "1"]), false));
    /// assert!(!params.has("a", &QueryTest::Equals("1"), false));
    /// assert!(params.has("a", &QueryTest::Equals("1"), true));
    /// ```
    #[must_use]
    pub fn has(&self, name: &str, test: &QueryTest<'_>, within_array: bool) -> bool {
        let value = self.params.get(name);
        match test {
            QueryTest::Exists => value.is_some(),
            QueryTest::NonEmpty(expected) => {
                let non_empty = match value {
                    None => false,
                    Some(QueryValue::Single(v)) => v.as_deref().is_some_and(|v| !v.is_empty()),
                    Some(QueryValue::List(values)) => !values.is_empty(),
                };
                non_empty == *expected
            }
            QueryTest::Predicate(predicate) => predicate(value),
            QueryTest::List(expected) => match value {
                Some(QueryValue::List(values)) if within_array => expected
                    .iter()
                    .all(|e| values.iter().any(|v| v.as_deref() == Some(*e))),
                Some(QueryValue::List(values)) => same_multiset(values, expected),
                _ => false,
            },
            QueryTest::Equals(expected) => match value {
                Some(QueryValue::Single(v)) => v.as_deref() == Some(*expected),
                Some(QueryValue::List(values)) => {
                    within_array && values.iter().any(|v| v.as_deref() == Some(*expected))
                }
                None => false,
            },
            QueryTest::Pattern(pattern) => match value {
                Some(QueryValue::Single(v)) => v.as_deref().is_some_and(|v| pattern.is_match(v)),
                Some(QueryValue::List(values)) => {
                    within_array && values.iter().flatten().any(|v| pattern.is_match(v))
                }
                None => false,
            },
        }
    }

    /// Returns true if some name matches `pattern` and, if given, passes `test`.
    #[must_use]
    pub fn has_matching(&self, pattern: &Regex, test: Option<&QueryTest<'_>>) -> bool {
        self.params.keys().any(|name| {
            pattern.is_match(name) && test.is_none_or(|test| self.has(name, test, false))
        })
    }

    /// Returns true if every `(name, test)` pair holds.
    #[must_use]
    pub fn has_all(&self, tests: &[(&str, QueryTest<'_>)]) -> bool {
        tests.iter().all(|(name, test)| self.has(name, test, false))
    }
}

fn build_pair(name: &str, value: Option<&str>, space_as_plus: bool) -> String {
    let name = encode_query(name, space_as_plus);
    match value {
        Some(value) => format!("{name}={}", encode_query(value, space_as_plus)),
        None => name,
    }
}

fn value_matches(matcher: &ValueMatch, value: &str) -> bool {
    match matcher {
        ValueMatch::Exact(expected) => value == expected.as_str(),
        ValueMatch::AnyOf(expected) => expected.iter().any(|e| e == value),
        ValueMatch::Pattern(pattern) => pattern.is_match(value),
    }
}

fn same_multiset(values: &[Option<String>], expected: &[&str]) -> bool {
    if values.len() != expected.len() {
        return false;
    }
    let mut actual: Vec<Option<&str>> = values.iter().map(Option::as_deref).collect();
    let mut expected: Vec<Option<&str>> = expected.iter().copied().map(Some).collect();
    actual.sort_unstable();
    expected.sort_unstable();
    actual == expected
}

impl fmt::Display for QueryParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.build(false, true))
    }
}

impl FromStr for QueryParams {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s, true))
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for QueryParams {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for QueryParams {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Self::parse(&s, true))
    }
}
