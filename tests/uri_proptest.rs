//! Property-based tests for parsing, normalization, resolution and the query codec.

use proptest::prelude::*;

use mutable_uri::path::{common_path, remove_dot_segments};
use mutable_uri::{FindOptions, QueryParams, QueryValue, Uri, within_string};

/// Strategies for generating URI pieces.
mod strategies {
    use super::*;

    /// Lowercase letters and digits
    const ALPHANUMERIC: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

    /// Generate a DNS label (alphanumeric, 1-10 chars)
    pub fn dns_label() -> impl Strategy<Value = String> {
        prop::collection::vec(prop::sample::select(ALPHANUMERIC.to_vec()), 1..=10)
            .prop_map(|chars| chars.into_iter().map(char::from).collect())
    }

    /// Generate a dotted domain name with 1-4 labels
    pub fn domain() -> impl Strategy<Value = String> {
        prop::collection::vec(dns_label(), 1..=4).prop_map(|labels| labels.join("."))
    }

    /// Generate a plain path segment
    pub fn segment() -> impl Strategy<Value = String> {
        "[a-z0-9_~-]{1,8}"
    }

    /// Generate an absolute path from plain segments
    pub fn path() -> impl Strategy<Value = String> {
        (prop::collection::vec(segment(), 0..=5), any::<bool>()).prop_map(|(segments, dir)| {
            let mut path = format!("/{}", segments.join("/"));
            if dir && !segments.is_empty() {
                path.push('/');
            }
            path
        })
    }

    /// Generate an absolute path that may contain dot segments, empty segments,
    /// uppercase letters and characters that need escaping
    pub fn messy_path() -> impl Strategy<Value = String> {
        let segment = prop_oneof![
            3 => "[a-zA-Z0-9]{1,4}",
            1 => Just(".".to_string()),
            1 => Just("..".to_string()),
            1 => Just(String::new()),
            1 => Just("a b".to_string()),
            1 => Just("%7e".to_string()),
        ];
        prop::collection::vec(segment, 0..=6).prop_map(|segments| format!("/{}", segments.join("/")))
    }

    /// Generate a simple `name=value` query
    pub fn query() -> impl Strategy<Value = String> {
        prop::collection::vec(("[a-z]{1,4}", "[a-z0-9]{0,4}"), 1..=4).prop_map(|pairs| {
            pairs
                .into_iter()
                .map(|(name, value)| format!("{name}={value}"))
                .collect::<Vec<_>>()
                .join("&")
        })
    }

    /// Generate a URI with every component in canonical form
    pub fn canonical_uri() -> impl Strategy<Value = String> {
        (
            prop::sample::select(vec!["http", "https", "ftp", "svn+ssh"]),
            domain(),
            prop::option::of(1..=65535u32),
            path(),
            prop::option::of(query()),
            prop::option::of("[a-z0-9]{1,6}"),
        )
            .prop_map(|(scheme, host, port, path, query, fragment)| {
                let mut uri = format!("{scheme}://{host}");
                if let Some(port) = port {
                    uri.push_str(&format!(":{port}"));
                }
                uri.push_str(&path);
                if let Some(query) = query {
                    uri.push('?');
                    uri.push_str(&query);
                }
                if let Some(fragment) = fragment {
                    uri.push('#');
                    uri.push_str(&fragment);
                }
                uri
            })
    }

    /// Generate a URI that needs normalizing
    pub fn messy_uri() -> impl Strategy<Value = String> {
        (
            prop::sample::select(vec!["http", "HTTP", "https", "Ftp"]),
            "[a-zA-Z]{1,6}\\.[a-zA-Z]{2,3}",
            prop::option::of(prop::sample::select(vec![21u32, 80, 443, 8080])),
            messy_path(),
            prop::option::of("[a-z=&+%0-9]{0,8}"),
        )
            .prop_map(|(scheme, host, port, path, query)| {
                let port = port.map(|p| format!(":{p}")).unwrap_or_default();
                let query = query.map(|q| format!("?{q}")).unwrap_or_default();
                format!("{scheme}://{host}{port}{path}{query}")
            })
    }

    /// Generate a query value, including characters with meaning in a query
    pub fn query_value() -> impl Strategy<Value = Option<String>> {
        prop::option::of("[a-zA-Z0-9 &=+%?#/é]{0,8}")
    }
}

mod round_trip_tests {
    use super::strategies::*;
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(500))]

        #[test]
        fn canonical_uri_round_trips(input in canonical_uri()) {
            let uri = Uri::parse(&input);
            prop_assert!(uri.is_ok(), "Failed to parse: {}", input);
            prop_assert_eq!(uri.unwrap().to_string(), input);
        }

        #[test]
        fn reparse_of_built_string_is_stable(input in messy_uri()) {
            let once = Uri::parse(&input).unwrap().to_string();
            let twice = Uri::parse(&once).unwrap().to_string();
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn segments_round_trip(segments in prop::collection::vec("[a-z0-9]{1,5}", 1..=6)) {
            let mut uri = Uri::parse("http://example.org/").unwrap();
            let refs: Vec<&str> = segments.iter().map(String::as_str).collect();
            uri.set_segments(&refs);
            prop_assert_eq!(uri.segments(), segments);
        }
    }
}

mod normalization_tests {
    use super::strategies::*;
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(500))]

        #[test]
        fn normalize_is_idempotent(input in messy_uri()) {
            let mut uri = Uri::parse(&input).unwrap();
            uri.normalize();
            let once = uri.to_string();
            uri.normalize();
            prop_assert_eq!(uri.to_string(), once);
        }

        #[test]
        fn normalized_path_has_no_dot_segments(input in messy_uri()) {
            let mut uri = Uri::parse(&input).unwrap();
            uri.normalize();
            for segment in uri.segments() {
                prop_assert!(segment != "." && segment != "..", "dot segment left in {}", uri);
            }
            prop_assert!(!uri.path().contains("//"));
        }

        #[test]
        fn dot_segment_removal_is_a_fixpoint(path in messy_path()) {
            let once = remove_dot_segments(&path, false);
            prop_assert!(once.starts_with('/'));
            prop_assert_eq!(remove_dot_segments(&once, false), once);
        }

        #[test]
        fn equals_is_reflexive(input in messy_uri()) {
            let uri = Uri::parse(&input).unwrap();
            prop_assert!(uri.equals(&uri));
        }
    }
}

mod resolution_tests {
    use super::strategies::*;
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(500))]

        #[test]
        fn relative_to_inverts_absolute_to(target in path(), base in path()) {
            let target = Uri::parse(&format!("http://example.org{target}")).unwrap();
            let base = Uri::parse(&format!("http://example.org{base}")).unwrap();

            let relative = target.relative_to(&base).unwrap();
            let resolved = relative.absolute_to(&base).unwrap();
            prop_assert_eq!(resolved.as_str(), target.as_str(), "via {}", relative);
        }

        #[test]
        fn common_path_is_a_shared_directory(one in path(), two in path()) {
            let common = common_path(&one, &two);
            prop_assert!(one.starts_with(&common));
            prop_assert!(two.starts_with(&common));
            prop_assert!(common.ends_with('/'));
        }
    }
}

mod query_tests {
    use super::strategies::*;
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(500))]

        #[test]
        fn query_params_round_trip(
            entries in prop::collection::btree_map("[a-z]{1,4}", query_value(), 0..=5),
            space_as_plus in any::<bool>(),
        ) {
            let mut params = QueryParams::new();
            for (name, value) in &entries {
                params.set(name, QueryValue::Single(value.clone()));
            }
            let built = params.build(false, space_as_plus);
            prop_assert_eq!(QueryParams::parse(&built, space_as_plus), params);
        }

        #[test]
        fn query_helpers_agree_with_map(name in "[a-z]{1,4}", values in prop::collection::vec("[a-z0-9]{1,4}", 1..=4)) {
            let mut uri = Uri::parse("http://example.org/").unwrap();
            for value in &values {
                uri.add_query_param(&name, value.as_str());
            }
            let mut expected: Vec<&str> = Vec::new();
            for value in &values {
                if !expected.contains(&value.as_str()) {
                    expected.push(value);
                }
            }
            let map = uri.query_map();
            let stored: Vec<&str> = map
                .get(&name)
                .unwrap()
                .as_slice()
                .iter()
                .map(|v| v.as_deref().unwrap())
                .collect();
            prop_assert_eq!(stored, expected);
        }
    }
}

mod find_tests {
    use super::strategies::*;
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(300))]

        #[test]
        fn embedded_uri_is_found(host in domain(), path in path(), before in "[a-z ]{0,10}", after in "[a-z ]{0,10}") {
            let uri = format!("http://{host}{path}");
            let text = format!("{before} {uri} {after}");
            let mut found = Vec::new();
            within_string(&text, |candidate, _, _| {
                found.push(candidate.to_string());
                None
            }, &FindOptions::default());
            prop_assert_eq!(found, vec![uri]);
        }
    }
}
