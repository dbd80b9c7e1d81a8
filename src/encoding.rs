//! Percent-encoding codec.
//!
//! Every component of a URI is encoded with the strict component encoding
//! (everything but RFC 3986 unreserved characters is escaped, uppercase hex),
//! then a per-[`Charset`] set of characters is let through literally. Decoding
//! is best-effort: malformed input is returned unchanged, and a per-charset set
//! of characters is escaped again so it cannot change the structure of the
//! component it came from.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

/// Everything except ALPHA, DIGIT, `-`, `.`, `_`, `~`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Path segments keep `$ & + , ; = : @` literal.
const PATHNAME: &AsciiSet = &COMPONENT
    .remove(b'$')
    .remove(b'&')
    .remove(b'+')
    .remove(b',')
    .remove(b';')
    .remove(b'=')
    .remove(b':')
    .remove(b'@');

/// Gen-delims and sub-delims stay literal.
const RESERVED: &AsciiSet = &COMPONENT
    .remove(b':')
    .remove(b'/')
    .remove(b'?')
    .remove(b'#')
    .remove(b'[')
    .remove(b']')
    .remove(b'@')
    .remove(b'!')
    .remove(b'$')
    .remove(b'&')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b'*')
    .remove(b'+')
    .remove(b',')
    .remove(b';')
    .remove(b'=');

/// RFC 2141 URN characters; `:` separates URN segments and stays escaped.
const URNPATH: &AsciiSet = &COMPONENT
    .remove(b'!')
    .remove(b'$')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b'*')
    .remove(b'+')
    .remove(b',')
    .remove(b';')
    .remove(b'=')
    .remove(b'@');

const PATHNAME_DECODE: &[(char, &str)] = &[('/', "%2F"), ('?', "%3F"), ('#', "%23")];

const URNPATH_DECODE: &[(char, &str)] = &[('/', "%2F"), ('?', "%3F"), ('#', "%23"), (':', "%3A")];

/// The context a string is encoded for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Charset {
    /// A single path segment
    Pathname,
    /// Arbitrary text where reserved characters keep their meaning
    Reserved,
    /// A single colon-delimited URN path segment
    UrnPath,
    /// A query name or value (`application/x-www-form-urlencoded` flavored)
    Query {
        /// Encode space as `+` and decode `+` as space
        space_as_plus: bool,
    },
}

/// Malformed percent-encoding or non-UTF-8 octets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DecodeError;

/// Encodes `input` for the given context.
///
/// # Examples
///
/// ```
/// use mutable_uri::encoding::{encode, Charset};
///
/// assert_eq!(encode(Charset::Pathname, "a b:c/d"), "a%20b:c%2Fd");
/// assert_eq!(encode(Charset::Reserved, "a b:c/d"), "a%20b:c/d");
/// assert_eq!(encode(Charset::Query { space_as_plus: true }, "a b&c"), "a+b%26c");
/// ```
#[must_use]
pub fn encode(charset: Charset, input: &str) -> String {
    match charset {
        Charset::Pathname => utf8_percent_encode(input, PATHNAME).to_string(),
        Charset::Reserved => utf8_percent_encode(input, RESERVED).to_string(),
        Charset::UrnPath => utf8_percent_encode(input, URNPATH).to_string(),
        Charset::Query { space_as_plus } => encode_query(input, space_as_plus),
    }
}

/// Decodes `input` from the given context, returning it unchanged if it is malformed.
///
/// # Examples
///
/// ```
/// use mutable_uri::encoding::{decode, Charset};
///
/// assert_eq!(decode(Charset::Pathname, "a%20b%2Fc"), "a b%2Fc");
/// assert_eq!(decode(Charset::Query { space_as_plus: true }, "a+b"), "a b");
/// assert_eq!(decode(Charset::Reserved, "100%"), "100%");
/// ```
#[must_use]
pub fn decode(charset: Charset, input: &str) -> String {
    match charset {
        Charset::Pathname => decode_with(input, PATHNAME_DECODE),
        Charset::UrnPath => decode_with(input, URNPATH_DECODE),
        Charset::Reserved => decode_component(input),
        Charset::Query { space_as_plus } => decode_query(input, space_as_plus),
    }
}

/// Strict component encoding: escapes everything but unreserved characters.
#[must_use]
pub fn encode_component(input: &str) -> String {
    utf8_percent_encode(input, COMPONENT).to_string()
}

/// Decodes every escape sequence, returning `input` unchanged if it is malformed.
#[must_use]
pub fn decode_component(input: &str) -> String {
    try_decode(input).unwrap_or_else(|_| fallback(input))
}

/// Decodes every escape sequence, failing on malformed octets or invalid UTF-8.
pub(crate) fn try_decode(input: &str) -> Result<String, DecodeError> {
    let bytes = input.as_bytes();
    let mut i = 0;
    while let Some(offset) = bytes[i..].iter().position(|&b| b == b'%') {
        let at = i + offset;
        match bytes.get(at + 1..at + 3) {
            Some([hi, lo]) if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit() => i = at + 3,
            _ => return Err(DecodeError),
        }
    }

    percent_decode_str(input)
        .decode_utf8()
        .map(std::borrow::Cow::into_owned)
        .map_err(|_| DecodeError)
}

/// Encodes a query name or value.
#[must_use]
pub fn encode_query(input: &str, space_as_plus: bool) -> String {
    let escaped = encode_component(input);
    if space_as_plus {
        escaped.replace("%20", "+")
    } else {
        escaped
    }
}

/// Decodes a query name or value, returning it unchanged if it is malformed.
#[must_use]
pub fn decode_query(input: &str, space_as_plus: bool) -> String {
    let prepared = if space_as_plus {
        input.replace('+', "%20")
    } else {
        input.to_string()
    };
    try_decode(&prepared).unwrap_or_else(|_| fallback(input))
}

/// Encodes a single path segment.
#[must_use]
pub fn encode_path_segment(input: &str) -> String {
    encode(Charset::Pathname, input)
}

/// Decodes a single path segment, keeping `/ ? #` escaped.
#[must_use]
pub fn decode_path_segment(input: &str) -> String {
    decode(Charset::Pathname, input)
}

/// Encodes a single URN path segment.
#[must_use]
pub fn encode_urn_path_segment(input: &str) -> String {
    encode(Charset::UrnPath, input)
}

/// Decodes a single URN path segment, keeping `/ ? # :` escaped.
#[must_use]
pub fn decode_urn_path_segment(input: &str) -> String {
    decode(Charset::UrnPath, input)
}

/// Encodes text, leaving reserved characters literal.
#[must_use]
pub fn encode_reserved(input: &str) -> String {
    encode(Charset::Reserved, input)
}

/// Decodes every `/`-separated segment of a path.
#[must_use]
pub fn decode_path(path: &str) -> String {
    map_segments(path, '/', decode_path_segment)
}

/// Decodes every `:`-separated segment of a URN path.
#[must_use]
pub fn decode_urn_path(path: &str) -> String {
    map_segments(path, ':', decode_urn_path_segment)
}

/// Brings every segment of a path to canonical percent-encoding.
///
/// A segment with malformed escapes is kept verbatim.
///
/// ```
/// use mutable_uri::encoding::recode_path;
///
/// assert_eq!(recode_path("/a b/%7e%41/c:d"), "/a%20b/~A/c:d");
/// assert_eq!(recode_path("/100%/x"), "/100%/x");
/// ```
#[must_use]
pub fn recode_path(path: &str) -> String {
    map_segments(path, '/', |segment| recode(segment, encode_path_segment))
}

/// Brings every segment of a URN path to canonical percent-encoding.
#[must_use]
pub fn recode_urn_path(path: &str) -> String {
    map_segments(path, ':', |segment| recode(segment, encode_urn_path_segment))
}

fn recode(segment: &str, encode: fn(&str) -> String) -> String {
    match try_decode(segment) {
        Ok(decoded) => encode(&decoded),
        Err(_) => fallback(segment),
    }
}

/// Applies `f` to every `sep`-delimited segment and joins the results.
pub(crate) fn map_segments<F>(input: &str, sep: char, f: F) -> String
where
    F: Fn(&str) -> String,
{
    input.split(sep).map(f).collect::<Vec<_>>().join(&sep.to_string())
}

fn decode_with(input: &str, reescape: &[(char, &str)]) -> String {
    let Ok(decoded) = try_decode(input) else {
        return fallback(input);
    };

    let mut out = String::with_capacity(decoded.len());
    for c in decoded.chars() {
        match reescape.iter().find(|(from, _)| *from == c) {
            Some((_, to)) => out.push_str(to),
            None => out.push(c),
        }
    }
    out
}

fn fallback(input: &str) -> String {
    tracing::trace!(input = %input, "malformed percent-encoding left undecoded");
    input.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn component_encoding_is_strict() {
        assert_eq!(encode_component("a!'()*~-._"), "a%21%27%28%29%2A~-._");
        assert_eq!(encode_component("ä"), "%C3%A4");
    }

    #[test]
    fn pathname_keeps_sub_delims() {
        assert_eq!(encode_path_segment("$&+,;=:@"), "$&+,;=:@");
        assert_eq!(encode_path_segment("a/b?c#d"), "a%2Fb%3Fc%23d");
    }

    #[test]
    fn urn_path_escapes_colon() {
        assert_eq!(encode_urn_path_segment("a:b!"), "a%3Ab!");
        assert_eq!(decode_urn_path_segment("a%3Ab%2F"), "a%3Ab%2F");
    }

    #[test]
    fn decode_reescapes_structural_characters() {
        assert_eq!(decode_path_segment("%2F%3F%23%20"), "%2F%3F%23 ");
    }

    #[test]
    fn malformed_decode_returns_input() {
        assert_eq!(decode_component("%E0%A4%A"), "%E0%A4%A");
        assert_eq!(decode_component("%zz"), "%zz");
        assert_eq!(decode_component("%C3"), "%C3");
        assert_eq!(decode_path_segment("50%"), "50%");
    }

    #[test]
    fn query_space_handling() {
        assert_eq!(encode_query("a b", true), "a+b");
        assert_eq!(encode_query("a b", false), "a%20b");
        assert_eq!(decode_query("a+b%20c", true), "a b c");
        assert_eq!(decode_query("a+b", false), "a+b");
        assert_eq!(decode_query("%", true), "%");
    }

    #[test]
    fn recode_normalizes_case_and_unreserved() {
        assert_eq!(recode_path("/%7Efoo/%2fbar"), "/~foo/%2Fbar");
        assert_eq!(recode_urn_path("isbn:0-%41:x y"), "isbn:0-A:x%20y");
    }

    #[test]
    fn decode_path_keeps_separators() {
        assert_eq!(decode_path("/a%20b/c%2Fd"), "/a b/c%2Fd");
        assert_eq!(decode_urn_path("a%20b:c"), "a b:c");
    }

    #[test]
    fn reserved_roundtrip() {
        assert_eq!(encode_reserved("/a b?c=d#e"), "/a%20b?c=d#e");
        assert_eq!(decode(Charset::Reserved, "%2Fa%20b"), "/a b");
    }
}
