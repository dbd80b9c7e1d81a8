//! Locating URIs in free text.

use std::sync::LazyLock;

use regex::Regex;

static START: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:([a-z][a-z0-9.+-]*://)|www\.)").expect("uri start regex must compile")
});
static END: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s|$").expect("uri end regex must compile"));
static TRIM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[`!()\[\]{};:'".,<>?«»“”„‘’]+$"#).expect("trailing punctuation regex must compile")
});
static PARENS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\([^)]*\)|\[[^\]]*\]|\{[^}]*\}|<[^>]*>").expect("balanced parens regex must compile")
});
static ATTRIBUTE_OPEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)[a-z0-9-]=["']?$"#).expect("attribute regex must compile")
});

/// Options for [`within_string`].
///
/// Each pattern left as `None` uses the built-in default.
#[derive(Debug, Clone, Default)]
pub struct FindOptions {
    /// Skip URIs that directly follow an HTML attribute such as `href="`
    pub ignore_html: bool,
    /// Skip candidates matching this pattern
    pub ignore: Option<Regex>,
    /// Where a URI starts; defaults to `scheme://` or `www.`
    pub start: Option<Regex>,
    /// Where a URI ends; defaults to the next whitespace
    pub end: Option<Regex>,
    /// Trailing text to strip from a candidate; defaults to punctuation
    pub trim: Option<Regex>,
    /// Bracketed groups kept whole even when they end a candidate
    pub parens: Option<Regex>,
}

/// Finds URIs in `text` and passes each to `callback` with its byte range.
///
/// A candidate runs from a start marker to the next whitespace, minus
/// trailing punctuation; balanced brackets inside it survive trimming. If the
/// callback returns a replacement, it is spliced into the text and the search
/// continues after it. Returns the text with all replacements applied.
///
/// # Examples
///
/// ```
/// use mutable_uri::{within_string, FindOptions};
///
/// let text = "See http://example.org/a_(b), or www.example.com.";
/// let mut found = Vec::new();
/// let out = within_string(text, |uri, start, end| {
///     found.push((uri.to_string(), start, end));
///     Some(format!("<{uri}>"))
/// }, &FindOptions::default());
///
/// assert_eq!(found[0], ("http://example.org/a_(b)".to_string(), 4, 28));
/// assert_eq!(found[1].0, "www.example.com");
/// assert_eq!(out, "See <http://example.org/a_(b)>, or <www.example.com>.");
/// ```
pub fn within_string<F>(text: &str, mut callback: F, options: &FindOptions) -> String
where
    F: FnMut(&str, usize, usize) -> Option<String>,
{
    let start_pattern = options.start.as_ref().unwrap_or(&*START);
    let end_pattern = options.end.as_ref().unwrap_or(&*END);
    let trim_pattern = options.trim.as_ref().unwrap_or(&*TRIM);
    let parens_pattern = options.parens.as_ref().unwrap_or(&*PARENS);

    let mut text = text.to_string();
    let mut from = 0;

    while from <= text.len() {
        let Some(marker) = start_pattern.find_at(&text, from) else {
            break;
        };
        let start = marker.start();
        from = if marker.is_empty() {
            next_boundary(&text, marker.end())
        } else {
            marker.end()
        };

        if options.ignore_html && ATTRIBUTE_OPEN.is_match(preceding(&text, start, 3)) {
            continue;
        }

        let rest = &text[start..];
        let raw = &rest[..end_pattern.find(rest).map_or(rest.len(), |m| m.start())];

        let candidate = match parens_pattern.find_iter(raw).map(|m| m.end()).max() {
            Some(parens_end) => format!(
                "{}{}",
                &raw[..parens_end],
                trim_pattern.replace(&raw[parens_end..], "")
            ),
            None => trim_pattern.replace(raw, "").into_owned(),
        };

        if candidate.len() <= marker.len() {
            continue;
        }
        if options.ignore.as_ref().is_some_and(|re| re.is_match(&candidate)) {
            continue;
        }

        let end = start + candidate.len();
        match callback(&candidate, start, end) {
            Some(replacement) => {
                text.replace_range(start..end, &replacement);
                from = start + replacement.len();
            }
            None => from = end,
        }
    }
    text
}

/// Up to `n` bytes before `at`, widened to a char boundary.
fn preceding(text: &str, at: usize, n: usize) -> &str {
    let mut from = at.saturating_sub(n);
    while !text.is_char_boundary(from) {
        from -= 1;
    }
    &text[from..at]
}

fn next_boundary(text: &str, at: usize) -> usize {
    text[at..].chars().next().map_or(at + 1, |c| at + c.len_utf8())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn find_all(text: &str, options: &FindOptions) -> Vec<String> {
        let mut found = Vec::new();
        within_string(
            text,
            |uri, _, _| {
                found.push(uri.to_string());
                None
            },
            options,
        );
        found
    }

    #[test]
    fn finds_schemes_and_www() {
        let found = find_all(
            "Go to https://example.org/path?q=1. Also ftp://files.example.org and WWW.example.com!",
            &FindOptions::default(),
        );
        assert_eq!(
            found,
            [
                "https://example.org/path?q=1",
                "ftp://files.example.org",
                "WWW.example.com"
            ]
        );
    }

    #[test]
    fn bare_marker_is_not_a_uri() {
        assert!(find_all("just http:// here, and www. there", &FindOptions::default()).is_empty());
    }

    #[test]
    fn reports_byte_ranges() {
        let mut ranges = Vec::new();
        within_string(
            "go to www.example.org.",
            |_, start, end| {
                ranges.push((start, end));
                None
            },
            &FindOptions::default(),
        );
        assert_eq!(ranges, [(6, 21)]);
    }

    #[test]
    fn ignore_html_skips_attributes() {
        let options = FindOptions {
            ignore_html: true,
            ..FindOptions::default()
        };
        let found = find_all(r#"<a href="http://x.org/">x</a> and http://y.org"#, &options);
        assert_eq!(found, ["http://y.org"]);
    }

    #[test]
    fn ignore_pattern() {
        let options = FindOptions {
            ignore: Some(Regex::new(r"\.org").unwrap()),
            ..FindOptions::default()
        };
        let found = find_all("http://a.org http://b.com", &options);
        assert_eq!(found, ["http://b.com"]);
    }

    #[test]
    fn replacement_continues_after_inserted_text() {
        let out = within_string(
            "a http://x.org b http://y.org",
            |uri, _, _| Some(format!("[http://wrapped {uri}]")),
            &FindOptions::default(),
        );
        assert_eq!(out, "a [http://wrapped http://x.org] b [http://wrapped http://y.org]");
    }

    #[test]
    fn unicode_text_is_safe() {
        let found = find_all("«http://example.org/ä» – fin", &FindOptions::default());
        assert_eq!(found, ["http://example.org/ä"]);
    }
}
