//! Link destination safety and escaping.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Schemes that execute code or read local files when followed.
const DANGEROUS_SCHEMES: [&str; 4] = ["javascript:", "vbscript:", "file:", "data:"];

/// Inline image payloads allowed behind the `data:` scheme. The `;` keeps
/// `image/pngfoo` or `image/svg+xml` from passing as a prefix match.
const SAFE_DATA_IMAGES: [&str; 4] = ["png;", "gif;", "jpeg;", "webp;"];

/// Unreserved and reserved URL characters pass through: A-Z a-z 0-9
/// `-_.~!*'();:@&=+$,/?#`. Everything else, including `%`, `[`, `]` and `|`,
/// is encoded.
const DESTINATION_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'!')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b';')
    .remove(b':')
    .remove(b'@')
    .remove(b'&')
    .remove(b'=')
    .remove(b'+')
    .remove(b'$')
    .remove(b',')
    .remove(b'/')
    .remove(b'?')
    .remove(b'#');

/// Whether following `url` could run script or touch local files.
///
/// Schemes are compared case-insensitively. `data:` URLs are dangerous
/// unless they carry one of the common raster image types followed by `;`.
///
/// ```
/// use md2jira_renderer::url::is_dangerous_url;
///
/// assert!(is_dangerous_url("javascript:alert(1)"));
/// assert!(is_dangerous_url("JavaScript:alert(1)"));
/// assert!(!is_dangerous_url("data:image/png;base64,AAAA"));
/// assert!(!is_dangerous_url("https://example.com"));
/// ```
#[must_use]
pub fn is_dangerous_url(url: &str) -> bool {
    if let Some(image) = strip_prefix_ignore_case(url, "data:image/") {
        return !SAFE_DATA_IMAGES
            .iter()
            .any(|kind| strip_prefix_ignore_case(image, kind).is_some());
    }
    DANGEROUS_SCHEMES
        .iter()
        .any(|scheme| strip_prefix_ignore_case(url, scheme).is_some())
}

/// Percent-encode every byte outside the URL-safe set.
///
/// Existing `%XX` escapes are kept as they are, so already encoded
/// destinations are not double-encoded. Jira's link delimiters `[`, `]` and
/// `|` are always encoded.
#[must_use]
pub fn escape_url(url: &str) -> String {
    let mut out = String::with_capacity(url.len());
    let mut rest = url;
    while let Some(at) = find_existing_escape(rest) {
        out.extend(utf8_percent_encode(&rest[..at], DESTINATION_ENCODE_SET));
        out.push_str(&rest[at..at + 3]);
        rest = &rest[at + 3..];
    }
    out.extend(utf8_percent_encode(rest, DESTINATION_ENCODE_SET));
    out
}

/// Escape characters with special meaning in HTML.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Destination text as written after the `|` of a Jira link.
#[must_use]
pub fn escape_destination(url: &str) -> String {
    escape_html(&escape_url(url))
}

fn find_existing_escape(s: &str) -> Option<usize> {
    s.as_bytes().windows(3).position(|w| {
        w[0] == b'%' && w[1].is_ascii_hexdigit() && w[2].is_ascii_hexdigit()
    })
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix).then(|| &s[prefix.len()..])
}
