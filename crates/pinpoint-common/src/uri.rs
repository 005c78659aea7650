//! URI utilities.
//!
//! [URL Standard](https://url.spec.whatwg.org/)
//!
//! Nothing here resolves or normalizes URLs. The helpers only pick out a
//! short, readable tail of an `href`/`src` value so it can be used in a
//! `[href$="..."]` attribute selector.

/// Default upper bound on the length of a friendly suffix.
pub const DEFAULT_MAX_LENGTH: usize = 25;

/// Options for [`friendly_uri_suffix`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FriendlyUriOptions {
    /// Domain of the page the URI appears on. A link to a different domain
    /// may be described by its domain instead of its last path segment.
    pub current_domain: Option<String>,
    /// Longest suffix (in UTF-16 code units) that may be returned.
    pub max_length: usize,
}

impl Default for FriendlyUriOptions {
    fn default() -> Self {
        Self {
            current_domain: None,
            max_length: DEFAULT_MAX_LENGTH,
        }
    }
}

impl FriendlyUriOptions {
    /// Set the domain of the page the URI appears on.
    #[must_use]
    pub fn with_current_domain(mut self, domain: impl Into<String>) -> Self {
        self.current_domain = Some(domain.into());
        self
    }

    /// Set the maximum suffix length.
    #[must_use]
    pub const fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }
}

/// The pieces of a URI as split by [`UriParts::parse`].
///
/// Every piece borrows from the original string. `hash` and `query` keep
/// their leading `#` / `?`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UriParts<'a> {
    /// Scheme without `://`, empty for relative URIs.
    pub protocol: &'a str,
    /// Host with any leading `www.` removed.
    pub domain: &'a str,
    /// Port including its leading `:`.
    pub port: &'a str,
    /// Whatever is left after the authority, query and hash are removed.
    pub path: &'a str,
    /// Query string including `?`.
    pub query: &'a str,
    /// Fragment including `#`.
    pub hash: &'a str,
}

impl<'a> UriParts<'a> {
    /// Split a URI into its pieces.
    ///
    /// The fragment is split off at the first `#`, then the query at the
    /// first `?`, then the authority after `://` or a leading `//`. An
    /// authority with no following `/` is not recognized as a domain: the
    /// whole remainder becomes the path.
    #[must_use]
    pub fn parse(uri: &'a str) -> Self {
        let mut parts = Self::default();
        let mut rest = uri;

        if let Some(index) = rest.find('#') {
            parts.hash = &rest[index..];
            rest = &rest[..index];
        }

        if let Some(index) = rest.find('?') {
            parts.query = &rest[index..];
            rest = &rest[..index];
        }

        let authority = if let Some((protocol, after)) = rest.split_once("://") {
            parts.protocol = protocol;
            Some(after)
        } else {
            rest.strip_prefix("//")
        };

        if let Some(after) = authority {
            match after.find('/') {
                Some(index) => {
                    parts.domain = &after[..index];
                    rest = &after[index..];
                }
                None => rest = after,
            }
        }

        if let Some(domain) = parts.domain.strip_prefix("www.") {
            parts.domain = domain;
        }

        if let Some(index) = parts.domain.find(':') {
            parts.port = &parts.domain[index..];
            parts.domain = &parts.domain[..index];
        }

        parts.path = rest;
        parts
    }

    /// The last path segment that has text after it.
    ///
    /// A trailing slash stays attached, so `/about/` yields `about/`.
    #[must_use]
    pub fn path_end(&self) -> &'a str {
        let path = self.path;
        path.rmatch_indices('/')
            .find(|&(index, _)| code_units(&path[index + 1..]) >= 2)
            .map_or(path, |(index, _)| &path[index + 1..])
    }
}

/// Length of a string in UTF-16 code units.
///
/// Length limits on URIs count code units, which is what the selector
/// consumers measure.
#[must_use]
pub fn code_units(s: &str) -> usize {
    s.encode_utf16().count()
}

/// `true` when at least half of the characters are ASCII digits.
///
/// Segments like `123456.html` are usually database ids, which change between
/// deployments and read poorly in a selector.
fn is_mostly_numbers(s: &str) -> bool {
    let len = code_units(s);
    let digits = s.chars().filter(char::is_ascii_digit).count();
    len != 0 && digits * 2 >= len
}

/// Return the most human-meaningful short suffix of `uri`, or `None`.
///
/// Rejected outright: URIs of one code unit or less, `data:` and
/// `javascript:` URIs, and anything with a query string.
///
/// Candidates are tried in this order:
/// 1. With a fragment: `<path end><hash>`, or the hash alone when the path
///    end is too short to matter. Nothing else is considered.
/// 2. A bare domain (`''` or `/` path).
/// 3. The domain plus a single-segment path, for links off the current domain.
/// 4. The last path segment, unless it is tiny, an index file, or mostly digits.
#[must_use]
pub fn friendly_uri_suffix(uri: &str, options: &FriendlyUriOptions) -> Option<String> {
    if code_units(uri) <= 1
        || uri.starts_with("data:")
        || uri.starts_with("javascript:")
        || uri.contains('?')
    {
        return None;
    }

    let max_length = options.max_length;
    let parts = UriParts::parse(uri);
    let path = parts.path;
    let domain = parts.domain;
    let hash = parts.hash;
    let path_end = parts.path_end();

    if !hash.is_empty() {
        if !path_end.is_empty() && code_units(path_end) + code_units(hash) <= max_length {
            return Some(format!("{path_end}{hash}"));
        }
        let hash_len = code_units(hash);
        if code_units(path_end) < 2 && hash_len > 2 && hash_len <= max_length {
            return Some(hash.to_string());
        }
        return None;
    }

    if !domain.is_empty() && code_units(domain) < max_length && code_units(path) <= 1 {
        return Some(format!("{domain}{path}"));
    }

    let single_segment = path.strip_prefix('/') == Some(path_end);
    let foreign_domain = options
        .current_domain
        .as_deref()
        .is_some_and(|current| !current.is_empty() && current != domain);
    if single_segment
        && !domain.is_empty()
        && foreign_domain
        && code_units(domain) + code_units(path) <= max_length
    {
        return Some(format!("{domain}{path}"));
    }

    let stem_ok = match path_end.rfind('.') {
        Some(dot) => code_units(&path_end[..dot]) > 1,
        None => code_units(path_end) > 2,
    };
    if stem_ok
        && code_units(path_end) <= max_length
        && !path_end.contains("index")
        && !is_mostly_numbers(path_end)
    {
        return Some(path_end.to_string());
    }

    None
}

/// Characters `encodeURI` leaves untouched besides ASCII alphanumerics.
const URI_UNESCAPED: &str = ";/?:@&=+$,#-_.!~*'()";

/// Percent-encode a string the way ECMAScript `encodeURI` does.
///
/// [ECMA-262 § 19.2.6.5 encodeURI](https://tc39.es/ecma262/#sec-encodeuri-uri)
///
/// URI reserved characters and the unreserved marks are kept. Everything else
/// is written as `%XX` triples of its UTF-8 bytes, uppercase hex.
#[must_use]
pub fn encode_uri(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if c.is_ascii_alphanumeric() || URI_UNESCAPED.contains(c) {
            out.push(c);
            continue;
        }
        let mut buf = [0u8; 4];
        for byte in c.encode_utf8(&mut buf).bytes() {
            out.push('%');
            out.push(hex_digit(byte >> 4));
            out.push(hex_digit(byte & 0x0f));
        }
    }
    out
}

/// Uppercase hex digit for a nibble.
fn hex_digit(nibble: u8) -> char {
    match nibble {
        0..=9 => char::from(b'0' + nibble),
        _ => char::from(b'A' + nibble - 10),
    }
}
