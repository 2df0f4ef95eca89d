use serde::Serialize;

use super::tld::TldSet;

/// Characters peeled off the front of a token before parsing (Markdown
/// emphasis, angle brackets, an opening paren).
const LEADING_WRAPPERS: &[char] = &['<', '*', '_', '~', '('];

/// Characters peeled off the end of a token before parsing (sentence
/// punctuation, closing wrappers).
const TRAILING_WRAPPERS: &[char] = &['>', '?', '!', '.', ':', ',', '*', '~', ')'];

const SCHEMES: [&str; 2] = ["https://", "http://"];

/// Maximum number of characters inspected after a `:` when checking for a port.
const PORT_SCAN_LEN: usize = 5;

/// A link found in chat text, split into its parts.
///
/// Every field borrows from the token passed to [`LinkRecognizer::parse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ParsedLink<'a> {
    /// `http://` or `https://` as written, or empty when the link has no scheme.
    pub protocol: &'a str,
    /// Hostname or IPv4 literal.
    pub host: &'a str,
    /// Port, path, query and fragment, starting at the separator. May be empty.
    pub rest: &'a str,
    /// The full recognized link.
    pub link: &'a str,
}

/// Permissive recognizer for link-like tokens in chat messages.
///
/// Accepts bare hostnames (`example.com`), scheme-prefixed URLs, IPv4
/// literals and internationalized domains, while rejecting tokens that merely
/// contain a dot (`e.g.`, `v1.2`, `file.txt` with an unknown TLD).
#[derive(Debug, Clone)]
pub struct LinkRecognizer {
    tlds: TldSet,
}

/// Result of scanning the host portion of a candidate link.
struct HostScan {
    /// Byte offset where the host ends (and `rest` begins).
    host_end: usize,
    /// Byte offset of the last dot inside the host.
    last_dot: usize,
    dots: usize,
}

impl LinkRecognizer {
    pub fn new(tlds: TldSet) -> Self {
        Self { tlds }
    }

    pub fn tlds(&self) -> &TldSet {
        &self.tlds
    }

    /// Decide whether `source` is a link and split it into its parts.
    ///
    /// Surrounding punctuation is ignored (`<https://example.com>.` yields
    /// `https://example.com`), except that a closing parenthesis which
    /// balances one inside the path is kept:
    ///
    /// ```
    /// use vodchat::links::{LinkRecognizer, TldSet};
    ///
    /// let recognizer = LinkRecognizer::new(TldSet::builtin());
    /// let parsed = recognizer.parse("(https://example.com/a(b))").unwrap();
    /// assert_eq!(parsed.link, "https://example.com/a(b)");
    /// assert_eq!(parsed.rest, "/a(b)");
    ///
    /// assert!(recognizer.parse("nodomain").is_none());
    /// ```
    ///
    /// Returns `None` for anything that is not a link; this never fails otherwise.
    pub fn parse<'a>(&self, source: &'a str) -> Option<ParsedLink<'a>> {
        let unwrapped = source.trim_start_matches(LEADING_WRAPPERS);
        let lead = source.len() - unwrapped.len();
        let link = unwrapped.trim_end_matches(TRAILING_WRAPPERS);
        if link.is_empty() {
            return None;
        }

        let (protocol, remaining) = link.split_at(scheme_len(link));
        let scan = scan_host(remaining)?;
        let host = &remaining[..scan.host_end];
        let tld = &host[scan.last_dot + 1..];

        let host_is_valid = (scan.dots == 3 && is_ipv4(host)) || self.tlds.contains(tld);
        if !host_is_valid {
            return None;
        }

        let rest = &remaining[scan.host_end..];
        if link.len() == source.len() || rest.is_empty() {
            return Some(ParsedLink {
                protocol,
                host,
                rest,
                link,
            });
        }

        // Stripping may have eaten a `)` that closes a paren inside the path.
        let rest_start = lead + protocol.len() + host.len();
        let link_end = lead + link.len();
        let end = last_balanced_close(source, rest_start)
            .map_or(link_end, |close| close.max(link_end));

        Some(ParsedLink {
            protocol,
            host,
            rest: &source[rest_start..end],
            link: &source[lead..end],
        })
    }

    /// Recognize every whitespace-separated token of a chat line, in order.
    pub fn find_links<'a>(&self, text: &'a str) -> Vec<ParsedLink<'a>> {
        text.split_whitespace()
            .filter_map(|token| self.parse(token))
            .collect()
    }
}

fn scheme_len(link: &str) -> usize {
    let bytes = link.as_bytes();
    SCHEMES
        .iter()
        .find(|scheme| {
            bytes.len() >= scheme.len()
                && bytes[..scheme.len()].eq_ignore_ascii_case(scheme.as_bytes())
        })
        .map_or(0, |scheme| scheme.len())
}

/// Walk the host, stopping at the first port/path/query/fragment separator.
fn scan_host(remaining: &str) -> Option<HostScan> {
    // Starts true so a leading dot is rejected like a doubled one
    let mut last_was_dot = true;
    let mut last_dot = None;
    let mut dots = 0;
    let mut host_end = remaining.len();

    for (i, c) in remaining.char_indices() {
        if c == '.' {
            if last_was_dot {
                return None;
            }
            last_dot = Some(i);
            dots += 1;
            last_was_dot = true;
            continue;
        }
        last_was_dot = false;

        match c {
            ':' => {
                host_end = i;
                if !starts_with_port(&remaining[i + 1..]) {
                    return None;
                }
                break;
            }
            '/' | '?' | '#' => {
                host_end = i;
                break;
            }
            c if !is_domain_char(c) => return None,
            _ => {}
        }
    }

    if last_was_dot {
        return None;
    }
    let last_dot = last_dot.filter(|&pos| pos > 0)?;

    Some(HostScan {
        host_end,
        last_dot,
        dots,
    })
}

fn starts_with_port(s: &str) -> bool {
    for (i, c) in s.chars().take(PORT_SCAN_LEN).enumerate() {
        if i >= 1 && matches!(c, '/' | '?' | '#') {
            return true;
        }
        if !c.is_ascii_digit() {
            return false;
        }
    }
    true
}

/// Non-ASCII characters are allowed so IDN hosts match without punycode.
fn is_domain_char(c: char) -> bool {
    !c.is_ascii() || c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-')
}

fn is_ipv4(host: &str) -> bool {
    let mut parts = 0;
    for part in host.split('.') {
        parts += 1;
        if part.is_empty() || part.len() > 3 || !part.bytes().all(|b| b.is_ascii_digit()) {
            return false;
        }
        match part.parse::<u16>() {
            Ok(n) if n < 256 => {}
            _ => return false,
        }
    }
    parts == 4
}

/// Byte offset just past the last `)` at or after `from` that brings
/// parenthesis nesting back to zero.
fn last_balanced_close(source: &str, from: usize) -> Option<usize> {
    let mut nesting = 0usize;
    let mut last_close = None;

    for (i, b) in source.bytes().enumerate().skip(from) {
        match b {
            b'(' => nesting += 1,
            b')' if nesting > 0 => {
                nesting -= 1;
                if nesting == 0 {
                    last_close = Some(i + 1);
                }
            }
            _ => {}
        }
    }

    last_close
}
