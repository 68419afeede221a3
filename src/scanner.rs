use regex::{Match, Regex};
use std::sync::OnceLock;

/// Four groups of 1-3 digits separated by single dots.
///
/// The regex only checks the shape; surrounding context is checked by
/// `is_bounded` and octet ranges by `is_valid_ipv4`.
static IPV4_SHAPE: OnceLock<Regex> = OnceLock::new();

/// Request line target, e.g. `"GET /index.html HTTP/1.1"` captures `/index.html`
static REQUEST_LINE: OnceLock<Regex> = OnceLock::new();

/// A failed authentication: a standalone `401` or the phrase `Invalid credentials`
static FAILURE_MARKER: OnceLock<Regex> = OnceLock::new();

fn ipv4_shape() -> &'static Regex {
    IPV4_SHAPE.get_or_init(|| {
        Regex::new(r"[0-9]{1,3}(?:\.[0-9]{1,3}){3}")
            .expect("hard-coded regex should always compile")
    })
}

fn request_line() -> &'static Regex {
    REQUEST_LINE.get_or_init(|| {
        Regex::new(r#""(?:GET|POST|PUT|DELETE|HEAD|OPTIONS|PATCH) (.*?) HTTP/"#)
            .expect("hard-coded regex should always compile")
    })
}

fn failure_marker() -> &'static Regex {
    FAILURE_MARKER.get_or_init(|| {
        Regex::new(r"\b401\b|Invalid credentials").expect("hard-coded regex should always compile")
    })
}

/// Lazy sequence of IPv4-shaped tokens in a text.
///
/// Yields every bounded match, including ones with octets above 255.
pub struct Ipv4Tokens<'t> {
    text: &'t str,
    pos: usize,
}

impl<'t> Iterator for Ipv4Tokens<'t> {
    type Item = &'t str;

    fn next(&mut self) -> Option<&'t str> {
        let m = next_ipv4_token(self.text, self.pos)?;
        self.pos = m.end();
        Some(m.as_str())
    }
}

/// Scan `text` for IPv4-shaped tokens.
pub fn ipv4_tokens(text: &str) -> Ipv4Tokens<'_> {
    Ipv4Tokens { text, pos: 0 }
}

/// True when every octet of a dotted-quad token lies in [0, 255].
///
/// Leading zeros are accepted: `01.02.03.04` is valid.
pub fn is_valid_ipv4(token: &str) -> bool {
    let mut octets = 0;
    for part in token.split('.') {
        octets += 1;
        match part.parse::<u16>() {
            Ok(n) if n <= 255 => {}
            _ => return false,
        }
    }
    octets == 4
}

/// Scan `text` for request-line targets of the recognized HTTP methods.
pub fn request_targets(text: &str) -> impl Iterator<Item = &str> + '_ {
    request_line()
        .captures_iter(text)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
}

/// Lazy sequence of client IPs paired with a failure marker on the same line.
pub struct FailedLogins<'t> {
    lines: std::str::Lines<'t>,
    current: Option<LineFailures<'t>>,
}

impl<'t> Iterator for FailedLogins<'t> {
    type Item = &'t str;

    fn next(&mut self) -> Option<&'t str> {
        loop {
            if let Some(ip) = self.current.as_mut().and_then(Iterator::next) {
                return Some(ip);
            }
            let line = self.lines.next()?;
            self.current = Some(LineFailures { line, pos: 0 });
        }
    }
}

/// Scan `text` line by line for an IPv4 address followed later on the same
/// line by a failure marker.
///
/// After a pair is found the scan resumes past the marker, so a single line
/// can yield more than one pair. Tokens with out-of-range octets are skipped.
pub fn failed_logins(text: &str) -> FailedLogins<'_> {
    FailedLogins {
        lines: text.lines(),
        current: None,
    }
}

struct LineFailures<'t> {
    line: &'t str,
    pos: usize,
}

impl<'t> Iterator for LineFailures<'t> {
    type Item = &'t str;

    fn next(&mut self) -> Option<&'t str> {
        loop {
            let ip = next_ipv4_token(self.line, self.pos)?;
            if !is_valid_ipv4(ip.as_str()) {
                self.pos = ip.end();
                continue;
            }
            // No marker after this address means none after any later one either
            let marker = failure_marker().find_at(self.line, ip.end())?;
            self.pos = marker.end();
            return Some(ip.as_str());
        }
    }
}

fn next_ipv4_token(text: &str, mut pos: usize) -> Option<Match<'_>> {
    while pos <= text.len() {
        let m = ipv4_shape().find_at(text, pos)?;
        if is_bounded(text, m.start(), m.end()) {
            return Some(m);
        }
        pos = m.end();
    }
    None
}

/// A token must not be glued to a word or to a longer dotted number.
/// A trailing `.` is allowed unless a digit follows it.
fn is_bounded(text: &str, start: usize, end: usize) -> bool {
    let leading_ok = match text[..start].chars().next_back() {
        None => true,
        Some(c) => !is_word_char(c) && c != '.',
    };

    let mut after = text[end..].chars();
    let trailing_ok = match after.next() {
        None => true,
        Some('.') => !after.next().is_some_and(|c| c.is_ascii_digit()),
        Some(c) => !is_word_char(c),
    };

    leading_ok && trailing_ok
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

// ─── Unit Tests ──────────────────────────────────────────────────────────────
