//! Path pattern matching.
//!
//! # Responsibilities
//! - Percent-decode request paths before matching
//! - Normalize request paths (empty segments dropped, trailing slash ignored)
//! - Match static patterns exactly, segment by segment
//! - Match catch-all patterns (`/prefix/*`) on segment boundaries
//!
//! # Design Decisions
//! - Case-insensitive by default, opt-in case sensitivity per route
//! - Dynamic segments (`:id`) are rejected at compile time
//! - No regex to keep matching linear in the number of segments

use std::borrow::Cow;
use std::fmt;

use percent_encoding::percent_decode_str;

use crate::routing::router::RouteError;

/// Trait for matching request paths against a compiled pattern.
pub trait Matcher: Send + Sync + fmt::Debug {
    /// Returns true if the path matches this pattern.
    fn matches(&self, path: &str) -> bool;
}

/// Percent-decode a request path.
///
/// A path whose escapes do not decode to UTF-8 is returned unchanged.
pub fn decode_path(path: &str) -> Cow<'_, str> {
    percent_decode_str(path)
        .decode_utf8()
        .unwrap_or(Cow::Borrowed(path))
}

/// Collapse repeated slashes and strip the trailing one.
///
/// `""`, `"/"` and `"//"` all normalize to `"/"`.
pub fn normalize_path(path: &str) -> String {
    let mut out = String::with_capacity(path.len() + 1);
    for segment in segments(path) {
        out.push('/');
        out.push_str(segment);
    }
    if out.is_empty() {
        out.push('/');
    }
    out
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// A compiled path pattern.
#[derive(Debug, Clone)]
pub struct PathMatcher {
    segments: Vec<String>,
    splat: bool,
    case_sensitive: bool,
}

impl PathMatcher {
    /// Compile a pattern such as `/`, `/exercises` or `/docs/*`.
    pub fn parse(pattern: &str, case_sensitive: bool) -> Result<Self, RouteError> {
        if !pattern.starts_with('/') {
            return Err(RouteError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: "must start with '/'",
            });
        }

        let mut parts: Vec<&str> = segments(pattern).collect();
        let splat = parts.last() == Some(&"*");
        if splat {
            parts.pop();
        }

        for part in &parts {
            if part.contains('*') {
                return Err(RouteError::InvalidPattern {
                    pattern: pattern.to_string(),
                    reason: "'*' is only allowed as the final segment",
                });
            }
            if part.starts_with(':') {
                return Err(RouteError::InvalidPattern {
                    pattern: pattern.to_string(),
                    reason: "dynamic segments are not supported",
                });
            }
        }

        Ok(Self {
            segments: parts.into_iter().map(str::to_string).collect(),
            splat,
            case_sensitive,
        })
    }

    /// True for `/*`-terminated patterns.
    pub fn is_catch_all(&self) -> bool {
        self.splat
    }

    /// True if every path accepted by `other` is also accepted by `self`.
    pub fn covers(&self, other: &PathMatcher) -> bool {
        if self.splat {
            other.segments.len() >= self.segments.len()
                && self
                    .segments
                    .iter()
                    .zip(&other.segments)
                    .all(|(a, b)| self.segment_covers(a, b, other.case_sensitive))
        } else {
            !other.splat
                && self.segments.len() == other.segments.len()
                && self
                    .segments
                    .iter()
                    .zip(&other.segments)
                    .all(|(a, b)| self.segment_covers(a, b, other.case_sensitive))
        }
    }

    fn segment_covers(&self, ours: &str, theirs: &str, theirs_case_sensitive: bool) -> bool {
        match (self.case_sensitive, theirs_case_sensitive) {
            // A case-insensitive route also accepts case variants we would reject.
            (true, false) => ours == theirs && !ours.chars().any(|c| c.is_ascii_alphabetic()),
            (true, true) => ours == theirs,
            (false, _) => ours.eq_ignore_ascii_case(theirs),
        }
    }

    fn segment_eq(&self, pattern: &str, actual: &str) -> bool {
        if self.case_sensitive {
            pattern == actual
        } else {
            pattern.eq_ignore_ascii_case(actual)
        }
    }
}

impl Matcher for PathMatcher {
    fn matches(&self, path: &str) -> bool {
        let mut actual = segments(path);
        for expected in &self.segments {
            match actual.next() {
                Some(seg) if self.segment_eq(expected, seg) => {}
                _ => return false,
            }
        }
        self.splat || actual.next().is_none()
    }
}

impl fmt::Display for PathMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            write!(f, "/{}", segment)?;
        }
        match (self.segments.is_empty(), self.splat) {
            (_, true) => f.write_str("/*"),
            (true, false) => f.write_str("/"),
            (false, false) => Ok(()),
        }
    }
}
