//! Path patterns
//!
//! Patterns are `/`-separated segments, each either a literal or a `:name`
//! parameter. Matching works on already-split request segments so nested
//! routes can consume a prefix and hand the remainder to their children.

use super::Params;

/// One segment of a route pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Static(&'static str),
    Param(&'static str),
}

/// Parsed route pattern, relative to its parent
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PathPattern {
    segments: Vec<Segment>,
}

impl PathPattern {
    pub fn parse(pattern: &'static str) -> Self {
        let segments = pattern
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| match s.strip_prefix(':') {
                Some(name) if !name.is_empty() => Segment::Param(name),
                _ => Segment::Static(s),
            })
            .collect();

        Self { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Match this pattern against the front of `path`
    ///
    /// Returns the captured params and the number of segments consumed.
    pub fn match_prefix(&self, path: &[&str]) -> Option<(Params, usize)> {
        if path.len() < self.segments.len() {
            return None;
        }

        let mut params = Params::new();
        for (segment, actual) in self.segments.iter().zip(path) {
            match segment {
                Segment::Static(expected) => {
                    if expected != actual {
                        return None;
                    }
                }
                Segment::Param(name) => {
                    let value = urlencoding::decode(actual)
                        .map(|v| v.into_owned())
                        .unwrap_or_else(|_| actual.to_string());
                    params.insert(name.to_string(), value);
                }
            }
        }

        Some((params, self.segments.len()))
    }

    /// Match the whole of `path`
    pub fn match_exact(&self, path: &[&str]) -> Option<Params> {
        if path.len() != self.segments.len() {
            return None;
        }
        self.match_prefix(path).map(|(params, _)| params)
    }

    /// Render the pattern for display, e.g. `receipt/:bookingId`
    pub fn display(&self) -> String {
        self.segments
            .iter()
            .map(|s| match s {
                Segment::Static(s) => s.to_string(),
                Segment::Param(name) => format!(":{}", name),
            })
            .collect::<Vec<_>>()
            .join("/")
    }
}

/// Split a request path into segments
///
/// Query string and fragment are dropped, as are empty segments, so
/// `/admin/`, `admin` and `/admin?tab=1` all yield `["admin"]`.
pub fn split_path(path: &str) -> Vec<&str> {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    path[..end].split('/').filter(|s| !s.is_empty()).collect()
}

/// Canonical form of a request path
pub fn normalize(path: &str) -> String {
    format!("/{}", split_path(path).join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_path() {
        assert_eq!(split_path("/"), Vec::<&str>::new());
        assert_eq!(split_path(""), Vec::<&str>::new());
        assert_eq!(split_path("/admin/rooms/"), vec!["admin", "rooms"]);
        assert_eq!(split_path("//admin//rooms"), vec!["admin", "rooms"]);
        assert_eq!(split_path("/admin?tab=2#top"), vec!["admin"]);
        assert_eq!(split_path("/a#frag/ment"), vec!["a"]);
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(""), "/");
        assert_eq!(normalize("/receptionist/dashboard/?x=1"), "/receptionist/dashboard");
    }

    #[test]
    fn test_static_prefix() {
        let pattern = PathPattern::parse("/coupons/select");
        assert_eq!(
            pattern.match_prefix(&["coupons", "select", "more"]),
            Some((Params::new(), 2))
        );
        assert_eq!(pattern.match_prefix(&["coupons"]), None);
        assert_eq!(pattern.match_exact(&["coupons", "select", "more"]), None);
    }

    #[test]
    fn test_param_capture_is_decoded() {
        let pattern = PathPattern::parse("receipt/:bookingId");
        let params = pattern.match_exact(&["receipt", "BK%2042"]).unwrap();
        assert_eq!(params.get("bookingId").map(String::as_str), Some("BK 42"));
    }

    #[test]
    fn test_empty_pattern_matches_anything_as_prefix() {
        let pattern = PathPattern::parse("");
        assert!(pattern.is_empty());
        assert_eq!(pattern.match_prefix(&["about"]), Some((Params::new(), 0)));
        assert_eq!(pattern.match_exact(&[]), Some(Params::new()));
    }

    #[test]
    fn test_bare_colon_is_static() {
        let pattern = PathPattern::parse("/:");
        assert_eq!(pattern.segments(), &[Segment::Static(":")]);
        assert_eq!(pattern.display(), ":");
        assert_eq!(PathPattern::parse("attractions/:id").display(), "attractions/:id");
    }
}
