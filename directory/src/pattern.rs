//! Path pattern matching for route lists.
//!
//! Patterns are segment-based: literal segments match case-sensitively,
//! `:name` matches exactly one non-empty segment, and `*` matches the
//! remainder of the path (including nothing). Matching is evaluated
//! end-to-end against the full sub-path — a pattern never matches a mere
//! prefix of a longer path. A single trailing slash on either side is
//! ignored.

/// A parsed path pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    segments: Vec<Segment>,
    source: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
    Wildcard,
}

impl PathPattern {
    /// Parse a pattern string such as `/dashboards/:id` or `/reports/*`.
    pub fn parse(pattern: &str) -> Self {
        let segments = split(pattern)
            .map(|seg| {
                if seg == "*" {
                    Segment::Wildcard
                } else if let Some(name) = seg.strip_prefix(':') {
                    Segment::Param(name.to_string())
                } else {
                    Segment::Literal(seg.to_string())
                }
            })
            .collect();
        Self {
            segments,
            source: pattern.to_string(),
        }
    }

    /// The pattern string this was parsed from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Whether `path` matches this pattern end-to-end.
    pub fn matches(&self, path: &str) -> bool {
        let parts: Vec<&str> = split(path).collect();
        Self::match_from(&self.segments, &parts)
    }

    fn match_from(segments: &[Segment], parts: &[&str]) -> bool {
        match segments.split_first() {
            None => parts.is_empty(),
            Some((Segment::Wildcard, rest)) => {
                // `*` absorbs zero or more trailing segments; anything after
                // it must still match some suffix.
                if rest.is_empty() {
                    return true;
                }
                (0..=parts.len()).any(|skip| Self::match_from(rest, &parts[skip..]))
            }
            Some((Segment::Param(_), rest)) => match parts.split_first() {
                Some((_, tail)) => Self::match_from(rest, tail),
                None => false,
            },
            Some((Segment::Literal(lit), rest)) => match parts.split_first() {
                Some((part, tail)) if part == lit => Self::match_from(rest, tail),
                _ => false,
            },
        }
    }
}

/// Find the first pattern in an ordered list matching `path`.
///
/// Returns the matching pattern string. Order is significant: these lists
/// carry first-match-wins precedence, so callers must not reorder them.
pub fn first_match<'a, I>(patterns: I, path: &str) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a String>,
{
    patterns
        .into_iter()
        .find(|p| PathPattern::parse(p).matches(path))
        .map(|p| p.as_str())
}

fn split(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|seg| !seg.is_empty())
}
