//! `/fixed/:param` path templates.

use core::fmt;

use indexmap::IndexMap;

/// Splits a path on `/`, ignoring trailing empty segments.
fn segments(path: &str) -> Vec<&str> {
    let mut parts: Vec<&str> = path.split('/').collect();
    while parts.last().is_some_and(|part| part.is_empty()) {
        parts.pop();
    }
    parts
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Fixed(String),
    Param(String),
}

/// A parsed route template.
///
/// Segments starting with `:` capture whatever the path holds at that
/// position. A path only matches when it has exactly as many segments as the
/// pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    raw: String,
    segments: Vec<Segment>,
}

impl RoutePattern {
    /// Parses a template. Every string is a valid template.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let segments = segments(raw)
            .into_iter()
            .map(|part| {
                part.strip_prefix(':').map_or_else(
                    || Segment::Fixed(part.to_owned()),
                    |name| Segment::Param(name.to_owned()),
                )
            })
            .collect();
        Self {
            raw: raw.to_owned(),
            segments,
        }
    }

    /// The template as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns `true` if the template has at least one `:param` segment.
    #[must_use]
    pub fn is_dynamic(&self) -> bool {
        self.segments
            .iter()
            .any(|segment| matches!(segment, Segment::Param(_)))
    }

    /// Matches `path`, returning the captured parameters.
    #[must_use]
    pub fn matches(&self, path: &str) -> Option<RouteParams> {
        let parts = segments(path);
        if parts.len() != self.segments.len() {
            return None;
        }

        let mut params = RouteParams::default();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Fixed(fixed) if fixed != part => return None,
                Segment::Fixed(_) => {}
                Segment::Param(name) => {
                    params.values.insert(name.clone(), part.to_owned());
                }
            }
        }
        Some(params)
    }
}

impl fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Parameters captured from a path, in template order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteParams {
    values: IndexMap<String, String>,
}

impl RouteParams {
    /// The value captured for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Number of captured parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if nothing was captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over `(name, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
