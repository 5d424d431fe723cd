use std::fmt;
use std::str::FromStr;

/// Separator between the segments of a textual path.
pub const SEPARATOR: char = '/';

/// Returns true when `name` can be used as a single path segment.
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && !name.contains(SEPARATOR)
}

/// Location of a node, as the walk of names from the root.
///
/// A path with zero segments is the root itself. Segments are never empty and
/// never contain [`SEPARATOR`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodePath {
    segments: Vec<String>,
}

impl NodePath {
    pub fn root() -> Self {
        Self::default()
    }

    /// Parses a textual path. Empty pieces are dropped, so `/A/B/`, `A/B`
    /// and `//A//B` all denote the same location.
    pub fn parse(text: &str) -> Self {
        let segments = text
            .split(SEPARATOR)
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect();
        Self { segments }
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Last segment, or `None` for the root.
    pub fn name(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Containing folder path, or `None` for the root.
    pub fn parent(&self) -> Option<NodePath> {
        let (_, init) = self.segments.split_last()?;
        Some(Self {
            segments: init.to_vec(),
        })
    }

    /// Returns this path extended by one segment. The caller is responsible
    /// for having validated `name`.
    pub fn join(&self, name: &str) -> NodePath {
        let mut segments = self.segments.clone();
        segments.push(name.to_string());
        Self { segments }
    }

    /// True when `self` equals `other` or lies below it.
    pub fn starts_with(&self, other: &NodePath) -> bool {
        self.segments.starts_with(&other.segments)
    }

    /// Every prefix of this path, from the root down to the path itself.
    pub fn prefixes(&self) -> impl Iterator<Item = NodePath> + '_ {
        (0..=self.segments.len()).map(|n| Self {
            segments: self.segments[..n].to_vec(),
        })
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return write!(f, "{SEPARATOR}");
        }
        for segment in &self.segments {
            write!(f, "{SEPARATOR}{segment}")?;
        }
        Ok(())
    }
}

impl FromStr for NodePath {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<&str> for NodePath {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}
