//! Hierarchical account paths.
//!
//! A path is an ordered list of segments such as `Aufwand : Büro : Material`.
//! Every constructor normalizes its input, so two spellings of the same
//! path compare and hash identically:
//!
//! ```
//! use hauptbuch_core::account::AccountPath;
//!
//! let a = AccountPath::normalize("Aufwand:Büro");
//! let b = AccountPath::normalize("  Aufwand  ::  Büro ");
//! assert_eq!(a, b);
//! assert_eq!(a.to_string(), "Aufwand : Büro");
//! ```

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::PathError;

/// Canonical separator between segments.
pub const SEPARATOR: &str = " : ";

/// Default maximum number of segments.
pub const DEFAULT_MAX_DEPTH: usize = 6;

/// Rendering styles for [`AccountPath::display`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayFormat {
    /// `Aufwand → Büro → Material`
    Arrow,
    /// Leaf indented by depth: `    └─ Material`
    LeafWithDepth,
    /// All but the last two segments abbreviated: `A : Büro : Material`
    Compact,
}

/// A normalized account path.
///
/// The zero-segment path is the (invisible) root; it normalizes fine but
/// never validates.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct AccountPath {
    segments: Vec<String>,
}

impl AccountPath {
    /// Normalizes raw input: splits on `:`, collapses whitespace inside
    /// segments, and drops empty segments. Never fails.
    #[must_use]
    pub fn normalize(raw: &str) -> Self {
        let segments = raw
            .split(':')
            .map(|segment| segment.split_whitespace().collect::<Vec<_>>().join(" "))
            .filter(|segment| !segment.is_empty())
            .collect();
        Self { segments }
    }

    /// Builds a path from individual segments, normalizing each of them.
    #[must_use]
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = segments
            .into_iter()
            .map(|s| s.as_ref().to_string())
            .collect::<Vec<_>>()
            .join(":");
        Self::normalize(&joined)
    }

    /// Normalizes and validates in one step.
    pub fn parse(raw: &str, max_depth: usize) -> Result<Self, PathError> {
        let path = Self::normalize(raw);
        path.validate(max_depth)?;
        Ok(path)
    }

    /// Checks the path against the structural rules.
    pub fn validate(&self, max_depth: usize) -> Result<(), PathError> {
        if self.segments.is_empty() {
            return Err(PathError::EmptyPath);
        }
        if self.segments.len() > max_depth {
            return Err(PathError::ExceedsMaxDepth {
                max: max_depth,
                depth: self.segments.len(),
            });
        }
        Ok(())
    }

    /// The segments, root first.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Number of segments.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// True for the zero-segment root path.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// The last segment.
    #[must_use]
    pub fn leaf(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// All but the last segment; `None` for depth 0 or 1.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        if self.segments.len() < 2 {
            return None;
        }
        Some(Self {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    /// Every prefix path from the root down to and including `self`.
    #[must_use]
    pub fn ancestors(&self) -> Vec<Self> {
        (1..=self.segments.len())
            .map(|len| Self {
                segments: self.segments[..len].to_vec(),
            })
            .collect()
    }

    /// Like [`ancestors`](Self::ancestors) without `self`.
    #[must_use]
    pub fn ancestors_without_self(&self) -> Vec<Self> {
        let mut all = self.ancestors();
        all.pop();
        all
    }

    /// Appends `child` below `parent`; an empty side yields the other side.
    #[must_use]
    pub fn join(parent: &Self, child: &Self) -> Self {
        if parent.is_empty() {
            return child.clone();
        }
        if child.is_empty() {
            return parent.clone();
        }
        let mut segments = parent.segments.clone();
        segments.extend(child.segments.iter().cloned());
        Self { segments }
    }

    /// Appends a raw child segment (or sub-path).
    #[must_use]
    pub fn child(&self, raw: &str) -> Self {
        Self::join(self, &Self::normalize(raw))
    }

    /// True iff `self` is a strict prefix of `other`.
    #[must_use]
    pub fn is_ancestor_of(&self, other: &Self) -> bool {
        self.segments.len() < other.segments.len() && other.segments.starts_with(&self.segments)
    }

    /// True iff `other` is a strict prefix of `self`.
    #[must_use]
    pub fn is_descendant_of(&self, other: &Self) -> bool {
        other.is_ancestor_of(self)
    }

    /// True iff both paths share a parent and differ. Two depth-1 paths
    /// share the root as parent.
    #[must_use]
    pub fn is_sibling_of(&self, other: &Self) -> bool {
        let depth = self.segments.len();
        depth > 0
            && depth == other.segments.len()
            && self != other
            && self.segments[..depth - 1] == other.segments[..depth - 1]
    }

    /// Renders the path in the requested style.
    #[must_use]
    pub fn display(&self, format: DisplayFormat) -> String {
        match format {
            DisplayFormat::Arrow => self.segments.join(" → "),
            DisplayFormat::LeafWithDepth => {
                let Some(leaf) = self.leaf() else {
                    return String::new();
                };
                if self.depth() == 1 {
                    return leaf.to_string();
                }
                format!("{}└─ {leaf}", "  ".repeat(self.depth() - 1))
            }
            DisplayFormat::Compact => {
                let keep_from = self.segments.len().saturating_sub(2);
                self.segments
                    .iter()
                    .enumerate()
                    .map(|(i, segment)| {
                        if i < keep_from {
                            segment.chars().take(1).collect()
                        } else {
                            segment.clone()
                        }
                    })
                    .collect::<Vec<String>>()
                    .join(SEPARATOR)
            }
        }
    }
}

impl fmt::Display for AccountPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join(SEPARATOR))
    }
}

impl FromStr for AccountPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::normalize(s))
    }
}

impl From<&str> for AccountPath {
    fn from(raw: &str) -> Self {
        Self::normalize(raw)
    }
}

impl From<String> for AccountPath {
    fn from(raw: String) -> Self {
        Self::normalize(&raw)
    }
}

impl From<AccountPath> for String {
    fn from(path: AccountPath) -> Self {
        path.to_string()
    }
}
