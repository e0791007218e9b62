//! Traversal context definitions
//!
//! A context is handed down by value: descending into an album derives a new
//! one, while pagination continues with the context it was found under.

use std::fmt;

/// Separator placed before every album title in a lineage
pub const LINEAGE_SEPARATOR: char = '|';

/// Where in the album hierarchy a page sits
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TraversalContext {
    /// Ancestor album titles, each prefixed with `|` (`""`, `"|A"`, `"|A|B"`)
    pub lineage: String,

    /// Title of the page this context belongs to
    pub page_title: String,
}

impl TraversalContext {
    /// Context of the root page: no lineage, no title
    pub fn root() -> Self {
        Self::default()
    }

    /// Derives the context for a sub-album
    ///
    /// # Arguments
    ///
    /// * `album_title` - Title of the album link being followed
    /// * `page_title` - Title of the page the link led to
    pub fn descend(&self, album_title: &str, page_title: impl Into<String>) -> Self {
        let mut lineage = String::with_capacity(self.lineage.len() + album_title.len() + 1);
        lineage.push_str(&self.lineage);
        lineage.push(LINEAGE_SEPARATOR);
        lineage.push_str(album_title);

        Self {
            lineage,
            page_title: page_title.into(),
        }
    }
}

impl fmt::Display for TraversalContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.lineage.is_empty() {
            write!(f, "<root>")
        } else {
            write!(f, "{}", self.lineage)
        }
    }
}

/// Monotonic visit ordinal owned by a single traversal run
///
/// Only used to number log output; traversal decisions never read it.
#[derive(Debug, Default)]
pub struct VisitCounter(u64);

impl VisitCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current ordinal and advances the counter
    pub fn advance(&mut self) -> u64 {
        let current = self.0;
        self.0 += 1;
        current
    }

    /// Number of ordinals handed out so far
    pub fn count(&self) -> u64 {
        self.0
    }
}
