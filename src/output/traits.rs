//! Record sink trait and record types
//!
//! This module defines the trait interface for record sinks and the
//! record emitted for every harvested item.

use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Column names of the output, in order
pub const OUTPUT_COLUMNS: [&str; 6] = [
    "itemId",
    "family",
    "scientificName",
    "fileName",
    "imageThumbnailUrl",
    "description",
];

/// Value written to `fileName` and `description` for broken album links
pub const MISSING: &str = "missing";

/// One harvested row
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputRecord {
    /// Identifier cut from the image (or album) URL; may be empty
    pub item_id: String,

    /// Lineage of album titles the item was found under
    pub family: String,

    /// Title of the page the item was listed on
    pub scientific_name: String,

    pub file_name: String,

    pub image_thumbnail_url: String,

    /// Description markup, kept verbatim
    pub description: String,
}

impl OutputRecord {
    /// Builds the placeholder row for an album link that soft-redirected home
    ///
    /// # Arguments
    ///
    /// * `album_id` - Identifier extracted from the broken link
    /// * `lineage` - Lineage of the page holding the link
    /// * `album_title` - Title of the broken link
    /// * `thumbnail_url` - Thumbnail shown next to the broken link
    pub fn missing(album_id: &str, lineage: &str, album_title: &str, thumbnail_url: &str) -> Self {
        Self {
            item_id: album_id.to_string(),
            family: lineage.to_string(),
            scientific_name: album_title.to_string(),
            file_name: MISSING.to_string(),
            image_thumbnail_url: thumbnail_url.to_string(),
            description: MISSING.to_string(),
        }
    }

    /// Returns true if this is a broken-link placeholder
    pub fn is_placeholder(&self) -> bool {
        self.file_name == MISSING && self.description == MISSING
    }

    /// Field values in column order
    pub fn fields(&self) -> [&str; 6] {
        [
            self.item_id.as_str(),
            self.family.as_str(),
            self.scientific_name.as_str(),
            self.file_name.as_str(),
            self.image_thumbnail_url.as_str(),
            self.description.as_str(),
        ]
    }
}

/// Trait for record sinks
///
/// The traversal emits records one at a time and flushes after each page's
/// batch, so everything emitted before a fatal error has been flushed.
pub trait RecordSink {
    /// Writes a single record
    fn emit(&mut self, record: &OutputRecord) -> OutputResult<()>;

    /// Persists everything emitted so far
    fn flush(&mut self) -> OutputResult<()>;
}

impl<S: RecordSink> RecordSink for &mut S {
    fn emit(&mut self, record: &OutputRecord) -> OutputResult<()> {
        (**self).emit(record)
    }

    fn flush(&mut self) -> OutputResult<()> {
        (**self).flush()
    }
}
