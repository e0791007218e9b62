//! Harvest statistics
//!
//! Counters collected by the traversal and printed at the end of a run.

use std::time::Duration;

/// Crawl statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStatistics {
    /// Total number of pages fetched, root included
    pub pages_fetched: u64,

    /// Pages classified as album lists
    pub album_pages: u64,

    /// Pages classified as item lists
    pub item_pages: u64,

    /// Pages with neither albums nor items
    pub empty_pages: u64,

    /// Pagination links followed to a real page
    pub pagination_pages: u64,

    /// Item records emitted (placeholders excluded)
    pub records_emitted: u64,

    /// Placeholder records emitted for album links that redirected home
    pub placeholders: u64,

    /// Pagination links that redirected home
    pub broken_pagination_links: u64,

    /// Album or item entries skipped for a missing title, url, description or image
    pub skipped_entries: u64,
}

impl CrawlStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows written to the sink, placeholders included
    pub fn total_rows(&self) -> u64 {
        self.records_emitted + self.placeholders
    }

    /// Broken links of either kind
    pub fn broken_links(&self) -> u64 {
        self.placeholders + self.broken_pagination_links
    }
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
/// * `elapsed` - Wall-clock duration of the harvest
pub fn print_statistics(stats: &CrawlStatistics, elapsed: Duration) {
    println!("=== Harvest Statistics ===\n");

    println!("Pages:");
    println!("  Fetched: {}", stats.pages_fetched);
    println!("  Album lists: {}", stats.album_pages);
    println!("  Item lists: {}", stats.item_pages);
    println!("  Empty: {}", stats.empty_pages);
    println!("  Pagination pages followed: {}", stats.pagination_pages);
    println!();

    println!("Rows:");
    println!("  Items: {}", stats.records_emitted);
    println!("  Placeholders (broken album links): {}", stats.placeholders);
    println!("  Total: {}", stats.total_rows());
    println!();

    if stats.broken_links() > 0 || stats.skipped_entries > 0 {
        println!("Problems:");
        println!("  Broken pagination links: {}", stats.broken_pagination_links);
        println!("  Skipped entries: {}", stats.skipped_entries);
        println!();
    }

    let secs = elapsed.as_secs_f64();
    let rate = if secs > 0.0 {
        stats.pages_fetched as f64 / secs
    } else {
        0.0
    };
    println!("Elapsed: {:.1}s ({:.2} pages/sec)", secs, rate);
}
