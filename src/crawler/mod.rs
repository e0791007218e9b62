//! Crawler module for gallery traversal
//!
//! This module contains the core harvesting logic, including:
//! - Page fetching over HTTP (or from memory)
//! - HTML page querying
//! - Page classification and entry extraction
//! - The depth-first album traversal

mod classifier;
mod fetcher;
mod page;
mod traverser;

pub use classifier::{
    album_links, classify, is_home_redirect, item_entries, next_page_link, AlbumLink, ItemEntry,
    PageKind,
};
pub use fetcher::{build_http_client, HttpFetcher, PageFetcher};
pub use page::{HtmlPage, PageElement};
pub use traverser::Traverser;

use crate::config::Config;
use crate::output::{CrawlStatistics, CsvSink};
use crate::Result;
use std::path::Path;

/// Runs a complete harvest
///
/// This is the main entry point for a harvest. It will:
/// 1. Build the HTTP fetcher
/// 2. Create the CSV file and write its header
/// 3. Walk the gallery from the root page, writing one row per item
///
/// # Arguments
///
/// * `config` - The harvest configuration
///
/// # Returns
///
/// * `Ok(CrawlStatistics)` - Harvest completed
/// * `Err(HarvestError)` - Harvest aborted; rows flushed so far stay in the file
///
/// # Example
///
/// ```no_run
/// use album_harvest::config::Config;
/// use album_harvest::crawler::harvest;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let stats = harvest(&Config::default()).await?;
/// println!("{} rows", stats.total_rows());
/// # Ok(())
/// # }
/// ```
pub async fn harvest(config: &Config) -> Result<CrawlStatistics> {
    let fetcher = HttpFetcher::new(&config.fetch)?;
    let sink = CsvSink::create(Path::new(&config.output.csv_path))?;

    let mut traverser = Traverser::new(config, fetcher, sink);
    traverser.run().await
}
