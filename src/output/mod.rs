//! Output module for harvested records
//!
//! This module handles:
//! - The record sink interface the traversal writes to
//! - Writing records as CSV
//! - Collecting and printing harvest statistics
//! - Digesting the written file so runs can be compared

mod csv_output;
#[cfg(test)]
mod memory;
pub mod stats;
mod traits;

pub use csv_output::CsvSink;
#[cfg(test)]
pub(crate) use memory::MemorySink;
pub use stats::{print_statistics, CrawlStatistics};
pub use traits::{OutputError, OutputRecord, OutputResult, RecordSink, MISSING, OUTPUT_COLUMNS};

use sha2::{Digest, Sha256};
use std::path::Path;

/// Computes the hex-encoded SHA-256 digest of a written output file
///
/// Two harvests of an unchanged site produce the same digest.
///
/// # Arguments
///
/// * `path` - Path to the output file
pub fn digest_file(path: &Path) -> OutputResult<String> {
    let content = std::fs::read(path)?;
    let mut hasher = Sha256::new();
    hasher.update(&content);
    Ok(hex::encode(hasher.finalize()))
}
