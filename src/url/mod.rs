//! URL handling module for Album-Harvest
//!
//! This module provides identifier extraction from gallery URLs and the
//! prefix-based resolution of relative links against the site origin.

mod identifier;

// Re-export main functions
pub use identifier::{album_id, item_id};

/// Resolves a link found on a gallery page against the site base URL
///
/// Gallery links are always relative to the site root, so resolution is a
/// plain concatenation. No normalization is applied to either part.
///
/// # Examples
///
/// ```
/// use album_harvest::url::resolve;
///
/// assert_eq!(
///     resolve("https://amo.ala.org.au/", "main.php?g2_itemId=42"),
///     "https://amo.ala.org.au/main.php?g2_itemId=42"
/// );
/// ```
pub fn resolve(base_url: &str, href: &str) -> String {
    format!("{}{}", base_url, href)
}
