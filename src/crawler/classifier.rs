//! Page classification and entry extraction
//!
//! A gallery page is either a list of albums, a list of items, or neither.
//! Classification is purely structural: it looks at which cells are present,
//! never at the URL.

use crate::config::SelectorConfig;
use crate::crawler::page::HtmlPage;
use crate::url::{album_id, item_id};

/// What a gallery page contains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageKind {
    /// One or more album cells (checked first)
    AlbumList,
    /// One or more item cells and no album cells
    ItemList,
    /// Neither
    Empty,
}

/// Classifies a fetched page
///
/// Album cells take precedence when both kinds of cell are present.
pub fn classify(page: &HtmlPage, selectors: &SelectorConfig) -> PageKind {
    if !page.select(&selectors.album_cell).is_empty() {
        PageKind::AlbumList
    } else if !page.select(&selectors.item_cell).is_empty() {
        PageKind::ItemList
    } else {
        PageKind::Empty
    }
}

/// One entry of an album-list page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumLink {
    pub title: String,
    /// Link target, relative to the site base URL
    pub url: String,
    pub thumbnail_url: String,
    /// Identifier cut from `url`; empty when the URL is too short
    pub id: String,
}

impl AlbumLink {
    /// Only links with both a title and a target are followed
    pub fn is_complete(&self) -> bool {
        !self.title.is_empty() && !self.url.is_empty()
    }
}

/// One entry of an item-list page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemEntry {
    /// Description markup
    pub description: String,
    pub image_url: String,
    pub image_filename: String,
    /// Identifier cut from `image_url`; empty when the URL is too short
    pub id: String,
}

impl ItemEntry {
    /// Only items with both a description and an image are emitted
    pub fn is_complete(&self) -> bool {
        !self.description.is_empty() && !self.image_url.is_empty()
    }
}

/// Reads every album cell on the page, complete or not, in markup order
pub fn album_links(page: &HtmlPage, selectors: &SelectorConfig) -> Vec<AlbumLink> {
    page.select(&selectors.album_cell)
        .iter()
        .map(|cell| {
            let url = cell.select_attribute(&selectors.link, "href");
            AlbumLink {
                title: cell.select_attribute(&selectors.image, "alt"),
                thumbnail_url: cell.select_attribute(&selectors.image, "src"),
                id: album_id(&url),
                url,
            }
        })
        .collect()
}

/// Reads every item cell on the page, complete or not, in markup order
pub fn item_entries(page: &HtmlPage, selectors: &SelectorConfig) -> Vec<ItemEntry> {
    page.select(&selectors.item_cell)
        .iter()
        .map(|cell| {
            let image_url = cell.select_attribute(&selectors.image, "src");
            ItemEntry {
                description: cell.select_html(&selectors.description),
                image_filename: cell.select_attribute(&selectors.image, "alt"),
                id: item_id(&image_url),
                image_url,
            }
        })
        .collect()
}

/// Returns the href of the first pagination link, if there is a usable one
pub fn next_page_link(page: &HtmlPage, selectors: &SelectorConfig) -> Option<String> {
    let href = page.select(&selectors.next_link).first()?.attribute("href");
    if href.is_empty() {
        tracing::debug!("Ignoring pagination link without href");
        return None;
    }
    Some(href)
}

/// Returns true if `title` belongs to the site home page
///
/// The gallery answers stale album links by serving its home page, so a
/// sub-page carrying the home title is a broken link.
pub fn is_home_redirect(title: &str, home_title: &str) -> bool {
    title.contains(home_title)
}
