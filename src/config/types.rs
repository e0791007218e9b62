use serde::Deserialize;

/// Main configuration structure for Album-Harvest
///
/// Every section is optional; the defaults describe the Australian Moths
/// Online gallery.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub selectors: SelectorConfig,
}

impl Config {
    /// URL of the gallery page the traversal starts from
    pub fn start_url(&self) -> String {
        crate::url::resolve(&self.site.base_url, &self.site.root_path)
    }
}

/// Target site description
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Origin every relative href/src is prefixed with (must end with '/')
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Path of the root album page, relative to the base URL
    #[serde(rename = "root-path")]
    pub root_path: String,

    /// Title fragment of the home page; sub-pages carrying it are soft redirects
    #[serde(rename = "home-title")]
    pub home_title: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://amo.ala.org.au/".to_string(),
            root_path: "main.php".to_string(),
            home_title: "Australian Moths Online".to_string(),
        }
    }
}

/// HTTP fetch configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Per-request timeout in seconds
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Skip TLS certificate validation (the gallery serves a non-standard chain)
    #[serde(rename = "accept-invalid-certs")]
    pub accept_invalid_certs: bool,

    #[serde(rename = "user-agent")]
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            accept_invalid_certs: true,
            user_agent: format!("album-harvest/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path to the CSV file the records are written to
    #[serde(rename = "csv-path")]
    pub csv_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            csv_path: "./amo_data.csv".to_string(),
        }
    }
}

/// CSS selectors used to read gallery pages
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// One entry of an album-list page
    #[serde(rename = "album-cell")]
    pub album_cell: String,

    /// One entry of an item-list page
    #[serde(rename = "item-cell")]
    pub item_cell: String,

    /// Pagination link on an album-list page
    #[serde(rename = "next-link")]
    pub next_link: String,

    /// Item description block (markup kept as-is)
    pub description: String,

    /// Image element, read for `src` and `alt`
    pub image: String,

    /// Link element, read for `href`
    pub link: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            album_cell: ".giAlbumCell div".to_string(),
            item_cell: ".giItemCell".to_string(),
            next_link: ".next-and-last .next".to_string(),
            description: ".giDescription2".to_string(),
            image: "img".to_string(),
            link: "a".to_string(),
        }
    }
}

impl SelectorConfig {
    /// Returns (name, selector) pairs, used for validation and dry-run output
    pub fn entries(&self) -> [(&'static str, &str); 6] {
        [
            ("album-cell", self.album_cell.as_str()),
            ("item-cell", self.item_cell.as_str()),
            ("next-link", self.next_link.as_str()),
            ("description", self.description.as_str()),
            ("image", self.image.as_str()),
            ("link", self.link.as_str()),
        ]
    }
}
