//! Page fetching
//!
//! This module handles retrieving gallery pages, including:
//! - Building the HTTP client (user agent, timeout, certificate handling)
//! - Fetching and parsing a page over HTTP
//!
//! Every failure is reported as a [`FetchError`]; there is no retry.

use crate::config::FetchConfig;
use crate::crawler::page::HtmlPage;
use crate::{FetchError, FetchResult};
use reqwest::Client;
use std::time::Duration;

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::collections::HashMap;

/// Source of gallery pages
///
/// The traversal awaits one fetch at a time, so implementations need not be
/// `Send` or re-entrant.
#[allow(async_fn_in_trait)]
pub trait PageFetcher {
    /// Fetches and parses the page at `url`
    async fn fetch(&self, url: &str) -> FetchResult<HtmlPage>;
}

/// Builds an HTTP client from the fetch configuration
///
/// Redirects are followed (reqwest's default policy); soft redirects to the
/// home page are detected later from the page title.
///
/// # Example
///
/// ```no_run
/// use album_harvest::config::FetchConfig;
/// use album_harvest::crawler::build_http_client;
///
/// let client = build_http_client(&FetchConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &FetchConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.timeout_secs))
        .danger_accept_invalid_certs(config.accept_invalid_certs)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches pages over HTTP
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher with a client built from `config`
    pub fn new(config: &FetchConfig) -> FetchResult<Self> {
        if config.accept_invalid_certs {
            tracing::debug!("TLS certificate validation is disabled for this harvest");
        }
        let client = build_http_client(config).map_err(FetchError::Client)?;
        Ok(Self { client })
    }
}

impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> FetchResult<HtmlPage> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| classify_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        if response.url().as_str() != url {
            tracing::debug!("{} redirected to {}", url, response.url());
        }

        let body = response.text().await.map_err(|e| classify_error(url, e))?;
        Ok(HtmlPage::parse(&body))
    }
}

/// Maps a transport error onto the fetch error taxonomy
fn classify_error(url: &str, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Http {
            url: url.to_string(),
            source: error,
        }
    }
}

/// A fixed set of pages held in memory, keyed by absolute URL
///
/// Unknown URLs answer like an HTTP 404. Every request is recorded so tests
/// can check what was fetched and in which order.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct StaticSite {
    pages: HashMap<String, String>,
    requests: RefCell<Vec<String>>,
}

#[cfg(test)]
impl StaticSite {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the HTML served at `url`
    pub fn with_page(mut self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.pages.insert(url.into(), html.into());
        self
    }

    /// URLs requested so far, in request order
    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }

    /// Number of times `url` was requested
    pub fn request_count(&self, url: &str) -> usize {
        self.requests.borrow().iter().filter(|u| *u == url).count()
    }
}

#[cfg(test)]
impl PageFetcher for StaticSite {
    async fn fetch(&self, url: &str) -> FetchResult<HtmlPage> {
        self.requests.borrow_mut().push(url.to_string());
        match self.pages.get(url) {
            Some(html) => Ok(HtmlPage::parse(html)),
            None => Err(FetchError::Status {
                url: url.to_string(),
                status: 404,
            }),
        }
    }
}

impl<F: PageFetcher> PageFetcher for &F {
    async fn fetch(&self, url: &str) -> FetchResult<HtmlPage> {
        (**self).fetch(url).await
    }
}
