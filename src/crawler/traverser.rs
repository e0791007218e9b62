//! Album traverser - main harvest orchestration logic
//!
//! The traverser walks the gallery depth-first starting from the root page:
//! - album-list pages queue every complete album link, then their pagination link
//! - item-list pages emit one record per complete item and flush the sink
//! - album links that soft-redirect to the home page emit a placeholder record
//! - pagination links that soft-redirect end the pagination chain
//!
//! Pending work is kept on an explicit stack. Album links are pushed in
//! reverse so they pop in markup order, and a page's pagination link sits
//! beneath its albums, so the next page is only fetched once every album
//! above it (and everything under those) is done. This is the same order a
//! recursive descent would visit pages in.

use crate::config::{Config, SelectorConfig, SiteConfig};
use crate::crawler::classifier::{
    album_links, classify, is_home_redirect, item_entries, next_page_link, AlbumLink, PageKind,
};
use crate::crawler::fetcher::PageFetcher;
use crate::crawler::page::HtmlPage;
use crate::output::{CrawlStatistics, OutputRecord, RecordSink};
use crate::state::{TraversalContext, VisitCounter};
use crate::url::resolve;
use crate::Result;
use tracing::{debug, info, warn};

/// A pending unit of work
#[derive(Debug)]
enum Step {
    /// Fetch an album link found on a page with the given context
    Album {
        link: AlbumLink,
        context: TraversalContext,
    },
    /// Fetch a pagination link and continue at the same level
    NextPage {
        href: String,
        context: TraversalContext,
    },
}

/// Main traversal structure
pub struct Traverser<F, S> {
    fetcher: F,
    sink: S,
    site: SiteConfig,
    selectors: SelectorConfig,
    visits: VisitCounter,
    stats: CrawlStatistics,
}

impl<F: PageFetcher, S: RecordSink> Traverser<F, S> {
    /// Creates a new traverser
    ///
    /// # Arguments
    ///
    /// * `config` - The harvest configuration (site and selectors are used)
    /// * `fetcher` - Where pages come from
    /// * `sink` - Where records go
    pub fn new(config: &Config, fetcher: F, sink: S) -> Self {
        Self {
            fetcher,
            sink,
            site: config.site.clone(),
            selectors: config.selectors.clone(),
            visits: VisitCounter::new(),
            stats: CrawlStatistics::new(),
        }
    }

    /// Runs the traversal from the configured root page
    ///
    /// Any fetch failure aborts the run. The sink is flushed on the way out
    /// either way, so every record emitted before the failure is kept.
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlStatistics)` - Every reachable page was processed
    /// * `Err(HarvestError)` - A fetch or sink write failed
    pub async fn run(&mut self) -> Result<CrawlStatistics> {
        let start_url = resolve(&self.site.base_url, &self.site.root_path);
        info!("Starting harvest at {}", start_url);

        match self.walk(&start_url).await {
            Ok(()) => {
                self.sink.flush()?;
                info!(
                    "Harvest completed: {} pages fetched, {} rows written",
                    self.stats.pages_fetched,
                    self.stats.total_rows()
                );
                Ok(self.stats.clone())
            }
            Err(e) => {
                if let Err(flush_err) = self.sink.flush() {
                    warn!("Failed to flush output after error: {}", flush_err);
                }
                Err(e)
            }
        }
    }

    /// Statistics gathered so far
    pub fn statistics(&self) -> &CrawlStatistics {
        &self.stats
    }

    /// Number of album and item visits logged so far
    pub fn visits(&self) -> u64 {
        self.visits.count()
    }

    /// Consumes the traverser and returns its sink
    pub fn into_sink(self) -> S {
        self.sink
    }

    async fn walk(&mut self, start_url: &str) -> Result<()> {
        let mut stack = Vec::new();

        let root = self.fetch(start_url).await?;
        info!("Website title: {}", root.title());
        self.process_page(&root, TraversalContext::root(), &mut stack)?;
        drop(root);

        while let Some(step) = stack.pop() {
            match step {
                Step::Album { link, context } => self.visit_album(link, context, &mut stack).await?,
                Step::NextPage { href, context } => {
                    self.follow_next_page(href, context, &mut stack).await?
                }
            }
        }

        Ok(())
    }

    /// Classifies a fetched page and acts on it
    fn process_page(
        &mut self,
        page: &HtmlPage,
        context: TraversalContext,
        stack: &mut Vec<Step>,
    ) -> Result<()> {
        match classify(page, &self.selectors) {
            PageKind::AlbumList => {
                self.stats.album_pages += 1;

                if let Some(href) = next_page_link(page, &self.selectors) {
                    stack.push(Step::NextPage {
                        href,
                        context: context.clone(),
                    });
                }

                let links: Vec<AlbumLink> = album_links(page, &self.selectors)
                    .into_iter()
                    .filter(|link| {
                        if !link.is_complete() {
                            debug!("Skipping album cell without title or link under {}", context);
                            self.stats.skipped_entries += 1;
                        }
                        link.is_complete()
                    })
                    .collect();

                for link in links.into_iter().rev() {
                    stack.push(Step::Album {
                        link,
                        context: context.clone(),
                    });
                }
            }
            PageKind::ItemList => {
                self.stats.item_pages += 1;
                self.emit_items(page, &context)?;
            }
            PageKind::Empty => {
                self.stats.empty_pages += 1;
                debug!("Page '{}' has no albums or items", context.page_title);
            }
        }

        Ok(())
    }

    /// Fetches an album link and descends into it, unless it redirected home
    async fn visit_album(
        &mut self,
        link: AlbumLink,
        context: TraversalContext,
        stack: &mut Vec<Step>,
    ) -> Result<()> {
        let visit = self.visits.advance();
        info!(
            "{}. {} | {} | {} | {}",
            visit, link.title, link.url, link.id, context.page_title
        );

        let url = resolve(&self.site.base_url, &link.url);
        let page = self.fetch(&url).await?;
        let page_title = page.title();

        if is_home_redirect(&page_title, &self.site.home_title) {
            warn!("Requested page ({}) has redirected to the home page", url);
            let placeholder =
                OutputRecord::missing(&link.id, &context.lineage, &link.title, &link.thumbnail_url);
            self.sink.emit(&placeholder)?;
            self.sink.flush()?;
            self.stats.placeholders += 1;
            return Ok(());
        }

        let child = context.descend(&link.title, page_title);
        self.process_page(&page, child, stack)
    }

    /// Fetches a pagination link and continues the listing at the same level
    async fn follow_next_page(
        &mut self,
        href: String,
        context: TraversalContext,
        stack: &mut Vec<Step>,
    ) -> Result<()> {
        info!(" > next page found {}", href);

        let url = resolve(&self.site.base_url, &href);
        let page = self.fetch(&url).await?;

        if is_home_redirect(&page.title(), &self.site.home_title) {
            warn!("Requested (next) page ({}) has redirected to the home page", url);
            self.stats.broken_pagination_links += 1;
            return Ok(());
        }

        self.stats.pagination_pages += 1;
        self.process_page(&page, context, stack)
    }

    /// Emits one record per complete item, then flushes
    fn emit_items(&mut self, page: &HtmlPage, context: &TraversalContext) -> Result<()> {
        for entry in item_entries(page, &self.selectors) {
            if !entry.is_complete() {
                debug!("Skipping item cell without description or image under {}", context);
                self.stats.skipped_entries += 1;
                continue;
            }

            let visit = self.visits.advance();
            info!(
                "  {}. {} | {} | {} | {}",
                visit, context.lineage, entry.id, entry.image_filename, entry.image_url
            );

            self.sink.emit(&OutputRecord {
                item_id: entry.id,
                family: context.lineage.clone(),
                scientific_name: context.page_title.clone(),
                file_name: entry.image_filename,
                image_thumbnail_url: entry.image_url,
                description: entry.description,
            })?;
            self.stats.records_emitted += 1;
        }

        // TODO: follow `next_link` on item-list pages once multi-page item listings are confirmed on the live gallery
        self.sink.flush()?;
        Ok(())
    }

    async fn fetch(&mut self, url: &str) -> Result<HtmlPage> {
        debug!("Fetching {}", url);
        let page = self.fetcher.fetch(url).await?;
        self.stats.pages_fetched += 1;
        Ok(page)
    }
}
