//! Queryable HTML page
//!
//! Wraps a parsed `scraper` document behind the handful of operations the
//! traversal needs: the page title, CSS selection, attribute and inner-HTML
//! reads. Attribute reads on a selection follow the usual "first matching
//! element that carries the attribute" rule and return an empty string when
//! nothing matches.

use scraper::{ElementRef, Html, Selector};

/// A fetched and parsed gallery page
#[derive(Debug)]
pub struct HtmlPage {
    document: Html,
}

impl HtmlPage {
    /// Parses an HTML document
    ///
    /// Parsing is lenient and never fails; malformed markup yields whatever
    /// tree the HTML5 parser recovers.
    ///
    /// # Example
    ///
    /// ```
    /// use album_harvest::crawler::HtmlPage;
    ///
    /// let page = HtmlPage::parse("<html><head><title> Moths </title></head></html>");
    /// assert_eq!(page.title(), "Moths");
    /// ```
    pub fn parse(html: &str) -> Self {
        Self {
            document: Html::parse_document(html),
        }
    }

    /// Returns the page title with whitespace collapsed, or an empty string
    pub fn title(&self) -> String {
        let Some(selector) = compile("title") else {
            return String::new();
        };

        self.document
            .select(&selector)
            .next()
            .map(|element| collapse_whitespace(&element.text().collect::<String>()))
            .unwrap_or_default()
    }

    /// Returns every element matching `css`, in document order
    pub fn select(&self, css: &str) -> Vec<PageElement<'_>> {
        match compile(css) {
            Some(selector) => self.document.select(&selector).map(PageElement::new).collect(),
            None => Vec::new(),
        }
    }
}

/// An element inside an [`HtmlPage`]
#[derive(Debug, Clone, Copy)]
pub struct PageElement<'a> {
    element: ElementRef<'a>,
}

impl<'a> PageElement<'a> {
    fn new(element: ElementRef<'a>) -> Self {
        Self { element }
    }

    /// Returns the attribute value, or an empty string if absent
    pub fn attribute(&self, name: &str) -> String {
        self.element.value().attr(name).unwrap_or_default().to_string()
    }

    /// Returns the element's inner HTML
    pub fn inner_html(&self) -> String {
        self.element.inner_html()
    }

    /// Returns every element under this one matching `css`
    pub fn select(&self, css: &str) -> Vec<PageElement<'a>> {
        match compile(css) {
            Some(selector) => self.element.select(&selector).map(PageElement::new).collect(),
            None => Vec::new(),
        }
    }

    /// Reads `name` from the first element matching `css` that carries it
    pub fn select_attribute(&self, css: &str, name: &str) -> String {
        self.select(css)
            .iter()
            .find_map(|element| element.element.value().attr(name))
            .unwrap_or_default()
            .to_string()
    }

    /// Inner HTML of every element matching `css`, joined by newlines and trimmed
    pub fn select_html(&self, css: &str) -> String {
        self.select(css)
            .iter()
            .map(|element| element.inner_html().trim().to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Compiles a selector; invalid selectors match nothing
fn compile(css: &str) -> Option<Selector> {
    match Selector::parse(css) {
        Ok(selector) => Some(selector),
        Err(e) => {
            tracing::warn!("Invalid CSS selector '{}': {:?}", css, e);
            None
        }
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALBUM_CELL: &str = r#"
        <html><head><title>
            Noctuidae
        </title></head><body>
        <table><tr>
          <td class="giAlbumCell">
            <div><a href="main.php?g2_itemId=1001"><img src="d/1002-2/noct.jpg" alt="Noctuidae"></a></div>
            <div class="meta">Date: 2019</div>
          </td>
        </tr></table>
        </body></html>
    "#;

    #[test]
    fn test_title_is_trimmed_and_collapsed() {
        let page = HtmlPage::parse(ALBUM_CELL);
        assert_eq!(page.title(), "Noctuidae");

        let page = HtmlPage::parse("<html><head><title>A\n   B</title></head></html>");
        assert_eq!(page.title(), "A B");
    }

    #[test]
    fn test_missing_title_is_empty() {
        let page = HtmlPage::parse("<html><head></head><body></body></html>");
        assert_eq!(page.title(), "");
    }

    #[test]
    fn test_select_in_document_order() {
        let page = HtmlPage::parse(ALBUM_CELL);
        let cells = page.select(".giAlbumCell div");
        assert_eq!(cells.len(), 2);
        assert_eq!(cells[1].attribute("class"), "meta");
        assert_eq!(cells[0].attribute("class"), "");
    }

    #[test]
    fn test_select_attribute_from_descendants() {
        let page = HtmlPage::parse(ALBUM_CELL);
        let cells = page.select(".giAlbumCell div");

        assert_eq!(cells[0].select_attribute("img", "alt"), "Noctuidae");
        assert_eq!(cells[0].select_attribute("img", "src"), "d/1002-2/noct.jpg");
        assert_eq!(cells[0].select_attribute("a", "href"), "main.php?g2_itemId=1001");

        // nothing to read from the metadata div
        assert_eq!(cells[1].select_attribute("img", "alt"), "");
        assert_eq!(cells[1].select_attribute("a", "href"), "");
    }

    #[test]
    fn test_select_attribute_skips_elements_without_it() {
        let page = HtmlPage::parse(
            r#"<div id="c"><img src="a.jpg"><img src="b.jpg" alt="second"></div>"#,
        );
        let cell = page.select("#c")[0];
        assert_eq!(cell.select_attribute("img", "alt"), "second");
        assert_eq!(cell.select_attribute("img", "src"), "a.jpg");
    }

    #[test]
    fn test_select_html_keeps_markup() {
        let page = HtmlPage::parse(
            r#"<div class="giItemCell"><div class="giDescription2">
                <p>Agrotis <i>infusa</i></p>
            </div></div>"#,
        );
        let cell = page.select(".giItemCell")[0];
        assert_eq!(cell.select_html(".giDescription2"), "<p>Agrotis <i>infusa</i></p>");
        assert_eq!(cell.select_html(".absent"), "");

        let page = HtmlPage::parse(
            r#"<div class="giItemCell">
                <div class="giDescription2"> <p>Bogong moth</p> </div>
                <div class="giDescription2"><p>Wingspan 40mm</p></div>
            </div>"#,
        );
        let cell = page.select(".giItemCell")[0];
        assert_eq!(
            cell.select_html(".giDescription2"),
            "<p>Bogong moth</p>\n<p>Wingspan 40mm</p>"
        );
    }

    #[test]
    fn test_invalid_selector_matches_nothing() {
        let page = HtmlPage::parse(ALBUM_CELL);
        assert!(page.select("..broken[").is_empty());
    }
}
