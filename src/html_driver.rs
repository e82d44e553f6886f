//! A [`PageDriver`] over plain HTTP GET and CSS selection.
//!
//! There is no script runtime behind it: pages are read as served, and
//! `click` always fails. The collector treats a failed click on the
//! "load more" control as the end of pagination, so a static driver yields
//! the first page of results.

use scraper::{Html, Selector};

use crate::config::ScrapeConfig;
use crate::driver::{Element, PageDriver};
use crate::error::{Result, ScrapeError};
use crate::http_client::{fetch_text, http_client};

type FetchFn = Box<dyn FnMut(&str) -> anyhow::Result<String>>;

pub struct HtmlDriver {
    fetch: FetchFn,
    current_url: Option<String>,
    document: Option<Html>,
}

impl HtmlDriver {
    pub fn http(config: &ScrapeConfig) -> anyhow::Result<Self> {
        let client = http_client(config)?;
        Ok(Self::with_fetch(move |url| fetch_text(client, url)))
    }

    /// Driver backed by a custom page source, e.g. fixture HTML.
    pub fn with_fetch(fetch: impl FnMut(&str) -> anyhow::Result<String> + 'static) -> Self {
        Self {
            fetch: Box::new(fetch),
            current_url: None,
            document: None,
        }
    }

    pub fn current_url(&self) -> Option<&str> {
        self.current_url.as_deref()
    }
}

impl PageDriver for HtmlDriver {
    fn navigate(&mut self, url: &str) -> Result<()> {
        self.current_url = Some(url.to_string());
        self.document = None;
        let body = (self.fetch)(url)
            .map_err(|err| ScrapeError::driver(format!("navigate {url}: {err:#}")))?;
        self.document = Some(Html::parse_document(&body));
        Ok(())
    }

    fn find_all(&mut self, selector: &str) -> Result<Vec<Element>> {
        let Some(document) = self.document.as_ref() else {
            return Err(ScrapeError::driver("no page loaded"));
        };
        let parsed = Selector::parse(selector)
            .map_err(|err| ScrapeError::driver(format!("invalid selector {selector}: {err:?}")))?;

        let elements = document
            .select(&parsed)
            .map(|el| Element {
                selector: selector.to_string(),
                text: el.text().collect::<String>(),
                attributes: el
                    .value()
                    .attrs()
                    .map(|(name, value)| (name.to_string(), value.to_string()))
                    .collect(),
            })
            .collect();
        Ok(elements)
    }

    fn click(&mut self, element: &Element) -> Result<()> {
        Err(ScrapeError::driver(format!(
            "cannot click {} on a static page",
            element.selector
        )))
    }

    fn scroll_to_bottom(&mut self) -> Result<()> {
        Ok(())
    }
}
