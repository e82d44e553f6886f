use std::collections::HashMap;
use std::time::Duration;

use crate::error::Result;

/// Snapshot of one element matched on the current page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    /// Selector that produced the element.
    pub selector: String,
    pub text: String,
    pub attributes: HashMap<String, String>,
}

impl Element {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

/// The page reader the collector and extractor drive. One instance is reused
/// sequentially for a whole run.
pub trait PageDriver {
    fn navigate(&mut self, url: &str) -> Result<()>;

    fn find_all(&mut self, selector: &str) -> Result<Vec<Element>>;

    fn find(&mut self, selector: &str) -> Result<Option<Element>> {
        Ok(self.find_all(selector)?.into_iter().next())
    }

    fn click(&mut self, element: &Element) -> Result<()>;

    fn text(&self, element: &Element) -> String {
        element.text.trim().to_string()
    }

    fn attribute(&self, element: &Element, name: &str) -> Option<String> {
        element.attr(name).map(str::to_string)
    }

    fn scroll_to_bottom(&mut self) -> Result<()>;

    fn wait(&mut self, duration: Duration) {
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
    }
}

/// Non-empty trimmed texts of every element matching `selector`.
pub fn non_empty_texts(driver: &mut dyn PageDriver, selector: &str) -> Result<Vec<String>> {
    let elements = driver.find_all(selector)?;
    Ok(elements
        .iter()
        .map(|el| driver.text(el))
        .filter(|text| !text.is_empty())
        .collect())
}

/// Non-empty values of `attribute` on every element matching `selector`.
pub fn non_empty_attributes(
    driver: &mut dyn PageDriver,
    selector: &str,
    attribute: &str,
) -> Result<Vec<String>> {
    let elements = driver.find_all(selector)?;
    Ok(elements
        .iter()
        .filter_map(|el| driver.attribute(el, attribute))
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .collect())
}
