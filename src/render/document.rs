use log::debug;
use scraper::{Html, Selector};

/// A loaded page, ready to be queried
pub struct Document {
    url: String,
    html: Html,
}

impl Document {
    pub fn parse(url: impl Into<String>, html: &str) -> Self {
        Self {
            url: url.into(),
            html: Html::parse_document(html),
        }
    }

    /// The URL the page was loaded from, used to resolve relative links
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn html(&self) -> &Html {
        &self.html
    }

    /// Remove every element matching `selector` from the tree.
    ///
    /// Used to get overlays such as cookie banners out of the way before
    /// extraction. Returns how many elements were removed; nothing matching
    /// is not an error.
    pub fn hide(&mut self, selector: &Selector) -> usize {
        let ids: Vec<_> = self.html.select(selector).map(|el| el.id()).collect();
        for id in &ids {
            if let Some(mut node) = self.html.tree.get_mut(*id) {
                node.detach();
            }
        }
        if !ids.is_empty() {
            debug!("Hid {} element(s) on {}", ids.len(), self.url);
        }
        ids.len()
    }
}
