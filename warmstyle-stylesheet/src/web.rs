//! The browser document as a [StylesheetHost].

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{AddEventListenerOptions, Document, HtmlLinkElement};

use crate::host::{LoadCallback, StylesheetHost, MODE_ATTRIBUTE, WARM_ATTRIBUTE};
use crate::mode::{Media, ThemeMode};

/// Manages theme stylesheet links in a live `web_sys::Document`.
#[derive(Debug, Clone)]
pub struct WebDocument {
    document: Document,
}

impl WebDocument {
    /// The document of the current window, if there is one.
    pub fn current() -> Option<Self> {
        let document = web_sys::window()?.document()?;
        Some(Self::from_document(document))
    }

    /// Wrap an existing document.
    pub fn from_document(document: Document) -> Self {
        Self { document }
    }

    fn query_link(&self, selector: &str) -> Option<HtmlLinkElement> {
        self.document
            .query_selector(selector)
            .ok()
            .flatten()
            .and_then(|element| element.dyn_into::<HtmlLinkElement>().ok())
    }
}

impl StylesheetHost for WebDocument {
    type Link = HtmlLinkElement;

    fn find_tagged(&self, mode: ThemeMode) -> Option<HtmlLinkElement> {
        self.query_link(&format!("link[{}=\"{}\"]", MODE_ATTRIBUTE, mode.as_str()))
    }

    fn find_untagged_by_href(&self, href: &str) -> Option<HtmlLinkElement> {
        let selector = format!("link[rel=\"stylesheet\"]:not([{}])", MODE_ATTRIBUTE);
        let links = self.document.query_selector_all(&selector).ok()?;
        (0..links.length())
            .filter_map(|index| links.item(index))
            .filter_map(|node| node.dyn_into::<HtmlLinkElement>().ok())
            .find(|link| link.href().contains(href))
    }

    fn tag(&self, link: &HtmlLinkElement, mode: ThemeMode) {
        if let Err(err) = link.set_attribute(MODE_ATTRIBUTE, mode.as_str()) {
            log::warn!("Failed to tag stylesheet link: {:?}", err);
        }
    }

    fn set_warm(&self, link: &HtmlLinkElement, warm: bool) {
        let result = if warm {
            link.set_attribute(WARM_ATTRIBUTE, "true")
        } else {
            link.remove_attribute(WARM_ATTRIBUTE)
        };
        if let Err(err) = result {
            log::warn!("Failed to update {}: {:?}", WARM_ATTRIBUTE, err);
        }
    }

    fn is_warm(&self, link: &HtmlLinkElement) -> bool {
        link.has_attribute(WARM_ATTRIBUTE)
    }

    fn create_link(&self, href: &str, mode: ThemeMode, media: Media) -> Option<HtmlLinkElement> {
        let link = self
            .document
            .create_element("link")
            .ok()?
            .dyn_into::<HtmlLinkElement>()
            .ok()?;
        link.set_rel("stylesheet");
        link.set_href(href);
        link.set_media(media.as_str());
        self.tag(&link, mode);

        let head = self.document.head()?;
        head.insert_before(&link, head.first_child().as_ref()).ok()?;
        Some(link)
    }

    fn media(&self, link: &HtmlLinkElement) -> Media {
        Media::from_attribute(&link.media())
    }

    fn set_media(&self, link: &HtmlLinkElement, media: Media) {
        link.set_media(media.as_str());
    }

    fn is_loaded(&self, link: &HtmlLinkElement) -> bool {
        link.sheet().is_some()
    }

    fn on_load(&self, link: &HtmlLinkElement, callback: LoadCallback) {
        let options = AddEventListenerOptions::new();
        options.set_once(true);
        let listener = Closure::once_into_js(move || callback());

        if let Err(err) = link.add_event_listener_with_callback_and_add_event_listener_options(
            "load",
            listener.unchecked_ref(),
            &options,
        ) {
            log::warn!("Failed to listen for stylesheet load: {:?}", err);
        }
    }
}
