//! # In-Memory Document
//!
//! [VirtualDocument] implements [StylesheetHost] without a browser. It keeps
//! the head's link elements in order, lets the host decide when a stylesheet
//! "finishes loading" and records the number of applied theme links after
//! every media change, which makes the swap invariants directly observable.
//!
//! ```rust
//! use warmstyle_stylesheet::host::StylesheetHost;
//! use warmstyle_stylesheet::mode::{Media, ThemeMode};
//! use warmstyle_stylesheet::virtual_document::VirtualDocument;
//!
//! let doc = VirtualDocument::new();
//! let link = doc.create_link("/dark.css", ThemeMode::Dark, Media::NotAll).unwrap();
//! assert!(!doc.is_loaded(&link));
//! doc.finish_loading(link);
//! assert!(doc.is_loaded(&link));
//! ```

use std::cell::RefCell;

use crate::host::{LoadCallback, StylesheetHost};
use crate::mode::{Media, ThemeMode};

/// Handle to a link of a [VirtualDocument].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LinkId(usize);

/// Snapshot of one link element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualLink {
    /// The link's handle.
    pub id: LinkId,
    /// The stylesheet href.
    pub href: String,
    /// Current media.
    pub media: Media,
    /// Mode tag, if tagged.
    pub mode: Option<ThemeMode>,
    /// Warm marker.
    pub warm: bool,
    /// Whether the stylesheet has been parsed.
    pub loaded: bool,
}

#[derive(Default)]
struct DocState {
    links: Vec<VirtualLink>,
    head: Vec<LinkId>,
    listeners: Vec<(LinkId, LoadCallback)>,
    applied_log: Vec<usize>,
    load_on_create: bool,
}

impl DocState {
    fn link_mut(&mut self, id: LinkId) -> Option<&mut VirtualLink> {
        self.links.get_mut(id.0)
    }

    fn applied_count(&self) -> usize {
        self.links
            .iter()
            .filter(|link| link.mode.is_some() && link.media.is_applied())
            .count()
    }
}

/// A document head living in memory.
#[derive(Default)]
pub struct VirtualDocument {
    state: RefCell<DocState>,
}

impl VirtualDocument {
    /// Create an empty document. Created links start unloaded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a document whose links load instantly, like a warm browser cache.
    pub fn loading_instantly() -> Self {
        let doc = Self::default();
        doc.state.borrow_mut().load_on_create = true;
        doc
    }

    /// Append an untagged, loaded stylesheet link, as emitted by the initial
    /// page markup.
    pub fn insert_page_link(&self, href: &str, media: Media) -> LinkId {
        let mut state = self.state.borrow_mut();
        let id = LinkId(state.links.len());
        state.links.push(VirtualLink {
            id,
            href: href.to_string(),
            media,
            mode: None,
            warm: false,
            loaded: true,
        });
        state.head.push(id);
        id
    }

    /// Mark a link's stylesheet as parsed and fire its load listeners.
    pub fn finish_loading(&self, id: LinkId) {
        let callbacks: Vec<LoadCallback> = {
            let mut state = self.state.borrow_mut();
            match state.link_mut(id) {
                Some(link) => link.loaded = true,
                None => return,
            }
            let (fired, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut state.listeners)
                .into_iter()
                .partition(|(link, _)| *link == id);
            state.listeners = kept;
            fired.into_iter().map(|(_, callback)| callback).collect()
        };
        for callback in callbacks {
            callback();
        }
    }

    /// Snapshot of one link.
    pub fn link(&self, id: LinkId) -> Option<VirtualLink> {
        self.state.borrow().links.get(id.0).cloned()
    }

    /// Links in head order, first child first.
    pub fn head(&self) -> Vec<VirtualLink> {
        let state = self.state.borrow();
        state
            .head
            .iter()
            .filter_map(|id| state.links.get(id.0).cloned())
            .collect()
    }

    /// Number of links tagged with `mode`.
    pub fn count_tagged(&self, mode: ThemeMode) -> usize {
        self.state
            .borrow()
            .links
            .iter()
            .filter(|link| link.mode == Some(mode))
            .count()
    }

    /// Tagged links currently applied.
    pub fn applied(&self) -> Vec<LinkId> {
        self.state
            .borrow()
            .links
            .iter()
            .filter(|link| link.mode.is_some() && link.media.is_applied())
            .map(|link| link.id)
            .collect()
    }

    /// Number of applied tagged links after each media change, oldest first.
    pub fn applied_log(&self) -> Vec<usize> {
        self.state.borrow().applied_log.clone()
    }

    /// Number of load listeners still waiting.
    pub fn pending_listeners(&self) -> usize {
        self.state.borrow().listeners.len()
    }
}

impl StylesheetHost for VirtualDocument {
    type Link = LinkId;

    fn find_tagged(&self, mode: ThemeMode) -> Option<LinkId> {
        self.state
            .borrow()
            .links
            .iter()
            .find(|link| link.mode == Some(mode))
            .map(|link| link.id)
    }

    fn find_untagged_by_href(&self, href: &str) -> Option<LinkId> {
        self.state
            .borrow()
            .links
            .iter()
            .find(|link| link.mode.is_none() && link.href.contains(href))
            .map(|link| link.id)
    }

    fn tag(&self, link: &LinkId, mode: ThemeMode) {
        if let Some(link) = self.state.borrow_mut().link_mut(*link) {
            link.mode = Some(mode);
        }
    }

    fn set_warm(&self, link: &LinkId, warm: bool) {
        if let Some(link) = self.state.borrow_mut().link_mut(*link) {
            link.warm = warm;
        }
    }

    fn is_warm(&self, link: &LinkId) -> bool {
        self.link(*link).is_some_and(|link| link.warm)
    }

    fn create_link(&self, href: &str, mode: ThemeMode, media: Media) -> Option<LinkId> {
        let mut state = self.state.borrow_mut();
        let id = LinkId(state.links.len());
        let loaded = state.load_on_create;
        state.links.push(VirtualLink {
            id,
            href: href.to_string(),
            media,
            mode: Some(mode),
            warm: false,
            loaded,
        });
        state.head.insert(0, id);
        Some(id)
    }

    fn media(&self, link: &LinkId) -> Media {
        self.link(*link).map_or(Media::NotAll, |link| link.media)
    }

    fn set_media(&self, link: &LinkId, media: Media) {
        let mut state = self.state.borrow_mut();
        if let Some(link) = state.link_mut(*link) {
            link.media = media;
        }
        let applied = state.applied_count();
        state.applied_log.push(applied);
    }

    fn is_loaded(&self, link: &LinkId) -> bool {
        self.link(*link).is_some_and(|link| link.loaded)
    }

    fn on_load(&self, link: &LinkId, callback: LoadCallback) {
        self.state.borrow_mut().listeners.push((*link, callback));
    }
}
