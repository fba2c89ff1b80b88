//! # Stylesheet Swapper
//!
//! Keeps at most one `<link>` per [ThemeMode] in the document and swaps the
//! applied one when the mode changes, following a [SwapPlan]: the outgoing
//! sheet stays applied until the incoming one has loaded, so the page never
//! renders without a theme stylesheet.
//!
//! A stylesheet that never loads leaves both links applied indefinitely.
//! That is harmless and not treated as an error.
//!
//! Every swap bumps a generation counter. A load callback belonging to a swap
//! that was superseded by a later one does nothing when it eventually fires.

use std::cell::Cell;
use std::rc::Rc;

use warmstyle_theme::config::StylesheetConfig;

use crate::host::{StylesheetAssets, StylesheetHost};
use crate::mode::{Media, ThemeMode};
use crate::transition::{LinkState, SwapPlan, SwapStep};

/// Result of a swap request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapOutcome {
    /// The requested mode was already active.
    Unchanged,
    /// The new stylesheet is applied and the old one retired.
    Completed,
    /// The old stylesheet stays applied until the new one loads.
    AwaitingLoad,
    /// No stylesheet is configured for the requested mode.
    Unavailable,
}

/// Manages the per-mode stylesheet links of one document.
pub struct StylesheetSwapper<H: StylesheetHost> {
    host: Rc<H>,
    assets: Rc<dyn StylesheetAssets>,
    adopt_untagged: bool,
    generation: Rc<Cell<u64>>,
    current: Cell<Option<ThemeMode>>,
}

impl<H: StylesheetHost + 'static> StylesheetSwapper<H> {
    /// Create a swapper resolving hrefs through `assets`.
    pub fn new(host: Rc<H>, assets: Rc<dyn StylesheetAssets>) -> Self {
        Self {
            host,
            assets,
            adopt_untagged: true,
            generation: Rc::new(Cell::new(0)),
            current: Cell::new(None),
        }
    }

    /// Create a swapper from the stylesheet configuration.
    pub fn from_config(host: Rc<H>, config: &StylesheetConfig) -> Self {
        Self::new(host, Rc::new(config.clone())).with_adoption(config.adopt_untagged)
    }

    /// Whether untagged links with a matching href are adopted by [ensure](Self::ensure).
    pub fn with_adoption(mut self, adopt_untagged: bool) -> Self {
        self.adopt_untagged = adopt_untagged;
        self
    }

    /// The host document.
    pub fn host(&self) -> &Rc<H> {
        &self.host
    }

    /// The mode of the last successful [initialize](Self::initialize),
    /// [swap](Self::swap) or [change_mode](Self::change_mode).
    pub fn current_mode(&self) -> Option<ThemeMode> {
        self.current.get()
    }

    /// Lifecycle state of the tagged link serving `mode`.
    pub fn state(&self, mode: ThemeMode) -> LinkState {
        LinkState::of(
            self.host
                .find_tagged(mode)
                .map(|link| self.host.media(&link)),
        )
    }

    /// Return the link serving `mode`, creating an unapplied one if needed.
    ///
    /// Returns `None` when no href is configured for `mode`.
    pub fn ensure(&self, mode: ThemeMode) -> Option<H::Link> {
        let Some(href) = self.assets.href(mode) else {
            log::debug!("No stylesheet configured for {} mode", mode);
            return None;
        };

        if let Some(link) = self.existing(mode, &href) {
            return Some(link);
        }

        let link = self.host.create_link(&href, mode, Media::NotAll);
        match &link {
            Some(_) => log::debug!("Created {} stylesheet link {}", mode, href),
            None => log::warn!("Document refused {} stylesheet link {}", mode, href),
        }
        link
    }

    fn existing(&self, mode: ThemeMode, href: &str) -> Option<H::Link> {
        if let Some(link) = self.host.find_tagged(mode) {
            return Some(link);
        }
        if !self.adopt_untagged {
            return None;
        }
        let link = self.host.find_untagged_by_href(href)?;
        log::debug!("Adopting existing {} stylesheet link {}", mode, href);
        self.host.tag(&link, mode);
        Some(link)
    }

    /// [Ensure](Self::ensure) a link for `mode` and mark it warm if it is not applied.
    pub fn ensure_warm(&self, mode: ThemeMode) -> Option<H::Link> {
        let link = self.ensure(mode)?;
        if !self.host.media(&link).is_applied() {
            self.host.set_warm(&link, true);
        }
        Some(link)
    }

    /// Apply `mode` as the initial stylesheet.
    ///
    /// An applied link of the other mode (e.g. from the page markup) is
    /// retired once the stylesheet of `mode` has loaded.
    pub fn initialize(&self, mode: ThemeMode) -> SwapOutcome {
        let Some(new) = self.ensure(mode) else {
            return SwapOutcome::Unavailable;
        };
        self.current.set(Some(mode));
        let other = mode.opposite();
        let old = self
            .assets
            .href(other)
            .and_then(|href| self.existing(other, &href));
        let old_state = LinkState::of(old.as_ref().map(|link| self.host.media(link)));

        match old {
            Some(old) if old_state == LinkState::Applied => self.execute(Some(old), new),
            _ => {
                apply_steps(&*self.host, &[SwapStep::ApplyNew], None, &new);
                SwapOutcome::Completed
            },
        }
    }

    /// Swap the applied stylesheet from `from` to `to`.
    pub fn swap(&self, from: ThemeMode, to: ThemeMode) -> SwapOutcome {
        if from == to {
            return SwapOutcome::Unchanged;
        }
        let Some(new) = self.ensure(to) else {
            log::warn!("No stylesheet for {} mode, keeping {}", to, from);
            return SwapOutcome::Unavailable;
        };
        self.current.set(Some(to));
        let old = self.ensure(from);
        self.execute(old, new)
    }

    /// Switch to `mode`, swapping from the current mode if there is one.
    pub fn change_mode(&self, mode: ThemeMode) -> SwapOutcome {
        match self.current.get() {
            Some(current) => self.swap(current, mode),
            None => self.initialize(mode),
        }
    }

    fn execute(&self, old: Option<H::Link>, new: H::Link) -> SwapOutcome {
        let generation = self.generation.get() + 1;
        self.generation.set(generation);

        let plan = SwapPlan::new(old.is_some(), self.host.is_loaded(&new));
        apply_steps(&*self.host, &plan.immediate, old.as_ref(), &new);
        if !plan.awaits_load() {
            return SwapOutcome::Completed;
        }

        log::debug!("Waiting for stylesheet {:?} to load", new);
        let host = self.host.clone();
        let current_generation = self.generation.clone();
        let steps = plan.after_load;
        let target = new.clone();
        self.host.on_load(
            &new,
            Box::new(move || {
                if current_generation.get() != generation {
                    log::debug!("Ignoring load of {:?} from a superseded swap", target);
                    return;
                }
                apply_steps(&*host, &steps, old.as_ref(), &target);
            }),
        );
        SwapOutcome::AwaitingLoad
    }
}

fn apply_steps<H: StylesheetHost>(
    host: &H,
    steps: &[SwapStep],
    old: Option<&H::Link>,
    new: &H::Link,
) {
    for step in steps {
        let (targets_new, media) = step.effect();
        if targets_new {
            host.set_warm(new, false);
            host.set_media(new, media);
        } else if let Some(old) = old {
            host.set_media(old, media);
        }
        log::trace!("Swap step {:?}", step);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::virtual_document::VirtualDocument;

    fn config() -> StylesheetConfig {
        StylesheetConfig::default().with_hrefs("/build/light.css", "/build/dark.css")
    }

    #[test]
    fn test_ensure_twice_creates_one_link() {
        let doc = Rc::new(VirtualDocument::new());
        let swapper = StylesheetSwapper::from_config(doc.clone(), &config());

        let first = swapper.ensure(ThemeMode::Dark);
        let second = swapper.ensure(ThemeMode::Dark);

        assert_eq!(first, second);
        assert_eq!(doc.count_tagged(ThemeMode::Dark), 1);
        assert_eq!(doc.media(&first.unwrap()), Media::NotAll);
    }

    #[test]
    fn test_ensure_adopts_page_link() {
        let doc = Rc::new(VirtualDocument::new());
        let page = doc.insert_page_link("/build/light.css", Media::All);
        let swapper = StylesheetSwapper::from_config(doc.clone(), &config());

        assert_eq!(swapper.ensure(ThemeMode::Light), Some(page));
        assert_eq!(doc.link(page).unwrap().mode, Some(ThemeMode::Light));
        assert_eq!(doc.head().len(), 1);
    }

    #[test]
    fn test_adoption_can_be_disabled() {
        let doc = Rc::new(VirtualDocument::new());
        let page = doc.insert_page_link("/build/light.css", Media::All);
        let swapper = StylesheetSwapper::from_config(doc.clone(), &config()).with_adoption(false);

        assert_ne!(swapper.ensure(ThemeMode::Light), Some(page));
        assert_eq!(doc.head().len(), 2);
    }

    #[test]
    fn test_missing_href_is_a_no_op() {
        let doc = Rc::new(VirtualDocument::new());
        let only_light = StylesheetConfig {
            light_href: Some("/build/light.css".to_string()),
            ..StylesheetConfig::default()
        };
        let swapper = StylesheetSwapper::from_config(doc.clone(), &only_light);
        swapper.initialize(ThemeMode::Light);

        assert_eq!(swapper.ensure(ThemeMode::Dark), None);
        assert_eq!(swapper.swap(ThemeMode::Light, ThemeMode::Dark), SwapOutcome::Unavailable);
        assert_eq!(doc.applied().len(), 1);
    }

    #[test]
    fn test_same_mode_is_unchanged() {
        let doc = Rc::new(VirtualDocument::new());
        let swapper = StylesheetSwapper::from_config(doc.clone(), &config());
        assert_eq!(swapper.swap(ThemeMode::Dark, ThemeMode::Dark), SwapOutcome::Unchanged);
        assert!(doc.head().is_empty());
    }

    #[test]
    fn test_loaded_swap_completes_at_once() {
        let doc = Rc::new(VirtualDocument::loading_instantly());
        let swapper = StylesheetSwapper::from_config(doc.clone(), &config());
        swapper.initialize(ThemeMode::Dark);

        assert_eq!(swapper.change_mode(ThemeMode::Light), SwapOutcome::Completed);
        let light = doc.find_tagged(ThemeMode::Light).unwrap();
        assert_eq!(doc.applied(), vec![light]);
    }

    #[test]
    fn test_warm_marker_cleared_when_applied() {
        let doc = Rc::new(VirtualDocument::loading_instantly());
        let swapper = StylesheetSwapper::from_config(doc.clone(), &config());
        swapper.initialize(ThemeMode::Dark);

        let light = swapper.ensure_warm(ThemeMode::Light).unwrap();
        assert!(doc.is_warm(&light));
        assert_eq!(doc.media(&light), Media::NotAll);

        swapper.change_mode(ThemeMode::Light);
        assert!(!doc.is_warm(&light));
    }

    #[test]
    fn test_link_states_through_a_swap() {
        let doc = Rc::new(VirtualDocument::new());
        let swapper = StylesheetSwapper::from_config(doc.clone(), &config());
        assert_eq!(swapper.state(ThemeMode::Dark), LinkState::Absent);

        swapper.initialize(ThemeMode::Light);
        swapper.ensure_warm(ThemeMode::Dark);
        assert_eq!(swapper.state(ThemeMode::Light), LinkState::Applied);
        assert_eq!(swapper.state(ThemeMode::Dark), LinkState::NotApplied);

        swapper.change_mode(ThemeMode::Dark);
        assert_eq!(swapper.state(ThemeMode::Light), LinkState::Applied);
        let dark = doc.find_tagged(ThemeMode::Dark).unwrap();
        doc.finish_loading(dark);
        assert_eq!(swapper.state(ThemeMode::Light), LinkState::NotApplied);
        assert_eq!(swapper.state(ThemeMode::Dark), LinkState::Applied);
    }

    #[test]
    fn test_unapplied_page_sheet_is_not_retired_by_initialize() {
        let doc = Rc::new(VirtualDocument::new());
        doc.insert_page_link("/build/light.css", Media::NotAll);
        let swapper = StylesheetSwapper::from_config(doc.clone(), &config());

        assert_eq!(swapper.initialize(ThemeMode::Dark), SwapOutcome::Completed);
        assert_eq!(swapper.state(ThemeMode::Light), LinkState::NotApplied);
        assert_eq!(swapper.state(ThemeMode::Dark), LinkState::Applied);
    }

    #[test]
    fn test_superseded_load_is_ignored() {
        let doc = Rc::new(VirtualDocument::new());
        let swapper = StylesheetSwapper::from_config(doc.clone(), &config());
        let dark = swapper.ensure(ThemeMode::Dark).unwrap();
        doc.finish_loading(dark);
        swapper.initialize(ThemeMode::Dark);

        assert_eq!(swapper.change_mode(ThemeMode::Light), SwapOutcome::AwaitingLoad);
        assert_eq!(swapper.change_mode(ThemeMode::Dark), SwapOutcome::Completed);

        let light = doc.find_tagged(ThemeMode::Light).unwrap();
        doc.finish_loading(light);
        assert_eq!(doc.applied(), vec![dark]);
    }
}
