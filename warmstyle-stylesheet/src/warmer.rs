//! Preloads the stylesheet of the mode the user is not in, so a later swap
//! finds it already fetched and parsed.

use std::rc::Rc;

use warmstyle_theme::scheduler::{CancelToken, IdleScheduler};

use crate::host::StylesheetHost;
use crate::mode::ThemeMode;
use crate::swapper::StylesheetSwapper;

/// Defers [StylesheetSwapper::ensure_warm] of the opposite mode to an idle slice.
pub struct StylesheetWarmer<H: StylesheetHost> {
    swapper: Rc<StylesheetSwapper<H>>,
    scheduler: Rc<dyn IdleScheduler>,
}

impl<H: StylesheetHost + 'static> StylesheetWarmer<H> {
    /// Create a warmer for the links managed by `swapper`.
    pub fn new(swapper: Rc<StylesheetSwapper<H>>, scheduler: Rc<dyn IdleScheduler>) -> Self {
        Self { swapper, scheduler }
    }

    /// Schedule a preload of `current.opposite()`.
    ///
    /// Repeated calls create no duplicate links.
    pub fn warm_opposite(&self, current: ThemeMode) -> CancelToken {
        let swapper = self.swapper.clone();
        let target = current.opposite();
        self.scheduler.schedule(Box::new(move || {
            if swapper.ensure_warm(target).is_some() {
                log::debug!("Preloaded {} stylesheet", target);
            }
        }))
    }

    /// Preload `current.opposite()` right away.
    pub fn warm_opposite_now(&self, current: ThemeMode) -> Option<H::Link> {
        self.swapper.ensure_warm(current.opposite())
    }
}

#[cfg(test)]
mod tests {
    use warmstyle_theme::config::StylesheetConfig;
    use warmstyle_theme::scheduler::ManualScheduler;

    use super::*;
    use crate::mode::Media;
    use crate::virtual_document::VirtualDocument;

    fn setup() -> (
        Rc<VirtualDocument>,
        Rc<ManualScheduler>,
        StylesheetWarmer<VirtualDocument>,
    ) {
        let doc = Rc::new(VirtualDocument::new());
        let config = StylesheetConfig::default().with_hrefs("/build/light.css", "/build/dark.css");
        let swapper = Rc::new(StylesheetSwapper::from_config(doc.clone(), &config));
        let scheduler = Rc::new(ManualScheduler::new());
        let warmer = StylesheetWarmer::new(swapper, scheduler.clone());
        (doc, scheduler, warmer)
    }

    #[test]
    fn test_warm_is_deferred() {
        let (doc, scheduler, warmer) = setup();
        warmer.warm_opposite(ThemeMode::Light);
        assert!(doc.head().is_empty());

        scheduler.run_until_idle();
        let dark = doc.find_tagged(ThemeMode::Dark).unwrap();
        assert!(doc.is_warm(&dark));
        assert_eq!(doc.media(&dark), Media::NotAll);
    }

    #[test]
    fn test_repeated_warms_create_one_link() {
        let (doc, scheduler, warmer) = setup();
        warmer.warm_opposite(ThemeMode::Light);
        warmer.warm_opposite(ThemeMode::Light);
        warmer.warm_opposite_now(ThemeMode::Light);
        scheduler.run_until_idle();

        assert_eq!(doc.count_tagged(ThemeMode::Dark), 1);
        assert_eq!(doc.count_tagged(ThemeMode::Light), 0);
    }

    #[test]
    fn test_cancelled_warm_does_nothing() {
        let (doc, scheduler, warmer) = setup();
        warmer.warm_opposite(ThemeMode::Dark).cancel();
        scheduler.run_until_idle();
        assert!(doc.head().is_empty());
    }
}
