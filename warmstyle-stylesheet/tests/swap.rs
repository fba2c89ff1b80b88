use std::rc::Rc;

use warmstyle_stylesheet::host::StylesheetHost;
use warmstyle_stylesheet::mode::{Media, ThemeMode};
use warmstyle_stylesheet::swapper::{StylesheetSwapper, SwapOutcome};
use warmstyle_stylesheet::virtual_document::VirtualDocument;
use warmstyle_stylesheet::warmer::StylesheetWarmer;
use warmstyle_theme::config::StylesheetConfig;
use warmstyle_theme::scheduler::ManualScheduler;

const LIGHT: &str = "/public/build/light.css";
const DARK: &str = "/public/build/dark.css";

fn swapper(doc: &Rc<VirtualDocument>) -> StylesheetSwapper<VirtualDocument> {
    let config = StylesheetConfig::default().with_hrefs(LIGHT, DARK);
    StylesheetSwapper::from_config(doc.clone(), &config)
}

#[test]
fn test_slow_load_keeps_old_sheet_applied() {
    let doc = Rc::new(VirtualDocument::new());
    let page = doc.insert_page_link(LIGHT, Media::All);
    let swapper = swapper(&doc);

    assert_eq!(swapper.initialize(ThemeMode::Light), SwapOutcome::Completed);
    assert_eq!(swapper.change_mode(ThemeMode::Dark), SwapOutcome::AwaitingLoad);

    let dark = doc.find_tagged(ThemeMode::Dark).unwrap();
    assert_eq!(doc.media(&dark), Media::NotAll);
    assert_eq!(doc.applied(), vec![page]);

    doc.finish_loading(dark);
    assert_eq!(doc.applied(), vec![dark]);
    assert_eq!(doc.media(&page), Media::NotAll);
    assert!(doc.applied_log().iter().all(|&count| count >= 1));
}

#[test]
fn test_never_zero_applied_across_toggles() {
    let doc = Rc::new(VirtualDocument::new());
    doc.insert_page_link(LIGHT, Media::All);
    let swapper = swapper(&doc);
    swapper.initialize(ThemeMode::Light);

    for round in 0..6 {
        let target = if round % 2 == 0 { ThemeMode::Dark } else { ThemeMode::Light };
        swapper.change_mode(target);
        if round == 0 {
            let dark = doc.find_tagged(ThemeMode::Dark).unwrap();
            doc.finish_loading(dark);
        }
    }

    assert!(doc.applied_log().iter().all(|&count| count >= 1));
    assert_eq!(doc.count_tagged(ThemeMode::Light), 1);
    assert_eq!(doc.count_tagged(ThemeMode::Dark), 1);
    assert_eq!(doc.head().len(), 2);
    assert_eq!(doc.applied(), vec![doc.find_tagged(ThemeMode::Light).unwrap()]);
}

#[test]
fn test_initialize_retires_page_sheet_of_other_mode() {
    let doc = Rc::new(VirtualDocument::new());
    let page = doc.insert_page_link(LIGHT, Media::All);
    let swapper = swapper(&doc);

    assert_eq!(swapper.initialize(ThemeMode::Dark), SwapOutcome::AwaitingLoad);
    assert_eq!(doc.link(page).unwrap().mode, Some(ThemeMode::Light));
    assert_eq!(doc.applied(), vec![page]);

    let dark = doc.find_tagged(ThemeMode::Dark).unwrap();
    doc.finish_loading(dark);
    assert_eq!(doc.applied(), vec![dark]);
    assert_eq!(swapper.current_mode(), Some(ThemeMode::Dark));
}

#[test]
fn test_preloaded_sheet_swaps_immediately() {
    let doc = Rc::new(VirtualDocument::new());
    doc.insert_page_link(LIGHT, Media::All);
    let swapper = Rc::new(swapper(&doc));
    let scheduler = Rc::new(ManualScheduler::new());
    let warmer = StylesheetWarmer::new(swapper.clone(), scheduler.clone());

    swapper.initialize(ThemeMode::Light);
    warmer.warm_opposite(ThemeMode::Light);
    scheduler.run_until_idle();

    let dark = doc.find_tagged(ThemeMode::Dark).unwrap();
    assert!(doc.is_warm(&dark));
    assert_eq!(doc.head().first().map(|link| link.id), Some(dark));
    doc.finish_loading(dark);

    assert_eq!(swapper.change_mode(ThemeMode::Dark), SwapOutcome::Completed);
    assert_eq!(doc.applied(), vec![dark]);
    assert!(!doc.is_warm(&dark));
    assert_eq!(doc.count_tagged(ThemeMode::Dark), 1);
}

#[test]
fn test_swap_without_dark_asset_keeps_light() {
    let doc = Rc::new(VirtualDocument::loading_instantly());
    let config = StylesheetConfig {
        light_href: Some(LIGHT.to_string()),
        ..StylesheetConfig::default()
    };
    let swapper = StylesheetSwapper::from_config(doc.clone(), &config);
    swapper.initialize(ThemeMode::Light);

    assert_eq!(swapper.change_mode(ThemeMode::Dark), SwapOutcome::Unavailable);
    assert_eq!(doc.applied(), vec![doc.find_tagged(ThemeMode::Light).unwrap()]);
    assert_eq!(doc.head().len(), 1);
}
