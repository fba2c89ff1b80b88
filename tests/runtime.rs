use std::cell::Cell;
use std::rc::Rc;

use warmstyle::prelude::*;

struct Tokens {
    name: &'static str,
    accent: u32,
}

fn registry() -> Rc<ThemeRegistry<Tokens>> {
    let mut registry = ThemeRegistry::new();
    registry.register("dark", || Tokens { name: "dark", accent: 0x10 });
    registry.register("light", || Tokens { name: "light", accent: 0xf0 });
    registry.register("synthwave", || Tokens { name: "synthwave", accent: 0xff });
    Rc::new(registry)
}

fn config() -> WarmConfig {
    let mut config = WarmConfig::new();
    config.stylesheet = config
        .stylesheet
        .with_hrefs("/public/build/light.css", "/public/build/dark.css");
    config
}

fn runtime() -> (
    ThemeRuntime<Tokens, VirtualDocument>,
    Rc<VirtualDocument>,
    Rc<ManualScheduler>,
) {
    let doc = Rc::new(VirtualDocument::new());
    let scheduler = Rc::new(ManualScheduler::new());
    let runtime: ThemeRuntime<Tokens, VirtualDocument> =
        ThemeRuntime::new(&config(), registry(), doc.clone(), scheduler.clone(), "dark").unwrap();
    (runtime, doc, scheduler)
}

fn counting_button(calls: &Rc<Cell<usize>>) -> StyleFn<Tokens, bool, String> {
    let calls = calls.clone();
    StyleFn::new("button", move |theme: &Tokens, primary: &bool| {
        calls.set(calls.get() + 1);
        format!("{}:{}:{}", theme.name, theme.accent, primary)
    })
}

#[test]
fn test_unknown_initial_theme_is_an_error() {
    let result: StyleResult<ThemeRuntime<Tokens, VirtualDocument>> = ThemeRuntime::new(
        &config(),
        registry(),
        Rc::new(VirtualDocument::new()),
        Rc::new(ManualScheduler::new()),
        "sepia",
    );
    assert!(matches!(result, Err(StyleError::ThemeNotFound { .. })));
}

#[test]
fn test_picker_warms_other_themes() {
    let (runtime, _, scheduler) = runtime();
    let calls = Rc::new(Cell::new(0));
    let button = counting_button(&calls);

    runtime.use_memoized_style(&button, true);
    runtime.use_memoized_style(&button, false);
    assert_eq!(calls.get(), 2);

    let run = runtime.open_theme_picker();
    scheduler.run_until_idle();
    assert!(run.is_finished());
    assert_eq!(
        run.warmed(),
        vec![ThemeHandle::new("light"), ThemeHandle::new("synthwave")]
    );
    assert_eq!(runtime.service().cache().entry_count(button.id()), 6);
    assert_eq!(calls.get(), 6);

    runtime.set_active_theme("synthwave").unwrap();
    let value = runtime.use_memoized_style(&button, true);
    runtime.use_memoized_style(&button, false);
    assert_eq!(*value, "synthwave:255:true");
    assert_eq!(calls.get(), 6);
}

#[test]
fn test_closing_picker_stops_warming() {
    let (runtime, _, scheduler) = runtime();
    let calls = Rc::new(Cell::new(0));
    let button = counting_button(&calls);
    runtime.use_memoized_style(&button, true);
    runtime.use_memoized_style(&button, true);

    let run = runtime.open_theme_picker();
    assert!(scheduler.run_next());
    runtime.close_theme_picker();
    scheduler.run_until_idle();

    assert!(run.is_cancelled());
    assert_eq!(run.warmed(), vec![ThemeHandle::new("light")]);
    assert_eq!(runtime.service().cache().entry_count(button.id()), 2);
}

#[test]
fn test_reopening_picker_cancels_previous_run() {
    let (runtime, _, scheduler) = runtime();
    let first = runtime.open_theme_picker();
    let second = runtime.open_theme_picker();
    scheduler.run_until_idle();

    assert!(first.is_cancelled());
    assert!(first.warmed().is_empty());
    assert!(second.is_finished());
}

#[test]
fn test_warm_styles_for_unknown_theme() {
    let (runtime, _, _) = runtime();
    let err = runtime
        .warm_styles_for_theme(&ThemeHandle::new("missing"))
        .unwrap_err();
    assert!(matches!(err, StyleError::ThemeNotFound { .. }));
}

#[test]
fn test_mode_toggle_with_preloaded_opposite() {
    let (runtime, doc, scheduler) = runtime();
    assert!(runtime.warm_opposite_stylesheet().is_none());

    assert_eq!(runtime.change_theme_mode(ThemeMode::Dark), SwapOutcome::Completed);
    runtime.warm_opposite_stylesheet();
    scheduler.run_until_idle();

    let light = doc.find_tagged(ThemeMode::Light).unwrap();
    assert!(doc.is_warm(&light));
    doc.finish_loading(light);
    let dark = doc.find_tagged(ThemeMode::Dark).unwrap();
    doc.finish_loading(dark);

    assert_eq!(runtime.change_theme_mode(ThemeMode::Light), SwapOutcome::Completed);
    assert_eq!(runtime.theme_mode(), Some(ThemeMode::Light));
    assert_eq!(doc.applied(), vec![light]);
    assert!(doc.applied_log().iter().all(|&count| count >= 1));
}
