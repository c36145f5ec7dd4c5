use section_nav::domain::ports::Page;
use section_nav::domain::model::{ErrorReport, NavigationTiming};
use section_nav::{
    EventResponse, Key, KeyInput, LayoutMode, MemoryPage, NavConfig, NavOutcome, PageEvent,
    Runtime, Section,
};
use std::time::Duration;

fn runtime() -> Runtime<MemoryPage> {
    Runtime::new(MemoryPage::academic_site(), &NavConfig::default()).unwrap()
}

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

#[test]
fn test_link_click_navigates_and_prevents_default() {
    let mut runtime = runtime();

    let response = runtime.dispatch(PageEvent::LinkClicked {
        section: "about".to_string(),
    });

    assert_eq!(
        response,
        EventResponse {
            prevent_default: true,
            outcome: Some(NavOutcome::Moved {
                from: Section::Landing,
                to: Section::About
            }),
        }
    );
    assert_eq!(runtime.current_section(), Section::About);
}

#[test]
fn test_alt_arrows_wrap_at_both_ends() {
    let mut runtime = runtime();

    let response = runtime.dispatch(PageEvent::KeyDown(KeyInput::with_alt(Key::ArrowLeft)));
    assert!(response.prevent_default);
    assert_eq!(runtime.current_section(), Section::Gallery);

    runtime.dispatch(PageEvent::KeyDown(KeyInput::with_alt(Key::ArrowDown)));
    assert_eq!(runtime.current_section(), Section::Landing);

    runtime.dispatch(PageEvent::KeyDown(KeyInput::with_alt(Key::ArrowRight)));
    runtime.dispatch(PageEvent::KeyDown(KeyInput::with_alt(Key::ArrowRight)));
    assert_eq!(runtime.current_section(), Section::Research);

    runtime.dispatch(PageEvent::KeyDown(KeyInput::with_alt(Key::ArrowUp)));
    assert_eq!(runtime.current_section(), Section::About);
}

#[test]
fn test_arrows_without_modifier_are_ignored() {
    let mut runtime = runtime();

    let response = runtime.dispatch(PageEvent::KeyDown(KeyInput::plain(Key::ArrowRight)));

    assert_eq!(response, EventResponse::default());
    assert_eq!(runtime.current_section(), Section::Landing);
}

#[test]
fn test_escape_always_returns_to_landing() {
    for start in Section::ALL {
        for input in [
            KeyInput::plain(Key::Escape),
            KeyInput::with_alt(Key::Escape),
        ] {
            let mut runtime = runtime();
            runtime.navigate(start);

            let response = runtime.dispatch(PageEvent::KeyDown(input));

            assert!(!response.prevent_default);
            assert_eq!(runtime.current_section(), Section::Landing);
        }
    }
}

#[test]
fn test_escape_resets_to_configured_default() {
    let config = NavConfig::from_toml_str(
        r#"
[navigation]
default_section = "publications"
"#,
    )
    .unwrap();
    let mut runtime = Runtime::new(MemoryPage::academic_site(), &config).unwrap();
    runtime.navigate(Section::Gallery);

    runtime.dispatch(PageEvent::KeyDown(KeyInput::plain(Key::Escape)));

    assert_eq!(runtime.current_section(), Section::Publications);
}

#[test]
fn test_scenario_research_twice_then_escape() {
    let mut runtime = runtime();
    assert_eq!(runtime.current_section(), Section::Landing);

    runtime.navigate_to_section("research");
    runtime.page_mut().advance(ms(60));
    runtime.tick();
    assert_eq!(runtime.current_section(), Section::Research);
    assert_eq!(runtime.page().location_hash(), "#research");
    assert_eq!(runtime.page().visible_sections(), vec![Section::Research]);

    let before = runtime.page().snapshot();
    let mutations = runtime.page().mutation_count();
    assert_eq!(runtime.navigate_to_section("research"), NavOutcome::Unchanged);
    assert_eq!(runtime.page().mutation_count(), mutations);
    assert_eq!(
        serde_json::to_value(runtime.page().snapshot()).unwrap(),
        serde_json::to_value(before).unwrap()
    );

    runtime.dispatch(PageEvent::KeyDown(KeyInput::plain(Key::Escape)));
    assert_eq!(runtime.current_section(), Section::Landing);
    assert_eq!(runtime.page().location_hash(), "#landing");
}

#[test]
fn test_initial_layout_follows_viewport() {
    let mut page = MemoryPage::academic_site();
    page.set_viewport_width(700);
    let runtime = Runtime::new(page, &NavConfig::default()).unwrap();

    assert_eq!(runtime.page().layout_mode(), LayoutMode::Mobile);
}

#[test]
fn test_resize_is_debounced() {
    let mut runtime = runtime();
    assert_eq!(runtime.page().layout_mode(), LayoutMode::Desktop);

    runtime.page_mut().set_viewport_width(600);
    runtime.dispatch(PageEvent::Resized);
    runtime.page_mut().advance(ms(100));
    runtime.dispatch(PageEvent::Resized);
    assert_eq!(runtime.next_deadline(), Some(ms(250)));

    runtime.page_mut().advance(ms(100));
    assert!(!runtime.tick());
    assert_eq!(runtime.page().layout_mode(), LayoutMode::Desktop);

    runtime.page_mut().advance(ms(50));
    assert!(runtime.tick());
    assert_eq!(runtime.page().layout_mode(), LayoutMode::Mobile);
    assert_eq!(runtime.current_section(), Section::Landing);

    runtime.page_mut().set_viewport_width(1024);
    runtime.dispatch(PageEvent::Resized);
    runtime.page_mut().advance(ms(150));
    runtime.tick();
    assert_eq!(runtime.page().layout_mode(), LayoutMode::Desktop);
}

#[test]
fn test_next_deadline_is_earliest_pending() {
    let mut runtime = runtime();
    assert_eq!(runtime.next_deadline(), None);

    runtime.dispatch(PageEvent::Resized);
    runtime.page_mut().advance(ms(10));
    runtime.navigate(Section::About);

    assert_eq!(runtime.next_deadline(), Some(ms(60)));
}

#[test]
fn test_scroll_does_not_touch_the_page() {
    let mut runtime = runtime();
    let mutations = runtime.page().mutation_count();

    for _ in 0..5 {
        let response = runtime.dispatch(PageEvent::Scrolled);
        assert_eq!(response, EventResponse::default());
        runtime.page_mut().advance(ms(30));
    }

    assert_eq!(runtime.page().mutation_count(), mutations);
    assert_eq!(runtime.next_deadline(), None);
}

#[test]
fn test_image_events() {
    let mut runtime = runtime();
    let (src, image) = runtime.page().images()[0].clone();

    runtime.dispatch(PageEvent::ImageLoaded {
        element: image,
        src: src.clone(),
    });
    assert_eq!(runtime.page().style(image, "opacity"), Some("1"));

    let mutations = runtime.page().mutation_count();
    runtime.dispatch(PageEvent::ImageFailed {
        src: "images/missing.jpg".to_string(),
    });
    assert_eq!(runtime.page().mutation_count(), mutations);
}

#[test]
fn test_page_errors_and_load_metrics_are_only_logged() {
    let mut runtime = runtime();
    runtime.navigate(Section::Gallery);
    let mutations = runtime.page().mutation_count();

    runtime.dispatch(PageEvent::Error(ErrorReport {
        message: "Uncaught TypeError: x is undefined".to_string(),
        filename: "https://aslamvillan.example/widget.js".to_string(),
        line: 12,
        column: 7,
    }));
    runtime.dispatch(PageEvent::Loaded(NavigationTiming {
        fetch_start: 1.0,
        dom_content_loaded_event_start: 80.0,
        dom_content_loaded_event_end: 84.0,
        load_event_start: 150.0,
        load_event_end: 152.0,
    }));

    assert_eq!(runtime.current_section(), Section::Gallery);
    assert_eq!(runtime.page().mutation_count(), mutations);
}
