//! Browser host: binds the runtime to the live DOM through `web-sys` and
//! exports the public navigation surface to JavaScript.

use crate::config::toml_config::NavConfig;
use crate::core::runtime::{PageEvent, Runtime};
use crate::domain::model::{ErrorReport, Key, KeyInput, NavigationTiming};
use crate::domain::ports::Page;
use crate::utils::error::{NavError, Result};
use crate::utils::logger;
use crate::utils::timing::{Rearm, TimerSlot};
use crate::utils::validation::Validate;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, ErrorEvent, Event, EventTarget, HtmlElement, KeyboardEvent, Window,
};

pub struct DomPage {
    window: Window,
    document: Document,
    body: Element,
    wake: TimerSlot<i32>,
}

impl DomPage {
    pub fn from_window() -> Result<Self> {
        let window = web_sys::window().ok_or_else(|| NavError::Js {
            message: "no global window".to_string(),
        })?;
        let document = window.document().ok_or_else(|| NavError::Js {
            message: "window has no document".to_string(),
        })?;
        let body = document
            .body()
            .map(|body| body.unchecked_into::<Element>())
            .ok_or_else(|| NavError::Js {
                message: "document has no body".to_string(),
            })?;
        Ok(Self {
            window,
            document,
            body,
            wake: TimerSlot::default(),
        })
    }

    fn query_all(&self, selector: &str) -> Vec<Element> {
        let list = match self.document.query_selector_all(selector) {
            Ok(list) => list,
            Err(e) => {
                tracing::warn!("⚠️ Query '{}' failed: {:?}", selector, e);
                return Vec::new();
            }
        };
        (0..list.length())
            .filter_map(|index| list.get(index))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }
}

fn warn_on_err(operation: &str, result: std::result::Result<(), JsValue>) {
    if let Err(e) = result {
        tracing::warn!("⚠️ {} failed: {:?}", operation, e);
    }
}

impl Page for DomPage {
    type Element = Element;

    fn nav_links(&self) -> Vec<(Option<String>, Element)> {
        self.query_all(".nav-link")
            .into_iter()
            .map(|link| (link.get_attribute("data-section"), link))
            .collect()
    }

    fn content_sections(&self) -> Vec<(String, Element)> {
        self.query_all(".content-section")
            .into_iter()
            .map(|section| (section.id(), section))
            .collect()
    }

    fn body(&self) -> Element {
        self.body.clone()
    }

    fn find_by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn create_div(&mut self, id: &str) -> Element {
        let div = match self.document.create_element("div") {
            Ok(div) => div,
            Err(e) => {
                tracing::warn!("⚠️ create_element failed: {:?}", e);
                return self.body();
            }
        };
        div.set_id(id);
        if let Err(e) = self.body.append_child(&div) {
            tracing::warn!("⚠️ append_child failed: {:?}", e);
        }
        div
    }

    fn set_class(&mut self, element: &Element, class: &str, on: bool) {
        let classes = element.class_list();
        let result = if on {
            classes.add_1(class)
        } else {
            classes.remove_1(class)
        };
        warn_on_err("classList update", result);
    }

    fn set_attribute(&mut self, element: &Element, name: &str, value: Option<&str>) {
        let result = match value {
            Some(value) => element.set_attribute(name, value),
            None => element.remove_attribute(name),
        };
        warn_on_err("attribute update", result);
    }

    fn set_style(&mut self, element: &Element, property: &str, value: &str) {
        if let Some(html) = element.dyn_ref::<HtmlElement>() {
            warn_on_err("style update", html.style().set_property(property, value));
        }
    }

    fn set_text(&mut self, element: &Element, text: &str) {
        element.set_text_content(Some(text));
    }

    fn location_hash(&self) -> String {
        self.window.location().hash().unwrap_or_default()
    }

    fn replace_hash(&mut self, hash: &str) {
        let path = self.window.location().pathname().unwrap_or_default();
        let url = format!("{}{}", path, hash);
        match self.window.history() {
            Ok(history) => warn_on_err(
                "history.replaceState",
                history.replace_state_with_url(&JsValue::NULL, "", Some(url.as_str())),
            ),
            Err(e) => tracing::warn!("⚠️ history unavailable: {:?}", e),
        }
    }

    fn viewport_width(&self) -> u32 {
        self.window
            .inner_width()
            .ok()
            .and_then(|width| width.as_f64())
            .map(|width| width.max(0.0) as u32)
            .unwrap_or(0)
    }

    fn now(&self) -> Duration {
        let millis = self
            .window
            .performance()
            .map(|performance| performance.now())
            .unwrap_or_else(js_sys::Date::now);
        Duration::from_secs_f64(millis.max(0.0) / 1000.0)
    }
}

type Shared = Rc<RefCell<Runtime<DomPage>>>;

/// Handle returned to JavaScript by [`boot`].
#[wasm_bindgen]
pub struct SiteNavigator {
    runtime: Shared,
}

#[wasm_bindgen]
impl SiteNavigator {
    #[wasm_bindgen(js_name = navigateToSection)]
    pub fn navigate_to_section(&self, section: &str) {
        if let Ok(mut runtime) = self.runtime.try_borrow_mut() {
            runtime.navigate_to_section(section);
        }
        schedule_tick(&self.runtime);
    }

    #[wasm_bindgen(js_name = getCurrentSection)]
    pub fn current_section(&self) -> String {
        match self.runtime.try_borrow() {
            Ok(runtime) => runtime.current_section().id().to_string(),
            Err(_) => {
                tracing::warn!("⚠️ Navigator busy, current section unavailable");
                String::new()
            }
        }
    }

    #[wasm_bindgen(js_name = getAvailableSections)]
    pub fn available_sections(&self) -> js_sys::Array {
        let Ok(runtime) = self.runtime.try_borrow() else {
            tracing::warn!("⚠️ Navigator busy, available sections unavailable");
            return js_sys::Array::new();
        };
        runtime
            .available_sections()
            .iter()
            .map(|section| JsValue::from_str(section.id()))
            .collect()
    }
}

/// Initialises the navigator against the current document and wires every
/// listener. `config_toml` overrides the built-in defaults.
#[wasm_bindgen]
pub fn boot(
    config_toml: Option<String>,
    verbose: bool,
) -> std::result::Result<SiteNavigator, JsValue> {
    logger::init_web_logger(verbose);
    start(config_toml.as_deref()).map_err(|e| {
        tracing::error!("❌ {}", e.user_friendly_message());
        tracing::error!("💡 {}", e.recovery_suggestion());
        JsValue::from_str(&e.to_string())
    })
}

fn start(config_toml: Option<&str>) -> Result<SiteNavigator> {
    let config = match config_toml {
        Some(content) => NavConfig::from_toml_str(content)?,
        None => NavConfig::default(),
    };
    config.validate()?;

    let page = DomPage::from_window()?;
    let window = page.window.clone();
    let document = page.document.clone();

    let runtime: Shared = Rc::new(RefCell::new(Runtime::new(page, &config)?));

    let links: Vec<(String, Element)> = runtime
        .borrow()
        .page()
        .nav_links()
        .into_iter()
        .filter_map(|(section, link)| section.map(|section| (section, link)))
        .collect();
    for (section, link) in links {
        listen(&runtime, &link, "click", move |_| {
            Some(PageEvent::LinkClicked {
                section: section.clone(),
            })
        })?;
    }

    listen(&runtime, &document, "keydown", |event| {
        let keyboard = event.dyn_ref::<KeyboardEvent>()?;
        Some(PageEvent::KeyDown(KeyInput {
            key: Key::from_dom(&keyboard.key()),
            alt: keyboard.alt_key(),
        }))
    })?;
    listen(&runtime, &window, "resize", |_| Some(PageEvent::Resized))?;
    listen(&runtime, &window, "scroll", |_| Some(PageEvent::Scrolled))?;
    listen(&runtime, &window, "error", |event| {
        let error = event.dyn_ref::<ErrorEvent>()?;
        Some(PageEvent::Error(ErrorReport {
            message: error.message(),
            filename: error.filename(),
            line: error.lineno(),
            column: error.colno(),
        }))
    })?;

    let images: Vec<Element> = runtime.borrow().page().query_all("img");
    for image in images {
        let src = image.get_attribute("src").unwrap_or_default();
        let loaded = image.clone();
        let loaded_src = src.clone();
        listen(&runtime, &image, "load", move |_| {
            Some(PageEvent::ImageLoaded {
                element: loaded.clone(),
                src: loaded_src.clone(),
            })
        })?;
        listen(&runtime, &image, "error", move |_| {
            Some(PageEvent::ImageFailed { src: src.clone() })
        })?;
    }

    // loadEventEnd 在 load 事件結束後才有值
    let on_load = runtime.clone();
    let load_window = window.clone();
    let load = Closure::<dyn FnMut(Event)>::wrap(Box::new(move |_: Event| {
        let shared = on_load.clone();
        let measure = Closure::once_into_js(move || {
            if let Some(timing) = navigation_timing() {
                dispatch(&shared, PageEvent::Loaded(timing));
            }
        });
        warn_on_err(
            "setTimeout",
            load_window
                .set_timeout_with_callback_and_timeout_and_arguments_0(measure.unchecked_ref(), 0)
                .map(|_| ()),
        );
    }));
    window.add_event_listener_with_callback("load", load.as_ref().unchecked_ref())?;
    load.forget();

    tracing::info!("✅ Site navigator ready");
    Ok(SiteNavigator { runtime })
}

/// Registers a page-lifetime listener that turns DOM events into
/// [`PageEvent`]s.
fn listen<F>(runtime: &Shared, target: &EventTarget, kind: &str, mut translate: F) -> Result<()>
where
    F: FnMut(&Event) -> Option<PageEvent<Element>> + 'static,
{
    let shared = runtime.clone();
    let handler = Closure::<dyn FnMut(Event)>::wrap(Box::new(move |event: Event| {
        if let Some(page_event) = translate(&event) {
            if dispatch(&shared, page_event) {
                event.prevent_default();
            }
        }
    }));
    target.add_event_listener_with_callback(kind, handler.as_ref().unchecked_ref())?;
    handler.forget();
    Ok(())
}

/// Returns whether the host default action should be prevented.
fn dispatch(runtime: &Shared, event: PageEvent<Element>) -> bool {
    let prevent_default = match runtime.try_borrow_mut() {
        Ok(mut runtime) => runtime.dispatch(event).prevent_default,
        Err(_) => {
            tracing::warn!("⚠️ Re-entrant page event dropped");
            false
        }
    };
    schedule_tick(runtime);
    prevent_default
}

/// Keeps exactly one `setTimeout` armed for the runtime's earliest pending
/// deadline. An armed timer that fires no later than the deadline is left
/// alone; a later one is cleared and replaced.
fn schedule_tick(runtime: &Shared) {
    let Ok(mut state) = runtime.try_borrow_mut() else {
        return;
    };
    let Some(deadline) = state.next_deadline() else {
        return;
    };
    let delay = deadline.saturating_sub(state.page().now());
    let page = state.page_mut();
    match page.wake.plan(deadline) {
        Rearm::Keep => return,
        Rearm::Arm => {}
        Rearm::Replace(handle) => page.window.clear_timeout_with_handle(handle),
    }

    let shared = runtime.clone();
    let callback = Closure::once_into_js(move || {
        if let Ok(mut runtime) = shared.try_borrow_mut() {
            runtime.page_mut().wake.fired();
            runtime.tick();
        }
        schedule_tick(&shared);
    });
    let millis = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
    match page
        .window
        .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), millis)
    {
        Ok(handle) => page.wake.arm(handle, deadline),
        Err(e) => tracing::warn!("⚠️ setTimeout failed: {:?}", e),
    }
}

fn navigation_timing() -> Option<NavigationTiming> {
    let performance = web_sys::window()?.performance()?;
    let entry = performance.get_entries_by_type("navigation").get(0);
    if entry.is_undefined() {
        return None;
    }
    let mark = |name: &str| {
        js_sys::Reflect::get(&entry, &JsValue::from_str(name))
            .ok()
            .and_then(|value| value.as_f64())
            .unwrap_or(0.0)
    };
    Some(NavigationTiming {
        fetch_start: mark("fetchStart"),
        dom_content_loaded_event_start: mark("domContentLoadedEventStart"),
        dom_content_loaded_event_end: mark("domContentLoadedEventEnd"),
        load_event_start: mark("loadEventStart"),
        load_event_end: mark("loadEventEnd"),
    })
}
