use crate::config::toml_config::NavConfig;
use crate::core::keyboard::KeyCommand;
use crate::core::layout::apply_layout;
use crate::core::navigator::{NavOutcome, SectionNavigator};
use crate::domain::model::{
    ErrorReport, KeyInput, LoadMetrics, NavigationTiming, Section, SectionView,
};
use crate::domain::ports::{Analytics, Page, TracingAnalytics};
use crate::utils::error::Result;
use crate::utils::timing::{Debounced, Throttled};
use std::time::Duration;

/// Events a host forwards from the page.
#[derive(Debug, Clone)]
pub enum PageEvent<E> {
    LinkClicked { section: String },
    KeyDown(KeyInput),
    Resized,
    Scrolled,
    ImageLoaded { element: E, src: String },
    ImageFailed { src: String },
    Error(ErrorReport),
    Loaded(NavigationTiming),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventResponse {
    pub prevent_default: bool,
    pub outcome: Option<NavOutcome>,
}

/// Event-wiring layer: owns the navigator and the rate-limited handlers.
/// Every call runs to completion before the host delivers the next event.
pub struct Runtime<P: Page, A: Analytics = TracingAnalytics> {
    navigator: SectionNavigator<P>,
    analytics: A,
    site_title: String,
    mobile_max_width: u32,
    resize: Debounced<u32, fn(&mut P, u32)>,
    scroll: Throttled<fn(&mut P, ())>,
}

impl<P: Page> Runtime<P, TracingAnalytics> {
    pub fn new(page: P, config: &NavConfig) -> Result<Self> {
        Self::with_analytics(page, config, TracingAnalytics)
    }
}

impl<P: Page, A: Analytics> Runtime<P, A> {
    pub fn with_analytics(page: P, config: &NavConfig, analytics: A) -> Result<Self> {
        let mut navigator = SectionNavigator::new(page, config)?;

        let mobile_max_width = config.layout.mobile_max_width;
        apply_layout(navigator.page_mut(), mobile_max_width);

        tracing::info!("👂 Event listeners set up");

        Ok(Self {
            navigator,
            analytics,
            site_title: config.site.title.clone(),
            mobile_max_width,
            resize: Debounced::new(
                handle_resize::<P> as fn(&mut P, u32),
                config.resize_debounce(),
            ),
            scroll: Throttled::new(
                handle_scroll::<P> as fn(&mut P, ()),
                config.scroll_throttle(),
            ),
        })
    }

    pub fn navigator(&self) -> &SectionNavigator<P> {
        &self.navigator
    }

    pub fn page(&self) -> &P {
        self.navigator.page()
    }

    pub fn page_mut(&mut self) -> &mut P {
        self.navigator.page_mut()
    }

    pub fn analytics(&self) -> &A {
        &self.analytics
    }

    pub fn current_section(&self) -> Section {
        self.navigator.current_section()
    }

    pub fn available_sections(&self) -> &'static [Section] {
        self.navigator.available_sections()
    }

    pub fn navigate_to_section(&mut self, target: &str) -> NavOutcome {
        let outcome = self.navigator.navigate_to(target);
        self.track(outcome);
        outcome
    }

    pub fn navigate(&mut self, target: Section) -> NavOutcome {
        let outcome = self.navigator.navigate(target);
        self.track(outcome);
        outcome
    }

    pub fn dispatch(&mut self, event: PageEvent<P::Element>) -> EventResponse {
        match event {
            PageEvent::LinkClicked { section } => EventResponse {
                prevent_default: true,
                outcome: Some(self.navigate_to_section(&section)),
            },
            PageEvent::KeyDown(input) => self.handle_key(input),
            PageEvent::Resized => {
                let now = self.page().now();
                self.resize.trigger(now, self.mobile_max_width);
                EventResponse::default()
            }
            PageEvent::Scrolled => {
                let now = self.page().now();
                self.scroll.call(self.navigator.page_mut(), now, ());
                EventResponse::default()
            }
            PageEvent::ImageLoaded { element, src } => {
                tracing::debug!("✅ Image loaded successfully: {}", src);
                self.page_mut().set_style(&element, "opacity", "1");
                EventResponse::default()
            }
            PageEvent::ImageFailed { src } => {
                // 佔位圖由 CSS 處理
                tracing::debug!("🖼️ Image failed to load: {}", src);
                EventResponse::default()
            }
            PageEvent::Error(report) => {
                tracing::error!(
                    message = %report.message,
                    filename = %report.filename,
                    line = report.line,
                    column = report.column,
                    "🚨 Uncaught page error"
                );
                EventResponse::default()
            }
            PageEvent::Loaded(timing) => {
                let metrics = LoadMetrics::from(timing);
                tracing::info!(
                    dom_content_loaded_ms = metrics.dom_content_loaded_ms,
                    page_load_ms = metrics.page_load_ms,
                    total_load_ms = metrics.total_load_ms,
                    "⚡ Performance metrics"
                );
                EventResponse::default()
            }
        }
    }

    /// Runs deferred work whose deadline has passed. Returns true when
    /// anything ran.
    pub fn tick(&mut self) -> bool {
        let revealed = self.navigator.poll_reveal();
        let now = self.page().now();
        let resized = self.resize.poll(self.navigator.page_mut(), now);
        revealed || resized
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        match (self.navigator.next_deadline(), self.resize.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    fn handle_key(&mut self, input: KeyInput) -> EventResponse {
        let Some(command) = KeyCommand::from_input(input) else {
            return EventResponse::default();
        };

        let target = command.target(
            self.navigator.current_section(),
            self.navigator.default_section(),
        );
        EventResponse {
            prevent_default: command.prevents_default(),
            outcome: Some(self.navigate(target)),
        }
    }

    fn track(&mut self, outcome: NavOutcome) {
        if let Some(section) = outcome.moved_to() {
            let view = SectionView::new(&self.site_title, section);
            self.analytics.section_view(&view);
        }
    }
}

fn handle_resize<P: Page>(page: &mut P, mobile_max_width: u32) {
    apply_layout(page, mobile_max_width);
}

fn handle_scroll<P: Page>(_page: &mut P, _: ()) {
    // 保留給未來的捲動效果
    tracing::trace!("scroll");
}
