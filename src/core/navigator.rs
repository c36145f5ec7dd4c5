use crate::config::toml_config::NavConfig;
use crate::core::binding::SectionMap;
use crate::domain::model::{Section, SectionStyle};
use crate::domain::ports::Page;
use crate::utils::error::Result;
use crate::utils::timing::Deferred;
use std::time::Duration;

pub const LIVE_REGION_ID: &str = "aria-live-region";
pub const ACTIVE_CLASS: &str = "active";
pub const HIDDEN_CLASS: &str = "hidden";
pub const LOADED_CLASS: &str = "loaded";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavOutcome {
    Moved { from: Section, to: Section },
    Unchanged,
    Rejected,
}

impl NavOutcome {
    pub fn moved_to(self) -> Option<Section> {
        match self {
            NavOutcome::Moved { to, .. } => Some(to),
            _ => None,
        }
    }
}

/// Owns the current section and applies every transition's side effects to
/// the page.
pub struct SectionNavigator<P: Page> {
    page: P,
    elements: SectionMap<P::Element>,
    current: Section,
    default_section: Section,
    live_region: Option<P::Element>,
    reveal: Deferred<Section>,
}

impl<P: Page> SectionNavigator<P> {
    pub fn new(page: P, config: &NavConfig) -> Result<Self> {
        let default_section = config.default_section()?;
        let elements = SectionMap::bind(&page)?;
        tracing::info!(
            "📋 Cached {} nav links and {} content sections",
            elements.len(),
            elements.len()
        );

        let mut navigator = Self {
            page,
            elements,
            current: default_section,
            default_section,
            live_region: None,
            reveal: Deferred::new(config.reveal_delay()),
        };

        let transition = config.transition_css();
        for (_, entry) in navigator.elements.iter() {
            navigator
                .page
                .set_style(&entry.content, "transition", &transition);
        }

        navigator.update_links(default_section);
        navigator.update_sections(default_section);
        navigator.reveal.cancel();
        navigator.apply_style(default_section, SectionStyle::Shown);

        let body = navigator.page.body();
        navigator.page.set_class(&body, LOADED_CLASS, true);
        tracing::info!("🧭 Navigation system initialized on '{}'", default_section);

        Ok(navigator)
    }

    pub fn current_section(&self) -> Section {
        self.current
    }

    pub fn default_section(&self) -> Section {
        self.default_section
    }

    pub fn available_sections(&self) -> &'static [Section] {
        &Section::ALL
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut P {
        &mut self.page
    }

    /// Navigates by section id. Unknown ids are logged and ignored.
    pub fn navigate_to(&mut self, target: &str) -> NavOutcome {
        match target.parse::<Section>() {
            Ok(section) => self.navigate(section),
            Err(_) => {
                tracing::warn!("⚠️ Invalid section: {}", target);
                NavOutcome::Rejected
            }
        }
    }

    pub fn navigate(&mut self, target: Section) -> NavOutcome {
        if target == self.current {
            tracing::debug!("📍 Already on section: {}", target);
            return NavOutcome::Unchanged;
        }

        tracing::info!("🎯 Navigating to section: {}", target);
        let from = self.current;

        self.update_links(target);
        self.update_sections(target);
        self.current = target;
        self.update_hash(target);
        self.announce(target);

        NavOutcome::Moved { from, to: target }
    }

    /// Applies the pending reveal once its delay has elapsed.
    pub fn poll_reveal(&mut self) -> bool {
        let now = self.page.now();
        match self.reveal.take_due(now) {
            Some(section) => {
                self.apply_style(section, SectionStyle::Shown);
                true
            }
            None => false,
        }
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.reveal.deadline()
    }

    fn update_links(&mut self, target: Section) {
        for (section, entry) in self.elements.iter() {
            let active = section == target;
            self.page.set_class(&entry.link, ACTIVE_CLASS, active);
            self.page
                .set_attribute(&entry.link, "aria-current", active.then_some("page"));
        }
    }

    fn update_sections(&mut self, target: Section) {
        for (section, entry) in self.elements.iter() {
            if section == target {
                self.page.set_class(&entry.content, HIDDEN_CLASS, false);
                self.page
                    .set_attribute(&entry.content, "aria-hidden", Some("false"));
            } else {
                self.page.set_class(&entry.content, HIDDEN_CLASS, true);
                self.page
                    .set_attribute(&entry.content, "aria-hidden", Some("true"));
                set_section_style(&mut self.page, &entry.content, SectionStyle::Concealed);
            }
        }

        // 讓 CSS transition 先生效再顯示
        let now = self.page.now();
        self.reveal.schedule(now, target);
    }

    fn apply_style(&mut self, section: Section, style: SectionStyle) {
        let content = self.elements.get(section).content.clone();
        set_section_style(&mut self.page, &content, style);
    }

    fn update_hash(&mut self, target: Section) {
        let hash = format!("#{}", target.id());
        if self.page.location_hash() != hash {
            self.page.replace_hash(&hash);
        }
    }

    fn announce(&mut self, target: Section) {
        let message = format!("Now viewing {} section", target.display_name());
        let region = self.live_region();
        self.page.set_text(&region, &message);
    }

    fn live_region(&mut self) -> P::Element {
        if let Some(region) = &self.live_region {
            return region.clone();
        }

        let region = match self.page.find_by_id(LIVE_REGION_ID) {
            Some(existing) => existing,
            None => {
                let region = self.page.create_div(LIVE_REGION_ID);
                self.page.set_attribute(&region, "aria-live", Some("polite"));
                self.page.set_attribute(&region, "aria-atomic", Some("true"));
                for (property, value) in [
                    ("position", "absolute"),
                    ("left", "-10000px"),
                    ("width", "1px"),
                    ("height", "1px"),
                    ("overflow", "hidden"),
                ] {
                    self.page.set_style(&region, property, value);
                }
                region
            }
        };

        self.live_region = Some(region.clone());
        region
    }
}

fn set_section_style<P: Page>(page: &mut P, content: &P::Element, style: SectionStyle) {
    page.set_style(content, "opacity", style.opacity());
    page.set_style(content, "transform", style.transform());
}
