use crate::domain::model::SectionView;
use std::time::Duration;

/// The slice of the document the navigator reads and mutates.
///
/// `Element` is a host handle (a live DOM node in the browser, an index in the
/// in-memory document). Handles obtained once during binding stay valid for
/// the page's lifetime.
pub trait Page {
    type Element: Clone;

    /// `.nav-link` elements paired with their `data-section` attribute, if any.
    fn nav_links(&self) -> Vec<(Option<String>, Self::Element)>;

    /// `.content-section` elements paired with their `id`.
    fn content_sections(&self) -> Vec<(String, Self::Element)>;

    fn body(&self) -> Self::Element;

    fn find_by_id(&self, id: &str) -> Option<Self::Element>;

    /// Creates a `div` with the given id and appends it to the body.
    fn create_div(&mut self, id: &str) -> Self::Element;

    fn set_class(&mut self, element: &Self::Element, class: &str, on: bool);

    /// `None` removes the attribute.
    fn set_attribute(&mut self, element: &Self::Element, name: &str, value: Option<&str>);

    fn set_style(&mut self, element: &Self::Element, property: &str, value: &str);

    fn set_text(&mut self, element: &Self::Element, text: &str);

    /// Current fragment including the leading `#`, or an empty string.
    fn location_hash(&self) -> String;

    /// Replaces the current history entry so the fragment becomes `hash`
    /// without scrolling.
    fn replace_hash(&mut self, hash: &str);

    fn viewport_width(&self) -> u32;

    /// Monotonic time since the page's time origin.
    fn now(&self) -> Duration;
}

pub trait Analytics {
    fn section_view(&mut self, view: &SectionView);
}

/// Default sink: the view is only logged.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAnalytics;

impl Analytics for TracingAnalytics {
    fn section_view(&mut self, view: &SectionView) {
        tracing::info!(
            section = view.section.id(),
            page_title = %view.page_title,
            "📊 Section view tracked: {}",
            view.section
        );
    }
}
