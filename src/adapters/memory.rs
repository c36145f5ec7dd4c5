use crate::core::binding::{CONTENT_ROLE, LINK_ROLE};
use crate::core::layout::MOBILE_LAYOUT_CLASS;
use crate::core::navigator::{ACTIVE_CLASS, HIDDEN_CLASS, LIVE_REGION_ID};
use crate::domain::model::{LayoutMode, Section, SectionView};
use crate::domain::ports::{Analytics, Page};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;
use url::Url;

const DEFAULT_LOCATION: &str = "https://aslamvillan.example/index.html";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct NodeId(usize);

#[derive(Debug, Clone, Default, Serialize)]
pub struct Node {
    pub tag: String,
    pub id: Option<String>,
    pub classes: BTreeSet<String>,
    pub attributes: BTreeMap<String, String>,
    pub style: BTreeMap<String, String>,
    pub text: String,
    pub children: Vec<NodeId>,
}

impl Node {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            ..Self::default()
        }
    }
}

/// In-memory document holding just the nodes the navigator touches.
/// Time is virtual and only moves when the owner advances it.
#[derive(Debug, Clone)]
pub struct MemoryPage {
    nodes: Vec<Node>,
    body: NodeId,
    location: Url,
    history_len: usize,
    viewport_width: u32,
    now: Duration,
    mutations: usize,
}

impl Default for MemoryPage {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryPage {
    pub fn new() -> Self {
        let location = Url::parse(DEFAULT_LOCATION).expect("default location is a valid URL");
        Self {
            nodes: vec![Node::new("body")],
            body: NodeId(0),
            location,
            history_len: 1,
            viewport_width: 1280,
            now: Duration::ZERO,
            mutations: 0,
        }
    }

    /// The academic site's markup: one link and one content section per
    /// section, plus a couple of images.
    pub fn academic_site() -> Self {
        let mut page = Self::new();
        for section in Section::ALL {
            page.add_nav_link(Some(section.id()));
        }
        page.add_nav_link(None);
        for section in Section::ALL {
            page.add_content_section(section.id());
        }
        page.add_image("images/profile.jpg");
        page.add_image("images/lab.jpg");
        page
    }

    pub fn add_nav_link(&mut self, section: Option<&str>) -> NodeId {
        let mut node = Node::new("a");
        node.classes.insert(LINK_ROLE.to_string());
        if let Some(section) = section {
            node.attributes
                .insert("data-section".to_string(), section.to_string());
            node.attributes
                .insert("href".to_string(), format!("#{}", section));
        }
        self.append(node)
    }

    pub fn add_content_section(&mut self, id: &str) -> NodeId {
        let mut node = Node::new("section");
        node.id = Some(id.to_string());
        node.classes.insert(CONTENT_ROLE.to_string());
        self.append(node)
    }

    pub fn add_image(&mut self, src: &str) -> NodeId {
        let mut node = Node::new("img");
        node.attributes.insert("src".to_string(), src.to_string());
        self.append(node)
    }

    /// Moves to `hash` the way an in-page anchor or `location.hash`
    /// assignment does: a new history entry is pushed.
    pub fn push_hash(&mut self, hash: &str) {
        self.set_fragment(hash);
        self.history_len += 1;
    }

    fn set_fragment(&mut self, hash: &str) {
        let fragment = hash.trim_start_matches('#');
        self.location
            .set_fragment((!fragment.is_empty()).then_some(fragment));
    }

    pub fn set_viewport_width(&mut self, width: u32) {
        self.viewport_width = width;
    }

    pub fn set_now(&mut self, now: Duration) {
        self.now = now;
    }

    pub fn advance(&mut self, delta: Duration) {
        self.now = self.now.saturating_add(delta);
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.node(id).classes.contains(class)
    }

    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.node(id).attributes.get(name).map(String::as_str)
    }

    pub fn style(&self, id: NodeId, property: &str) -> Option<&str> {
        self.node(id).style.get(property).map(String::as_str)
    }

    pub fn location(&self) -> &Url {
        &self.location
    }

    pub fn history_len(&self) -> usize {
        self.history_len
    }

    /// Number of class/attribute/style/text writes so far.
    pub fn mutation_count(&self) -> usize {
        self.mutations
    }

    pub fn link_for(&self, section: Section) -> Option<NodeId> {
        self.nav_links()
            .into_iter()
            .find(|(attr, _)| attr.as_deref() == Some(section.id()))
            .map(|(_, node)| node)
    }

    pub fn content_for(&self, section: Section) -> Option<NodeId> {
        self.find_by_id(section.id())
    }

    pub fn images(&self) -> Vec<(String, NodeId)> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.tag == "img")
            .map(|(index, node)| {
                let src = node.attributes.get("src").cloned().unwrap_or_default();
                (src, NodeId(index))
            })
            .collect()
    }

    pub fn live_region_text(&self) -> Option<&str> {
        self.find_by_id(LIVE_REGION_ID)
            .map(|id| self.node(id).text.as_str())
    }

    pub fn live_region_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|node| node.id.as_deref() == Some(LIVE_REGION_ID))
            .count()
    }

    pub fn layout_mode(&self) -> LayoutMode {
        if self.has_class(self.body, MOBILE_LAYOUT_CLASS) {
            LayoutMode::Mobile
        } else {
            LayoutMode::Desktop
        }
    }

    /// Sections whose content element is not hidden.
    pub fn visible_sections(&self) -> Vec<Section> {
        Section::ALL
            .into_iter()
            .filter(|section| {
                self.content_for(*section)
                    .is_some_and(|id| !self.has_class(id, HIDDEN_CLASS))
            })
            .collect()
    }

    /// Sections whose link carries the active marker.
    pub fn active_links(&self) -> Vec<Section> {
        Section::ALL
            .into_iter()
            .filter(|section| {
                self.link_for(*section)
                    .is_some_and(|id| self.has_class(id, ACTIVE_CLASS))
            })
            .collect()
    }

    pub fn snapshot(&self) -> PageSnapshot {
        let sections = Section::ALL
            .into_iter()
            .map(|section| {
                let content = self.content_for(section);
                let link = self.link_for(section);
                SectionSnapshot {
                    section,
                    visible: content.is_some_and(|id| !self.has_class(id, HIDDEN_CLASS)),
                    aria_hidden: content
                        .and_then(|id| self.attribute(id, "aria-hidden"))
                        .map(str::to_string),
                    opacity: content
                        .and_then(|id| self.style(id, "opacity"))
                        .map(str::to_string),
                    link_active: link.is_some_and(|id| self.has_class(id, ACTIVE_CLASS)),
                    aria_current: link
                        .and_then(|id| self.attribute(id, "aria-current"))
                        .map(str::to_string),
                }
            })
            .collect();

        PageSnapshot {
            url: self.location.to_string(),
            layout: self.layout_mode(),
            loaded: self.has_class(self.body, "loaded"),
            live_region: self.live_region_text().map(str::to_string),
            sections,
        }
    }

    fn append(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        let body = self.body;
        self.nodes[body.0].children.push(id);
        id
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        self.mutations += 1;
        &mut self.nodes[id.0]
    }
}

impl Page for MemoryPage {
    type Element = NodeId;

    fn nav_links(&self) -> Vec<(Option<String>, NodeId)> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.classes.contains(LINK_ROLE))
            .map(|(index, node)| (node.attributes.get("data-section").cloned(), NodeId(index)))
            .collect()
    }

    fn content_sections(&self) -> Vec<(String, NodeId)> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.classes.contains(CONTENT_ROLE))
            .map(|(index, node)| (node.id.clone().unwrap_or_default(), NodeId(index)))
            .collect()
    }

    fn body(&self) -> NodeId {
        self.body
    }

    fn find_by_id(&self, id: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|node| node.id.as_deref() == Some(id))
            .map(NodeId)
    }

    fn create_div(&mut self, id: &str) -> NodeId {
        let mut node = Node::new("div");
        node.id = Some(id.to_string());
        self.append(node)
    }

    fn set_class(&mut self, element: &NodeId, class: &str, on: bool) {
        let node = self.node_mut(*element);
        if on {
            node.classes.insert(class.to_string());
        } else {
            node.classes.remove(class);
        }
    }

    fn set_attribute(&mut self, element: &NodeId, name: &str, value: Option<&str>) {
        let node = self.node_mut(*element);
        match value {
            Some(value) => {
                node.attributes.insert(name.to_string(), value.to_string());
            }
            None => {
                node.attributes.remove(name);
            }
        }
    }

    fn set_style(&mut self, element: &NodeId, property: &str, value: &str) {
        self.node_mut(*element)
            .style
            .insert(property.to_string(), value.to_string());
    }

    fn set_text(&mut self, element: &NodeId, text: &str) {
        self.node_mut(*element).text = text.to_string();
    }

    fn location_hash(&self) -> String {
        self.location
            .fragment()
            .map(|fragment| format!("#{}", fragment))
            .unwrap_or_default()
    }

    fn replace_hash(&mut self, hash: &str) {
        self.set_fragment(hash);
    }

    fn viewport_width(&self) -> u32 {
        self.viewport_width
    }

    fn now(&self) -> Duration {
        self.now
    }
}

/// Analytics sink that keeps every section view in order.
#[derive(Debug, Clone, Default)]
pub struct RecordingAnalytics {
    views: Vec<SectionView>,
}

impl RecordingAnalytics {
    pub fn views(&self) -> &[SectionView] {
        &self.views
    }
}

impl Analytics for RecordingAnalytics {
    fn section_view(&mut self, view: &SectionView) {
        tracing::debug!("📊 Section view tracked: {}", view.section);
        self.views.push(view.clone());
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PageSnapshot {
    pub url: String,
    pub layout: LayoutMode,
    pub loaded: bool,
    pub live_region: Option<String>,
    pub sections: Vec<SectionSnapshot>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SectionSnapshot {
    pub section: Section,
    pub visible: bool,
    pub aria_hidden: Option<String>,
    pub opacity: Option<String>,
    pub link_active: bool,
    pub aria_current: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_academic_site_markup() {
        let page = MemoryPage::academic_site();

        assert_eq!(page.nav_links().len(), 6);
        assert_eq!(page.content_sections().len(), 5);
        assert_eq!(page.images().len(), 2);
        assert!(page.link_for(Section::Gallery).is_some());
        assert!(page.content_for(Section::Research).is_some());
    }

    #[test]
    fn test_replace_hash_keeps_history_length() {
        let mut page = MemoryPage::new();
        assert_eq!(page.location_hash(), "");

        page.replace_hash("#about");
        assert_eq!(page.location_hash(), "#about");
        assert_eq!(
            page.location().as_str(),
            "https://aslamvillan.example/index.html#about"
        );
        assert_eq!(page.history_len(), 1);

        page.push_hash("#research");
        assert_eq!(page.history_len(), 2);
        page.replace_hash("#gallery");
        page.replace_hash("#landing");
        assert_eq!(page.location_hash(), "#landing");
        assert_eq!(page.history_len(), 2);
    }

    #[test]
    fn test_mutations_are_counted() {
        let mut page = MemoryPage::new();
        let div = page.create_div("scratch");
        assert_eq!(page.mutation_count(), 0);

        page.set_class(&div, "active", true);
        page.set_attribute(&div, "aria-current", Some("page"));
        page.set_attribute(&div, "aria-current", None);
        assert_eq!(page.mutation_count(), 3);
        assert!(page.has_class(div, "active"));
        assert_eq!(page.attribute(div, "aria-current"), None);
    }
}
