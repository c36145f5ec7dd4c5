use crate::domain::model::Section;
use crate::domain::ports::Page;
use crate::utils::error::{NavError, Result};

pub const LINK_ROLE: &str = "nav-link";
pub const CONTENT_ROLE: &str = "content-section";

#[derive(Debug, Clone)]
pub struct SectionElements<E> {
    pub link: E,
    pub content: E,
}

/// Every section's link and content element, resolved once at start-up.
#[derive(Debug, Clone)]
pub struct SectionMap<E> {
    entries: Vec<SectionElements<E>>,
}

impl<E: Clone> SectionMap<E> {
    /// Queries the page once and checks that links and content sections map
    /// one-to-one onto [`Section::ALL`]. Links without `data-section` are
    /// ordinary links and are skipped.
    pub fn bind<P: Page<Element = E>>(page: &P) -> Result<Self> {
        let mut links: Vec<Option<E>> = vec![None; Section::ALL.len()];
        let mut contents: Vec<Option<E>> = vec![None; Section::ALL.len()];

        for (attribute, element) in page.nav_links() {
            let Some(id) = attribute else {
                continue;
            };
            let section = resolve(LINK_ROLE, &id)?;
            place(&mut links, section, element, LINK_ROLE)?;
        }

        for (id, element) in page.content_sections() {
            let section = resolve(CONTENT_ROLE, &id)?;
            place(&mut contents, section, element, CONTENT_ROLE)?;
        }

        let entries = Section::ALL
            .iter()
            .zip(links.into_iter().zip(contents))
            .map(|(section, pair)| match pair {
                (Some(link), Some(content)) => Ok(SectionElements { link, content }),
                (None, _) => Err(missing(*section, LINK_ROLE)),
                (_, None) => Err(missing(*section, CONTENT_ROLE)),
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { entries })
    }

    pub fn get(&self, section: Section) -> &SectionElements<E> {
        &self.entries[section.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Section, &SectionElements<E>)> {
        Section::ALL.into_iter().zip(self.entries.iter())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn resolve(role: &str, id: &str) -> Result<Section> {
    id.parse().map_err(|_| NavError::UnknownElement {
        role: role.to_string(),
        id: id.to_string(),
    })
}

fn place<E>(slots: &mut [Option<E>], section: Section, element: E, role: &str) -> Result<()> {
    let slot = &mut slots[section.index()];
    if slot.is_some() {
        return Err(NavError::DuplicateElement {
            section: section.id().to_string(),
            role: role.to_string(),
        });
    }
    *slot = Some(element);
    Ok(())
}

fn missing(section: Section, role: &str) -> NavError {
    NavError::MissingElement {
        section: section.id().to_string(),
        role: role.to_string(),
    }
}
