use crate::adapters::memory::{MemoryPage, PageSnapshot, RecordingAnalytics};
use crate::config::script::ScriptStep;
use crate::config::toml_config::NavConfig;
use crate::core::runtime::{PageEvent, Runtime};
use crate::domain::model::{Section, SectionView};
use crate::domain::ports::Page;
use crate::utils::error::{NavError, Result};
use serde::Serialize;
use std::time::Duration;
use tokio::time::Instant;

/// Drives a [`Runtime`] over an in-memory page on the tokio clock, the way a
/// browser event loop would: one event at a time, deferred work fired when
/// its deadline passes.
pub struct Simulator {
    runtime: Runtime<MemoryPage, RecordingAnalytics>,
    origin: Instant,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionReport {
    pub current_section: Section,
    pub available_sections: Vec<Section>,
    pub fragment: String,
    pub elapsed_ms: u128,
    pub section_views: Vec<SectionView>,
    pub page: PageSnapshot,
}

impl Simulator {
    pub fn new(page: MemoryPage, config: &NavConfig) -> Result<Self> {
        let origin = Instant::now();
        let runtime = Runtime::with_analytics(page, config, RecordingAnalytics::default())?;
        Ok(Self { runtime, origin })
    }

    pub fn runtime(&self) -> &Runtime<MemoryPage, RecordingAnalytics> {
        &self.runtime
    }

    pub async fn run(&mut self, steps: &[ScriptStep]) -> Result<()> {
        for step in steps {
            tracing::debug!("▶️ {:?}", step);
            self.apply(step).await?;
        }
        self.settle().await;
        Ok(())
    }

    pub async fn apply(&mut self, step: &ScriptStep) -> Result<()> {
        self.sync_clock();
        self.runtime.tick();

        match step {
            ScriptStep::Click(section) => {
                self.runtime.dispatch(PageEvent::LinkClicked {
                    section: section.clone(),
                });
            }
            ScriptStep::Navigate(section) => {
                self.runtime.navigate_to_section(section);
            }
            ScriptStep::Key(input) => {
                self.runtime.dispatch(PageEvent::KeyDown(*input));
            }
            ScriptStep::Resize(width) => {
                self.runtime.page_mut().set_viewport_width(*width);
                self.runtime.dispatch(PageEvent::Resized);
            }
            ScriptStep::Scroll => {
                self.runtime.dispatch(PageEvent::Scrolled);
            }
            ScriptStep::Wait(duration) => self.wait(*duration).await,
            ScriptStep::ImageLoad(src) => {
                let element = self.image(src)?;
                self.runtime.dispatch(PageEvent::ImageLoaded {
                    element,
                    src: src.clone(),
                });
            }
            ScriptStep::ImageError(src) => {
                self.image(src)?;
                self.runtime
                    .dispatch(PageEvent::ImageFailed { src: src.clone() });
            }
        }
        Ok(())
    }

    /// Lets time pass, firing every deadline that falls inside the window.
    pub async fn wait(&mut self, duration: Duration) {
        let until = Instant::now() + duration;
        loop {
            let next = self
                .runtime
                .next_deadline()
                .map(|deadline| self.origin + deadline)
                .filter(|at| *at <= until);
            match next {
                Some(at) => {
                    tokio::time::sleep_until(at).await;
                    self.sync_clock();
                    self.runtime.tick();
                }
                None => break,
            }
        }
        tokio::time::sleep_until(until).await;
        self.sync_clock();
        self.runtime.tick();
    }

    /// Runs all outstanding deferred work.
    pub async fn settle(&mut self) {
        while let Some(deadline) = self.runtime.next_deadline() {
            tokio::time::sleep_until(self.origin + deadline).await;
            self.sync_clock();
            self.runtime.tick();
        }
    }

    pub fn report(&self) -> SessionReport {
        let page = self.runtime.page();
        SessionReport {
            current_section: self.runtime.current_section(),
            available_sections: self.runtime.available_sections().to_vec(),
            fragment: page.location_hash(),
            elapsed_ms: page.now().as_millis(),
            section_views: self.runtime.analytics().views().to_vec(),
            page: page.snapshot(),
        }
    }

    fn sync_clock(&mut self) {
        let elapsed = self.origin.elapsed();
        self.runtime.page_mut().set_now(elapsed);
    }

    fn image(&self, src: &str) -> Result<<MemoryPage as Page>::Element> {
        self.runtime
            .page()
            .images()
            .into_iter()
            .find(|(image_src, _)| image_src == src)
            .map(|(_, element)| element)
            .ok_or_else(|| NavError::InvalidScriptStep {
                step: src.to_string(),
                reason: "no image with this src".to_string(),
            })
    }
}
