#![cfg(feature = "cli")]

use anyhow::Result;
use section_nav::config::script::ScriptStep;
use section_nav::{LayoutMode, MemoryPage, NavConfig, NavError, Section, Simulator};

fn steps(raw: &[&str]) -> Vec<ScriptStep> {
    raw.iter().map(|step| step.parse().unwrap()).collect()
}

#[tokio::test(start_paused = true)]
async fn test_replay_research_twice_then_escape() -> Result<()> {
    let mut simulator = Simulator::new(MemoryPage::academic_site(), &NavConfig::default())?;

    simulator
        .run(&steps(&[
            "click:research",
            "wait:100",
            "click:research",
            "key:Escape",
        ]))
        .await?;

    let report = simulator.report();
    assert_eq!(report.current_section, Section::Landing);
    assert_eq!(report.fragment, "#landing");
    assert_eq!(report.section_views.len(), 2);
    assert_eq!(report.page.live_region.as_deref(), Some("Now viewing Home section"));

    let landing = &report.page.sections[Section::Landing.index()];
    assert!(landing.visible);
    assert!(landing.link_active);
    assert_eq!(landing.opacity.as_deref(), Some("1"));

    let research = &report.page.sections[Section::Research.index()];
    assert!(!research.visible);
    assert_eq!(research.aria_hidden.as_deref(), Some("true"));
    assert_eq!(research.aria_current, None);

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_settle_fires_pending_resize() -> Result<()> {
    let mut simulator = Simulator::new(MemoryPage::academic_site(), &NavConfig::default())?;

    simulator
        .run(&steps(&["resize:900", "resize:500", "scroll", "scroll"]))
        .await?;

    let report = simulator.report();
    assert_eq!(report.page.layout, LayoutMode::Mobile);
    assert_eq!(report.current_section, Section::Landing);
    assert!(report.elapsed_ms >= 150);

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_wait_fires_reveal_inside_window() -> Result<()> {
    let mut simulator = Simulator::new(MemoryPage::academic_site(), &NavConfig::default())?;

    simulator.apply(&"key:Alt+ArrowRight".parse::<ScriptStep>()?).await?;
    let about = simulator.runtime().page().content_for(Section::About).unwrap();
    assert_eq!(simulator.runtime().page().style(about, "opacity"), Some("0"));

    simulator.apply(&"wait:60".parse::<ScriptStep>()?).await?;
    assert_eq!(simulator.runtime().page().style(about, "opacity"), Some("1"));
    assert_eq!(simulator.runtime().next_deadline(), None);

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_unknown_image_is_reported() -> Result<()> {
    let mut simulator = Simulator::new(MemoryPage::academic_site(), &NavConfig::default())?;

    let result = simulator.run(&steps(&["image-load:images/nope.jpg"])).await;
    assert!(matches!(result, Err(NavError::InvalidScriptStep { .. })));

    simulator
        .run(&steps(&["image-load:images/profile.jpg", "image-error:images/lab.jpg"]))
        .await?;

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_report_serializes_to_json() -> Result<()> {
    let mut simulator = Simulator::new(MemoryPage::academic_site(), &NavConfig::default())?;
    simulator.run(&steps(&["navigate:gallery"])).await?;

    let json = serde_json::to_value(simulator.report())?;
    assert_eq!(json["current_section"], "gallery");
    assert_eq!(json["fragment"], "#gallery");
    assert_eq!(json["page"]["layout"], "desktop");
    assert_eq!(json["available_sections"].as_array().map(Vec::len), Some(5));

    Ok(())
}
