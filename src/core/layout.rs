use crate::domain::model::LayoutMode;
use crate::domain::ports::Page;

pub const MOBILE_LAYOUT_CLASS: &str = "mobile-layout";

impl LayoutMode {
    pub fn for_width(width: u32, mobile_max_width: u32) -> LayoutMode {
        if width <= mobile_max_width {
            LayoutMode::Mobile
        } else {
            LayoutMode::Desktop
        }
    }
}

/// Reads the viewport width and toggles the body's layout class.
/// Presentation only; navigation state is untouched.
pub fn apply_layout<P: Page>(page: &mut P, mobile_max_width: u32) -> LayoutMode {
    let width = page.viewport_width();
    let mode = LayoutMode::for_width(width, mobile_max_width);

    let body = page.body();
    page.set_class(&body, MOBILE_LAYOUT_CLASS, mode == LayoutMode::Mobile);

    match mode {
        LayoutMode::Mobile => tracing::debug!("📱 Mobile layout activated ({}px)", width),
        LayoutMode::Desktop => tracing::debug!("💻 Desktop layout activated ({}px)", width),
    }

    mode
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_is_inclusive() {
        assert_eq!(LayoutMode::for_width(768, 768), LayoutMode::Mobile);
        assert_eq!(LayoutMode::for_width(769, 768), LayoutMode::Desktop);
        assert_eq!(LayoutMode::for_width(320, 768), LayoutMode::Mobile);
    }
}
