use crate::domain::model::Section;
use crate::utils::error::{NavError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NavConfig {
    pub site: SiteConfig,
    pub navigation: NavigationConfig,
    pub timing: TimingConfig,
    pub layout: LayoutConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub title: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "ASLAM VILLAN".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    pub default_section: String,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            default_section: Section::Landing.id().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub reveal_delay_ms: u64,
    pub transition_ms: u64,
    pub resize_debounce_ms: u64,
    pub scroll_throttle_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            reveal_delay_ms: 50,
            transition_ms: 250,
            resize_debounce_ms: 150,
            scroll_throttle_ms: 100,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub mobile_max_width: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            mobile_max_width: 768,
        }
    }
}

impl NavConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(NavError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| NavError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SITE_TITLE})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| NavError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("site.title", &self.site.title)?;
        self.default_section()?;

        validation::validate_range("timing.reveal_delay_ms", self.timing.reveal_delay_ms, 0, 1_000)?;
        validation::validate_range("timing.transition_ms", self.timing.transition_ms, 0, 5_000)?;
        validation::validate_positive_number(
            "timing.resize_debounce_ms",
            self.timing.resize_debounce_ms,
            1,
        )?;
        validation::validate_positive_number(
            "timing.scroll_throttle_ms",
            self.timing.scroll_throttle_ms,
            1,
        )?;

        validation::validate_range("layout.mobile_max_width", self.layout.mobile_max_width, 1, 10_000)?;

        Ok(())
    }

    pub fn default_section(&self) -> Result<Section> {
        validation::validate_section_id(
            "navigation.default_section",
            &self.navigation.default_section,
        )
    }

    pub fn reveal_delay(&self) -> Duration {
        Duration::from_millis(self.timing.reveal_delay_ms)
    }

    pub fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.timing.resize_debounce_ms)
    }

    pub fn scroll_throttle(&self) -> Duration {
        Duration::from_millis(self.timing.scroll_throttle_ms)
    }

    /// CSS `transition` declaration applied to every content section.
    pub fn transition_css(&self) -> String {
        format!(
            "opacity {ms}ms ease, transform {ms}ms ease",
            ms = self.timing.transition_ms
        )
    }
}

impl Validate for NavConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = NavConfig::from_toml_str("").unwrap();

        assert_eq!(config.default_section().unwrap(), Section::Landing);
        assert_eq!(config.reveal_delay(), Duration::from_millis(50));
        assert_eq!(config.resize_debounce(), Duration::from_millis(150));
        assert_eq!(config.scroll_throttle(), Duration::from_millis(100));
        assert_eq!(config.layout.mobile_max_width, 768);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_toml_config() {
        let toml_content = r#"
[site]
title = "Research Group"

[navigation]
default_section = "about"

[timing]
resize_debounce_ms = 200
"#;

        let config = NavConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.site.title, "Research Group");
        assert_eq!(config.default_section().unwrap(), Section::About);
        assert_eq!(config.timing.resize_debounce_ms, 200);
        assert_eq!(config.timing.scroll_throttle_ms, 100);
        assert_eq!(
            config.transition_css(),
            "opacity 250ms ease, transform 250ms ease"
        );
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("SECTION_NAV_TEST_TITLE", "Env Title");

        let toml_content = r#"
[site]
title = "${SECTION_NAV_TEST_TITLE}"
"#;

        let config = NavConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.site.title, "Env Title");

        std::env::remove_var("SECTION_NAV_TEST_TITLE");
    }

    #[test]
    fn test_config_validation() {
        let invalid_section = NavConfig::from_toml_str(
            r#"
[navigation]
default_section = "contact"
"#,
        )
        .unwrap();
        assert!(invalid_section.validate().is_err());

        let zero_debounce = NavConfig::from_toml_str(
            r#"
[timing]
resize_debounce_ms = 0
"#,
        )
        .unwrap();
        assert!(zero_debounce.validate().is_err());
    }

    #[test]
    fn test_malformed_toml_is_rejected() {
        let result = NavConfig::from_toml_str("[timing\nreveal_delay_ms = 5");
        assert!(matches!(
            result,
            Err(NavError::ConfigValidationError { .. })
        ));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[layout]
mobile_max_width = 640
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = NavConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.layout.mobile_max_width, 640);
    }
}
