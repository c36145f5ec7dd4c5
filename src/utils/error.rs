use thiserror::Error;

#[derive(Error, Debug)]
pub enum NavError {
    #[error("Invalid section: {value}")]
    InvalidSection { value: String },

    #[error("Section '{section}' has no {role} element")]
    MissingElement { section: String, role: String },

    #[error("{role} element refers to unknown section '{id}'")]
    UnknownElement { role: String, id: String },

    #[error("Section '{section}' has more than one {role} element")]
    DuplicateElement { section: String, role: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid script step '{step}': {reason}")]
    InvalidScriptStep { step: String, reason: String },

    #[cfg(feature = "web")]
    #[error("Browser API error: {message}")]
    Js { message: String },
}

impl NavError {
    /// 頁面結構錯誤（連結或區塊缺失、重複、未知）
    pub fn is_markup_error(&self) -> bool {
        matches!(
            self,
            NavError::MissingElement { .. }
                | NavError::UnknownElement { .. }
                | NavError::DuplicateElement { .. }
        )
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            NavError::InvalidSection { value } => {
                format!("'{}' is not one of the site's sections", value)
            }
            NavError::MissingElement { .. }
            | NavError::UnknownElement { .. }
            | NavError::DuplicateElement { .. } => {
                format!("The page markup does not match the section list: {}", self)
            }
            NavError::IoError(e) => format!("Could not read a file: {}", e),
            NavError::SerializationError(e) => format!("Could not write JSON output: {}", e),
            NavError::ConfigError { .. }
            | NavError::ConfigValidationError { .. }
            | NavError::InvalidConfigValueError { .. } => {
                format!("The configuration is not valid: {}", self)
            }
            NavError::InvalidScriptStep { step, .. } => {
                format!("Could not understand the step '{}'", step)
            }
            #[cfg(feature = "web")]
            NavError::Js { message } => format!("The browser rejected an operation: {}", message),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            NavError::InvalidSection { .. } => {
                "Use one of: landing, about, research, publications, gallery"
            }
            NavError::MissingElement { .. } => {
                "Add a .nav-link[data-section] and a .content-section with a matching id for every section"
            }
            NavError::UnknownElement { .. } => {
                "Fix the data-section attribute or content-section id to name an existing section"
            }
            NavError::DuplicateElement { .. } => {
                "Keep exactly one nav link and one content section per section"
            }
            NavError::IoError(_) => "Check that the file exists and is readable",
            NavError::SerializationError(_) => "Report this as a bug",
            NavError::ConfigError { .. }
            | NavError::ConfigValidationError { .. }
            | NavError::InvalidConfigValueError { .. } => {
                "Check the TOML configuration against the documented keys and ranges"
            }
            NavError::InvalidScriptStep { .. } => {
                "Steps look like click:research, key:Alt+ArrowRight, resize:600, wait:200"
            }
            #[cfg(feature = "web")]
            NavError::Js { .. } => "Check the browser console for details",
        }
    }
}

#[cfg(feature = "web")]
impl From<wasm_bindgen::JsValue> for NavError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        NavError::Js {
            message: value
                .as_string()
                .unwrap_or_else(|| format!("{:?}", value)),
        }
    }
}

pub type Result<T> = std::result::Result<T, NavError>;
