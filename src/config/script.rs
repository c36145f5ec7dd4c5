use crate::domain::model::{Key, KeyInput};
use crate::utils::error::NavError;
use std::str::FromStr;
use std::time::Duration;

/// One step of a simulated session, e.g. `click:research`,
/// `key:Alt+ArrowRight`, `resize:600`, `wait:200`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptStep {
    Click(String),
    Navigate(String),
    Key(KeyInput),
    Resize(u32),
    Scroll,
    Wait(Duration),
    ImageLoad(String),
    ImageError(String),
}

impl FromStr for ScriptStep {
    type Err = NavError;

    fn from_str(step: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| NavError::InvalidScriptStep {
            step: step.to_string(),
            reason: reason.to_string(),
        };

        let (kind, argument) = match step.split_once(':') {
            Some((kind, argument)) => (kind.trim(), Some(argument.trim())),
            None => (step.trim(), None),
        };

        let required = |argument: Option<&str>| -> Result<String, NavError> {
            match argument {
                Some(value) if !value.is_empty() => Ok(value.to_string()),
                _ => Err(invalid("missing argument")),
            }
        };

        match kind {
            "click" => Ok(ScriptStep::Click(required(argument)?)),
            "navigate" => Ok(ScriptStep::Navigate(required(argument)?)),
            "key" => parse_key(&required(argument)?).map(ScriptStep::Key).ok_or_else(|| {
                invalid("expected a DOM key name such as Escape or Alt+ArrowLeft")
            }),
            "resize" => required(argument)?
                .parse::<u32>()
                .map(ScriptStep::Resize)
                .map_err(|_| invalid("width must be a whole number of pixels")),
            "scroll" => Ok(ScriptStep::Scroll),
            "wait" => required(argument)?
                .parse::<u64>()
                .map(|ms| ScriptStep::Wait(Duration::from_millis(ms)))
                .map_err(|_| invalid("wait must be a whole number of milliseconds")),
            "image-load" => Ok(ScriptStep::ImageLoad(required(argument)?)),
            "image-error" => Ok(ScriptStep::ImageError(required(argument)?)),
            _ => Err(invalid("unknown step kind")),
        }
    }
}

fn parse_key(value: &str) -> Option<KeyInput> {
    let (alt, key) = match value.strip_prefix("Alt+") {
        Some(rest) => (true, rest),
        None => (false, value),
    };
    if key.is_empty() || key.contains('+') {
        return None;
    }
    Some(KeyInput {
        key: Key::from_dom(key),
        alt,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_steps() {
        assert_eq!(
            "click:research".parse::<ScriptStep>().unwrap(),
            ScriptStep::Click("research".to_string())
        );
        assert_eq!(
            "key:Alt+ArrowLeft".parse::<ScriptStep>().unwrap(),
            ScriptStep::Key(KeyInput::with_alt(Key::ArrowLeft))
        );
        assert_eq!(
            "key:Escape".parse::<ScriptStep>().unwrap(),
            ScriptStep::Key(KeyInput::plain(Key::Escape))
        );
        assert_eq!(
            "resize:600".parse::<ScriptStep>().unwrap(),
            ScriptStep::Resize(600)
        );
        assert_eq!(
            "wait:250".parse::<ScriptStep>().unwrap(),
            ScriptStep::Wait(Duration::from_millis(250))
        );
        assert_eq!("scroll".parse::<ScriptStep>().unwrap(), ScriptStep::Scroll);
    }

    #[test]
    fn test_reject_malformed_steps() {
        assert!("click".parse::<ScriptStep>().is_err());
        assert!("click:".parse::<ScriptStep>().is_err());
        assert!("resize:wide".parse::<ScriptStep>().is_err());
        assert!("wait:-5".parse::<ScriptStep>().is_err());
        assert!("key:Ctrl+Shift+A".parse::<ScriptStep>().is_err());
        assert!("hover:about".parse::<ScriptStep>().is_err());
    }
}
