use crate::domain::model::{Key, KeyInput, Section};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    Previous,
    Next,
    Reset,
}

impl KeyCommand {
    /// Alt+arrows cycle through sections; Escape resets with or without Alt.
    pub fn from_input(input: KeyInput) -> Option<KeyCommand> {
        match (input.key, input.alt) {
            (Key::Escape, _) => Some(KeyCommand::Reset),
            (Key::ArrowUp | Key::ArrowLeft, true) => Some(KeyCommand::Previous),
            (Key::ArrowDown | Key::ArrowRight, true) => Some(KeyCommand::Next),
            _ => None,
        }
    }

    pub fn target(self, current: Section, default_section: Section) -> Section {
        match self {
            KeyCommand::Previous => current.previous(),
            KeyCommand::Next => current.next(),
            KeyCommand::Reset => default_section,
        }
    }

    /// Arrow shortcuts suppress the browser's own scrolling.
    pub fn prevents_default(self) -> bool {
        !matches!(self, KeyCommand::Reset)
    }
}
