// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use strum_macros::Display;

/// Named keys the editor reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyName {
    Enter,
    Tab,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    Backspace,
    Delete,
    Escape,
    Char(char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyInfo {
    pub name: KeyName,
    pub ctrl: bool,
    pub shift: bool,
}

/// One discrete input event. `ch` is the text it types (if any), and `key` is the key
/// that was pressed (if it is one the editor knows). A bracketed paste arrives as text
/// with no key.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeyPressEvent {
    pub ch: Option<String>,
    pub key: Option<KeyInfo>,
}

impl KeyPressEvent {
    #[must_use]
    pub fn key(name: KeyName) -> Self {
        Self {
            ch: None,
            key: Some(KeyInfo {
                name,
                ctrl: false,
                shift: false,
            }),
        }
    }

    #[must_use]
    pub fn ctrl(ch: char) -> Self {
        Self {
            ch: None,
            key: Some(KeyInfo {
                name: KeyName::Char(ch),
                ctrl: true,
                shift: false,
            }),
        }
    }

    #[must_use]
    pub fn char(ch: char) -> Self {
        Self {
            ch: Some(ch.to_string()),
            key: Some(KeyInfo {
                name: KeyName::Char(ch),
                ctrl: false,
                shift: ch.is_uppercase(),
            }),
        }
    }

    #[must_use]
    pub fn text(text: &str) -> Self {
        Self {
            ch: Some(text.to_string()),
            key: None,
        }
    }

    /// Converts a crossterm event. Key releases, mouse, focus and resize events are
    /// dropped.
    #[must_use]
    pub fn from_crossterm(event: Event) -> Option<Self> {
        match event {
            Event::Key(KeyEvent {
                code,
                modifiers,
                kind: KeyEventKind::Press | KeyEventKind::Repeat,
                ..
            }) => Self::from_key_code(code, modifiers),
            Event::Paste(text) => Some(Self::text(&text)),
            _ => None,
        }
    }

    fn from_key_code(code: KeyCode, modifiers: KeyModifiers) -> Option<Self> {
        let ctrl = modifiers.contains(KeyModifiers::CONTROL);
        let shift = modifiers.contains(KeyModifiers::SHIFT);
        let name = match code {
            KeyCode::Char(ch) if ctrl => KeyName::Char(ch.to_ascii_lowercase()),
            KeyCode::Char(ch) => return Some(Self::char(ch)),
            KeyCode::Enter => KeyName::Enter,
            KeyCode::Tab | KeyCode::BackTab => KeyName::Tab,
            KeyCode::Up => KeyName::Up,
            KeyCode::Down => KeyName::Down,
            KeyCode::Left => KeyName::Left,
            KeyCode::Right => KeyName::Right,
            KeyCode::Home => KeyName::Home,
            KeyCode::End => KeyName::End,
            KeyCode::Backspace => KeyName::Backspace,
            KeyCode::Delete => KeyName::Delete,
            KeyCode::Esc => KeyName::Escape,
            _ => return None,
        };
        Some(Self {
            ch: None,
            key: Some(KeyInfo { name, ctrl, shift }),
        })
    }
}

/// What a keystroke does to the editor.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum EditorAction {
    /// Submit if the buffer is ready, otherwise a newline.
    Enter,
    /// A literal newline, even if the buffer is ready.
    InsertNewline,
    Insert(String),
    /// Single press reindents the line, double press the whole buffer.
    Tab,
    /// Single press copies the line, double press the whole buffer.
    Copy,
    Paste,
    Up,
    Down,
    Left,
    Right,
    LineStart,
    LineEnd,
    Backspace,
    Delete,
    ClearScreen,
    Interrupt,
    Exit,
}

impl EditorAction {
    /// The dispatch table.
    #[must_use]
    pub fn from_key_press(event: &KeyPressEvent) -> Option<Self> {
        if let Some(key) = event.key {
            if key.ctrl {
                return match key.name {
                    KeyName::Char('a') => Some(Self::LineStart),
                    KeyName::Char('e') => Some(Self::LineEnd),
                    KeyName::Char('y') => Some(Self::Copy),
                    KeyName::Char('v') => Some(Self::Paste),
                    KeyName::Char('c') => Some(Self::Interrupt),
                    KeyName::Char('d') => Some(Self::Exit),
                    KeyName::Char('n') => Some(Self::InsertNewline),
                    KeyName::Char('l') => Some(Self::ClearScreen),
                    _ => None,
                };
            }
            match key.name {
                KeyName::Enter => return Some(Self::Enter),
                KeyName::Tab => return Some(Self::Tab),
                KeyName::Up => return Some(Self::Up),
                KeyName::Down => return Some(Self::Down),
                KeyName::Left => return Some(Self::Left),
                KeyName::Right => return Some(Self::Right),
                KeyName::Home => return Some(Self::LineStart),
                KeyName::End => return Some(Self::LineEnd),
                KeyName::Backspace => return Some(Self::Backspace),
                KeyName::Delete => return Some(Self::Delete),
                KeyName::Escape => return None,
                KeyName::Char(_) => {}
            }
        }

        event
            .ch
            .as_deref()
            .filter(|it| !it.is_empty())
            .map(|it| Self::Insert(normalize_newlines(it)))
    }
}

/// Terminals and clipboards hand over `\r` and `\r\n` line endings.
#[must_use]
pub fn normalize_newlines(text: &str) -> String { text.replace("\r\n", "\n").replace('\r', "\n") }

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case(KeyPressEvent::key(KeyName::Enter), Some(EditorAction::Enter))]
    #[test_case(KeyPressEvent::key(KeyName::Tab), Some(EditorAction::Tab))]
    #[test_case(KeyPressEvent::key(KeyName::Home), Some(EditorAction::LineStart))]
    #[test_case(KeyPressEvent::key(KeyName::Escape), None)]
    #[test_case(KeyPressEvent::ctrl('a'), Some(EditorAction::LineStart))]
    #[test_case(KeyPressEvent::ctrl('e'), Some(EditorAction::LineEnd))]
    #[test_case(KeyPressEvent::ctrl('y'), Some(EditorAction::Copy))]
    #[test_case(KeyPressEvent::ctrl('v'), Some(EditorAction::Paste))]
    #[test_case(KeyPressEvent::ctrl('c'), Some(EditorAction::Interrupt))]
    #[test_case(KeyPressEvent::ctrl('d'), Some(EditorAction::Exit))]
    #[test_case(KeyPressEvent::ctrl('n'), Some(EditorAction::InsertNewline))]
    #[test_case(KeyPressEvent::ctrl('z'), None)]
    #[test_case(KeyPressEvent::char('x'), Some(EditorAction::Insert("x".into())))]
    #[test_case(KeyPressEvent::text("a\r\nb\rc"), Some(EditorAction::Insert("a\nb\nc".into())))]
    #[test_case(KeyPressEvent::default(), None)]
    fn test_dispatch_table(event: KeyPressEvent, expected: Option<EditorAction>) {
        pretty_assertions::assert_eq!(EditorAction::from_key_press(&event), expected);
    }

    #[test]
    fn test_from_crossterm() {
        let event = Event::Key(KeyEvent::new(KeyCode::Char('C'), KeyModifiers::CONTROL));
        pretty_assertions::assert_eq!(
            KeyPressEvent::from_crossterm(event),
            Some(KeyPressEvent::ctrl('c'))
        );

        let event = Event::Key(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE));
        pretty_assertions::assert_eq!(
            KeyPressEvent::from_crossterm(event),
            Some(KeyPressEvent::char('x'))
        );

        let event = Event::Paste("1\r2".into());
        pretty_assertions::assert_eq!(
            KeyPressEvent::from_crossterm(event),
            Some(KeyPressEvent::text("1\r2"))
        );

        pretty_assertions::assert_eq!(KeyPressEvent::from_crossterm(Event::FocusGained), None);
    }
}
