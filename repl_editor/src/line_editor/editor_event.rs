// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use strum_macros::Display;

/// What [`crate::LineEditor::readline`] hands back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorEvent {
    /// The submitted text, with its line breaks.
    Command(String),
    /// Input ended, or the user asked to leave.
    Close,
}

/// `Ready` once the buffer closes every block it opens. `Enter` only submits then.
///
/// A fresh prompt (after a submit or an interrupt) reports `Ready`, since its empty
/// buffer opens no blocks and `Enter` on it submits `""`. `Collecting` means a block
/// is still open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display)]
pub enum EditorState {
    #[default]
    Collecting,
    Ready,
}

/// Between a submission and the next prompt, keystrokes are dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display)]
pub enum InputLiveness {
    #[default]
    Listening,
    AwaitingPrompt,
}
