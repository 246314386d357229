// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{DisplayLayout, NEW_LINE, compute_layout};

/// What the buffer is drawn with: the prompt before the first line, the continuation
/// prompt before every other line, and the terminal width at the time of the query.
/// The width is read from the terminal on every redraw and never cached here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayContext<'a> {
    pub prompt: &'a str,
    pub continuation_prompt: &'a str,
    pub width: usize,
}

impl DisplayContext<'_> {
    /// `text` with the prompt and continuation prompts it is displayed with.
    #[must_use]
    pub fn decorate(&self, text: &str) -> String {
        let mut acc = String::with_capacity(self.prompt.len() + text.len());
        acc.push_str(self.prompt);
        for (index, line) in text.split('\n').enumerate() {
            if index > 0 {
                acc.push_str(NEW_LINE);
                acc.push_str(self.continuation_prompt);
            }
            acc.push_str(line);
        }
        acc
    }

    #[must_use]
    pub fn layout_of(&self, text: &str) -> DisplayLayout {
        compute_layout(&self.decorate(text), self.width)
    }
}
