// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::time::Duration;

use crate::{COPY_DOUBLE_PRESS_WINDOW_MS, DEFAULT_CONTINUATION_PROMPT, DEFAULT_INDENT_UNIT,
            DEFAULT_PROMPT, TAB_DOUBLE_PRESS_WINDOW_MS};

/// Knobs for [`crate::LineEditor`]. Use the `with_*` methods to override the defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorConfig {
    pub prompt: String,
    /// Shown before every line after the first.
    pub continuation_prompt: String,
    /// One level of indentation.
    pub indent_unit: String,
    pub tab_double_press_window: Duration,
    pub copy_double_press_window: Duration,
    /// `None` keeps every history entry.
    pub history_max_entries: Option<usize>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.into(),
            continuation_prompt: DEFAULT_CONTINUATION_PROMPT.into(),
            indent_unit: DEFAULT_INDENT_UNIT.into(),
            tab_double_press_window: Duration::from_millis(TAB_DOUBLE_PRESS_WINDOW_MS),
            copy_double_press_window: Duration::from_millis(COPY_DOUBLE_PRESS_WINDOW_MS),
            history_max_entries: None,
        }
    }
}

impl EditorConfig {
    #[must_use]
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    #[must_use]
    pub fn with_continuation_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.continuation_prompt = prompt.into();
        self
    }

    /// Indent with `width` spaces per level.
    #[must_use]
    pub fn with_indent_width(mut self, width: usize) -> Self {
        self.indent_unit = " ".repeat(width);
        self
    }

    #[must_use]
    pub fn with_tab_double_press_window(mut self, window: Duration) -> Self {
        self.tab_double_press_window = window;
        self
    }

    #[must_use]
    pub fn with_copy_double_press_window(mut self, window: Duration) -> Self {
        self.copy_double_press_window = window;
        self
    }

    #[must_use]
    pub fn with_history_max_entries(mut self, max_entries: Option<usize>) -> Self {
        self.history_max_entries = max_entries;
        self
    }
}
