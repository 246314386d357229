// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

/// Styles a line for display, eg: with syntax highlighting. The result may hold escape
/// sequences but must show the same text, since the cursor is placed using the
/// geometry of the unstyled line.
pub trait Presenter {
    fn highlight(&self, raw_line: &str) -> String;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PlainPresenter;

impl Presenter for PlainPresenter {
    fn highlight(&self, raw_line: &str) -> String { raw_line.to_string() }
}
