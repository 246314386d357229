// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::ops::Range;

use unicode_segmentation::UnicodeSegmentation;

use super::{DisplayContext, split_lines};
use crate::{DisplayLayout, IndentTracker};

/// The logical text being edited at the prompt, which can span many lines, plus the
/// cursor.
///
/// - `cursor` is a byte offset into `text`. It is always on a grapheme cluster boundary
///   so `0 <= cursor <= text.len()` holds after every operation.
/// - `screen_row` is the screen row the cursor is on, counted from the prompt's row.
///   It is kept in step with cursor moves and reindentation, see
///   [`EditBuffer::update_screen_row`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditBuffer {
    text: String,
    cursor: usize,
    screen_row: usize,
}

impl EditBuffer {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    #[must_use]
    pub fn text(&self) -> &str { &self.text }

    #[must_use]
    pub fn cursor(&self) -> usize { self.cursor }

    #[must_use]
    pub fn screen_row(&self) -> usize { self.screen_row }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.text.is_empty() }

    #[must_use]
    pub fn is_blank(&self) -> bool { self.text.trim().is_empty() }

    pub fn reset(&mut self) { *self = Self::default(); }

    /// Replaces the whole text (eg: with a history entry) and puts the cursor at the
    /// end of it.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.cursor = self.text.len();
    }

    pub fn insert(&mut self, string: &str) {
        self.text.insert_str(self.cursor, string);
        self.cursor += string.len();
    }

    /// Removes the grapheme cluster before the cursor. Returns `false` at the start of
    /// the text.
    pub fn delete_before_cursor(&mut self) -> bool {
        let Some(prev) = self.text[..self.cursor].graphemes(true).next_back() else {
            return false;
        };
        let start = self.cursor - prev.len();
        self.text.replace_range(start..self.cursor, "");
        self.cursor = start;
        true
    }

    /// Removes the grapheme cluster under the cursor. Returns `false` at the end of the
    /// text.
    pub fn delete_at_cursor(&mut self) -> bool {
        let Some(next) = self.text[self.cursor..].graphemes(true).next() else {
            return false;
        };
        let end = self.cursor + next.len();
        self.text.replace_range(self.cursor..end, "");
        true
    }

    pub fn move_left(&mut self) -> bool {
        match self.text[..self.cursor].graphemes(true).next_back() {
            Some(prev) => {
                self.cursor -= prev.len();
                true
            }
            None => false,
        }
    }

    pub fn move_right(&mut self) -> bool {
        match self.text[self.cursor..].graphemes(true).next() {
            Some(next) => {
                self.cursor += next.len();
                true
            }
            None => false,
        }
    }

    pub fn move_to_start(&mut self) { self.cursor = 0; }

    pub fn move_to_end(&mut self) { self.cursor = self.text.len(); }

    pub fn move_to_line_start(&mut self) { self.cursor = self.current_line_range().start; }

    pub fn move_to_line_end(&mut self) { self.cursor = self.current_line_range().end; }

    /// Moves to the same column on the previous logical line, or to its end if it is
    /// shorter. Returns `false` on the first line.
    pub fn move_to_prev_line(&mut self) -> bool {
        let current = self.current_line_range();
        if current.start == 0 {
            return false;
        }
        let column = self.column();
        let prev = line_range_at(&self.text, current.start - 1);
        self.cursor = offset_at_column(&self.text, prev, column);
        true
    }

    /// Moves to the same column on the next logical line, or to its end if it is
    /// shorter. Returns `false` on the last line.
    pub fn move_to_next_line(&mut self) -> bool {
        let current = self.current_line_range();
        if current.end == self.text.len() {
            return false;
        }
        let column = self.column();
        let next = line_range_at(&self.text, current.end + 1);
        self.cursor = offset_at_column(&self.text, next, column);
        true
    }

    /// Zero based index of the logical line the cursor is on.
    #[must_use]
    pub fn cursor_line_index(&self) -> usize { self.text[..self.cursor].matches('\n').count() }

    #[must_use]
    pub fn is_cursor_on_first_line(&self) -> bool { !self.text[..self.cursor].contains('\n') }

    #[must_use]
    pub fn is_cursor_on_last_line(&self) -> bool { !self.text[self.cursor..].contains('\n') }

    /// Byte range of the cursor's line, not including its newline.
    #[must_use]
    pub fn current_line_range(&self) -> Range<usize> { line_range_at(&self.text, self.cursor) }

    /// The line `offset` lines away from the cursor's line, clamped to the lines that
    /// exist. Lines keep their trailing newline. When the text ends in a newline, the
    /// cursor can be on the empty line after it, which is returned as `""` unless
    /// `ignore_newline` is set, in which case the line before it is returned.
    #[must_use]
    pub fn get_line(&self, offset: isize, ignore_newline: bool) -> &str {
        let lines = split_lines(&self.text);
        if lines.is_empty() {
            return &self.text;
        }
        let last = lines.len() - 1;
        let index = self
            .cursor_line_index()
            .saturating_add_signed(offset)
            .min(last);
        if index == last && self.text.ends_with('\n') && !ignore_newline {
            return "";
        }
        lines[index]
    }

    /// The cursor's line, up to the cursor.
    #[must_use]
    pub fn line_until_cursor(&self) -> &str {
        &self.text[self.current_line_range().start..self.cursor]
    }

    /// Replaces the text of the cursor's line (not its newline). The cursor stays at
    /// the same distance from the end of the line, clamped to the line.
    pub fn replace_current_line(&mut self, line: &str) {
        let range = self.current_line_range();
        let from_end = range.end - self.cursor;
        self.text.replace_range(range.clone(), line);
        let new_end = range.start + line.len();
        self.cursor = new_end.saturating_sub(from_end).max(range.start);
        self.snap_cursor_to_boundary();
    }

    /// Layout of the text up to the cursor, with prompts, ie: where the cursor is.
    #[must_use]
    pub fn cursor_layout(&self, ctx: &DisplayContext<'_>) -> DisplayLayout {
        ctx.layout_of(&self.text[..self.cursor])
    }

    /// Layout of the whole text, with prompts.
    #[must_use]
    pub fn text_layout(&self, ctx: &DisplayContext<'_>) -> DisplayLayout {
        ctx.layout_of(&self.text)
    }

    /// Recomputes `screen_row` from where the cursor is in the laid out text.
    pub fn update_screen_row(&mut self, ctx: &DisplayContext<'_>) {
        self.screen_row = self.cursor_layout(ctx).to_screen_position(ctx.width).rows;
    }

    /// Replaces the leading whitespace of the cursor's line with the indent the
    /// `tracker` derives for it, from the lines up to and including it.
    ///
    /// The cursor keeps its place in the line's content. If it was inside the old
    /// indent, it ends up just after the new one. When the change in length moves the
    /// cursor onto a different screen row (eg: the line wraps) `screen_row` is corrected
    /// by the same number of rows, which is returned.
    pub fn reindent_current_line(
        &mut self,
        tracker: &IndentTracker,
        indent_unit: &str,
        ctx: &DisplayContext<'_>,
    ) -> isize {
        let line_index = self.cursor_line_index();
        let frames = tracker.scan(self.text.split('\n').take(line_index + 1));
        let indent = indent_unit.repeat(IndentTracker::indent_for(&frames, line_index));

        let range = self.current_line_range();
        let old_indent_len = leading_whitespace_len(&self.text[range.clone()]);
        if self.text[range.start..range.start + old_indent_len] == indent {
            return 0;
        }

        let row_before = self.cursor_layout(ctx).to_screen_position(ctx.width).rows;

        let column_in_line = self.cursor - range.start;
        self.text
            .replace_range(range.start..range.start + old_indent_len, &indent);
        self.cursor = range.start + indent.len() + column_in_line.saturating_sub(old_indent_len);

        let row_after = self.cursor_layout(ctx).to_screen_position(ctx.width).rows;
        let row_delta = row_after as isize - row_before as isize;
        self.screen_row = self.screen_row.saturating_add_signed(row_delta);
        row_delta
    }

    /// Reindents every line. The cursor keeps its line and its place in the line's
    /// content.
    pub fn reindent_all(
        &mut self,
        tracker: &IndentTracker,
        indent_unit: &str,
        ctx: &DisplayContext<'_>,
    ) {
        let line_index = self.cursor_line_index();
        let range = self.current_line_range();
        let old_indent_len = leading_whitespace_len(&self.text[range.clone()]);
        let column_in_content = (self.cursor - range.start).saturating_sub(old_indent_len);

        let frames = tracker.scan(self.text.split('\n'));
        let reindented = self
            .text
            .split('\n')
            .enumerate()
            .map(|(index, line)| {
                let depth = IndentTracker::indent_for(&frames, index);
                format!("{}{}", indent_unit.repeat(depth), line.trim_start())
            })
            .collect::<Vec<_>>()
            .join("\n");
        self.text = reindented;

        // Restore the cursor on the same line.
        let line_start = match line_index {
            0 => 0,
            _ => self
                .text
                .match_indices('\n')
                .nth(line_index - 1)
                .map_or(0, |(index, _)| index + 1),
        };
        let range = line_range_at(&self.text, line_start);
        let indent_len = leading_whitespace_len(&self.text[range.clone()]);
        self.cursor = (range.start + indent_len + column_in_content).min(range.end);
        self.snap_cursor_to_boundary();
        self.update_screen_row(ctx);
    }

    /// Number of grapheme clusters between the start of the cursor's line and the
    /// cursor.
    fn column(&self) -> usize { self.line_until_cursor().graphemes(true).count() }

    fn snap_cursor_to_boundary(&mut self) {
        while !self.text.is_char_boundary(self.cursor) {
            self.cursor -= 1;
        }
    }
}

/// Byte range of the line containing `offset`, not including its newline.
fn line_range_at(text: &str, offset: usize) -> Range<usize> {
    let start = text[..offset].rfind('\n').map_or(0, |index| index + 1);
    let end = text[offset..]
        .find('\n')
        .map_or(text.len(), |index| offset + index);
    start..end
}

/// Offset of the grapheme `column` in the line `range`, or its end.
fn offset_at_column(text: &str, range: Range<usize>, column: usize) -> usize {
    text[range.clone()]
        .grapheme_indices(true)
        .nth(column)
        .map_or(range.end, |(index, _)| range.start + index)
}

fn leading_whitespace_len(line: &str) -> usize {
    line.len() - line.trim_start().len()
}
