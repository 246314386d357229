// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::io;

use super::{LineEditor, line_editor_impl::display_context};
use crate::{NEW_LINE, compute_layout, lines_before};

impl LineEditor {
    /// Redraws the prompt and the buffer, then puts the terminal cursor where the
    /// buffer's cursor is. With `jump_to_end` the buffer's cursor moves to the end of
    /// the text first.
    ///
    /// The output only depends on the buffer, the cursor and the terminal geometry, so
    /// redrawing twice in a row writes the same thing twice.
    ///
    /// 1. Move up to the prompt's row (from where the last redraw left the cursor) and
    ///    clear everything below it.
    /// 2. Write the prompt and the highlighted lines. If that is taller than the
    ///    terminal only the lines up to `last_display_row` are written, which scrolls
    ///    the window to follow the cursor.
    /// 3. Move to the cursor. Geometry comes from the unstyled text.
    pub(crate) fn redraw(&mut self, jump_to_end: bool) -> io::Result<()> {
        let width = self.sink.columns().max(1);
        let height = self.sink.rows().max(1);
        let ctx = display_context(&self.config, width);

        if jump_to_end {
            self.buffer.move_to_end();
        }
        self.buffer.update_screen_row(&ctx);

        let text_end = self.buffer.text_layout(&ctx).to_screen_position(width);
        let cursor = self.buffer.cursor_layout(&ctx).to_screen_position(width);
        let styled = self.styled_display();

        let display = if text_end.rows >= height {
            if jump_to_end || cursor.rows > self.last_display_row {
                self.last_display_row = cursor.rows;
            } else if self.last_display_row - cursor.rows >= height {
                self.last_display_row = cursor.rows + height - 1;
            }
            self.last_display_row = self.last_display_row.min(text_end.rows);
            let visible = lines_before(&styled, self.last_display_row + 1, width);
            visible.strip_suffix(NEW_LINE).unwrap_or(visible)
        } else {
            self.last_display_row = text_end.rows;
            styled.as_str()
        };

        if self.last_cursor_row > 0 {
            self.sink.move_cursor(0, -(self.last_cursor_row as isize))?;
        }
        self.last_cursor_row = cursor.rows;
        self.sink.cursor_to(0, None)?;
        self.sink.clear_to_end_of_screen()?;
        self.sink.write(display)?;

        // A line that ends exactly at the right edge leaves the terminal in its
        // pending wrap state. Writing a blank makes it allocate the next row.
        let written = compute_layout(display, width);
        if written.is_pending_wrap(width) {
            self.sink.write(" ")?;
        }
        let written_end_row = written.to_screen_position(width).rows;

        self.sink.cursor_to(cursor.columns, None)?;
        let d_row = cursor.rows as isize - written_end_row as isize;
        if d_row != 0 {
            self.sink.move_cursor(0, d_row)?;
        }
        self.sink.flush()
    }

    /// The prompt, then each line run through the presenter, with the continuation
    /// prompt before every line after the first.
    fn styled_display(&self) -> String {
        let mut acc = self.config.prompt.clone();
        for (index, line) in self.buffer.text().split('\n').enumerate() {
            if index > 0 {
                acc.push_str(NEW_LINE);
                acc.push_str(&self.config.continuation_prompt);
            }
            acc.push_str(&self.presenter.highlight(line));
        }
        acc
    }
}

#[cfg(test)]
mod tests {
    use smallvec::smallvec;

    use super::*;
    use crate::{EditorConfig, KeyName, KeyPressEvent, Presenter, SinkOp, TerminalSinkMock,
                TestClipboard, gen_input_stream};

    struct AnsiPresenter;

    impl Presenter for AnsiPresenter {
        fn highlight(&self, raw_line: &str) -> String { format!("\x1b[1m{raw_line}\x1b[0m") }
    }

    fn editor_on(sink: &TerminalSinkMock, presenter: Box<dyn Presenter>) -> LineEditor {
        LineEditor::try_new(
            EditorConfig::default(),
            Box::new(sink.clone()),
            presenter,
            Box::new(TestClipboard::default()),
            gen_input_stream(smallvec![]),
        )
        .unwrap()
    }

    #[test]
    fn test_first_prompt() {
        let sink = TerminalSinkMock::default();
        let _editor = editor_on(&sink, Box::new(crate::PlainPresenter));
        pretty_assertions::assert_eq!(
            sink.get_copy_of_ops(),
            vec![
                SinkOp::CursorTo(0, None),
                SinkOp::ClearToEndOfScreen,
                SinkOp::Write("> ".into()),
                SinkOp::CursorTo(2, None),
            ]
        );
    }

    #[test]
    fn test_redraw_moves_back_to_prompt_row() {
        let sink = TerminalSinkMock::default();
        let mut editor = editor_on(&sink, Box::new(crate::PlainPresenter));
        editor
            .handle_key_press(KeyPressEvent::text("fun f():\n1"))
            .unwrap();
        sink.clear_ops();

        editor
            .handle_key_press(KeyPressEvent::key(KeyName::Left))
            .unwrap();
        pretty_assertions::assert_eq!(
            sink.get_copy_of_ops(),
            vec![
                SinkOp::MoveCursor(0, -1),
                SinkOp::CursorTo(0, None),
                SinkOp::ClearToEndOfScreen,
                SinkOp::Write("> fun f():\n    1".into()),
                SinkOp::CursorTo(4, None),
            ]
        );
        pretty_assertions::assert_eq!(editor.buffer().screen_row(), 1);
    }

    #[test]
    fn test_redraw_is_idempotent() {
        let sink = TerminalSinkMock::default();
        let mut editor = editor_on(&sink, Box::new(crate::PlainPresenter));
        editor.handle_key_press(KeyPressEvent::text("a\nb")).unwrap();
        editor.redraw(false).unwrap();
        let first = sink.get_copy_of_ops();
        sink.clear_ops();
        editor.redraw(false).unwrap();
        let second = sink.get_copy_of_ops();
        pretty_assertions::assert_eq!(first[first.len() - second.len()..], second[..]);
    }

    #[test]
    fn test_styling_does_not_move_cursor() {
        let sink = TerminalSinkMock::default();
        let mut editor = editor_on(&sink, Box::new(AnsiPresenter));
        editor.handle_key_press(KeyPressEvent::text("abc")).unwrap();
        let ops = sink.get_copy_of_ops();
        pretty_assertions::assert_eq!(ops.last(), Some(&SinkOp::CursorTo(5, None)));
        assert!(sink.get_written_text_strip_ansi().ends_with("> abc"));
    }

    #[test]
    fn test_exact_wrap_writes_blank() {
        let sink = TerminalSinkMock::default();
        sink.set_size(10, 24);
        let mut editor = editor_on(&sink, Box::new(crate::PlainPresenter));
        sink.clear_ops();
        // "> " + 8 chars fills the row exactly.
        editor
            .handle_key_press(KeyPressEvent::text("abcdefgh"))
            .unwrap();
        pretty_assertions::assert_eq!(
            sink.get_copy_of_ops(),
            vec![
                SinkOp::CursorTo(0, None),
                SinkOp::ClearToEndOfScreen,
                SinkOp::Write("> abcdefgh".into()),
                SinkOp::Write(" ".into()),
                SinkOp::CursorTo(0, None),
            ]
        );
        pretty_assertions::assert_eq!(editor.buffer().screen_row(), 1);
    }

    #[test]
    fn test_tall_buffer_is_clipped_to_terminal() {
        let sink = TerminalSinkMock::default();
        sink.set_size(80, 3);
        let mut editor = editor_on(&sink, Box::new(crate::PlainPresenter));
        editor
            .handle_key_press(KeyPressEvent::text("1\n2\n3\n4\n5"))
            .unwrap();
        pretty_assertions::assert_eq!(editor.last_display_row, 4);

        // Move the cursor to the top line, the window follows it up.
        for _ in 0..4 {
            editor
                .handle_key_press(KeyPressEvent::key(KeyName::Up))
                .unwrap();
        }
        pretty_assertions::assert_eq!(editor.buffer().cursor_line_index(), 0);
        pretty_assertions::assert_eq!(editor.last_display_row, 2);
        let ops = sink.get_copy_of_ops();
        let last_write = ops
            .iter()
            .rev()
            .find_map(|op| match op {
                SinkOp::Write(text) => Some(text.clone()),
                _ => None,
            })
            .unwrap();
        pretty_assertions::assert_eq!(last_write, "> 1\n  2\n  3");
    }
}
